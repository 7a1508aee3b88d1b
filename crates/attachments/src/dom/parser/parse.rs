// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::{ElementRef, PaDom, PaDomCreator, PaDomHandle, PaDomNode};
use crate::attachment::codec::WRAPPER_TAG;
use crate::config::AttachmentConfig;
use crate::dom::nodes::DomNode;
use crate::dom::Dom;
use crate::schema::match_figure;

/// Elements whose text is flattened into the surrounding paragraph.
const INLINE_TAGS: [&str; 19] = [
    "a", "abbr", "b", "cite", "code", "del", "em", "i", "ins", "mark", "q",
    "s", "small", "span", "strike", "strong", "sub", "sup", "u",
];

static SURROUNDING_INDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\s*\n\s*)+|(\s*\n\s*)+$").expect("indent pattern is valid")
});

static INTERNAL_INDENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\n\s*").expect("indent pattern is valid")
});

/// Parses a markup fragment into a document.
///
/// `<p>` elements become paragraphs, `div`s carrying the gallery class become
/// galleries and anything matching a figure rule becomes an attachment
/// figure. Figures outside a gallery are grouped into one, text outside a
/// paragraph gets one, and other elements are looked through. Parsing never
/// fails; a fragment with no content yields one empty paragraph.
pub fn parse(html: &str, config: &AttachmentConfig) -> Dom {
    let padom = PaDomCreator::parse(html);
    let mut builder = DomBuilder {
        padom: &padom,
        config,
        blocks: Vec::new(),
        loose_text: String::new(),
        loose_figures: Vec::new(),
    };
    for handle in padom.top_level() {
        builder.block(&handle);
    }
    builder.finish()
}

struct DomBuilder<'a> {
    padom: &'a PaDom,
    config: &'a AttachmentConfig,
    blocks: Vec<DomNode>,
    /// Text seen outside any paragraph since the last block.
    loose_text: String,
    /// Figures seen outside any gallery since the last block.
    loose_figures: Vec<DomNode>,
}

impl DomBuilder<'_> {
    fn block(&mut self, handle: &PaDomHandle) {
        let padom = self.padom;
        match padom.get_node(handle) {
            PaDomNode::Text(text) => {
                if self.loose_text.is_empty()
                    && text.content.trim().is_empty()
                {
                    return;
                }
                self.flush_figures();
                self.loose_text.push_str(&text.content);
            }
            PaDomNode::Container(_) => {
                if let Some(element) = padom.element(handle) {
                    self.element(element);
                }
            }
            PaDomNode::Document(_) | PaDomNode::Ignored => {}
        }
    }

    fn element(&mut self, element: ElementRef<'_>) {
        let padom = self.padom;
        if let Some(attributes) = match_figure(&element) {
            self.flush_text();
            self.loose_figures.push(DomNode::new_attachment_figure(attributes));
            return;
        }

        let tag = element.tag();
        if tag == "p" {
            self.flush();
            for segment in inline_segments(padom, element.handle()) {
                self.blocks.push(DomNode::new_paragraph(&clean_text(&segment)));
            }
        } else if tag == "div"
            && element.has_class(&self.config.gallery_class)
        {
            self.flush();
            let mut figures = Vec::new();
            collect_figures(&element, &mut figures);
            if figures.is_empty() {
                debug!("dropping gallery without figures");
            } else {
                self.blocks.push(DomNode::new_gallery(figures));
            }
        } else if tag == WRAPPER_TAG && self.wrapped_figures(&element) {
            // The rest of the wrapper is the figure's embedded content.
        } else if tag == "br" {
            self.flush_figures();
            self.flush_text();
        } else if INLINE_TAGS.contains(&tag) {
            self.flush_figures();
            let mut segments =
                inline_segments(padom, element.handle()).into_iter();
            if let Some(first) = segments.next() {
                self.loose_text.push_str(&first);
            }
            for segment in segments {
                self.flush_text();
                self.loose_text.push_str(&segment);
            }
        } else {
            self.flush();
            for child in padom.children(element.handle()) {
                self.block(child);
            }
            self.flush();
        }
    }

    fn wrapped_figures(&mut self, wrapper: &ElementRef<'_>) -> bool {
        let mut figures = Vec::new();
        collect_figures(wrapper, &mut figures);
        if figures.is_empty() {
            return false;
        }
        self.flush_text();
        self.loose_figures.extend(figures);
        true
    }

    fn flush(&mut self) {
        self.flush_text();
        self.flush_figures();
    }

    fn flush_text(&mut self) {
        let text = clean_text(&std::mem::take(&mut self.loose_text));
        if !text.trim().is_empty() {
            self.blocks.push(DomNode::new_paragraph(&text));
        }
    }

    fn flush_figures(&mut self) {
        if !self.loose_figures.is_empty() {
            let figures = std::mem::take(&mut self.loose_figures);
            self.blocks.push(DomNode::new_gallery(figures));
        }
    }

    fn finish(mut self) -> Dom {
        self.flush();
        if self.blocks.is_empty() {
            Dom::default()
        } else {
            Dom::new(self.blocks)
        }
    }
}

/// Figures anywhere below a gallery element, in document order.
fn collect_figures(element: &ElementRef<'_>, figures: &mut Vec<DomNode>) {
    for child in element.child_elements() {
        match match_figure(&child) {
            Some(attributes) => {
                figures.push(DomNode::new_attachment_figure(attributes))
            }
            None => collect_figures(&child, figures),
        }
    }
}

/// The text below `handle`, split at each `<br>`.
fn inline_segments(padom: &PaDom, handle: &PaDomHandle) -> Vec<String> {
    fn walk(padom: &PaDom, handle: &PaDomHandle, segments: &mut Vec<String>) {
        for child in padom.children(handle) {
            match padom.get_node(child) {
                PaDomNode::Text(text) => {
                    if let Some(last) = segments.last_mut() {
                        last.push_str(&text.content);
                    }
                }
                PaDomNode::Container(c) if c.tag() == "br" => {
                    segments.push(String::new())
                }
                PaDomNode::Container(_) => walk(padom, child, segments),
                PaDomNode::Document(_) | PaDomNode::Ignored => {}
            }
        }
    }

    let mut segments = vec![String::new()];
    walk(padom, handle, &mut segments);
    segments
}

fn clean_text(text: &str) -> String {
    // Trim any surrounding indentation
    let text = SURROUNDING_INDENT.replace_all(text, "");
    // Replace any internal indentation with a single space
    INTERNAL_INDENT.replace_all(&text, " ").into_owned()
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use speculoos::{assert_that, AssertionFailure, Spec};

    use super::*;

    fn tree(html: &str) -> String {
        parse(html, &AttachmentConfig::default()).to_tree()
    }

    trait Roundtrips<T> {
        fn roundtrips(&self);
    }

    impl<'s, T> Roundtrips<T> for Spec<'s, T>
    where
        T: AsRef<str>,
    {
        fn roundtrips(&self) {
            let config = AttachmentConfig::default();
            let subject = self.subject.as_ref();
            let dom = parse(subject, &config);
            dom.explicitly_assert_invariants();
            let output = dom.to_html(&config);
            if output != subject {
                AssertionFailure::from_spec(self)
                    .with_expected(String::from(subject))
                    .with_actual(output)
                    .fail();
            }
        }
    }

    #[test]
    fn parse_paragraphs() {
        assert_that!("<p>one</p><p>two</p>").roundtrips();
        assert_that!("<p></p>").roundtrips();
        assert_that!("<p>a &lt; b &amp; c</p>").roundtrips();
    }

    #[test]
    fn parse_empty_fragment_gives_an_empty_paragraph() {
        assert_eq!(tree(""), "\n└>p\n");
        assert_eq!(tree("  \n  "), "\n└>p\n");
    }

    #[test]
    fn parse_flattens_inline_formatting() {
        assert_eq!(
            tree("<p>a <strong>bold</strong> <em>move</em></p>"),
            indoc! {r#"

                └>p
                  └>"a bold move"
            "#}
        );
    }

    #[test]
    fn parse_wraps_loose_text() {
        assert_eq!(
            tree("before<p>inside</p>after <b>bold</b>"),
            indoc! {r#"

                ├>p
                │ └>"before"
                ├>p
                │ └>"inside"
                └>p
                  └>"after bold"
            "#}
        );
    }

    #[test]
    fn parse_line_breaks_split_paragraphs() {
        assert_eq!(
            tree("<p>one<br>two</p>three<br>four"),
            indoc! {r#"

                ├>p
                │ └>"one"
                ├>p
                │ └>"two"
                ├>p
                │ └>"three"
                └>p
                  └>"four"
            "#}
        );
    }

    #[test]
    fn parse_collapses_indentation() {
        assert_eq!(
            tree("<p>\n    first\n    second\n</p>"),
            indoc! {r#"

                └>p
                  └>"first second"
            "#}
        );
    }

    #[test]
    fn parse_groups_loose_figures_into_a_gallery() {
        let html = indoc! {r#"
            <p>x</p>
            <figure><img src="/a.png"><figcaption>A</figcaption></figure>
            <figure><img src="/b.png"><figcaption>B</figcaption></figure>
            <p>y</p>
            <figure><img src="/c.png"><figcaption>C</figcaption></figure>
        "#};
        assert_eq!(
            tree(html),
            indoc! {r#"

                ├>p
                │ └>"x"
                ├>attachment-gallery
                │ ├>attachment-figure file ""
                │ │ └>"A"
                │ └>attachment-figure file ""
                │   └>"B"
                ├>p
                │ └>"y"
                └>attachment-gallery
                  └>attachment-figure file ""
                    └>"C"
            "#}
        );
    }

    #[test]
    fn parse_galleries() {
        let html = concat!(
            r#"<div class="attachment-gallery attachment-gallery--2">"#,
            r#"<action-text-attachment filename="a.pdf" "#,
            r#"content-type="application/pdf">"#,
            r#"<figure data-trix-attachment="{}"></figure>"#,
            r#"</action-text-attachment>"#,
            r#"<figure data-trix-attachment='{"filename":"b.png","#,
            r#""contentType":"image/png"}'>"#,
            r#"<figcaption>B</figcaption></figure></div>"#,
        );
        assert_eq!(
            tree(html),
            indoc! {r#"

                └>attachment-gallery
                  ├>attachment-figure file "a.pdf"
                  └>attachment-figure preview "b.png"
                    └>"B"
            "#}
        );
    }

    #[test]
    fn parse_wrapper_content_belongs_to_its_figure() {
        let html = concat!(
            r#"<p>a</p><action-text-attachment "#,
            r#"content-type="application/vnd.card" filename="card">"#,
            r#"<div class="card">Card</div><figure><figcaption>C</figcaption>"#,
            r#"</figure>"#,
            r#"</action-text-attachment>"#,
        );
        let dom = parse(html, &AttachmentConfig::default());
        assert_eq!(
            dom.to_tree(),
            indoc! {r#"

                ├>p
                │ └>"a"
                └>attachment-gallery
                  └>attachment-figure content "card"
                    └>"C"
            "#}
        );
        assert_eq!(
            dom.attachment_at(4).map(|a| a.content),
            Some(String::from(r#"<div class="card">Card</div>"#))
        );
    }

    #[test]
    fn parse_wrapper_without_figure_is_looked_through() {
        assert_eq!(
            tree(concat!(
                "<action-text-attachment><p>text</p>",
                "</action-text-attachment>"
            )),
            "\n└>p\n  └>\"text\"\n"
        );
    }

    #[test]
    fn parse_drops_empty_galleries() {
        assert_eq!(
            tree(r#"<div class="attachment-gallery"> </div><p>a</p>"#),
            "\n└>p\n  └>\"a\"\n"
        );
    }

    #[test]
    fn parse_looks_through_unknown_elements() {
        assert_eq!(
            tree("<section><div>one</div><div>two</div></section>"),
            indoc! {r#"

                ├>p
                │ └>"one"
                └>p
                  └>"two"
            "#}
        );
    }

    #[test]
    fn parse_figure_markup_roundtrips() {
        let dom = Dom::new(vec![
            DomNode::new_paragraph("Intro"),
            DomNode::new_gallery(vec![DomNode::new_attachment_figure(
                crate::AttachmentAttributes::new("/a.png", "image/png")
                    .with_file("a.png", "10")
                    .with_caption("A"),
            )]),
            DomNode::new_paragraph(""),
        ]);
        let html = dom.to_html(&AttachmentConfig::default());
        assert_that!(html.as_str()).roundtrips();
        assert_eq!(parse(&html, &AttachmentConfig::default()), dom);
    }
}
