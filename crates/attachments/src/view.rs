// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Presentation of attachment figures in the editing surface.
//!
//! A [`FigureView`] is a plain value tree the host mirrors into its own
//! widgets. The view never edits the document itself: the two things it
//! reacts to, a media element reporting its natural size and a click on the
//! figure, are turned into transactions by [`dimensions_loaded`] and
//! [`figure_clicked`] for the host to dispatch.

use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::debug;

use crate::attachment::codec::CONTENT_TYPE_ATTR;
use crate::attachment::{
    format_file_size, AttachmentAttributes, AttachmentKind, CaptionPlaceholder,
    FileNamePlaceholder,
};
use crate::config::AttachmentConfig;
use crate::dom::nodes::DomNode;
use crate::dom::Dom;
use crate::transaction::{Selection, Step, Transaction};

pub const PROGRESS_TAG: &str = "attachment-editor";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewChild {
    Element(ViewElement),
    Text(String),
    /// Markup inserted as is.
    RawHtml(String),
    /// Where the host mounts the editable caption text.
    ContentHole,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewElement {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<ViewChild>,
}

impl ViewElement {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: ViewChild) -> Self {
        self.children.push(child);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// The first element with `tag`, depth first, including this one.
    pub fn find(&self, tag: &str) -> Option<&ViewElement> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|child| match child {
            ViewChild::Element(e) => e.find(tag),
            _ => None,
        })
    }

    pub fn has_content_hole(&self) -> bool {
        self.children.iter().any(|child| match child {
            ViewChild::ContentHole => true,
            ViewChild::Element(e) => e.has_content_hole(),
            _ => false,
        })
    }

    /// Markup for the element. The content hole renders as nothing.
    pub fn to_html(&self) -> String {
        let mut html = format!("<{}", self.tag);
        for (name, value) in &self.attributes {
            html.push_str(&format!(
                " {name}=\"{}\"",
                encode_double_quoted_attribute(value)
            ));
        }
        html.push('>');
        if self.tag == "img" {
            return html;
        }
        for child in &self.children {
            match child {
                ViewChild::Element(e) => html.push_str(&e.to_html()),
                ViewChild::Text(t) => html.push_str(&encode_text(t)),
                ViewChild::RawHtml(raw) => html.push_str(raw),
                ViewChild::ContentHole => {}
            }
        }
        html.push_str(&format!("</{}>", self.tag));
        html
    }
}

/// Natural size reported by a loaded media element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MediaDimensions {
    pub width: u32,
    pub height: u32,
}

/// The host should load `src` and report its size through
/// [`dimensions_loaded`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaRequest {
    pub src: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    Caption,
    Figure,
}

/// The live view of one figure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FigureView {
    root: ViewElement,
    kind: AttachmentKind,
    attributes: AttachmentAttributes,
}

impl FigureView {
    pub fn root(&self) -> &ViewElement {
        &self.root
    }

    pub fn kind(&self) -> AttachmentKind {
        self.kind
    }

    pub fn attributes(&self) -> &AttachmentAttributes {
        &self.attributes
    }

    /// Set while a previewable figure still lacks its dimensions.
    pub fn media_request(&self) -> Option<MediaRequest> {
        let attributes = &self.attributes;
        (self.kind == AttachmentKind::Preview
            && !attributes.has_dimensions()
            && !attributes.src.is_empty())
        .then(|| MediaRequest {
            src: attributes.src.clone(),
        })
    }

    /// Re-renders for a changed node. Returns false when the node is no
    /// longer a figure of the same kind; the host must build a new view.
    pub fn update<P: CaptionPlaceholder>(
        &mut self,
        binder: &ViewBinder<P>,
        node: &DomNode,
    ) -> bool {
        match binder.build(node) {
            Some(view) if view.kind == self.kind => {
                *self = view;
                true
            }
            _ => false,
        }
    }
}

/// Builds figure views from the shared configuration.
#[derive(Clone, Debug)]
pub struct ViewBinder<P = FileNamePlaceholder> {
    config: AttachmentConfig,
    placeholder: P,
}

impl ViewBinder<FileNamePlaceholder> {
    pub fn new(config: AttachmentConfig) -> Self {
        Self::with_placeholder(config, FileNamePlaceholder)
    }
}

impl<P: CaptionPlaceholder> ViewBinder<P> {
    pub fn with_placeholder(config: AttachmentConfig, placeholder: P) -> Self {
        Self {
            config,
            placeholder,
        }
    }

    /// A view for `node`, or `None` if it is not an attachment figure.
    pub fn build(&self, node: &DomNode) -> Option<FigureView> {
        let attributes = node.as_container()?.attachment_attributes()?;
        Some(FigureView {
            root: self.render(&attributes),
            kind: attributes.kind(),
            attributes,
        })
    }

    fn render(&self, attrs: &AttachmentAttributes) -> ViewElement {
        let class = format!(
            "{} {} {}",
            self.config.figure_class,
            attrs.type_class(),
            attrs.extension_class()
        );
        let mut root = ViewElement::new("figure")
            .attr("class", class)
            .attr(CONTENT_TYPE_ATTR, attrs.content_type.clone());
        for (name, value) in &self.config.html_attributes {
            root = root.attr(name.clone(), value.clone());
        }

        root = match attrs.kind() {
            AttachmentKind::Preview => {
                let mut img =
                    ViewElement::new("img").attr("src", attrs.src.clone());
                if attrs.has_dimensions() {
                    img = img
                        .attr("width", attrs.width.clone())
                        .attr("height", attrs.height.clone());
                }
                root.child(ViewChild::Element(img))
            }
            AttachmentKind::Content => {
                root.child(ViewChild::RawHtml(attrs.content.clone()))
            }
            AttachmentKind::File => {
                root.child(ViewChild::Element(file_card(attrs)))
            }
        };

        if attrs.is_uploading() {
            let progress = ViewElement::new(PROGRESS_TAG)
                .attr("progress", attrs.progress.to_string())
                .attr("file-name", attrs.file_name.clone())
                .attr("file-size", attrs.file_size.clone());
            root = root.child(ViewChild::Element(progress));
        }

        let caption = ViewElement::new("figcaption")
            .attr("class", self.config.caption_class.clone())
            .attr(
                "data-placeholder",
                self.placeholder
                    .placeholder(&attrs.file_name, &attrs.file_size),
            )
            .child(ViewChild::ContentHole);
        root.child(ViewChild::Element(caption))
    }
}

fn file_card(attrs: &AttachmentAttributes) -> ViewElement {
    let size = match attrs.file_size.parse::<u64>() {
        Ok(bytes) => format_file_size(bytes),
        Err(_) => attrs.file_size.clone(),
    };
    ViewElement::new("span")
        .attr("class", "attachment__file")
        .child(ViewChild::Element(
            ViewElement::new("span")
                .attr("class", "attachment__name")
                .child(ViewChild::Text(attrs.file_name.clone())),
        ))
        .child(ViewChild::Element(
            ViewElement::new("span")
                .attr("class", "attachment__size")
                .child(ViewChild::Text(size)),
        ))
}

/// Writes reported media dimensions into the figure found at the position
/// `get_pos` returns now. Nothing happens if the position is gone or no
/// longer holds a figure.
pub fn dimensions_loaded(
    dom: &Dom,
    get_pos: impl Fn() -> Option<usize>,
    dimensions: MediaDimensions,
) -> Option<Transaction> {
    let Some(pos) = get_pos() else {
        debug!("dropping dimensions for a figure without a position");
        return None;
    };
    let Some(mut attributes) = dom.attachment_at(pos) else {
        debug!(pos, "dropping dimensions, no figure at position");
        return None;
    };
    attributes.width = dimensions.width.to_string();
    attributes.height = dimensions.height.to_string();
    Some(
        Transaction::new()
            .step(Step::SetAttachmentAttributes { pos, attributes }),
    )
}

/// A click outside the caption selects into the figure. Caption clicks are
/// left to the editing surface.
pub fn figure_clicked(
    get_pos: impl Fn() -> Option<usize>,
    target: ClickTarget,
) -> Option<Transaction> {
    match target {
        ClickTarget::Caption => None,
        ClickTarget::Figure => {
            let pos = get_pos()?;
            Some(Transaction::new().with_selection(Selection::cursor(pos + 1)))
        }
    }
}
