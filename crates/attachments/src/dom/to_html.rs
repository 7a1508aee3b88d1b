// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html_escape::encode_text;

use super::nodes::{ContainerNode, ContainerNodeKind, DomNode};
use super::Dom;
use crate::config::AttachmentConfig;
use crate::schema::figure_to_html;

impl Dom {
    pub fn to_html(&self, config: &AttachmentConfig) -> String {
        let mut html = String::new();
        for child in self.document().children() {
            node_to_html(child, config, &mut html);
        }
        html
    }
}

fn node_to_html(node: &DomNode, config: &AttachmentConfig, html: &mut String) {
    match node {
        DomNode::Text(text) => html.push_str(&encode_text(text.data())),
        DomNode::Container(container) => {
            container_to_html(container, config, html)
        }
    }
}

fn container_to_html(
    container: &ContainerNode,
    config: &AttachmentConfig,
    html: &mut String,
) {
    match container.kind() {
        ContainerNodeKind::Document => {
            for child in container.children() {
                node_to_html(child, config, html);
            }
        }
        ContainerNodeKind::Paragraph => {
            html.push_str("<p>");
            for child in container.children() {
                node_to_html(child, config, html);
            }
            html.push_str("</p>");
        }
        ContainerNodeKind::Gallery => {
            let class = &config.gallery_class;
            let count = container.children().len();
            html.push_str(&format!(
                r#"<div class="{class} {class}--{count}">"#
            ));
            for child in container.children() {
                node_to_html(child, config, html);
            }
            html.push_str("</div>");
        }
        ContainerNodeKind::AttachmentFigure(_) => {
            if let Some(attributes) = container.attachment_attributes() {
                html.push_str(&figure_to_html(&attributes, config));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::attachment::AttachmentAttributes;

    #[test]
    fn paragraphs_escape_their_text() {
        let dom = Dom::new(vec![
            DomNode::new_paragraph("a < b"),
            DomNode::new_paragraph(""),
        ]);
        assert_eq!(
            dom.to_html(&AttachmentConfig::default()),
            "<p>a &lt; b</p><p></p>"
        );
    }

    #[test]
    fn galleries_carry_their_size_class() {
        let figure = || {
            DomNode::new_attachment_figure(AttachmentAttributes::default())
        };
        let dom =
            Dom::new(vec![DomNode::new_gallery(vec![figure(), figure()])]);
        let html = dom.to_html(&AttachmentConfig::default());
        assert!(html.starts_with(
            r#"<div class="attachment-gallery attachment-gallery--2"><figure "#
        ));
        assert!(html.ends_with("</figure></div>"));
        assert_eq!(html.matches("<figure ").count(), 2);
    }
}
