// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum_macros::{AsRefStr, Display};

use super::{ContainerNode, ContainerNodeKind, TextNode};
use crate::attachment::AttachmentAttributes;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, AsRefStr)]
pub enum DomNodeKind {
    #[strum(serialize = "doc")]
    Document,
    #[strum(serialize = "paragraph")]
    Paragraph,
    #[strum(serialize = "attachment-gallery")]
    Gallery,
    #[strum(serialize = "attachment-figure")]
    AttachmentFigure,
    #[strum(serialize = "text")]
    Text,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomNode {
    Container(ContainerNode),
    Text(TextNode),
}

impl DomNode {
    pub fn new_text(text: impl Into<String>) -> Self {
        Self::Text(TextNode::from(text))
    }

    /// A paragraph holding `text`, or an empty paragraph.
    pub fn new_paragraph(text: &str) -> Self {
        let children = if text.is_empty() {
            Vec::new()
        } else {
            vec![Self::new_text(text)]
        };
        Self::Container(ContainerNode::new(
            ContainerNodeKind::Paragraph,
            children,
        ))
    }

    pub fn new_gallery(figures: Vec<DomNode>) -> Self {
        Self::Container(ContainerNode::new(ContainerNodeKind::Gallery, figures))
    }

    /// A figure whose caption text child is taken from the attributes.
    pub fn new_attachment_figure(attributes: AttachmentAttributes) -> Self {
        let children = if attributes.caption.is_empty() {
            Vec::new()
        } else {
            vec![Self::new_text(attributes.caption.clone())]
        };
        Self::Container(ContainerNode::new(
            ContainerNodeKind::AttachmentFigure(Box::new(attributes)),
            children,
        ))
    }

    pub fn kind(&self) -> DomNodeKind {
        match self {
            Self::Container(c) => c.node_kind(),
            Self::Text(_) => DomNodeKind::Text,
        }
    }

    /// Number of positions the node occupies in its parent.
    pub fn node_size(&self) -> usize {
        match self {
            Self::Container(c) => c.content_size() + 2,
            Self::Text(t) => t.len(),
        }
    }

    pub fn as_container(&self) -> Option<&ContainerNode> {
        match self {
            Self::Container(c) => Some(c),
            Self::Text(_) => None,
        }
    }

    pub fn as_container_mut(&mut self) -> Option<&mut ContainerNode> {
        match self {
            Self::Container(c) => Some(c),
            Self::Text(_) => None,
        }
    }

    /// Text of the node and all its descendants.
    pub fn text_content(&self) -> String {
        match self {
            Self::Container(c) => c.text_content(),
            Self::Text(t) => t.data().to_owned(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn node_sizes_count_open_and_close_tokens() {
        assert_eq!(DomNode::new_paragraph("").node_size(), 2);
        assert_eq!(DomNode::new_paragraph("abc").node_size(), 5);
        let figure = DomNode::new_attachment_figure(
            AttachmentAttributes::default().with_caption("A"),
        );
        assert_eq!(figure.node_size(), 3);
        assert_eq!(DomNode::new_gallery(vec![figure]).node_size(), 5);
    }

    #[test]
    fn kinds_display_as_schema_names() {
        assert_eq!(DomNodeKind::Gallery.to_string(), "attachment-gallery");
        assert_eq!(DomNodeKind::AttachmentFigure.as_ref(), "attachment-figure");
        assert_eq!(DomNode::new_text("x").kind(), DomNodeKind::Text);
    }

    #[test]
    fn empty_caption_creates_no_text_child() {
        let figure =
            DomNode::new_attachment_figure(AttachmentAttributes::default());
        assert!(figure.as_container().unwrap().children().is_empty());
    }
}
