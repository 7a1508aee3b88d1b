// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{DomNode, DomNodeKind, TextNode};
use crate::attachment::AttachmentAttributes;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerNodeKind {
    Document,
    Paragraph,
    Gallery,
    /// The stored attributes. Their caption is kept in step with the text
    /// child, which is what editing changes.
    AttachmentFigure(Box<AttachmentAttributes>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerNode {
    kind: ContainerNodeKind,
    children: Vec<DomNode>,
}

impl ContainerNode {
    pub fn new(kind: ContainerNodeKind, children: Vec<DomNode>) -> Self {
        Self { kind, children }
    }

    pub fn new_document(children: Vec<DomNode>) -> Self {
        Self::new(ContainerNodeKind::Document, children)
    }

    pub fn kind(&self) -> &ContainerNodeKind {
        &self.kind
    }

    pub fn node_kind(&self) -> DomNodeKind {
        match self.kind {
            ContainerNodeKind::Document => DomNodeKind::Document,
            ContainerNodeKind::Paragraph => DomNodeKind::Paragraph,
            ContainerNodeKind::Gallery => DomNodeKind::Gallery,
            ContainerNodeKind::AttachmentFigure(_) => {
                DomNodeKind::AttachmentFigure
            }
        }
    }

    pub fn children(&self) -> &Vec<DomNode> {
        &self.children
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<DomNode> {
        &mut self.children
    }

    pub fn get_child(&self, index: usize) -> Option<&DomNode> {
        self.children.get(index)
    }

    pub fn content_size(&self) -> usize {
        self.children.iter().map(DomNode::node_size).sum()
    }

    /// Whether a node of kind `child` may appear directly inside this node.
    pub fn allows_child(&self, child: DomNodeKind) -> bool {
        allows_child(self.node_kind(), child)
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(DomNode::text_content).collect()
    }

    /// The figure's attributes with the caption read from its text child.
    pub fn attachment_attributes(&self) -> Option<AttachmentAttributes> {
        match &self.kind {
            ContainerNodeKind::AttachmentFigure(stored) => {
                let mut attributes = stored.as_ref().clone();
                attributes.caption = self.text_content();
                Some(attributes)
            }
            _ => None,
        }
    }

    /// Replaces a figure's attributes. The caption is not changed: it
    /// belongs to the text child. Returns false on anything but a figure.
    pub fn set_attachment_attributes(
        &mut self,
        attributes: AttachmentAttributes,
    ) -> bool {
        let caption = self.text_content();
        match &mut self.kind {
            ContainerNodeKind::AttachmentFigure(stored) => {
                **stored = AttachmentAttributes {
                    caption,
                    ..attributes
                };
                true
            }
            _ => false,
        }
    }

    pub(crate) fn sync_caption(&mut self) {
        let caption = self.text_content();
        if let ContainerNodeKind::AttachmentFigure(stored) = &mut self.kind {
            stored.caption = caption;
        }
    }

    /// Merges neighbouring text children and drops empty ones.
    pub(crate) fn merge_text_children(&mut self) {
        let mut merged: Vec<DomNode> = Vec::with_capacity(self.children.len());
        for child in self.children.drain(..) {
            if let DomNode::Text(t) = &child {
                if t.is_empty() {
                    continue;
                }
                if let Some(DomNode::Text(previous)) = merged.last_mut() {
                    previous.push_str(t.data());
                    continue;
                }
            }
            merged.push(child);
        }
        self.children = merged;
    }

    pub(crate) fn prepend_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.children.insert(0, DomNode::Text(TextNode::from(text)));
            self.merge_text_children();
        }
    }

    pub(crate) fn append_text(&mut self, text: &str) {
        if !text.is_empty() {
            self.children.push(DomNode::Text(TextNode::from(text)));
            self.merge_text_children();
        }
    }
}

pub(crate) fn allows_child(parent: DomNodeKind, child: DomNodeKind) -> bool {
    use DomNodeKind::*;
    matches!(
        (parent, child),
        (Document, Paragraph | Gallery)
            | (Paragraph, Text)
            | (Gallery, AttachmentFigure)
            | (AttachmentFigure, Text)
    )
}

#[cfg(test)]
mod test {
    use super::*;

    fn figure(caption: &str) -> ContainerNode {
        match DomNode::new_attachment_figure(
            AttachmentAttributes::new("/a.png", "image/png")
                .with_caption(caption),
        ) {
            DomNode::Container(c) => c,
            DomNode::Text(_) => unreachable!(),
        }
    }

    #[test]
    fn caption_comes_from_the_text_child() {
        let mut figure = figure("old");
        figure.children_mut()[0] = DomNode::new_text("new");
        assert_eq!(figure.attachment_attributes().unwrap().caption, "new");
    }

    #[test]
    fn setting_attributes_keeps_the_caption() {
        let mut figure = figure("kept");
        let replaced = AttachmentAttributes::new("/b.png", "image/png")
            .with_caption("ignored")
            .with_dimensions("1", "2");
        assert!(figure.set_attachment_attributes(replaced));
        let attributes = figure.attachment_attributes().unwrap();
        assert_eq!(attributes.caption, "kept");
        assert_eq!(attributes.src, "/b.png");
        assert_eq!(attributes.width, "1");
    }

    #[test]
    fn paragraphs_have_no_attributes() {
        let mut paragraph =
            ContainerNode::new(ContainerNodeKind::Paragraph, vec![]);
        assert!(paragraph.attachment_attributes().is_none());
        assert!(!paragraph
            .set_attachment_attributes(AttachmentAttributes::default()));
    }

    #[test]
    fn schema_containment() {
        use DomNodeKind::{AttachmentFigure, Document, Gallery, Paragraph};
        assert!(allows_child(Document, Gallery));
        assert!(allows_child(Gallery, AttachmentFigure));
        assert!(!allows_child(Gallery, Paragraph));
        assert!(!allows_child(Document, AttachmentFigure));
        assert!(!allows_child(AttachmentFigure, Paragraph));
    }

    #[test]
    fn merging_joins_adjacent_text_and_drops_empty_text() {
        let mut paragraph = ContainerNode::new(
            ContainerNodeKind::Paragraph,
            vec![
                DomNode::new_text("a"),
                DomNode::new_text(""),
                DomNode::new_text("b"),
            ],
        );
        paragraph.merge_text_children();
        assert_eq!(paragraph.children(), &vec![DomNode::new_text("ab")]);
    }
}
