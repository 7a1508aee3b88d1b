// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Integer positions.
//!
//! The document's content starts at 0. Entering or leaving any container
//! costs one position and every UTF-16 code unit of text costs one, so a
//! position names either a boundary between two nodes or a point inside a
//! text run.

use super::nodes::{ContainerNode, DomNode, DomNodeKind};
use super::DomHandle;
use crate::error::ApplyError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLevel {
    pub handle: DomHandle,
    pub kind: DomNodeKind,
    /// Position where this node's content starts.
    pub start: usize,
    pub content_size: usize,
    /// Index of the child the position is at or inside.
    pub index: usize,
}

/// A position together with the chain of containers around it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPos {
    pub pos: usize,
    levels: Vec<ResolvedLevel>,
    /// Offset into the text child at `index(depth())`, when the position is
    /// strictly inside a text run.
    text_offset: Option<usize>,
}

impl ResolvedPos {
    pub(crate) fn resolve(
        document: &ContainerNode,
        pos: usize,
    ) -> Result<Self, ApplyError> {
        let size = document.content_size();
        if pos > size {
            return Err(ApplyError::PositionOutOfRange { pos, size });
        }

        let mut levels = Vec::new();
        let mut text_offset = None;
        let mut handle = DomHandle::root();
        let mut node = document;
        let mut start = 0;
        loop {
            let mut index = node.children().len();
            let mut descend = None;
            let mut child_start = start;
            for (i, child) in node.children().iter().enumerate() {
                let child_end = child_start + child.node_size();
                if pos == child_start {
                    index = i;
                    break;
                }
                if pos < child_end {
                    index = i;
                    match child {
                        DomNode::Text(_) => {
                            text_offset = Some(pos - child_start)
                        }
                        DomNode::Container(c) => {
                            descend = Some((c, child_start + 1))
                        }
                    }
                    break;
                }
                child_start = child_end;
            }
            levels.push(ResolvedLevel {
                handle: handle.clone(),
                kind: node.node_kind(),
                start,
                content_size: node.content_size(),
                index,
            });
            match descend {
                Some((child, child_content_start)) => {
                    handle = handle.child_handle(index);
                    node = child;
                    start = child_content_start;
                }
                None => break,
            }
        }

        Ok(Self {
            pos,
            levels,
            text_offset,
        })
    }

    /// Depth of the innermost container; 0 is the document.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    fn level(&self, depth: usize) -> &ResolvedLevel {
        &self.levels[depth]
    }

    /// Kind of the ancestor at `depth`, if the position is that deep.
    pub fn kind(&self, depth: usize) -> Option<DomNodeKind> {
        self.levels.get(depth).map(|l| l.kind)
    }

    pub fn parent_kind(&self) -> DomNodeKind {
        self.level(self.depth()).kind
    }

    /// Panics if `depth > self.depth()`.
    pub fn handle(&self, depth: usize) -> &DomHandle {
        &self.level(depth).handle
    }

    /// Start of the content of the ancestor at `depth`.
    pub fn start(&self, depth: usize) -> usize {
        self.level(depth).start
    }

    /// End of the content of the ancestor at `depth`.
    pub fn end(&self, depth: usize) -> usize {
        let level = self.level(depth);
        level.start + level.content_size
    }

    pub fn index(&self, depth: usize) -> usize {
        self.level(depth).index
    }

    pub fn text_offset(&self) -> Option<usize> {
        self.text_offset
    }

    /// Offset of the position into its parent's content.
    pub fn parent_offset(&self) -> usize {
        self.pos - self.start(self.depth())
    }

    pub fn is_node_boundary(&self) -> bool {
        self.text_offset.is_none()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::attachment::AttachmentAttributes;

    fn doc() -> ContainerNode {
        // 0 <p> 1 a 2 b 3 </p> 4 <gallery> 5 <figure> 6 C 7 </figure> 8
        // </gallery> 9
        ContainerNode::new_document(vec![
            DomNode::new_paragraph("ab"),
            DomNode::new_gallery(vec![DomNode::new_attachment_figure(
                AttachmentAttributes::default().with_caption("C"),
            )]),
        ])
    }

    #[test]
    fn resolves_document_boundaries() {
        let doc = doc();
        let start = ResolvedPos::resolve(&doc, 0).unwrap();
        assert_eq!(start.depth(), 0);
        assert_eq!(start.index(0), 0);
        let end = ResolvedPos::resolve(&doc, 9).unwrap();
        assert_eq!(end.depth(), 0);
        assert_eq!(end.index(0), 2);
        let between = ResolvedPos::resolve(&doc, 4).unwrap();
        assert_eq!(between.depth(), 0);
        assert_eq!(between.index(0), 1);
    }

    #[test]
    fn resolves_inside_text() {
        let pos = ResolvedPos::resolve(&doc(), 2).unwrap();
        assert_eq!(pos.depth(), 1);
        assert_eq!(pos.parent_kind(), DomNodeKind::Paragraph);
        assert_eq!(pos.text_offset(), Some(1));
        assert_eq!(pos.parent_offset(), 1);
        assert_eq!(pos.start(1), 1);
        assert_eq!(pos.end(1), 3);
        assert!(!pos.is_node_boundary());
    }

    #[test]
    fn resolves_inside_nested_containers() {
        let pos = ResolvedPos::resolve(&doc(), 7).unwrap();
        assert_eq!(pos.depth(), 2);
        assert_eq!(pos.kind(1), Some(DomNodeKind::Gallery));
        assert_eq!(pos.kind(2), Some(DomNodeKind::AttachmentFigure));
        assert_eq!(pos.kind(3), None);
        assert_eq!(pos.handle(2), &DomHandle::from_raw(vec![1, 0]));
        assert_eq!(pos.end(1), 8);
        assert_eq!(pos.index(2), 1);
    }

    #[test]
    fn gallery_content_end_is_a_boundary() {
        let pos = ResolvedPos::resolve(&doc(), 8).unwrap();
        assert_eq!(pos.depth(), 1);
        assert_eq!(pos.index(1), 1);
        assert!(pos.is_node_boundary());
    }

    #[test]
    fn out_of_range_is_an_error() {
        assert_eq!(
            ResolvedPos::resolve(&doc(), 10),
            Err(ApplyError::PositionOutOfRange { pos: 10, size: 9 })
        );
    }
}
