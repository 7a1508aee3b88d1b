// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Document edits.
//!
//! A [`Transaction`] is an ordered list of [`Step`]s plus an optional
//! selection to set once they have been applied. Each step reports a
//! [`StepMap`] describing which range it replaced, which is how positions
//! held elsewhere (the selection, a view's position) follow the edit.

use crate::attachment::AttachmentAttributes;
use crate::dom::nodes::container_node::allows_child;
use crate::dom::nodes::{DomNode, DomNodeKind, TextNode};
use crate::dom::{Dom, ResolvedPos};
use crate::error::ApplyError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.head
    }

    pub fn map(&self, map: &StepMap) -> Self {
        Self::new(map.map(self.anchor), map.map(self.head))
    }

    /// Clamps both ends into `0..=size`.
    pub fn clamp(&self, size: usize) -> Self {
        Self::new(self.anchor.min(size), self.head.min(size))
    }
}

/// The range `start..start + old_size` was replaced by `new_size` positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StepMap {
    pub start: usize,
    pub old_size: usize,
    pub new_size: usize,
}

impl StepMap {
    pub fn identity(start: usize) -> Self {
        Self {
            start,
            old_size: 0,
            new_size: 0,
        }
    }

    /// Positions before the range stay, positions inside it move to the end
    /// of the new content and positions after it shift by the size change.
    /// A position exactly at an insertion point ends up after the insertion.
    pub fn map(&self, pos: usize) -> usize {
        if pos < self.start {
            pos
        } else if pos < self.start + self.old_size {
            self.start + self.new_size
        } else {
            pos - self.old_size + self.new_size
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Inserts nodes at a node boundary.
    Insert { pos: usize, nodes: Vec<DomNode> },
    /// Replaces `from..to` with top-level blocks. When an end lies inside a
    /// paragraph, the text before `from` is prepended to the first block and
    /// the text after `to` appended to the last, so both must be paragraphs.
    ReplaceWithBlocks {
        from: usize,
        to: usize,
        blocks: Vec<DomNode>,
    },
    /// Replaces the attributes of the figure starting at `pos`. The caption
    /// is left alone.
    SetAttachmentAttributes {
        pos: usize,
        attributes: AttachmentAttributes,
    },
    /// Removes the node starting at `pos`.
    DeleteNode { pos: usize },
}

impl Step {
    pub(crate) fn apply(&self, dom: &mut Dom) -> Result<StepMap, ApplyError> {
        match self {
            Self::Insert { pos, nodes } => insert(dom, *pos, nodes),
            Self::ReplaceWithBlocks { from, to, blocks } => {
                replace_with_blocks(dom, *from, *to, blocks)
            }
            Self::SetAttachmentAttributes { pos, attributes } => {
                let handle = dom
                    .figure_at(*pos)
                    .map(|(handle, _)| handle)
                    .ok_or(ApplyError::NotAFigure(*pos))?;
                let figure = dom
                    .lookup_container_mut(&handle)
                    .ok_or(ApplyError::NotAFigure(*pos))?;
                figure.set_attachment_attributes(attributes.clone());
                Ok(StepMap::identity(*pos))
            }
            Self::DeleteNode { pos } => {
                let resolved = boundary(dom, *pos)?;
                let depth = resolved.depth();
                let index = resolved.index(depth);
                let parent = dom
                    .lookup_container_mut(resolved.handle(depth))
                    .ok_or(ApplyError::NoNodeAt(*pos))?;
                if index >= parent.children().len() {
                    return Err(ApplyError::NoNodeAt(*pos));
                }
                let removed = parent.children_mut().remove(index);
                Ok(StepMap {
                    start: *pos,
                    old_size: removed.node_size(),
                    new_size: 0,
                })
            }
        }
    }
}

fn boundary(dom: &Dom, pos: usize) -> Result<ResolvedPos, ApplyError> {
    let resolved = dom.resolve(pos)?;
    if resolved.is_node_boundary() {
        Ok(resolved)
    } else {
        Err(ApplyError::NotANodeBoundary(pos))
    }
}

fn check_allowed(
    parent: DomNodeKind,
    nodes: &[DomNode],
) -> Result<(), ApplyError> {
    match nodes.iter().find(|n| !allows_child(parent, n.kind())) {
        Some(node) => Err(ApplyError::ContentNotAllowed {
            parent,
            child: node.kind(),
        }),
        None => Ok(()),
    }
}

fn insert(
    dom: &mut Dom,
    pos: usize,
    nodes: &[DomNode],
) -> Result<StepMap, ApplyError> {
    let resolved = boundary(dom, pos)?;
    let depth = resolved.depth();
    check_allowed(resolved.parent_kind(), nodes)?;

    let index = resolved.index(depth);
    let parent = dom
        .lookup_container_mut(resolved.handle(depth))
        .ok_or(ApplyError::NotANodeBoundary(pos))?;
    parent
        .children_mut()
        .splice(index..index, nodes.iter().cloned());

    Ok(StepMap {
        start: pos,
        old_size: 0,
        new_size: nodes.iter().map(DomNode::node_size).sum(),
    })
}

/// Where one end of a block replacement cuts the document.
enum Cut {
    /// Between top-level blocks, before the block at `index`.
    Boundary { index: usize },
    /// Inside the paragraph at `index`, at a UTF-16 `offset` into its text.
    InParagraph { index: usize, offset: usize },
}

fn cut(
    resolved: &ResolvedPos,
    from: usize,
    to: usize,
) -> Result<Cut, ApplyError> {
    match (resolved.depth(), resolved.parent_kind()) {
        (0, _) => Ok(Cut::Boundary {
            index: resolved.index(0),
        }),
        (1, DomNodeKind::Paragraph) => Ok(Cut::InParagraph {
            index: resolved.index(0),
            offset: resolved.parent_offset(),
        }),
        _ => Err(ApplyError::UnsupportedReplace {
            from,
            to,
            reason: "an end lies inside a block that is not a paragraph",
        }),
    }
}

fn paragraph_text(dom: &Dom, index: usize) -> TextNode {
    let text = dom
        .document()
        .get_child(index)
        .map(DomNode::text_content)
        .unwrap_or_default();
    TextNode::from(text)
}

fn replace_with_blocks(
    dom: &mut Dom,
    from: usize,
    to: usize,
    blocks: &[DomNode],
) -> Result<StepMap, ApplyError> {
    if from > to {
        return Err(ApplyError::UnsupportedReplace {
            from,
            to,
            reason: "the range is reversed",
        });
    }
    check_allowed(DomNodeKind::Document, blocks)?;
    let from_cut = cut(&dom.resolve(from)?, from, to)?;
    let to_cut = cut(&dom.resolve(to)?, from, to)?;

    let (first, head) = match from_cut {
        Cut::Boundary { index } => (index, None),
        Cut::InParagraph { index, offset } => {
            let text = paragraph_text(dom, index);
            let head = text.split_at(offset).0.to_owned();
            (index, Some(head))
        }
    };
    let (end, tail) = match to_cut {
        Cut::Boundary { index } => (index, None),
        Cut::InParagraph { index, offset } => {
            let text = paragraph_text(dom, index);
            let tail = text.split_at(offset).1.to_owned();
            (index + 1, Some(tail))
        }
    };

    let mut blocks = blocks.to_vec();
    let starts_with_paragraph =
        blocks.first().map(DomNode::kind) == Some(DomNodeKind::Paragraph);
    let ends_with_paragraph =
        blocks.last().map(DomNode::kind) == Some(DomNodeKind::Paragraph);
    if (head.is_some() && !starts_with_paragraph)
        || (tail.is_some() && !ends_with_paragraph)
    {
        return Err(ApplyError::UnsupportedReplace {
            from,
            to,
            reason: "text around the range needs a paragraph to go into",
        });
    }
    if let Some(head) = head {
        if let Some(paragraph) =
            blocks.first_mut().and_then(DomNode::as_container_mut)
        {
            paragraph.prepend_text(&head);
        }
    }
    if let Some(tail) = tail {
        if let Some(paragraph) =
            blocks.last_mut().and_then(DomNode::as_container_mut)
        {
            paragraph.append_text(&tail);
        }
    }

    let new_total: usize = blocks.iter().map(DomNode::node_size).sum();
    let children = dom.document_mut().children_mut();
    let old_total: usize =
        children[first..end].iter().map(DomNode::node_size).sum();
    children.splice(first..end, blocks);

    Ok(StepMap {
        start: from,
        old_size: to - from,
        new_size: (new_total + (to - from)).saturating_sub(old_total),
    })
}

/// Steps to apply as one undoable edit, and the selection to set after.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Transaction {
    steps: Vec<Step>,
    selection: Option<Selection>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = Some(selection);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn figure(caption: &str) -> DomNode {
        DomNode::new_attachment_figure(
            AttachmentAttributes::new("/a.png", "image/png")
                .with_caption(caption),
        )
    }

    #[test]
    fn step_map_moves_positions_after_an_insertion() {
        let map = StepMap {
            start: 4,
            old_size: 0,
            new_size: 3,
        };
        assert_eq!(map.map(3), 3);
        assert_eq!(map.map(4), 7);
        assert_eq!(map.map(5), 8);
    }

    #[test]
    fn step_map_collapses_a_replaced_range() {
        let map = StepMap {
            start: 2,
            old_size: 4,
            new_size: 1,
        };
        assert_eq!(map.map(1), 1);
        assert_eq!(map.map(2), 3);
        assert_eq!(map.map(4), 3);
        assert_eq!(map.map(6), 3);
        assert_eq!(map.map(9), 6);
    }

    #[test]
    fn identity_map_keeps_positions() {
        let map = StepMap::identity(5);
        assert_eq!(map.map(5), 5);
        assert_eq!(map.map(9), 9);
    }

    #[test]
    fn insert_requires_a_boundary() {
        let mut dom = Dom::new(vec![DomNode::new_paragraph("abc")]);
        let step = Step::Insert {
            pos: 2,
            nodes: vec![DomNode::new_paragraph("")],
        };
        assert_eq!(step.apply(&mut dom), Err(ApplyError::NotANodeBoundary(2)));
    }

    #[test]
    fn insert_checks_the_schema() {
        let mut dom = Dom::new(vec![DomNode::new_paragraph("")]);
        let step = Step::Insert {
            pos: 0,
            nodes: vec![figure("x")],
        };
        assert_eq!(
            step.apply(&mut dom),
            Err(ApplyError::ContentNotAllowed {
                parent: DomNodeKind::Document,
                child: DomNodeKind::AttachmentFigure,
            })
        );
    }

    #[test]
    fn replace_splits_a_paragraph_around_new_blocks() {
        let mut dom = Dom::new(vec![DomNode::new_paragraph("abcd")]);
        let step = Step::ReplaceWithBlocks {
            from: 2,
            to: 4,
            blocks: vec![
                DomNode::new_paragraph(""),
                DomNode::new_gallery(vec![figure("")]),
                DomNode::new_paragraph(""),
            ],
        };
        let map = step.apply(&mut dom).unwrap();
        assert_eq!(
            dom.document().children(),
            &vec![
                DomNode::new_paragraph("a"),
                DomNode::new_gallery(vec![figure("")]),
                DomNode::new_paragraph("d"),
            ]
        );
        // Text after the range keeps following the edit.
        assert_eq!(map.map(4), 8);
        let after = dom.resolve(8).unwrap();
        assert_eq!(after.parent_kind(), DomNodeKind::Paragraph);
        assert_eq!(after.parent_offset(), 0);
    }

    #[test]
    fn replace_rejects_ends_inside_a_gallery() {
        let mut dom = Dom::new(vec![
            DomNode::new_paragraph("a"),
            DomNode::new_gallery(vec![figure("")]),
        ]);
        let step = Step::ReplaceWithBlocks {
            from: 1,
            to: 4,
            blocks: vec![DomNode::new_paragraph("")],
        };
        assert!(matches!(
            step.apply(&mut dom),
            Err(ApplyError::UnsupportedReplace { from: 1, to: 4, .. })
        ));
    }

    #[test]
    fn set_attributes_needs_a_figure() {
        let mut dom = Dom::new(vec![DomNode::new_paragraph("")]);
        let step = Step::SetAttachmentAttributes {
            pos: 0,
            attributes: AttachmentAttributes::default(),
        };
        assert_eq!(step.apply(&mut dom), Err(ApplyError::NotAFigure(0)));
    }

    #[test]
    fn delete_removes_the_node_at_a_position() {
        let mut dom = Dom::new(vec![
            DomNode::new_gallery(vec![figure("a"), figure("b")]),
            DomNode::new_paragraph(""),
        ]);
        let map = Step::DeleteNode { pos: 1 }.apply(&mut dom).unwrap();
        assert_eq!(
            dom.document().children(),
            &vec![
                DomNode::new_gallery(vec![figure("b")]),
                DomNode::new_paragraph(""),
            ]
        );
        assert_eq!(map.map(8), 5);
    }

    #[test]
    fn selection_orders_its_ends() {
        let selection = Selection::new(7, 2);
        assert_eq!(selection.from(), 2);
        assert_eq!(selection.to(), 7);
        assert!(!selection.is_collapsed());
        assert!(Selection::cursor(3).is_collapsed());
    }
}
