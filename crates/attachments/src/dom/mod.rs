// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

pub mod dom_handle;
pub mod invariants;
pub mod nodes;
pub mod parser;
pub mod position;
pub mod to_html;
pub mod to_tree;

pub use dom_handle::DomHandle;
pub use position::ResolvedPos;

use tracing::debug;

use crate::attachment::AttachmentAttributes;
use crate::config::AttachmentConfig;
use crate::error::ApplyError;
use crate::transaction::{Selection, StepMap, Transaction};
use nodes::{ContainerNode, DomNode, DomNodeKind};

/// The editor document: a list of paragraphs and attachment galleries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dom {
    document: ContainerNode,
}

impl Default for Dom {
    /// A document holding one empty paragraph.
    fn default() -> Self {
        Self::new(vec![DomNode::new_paragraph("")])
    }
}

impl Dom {
    pub fn new(children: Vec<DomNode>) -> Self {
        Self {
            document: ContainerNode::new_document(children),
        }
    }

    pub fn from_html(html: &str, config: &AttachmentConfig) -> Self {
        parser::parse(html, config)
    }

    pub fn document(&self) -> &ContainerNode {
        &self.document
    }

    pub(crate) fn document_mut(&mut self) -> &mut ContainerNode {
        &mut self.document
    }

    pub fn content_size(&self) -> usize {
        self.document.content_size()
    }

    /// The node at `handle`. The root handle names the document, which is
    /// not a [`DomNode`], so it yields `None`.
    pub fn lookup_node(&self, handle: &DomHandle) -> Option<&DomNode> {
        let (last, path) = handle.raw().split_last()?;
        let mut container = &self.document;
        for index in path {
            container = container.get_child(*index)?.as_container()?;
        }
        container.get_child(*last)
    }

    pub fn lookup_container(
        &self,
        handle: &DomHandle,
    ) -> Option<&ContainerNode> {
        if handle.is_root() {
            Some(&self.document)
        } else {
            self.lookup_node(handle)?.as_container()
        }
    }

    pub(crate) fn lookup_container_mut(
        &mut self,
        handle: &DomHandle,
    ) -> Option<&mut ContainerNode> {
        let mut container = &mut self.document;
        for index in handle.raw() {
            container = container
                .children_mut()
                .get_mut(*index)?
                .as_container_mut()?;
        }
        Some(container)
    }

    pub fn resolve(&self, pos: usize) -> Result<ResolvedPos, ApplyError> {
        ResolvedPos::resolve(&self.document, pos)
    }

    /// The node starting at `pos`, if `pos` is just before a node.
    pub fn node_at(&self, pos: usize) -> Option<(DomHandle, &DomNode)> {
        let resolved = self.resolve(pos).ok()?;
        if !resolved.is_node_boundary() {
            return None;
        }
        let depth = resolved.depth();
        let handle = resolved.handle(depth).child_handle(resolved.index(depth));
        let node = self.lookup_node(&handle)?;
        Some((handle, node))
    }

    /// The attachment figure starting at `pos`.
    pub fn figure_at(&self, pos: usize) -> Option<(DomHandle, &ContainerNode)> {
        match self.node_at(pos)? {
            (handle, DomNode::Container(c))
                if c.node_kind() == DomNodeKind::AttachmentFigure =>
            {
                Some((handle, c))
            }
            _ => None,
        }
    }

    pub fn attachment_at(&self, pos: usize) -> Option<AttachmentAttributes> {
        self.figure_at(pos)?.1.attachment_attributes()
    }

    /// Position just before the node at `handle`.
    pub fn position_of(&self, handle: &DomHandle) -> Option<usize> {
        let mut pos = 0;
        let mut container = &self.document;
        for (depth, index) in handle.raw().iter().enumerate() {
            if depth > 0 {
                pos += 1;
            }
            let children = container.children();
            if *index >= children.len() {
                return None;
            }
            pos += children[..*index]
                .iter()
                .map(DomNode::node_size)
                .sum::<usize>();
            if depth + 1 < handle.depth() {
                container = children[*index].as_container()?;
            }
        }
        Some(pos)
    }

    /// Applies `transaction` to a copy of this document. Nothing is changed
    /// unless every step succeeds.
    pub fn apply(
        &self,
        transaction: &Transaction,
        selection: Selection,
    ) -> Result<(Dom, Selection), ApplyError> {
        let mut dom = self.clone();
        let mut selection = selection;
        for step in transaction.steps() {
            let map = step.apply(&mut dom)?;
            selection = selection.map(&map);
        }
        if let Some(explicit) = transaction.selection() {
            selection = explicit;
        }
        for map in dom.normalize() {
            selection = selection.map(&map);
        }
        let selection = selection.clamp(dom.content_size());

        #[cfg(feature = "assert-invariants")]
        dom.explicitly_assert_invariants();

        Ok((dom, selection))
    }

    /// Dissolves empty galleries, merges neighbouring text and keeps figure
    /// captions in step with their text. Returns the maps of the removals.
    pub(crate) fn normalize(&mut self) -> Vec<StepMap> {
        let mut maps = Vec::new();
        let mut pos = 0;
        let mut kept = Vec::with_capacity(self.document.children().len());
        for mut block in self.document.children_mut().drain(..) {
            let size = block.node_size();
            if block.kind() == DomNodeKind::Gallery && size == 2 {
                debug!(pos, "dissolving empty gallery");
                maps.push(StepMap {
                    start: pos,
                    old_size: size,
                    new_size: 0,
                });
                continue;
            }
            if let Some(container) = block.as_container_mut() {
                normalize_container(container);
            }
            pos += size;
            kept.push(block);
        }
        *self.document.children_mut() = kept;
        maps
    }
}

fn normalize_container(container: &mut ContainerNode) {
    container.merge_text_children();
    container.sync_caption();
    for child in container.children_mut() {
        if let Some(child) = child.as_container_mut() {
            normalize_container(child);
        }
    }
}
