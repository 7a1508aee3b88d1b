// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Markup reading.
//!
//! html5ever builds a [`PaDom`], a flat arena of parsed nodes, through the
//! [`PaDomCreator`] tree sink. [`ElementRef`] gives read access to an element
//! of that arena (attributes, text content, `innerHTML`, ancestors), which is
//! what the attribute codec and the figure rules work against. `parse`
//! converts the arena into the editor [`crate::Dom`].

mod element_ref;
mod padom_creator;
mod panode_container;
mod parse;

use html5ever::{LocalName, Namespace, QualName};

pub(crate) use element_ref::ElementRef;
pub(crate) use padom_creator::PaDomCreator;
pub(crate) use panode_container::PaNodeContainer;
pub use parse::parse;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

pub(crate) fn paqual_name(local_name: &str) -> QualName {
    QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(local_name),
    )
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PaDomHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeText {
    pub(crate) content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PaDomNode {
    Document(PaNodeContainer),
    Container(PaNodeContainer),
    Text(PaNodeText),
    /// Comments and processing instructions. Kept so html5ever can address
    /// them, skipped by every reader.
    Ignored,
}

impl PaDomNode {
    pub(crate) fn children(&self) -> &[PaDomHandle] {
        match self {
            Self::Document(c) | Self::Container(c) => &c.children,
            Self::Text(_) | Self::Ignored => &[],
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<PaDomHandle>> {
        match self {
            Self::Document(c) | Self::Container(c) => Some(&mut c.children),
            Self::Text(_) | Self::Ignored => None,
        }
    }
}

/// Arena of parsed markup nodes. Handles stay valid for the arena's lifetime;
/// detached nodes are simply unreachable from the document.
#[derive(Clone, Debug)]
pub(crate) struct PaDom {
    nodes: Vec<PaDomNode>,
    parents: Vec<Option<PaDomHandle>>,
    document_handle: PaDomHandle,
    /// Name reported for nodes that are not elements.
    anonymous: QualName,
}

impl Default for PaDom {
    fn default() -> Self {
        Self::new()
    }
}

impl PaDom {
    pub(crate) fn new() -> Self {
        let anonymous = paqual_name("");
        Self {
            nodes: vec![PaDomNode::Document(PaNodeContainer::new(
                anonymous.clone(),
                Vec::new(),
            ))],
            parents: vec![None],
            document_handle: PaDomHandle(0),
            anonymous,
        }
    }

    pub(crate) fn document_handle(&self) -> &PaDomHandle {
        &self.document_handle
    }

    pub(crate) fn add_node(&mut self, node: PaDomNode) -> PaDomHandle {
        self.nodes.push(node);
        self.parents.push(None);
        PaDomHandle(self.nodes.len() - 1)
    }

    pub(crate) fn get_node(&self, handle: &PaDomHandle) -> &PaDomNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(
        &mut self,
        handle: &PaDomHandle,
    ) -> &mut PaDomNode {
        &mut self.nodes[handle.0]
    }

    pub(crate) fn name(&self, handle: &PaDomHandle) -> &QualName {
        match self.get_node(handle) {
            PaDomNode::Container(c) => &c.name,
            _ => &self.anonymous,
        }
    }

    pub(crate) fn parent(&self, handle: &PaDomHandle) -> Option<&PaDomHandle> {
        self.parents[handle.0].as_ref()
    }

    pub(crate) fn children(&self, handle: &PaDomHandle) -> &[PaDomHandle] {
        self.get_node(handle).children()
    }

    pub(crate) fn element(
        &self,
        handle: &PaDomHandle,
    ) -> Option<ElementRef<'_>> {
        ElementRef::new(self, handle.clone())
    }

    /// The elements directly under the document. Fragment parsing wraps the
    /// input in an `html` element, which is skipped here.
    pub(crate) fn top_level(&self) -> Vec<PaDomHandle> {
        let children = self.children(&self.document_handle);
        match children {
            [only] if self.name(only).local.as_ref() == "html" => {
                self.children(only).to_vec()
            }
            _ => children.to_vec(),
        }
    }

    /// Removes `child` from its current parent, if any.
    pub(crate) fn detach(&mut self, child: &PaDomHandle) {
        if let Some(parent) = self.parents[child.0].take() {
            if let Some(siblings) = self.nodes[parent.0].children_mut() {
                siblings.retain(|h| h != child);
            }
        }
    }

    pub(crate) fn append_child(
        &mut self,
        parent: &PaDomHandle,
        child: PaDomHandle,
    ) {
        self.detach(&child);
        if let Some(children) = self.nodes[parent.0].children_mut() {
            children.push(child.clone());
            self.parents[child.0] = Some(parent.clone());
        }
    }

    pub(crate) fn insert_before(
        &mut self,
        sibling: &PaDomHandle,
        child: PaDomHandle,
    ) {
        let Some(parent) = self.parent(sibling).cloned() else {
            return;
        };
        self.detach(&child);
        if let Some(children) = self.nodes[parent.0].children_mut() {
            let index = children
                .iter()
                .position(|h| h == sibling)
                .unwrap_or(children.len());
            children.insert(index, child.clone());
            self.parents[child.0] = Some(parent);
        }
    }

    /// Appends text to `parent`, merging into a trailing text node.
    pub(crate) fn append_text(&mut self, parent: &PaDomHandle, text: &str) {
        let last = self.children(parent).last().cloned();
        if let Some(last) = last {
            if let PaDomNode::Text(t) = self.get_mut_node(&last) {
                t.content += text;
                return;
            }
        }
        let handle = self.add_node(PaDomNode::Text(PaNodeText {
            content: text.to_owned(),
        }));
        self.append_child(parent, handle);
    }

    /// Inserts text before `sibling`, merging into a preceding text node.
    pub(crate) fn insert_text_before(
        &mut self,
        sibling: &PaDomHandle,
        text: &str,
    ) {
        let previous = self.parent(sibling).and_then(|parent| {
            let siblings = self.children(parent);
            let index = siblings.iter().position(|h| h == sibling)?;
            index.checked_sub(1).map(|i| siblings[i].clone())
        });
        if let Some(previous) = previous {
            if let PaDomNode::Text(t) = self.get_mut_node(&previous) {
                t.content += text;
                return;
            }
        }
        let handle = self.add_node(PaDomNode::Text(PaNodeText {
            content: text.to_owned(),
        }));
        self.insert_before(sibling, handle);
    }

    pub(crate) fn reparent_children(
        &mut self,
        from: &PaDomHandle,
        to: &PaDomHandle,
    ) {
        for child in self.children(from).to_vec() {
            self.append_child(to, child);
        }
    }
}
