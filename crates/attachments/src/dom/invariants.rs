// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::nodes::container_node::allows_child;
use super::nodes::{ContainerNode, DomNode, DomNodeKind};
use super::{Dom, DomHandle};

impl Dom {
    /// Panics if the document breaks the schema. Run after every applied
    /// transaction when the `assert-invariants` feature is on.
    pub fn explicitly_assert_invariants(&self) {
        if let Err(problem) = self.check_invariants() {
            panic!("Document invariant broken: {problem}\n{}", self.to_tree());
        }
    }

    /// The first schema problem found, if any.
    pub fn check_invariants(&self) -> Result<(), String> {
        check_container(self.document(), &DomHandle::root())
    }
}

fn check_container(
    container: &ContainerNode,
    handle: &DomHandle,
) -> Result<(), String> {
    let kind = container.node_kind();
    if kind == DomNodeKind::Gallery && container.children().is_empty() {
        return Err(format!("empty gallery at {:?}", handle.raw()));
    }
    if kind == DomNodeKind::AttachmentFigure && container.children().len() > 1 {
        return Err(format!(
            "figure at {:?} has more than one caption run",
            handle.raw()
        ));
    }
    if let Some(attributes) = container.attachment_attributes() {
        if attributes.progress > 100 {
            return Err(format!("progress over 100 at {:?}", handle.raw()));
        }
    }

    let mut previous_was_text = false;
    for (i, child) in container.children().iter().enumerate() {
        let child_handle = handle.child_handle(i);
        if !allows_child(kind, child.kind()) {
            return Err(format!(
                "{} not allowed in {} at {:?}",
                child.kind(),
                kind,
                child_handle.raw()
            ));
        }
        match child {
            DomNode::Text(text) => {
                if text.is_empty() {
                    return Err(format!(
                        "empty text at {:?}",
                        child_handle.raw()
                    ));
                }
                if previous_was_text {
                    return Err(format!(
                        "adjacent text at {:?}",
                        child_handle.raw()
                    ));
                }
                previous_was_text = true;
            }
            DomNode::Container(c) => {
                previous_was_text = false;
                check_container(c, &child_handle)?;
            }
        }
    }
    Ok(())
}
