// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::nodes::DomNodeKind;

/// A step could not be applied to the document. The document the step was
/// applied to is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApplyError {
    #[error("Position {pos} is outside the document (size {size})")]
    PositionOutOfRange { pos: usize, size: usize },
    #[error("Position {0} is inside text, expected a node boundary")]
    NotANodeBoundary(usize),
    #[error("A {child} node is not allowed inside a {parent} node")]
    ContentNotAllowed {
        parent: DomNodeKind,
        child: DomNodeKind,
    },
    #[error("No node starts at position {0}")]
    NoNodeAt(usize),
    #[error("No attachment figure at position {0}")]
    NotAFigure(usize),
    #[error("Cannot replace {from}..{to}: {reason}")]
    UnsupportedReplace {
        from: usize,
        to: usize,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InsertError {
    #[error("No attachments to insert")]
    NoAttachments,
    #[error(transparent)]
    Apply(#[from] ApplyError),
}
