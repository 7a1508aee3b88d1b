// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Inserting attachments.
//!
//! New figures join a gallery the cursor is in, or one that ends just
//! before the empty paragraph holding the cursor. Otherwise the selection is
//! replaced by a new gallery, flanked by paragraphs that take over the text
//! before and after the selection.

use tracing::debug;

use crate::attachment::AttachmentAttributes;
use crate::dom::nodes::{DomNode, DomNodeKind};
use crate::dom::{Dom, ResolvedPos};
use crate::error::InsertError;
use crate::transaction::{Selection, Step, Transaction};

/// One attachment or several, in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttachmentInput {
    Single(AttachmentAttributes),
    Multiple(Vec<AttachmentAttributes>),
}

impl AttachmentInput {
    pub fn into_vec(self) -> Vec<AttachmentAttributes> {
        match self {
            Self::Single(attributes) => vec![attributes],
            Self::Multiple(attributes) => attributes,
        }
    }
}

impl From<AttachmentAttributes> for AttachmentInput {
    fn from(attributes: AttachmentAttributes) -> Self {
        Self::Single(attributes)
    }
}

impl From<Vec<AttachmentAttributes>> for AttachmentInput {
    fn from(attributes: Vec<AttachmentAttributes>) -> Self {
        Self::Multiple(attributes)
    }
}

/// The gallery containing `pos`, resolved at that position.
fn gallery_around(
    dom: &Dom,
    pos: usize,
) -> Result<Option<ResolvedPos>, InsertError> {
    let resolved = dom.resolve(pos)?;
    Ok((resolved.kind(1) == Some(DomNodeKind::Gallery)).then_some(resolved))
}

/// Builds the transaction inserting `input` at `selection`. Nothing is
/// applied; the caller dispatches the result.
pub fn insert_attachments(
    dom: &Dom,
    selection: &Selection,
    input: impl Into<AttachmentInput>,
) -> Result<Transaction, InsertError> {
    let attachments = input.into().into_vec();
    if attachments.is_empty() {
        return Err(InsertError::NoAttachments);
    }
    let figures: Vec<DomNode> = attachments
        .into_iter()
        .map(DomNode::new_attachment_figure)
        .collect();

    let anchor = selection.anchor;
    let current = gallery_around(dom, anchor)?;
    let after = match current {
        Some(_) => None,
        None => gallery_around(dom, anchor.saturating_sub(2))?,
    };

    if let Some(gallery) = current.or(after) {
        let pos = gallery.end(1);
        debug!(pos, count = figures.len(), "adding attachments to gallery");
        return Ok(Transaction::new().step(Step::Insert {
            pos,
            nodes: figures,
        }));
    }

    let from = selection.from();
    let to = selection.to();
    let gallery = DomNode::new_gallery(figures);
    let gallery_size = gallery.node_size();
    // The cursor goes to the start of the trailing paragraph. When `from`
    // is inside a paragraph the leading paragraph is that paragraph, so only
    // its close and the new paragraph's open lie before the gallery end.
    let cursor = if dom.resolve(from)?.depth() == 0 {
        from + 3 + gallery_size
    } else {
        from + 2 + gallery_size
    };
    debug!(from, to, cursor, "creating gallery");
    Ok(Transaction::new()
        .step(Step::ReplaceWithBlocks {
            from,
            to,
            blocks: vec![
                DomNode::new_paragraph(""),
                gallery,
                DomNode::new_paragraph(""),
            ],
        })
        .with_selection(Selection::cursor(cursor)))
}
