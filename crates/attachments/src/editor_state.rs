// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use tracing::{debug, warn};

use crate::commands::{self, AttachmentInput};
use crate::config::AttachmentConfig;
use crate::dom::Dom;
use crate::error::ApplyError;
use crate::transaction::{Selection, Transaction};

/// A document, its selection and its history. Transactions are applied one
/// at a time; a failed transaction leaves everything as it was.
#[derive(Clone, Debug)]
pub struct EditorState {
    dom: Dom,
    selection: Selection,
    config: AttachmentConfig,
    undo_stack: Vec<(Dom, Selection)>,
    redo_stack: Vec<(Dom, Selection)>,
}

impl EditorState {
    pub fn new(config: AttachmentConfig) -> Self {
        Self::with_dom(Dom::default(), config)
    }

    pub fn from_html(html: &str, config: AttachmentConfig) -> Self {
        Self::with_dom(Dom::from_html(html, &config), config)
    }

    pub fn with_dom(dom: Dom, config: AttachmentConfig) -> Self {
        Self {
            dom,
            selection: Selection::default(),
            config,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn config(&self) -> &AttachmentConfig {
        &self.config
    }

    /// Sets the selection, clamped to the document.
    pub fn select(&mut self, anchor: usize, head: usize) {
        self.selection =
            Selection::new(anchor, head).clamp(self.dom.content_size());
    }

    /// Applies `transaction`. Edits are recorded for undo; selection-only
    /// transactions are not.
    pub fn dispatch(
        &mut self,
        transaction: &Transaction,
    ) -> Result<(), ApplyError> {
        let (dom, selection) = self.dom.apply(transaction, self.selection)?;
        if transaction.doc_changed() {
            let previous = std::mem::replace(&mut self.dom, dom);
            self.undo_stack.push((previous, self.selection));
            self.redo_stack.clear();
        }
        self.selection = selection;
        Ok(())
    }

    /// Inserts attachments at the selection. Returns whether the document
    /// changed.
    pub fn insert_attachments(
        &mut self,
        input: impl Into<AttachmentInput>,
    ) -> bool {
        let inserted =
            commands::insert_attachments(&self.dom, &self.selection, input);
        let transaction = match inserted {
            Ok(transaction) => transaction,
            Err(error) => {
                debug!(%error, "not inserting attachments");
                return false;
            }
        };
        match self.dispatch(&transaction) {
            Ok(()) => true,
            Err(error) => {
                warn!(%error, "failed to insert attachments");
                false
            }
        }
    }

    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some((dom, selection)) => {
                let current = std::mem::replace(&mut self.dom, dom);
                self.redo_stack.push((current, self.selection));
                self.selection = selection;
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some((dom, selection)) => {
                let current = std::mem::replace(&mut self.dom, dom);
                self.undo_stack.push((current, self.selection));
                self.selection = selection;
                true
            }
            None => false,
        }
    }

    pub fn to_html(&self) -> String {
        self.dom.to_html(&self.config)
    }

    pub fn to_tree(&self) -> String {
        self.dom.to_tree()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::attachment::AttachmentAttributes;

    fn image() -> AttachmentAttributes {
        AttachmentAttributes::new("/a.png", "image/png")
    }

    #[test]
    fn insert_then_undo_and_redo() {
        let mut state = EditorState::new(AttachmentConfig::default());
        state.select(1, 1);
        let before = state.dom().clone();

        assert!(state.insert_attachments(image()));
        let after = state.dom().clone();
        assert_eq!(state.selection(), Selection::cursor(7));

        assert!(state.undo());
        assert_eq!(state.dom(), &before);
        assert_eq!(state.selection(), Selection::cursor(1));
        assert!(!state.undo());

        assert!(state.redo());
        assert_eq!(state.dom(), &after);
        assert_eq!(state.selection(), Selection::cursor(7));
        assert!(!state.redo());
    }

    #[test]
    fn empty_insert_changes_nothing() {
        let mut state = EditorState::new(AttachmentConfig::default());
        assert!(!state.insert_attachments(Vec::<AttachmentAttributes>::new()));
        assert!(!state.undo());
    }

    #[test]
    fn selection_changes_are_not_undoable() {
        let mut state =
            EditorState::from_html("<p>abc</p>", AttachmentConfig::default());
        state
            .dispatch(&Transaction::new().with_selection(Selection::cursor(2)))
            .unwrap();
        assert_eq!(state.selection(), Selection::cursor(2));
        assert!(!state.undo());
    }

    #[test]
    fn select_is_clamped() {
        let mut state =
            EditorState::from_html("<p>abc</p>", AttachmentConfig::default());
        state.select(1, 50);
        assert_eq!(state.selection(), Selection::new(1, 5));
    }

    #[test]
    fn new_edits_clear_redo() {
        let mut state = EditorState::new(AttachmentConfig::default());
        state.select(1, 1);
        assert!(state.insert_attachments(image()));
        assert!(state.undo());
        assert!(state.insert_attachments(image()));
        assert!(!state.redo());
    }
}
