// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use attachments::{
    dimensions_loaded, figure_clicked, from_json, AttachmentConfig,
    AttachmentInput, ClickTarget, EditorState, MediaDimensions,
};
use serde_json::Value;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// An editor document with attachment galleries, driven from JavaScript.
#[wasm_bindgen]
pub struct AttachmentEditor {
    state: EditorState,
}

#[wasm_bindgen]
impl AttachmentEditor {
    #[wasm_bindgen(constructor)]
    pub fn new(html: &str) -> Self {
        Self {
            state: EditorState::from_html(html, AttachmentConfig::default()),
        }
    }

    pub fn select(&mut self, anchor: u32, head: u32) {
        self.state.select(anchor as usize, head as usize);
    }

    #[wasm_bindgen(getter)]
    pub fn anchor(&self) -> u32 {
        self.state.selection().anchor as u32
    }

    #[wasm_bindgen(getter)]
    pub fn head(&self) -> u32 {
        self.state.selection().head as u32
    }

    /// Takes one attributes object or an array of them, using the keys of
    /// the `data-trix-attachment` blob. Returns whether anything was
    /// inserted.
    pub fn insert_attachments(&mut self, json: &str) -> Result<bool, JsValue> {
        let input = parse_input(json).map_err(|e| JsValue::from_str(&e))?;
        Ok(self.state.insert_attachments(input))
    }

    /// Call when a figure is clicked. Returns whether the selection moved.
    pub fn click_figure(&mut self, pos: u32, on_caption: bool) -> bool {
        let target = if on_caption {
            ClickTarget::Caption
        } else {
            ClickTarget::Figure
        };
        match figure_clicked(|| Some(pos as usize), target) {
            Some(transaction) => self.state.dispatch(&transaction).is_ok(),
            None => false,
        }
    }

    /// Call once an image has loaded. `get_pos` is asked for the figure's
    /// current position and may return `undefined` if the figure is gone.
    pub fn dimensions_loaded(
        &mut self,
        get_pos: &js_sys::Function,
        width: u32,
        height: u32,
    ) -> bool {
        let position = || {
            get_pos
                .call0(&JsValue::NULL)
                .ok()
                .and_then(|value| value.as_f64())
                .filter(|pos| *pos >= 0.0)
                .map(|pos| pos as usize)
        };
        let dimensions = MediaDimensions { width, height };
        match dimensions_loaded(self.state.dom(), position, dimensions) {
            Some(transaction) => self.state.dispatch(&transaction).is_ok(),
            None => false,
        }
    }

    pub fn undo(&mut self) -> bool {
        self.state.undo()
    }

    pub fn redo(&mut self) -> bool {
        self.state.redo()
    }

    pub fn get_content_as_html(&self) -> String {
        self.state.to_html()
    }

    pub fn to_tree(&self) -> String {
        self.state.to_tree()
    }
}

fn parse_input(json: &str) -> Result<AttachmentInput, String> {
    match serde_json::from_str::<Value>(json) {
        Ok(Value::Array(items)) => {
            Ok(AttachmentInput::Multiple(items.iter().map(from_json).collect()))
        }
        Ok(value @ Value::Object(_)) => {
            Ok(AttachmentInput::Single(from_json(&value)))
        }
        Ok(other) => {
            Err(format!("Expected an object or an array, got {other}"))
        }
        Err(e) => Err(format!("Invalid attachment JSON: {e}")),
    }
}
