// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Attachment figures and galleries for a structured rich-text document.
//!
//! Markup is read into a [`Dom`] of paragraphs and attachment galleries,
//! edited through [`Transaction`]s (usually built by [`insert_attachments`])
//! and written back as canonical figure markup. [`ViewBinder`] renders
//! figures for the editing surface.

pub mod attachment;
pub mod commands;
pub mod config;
pub mod dom;
pub mod editor_state;
pub mod error;
pub mod schema;
pub mod transaction;
pub mod view;

pub use crate::attachment::{
    can_preview, extension_class, format_file_size, from_json, to_blob_json,
    type_class, AttachmentAttributes, AttachmentKind, CaptionPlaceholder,
    FileNamePlaceholder,
};
pub use crate::commands::{insert_attachments, AttachmentInput};
pub use crate::config::AttachmentConfig;
pub use crate::dom::nodes::{
    ContainerNode, ContainerNodeKind, DomNode, DomNodeKind, TextNode,
};
pub use crate::dom::{Dom, DomHandle, ResolvedPos};
pub use crate::editor_state::EditorState;
pub use crate::error::{ApplyError, InsertError};
pub use crate::schema::figure_to_html;
pub use crate::transaction::{Selection, Step, StepMap, Transaction};
pub use crate::view::{
    dimensions_loaded, figure_clicked, ClickTarget, FigureView, MediaDimensions,
    MediaRequest, ViewBinder, ViewChild, ViewElement,
};
