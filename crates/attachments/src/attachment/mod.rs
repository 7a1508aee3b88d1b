// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

pub mod attributes;
pub mod caption;
pub mod classes;
pub mod codec;

pub use attributes::{
    AttachmentAttributes, DEFAULT_CONTENT_TYPE, DEFAULT_PROGRESS,
};
pub use caption::{format_file_size, CaptionPlaceholder, FileNamePlaceholder};
pub use classes::{can_preview, extension_class, type_class, AttachmentKind};
pub use codec::{from_json, to_blob_json, to_presentation_json, Presentation};
