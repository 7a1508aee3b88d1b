// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! CSS class helpers shared by the markup serializer and the view binder.
//!
//! The previewable rule matches the one used by Trix, so markup produced by
//! either editor classifies attachments the same way.

use once_cell::sync::Lazy;
use regex::Regex;
use strum_macros::{Display, EnumString, IntoStaticStr};

/// Prefix of every modifier class added to an attachment figure.
pub const CLASS_PREFIX: &str = "attachment--";

static PREVIEWABLE_CONTENT_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^image(/(gif|png|jpe?g))?$")
        .expect("previewable content type pattern is valid")
});

static FILE_EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.(\w+)$").expect("file extension pattern is valid")
});

/// How an attachment is presented. Exactly one applies per attachment.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, IntoStaticStr,
)]
pub enum AttachmentKind {
    /// Rendered inline as an image.
    #[strum(serialize = "attachment--preview")]
    Preview,
    /// Rendered from the raw `content` markup it carries.
    #[strum(serialize = "attachment--content")]
    Content,
    /// Rendered as a generic file card.
    #[strum(serialize = "attachment--file")]
    File,
}

impl AttachmentKind {
    /// Preview beats embedded content, which beats the file card.
    pub fn classify(content: &str, can_preview: bool) -> Self {
        if can_preview {
            Self::Preview
        } else if !content.is_empty() {
            Self::Content
        } else {
            Self::File
        }
    }

    pub fn class_name(self) -> &'static str {
        self.into()
    }

    /// The class name without its `attachment--` prefix.
    pub fn short_name(self) -> &'static str {
        let class: &'static str = self.into();
        class.trim_start_matches(CLASS_PREFIX)
    }
}

pub fn is_previewable_content_type(content_type: &str) -> bool {
    PREVIEWABLE_CONTENT_TYPE.is_match(content_type)
}

/// True if the explicit flag is set or the content type is one of the image
/// types browsers can display inline.
pub fn can_preview(previewable: bool, content_type: &str) -> bool {
    previewable || is_previewable_content_type(content_type)
}

/// `attachment--<ext>` with the extension lowercased, or a bare
/// `attachment--` when the name has no extension.
pub fn extension_class(file_name: Option<&str>) -> String {
    let extension = file_name
        .and_then(|name| FILE_EXTENSION.captures(name))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().to_lowercase())
        .unwrap_or_default();
    format!("{CLASS_PREFIX}{extension}")
}

pub fn type_class(content: &str, can_preview: bool) -> &'static str {
    AttachmentKind::classify(content, can_preview).class_name()
}

#[cfg(test)]
mod test {
    use super::*;
    use speculoos::prelude::*;

    #[test]
    fn previewable_content_types() {
        let cases = [
            ("image/png", true),
            ("image/gif", true),
            ("image/jpeg", true),
            ("image/jpg", true),
            ("image", true),
            ("image/svg+xml", false),
            ("image/webp", false),
            ("image/pngx", false),
            ("image/", false),
            ("IMAGE/PNG", false),
            ("video/mp4", false),
            ("application/octet-stream", false),
            ("", false),
        ];
        for (content_type, expected) in cases {
            assert_eq!(
                can_preview(false, content_type),
                expected,
                "content type {content_type:?}"
            );
        }
    }

    #[test]
    fn explicit_flag_always_previews() {
        assert_that!(can_preview(true, "")).is_true();
        assert_that!(can_preview(true, "application/pdf")).is_true();
    }

    #[test]
    fn extension_class_is_lowercased() {
        assert_that!(extension_class(Some("a.b.JPG")))
            .is_equal_to("attachment--jpg".to_owned());
        assert_that!(extension_class(Some("report.pdf")))
            .is_equal_to("attachment--pdf".to_owned());
    }

    #[test]
    fn extension_class_without_extension_is_bare() {
        assert_that!(extension_class(None))
            .is_equal_to("attachment--".to_owned());
        assert_that!(extension_class(Some("README")))
            .is_equal_to("attachment--".to_owned());
        assert_that!(extension_class(Some("trailing.")))
            .is_equal_to("attachment--".to_owned());
    }

    #[test]
    fn type_class_precedence() {
        assert_eq!(type_class("<b>x</b>", true), "attachment--preview");
        assert_eq!(type_class("<b>x</b>", false), "attachment--content");
        assert_eq!(type_class("", false), "attachment--file");
        assert_eq!(type_class("", true), "attachment--preview");
    }

    #[test]
    fn kind_parses_from_its_class() {
        assert_eq!(
            "attachment--content".parse::<AttachmentKind>(),
            Ok(AttachmentKind::Content)
        );
        assert_eq!(AttachmentKind::File.short_name(), "file");
    }
}
