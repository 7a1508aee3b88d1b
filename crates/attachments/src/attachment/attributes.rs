// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::classes::{self, AttachmentKind};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
pub const DEFAULT_PROGRESS: u8 = 100;

/// The attributes of one attachment figure.
///
/// Dimensions and file size are kept as strings because producers disagree
/// on whether they are numbers; the codec converts on the way in and out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentAttributes {
    /// Correlation id used by the host while an upload is in flight.
    pub attachment_id: Option<String>,
    pub caption: String,
    /// Upload progress, 0 to 100.
    pub progress: u8,
    /// Signed global id. Non-empty once the upload has been finalized.
    pub sgid: String,
    pub src: String,
    pub width: String,
    pub height: String,
    pub content_type: String,
    pub file_name: String,
    pub file_size: String,
    /// Raw markup rendered in place of a preview, e.g. a rendered card.
    pub content: String,
    pub previewable: bool,
}

impl Default for AttachmentAttributes {
    fn default() -> Self {
        Self {
            attachment_id: None,
            caption: String::new(),
            progress: DEFAULT_PROGRESS,
            sgid: String::new(),
            src: String::new(),
            width: String::new(),
            height: String::new(),
            content_type: DEFAULT_CONTENT_TYPE.to_owned(),
            file_name: String::new(),
            file_size: String::new(),
            content: String::new(),
            previewable: false,
        }
    }
}

impl AttachmentAttributes {
    pub fn new(
        src: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        let content_type = content_type.into();
        Self {
            src: src.into(),
            previewable: classes::is_previewable_content_type(&content_type),
            content_type,
            ..Self::default()
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = caption.into();
        self
    }

    pub fn with_file(
        mut self,
        file_name: impl Into<String>,
        file_size: impl Into<String>,
    ) -> Self {
        self.file_name = file_name.into();
        self.file_size = file_size.into();
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_dimensions(
        mut self,
        width: impl Into<String>,
        height: impl Into<String>,
    ) -> Self {
        self.width = width.into();
        self.height = height.into();
        self
    }

    pub fn can_preview(&self) -> bool {
        classes::can_preview(self.previewable, &self.content_type)
    }

    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::classify(&self.content, self.can_preview())
    }

    pub fn type_class(&self) -> &'static str {
        self.kind().class_name()
    }

    pub fn extension_class(&self) -> String {
        let file_name = Some(self.file_name.as_str()).filter(|n| !n.is_empty());
        classes::extension_class(file_name)
    }

    /// Width and height have both been resolved from the media.
    pub fn has_dimensions(&self) -> bool {
        !self.width.is_empty() && !self.height.is_empty()
    }

    pub fn is_finalized(&self) -> bool {
        !self.sgid.is_empty()
    }

    pub fn is_uploading(&self) -> bool {
        self.progress < DEFAULT_PROGRESS
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn defaults_describe_an_unknown_file() {
        let attrs = AttachmentAttributes::default();
        assert_eq!(attrs.content_type, "application/octet-stream");
        assert_eq!(attrs.progress, 100);
        assert_eq!(attrs.attachment_id, None);
        assert_eq!(attrs.kind(), AttachmentKind::File);
        assert_eq!(attrs.extension_class(), "attachment--");
    }

    #[test]
    fn new_infers_previewable_from_content_type() {
        assert!(AttachmentAttributes::new("a.png", "image/png").previewable);
        let svg = AttachmentAttributes::new("a.svg", "image/svg+xml");
        assert!(!svg.previewable);
    }

    #[test]
    fn content_wins_over_file_card_but_not_over_preview() {
        let card = AttachmentAttributes::new("", "application/pdf")
            .with_content("<div>card</div>");
        assert_eq!(card.kind(), AttachmentKind::Content);

        let image = AttachmentAttributes::new("a.png", "image/png")
            .with_content("<div>card</div>");
        assert_eq!(image.kind(), AttachmentKind::Preview);
    }

    #[test]
    fn uploading_until_progress_reaches_100() {
        let mut attrs = AttachmentAttributes::default();
        attrs.progress = 40;
        assert!(attrs.is_uploading());
        attrs.progress = 100;
        assert!(!attrs.is_uploading());
    }
}
