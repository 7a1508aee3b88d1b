// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// Settings shared by the markup serializer and the view binder. Built once
/// by the host and passed by reference everywhere it is needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttachmentConfig {
    /// Base class of every figure.
    pub figure_class: String,
    /// Base class of gallery containers.
    pub gallery_class: String,
    pub caption_class: String,
    /// Value written as `presentation` in `data-trix-attributes`.
    pub presentation: String,
    /// Extra attributes written on every serialized figure.
    pub html_attributes: Vec<(String, String)>,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            figure_class: String::from("attachment"),
            gallery_class: String::from("attachment-gallery"),
            caption_class: String::from("attachment__caption"),
            presentation: String::from("gallery"),
            html_attributes: Vec::new(),
        }
    }
}

impl AttachmentConfig {
    pub fn with_html_attribute(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.html_attributes.push((name.into(), value.into()));
        self
    }
}
