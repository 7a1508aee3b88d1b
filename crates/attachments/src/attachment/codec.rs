// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Reading and writing [`AttachmentAttributes`].
//!
//! Attributes are read from up to four places: explicit attributes on the
//! figure (or on an enclosing `action-text-attachment` wrapper), the
//! `data-trix-attachment` JSON blob, the `data-trix-attributes`
//! presentation blob, and the figure's own children. Each field lists the
//! places it may come from in order; the first non-empty value wins and
//! anything missing falls back to the field's default.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::attributes::{AttachmentAttributes, DEFAULT_CONTENT_TYPE};
use super::classes;
use crate::dom::parser::ElementRef;

pub const ATTACHMENT_BLOB_ATTR: &str = "data-trix-attachment";
pub const PRESENTATION_BLOB_ATTR: &str = "data-trix-attributes";
pub const CONTENT_TYPE_ATTR: &str = "data-trix-content-type";
pub const WRAPPER_TAG: &str = "action-text-attachment";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Source {
    /// Attribute on the figure, then on the wrapper.
    Attr(&'static str),
    Blob(&'static str),
    PresentationBlob(&'static str),
    /// Text of the direct `figcaption` child.
    CaptionText,
    /// Attribute of the direct `img` child.
    ImgAttr(&'static str),
    /// Markup of the wrapper other than the figure itself.
    WrapperHtml,
}

use Source::*;

const CAPTION: &[Source] = &[
    CaptionText,
    Blob("caption"),
    PresentationBlob("caption"),
    Attr("caption"),
];
const PROGRESS: &[Source] = &[Blob("progress")];
const SGID: &[Source] = &[Attr("sgid"), Blob("sgid")];
const SRC: &[Source] = &[
    Attr("url"),
    Attr("src"),
    Blob("url"),
    Blob("src"),
    ImgAttr("src"),
];
const WIDTH: &[Source] = &[Attr("width"), Blob("width"), ImgAttr("width")];
const HEIGHT: &[Source] =
    &[Attr("height"), Blob("height"), ImgAttr("height")];
const CONTENT_TYPE: &[Source] = &[
    Attr("content-type"),
    Attr(CONTENT_TYPE_ATTR),
    Blob("contentType"),
];
const FILE_NAME: &[Source] =
    &[Attr("filename"), Blob("filename"), Blob("fileName")];
const FILE_SIZE: &[Source] =
    &[Attr("filesize"), Blob("filesize"), Blob("fileSize")];
const CONTENT: &[Source] = &[Attr("content"), Blob("content"), WrapperHtml];
const PREVIEWABLE: &[Source] = &[Attr("previewable"), Blob("previewable")];
const ATTACHMENT_ID: &[Source] = &[Blob("attachmentId")];

/// Everything a figure's attributes may be read from.
struct FieldSources<'a> {
    element: Option<ElementRef<'a>>,
    wrapper: Option<ElementRef<'a>>,
    blob: Map<String, Value>,
    presentation: Map<String, Value>,
}

impl<'a> FieldSources<'a> {
    fn for_element(element: ElementRef<'a>) -> Self {
        let wrapper = element.closest(WRAPPER_TAG);
        Self {
            blob: json_attr(&element, ATTACHMENT_BLOB_ATTR),
            presentation: json_attr(&element, PRESENTATION_BLOB_ATTR),
            element: Some(element),
            wrapper,
        }
    }

    fn for_blob(blob: Map<String, Value>) -> Self {
        Self {
            element: None,
            wrapper: None,
            blob,
            presentation: Map::new(),
        }
    }

    fn lookup(&self, source: Source) -> Option<String> {
        match source {
            Attr(name) => self
                .element
                .as_ref()
                .and_then(|e| e.attr(name))
                .filter(|v| !v.is_empty())
                .or_else(|| self.wrapper.as_ref().and_then(|w| w.attr(name)))
                .map(str::to_owned),
            Blob(key) => self.blob.get(key).and_then(json_to_string),
            PresentationBlob(key) => {
                self.presentation.get(key).and_then(json_to_string)
            }
            CaptionText => self
                .element
                .as_ref()
                .and_then(|e| e.child("figcaption"))
                .map(|c| c.text_content()),
            ImgAttr(name) => self
                .element
                .as_ref()
                .and_then(|e| e.child("img"))
                .and_then(|img| img.attr(name))
                .map(str::to_owned),
            WrapperHtml => {
                let wrapper = self.wrapper.as_ref()?;
                let html = match &self.element {
                    Some(element) => {
                        wrapper.inner_html_without(element.handle())
                    }
                    None => wrapper.inner_html(),
                };
                Some(html.trim().to_owned())
            }
        }
    }

    fn first(&self, sources: &[Source]) -> Option<String> {
        sources
            .iter()
            .filter_map(|s| self.lookup(*s))
            .find(|v| !v.is_empty())
    }

    fn string(&self, sources: &[Source]) -> String {
        self.first(sources).unwrap_or_default()
    }

    /// Like `string`, but child `img` attributes are ignored when the figure
    /// embeds content, since that content may hold images of its own.
    fn media(&self, sources: &[Source], has_content: bool) -> String {
        sources
            .iter()
            .filter(|s| !(has_content && matches!(s, ImgAttr(_))))
            .filter_map(|s| self.lookup(*s))
            .find(|v| !v.is_empty())
            .unwrap_or_default()
    }

    /// The first source present at all, even if empty.
    fn present(&self, sources: &[Source]) -> Option<String> {
        sources.iter().find_map(|s| self.lookup(*s))
    }

    fn attributes(&self) -> AttachmentAttributes {
        let content_type = self
            .first(CONTENT_TYPE)
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_owned());
        let previewable = self
            .first(PREVIEWABLE)
            .map(|v| v == "true")
            .unwrap_or_else(|| {
                classes::is_previewable_content_type(&content_type)
            });
        let progress = self
            .first(PROGRESS)
            .and_then(|v| v.parse::<f64>().ok())
            .map(|p| p.clamp(0.0, 100.0).round() as u8)
            .unwrap_or(AttachmentAttributes::default().progress);

        let content = self.string(CONTENT);
        let has_content = !content.is_empty();

        AttachmentAttributes {
            attachment_id: self.present(ATTACHMENT_ID),
            caption: self.string(CAPTION),
            progress,
            sgid: self.string(SGID),
            src: self.media(SRC, has_content),
            width: self.media(WIDTH, has_content),
            height: self.media(HEIGHT, has_content),
            content_type,
            file_name: self.string(FILE_NAME),
            file_size: self.string(FILE_SIZE),
            content,
            previewable,
        }
    }
}

fn json_attr(element: &ElementRef<'_>, name: &str) -> Map<String, Value> {
    let Some(raw) = element.attr(name).filter(|v| !v.trim().is_empty()) else {
        return Map::new();
    };
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            debug!(
                attribute = name,
                value = %other,
                "ignoring non-object attachment blob"
            );
            Map::new()
        }
        Err(error) => {
            debug!(
                attribute = name,
                %error,
                "ignoring malformed attachment blob"
            );
            Map::new()
        }
    }
}

fn json_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Reads the attributes of a matched figure element.
pub(crate) fn parse_element(element: ElementRef<'_>) -> AttachmentAttributes {
    FieldSources::for_element(element).attributes()
}

/// Reads attributes from a JSON object using the blob's keys. Anything that
/// is not an object yields the defaults.
pub fn from_json(value: &Value) -> AttachmentAttributes {
    let blob = match value {
        Value::Object(map) => map.clone(),
        other => {
            debug!(
                value = %other,
                "attachment attributes must be a JSON object"
            );
            Map::new()
        }
    };
    FieldSources::for_blob(blob).attributes()
}

/// Integer-looking values are written as JSON numbers, the way Trix writes
/// them; anything else stays a string.
#[derive(Serialize)]
#[serde(untagged)]
enum NumberOrString<'a> {
    Number(u64),
    String(&'a str),
}

impl<'a> NumberOrString<'a> {
    fn from_field(value: &'a str) -> Option<Self> {
        if value.is_empty() {
            return None;
        }
        match value.parse::<u64>() {
            Ok(n) if n.to_string() == value => Some(Self::Number(n)),
            _ => Some(Self::String(value)),
        }
    }
}

fn is_complete(progress: &u8) -> bool {
    *progress >= AttachmentAttributes::default().progress
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentBlob<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    attachment_id: Option<&'a str>,
    #[serde(skip_serializing_if = "str::is_empty")]
    caption: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    content: &'a str,
    content_type: &'a str,
    #[serde(rename = "filename", skip_serializing_if = "str::is_empty")]
    file_name: &'a str,
    #[serde(rename = "filesize", skip_serializing_if = "Option::is_none")]
    file_size: Option<NumberOrString<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    height: Option<NumberOrString<'a>>,
    previewable: bool,
    #[serde(skip_serializing_if = "is_complete")]
    progress: u8,
    #[serde(skip_serializing_if = "str::is_empty")]
    sgid: &'a str,
    #[serde(rename = "url", skip_serializing_if = "str::is_empty")]
    src: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    width: Option<NumberOrString<'a>>,
}

impl<'a> From<&'a AttachmentAttributes> for AttachmentBlob<'a> {
    fn from(attrs: &'a AttachmentAttributes) -> Self {
        Self {
            attachment_id: attrs.attachment_id.as_deref(),
            caption: &attrs.caption,
            content: &attrs.content,
            content_type: &attrs.content_type,
            file_name: &attrs.file_name,
            file_size: NumberOrString::from_field(&attrs.file_size),
            height: NumberOrString::from_field(&attrs.height),
            previewable: attrs.previewable,
            progress: attrs.progress,
            sgid: &attrs.sgid,
            src: &attrs.src,
            width: NumberOrString::from_field(&attrs.width),
        }
    }
}

/// The `data-trix-attributes` blob.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub presentation: String,
    #[serde(default)]
    pub caption: String,
}

/// The `data-trix-attachment` blob for these attributes.
pub fn to_blob_json(attrs: &AttachmentAttributes) -> String {
    serde_json::to_string(&AttachmentBlob::from(attrs))
        .unwrap_or_else(|_| String::from("{}"))
}

/// The `data-trix-attributes` blob for these attributes.
pub fn to_presentation_json(
    attrs: &AttachmentAttributes,
    presentation: &str,
) -> String {
    let presentation = Presentation {
        presentation: presentation.to_owned(),
        caption: attrs.caption.clone(),
    };
    serde_json::to_string(&presentation).unwrap_or_else(|_| String::from("{}"))
}
