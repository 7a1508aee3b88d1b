// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The attachment figure node: which markup it is read from and the markup
//! it is written as.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::attachment::codec::{
    self, ATTACHMENT_BLOB_ATTR, CONTENT_TYPE_ATTR, PRESENTATION_BLOB_ATTR,
};
use crate::attachment::AttachmentAttributes;
use crate::config::AttachmentConfig;
use crate::dom::parser::ElementRef;

/// One markup shape that is read as an attachment figure.
pub(crate) struct FigureRule {
    pub(crate) name: &'static str,
    matches: fn(&ElementRef<'_>) -> bool,
    extract: fn(ElementRef<'_>) -> AttachmentAttributes,
}

/// Tried in order; the first rule that matches wins.
pub(crate) static FIGURE_RULES: [FigureRule; 2] = [
    FigureRule {
        name: "trix-figure",
        matches: is_trix_figure,
        extract: codec::parse_element,
    },
    FigureRule {
        name: "captioned-figure",
        matches: is_captioned_figure,
        extract: codec::parse_element,
    },
];

fn is_trix_figure(element: &ElementRef<'_>) -> bool {
    element.tag() == "figure" && element.has_attr(ATTACHMENT_BLOB_ATTR)
}

fn is_captioned_figure(element: &ElementRef<'_>) -> bool {
    element.tag() == "figure" && element.child("figcaption").is_some()
}

/// The attributes of `element` if it is an attachment figure.
pub(crate) fn match_figure(
    element: &ElementRef<'_>,
) -> Option<AttachmentAttributes> {
    FIGURE_RULES
        .iter()
        .find(|rule| (rule.matches)(element))
        .map(|rule| (rule.extract)(element.clone()))
}

/// Canonical markup for one figure.
pub fn figure_to_html(
    attrs: &AttachmentAttributes,
    config: &AttachmentConfig,
) -> String {
    let mut html = String::from("<figure");
    push_attr(
        &mut html,
        "class",
        &format!(
            "{} {} {}",
            config.figure_class,
            attrs.type_class(),
            attrs.extension_class()
        ),
    );
    push_attr(&mut html, CONTENT_TYPE_ATTR, &attrs.content_type);
    push_attr(&mut html, ATTACHMENT_BLOB_ATTR, &codec::to_blob_json(attrs));
    push_attr(
        &mut html,
        PRESENTATION_BLOB_ATTR,
        &codec::to_presentation_json(attrs, &config.presentation),
    );
    for (name, value) in &config.html_attributes {
        push_attr(&mut html, name, value);
    }
    html.push('>');

    // Embedded content replaces the image even when the figure previews.
    if !attrs.content.is_empty() {
        html.push_str(&attrs.content);
    } else {
        html.push_str("<img");
        push_attr(&mut html, "src", &attrs.src);
        if !attrs.width.is_empty() {
            push_attr(&mut html, "width", &attrs.width);
        }
        if !attrs.height.is_empty() {
            push_attr(&mut html, "height", &attrs.height);
        }
        push_attr(&mut html, "contenteditable", "false");
        html.push_str(" />");
    }

    html.push_str("<figcaption");
    push_attr(&mut html, "class", &config.caption_class);
    html.push('>');
    html.push_str(&encode_text(&attrs.caption));
    html.push_str("</figcaption></figure>");
    html
}

fn push_attr(html: &mut String, name: &str, value: &str) {
    html.push(' ');
    html.push_str(name);
    html.push_str("=\"");
    html.push_str(&encode_double_quoted_attribute(value));
    html.push('"');
}
