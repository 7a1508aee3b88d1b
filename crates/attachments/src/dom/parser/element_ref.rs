// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{PaDom, PaDomHandle, PaDomNode, PaNodeContainer};

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: [&str; 14] = [
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link",
    "meta", "param", "source", "track", "wbr",
];

/// Read-only view of one element of a [`PaDom`].
#[derive(Clone, Debug)]
pub(crate) struct ElementRef<'a> {
    dom: &'a PaDom,
    handle: PaDomHandle,
}

impl<'a> ElementRef<'a> {
    pub(crate) fn new(dom: &'a PaDom, handle: PaDomHandle) -> Option<Self> {
        match dom.get_node(&handle) {
            PaDomNode::Container(_) => Some(Self { dom, handle }),
            _ => None,
        }
    }

    pub(crate) fn handle(&self) -> &PaDomHandle {
        &self.handle
    }

    fn container(&self) -> &'a PaNodeContainer {
        match self.dom.get_node(&self.handle) {
            PaDomNode::Container(c) => c,
            _ => unreachable!("ElementRef always points at a container"),
        }
    }

    pub(crate) fn tag(&self) -> &'a str {
        self.container().tag()
    }

    pub(crate) fn attr(&self, name: &str) -> Option<&'a str> {
        self.container().get_attr(name)
    }

    pub(crate) fn has_attr(&self, name: &str) -> bool {
        self.container().has_attr(name)
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.container().has_class(class)
    }

    pub(crate) fn child_elements(
        &self,
    ) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        let dom = self.dom;
        self.container()
            .children
            .iter()
            .filter_map(move |h| ElementRef::new(dom, h.clone()))
    }

    /// The first direct child with the given tag.
    pub(crate) fn child(&self, tag: &str) -> Option<ElementRef<'a>> {
        self.child_elements().find(|e| e.tag() == tag)
    }

    /// Nearest element with the given tag, starting from this one.
    pub(crate) fn closest(&self, tag: &str) -> Option<ElementRef<'a>> {
        let mut current = Some(self.handle.clone());
        while let Some(handle) = current {
            if let Some(element) = ElementRef::new(self.dom, handle.clone()) {
                if element.tag() == tag {
                    return Some(element);
                }
            }
            current = self.dom.parent(&handle).cloned();
        }
        None
    }

    pub(crate) fn text_content(&self) -> String {
        let mut text = String::new();
        collect_text(self.dom, &self.handle, &mut text);
        text
    }

    pub(crate) fn inner_html(&self) -> String {
        self.inner_html_skipping(None)
    }

    /// `innerHTML` with the subtree rooted at `skip` left out, wherever it
    /// sits below this element.
    pub(crate) fn inner_html_without(&self, skip: &PaDomHandle) -> String {
        self.inner_html_skipping(Some(skip))
    }

    fn inner_html_skipping(&self, skip: Option<&PaDomHandle>) -> String {
        let mut html = String::new();
        for child in &self.container().children {
            write_html(self.dom, child, skip, &mut html);
        }
        html
    }
}

fn collect_text(dom: &PaDom, handle: &PaDomHandle, text: &mut String) {
    match dom.get_node(handle) {
        PaDomNode::Text(t) => text.push_str(&t.content),
        node => {
            for child in node.children() {
                collect_text(dom, child, text);
            }
        }
    }
}

fn write_html(
    dom: &PaDom,
    handle: &PaDomHandle,
    skip: Option<&PaDomHandle>,
    html: &mut String,
) {
    if skip == Some(handle) {
        return;
    }
    match dom.get_node(handle) {
        PaDomNode::Text(t) => {
            html.push_str(&html_escape::encode_text(&t.content))
        }
        PaDomNode::Container(c) => {
            let tag = c.tag();
            html.push('<');
            html.push_str(tag);
            for (name, value) in &c.attrs {
                html.push(' ');
                html.push_str(name);
                html.push_str("=\"");
                html.push_str(&html_escape::encode_double_quoted_attribute(
                    value,
                ));
                html.push('"');
            }
            html.push('>');
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            for child in &c.children {
                write_html(dom, child, skip, html);
            }
            html.push_str("</");
            html.push_str(tag);
            html.push('>');
        }
        PaDomNode::Document(_) | PaDomNode::Ignored => {}
    }
}
