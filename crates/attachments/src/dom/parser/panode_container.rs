// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::QualName;

use super::PaDomHandle;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeContainer {
    pub(crate) name: QualName,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<PaDomHandle>,
}

impl PaNodeContainer {
    pub(crate) fn new(name: QualName, attrs: Vec<(String, String)>) -> Self {
        Self {
            name,
            attrs,
            children: Vec::new(),
        }
    }

    pub(crate) fn tag(&self) -> &str {
        self.name.local.as_ref()
    }

    pub(crate) fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _v)| n == name)
            .map(|(_n, v)| v.as_str())
    }

    pub(crate) fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _v)| n == name)
    }

    pub(crate) fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::parser::paqual_name;

    fn figure(attrs: &[(&str, &str)]) -> PaNodeContainer {
        PaNodeContainer::new(
            paqual_name("figure"),
            attrs
                .iter()
                .map(|(n, v)| ((*n).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }

    #[test]
    fn finds_classes_in_a_class_list() {
        let node = figure(&[("class", "attachment  attachment--png")]);
        assert!(node.has_class("attachment"));
        assert!(node.has_class("attachment--png"));
        assert!(!node.has_class("attachment--"));
        assert!(!figure(&[]).has_class("attachment"));
    }

    #[test]
    fn empty_attributes_are_present() {
        let node = figure(&[("data-trix-attachment", "")]);
        assert!(node.has_attr("data-trix-attachment"));
        assert_eq!(node.get_attr("data-trix-attachment"), Some(""));
        assert_eq!(node.tag(), "figure");
    }
}
