// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::borrow::Cow;
use std::cell::{Ref, RefCell};

use html5ever::interface::NextParserState;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};
use tracing::debug;

use super::{paqual_name, PaDom, PaDomHandle, PaDomNode, PaNodeContainer};

struct CreatorState {
    dom: PaDom,
    parse_errors: Vec<String>,
}

/// Tree sink building a [`PaDom`] from html5ever events.
///
/// Parsing never fails: html5ever recovers from malformed markup on its own
/// and the errors it reports are only logged, so a bad fragment degrades to
/// whatever structure the recovery produced.
pub(crate) struct PaDomCreator {
    state: RefCell<CreatorState>,
}

impl PaDomCreator {
    pub(crate) fn parse(html: &str) -> PaDom {
        parse_fragment(
            PaDomCreator::default(),
            Default::default(),
            paqual_name("body"),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }
}

impl Default for PaDomCreator {
    fn default() -> Self {
        Self {
            state: RefCell::new(CreatorState {
                dom: PaDom::new(),
                parse_errors: Vec::new(),
            }),
        }
    }
}

impl TreeSink for PaDomCreator {
    type Handle = PaDomHandle;
    type Output = PaDom;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        let state = self.state.into_inner();
        if !state.parse_errors.is_empty() {
            debug!(
                errors = ?state.parse_errors,
                "markup parsed with recoverable errors"
            );
        }
        state.dom
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.state.borrow_mut().parse_errors.push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().dom.document_handle().clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |state| state.dom.name(target))
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = attrs
            .into_iter()
            .map(|attr| {
                (
                    attr.name.local.as_ref().to_owned(),
                    attr.value.as_ref().to_owned(),
                )
            })
            .collect();
        self.state
            .borrow_mut()
            .dom
            .add_node(PaDomNode::Container(PaNodeContainer::new(name, attrs)))
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.state.borrow_mut().dom.add_node(PaDomNode::Ignored)
    }

    fn create_pi(
        &self,
        _target: StrTendril,
        _data: StrTendril,
    ) -> Self::Handle {
        self.state.borrow_mut().dom.add_node(PaDomNode::Ignored)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let dom = &mut self.state.borrow_mut().dom;
        match child {
            NodeOrText::AppendNode(node) => dom.append_child(parent, node),
            NodeOrText::AppendText(text) => {
                dom.append_text(parent, text.as_ref())
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.state.borrow().dom.parent(element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Fragments never carry a doctype worth keeping
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        match new_node {
            NodeOrText::AppendNode(node) => dom.insert_before(sibling, node),
            NodeOrText::AppendText(text) => {
                dom.insert_text_before(sibling, text.as_ref())
            }
        }
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        if let PaDomNode::Container(node) = dom.get_mut_node(target) {
            for attr in attrs {
                let name = attr.name.local.as_ref();
                if !node.has_attr(name) {
                    let value = attr.value.as_ref().to_owned();
                    node.attrs.push((name.to_owned(), value));
                }
            }
        }
    }

    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.state.borrow_mut().dom.detach(target);
    }

    fn reparent_children(
        &self,
        node: &Self::Handle,
        new_parent: &Self::Handle,
    ) {
        self.state.borrow_mut().dom.reparent_children(node, new_parent);
    }

    fn is_mathml_annotation_xml_integration_point(
        &self,
        _handle: &Self::Handle,
    ) -> bool {
        false
    }

    fn set_current_line(&self, _line_number: u64) {}

    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        NextParserState::Continue
    }

    fn allow_declarative_shadow_roots(
        &self,
        _intended_parent: &Self::Handle,
    ) -> bool {
        false
    }

    fn attach_declarative_shadow(
        &self,
        _location: &Self::Handle,
        _template: &Self::Handle,
        _attrs: Vec<Attribute>,
    ) -> Result<(), String> {
        Err(String::from("declarative shadow roots are not supported"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// Compact rendering of the parsed tree: `tag[attr=value](children)`.
    fn outline(dom: &PaDom) -> String {
        fn node(dom: &PaDom, handle: &PaDomHandle, out: &mut String) {
            match dom.get_node(handle) {
                PaDomNode::Container(c) => {
                    out.push_str(c.tag());
                    for (name, value) in &c.attrs {
                        out.push_str(&format!("[{name}={value}]"));
                    }
                    out.push('(');
                    for child in &c.children {
                        node(dom, child, out);
                    }
                    out.push(')');
                }
                PaDomNode::Text(t) => out.push_str(&format!("{:?}", t.content)),
                PaDomNode::Document(_) | PaDomNode::Ignored => {}
            }
        }
        let mut out = String::new();
        for handle in dom.top_level() {
            node(dom, &handle, &mut out);
        }
        out
    }

    #[test]
    fn parsing_an_empty_string_creates_an_empty_dom() {
        assert_eq!(outline(&PaDomCreator::parse("")), "");
    }

    #[test]
    fn parsing_a_text_snippet_creates_one_node() {
        assert_eq!(outline(&PaDomCreator::parse("foo")), r#""foo""#);
    }

    #[test]
    fn parsing_nested_structures_produces_them() {
        assert_eq!(
            outline(&PaDomCreator::parse("A<i>B<b>C</b>D</i>E")),
            r#""A"i("B"b("C")"D")"E""#
        );
    }

    #[test]
    fn parsing_tags_with_attributes_preserves_them() {
        assert_eq!(
            outline(&PaDomCreator::parse(
                r#"<figure data-trix-attachment='{"a":1}'></figure>"#
            )),
            r#"figure[data-trix-attachment={"a":1}]()"#
        );
    }

    #[test]
    fn parsing_decodes_entities() {
        assert_eq!(
            outline(&PaDomCreator::parse("a&lt;b&gt;&amp;c")),
            r#""a<b>&c""#
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            outline(&PaDomCreator::parse("a<!-- hidden -->b")),
            r#""a""b""#
        );
    }

    #[test]
    fn misnested_markup_is_recovered() {
        let dom = PaDomCreator::parse("<b>bold<p>para</b>tail</p>");
        assert_eq!(outline(&dom), r#"b("bold")p(b("para")"tail")"#);
    }

    #[test]
    fn custom_elements_are_kept() {
        assert_eq!(
            outline(&PaDomCreator::parse(
                concat!(
                    r#"<action-text-attachment sgid="x"><figure></figure>"#,
                    r#"</action-text-attachment>"#,
                )
            )),
            "action-text-attachment[sgid=x](figure())"
        );
    }
}
