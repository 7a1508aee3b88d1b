// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Debug rendering of the document as an indented tree, e.g.
//!
//! ```text
//!
//! ├>p
//! │ └>"Intro"
//! └>attachment-gallery
//!   └>attachment-figure preview "cat.png"
//!     └>"A cat"
//! ```

use super::nodes::{ContainerNode, ContainerNodeKind, DomNode};
use super::Dom;

impl Dom {
    pub fn to_tree(&self) -> String {
        let mut tree = String::from("\n");
        write_children(self.document(), "", &mut tree);
        tree
    }
}

fn write_children(container: &ContainerNode, prefix: &str, tree: &mut String) {
    let count = container.children().len();
    for (i, child) in container.children().iter().enumerate() {
        let is_last = i + 1 == count;
        tree.push_str(prefix);
        tree.push_str(if is_last { "└>" } else { "├>" });
        tree.push_str(&label(child));
        tree.push('\n');
        if let DomNode::Container(c) = child {
            let branch = if is_last { "  " } else { "│ " };
            let child_prefix = format!("{prefix}{branch}");
            write_children(c, &child_prefix, tree);
        }
    }
}

fn label(node: &DomNode) -> String {
    match node {
        DomNode::Text(text) => format!("\"{}\"", text.data()),
        DomNode::Container(container) => match container.kind() {
            ContainerNodeKind::Document => String::from("doc"),
            ContainerNodeKind::Paragraph => String::from("p"),
            ContainerNodeKind::Gallery => String::from("attachment-gallery"),
            ContainerNodeKind::AttachmentFigure(attributes) => format!(
                "attachment-figure {} \"{}\"",
                attributes.kind().short_name(),
                attributes.file_name
            ),
        },
    }
}

#[cfg(test)]
mod test {
    use indoc::indoc;

    use super::*;
    use crate::attachment::AttachmentAttributes;

    #[test]
    fn renders_nested_blocks() {
        let dom = Dom::new(vec![
            DomNode::new_paragraph("Intro"),
            DomNode::new_gallery(vec![
                DomNode::new_attachment_figure(
                    AttachmentAttributes::new("/cat.png", "image/png")
                        .with_file("cat.png", "")
                        .with_caption("A cat"),
                ),
                DomNode::new_attachment_figure(
                    AttachmentAttributes::new("/r.pdf", "application/pdf")
                        .with_file("r.pdf", ""),
                ),
            ]),
            DomNode::new_paragraph(""),
        ]);
        assert_eq!(
            dom.to_tree(),
            indoc! {r#"

                ├>p
                │ └>"Intro"
                ├>attachment-gallery
                │ ├>attachment-figure preview "cat.png"
                │ │ └>"A cat"
                │ └>attachment-figure file "r.pdf"
                └>p
            "#}
        );
    }

    #[test]
    fn empty_document_is_a_blank_line() {
        assert_eq!(Dom::new(vec![]).to_tree(), "\n");
    }
}
