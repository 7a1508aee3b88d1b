// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

pub mod container_node;
pub mod dom_node;
pub mod text_node;

pub use container_node::{ContainerNode, ContainerNodeKind};
pub use dom_node::{DomNode, DomNodeKind};
pub use text_node::TextNode;
