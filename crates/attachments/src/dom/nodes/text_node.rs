// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// A run of text. Lengths and offsets are in UTF-16 code units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextNode {
    data: String,
}

impl TextNode {
    pub fn from(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn push_str(&mut self, text: &str) {
        self.data.push_str(text);
    }

    pub fn len(&self) -> usize {
        utf16_len(&self.data)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Splits at a UTF-16 offset. An offset inside a surrogate pair splits
    /// after the pair.
    pub fn split_at(&self, offset: usize) -> (&str, &str) {
        let index = utf8_index(&self.data, offset);
        self.data.split_at(index)
    }
}

pub(crate) fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Byte index of the UTF-16 `offset` in `text`, clamped to its length.
fn utf8_index(text: &str, offset: usize) -> usize {
    let mut units = 0;
    for (index, c) in text.char_indices() {
        if units >= offset {
            return index;
        }
        units += c.len_utf16();
    }
    text.len()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn length_counts_utf16_units() {
        assert_eq!(TextNode::from("abc").len(), 3);
        assert_eq!(TextNode::from("é").len(), 1);
        assert_eq!(TextNode::from("🦀").len(), 2);
    }

    #[test]
    fn split_at_utf16_offsets() {
        let text = TextNode::from("a🦀b");
        assert_eq!(text.split_at(0), ("", "a🦀b"));
        assert_eq!(text.split_at(1), ("a", "🦀b"));
        assert_eq!(text.split_at(3), ("a🦀", "b"));
        assert_eq!(text.split_at(2), ("a🦀", "b"));
        assert_eq!(text.split_at(10), ("a🦀b", ""));
    }
}
