// Copyright 2026 New Vector Ltd.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// Path from the document to a node: the child index at each level.
/// The empty path is the document itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomHandle {
    path: Vec<usize>,
}

impl DomHandle {
    pub fn root() -> Self {
        Self { path: Vec::new() }
    }

    pub fn from_raw(path: Vec<usize>) -> Self {
        Self { path }
    }

    pub fn raw(&self) -> &Vec<usize> {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of levels below the document.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn child_handle(&self, index: usize) -> Self {
        let mut path = self.path.clone();
        path.push(index);
        Self { path }
    }

    /// Panics if called on the root handle.
    pub fn parent_handle(&self) -> Self {
        assert!(!self.is_root(), "the document has no parent");
        Self {
            path: self.path[..self.path.len() - 1].to_vec(),
        }
    }

    /// Panics if called on the root handle.
    pub fn index_in_parent(&self) -> usize {
        *self.path.last().expect("the document has no parent")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn child_and_parent_are_inverse() {
        let handle = DomHandle::from_raw(vec![1, 0]);
        let child = handle.child_handle(3);
        assert_eq!(child.raw(), &vec![1, 0, 3]);
        assert_eq!(child.index_in_parent(), 3);
        assert_eq!(child.parent_handle(), handle);
        assert_eq!(child.depth(), 3);
    }

    #[test]
    fn root_is_empty() {
        assert!(DomHandle::root().is_root());
        assert!(!DomHandle::from_raw(vec![0]).is_root());
    }

    #[test]
    #[should_panic]
    fn root_has_no_parent() {
        DomHandle::root().parent_handle();
    }
}
