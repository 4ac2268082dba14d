use core::mem;

use super::handle::Handle;

/// A binary search tree node.
///
/// Children are arena handles owned by this node; there is no parent link.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K, V> Node<K, V> {
    /// Creates a childless node.
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    #[inline]
    pub(crate) const fn value(&self) -> &V {
        &self.value
    }

    #[inline]
    pub(crate) fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    pub(crate) fn set_left(&mut self, left: Option<Handle>) {
        self.left = left;
    }

    pub(crate) fn set_right(&mut self, right: Option<Handle>) {
        self.right = right;
    }

    /// Swaps in a new value, keeping the stored key.
    pub(crate) fn replace_value(&mut self, value: V) -> V {
        mem::replace(&mut self.value, value)
    }

    /// Swaps in a whole payload (successor promotion). Links are untouched.
    pub(crate) fn replace_entry(&mut self, (key, value): (K, V)) -> (K, V) {
        (mem::replace(&mut self.key, key), mem::replace(&mut self.value, value))
    }

    pub(crate) fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}
