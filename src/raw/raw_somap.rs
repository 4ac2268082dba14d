use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use smallvec::SmallVec;
use tracing::trace;

use super::arena::Arena;
use super::handle::{Handle, Link};
use super::node::Node;
use crate::comparator::Comparator;
use crate::error::Result;

/// Pending ancestors during an in-order walk.
type Stack = SmallVec<[Handle; 32]>;

/// The unbalanced binary search tree backing `SoMap`.
///
/// Nodes live in an arena and link to their children by handle. No balance information is
/// kept: the shape is whatever the insertion order produced.
#[derive(Clone)]
pub(crate) struct RawSoMap<K, V, C> {
    /// Every node of the tree, and nothing else.
    nodes: Arena<Node<K, V>>,
    root: Option<Handle>,
    /// Number of reachable nodes.
    len: usize,
    comparator: C,
}

impl<K, V, C> RawSoMap<K, V, C> {
    pub(crate) const fn new(comparator: C) -> Self {
        Self {
            nodes: Arena::new(),
            root: None,
            len: 0,
            comparator,
        }
    }

    pub(crate) fn with_capacity(capacity: usize, comparator: C) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: None,
            len: 0,
            comparator,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) const fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Drops the whole tree.
    pub(crate) fn clear(&mut self) {
        trace!(len = self.len, "clearing tree");
        self.nodes.clear();
        self.root = None;
        self.len = 0;
    }

    /// The leftmost entry.
    pub(crate) fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.nodes.get(self.root?);
        while let Some(left) = node.left() {
            node = self.nodes.get(left);
        }
        Some((node.key(), node.value()))
    }

    /// The rightmost entry.
    pub(crate) fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.nodes.get(self.root?);
        while let Some(right) = node.right() {
            node = self.nodes.get(right);
        }
        Some((node.key(), node.value()))
    }

    /// Walks the tree in ascending key order.
    pub(crate) fn in_order(&self) -> InOrder<'_, K, V> {
        InOrder {
            nodes: &self.nodes,
            stack: Stack::new(),
            next: self.root,
            remaining: self.len,
        }
    }

    /// Moves every entry out in ascending key order, leaving the tree empty.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let order: Vec<Handle> = self.in_order_handles();
        let entries = order.into_iter().map(|handle| self.nodes.take(handle).into_entry()).collect();
        self.nodes.clear();
        self.root = None;
        self.len = 0;
        entries
    }

    fn in_order_handles(&self) -> Vec<Handle> {
        let mut handles = Vec::with_capacity(self.len);
        let mut stack = Stack::new();
        let mut next = self.root;
        loop {
            while let Some(handle) = next {
                stack.push(handle);
                next = self.nodes.get(handle).left();
            }
            let Some(handle) = stack.pop() else {
                return handles;
            };
            handles.push(handle);
            next = self.nodes.get(handle).right();
        }
    }

    /// Points `link` at `child`.
    fn relink(&mut self, link: Link, child: Option<Handle>) {
        match link {
            Link::Root => self.root = child,
            Link::Left(parent) => self.nodes.get_mut(parent).set_left(child),
            Link::Right(parent) => self.nodes.get_mut(parent).set_right(child),
        }
    }

    /// Takes `current`, which hangs off `link`, out of the tree and returns its entry.
    fn unlink(&mut self, link: Link, current: Handle) -> (K, V) {
        let node = self.nodes.get(current);
        match (node.left(), node.right()) {
            (None, right) => {
                self.relink(link, right);
                self.len -= 1;
                trace!(len = self.len, case = "no left child", "removed node");
                self.nodes.take(current).into_entry()
            }
            (left @ Some(_), None) => {
                self.relink(link, left);
                self.len -= 1;
                trace!(len = self.len, case = "no right child", "removed node");
                self.nodes.take(current).into_entry()
            }
            (Some(_), Some(right)) => {
                // The successor's removal accounts for the length change.
                let successor = self.detach_min(Link::Right(current), right);
                trace!(len = self.len, case = "successor promoted", "removed node");
                self.nodes.get_mut(current).replace_entry(successor)
            }
        }
    }

    /// Removes the leftmost node of the subtree at `subtree`, which hangs off `link`.
    fn detach_min(&mut self, mut link: Link, subtree: Handle) -> (K, V) {
        let mut current = subtree;
        while let Some(left) = self.nodes.get(current).left() {
            link = Link::Left(current);
            current = left;
        }

        let node = self.nodes.take(current);
        self.relink(link, node.right());
        self.len -= 1;
        node.into_entry()
    }
}

impl<K, V, C> RawSoMap<K, V, C> {
    /// Compares a probe against a stored key.
    ///
    /// `None` when either side is null-like: such keys are never ordered.
    fn order<Q>(&self, probe: &Q, stored: &Q) -> Result<Option<Ordering>>
    where
        Q: ?Sized,
        C: Comparator<Q>,
    {
        if self.comparator.is_absent(probe) || self.comparator.is_absent(stored) {
            return Ok(None);
        }
        self.comparator.compare(probe, stored).map(Some)
    }

    fn search<Q>(&self, key: &Q) -> Result<Option<Handle>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut current = self.root;
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            current = match self.order(key, node.key().borrow())? {
                Some(Ordering::Less) => node.left(),
                Some(Ordering::Greater) => node.right(),
                Some(Ordering::Equal) => return Ok(Some(handle)),
                None => return Ok(None),
            };
        }
        Ok(None)
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Result<Option<&V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Ok(self.search(key)?.map(|handle| self.nodes.get(handle).value()))
    }

    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Result<Option<(&K, &V)>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Ok(self.search(key)?.map(|handle| {
            let node = self.nodes.get(handle);
            (node.key(), node.value())
        }))
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Result<Option<&mut V>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Ok(self.search(key)?.map(|handle| self.nodes.get_mut(handle).value_mut()))
    }

    /// Inserts or updates `key`.
    ///
    /// A null-like key only ever lands in an empty tree. Anywhere else the comparison is
    /// skipped and the call changes nothing.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<Option<V>>
    where
        C: Comparator<K>,
    {
        let Some(mut current) = self.root else {
            self.root = Some(self.nodes.alloc(Node::new(key, value)));
            self.len = 1;
            trace!(len = self.len, "planted root");
            return Ok(None);
        };

        loop {
            let node = self.nodes.get(current);
            let (left, right) = (node.left(), node.right());
            let Some(order) = self.order(&key, node.key())? else {
                trace!(len = self.len, "skipped null-like key");
                return Ok(None);
            };
            match order {
                Ordering::Equal => {
                    return Ok(Some(self.nodes.get_mut(current).replace_value(value)));
                }
                Ordering::Less => match left {
                    Some(left) => current = left,
                    None => {
                        let leaf = self.nodes.alloc(Node::new(key, value));
                        self.nodes.get_mut(current).set_left(Some(leaf));
                        break;
                    }
                },
                Ordering::Greater => match right {
                    Some(right) => current = right,
                    None => {
                        let leaf = self.nodes.alloc(Node::new(key, value));
                        self.nodes.get_mut(current).set_right(Some(leaf));
                        break;
                    }
                },
            }
        }

        self.len += 1;
        trace!(len = self.len, "attached leaf");
        Ok(None)
    }

    /// Removes `key`, returning its entry.
    ///
    /// Absent and null-like keys leave the tree untouched.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Result<Option<(K, V)>>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut link = Link::Root;
        let mut cursor = self.root;
        while let Some(current) = cursor {
            let node = self.nodes.get(current);
            match self.order(key, node.key().borrow())? {
                None => return Ok(None),
                Some(Ordering::Less) => {
                    link = Link::Left(current);
                    cursor = node.left();
                }
                Some(Ordering::Greater) => {
                    link = Link::Right(current);
                    cursor = node.right();
                }
                Some(Ordering::Equal) => return Ok(Some(self.unlink(link, current))),
            }
        }
        Ok(None)
    }
}

/// Borrowing in-order walk over a [`RawSoMap`].
pub(crate) struct InOrder<'a, K, V> {
    nodes: &'a Arena<Node<K, V>>,
    stack: Stack,
    next: Option<Handle>,
    remaining: usize,
}

impl<K, V> Clone for InOrder<'_, K, V> {
    fn clone(&self) -> Self {
        InOrder {
            nodes: self.nodes,
            stack: self.stack.clone(),
            next: self.next,
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iterator for InOrder<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(handle) = self.next {
            self.stack.push(handle);
            self.next = self.nodes.get(handle).left();
        }

        let node = self.nodes.get(self.stack.pop()?);
        self.next = node.right();
        self.remaining -= 1;
        Some((node.key(), node.value()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
