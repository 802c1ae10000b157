use alloc::vec::Vec;
use core::borrow::Borrow;
use core::cmp::Ordering;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Node, Side};
use crate::error::KeyNotFound;

/// The core AVL tree backing `AVLTreeMap`.
///
/// This file holds the ordered-tree substrate (lookup, in-order stepping, link surgery,
/// bookkeeping). The balancing half lives in `rebalance.rs`.
#[derive(Clone)]
pub(crate) struct RawAVLTreeMap<K, V> {
    /// Arena storing all tree nodes.
    pub(super) nodes: Arena<Node<K>>,
    /// Arena storing all values. Nodes move during rebalancing; values never do.
    pub(super) values: Arena<V>,
    /// Handle to the root node, if the tree is non-empty.
    pub(super) root: Option<Handle>,
    /// Total number of key-value pairs in the tree.
    pub(super) len: usize,
}

/// Result of walking down the tree looking for a key.
pub(crate) enum SearchResult {
    /// The key is stored at this node.
    Found(Handle),
    /// The key is absent. A new leaf for it belongs under the given parent on the given side;
    /// `None` when the tree is empty.
    Vacant(Option<(Handle, Side)>),
}

/// Descends from `handle` as far as possible toward `side`.
fn extreme<K>(nodes: &Arena<Node<K>>, mut handle: Handle, side: Side) -> Handle {
    while let Some(child) = nodes.get(handle).child(side) {
        handle = child;
    }
    handle
}

/// In-order neighbour of `handle`: the successor when `toward` is `Right`, the predecessor
/// when it is `Left`.
fn step<K>(nodes: &Arena<Node<K>>, handle: Handle, toward: Side) -> Option<Handle> {
    if let Some(child) = nodes.get(handle).child(toward) {
        return Some(extreme(nodes, child, toward.opposite()));
    }

    // Climb until we arrive from the far side of an ancestor.
    let mut current = handle;
    while let Some(parent) = nodes.get(current).parent() {
        if nodes.get(parent).child(toward.opposite()) == Some(current) {
            return Some(parent);
        }
        current = parent;
    }
    None
}

impl<K, V> RawAVLTreeMap<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            values: Arena::new(),
            root: None,
            len: 0,
        }
    }

    /// Creates a new tree with room for `capacity` entries.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            values: Arena::with_capacity(capacity),
            root: None,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.values.capacity()
    }

    /// Clears all elements from the tree.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.values.clear();
        self.root = None;
        self.len = 0;
    }

    #[cfg(test)]
    pub(crate) const fn root(&self) -> Option<Handle> {
        self.root
    }

    /// Returns a reference to a node by handle.
    pub(crate) fn node(&self, handle: Handle) -> &Node<K> {
        self.nodes.get(handle)
    }

    /// Returns a reference to a value by handle.
    pub(crate) fn value(&self, handle: Handle) -> &V {
        self.values.get(handle)
    }

    /// Returns a reference to a node by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawAVLTreeMap<K, V>`.
    pub(crate) unsafe fn node_ptr<'a>(ptr: *const Self, handle: Handle) -> &'a Node<K> {
        // SAFETY: Only the `nodes` field is touched, so this never aliases the `values` arena.
        unsafe { (*core::ptr::addr_of!((*ptr).nodes)).get(handle) }
    }

    /// Returns the in-order neighbour of `handle` from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawAVLTreeMap<K, V>`.
    pub(crate) unsafe fn step_ptr(ptr: *const Self, handle: Handle, toward: Side) -> Option<Handle> {
        // SAFETY: As for `node_ptr`.
        unsafe { step(&*core::ptr::addr_of!((*ptr).nodes), handle, toward) }
    }

    /// Returns a mutable reference to a value by handle from a raw pointer.
    ///
    /// # Safety
    /// - `ptr` must point to a valid, allocated `RawAVLTreeMap<K, V>`.
    /// - The caller must have logical exclusive access to the value at `handle`.
    pub(crate) unsafe fn value_mut_ptr<'a>(ptr: *mut Self, handle: Handle) -> &'a mut V {
        // SAFETY: Only the `values` field is touched, so this never aliases the `nodes` arena.
        unsafe { (*core::ptr::addr_of_mut!((*ptr).values)).get_mut(handle) }
    }

    /// Returns the node holding the smallest key.
    pub(crate) fn first(&self) -> Option<Handle> {
        self.root.map(|root| extreme(&self.nodes, root, Side::Left))
    }

    /// Returns the node holding the largest key.
    pub(crate) fn last(&self) -> Option<Handle> {
        self.root.map(|root| extreme(&self.nodes, root, Side::Right))
    }

    /// Returns the node with the smallest key greater than `handle`'s key.
    pub(crate) fn successor(&self, handle: Handle) -> Option<Handle> {
        step(&self.nodes, handle, Side::Right)
    }

    /// Returns the node with the largest key less than `handle`'s key.
    pub(crate) fn predecessor(&self, handle: Handle) -> Option<Handle> {
        step(&self.nodes, handle, Side::Left)
    }

    /// Returns which child slot of `parent` holds `child`.
    pub(crate) fn side_of(&self, parent: Handle, child: Handle) -> Side {
        let node = self.nodes.get(parent);
        if node.left() == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(node.right(), Some(child), "`side_of()` - `child` is not a child of `parent`!");
            Side::Right
        }
    }

    /// Puts `new` where `old` hangs under `parent` (or at the root when `parent` is `None`)
    /// and points `new` back at `parent`. `old`'s own links are left for the caller.
    pub(crate) fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Option<Handle>) {
        match parent {
            Some(parent) => {
                let side = self.side_of(parent, old);
                self.nodes.get_mut(parent).set_child(side, new);
            }
            None => self.root = new,
        }
        if let Some(new) = new {
            self.nodes.get_mut(new).set_parent(parent);
        }
    }

    /// Collects every node handle in key order.
    pub(crate) fn in_order(&self) -> Vec<Handle> {
        let mut handles = Vec::with_capacity(self.len);
        let mut current = self.first();
        while let Some(handle) = current {
            handles.push(handle);
            current = self.successor(handle);
        }
        handles
    }

    /// Drains all key-value pairs from the tree in key order.
    /// This is O(n) as it avoids rebalancing, unlike repeated `pop_first`/`pop_last`.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let handles = self.in_order();
        let mut result = Vec::with_capacity(handles.len());
        for handle in handles {
            let (key, value_handle) = self.nodes.take(handle).into_parts();
            result.push((key, self.values.take(value_handle)));
        }
        self.clear();
        result
    }

    /// Height of the tree (0 when empty), found by following the heavier side.
    pub(crate) fn height(&self) -> usize {
        let mut height = 0;
        let mut current = self.root;
        while let Some(handle) = current {
            height += 1;
            let node = self.nodes.get(handle);
            current = if node.balance() < 0 { node.left() } else { node.right() };
        }
        height
    }

    /// Measures every subtree and checks that sibling heights differ by at most one.
    /// Ignores the stored balance factors.
    pub(crate) fn is_balanced(&self) -> bool {
        fn measure<K>(nodes: &Arena<Node<K>>, handle: Option<Handle>) -> Option<usize> {
            let Some(handle) = handle else {
                return Some(0);
            };
            let node = nodes.get(handle);
            let left = measure(nodes, node.left())?;
            let right = measure(nodes, node.right())?;
            (left.abs_diff(right) <= 1).then(|| left.max(right) + 1)
        }

        measure(&self.nodes, self.root).is_some()
    }

    /// Removes the first entry in key order.
    pub(crate) fn pop_first(&mut self) -> Option<(K, V)> {
        let first = self.first()?;
        Some(self.unlink(first))
    }

    /// Removes the last entry in key order.
    pub(crate) fn pop_last(&mut self) -> Option<(K, V)> {
        let last = self.last()?;
        Some(self.unlink(last))
    }

    /// Keeps only the entries for which `f` returns true.
    pub(crate) fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        let mut doomed = Vec::new();
        let mut current = self.first();
        while let Some(handle) = current {
            let node = self.nodes.get(handle);
            if !f(node.key(), self.values.get_mut(node.value())) {
                doomed.push(handle);
            }
            current = step(&self.nodes, handle, Side::Right);
        }

        // Handles survive rotations and swaps, so the list stays valid while we unlink.
        for handle in doomed {
            drop(self.unlink(handle));
        }
    }
}

impl<K: Ord, V> RawAVLTreeMap<K, V> {
    /// Walks down from the root comparing against `key`.
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some(mut current) = self.root else {
            return SearchResult::Vacant(None);
        };

        loop {
            let node = self.nodes.get(current);
            let side = match key.cmp(node.key().borrow()) {
                Ordering::Equal => return SearchResult::Found(current),
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
            };
            match node.child(side) {
                Some(child) => current = child,
                None => return SearchResult::Vacant(Some((current, side))),
            }
        }
    }

    /// Returns the node holding `key`.
    pub(crate) fn find<Q>(&self, key: &Q) -> Result<Handle, KeyNotFound>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.search(key) {
            SearchResult::Found(handle) => Ok(handle),
            SearchResult::Vacant(_) => Err(KeyNotFound),
        }
    }

    /// Returns a reference to the value corresponding to the key.
    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key).ok()?;
        Some(self.values.get(self.nodes.get(handle).value()))
    }

    /// Returns a mutable reference to the value corresponding to the key.
    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key).ok()?;
        let value_handle = self.nodes.get(handle).value();
        Some(self.values.get_mut(value_handle))
    }

    /// Returns the key-value pair corresponding to the key.
    pub(crate) fn get_key_value<Q>(&self, key: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key).ok()?;
        let node = self.nodes.get(handle);
        Some((node.key(), self.values.get(node.value())))
    }

    /// Inserts a key-value pair into the tree.
    /// Returns the old value if the key was already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            SearchResult::Found(handle) => {
                // Overwrite in place; shape and balances are untouched.
                let value_handle = self.nodes.get(handle).value();
                Some(core::mem::replace(self.values.get_mut(value_handle), value))
            }
            SearchResult::Vacant(slot) => {
                let value_handle = self.values.alloc(value);
                let parent = slot.map(|(parent, _)| parent);
                let leaf = self.nodes.alloc(Node::new(key, value_handle, parent));
                self.len += 1;

                match slot {
                    Some((parent, side)) => self.attach(parent, side, leaf),
                    None => self.root = Some(leaf),
                }
                None
            }
        }
    }

    /// Removes a key from the tree and returns the key-value pair.
    pub(crate) fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key).ok()?;
        Some(self.unlink(handle))
    }

    /// Removes a key from the tree and returns the value.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.remove_entry(key).map(|(_, v)| v)
    }
}
