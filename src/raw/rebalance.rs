//! AVL balancing: balance bookkeeping on insert and remove, rotations and node swaps.
//!
//! Balance factors are `height(right) - height(left)`. Both fix-up walks climb parent links
//! and stop as soon as a subtree is known to have kept its height.

use super::handle::Handle;
use super::node::Side;
use super::raw_avl_tree::RawAVLTreeMap;

impl<K, V> RawAVLTreeMap<K, V> {
    /// Hangs a freshly allocated `leaf` under `parent` on `side` and restores the AVL invariant.
    pub(super) fn attach(&mut self, parent: Handle, side: Side, leaf: Handle) {
        let node = self.nodes.get_mut(parent);
        node.set_child(side, Some(leaf));

        // Landing at 0 means the parent already had a child on the other side, so its height
        // did not change.
        if node.update_balance(side.delta()) != 0 {
            self.insert_fix(parent, leaf);
        }
    }

    /// Propagates a one-level height increase of `parent` (reached through `child`) upward.
    fn insert_fix(&mut self, mut parent: Handle, mut child: Handle) {
        while let Some(grandparent) = self.nodes.get(parent).parent() {
            let side = self.side_of(grandparent, parent);
            match self.nodes.get_mut(grandparent).update_balance(side.delta()) {
                0 => return,
                -1 | 1 => {
                    child = parent;
                    parent = grandparent;
                }
                _ => {
                    self.fix_insert_violation(grandparent, parent, child, side);
                    return;
                }
            }
        }
    }

    /// Resolves a ±2 at `grandparent` after an insertion. `parent` hangs on `side` of
    /// `grandparent`; `child` is the child of `parent` the growth came through.
    ///
    /// Either rotation restores the subtree's height from before the insertion.
    fn fix_insert_violation(&mut self, grandparent: Handle, parent: Handle, child: Handle, side: Side) {
        let s = side.delta();

        if self.nodes.get(parent).child(side) == Some(child) {
            // zig-zig
            self.rotate(grandparent, side.opposite());
            self.nodes.get_mut(parent).set_balance(0);
            self.nodes.get_mut(grandparent).set_balance(0);
            return;
        }

        // zig-zag: `child` ends up on top.
        let (parent_balance, grandparent_balance) = match self.nodes.get(child).balance() {
            0 => (0, 0),
            c if c == s => (0, -s),
            _ => (s, 0),
        };
        self.rotate(parent, side);
        self.rotate(grandparent, side.opposite());
        self.nodes.get_mut(parent).set_balance(parent_balance);
        self.nodes.get_mut(grandparent).set_balance(grandparent_balance);
        self.nodes.get_mut(child).set_balance(0);
    }

    /// Unlinks `handle` from the tree, restores the AVL invariant and returns its key and value.
    pub(super) fn unlink(&mut self, handle: Handle) -> (K, V) {
        // Trade places with the successor so the node to splice out has at most one child.
        if self.nodes.get(handle).has_two_children()
            && let Some(successor) = self.successor(handle)
        {
            self.node_swap(handle, successor);
        }

        let node = self.nodes.get(handle);
        let parent = node.parent();
        let child = node.only_child();
        let side = parent.map(|parent| self.side_of(parent, handle));
        self.replace_child(parent, handle, child);

        let (key, value_handle) = self.nodes.take(handle).into_parts();
        let value = self.values.take(value_handle);
        self.len -= 1;

        if let (Some(parent), Some(side)) = (parent, side) {
            self.remove_fix(parent, -side.delta());
        }
        (key, value)
    }

    /// Applies `diff` to `start`'s balance after one of its subtrees shrank, and keeps
    /// climbing while subtree heights keep shrinking.
    fn remove_fix(&mut self, start: Handle, diff: i8) {
        let mut current = Some(start);
        let mut diff = diff;

        while let Some(node) = current {
            // Taken before any rotation: the node that replaces `node` inherits its slot.
            let parent = self.nodes.get(node).parent();
            let next_diff = parent.map_or(-1, |parent| -self.side_of(parent, node).delta());

            let balance = self.nodes.get(node).balance() + diff;
            match balance {
                -1 | 1 => {
                    self.nodes.get_mut(node).set_balance(balance);
                    return;
                }
                0 => self.nodes.get_mut(node).set_balance(0),
                _ => {
                    if !self.fix_remove_violation(node, Side::heavier(balance)) {
                        return;
                    }
                }
            }

            current = parent;
            diff = next_diff;
        }
    }

    /// Resolves a ±2 at `node` after a removal on the side opposite `heavy`.
    /// Returns true if the subtree ended up one level shorter.
    fn fix_remove_violation(&mut self, node: Handle, heavy: Side) -> bool {
        let s = heavy.delta();
        let child = self
            .nodes
            .get(node)
            .child(heavy)
            .expect("`fix_remove_violation()` - heavy side has no child!");
        let child_balance = self.nodes.get(child).balance();

        if child_balance == -s {
            // zig-zag: the inner grandchild ends up on top.
            let grandchild = self
                .nodes
                .get(child)
                .child(heavy.opposite())
                .expect("`fix_remove_violation()` - inner grandchild missing!");
            let (node_balance, child_balance) = match self.nodes.get(grandchild).balance() {
                0 => (0, 0),
                g if g == s => (-s, 0),
                _ => (0, s),
            };
            self.rotate(child, heavy);
            self.rotate(node, heavy.opposite());
            self.nodes.get_mut(node).set_balance(node_balance);
            self.nodes.get_mut(child).set_balance(child_balance);
            self.nodes.get_mut(grandchild).set_balance(0);
            return true;
        }

        self.rotate(node, heavy.opposite());
        if child_balance == 0 {
            self.nodes.get_mut(node).set_balance(s);
            self.nodes.get_mut(child).set_balance(-s);
            false
        } else {
            // zig-zig
            self.nodes.get_mut(node).set_balance(0);
            self.nodes.get_mut(child).set_balance(0);
            true
        }
    }

    /// Rotates `pivot` down toward `direction`; its child on the other side rises into its
    /// place. `Side::Right` is a right rotation. Balance factors are left to the caller.
    pub(super) fn rotate(&mut self, pivot: Handle, direction: Side) {
        let rising_side = direction.opposite();
        let rising = self
            .nodes
            .get(pivot)
            .child(rising_side)
            .expect("`rotate()` - `pivot` has no child to rotate up!");
        let inner = self.nodes.get(rising).child(direction);
        let above = self.nodes.get(pivot).parent();

        self.replace_child(above, pivot, Some(rising));
        self.nodes.get_mut(rising).set_child(direction, Some(pivot));

        let pivot_node = self.nodes.get_mut(pivot);
        pivot_node.set_parent(Some(rising));
        pivot_node.set_child(rising_side, inner);
        if let Some(inner) = inner {
            self.nodes.get_mut(inner).set_parent(Some(pivot));
        }
    }

    /// Exchanges the tree positions of `a` and `b`, balance factors included. Keys, values
    /// and handles stay with their nodes.
    pub(super) fn node_swap(&mut self, a: Handle, b: Handle) {
        let a_links = self.nodes.get(a).links();
        let b_links = self.nodes.get(b).links();
        let a_side = a_links.parent.map(|parent| self.side_of(parent, a));
        let b_side = b_links.parent.map(|parent| self.side_of(parent, b));

        // When one node links to the other, that link must follow the swap too.
        let exchange = move |link: Option<Handle>| match link {
            Some(h) if h == a => Some(b),
            Some(h) if h == b => Some(a),
            other => other,
        };

        // Outside parents first, while both old slots are still known.
        if let (Some(parent), Some(side)) = (a_links.parent, a_side)
            && parent != b
        {
            self.nodes.get_mut(parent).set_child(side, Some(b));
        }
        if let (Some(parent), Some(side)) = (b_links.parent, b_side)
            && parent != a
        {
            self.nodes.get_mut(parent).set_child(side, Some(a));
        }
        if self.root == Some(a) {
            self.root = Some(b);
        } else if self.root == Some(b) {
            self.root = Some(a);
        }

        self.nodes.get_mut(a).set_links(b_links.map(exchange));
        self.nodes.get_mut(b).set_links(a_links.map(exchange));

        for handle in [a, b] {
            let node = self.nodes.get(handle);
            for child in [node.left(), node.right()].into_iter().flatten() {
                self.nodes.get_mut(child).set_parent(Some(handle));
            }
        }
    }
}
