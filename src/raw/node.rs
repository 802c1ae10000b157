use super::balance::Balance;
use super::handle::Handle;

/// Which child slot of a parent a node occupies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    /// Returns the other side.
    #[inline]
    pub(crate) const fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// The change to a parent's balance when the subtree on this side grows by one level.
    /// A shrinking subtree changes it by the negation.
    #[inline]
    pub(crate) const fn delta(self) -> i8 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }

    /// The heavier side of a node whose balance is `balance` (non-zero).
    #[inline]
    pub(crate) const fn heavier(balance: i8) -> Self {
        if balance < 0 { Side::Left } else { Side::Right }
    }
}

// Binary tree node. The value lives in a separate arena; the node only carries its handle.
#[derive(Clone)]
pub(crate) struct Node<K> {
    key: K,
    value: Handle,
    balance: Balance,
    // Non-owning back-link; `None` for the root.
    parent: Option<Handle>,
    left: Option<Handle>,
    right: Option<Handle>,
}

impl<K> Node<K> {
    /// Creates a detached leaf with balance 0.
    pub(crate) const fn new(key: K, value: Handle, parent: Option<Handle>) -> Self {
        Self {
            key,
            value,
            balance: Balance::ZERO,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub(crate) const fn key(&self) -> &K {
        &self.key
    }

    /// Returns the handle of this node's value.
    #[inline]
    pub(crate) const fn value(&self) -> Handle {
        self.value
    }

    #[inline]
    pub(crate) const fn balance(&self) -> i8 {
        self.balance.to_i8()
    }

    #[inline]
    pub(crate) fn set_balance(&mut self, balance: i8) {
        self.balance = Balance::from_i8(balance);
    }

    /// Adds `diff` to the balance and returns the new balance.
    #[inline]
    pub(crate) fn update_balance(&mut self, diff: i8) -> i8 {
        self.set_balance(self.balance() + diff);
        self.balance()
    }

    #[inline]
    pub(crate) const fn parent(&self) -> Option<Handle> {
        self.parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, parent: Option<Handle>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) const fn left(&self) -> Option<Handle> {
        self.left
    }

    #[inline]
    pub(crate) const fn right(&self) -> Option<Handle> {
        self.right
    }

    #[inline]
    pub(crate) const fn child(&self, side: Side) -> Option<Handle> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    #[inline]
    pub(crate) fn set_child(&mut self, side: Side, child: Option<Handle>) {
        match side {
            Side::Left => self.left = child,
            Side::Right => self.right = child,
        }
    }

    /// Returns true if both child slots are occupied.
    #[inline]
    pub(crate) const fn has_two_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Returns the sole child, if any. Meaningless for a node with two children.
    #[inline]
    pub(crate) fn only_child(&self) -> Option<Handle> {
        self.left.or(self.right)
    }

    /// The full set of structural fields, used by node swaps.
    #[inline]
    pub(crate) const fn links(&self) -> Links {
        Links {
            parent: self.parent,
            left: self.left,
            right: self.right,
            balance: self.balance,
        }
    }

    #[inline]
    pub(crate) fn set_links(&mut self, links: Links) {
        self.parent = links.parent;
        self.left = links.left;
        self.right = links.right;
        self.balance = links.balance;
    }

    /// Consumes the node, returning its key and value handle.
    pub(crate) fn into_parts(self) -> (K, Handle) {
        (self.key, self.value)
    }
}

/// A node's position in the tree: everything except its key and value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Links {
    pub(crate) parent: Option<Handle>,
    pub(crate) left: Option<Handle>,
    pub(crate) right: Option<Handle>,
    pub(crate) balance: Balance,
}

impl Links {
    /// Rewrites every link with `f`, leaving the balance alone.
    pub(crate) fn map(self, f: impl Fn(Option<Handle>) -> Option<Handle>) -> Self {
        Self {
            parent: f(self.parent),
            left: f(self.left),
            right: f(self.right),
            balance: self.balance,
        }
    }
}

impl<K: core::fmt::Debug> core::fmt::Debug for Node<K> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Node")
            .field("key", &self.key)
            .field("balance", &self.balance.to_i8())
            .field("parent", &self.parent.map(Handle::to_index))
            .field("left", &self.left.map(Handle::to_index))
            .field("right", &self.right.map(Handle::to_index))
            .finish()
    }
}
