/// Signed balance factor of a node: `height(right) - height(left)`.
///
/// Between operations every node holds `-1..=1`. A fix-up walk may transiently store `-2` or
/// `2` on the node it is about to rotate; anything outside `-2..=2` is a bookkeeping bug.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[repr(transparent)]
pub(crate) struct Balance(i8);

impl Balance {
    pub(crate) const MIN: i8 = -2;
    pub(crate) const MAX: i8 = 2;
    pub(crate) const ZERO: Self = Self(0);

    #[inline]
    pub(crate) const fn from_i8(balance: i8) -> Self {
        assert!(
            balance >= Self::MIN && balance <= Self::MAX,
            "`Balance::from_i8()` - `balance` outside -2..=2!"
        );
        Self(balance)
    }

    #[inline]
    pub(crate) const fn to_i8(self) -> i8 {
        self.0
    }

    /// True when the node satisfies the AVL bound.
    #[cfg(test)]
    #[inline]
    pub(crate) const fn is_valid(self) -> bool {
        self.0 >= -1 && self.0 <= 1
    }
}
