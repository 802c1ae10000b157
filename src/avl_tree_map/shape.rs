use super::AVLTreeMap;

impl<K, V> AVLTreeMap<K, V> {
    /// Returns the number of levels in the tree: 0 when empty, 1 for a single entry.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API. An AVL tree
    /// holding `n` entries is never taller than about 1.44 log<sub>2</sub>(n + 2).
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_bst::AVLTreeMap;
    ///
    /// // Ascending inserts would degenerate into a list in a plain search tree.
    /// let map: AVLTreeMap<u32, ()> = (0..7).map(|k| (k, ())).collect();
    /// assert_eq!(map.height(), 3);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(log n). The walk follows the stored balance factors down the taller side.
    #[must_use]
    pub fn height(&self) -> usize {
        self.raw.height()
    }

    /// Returns `true` if, at every node, the heights of the two subtrees differ by at most one.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API. It measures
    /// every subtree from scratch instead of trusting the stored balance factors, so it
    /// works as a consistency check. It holds after every public operation.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_bst::AVLTreeMap;
    ///
    /// let mut map: AVLTreeMap<u32, ()> = (0..100).map(|k| (k, ())).collect();
    /// map.retain(|k, _| k % 3 == 0);
    /// assert!(map.is_balanced());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(n)
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.raw.is_balanced()
    }
}
