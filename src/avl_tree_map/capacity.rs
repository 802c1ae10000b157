use super::AVLTreeMap;
use crate::raw::RawAVLTreeMap;

impl<K, V> AVLTreeMap<K, V> {
    /// Creates an empty map with room for at least `capacity` entries before the
    /// underlying arenas reallocate.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_bst::AVLTreeMap;
    ///
    /// let map: AVLTreeMap<i32, i32> = AVLTreeMap::with_capacity(32);
    /// assert!(map.is_empty());
    /// assert!(map.capacity() >= 32);
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        AVLTreeMap {
            raw: RawAVLTreeMap::with_capacity(capacity),
        }
    }

    /// Returns how many entries the map can hold without reallocating.
    ///
    /// Slots freed by removals are reused, so the capacity never shrinks.
    ///
    /// This is an extension and is not part of the standard `BTreeMap` API.
    ///
    /// # Examples
    ///
    /// ```
    /// use avl_bst::AVLTreeMap;
    ///
    /// let mut map = AVLTreeMap::with_capacity(4);
    /// let before = map.capacity();
    /// map.insert(1, "a");
    /// map.remove(&1);
    /// map.insert(2, "b");
    /// assert_eq!(map.capacity(), before);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
