use thiserror::Error;

/// The error returned when a lookup does not find its key.
///
/// # Examples
///
/// ```
/// use avl_bst::{AVLTreeMap, KeyNotFound};
///
/// let map = AVLTreeMap::from([(1, "a")]);
/// assert_eq!(map.find(&1), Ok(&"a"));
/// assert_eq!(map.find(&2), Err(KeyNotFound));
/// ```
#[derive(Clone, Copy, Debug, Error, Eq, PartialEq, Hash)]
#[error("key not found")]
pub struct KeyNotFound;
