#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use avl_bst::avl_tree_map;
use avl_bst::{AVLTreeMap, KeyNotFound};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use static_assertions::{assert_impl_all, assert_not_impl_any};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

assert_impl_all!(AVLTreeMap<i64, i64>: Send, Sync, Clone, Default);
assert_impl_all!(avl_tree_map::Iter<'static, i64, i64>: Send, Sync, Clone);
assert_impl_all!(avl_tree_map::IterMut<'static, i64, i64>: Send);
assert_not_impl_any!(avl_tree_map::IterMut<'static, i64, i64>: Sync, Clone);
assert_impl_all!(avl_tree_map::IntoIter<i64, i64>: Send, Sync);

/// Keys drawn from a range smaller than `TEST_SIZE` so that operations collide.
fn key_strategy() -> impl Strategy<Value = i64> {
    -1_000i64..1_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

/// Tallest an AVL tree holding `len` entries may be.
fn height_bound(len: usize) -> usize {
    (1.44 * ((len + 2) as f64).log2()).ceil() as usize
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    RemoveEntry(i64),
    Get(i64),
    Find(i64),
    ContainsKey(i64),
    GetKeyValue(i64),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        6 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        1 => key_strategy().prop_map(MapOp::RemoveEntry),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::Find),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

fn entries_of(map: &AVLTreeMap<i64, i64>) -> Vec<(i64, i64)> {
    map.iter().map(|(&k, &v)| (k, v)).collect()
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both AVLTreeMap and BTreeMap and
    /// asserts identical results and a balanced tree at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut avl_map: AVLTreeMap<i64, i64> = AVLTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    prop_assert_eq!(avl_map.insert(*k, *v), bt_map.insert(*k, *v), "insert({}, {})", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(avl_map.remove(k), bt_map.remove(k), "remove({})", k);
                }
                MapOp::RemoveEntry(k) => {
                    prop_assert_eq!(avl_map.remove_entry(k), bt_map.remove_entry(k), "remove_entry({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(avl_map.get(k), bt_map.get(k), "get({})", k);
                }
                MapOp::Find(k) => {
                    prop_assert_eq!(avl_map.find(k), bt_map.get(k).ok_or(KeyNotFound), "find({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(avl_map.contains_key(k), bt_map.contains_key(k), "contains_key({})", k);
                }
                MapOp::GetKeyValue(k) => {
                    prop_assert_eq!(avl_map.get_key_value(k), bt_map.get_key_value(k), "get_key_value({})", k);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(avl_map.first_key_value(), bt_map.first_key_value(), "first_key_value");
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(avl_map.last_key_value(), bt_map.last_key_value(), "last_key_value");
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(avl_map.pop_first(), bt_map.pop_first(), "pop_first");
                }
                MapOp::PopLast => {
                    prop_assert_eq!(avl_map.pop_last(), bt_map.pop_last(), "pop_last");
                }
            }
            prop_assert_eq!(avl_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(avl_map.is_empty(), bt_map.is_empty(), "is_empty mismatch after {:?}", op);
            prop_assert!(avl_map.height() <= height_bound(avl_map.len()), "too tall after {:?}", op);
        }

        prop_assert!(avl_map.is_balanced());
        let bt_items: Vec<_> = bt_map.into_iter().collect();
        prop_assert_eq!(entries_of(&avl_map), bt_items);
    }

    /// Tests that iteration in both directions matches BTreeMap after random insertions.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let avl_map: AVLTreeMap<i64, i64> = entries.iter().copied().collect();
        let bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        prop_assert!(avl_map.iter().eq(bt_map.iter()));
        prop_assert!(avl_map.iter().rev().eq(bt_map.iter().rev()));
        prop_assert!(avl_map.keys().eq(bt_map.keys()));
        prop_assert!(avl_map.values().rev().eq(bt_map.values().rev()));
        prop_assert_eq!(avl_map.iter().len(), bt_map.len());
        prop_assert!(avl_map.clone().into_iter().eq(bt_map.clone()));
        prop_assert!(avl_map.clone().into_keys().rev().eq(bt_map.clone().into_keys().rev()));
        prop_assert!(avl_map.into_values().eq(bt_map.into_values()));
    }

    /// Tests get_mut, iter_mut and values_mut behave like BTreeMap.
    #[test]
    fn mutation_through_references_matches_btreemap(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE),
        keys_to_mutate in proptest::collection::vec(key_strategy(), 100),
    ) {
        let mut avl_map: AVLTreeMap<i64, i64> = entries.iter().copied().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        for k in &keys_to_mutate {
            if let Some(v) = avl_map.get_mut(k) {
                *v = v.wrapping_add(1);
            }
            if let Some(v) = bt_map.get_mut(k) {
                *v = v.wrapping_add(1);
            }
        }
        for (k, v) in avl_map.iter_mut().rev() {
            *v ^= k;
        }
        for (k, v) in bt_map.iter_mut().rev() {
            *v ^= k;
        }
        for v in avl_map.values_mut() {
            *v = v.wrapping_mul(3);
        }
        for v in bt_map.values_mut() {
            *v = v.wrapping_mul(3);
        }

        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(entries_of(&avl_map), bt_items);
    }

    /// Tests retain matches BTreeMap and leaves a balanced tree.
    #[test]
    fn retain_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut avl_map: AVLTreeMap<i64, i64> = entries.iter().copied().collect();
        let mut bt_map: BTreeMap<i64, i64> = entries.iter().copied().collect();

        avl_map.retain(|k, _v| k % 3 != 0);
        bt_map.retain(|k, _v| k % 3 != 0);

        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(entries_of(&avl_map), bt_items, "retain mismatch");
        prop_assert_eq!(avl_map.len(), bt_map.len(), "retain len mismatch");
        prop_assert!(avl_map.is_balanced());
    }

    /// Tests that clear produces an empty map that can be reused.
    #[test]
    fn clear_empties_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let mut avl_map: AVLTreeMap<i64, i64> = entries.iter().copied().collect();
        avl_map.clear();
        prop_assert!(avl_map.is_empty());
        prop_assert_eq!(avl_map.len(), 0);
        prop_assert_eq!(avl_map.height(), 0);
        prop_assert_eq!(avl_map.iter().count(), 0);

        avl_map.insert(1, 1);
        prop_assert_eq!(avl_map.height(), 1);
    }

    /// Overwriting existing keys changes neither the length nor the height.
    #[test]
    fn overwrite_is_shape_preserving(entries in proptest::collection::vec((key_strategy(), value_strategy()), 1..TEST_SIZE)) {
        let mut avl_map: AVLTreeMap<i64, i64> = entries.iter().copied().collect();
        let len = avl_map.len();
        let height = avl_map.height();

        for (k, v) in &entries {
            let old = avl_map.insert(*k, v.wrapping_add(1));
            prop_assert!(old.is_some());
        }

        prop_assert_eq!(avl_map.len(), len);
        prop_assert_eq!(avl_map.height(), height);
        prop_assert!(avl_map.is_balanced());
    }

    /// Comparison traits agree with BTreeMap's.
    #[test]
    fn ordering_matches_btreemap(
        a in proptest::collection::vec((0i64..20, 0i64..4), 0..12),
        b in proptest::collection::vec((0i64..20, 0i64..4), 0..12),
    ) {
        let (avl_a, avl_b): (AVLTreeMap<i64, i64>, AVLTreeMap<i64, i64>) =
            (a.iter().copied().collect(), b.iter().copied().collect());
        let (bt_a, bt_b): (BTreeMap<i64, i64>, BTreeMap<i64, i64>) =
            (a.iter().copied().collect(), b.iter().copied().collect());

        prop_assert_eq!(avl_a == avl_b, bt_a == bt_b);
        prop_assert_eq!(avl_a.cmp(&avl_b), bt_a.cmp(&bt_b));
        prop_assert_eq!(avl_a.partial_cmp(&avl_b), bt_a.partial_cmp(&bt_b));
    }
}

// ─── Balancing ───────────────────────────────────────────────────────────────

#[test]
fn ascending_inserts_stay_logarithmic() {
    let mut map = AVLTreeMap::new();
    for k in 0..10_000u32 {
        map.insert(k, ());
        assert!(map.height() <= height_bound(map.len()), "height {} at len {}", map.height(), map.len());
    }
    assert!(map.is_balanced());

    // Perfect trees: 2^h - 1 ascending keys fill exactly h levels.
    for levels in 1..12 {
        let perfect: AVLTreeMap<u32, ()> = (0..(1u32 << levels) - 1).map(|k| (k, ())).collect();
        assert_eq!(perfect.height(), levels);
    }
}

#[test]
fn descending_and_zig_zag_inserts_stay_balanced() {
    let descending: AVLTreeMap<i32, ()> = (0..5_000).rev().map(|k| (k, ())).collect();
    assert!(descending.is_balanced());
    assert!(descending.height() <= height_bound(5_000));

    // Alternate ends so every insertion lands on an inner branch.
    let mut zig_zag = AVLTreeMap::new();
    for k in 0..2_500 {
        zig_zag.insert(k, ());
        zig_zag.insert(10_000 - k, ());
    }
    assert!(zig_zag.is_balanced());
    assert!(zig_zag.height() <= height_bound(zig_zag.len()));
}

#[test]
fn three_ascending_inserts_rotate_into_two_levels() {
    let mut map = AVLTreeMap::new();
    for k in [30, 20, 10] {
        map.insert(k, k);
    }
    assert_eq!(map.height(), 2);
    assert!(map.is_balanced());

    // One more key below 30 leans the tree without another rotation.
    map.insert(25, 25);
    assert_eq!(map.height(), 3);
    assert!(map.is_balanced());
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [10, 20, 25, 30]);
}

#[test]
fn removing_root_of_perfect_tree() {
    let mut map: AVLTreeMap<i32, i32> = [4, 2, 6, 1, 3, 5, 7].into_iter().map(|k| (k, k * 10)).collect();
    assert_eq!(map.height(), 3);

    assert_eq!(map.remove(&4), Some(40));
    assert_eq!(map.height(), 3);
    assert!(map.is_balanced());
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), [1, 2, 3, 5, 6, 7]);
    assert_eq!(map.first_key_value(), Some((&1, &10)));
    assert_eq!(map.last_key_value(), Some((&7, &70)));
}

#[test]
fn removing_absent_key_is_a_no_op() {
    let mut map: AVLTreeMap<i32, i32> = (1..=8).map(|k| (k, k)).collect();
    let before = map.clone();

    assert_eq!(map.remove(&42), None);
    assert_eq!(map.remove_entry(&0), None);
    assert_eq!(map, before);
    assert_eq!(map.height(), before.height());
}

#[test]
fn draining_from_both_ends_stays_balanced() {
    let mut map: AVLTreeMap<u32, u32> = (0..1_000).map(|k| (k, k)).collect();
    let mut expected_front = 0;
    let mut expected_back = 999;
    while !map.is_empty() {
        assert_eq!(map.pop_first(), Some((expected_front, expected_front)));
        expected_front += 1;
        if let Some((k, _)) = map.pop_last() {
            assert_eq!(k, expected_back);
            expected_back -= 1;
        }
        assert!(map.height() <= height_bound(map.len()));
    }
    assert_eq!(map.pop_first(), None);
    assert_eq!(map.pop_last(), None);
}

// ─── Lookup and errors ───────────────────────────────────────────────────────

#[test]
fn find_propagates_with_question_mark() {
    fn total(map: &AVLTreeMap<&str, u32>, parts: &[&str]) -> Result<u32, KeyNotFound> {
        let mut sum = 0;
        for part in parts {
            sum += map.find(part)?;
        }
        Ok(sum)
    }

    let map = AVLTreeMap::from([("bolts", 3), ("nuts", 4)]);
    assert_eq!(total(&map, &["bolts", "nuts"]), Ok(7));
    assert_eq!(total(&map, &["bolts", "rivets"]), Err(KeyNotFound));
    assert_eq!(KeyNotFound.to_string(), "key not found");
}

#[test]
fn borrowed_lookups() {
    let mut map: AVLTreeMap<String, usize> = ["pear", "apple", "fig"].iter().map(|s| ((*s).to_owned(), s.len())).collect();

    assert_eq!(map.get("apple"), Some(&5));
    assert_eq!(map["fig"], 3);
    assert_eq!(map.get_key_value("pear").map(|(k, _)| k.as_str()), Some("pear"));
    assert_eq!(map.remove("fig"), Some(3));
    assert!(!map.contains_key("fig"));
    assert_eq!(map.find("plum"), Err(KeyNotFound));
}

#[test]
#[should_panic(expected = "no entry found for key")]
fn index_panics_on_missing_key() {
    let map: AVLTreeMap<i32, i32> = AVLTreeMap::new();
    let _ = map[&1];
}

// ─── Construction and traits ─────────────────────────────────────────────────

#[test]
fn construction_paths_agree() {
    let from_array = AVLTreeMap::from([(3, 'c'), (1, 'a'), (2, 'b')]);
    let collected: AVLTreeMap<_, _> = vec![(2, 'b'), (3, 'c'), (1, 'a')].into_iter().collect();
    let mut extended = AVLTreeMap::with_capacity(3);
    extended.extend([(1, 'a'), (3, 'c')]);
    extended.extend([(&2, &'b')]);

    assert_eq!(from_array, collected);
    assert_eq!(from_array, extended);
    assert!(extended.capacity() >= 3);
    assert_eq!(AVLTreeMap::<i32, char>::default(), AVLTreeMap::new());
}

#[test]
fn later_duplicates_win() {
    let map = AVLTreeMap::from([(1, "first"), (2, "only"), (1, "second")]);
    assert_eq!(map.len(), 2);
    assert_eq!(map[&1], "second");
}

#[test]
fn clones_are_independent() {
    let original: AVLTreeMap<i32, i32> = (0..100).map(|k| (k, k)).collect();
    let mut copy = original.clone();
    copy.retain(|k, _| k % 2 == 0);
    copy.insert(1_000, 0);

    assert_eq!(original.len(), 100);
    assert_eq!(copy.len(), 51);
    assert!(original.is_balanced());
    assert!(copy.is_balanced());
}

#[test]
fn equal_maps_hash_equally() {
    fn hash_of(map: &AVLTreeMap<i32, i32>) -> u64 {
        let mut hasher = DefaultHasher::new();
        map.hash(&mut hasher);
        hasher.finish()
    }

    let ascending: AVLTreeMap<i32, i32> = (0..50).map(|k| (k, -k)).collect();
    let descending: AVLTreeMap<i32, i32> = (0..50).rev().map(|k| (k, -k)).collect();
    assert_eq!(ascending, descending);
    assert_eq!(hash_of(&ascending), hash_of(&descending));
}

#[test]
fn debug_output_matches_btreemap() {
    let avl_map = AVLTreeMap::from([(2, "b"), (1, "a")]);
    let bt_map = BTreeMap::from([(2, "b"), (1, "a")]);
    assert_eq!(format!("{avl_map:?}"), format!("{bt_map:?}"));
}

#[test]
fn iterators_report_exact_lengths() {
    let mut map: AVLTreeMap<i32, i32> = (0..10).map(|k| (k, k)).collect();

    let mut iter = map.iter();
    iter.next();
    iter.next_back();
    assert_eq!(iter.len(), 8);
    assert_eq!(iter.size_hint(), (8, Some(8)));

    let mut values = map.values_mut();
    values.next();
    assert_eq!(values.len(), 9);

    let mut into_iter = map.into_iter();
    into_iter.next_back();
    assert_eq!(into_iter.len(), 9);
    assert_eq!(into_iter.next(), Some((0, 0)));
}

#[test]
fn exhausted_iterators_stay_exhausted() {
    let map = AVLTreeMap::from([(1, 1)]);
    let mut iter = map.iter();
    assert_eq!(iter.next(), Some((&1, &1)));
    assert_eq!(iter.next(), None);
    assert_eq!(iter.next_back(), None);
    assert_eq!(iter.next(), None);
}
