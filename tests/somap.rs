use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use somap::{Error, Kind, Natural, Reversed, SoMap, Step, Value};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Keys drawn from a range smaller than `TEST_SIZE` so that operations collide.
fn key_strategy() -> impl Strategy<Value = i64> {
    -500i64..500i64
}

const CANONICAL_KEYS: [&str; 7] = ["x", "z", "y", "b", "a", "c", "d"];

fn canonical_map() -> SoMap<String, String> {
    let mut map = SoMap::new();
    for key in CANONICAL_KEYS {
        map.set(format!("{key}-key"), format!("{key}-value")).unwrap();
    }
    map
}

/// Deterministic pseudo-random keys.
fn random_keys(n: usize) -> Vec<i64> {
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Set(i64, i64),
    Delete(i64),
    Get(i64),
    Has(i64),
    Min,
    Max,
    Clear,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        6 => (key_strategy(), any::<i64>()).prop_map(|(k, v)| MapOp::Set(k, v)),
        3 => key_strategy().prop_map(MapOp::Delete),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::Has),
        1 => Just(MapOp::Min),
        1 => Just(MapOp::Max),
        1 => Just(MapOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both SoMap and BTreeMap and asserts identical
    /// results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut so_map: SoMap<i64, i64> = SoMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Set(k, v) => {
                    let so_result = so_map.insert(*k, *v).unwrap();
                    let bt_result = bt_map.insert(*k, *v);
                    prop_assert_eq!(so_result, bt_result, "insert({}, {})", k, v);
                }
                MapOp::Delete(k) => {
                    let so_result = so_map.delete(k).unwrap();
                    let bt_result = bt_map.remove(k).is_some();
                    prop_assert_eq!(so_result, bt_result, "delete({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(so_map.get(k).unwrap(), bt_map.get(k), "get({})", k);
                }
                MapOp::Has(k) => {
                    prop_assert_eq!(so_map.has(k).unwrap(), bt_map.contains_key(k), "has({})", k);
                }
                MapOp::Min => {
                    prop_assert_eq!(so_map.min(), bt_map.first_key_value());
                }
                MapOp::Max => {
                    prop_assert_eq!(so_map.max(), bt_map.last_key_value());
                }
                MapOp::Clear => {
                    so_map.clear();
                    bt_map.clear();
                }
            }
            prop_assert_eq!(so_map.len(), bt_map.len());
        }

        prop_assert!(so_map.iter().eq(bt_map.iter()));
        prop_assert_eq!(so_map.entries().collect::<Vec<_>>(), bt_map.into_iter().collect::<Vec<_>>());
    }

    /// Every snapshot reflects the map at the moment it was taken.
    #[test]
    fn snapshots_are_isolated_from_later_mutation(
        before in proptest::collection::vec(key_strategy(), 0..200),
        after in proptest::collection::vec(key_strategy(), 0..200),
    ) {
        let mut map = SoMap::new();
        for key in &before {
            map.set(*key, ()).unwrap();
        }
        let expected: Vec<i64> = map.iter().map(|(k, _)| *k).collect();
        let keys = map.keys();

        for key in &after {
            if !map.delete(key).unwrap() {
                map.set(*key, ()).unwrap();
            }
        }

        prop_assert_eq!(keys.snapshot_len(), expected.len());
        prop_assert_eq!(keys.collect::<Vec<_>>(), expected);
    }
}

// ─── Canonical scenario ──────────────────────────────────────────────────────

#[test]
fn canonical_keys_traverse_in_order() {
    let map = canonical_map();

    assert_eq!(
        map.keys().collect::<Vec<_>>(),
        ["a-key", "b-key", "c-key", "d-key", "x-key", "y-key", "z-key"]
    );
    assert_eq!(
        map.to_string(),
        "SoMap 7 { a-key => a-value, b-key => b-value, c-key => c-value, d-key => d-value, \
         x-key => x-value, y-key => y-value, z-key => z-value }"
    );
}

#[test]
fn deleting_the_root_promotes_its_successor() {
    let mut map = canonical_map();

    assert!(map.delete("x-key").unwrap());
    assert_eq!(map.len(), 6);
    assert_eq!(
        map.to_string(),
        "SoMap 6 { a-key => a-value, b-key => b-value, c-key => c-value, d-key => d-value, \
         y-key => y-value, z-key => z-value }"
    );
    assert_eq!(map.get("x-key").unwrap(), None);
    assert_eq!(map.get("y-key").unwrap().map(String::as_str), Some("y-value"));
}

#[test]
fn delete_all_in_any_order() {
    let sorted = {
        let mut keys = CANONICAL_KEYS.to_vec();
        keys.sort_unstable();
        keys
    };
    let reversed: Vec<_> = sorted.iter().rev().copied().collect();

    for order in [CANONICAL_KEYS.to_vec(), sorted, reversed] {
        let mut map = canonical_map();
        for (deleted, key) in order.iter().enumerate() {
            assert!(map.delete(&format!("{key}-key")).unwrap(), "delete({key})");
            assert_eq!(map.len(), CANONICAL_KEYS.len() - deleted - 1);

            let keys: Vec<_> = map.keys().collect();
            assert!(keys.windows(2).all(|pair| pair[0] < pair[1]), "{keys:?}");
        }
        assert!(map.is_empty());
        assert_eq!(map.to_string(), "SoMap 0 { }");
    }
}

#[test]
fn set_twice_keeps_one_entry() {
    let mut map = SoMap::new();
    map.set("k", 1).unwrap().set("k", 2).unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(map.get("k").unwrap(), Some(&2));
    assert_eq!(map.insert("k", 3).unwrap(), Some(2));
}

#[test]
fn missing_keys_are_not_errors() {
    let mut map = canonical_map();

    assert_eq!(map.get("q-key").unwrap(), None);
    assert!(!map.has("q-key").unwrap());
    assert!(!map.delete("q-key").unwrap());
    assert_eq!(map.len(), 7);
}

#[test]
fn reverse_comparator_reverses_traversal() {
    let mut map = SoMap::<&str, usize, _>::with_comparator(|a, b| b.cmp(a));
    for (i, key) in CANONICAL_KEYS.into_iter().enumerate() {
        map.set(key, i).unwrap();
    }

    assert_eq!(map.keys().collect::<Vec<_>>(), ["z", "y", "x", "d", "c", "b", "a"]);
    assert_eq!(map.min(), Some((&"z", &1)));
    assert_eq!(map.max(), Some((&"a", &4)));

    let mut by_ordering = SoMap::with_ordering(Reversed(Natural));
    by_ordering.try_extend(CANONICAL_KEYS.into_iter().enumerate().map(|(i, k)| (k, i))).unwrap();
    assert!(map.iter().eq(by_ordering.iter()));
}

#[test]
fn closure_comparators_accept_keys_without_a_natural_order() {
    let mut map = SoMap::<(i32, i32), &str, _>::with_comparator(|a, b| a.1.cmp(&b.1));
    map.set((1, 30), "c").unwrap().set((2, 10), "a").unwrap().set((3, 20), "b").unwrap();
    map.set((9, 20), "B").unwrap();

    assert_eq!(map.len(), 3);
    assert_eq!(map.values().collect::<Vec<_>>(), ["a", "B", "c"]);
    assert_eq!(map.get_key_value(&(0, 20)).unwrap(), Some((&(3, 20), &"B")));

    let by_second = SoMap::from_entries_with([((5, 2), 'x'), ((6, 1), 'y')], |a: &(i32, i32), b: &(i32, i32)| {
        a.1.cmp(&b.1)
    })
    .unwrap();
    assert_eq!(by_second.min(), Some((&(6, 1), &'y')));
}

#[test]
fn closure_comparators_order_none_like_any_other_key() {
    let mut map = SoMap::<Option<i32>, &str, _>::with_comparator(|a, b| a.cmp(b));
    map.set(Some(1), "one").unwrap().set(None, "none").unwrap();

    assert_eq!(map.len(), 2);
    assert_eq!(map.min(), Some((&None, &"none")));
    assert_eq!(map.get(&None).unwrap(), Some(&"none"));
}

#[test]
fn min_and_max() {
    let mut map = SoMap::new();
    assert_eq!(map.min(), None);
    assert_eq!(map.max(), None);

    map.set(5, 'e').unwrap().set(2, 'b').unwrap().set(9, 'i').unwrap();
    assert_eq!(map.min(), Some((&2, &'b')));
    assert_eq!(map.max(), Some((&9, &'i')));
}

// ─── Snapshot protocol ───────────────────────────────────────────────────────

#[test]
fn snapshot_steps_report_positions() {
    let map = SoMap::from_entries([(2, "two"), (1, "one")]).unwrap();
    let mut entries = map.entries();

    assert_eq!(entries.step(), Step::Yield { index: 0, value: (1, "one") });
    assert_eq!(entries.step(), Step::Yield { index: 1, value: (2, "two") });
    assert_eq!(entries.step(), Step::Done { index: 2 });
    assert_eq!(entries.step(), Step::Done { index: 2 });
}

#[test]
fn snapshot_survives_clear() {
    let mut map = canonical_map();
    let mut values = map.values();
    map.clear();

    assert!(map.is_empty());
    assert_eq!(values.next().as_deref(), Some("a-value"));
    assert_eq!(values.len(), 6);
}

#[test]
fn cancelled_snapshot_stays_done() {
    let map = canonical_map();
    let mut keys = map.keys();
    keys.next();

    assert_eq!(keys.cancel(), Step::Done { index: 7 });
    assert_eq!(keys.index(), 7);
    assert_eq!(keys.next(), None);
    assert_eq!(keys.cancel(), Step::Done { index: 7 });
}

#[test]
fn independent_snapshots() {
    let map = canonical_map();
    let mut first = map.keys();
    let mut second = map.keys();

    first.next();
    first.next();
    assert_eq!(first.index(), 2);
    assert_eq!(second.index(), 0);
    assert_eq!(second.next().as_deref(), Some("a-key"));
}

#[test]
fn empty_map_snapshots_are_done() {
    let map: SoMap<i32, i32> = SoMap::new();
    assert_eq!(map.entries().step(), Step::Done { index: 0 });
    assert_eq!(map.keys().step(), Step::Done { index: 0 });
    assert_eq!(map.values().step(), Step::Done { index: 0 });
}

#[test]
fn owned_iteration_drains_in_order() {
    let map = canonical_map();
    let pairs: Vec<_> = map.clone().into_iter().map(|(k, _)| k).collect();
    assert_eq!(pairs.first().map(String::as_str), Some("a-key"));
    assert_eq!(map.clone().into_keys().count(), 7);
    assert_eq!(map.into_values().last().as_deref(), Some("z-value"));
}

// ─── for_each ────────────────────────────────────────────────────────────────

#[test]
fn for_each_visits_in_order_with_positions() {
    let map = canonical_map();
    let mut seen = Vec::new();
    map.for_each(|value, key, owner, position| {
        assert_eq!(owner.len(), 7);
        seen.push((position, key.clone(), value.clone()));
    });

    assert_eq!(seen.len(), 7);
    assert_eq!(seen[0], (0, "a-key".to_owned(), "a-value".to_owned()));
    assert_eq!(seen[6], (6, "z-key".to_owned(), "z-value".to_owned()));
}

#[test]
fn for_each_with_threads_a_context() {
    struct Tally {
        sum: i32,
        count: usize,
    }

    let map = SoMap::from_entries([(9, ()), (2, ()), (5, ())]).unwrap();
    let mut tally = Tally { sum: 0, count: 0 };
    map.for_each_with(&mut tally, |tally, _, key, _, _| {
        tally.sum += *key;
        tally.count += 1;
    });

    assert_eq!(tally.sum, 16);
    assert_eq!(tally.count, 3);
}

// ─── Dynamic keys ────────────────────────────────────────────────────────────

#[test]
fn mixed_kinds_are_rejected_without_change() {
    let mut map = SoMap::new();
    map.set(Value::from(1), "one").unwrap();

    assert_eq!(
        map.set(Value::from("1"), "string one").err(),
        Some(Error::TypeMismatch {
            left: Kind::String,
            right: Kind::Number,
        })
    );
    assert_eq!(
        map.get(&Value::from(true)),
        Err(Error::TypeMismatch {
            left: Kind::Boolean,
            right: Kind::Number,
        })
    );
    assert!(map.delete(&Value::from("1")).is_err());
    assert_eq!(map.len(), 1);
    assert_eq!(map.to_string(), "SoMap 1 { 1 => one }");
}

#[test]
fn null_like_keys_leave_a_populated_map_unchanged() {
    let mut map = SoMap::new();
    map.set(Value::from(1), "1-value").unwrap();
    map.set(Value::Null, "null value").unwrap();
    map.set(Value::Undefined, "undefined value").unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(map.to_string(), "SoMap 1 { 1 => 1-value }");

    map.set(Value::from(20), "twenty").unwrap();
    map.set(Value::Null, "null").unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.get(&Value::from(1)).unwrap(), Some(&"1-value"));
    assert_eq!(map.get(&Value::Null).unwrap(), None);
    assert!(!map.delete(&Value::Undefined).unwrap());
    assert_eq!(map.len(), 2);
}

#[test]
fn null_like_key_into_an_empty_map_becomes_the_root() {
    let mut map = SoMap::new();
    map.set(Value::Null, 0).unwrap();
    map.set(Value::from("a"), 1).unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(map.to_string(), "SoMap 1 { null => 0 }");
}

#[test]
fn has_is_exact_for_null_like_values() {
    let mut map = SoMap::new();
    map.set("present", Value::Undefined).unwrap();

    assert!(map.has("present").unwrap());
    assert_eq!(map.get("present").unwrap(), Some(&Value::Undefined));
    assert!(!map.has("absent").unwrap());
}

// ─── Degenerate shapes ───────────────────────────────────────────────────────

#[test]
fn sorted_insertion_builds_a_walkable_chain() {
    let mut map = SoMap::with_capacity(10_000);
    for key in 0..10_000 {
        map.set(key, key * 2).unwrap();
    }

    assert_eq!(map.len(), 10_000);
    assert!(map.iter().map(|(k, _)| *k).eq(0..10_000));
    assert_eq!(map.get(&9_999).unwrap(), Some(&19_998));
    assert_eq!(map.entries().count(), 10_000);

    assert_eq!(map.remove(&9_999).unwrap(), Some(19_998));
    assert_eq!(map.remove(&5_000).unwrap(), Some(10_000));
    assert_eq!(map.remove(&0).unwrap(), Some(0));

    assert_eq!(map.len(), 9_997);
    assert_eq!(map.get(&5_000).unwrap(), None);
    assert_eq!(map.min(), Some((&1, &2)));
    assert_eq!(map.max(), Some((&9_998, &19_996)));
    assert!(map.keys().eq((1..9_999).filter(|key| *key != 5_000)));
}

#[test]
fn reverse_sorted_chain_promotes_the_deepest_successor() {
    let mut map = SoMap::new();
    map.set(-1, "root").unwrap();
    map.set(-2, "left").unwrap();
    for key in (0..10_000).rev() {
        map.set(key, "chain").unwrap();
    }

    assert!(map.delete(&-1).unwrap());
    assert_eq!(map.len(), 10_001);
    assert_eq!(map.min(), Some((&-2, &"left")));
    assert!(map.keys().eq(std::iter::once(-2).chain(0..10_000)));
}

#[test]
fn random_stress_matches_btreemap() {
    let keys = random_keys(10_000);
    let mut so_map = SoMap::new();
    let mut bt_map = BTreeMap::new();

    for (i, key) in keys.iter().enumerate() {
        so_map.set(*key, i).unwrap();
        bt_map.insert(*key, i);
    }
    assert!(so_map.iter().eq(bt_map.iter()));

    for (key, last) in &bt_map {
        assert_eq!(so_map.get(key).unwrap(), Some(last));
    }

    for key in keys.iter().step_by(2) {
        assert_eq!(so_map.remove(key).unwrap(), bt_map.remove(key));
    }
    assert_eq!(so_map.len(), bt_map.len());
    assert!(so_map.iter().eq(bt_map.iter()));

    for key in &keys {
        assert_eq!(so_map.delete(key).unwrap(), bt_map.remove(key).is_some());
    }
    assert_eq!(so_map.len(), 0);
    assert_eq!(so_map.min(), None);
}

// ─── Trait impls ─────────────────────────────────────────────────────────────

#[test]
fn equality_ignores_shape() {
    let a = SoMap::from_entries([(1, 'a'), (2, 'b'), (3, 'c')]).unwrap();
    let b = SoMap::from_entries([(3, 'c'), (1, 'a'), (2, 'b')]).unwrap();
    let c = SoMap::from_entries([(1, 'a'), (2, 'b')]).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(format!("{a:?}"), "{1: 'a', 2: 'b', 3: 'c'}");
}

#[test]
fn clones_are_independent() {
    let original = canonical_map();
    let mut copy = original.clone();
    copy.delete("a-key").unwrap();

    assert_eq!(original.len(), 7);
    assert_eq!(copy.len(), 6);
}

#[test]
fn default_and_get_mut() {
    let mut map: SoMap<&str, Vec<u8>> = SoMap::default();
    map.set("bytes", Vec::new()).unwrap();
    map.get_mut("bytes").unwrap().unwrap().push(7);

    assert_eq!(map.get_key_value("bytes").unwrap(), Some((&"bytes", &vec![7])));
    assert_eq!(map.remove_entry("bytes").unwrap(), Some(("bytes", vec![7])));
    assert!(map.is_empty());
}
