use super::*;

use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

fn validate_tree<V>(t: &Tst<V>) {
    let arena = t.arena();
    let count = arena.len();

    let root = arena.node(NodeId::ROOT);
    assert_eq!(root.ch, '\0', "root must hold the sentinel character");
    assert!(root.parent.is_null(), "root has no parent");

    let mut terminated = 0usize;
    for (index, node) in arena.iter().enumerate() {
        let id = NodeId(index as u32);
        if node.is_terminated() {
            terminated += 1;
        }
        for child in [node.low, node.equal, node.high] {
            if child.is_null() {
                continue;
            }
            assert!(child.index() < count, "link out of range at {index}");
            assert_ne!(child, NodeId::ROOT, "root linked as a child");
            assert_eq!(
                arena.node(child).parent,
                id,
                "child parent link must point back"
            );
        }
        if index != 0 {
            assert!(
                arena.branch_from_parent(id).is_some(),
                "node {index} is not linked from its parent"
            );
        }
    }
    assert_eq!(terminated, t.len(), "terminated nodes must match Tst::len");

    let mut reached = 0usize;
    walk::in_order(arena, NodeId::ROOT, |_| reached += 1);
    assert_eq!(reached, count, "every node must be reachable");

    let keys: Vec<String> = t.terminated_nodes().map(|n| n.key()).collect();
    assert!(
        keys.windows(2).all(|w| w[0] < w[1]),
        "keys must come back strictly increasing"
    );
}

/// After compaction every non-root leaf carries a value.
fn assert_no_dead_leaves<V>(t: &Tst<V>) {
    for (index, node) in t.arena().iter().enumerate().skip(1) {
        let leaf = node.low.is_null() && node.equal.is_null() && node.high.is_null();
        assert!(
            !leaf || node.is_terminated(),
            "dead leaf {index} survived compaction"
        );
    }
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[abcé]{0,6}"
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 50)]
    Put(#[proptest(strategy = "key_strategy()")] String, u64),
    #[proptest(weight = 25)]
    Remove(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 24)]
    Get(#[proptest(strategy = "key_strategy()")] String),
    #[proptest(weight = 1)]
    Compact,
}

fn model(keys: &[String]) -> (Tst<u64>, BTreeMap<String, u64>) {
    let mut t = Tst::new();
    let mut m = BTreeMap::new();
    for (i, k) in keys.iter().enumerate() {
        t.put(k, i as u64);
        m.insert(k.clone(), i as u64);
    }
    (t, m)
}

fn sorted(mut keys: Vec<String>) -> Vec<String> {
    keys.sort();
    keys
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=1000)) {
        let mut t: Tst<u64> = Tst::new();
        let mut m: BTreeMap<String, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Put(key, value) => {
                    let old_t = t.put(&key, value);
                    let old_m = m.insert(key, value);
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Remove(key) => {
                    let old_t = t.remove(&key);
                    let old_m = m.remove(&key);
                    prop_assert_eq!(old_t, old_m);
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key).copied(), m.get(&key).copied());
                    prop_assert_eq!(t.contains_key(&key), m.contains_key(&key));
                }
                Op::Compact => {
                    t.compact();
                    assert_no_dead_leaves(&t);
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let got: Vec<(String, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(String, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_queries_match_model(
        keys in prop::collection::vec(key_strategy(), 0..=60),
        pattern in "[abcé]{0,3}",
    ) {
        let (t, m) = model(&keys);

        let prefix: Vec<String> = m.keys().filter(|k| k.starts_with(&pattern)).cloned().collect();
        prop_assert_eq!(t.keys_with_prefix(&pattern), prefix);

        let ending: Vec<String> = m.keys().filter(|k| k.ends_with(&pattern)).cloned().collect();
        prop_assert_eq!(t.keys_ending_with(&pattern), ending);

        // Infix results come back grouped by anchor, not sorted, but once each.
        let containing: Vec<String> = m.keys().filter(|k| k.contains(&pattern)).cloned().collect();
        prop_assert_eq!(sorted(t.keys_containing(&pattern)), containing);
    }

    #[test]
    fn prop_ignore_case_matches_model(
        keys in prop::collection::vec("[aAbB]{0,5}", 0..=40),
        pattern in "[aAbB]{1,3}",
    ) {
        let (t, m) = model(&keys);
        let needle = pattern.to_lowercase();

        let containing: Vec<String> = m
            .keys()
            .filter(|k| k.to_lowercase().contains(&needle))
            .cloned()
            .collect();
        let got = t.select(&Query::containing(&pattern).ignore_case()).keys();
        prop_assert_eq!(sorted(got), containing);

        let ending: Vec<String> = m
            .keys()
            .filter(|k| k.to_lowercase().ends_with(&needle))
            .cloned()
            .collect();
        prop_assert_eq!(t.select(&Query::ending_with(&pattern).ignore_case()).keys(), ending);
    }

    #[test]
    fn prop_paths_address_every_node(keys in prop::collection::vec(key_strategy(), 0..=60)) {
        let (t, _) = model(&keys);
        for index in 0..t.node_count() {
            let id = NodeId(index as u32);
            let path = t.path_of(id).unwrap();
            prop_assert_eq!(t.follow_path(&path), Some(id));
            let decoded = NodePath::from_bytes(path.as_bytes());
            prop_assert_eq!(decoded.as_ref(), Ok(&path));
            prop_assert_eq!(path.moves().count(), path.len());
        }
    }

    #[test]
    fn prop_compact_preserves_content(
        keys in prop::collection::vec(key_strategy(), 0..=60),
        removals in prop::collection::vec(key_strategy(), 0..=60),
    ) {
        let (mut t, mut m) = model(&keys);
        for k in &removals {
            prop_assert_eq!(t.remove(k), m.remove(k));
        }
        let before: Vec<(String, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let nodes = t.node_count();

        let removed = t.compact();
        prop_assert_eq!(t.node_count(), nodes - removed);
        validate_tree(&t);
        assert_no_dead_leaves(&t);

        let after: Vec<(String, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        prop_assert_eq!(after, before);
        prop_assert_eq!(t.compact(), 0);
    }

    #[test]
    fn prop_snapshot_round_trip(keys in prop::collection::vec(key_strategy(), 0..=60)) {
        let (mut t, _) = model(&keys);
        if let Some(first) = keys.first() {
            t.remove(first);
        }
        let json = serde_json::to_string(&t).unwrap();
        let back: Tst<u64> = serde_json::from_str(&json).unwrap();
        validate_tree(&back);
        prop_assert_eq!(back.entries(), t.entries());
        prop_assert_eq!(back.node_count(), t.node_count());
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

const SMALL_SET: [&str; 6] = ["", "a", "b", "ab", "ba", "abc"];

#[test]
fn exhaustive_insert_order_small_set() {
    for_each_permutation(&SMALL_SET, |perm| {
        let mut t: Tst<u64> = Tst::new();
        let mut m: BTreeMap<String, u64> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as u64;
            assert_eq!(t.put(k, v), m.insert(k.to_string(), v));
        }

        validate_tree(&t);
        let got: Vec<(String, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(String, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(got, expected);
        assert_eq!(sorted(t.keys_containing("b")), vec!["ab", "abc", "b", "ba"]);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    // Insert in a fixed order, then remove in all permutations.
    let mut base_tree: Tst<u64> = Tst::new();
    let mut base_map: BTreeMap<String, u64> = BTreeMap::new();
    for (i, k) in SMALL_SET.iter().enumerate() {
        let v = i as u64;
        assert_eq!(base_tree.put(k, v), base_map.insert(k.to_string(), v));
    }
    let nodes = base_tree.node_count();

    for_each_permutation(&SMALL_SET, |perm| {
        let mut t = base_tree.clone();
        let mut m = base_map.clone();

        for k in perm {
            assert_eq!(t.remove(k), m.remove(k));
            assert_eq!(t.len(), m.len());
            validate_tree(&t);
        }
        assert!(t.is_empty());
        assert_eq!(t.node_count(), nodes);
        assert_eq!(t.compact(), nodes - 1);
        assert_eq!(t.node_count(), 1);
    });
}
