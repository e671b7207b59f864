//! The unsynchronized ternary search tree.

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use crate::arena::NodeArena;
use crate::iter::{Iter, TerminatedNodes};
use crate::node::{Branch, CharComparator, Collation, Node, NodeId, NodeRef};
use crate::path::NodePath;
use crate::query::{Query, QueryKind, Selection, SuffixMatcher, Visitor};
use crate::walk::{self, Walk};
use crate::Config;

type KeyChars = SmallVec<[char; 32]>;

/// Outcome of descending the tree with a key.
enum Descent {
    Found(NodeId),
    /// The link `branch` of `parent` is empty; `next` indexes the first key
    /// character not yet placed.
    Vacant {
        parent: NodeId,
        branch: Branch,
        next: usize,
    },
}

/// A string-keyed ordered map on a ternary search tree.
///
/// Each node holds one character; its equal link advances to the next
/// character of a key, its low/high links lead to other keys that differ at
/// the same position. The tree is not rebalanced. Removing a key clears the
/// node's value but keeps the node, so removal never disturbs longer keys and
/// re-inserting is cheap; [`Tst::compact`] reclaims dead nodes on demand.
///
/// ```rust
/// use tst_rs::Tst;
///
/// let mut tree = Tst::new();
/// tree.put("he", 1);
/// tree.put("hello", 2);
/// tree.put("help", 3);
///
/// assert_eq!(tree.get("hello"), Some(&2));
/// assert_eq!(tree.keys_with_prefix("hel"), vec!["hello", "help"]);
/// assert_eq!(tree.keys_containing("ell"), vec!["hello"]);
/// assert_eq!(tree.keys_ending_with("p"), vec!["help"]);
/// ```
#[derive(Clone)]
pub struct Tst<V> {
    arena: NodeArena<V>,
    collation: Collation,
    /// Live (terminated) keys.
    len: usize,
    /// Removals since the last compaction.
    tombstones: usize,
    /// Removal count that triggers an automatic compaction.
    auto_compact_at: Option<usize>,
}

impl<V> Tst<V> {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_capacity(nodes: usize) -> Self {
        Self::with_config(&Config {
            initial_capacity: nodes,
            ..Config::default()
        })
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            arena: NodeArena::with_capacity(config.initial_capacity),
            collation: Collation::default(),
            len: 0,
            tombstones: 0,
            auto_compact_at: config
                .auto_compact
                .then_some(config.compaction_threshold.max(1)),
        }
    }

    /// A tree whose descent orders characters with `comparator` instead of
    /// by code point. Keys enumerate in that order.
    pub fn with_comparator<C>(comparator: C) -> Self
    where
        C: Fn(char, char) -> Ordering + Send + Sync + 'static,
    {
        let comparator: CharComparator = std::sync::Arc::new(comparator);
        Self {
            collation: Collation::new(Some(comparator)),
            ..Self::new()
        }
    }

    pub(crate) fn from_arena(arena: NodeArena<V>, collation: Collation) -> Self {
        let len = arena.iter().filter(|n| n.is_terminated()).count();
        Self {
            arena,
            collation,
            len,
            tombstones: 0,
            auto_compact_at: None,
        }
    }

    #[inline]
    pub(crate) fn arena(&self) -> &NodeArena<V> {
        &self.arena
    }

    /// Whether keys are ordered by code point rather than a custom comparator.
    pub fn has_natural_order(&self) -> bool {
        self.collation.is_natural()
    }

    /// Number of keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of nodes, the root and tombstones included.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    pub fn memory_usage(&self) -> usize {
        std::mem::size_of::<Self>() + self.arena.capacity() * std::mem::size_of::<Node<V>>()
    }

    pub fn shrink_to_fit(&mut self) {
        self.arena.shrink_to_fit();
    }

    /// Remove every key and node. Invalidates node handles.
    pub fn clear(&mut self) {
        self.arena.reset();
        self.len = 0;
        self.tombstones = 0;
    }

    // =========================================================================
    // Descent
    // =========================================================================

    fn descend(&self, key: &[char], case_sensitive: bool) -> Descent {
        if key.is_empty() {
            return Descent::Found(NodeId::ROOT);
        }

        let mut node = NodeId::ROOT;
        let mut next = 0;
        loop {
            let current = self.arena.node(node);
            let branch = match self.collation.compare(key[next], current.ch, case_sensitive) {
                Ordering::Equal => {
                    next += 1;
                    if next == key.len() {
                        return Descent::Found(node);
                    }
                    Branch::Equal
                }
                Ordering::Less => Branch::Low,
                Ordering::Greater => Branch::High,
            };
            match current.child(branch) {
                Some(child) => node = child,
                None => {
                    return Descent::Vacant {
                        parent: node,
                        branch,
                        next,
                    }
                }
            }
        }
    }

    fn find(&self, key: &str, case_sensitive: bool) -> Option<NodeId> {
        let chars: KeyChars = key.chars().collect();
        match self.descend(&chars, case_sensitive) {
            Descent::Found(id) => Some(id),
            Descent::Vacant { .. } => None,
        }
    }

    /// Node for `key`, allocating whatever part of its path is missing.
    fn find_or_create(&mut self, key: &str) -> NodeId {
        let chars: KeyChars = key.chars().collect();
        let (mut parent, mut branch, next) = match self.descend(&chars, true) {
            Descent::Found(id) => return id,
            Descent::Vacant {
                parent,
                branch,
                next,
            } => (parent, branch, next),
        };

        for &ch in &chars[next..] {
            parent = self.arena.attach(parent, branch, ch);
            branch = Branch::Equal;
        }
        tracing::trace!(
            key_len = chars.len(),
            created = chars.len() - next,
            "extended node chain"
        );
        parent
    }

    /// Node for `key`, terminated or not. The empty key is the root, and so
    /// is `"\0"`.
    pub fn find_node(&self, key: &str) -> Option<NodeId> {
        self.find(key, true)
    }

    pub fn find_node_ignore_case(&self, key: &str) -> Option<NodeId> {
        self.find(key, false)
    }

    pub fn root(&self) -> NodeRef<'_, V> {
        self.arena.view(NodeId::ROOT)
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, V>> {
        self.arena.contains(id).then(|| self.arena.view(id))
    }

    pub fn path_of(&self, id: NodeId) -> Option<NodePath> {
        self.arena.contains(id).then(|| self.arena.path_of(id))
    }

    /// Replay `path` from the root. `None` if some move has no target.
    pub fn follow_path(&self, path: &NodePath) -> Option<NodeId> {
        self.arena.follow(NodeId::ROOT, path)
    }

    // =========================================================================
    // Map operations
    // =========================================================================

    /// Insert or replace; returns the previous value.
    ///
    /// The root node holds the empty key and the character `'\0'`, so the
    /// one-character key `"\0"` addresses the same entry as `""`.
    pub fn put(&mut self, key: &str, value: V) -> Option<V> {
        let id = self.find_or_create(key);
        let old = self.arena.node_mut(id).value.replace(value);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        let id = self.find(key, true)?;
        self.arena.node(id).value.as_ref()
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        let id = self.find(key, true)?;
        self.arena.node_mut(id).value.as_mut()
    }

    /// Clear the value for `key`. The node stays in place as a tombstone.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        let id = self.find(key, true)?;
        let old = self.arena.node_mut(id).value.take()?;
        self.len -= 1;
        self.tombstones += 1;

        if self.auto_compact_at.is_some_and(|at| self.tombstones >= at) {
            tracing::debug!(tombstones = self.tombstones, "compaction threshold reached");
            self.compact();
        }
        Some(old)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.find(key, true)
            .is_some_and(|id| self.arena.node(id).is_terminated())
    }

    pub fn contains_key_ignore_case(&self, key: &str) -> bool {
        self.find(key, false)
            .is_some_and(|id| self.arena.node(id).is_terminated())
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.arena.iter().any(|n| n.value.as_ref() == Some(value))
    }

    // =========================================================================
    // Enumeration and queries
    // =========================================================================

    /// Run a query, holding the tree borrowed for the result's lifetime.
    pub fn select(&self, query: &Query<'_>) -> Selection<'_, V> {
        let case_sensitive = query.is_case_sensitive();
        let mut nodes = Vec::new();
        match query.kind() {
            QueryKind::All
            | QueryKind::Prefix("")
            | QueryKind::Containing("")
            | QueryKind::EndingWith("") => {
                Visitor::Accumulate.run(&self.arena, NodeId::ROOT, &mut nodes);
            }
            QueryKind::Prefix(prefix) => {
                if let Some(id) = self.find(prefix, case_sensitive) {
                    let node = self.arena.node(id);
                    if node.is_terminated() {
                        nodes.push(id);
                    }
                    if let Some(equal) = node.child(Branch::Equal) {
                        Visitor::Accumulate.run(&self.arena, equal, &mut nodes);
                    }
                }
            }
            QueryKind::Containing(infix) => {
                let matcher = SuffixMatcher::new(infix, case_sensitive);
                Visitor::ContainsAnchor(matcher).run(&self.arena, NodeId::ROOT, &mut nodes);
            }
            QueryKind::EndingWith(suffix) => {
                let matcher = SuffixMatcher::new(suffix, case_sensitive);
                Visitor::EndsWithAnchor(matcher).run(&self.arena, NodeId::ROOT, &mut nodes);
            }
        }
        Selection {
            arena: &self.arena,
            nodes,
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.select(&Query::all()).keys()
    }

    pub fn values(&self) -> Vec<&V> {
        self.select(&Query::all()).values()
    }

    pub fn entries(&self) -> Vec<(String, &V)> {
        self.select(&Query::all()).entries()
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.select(&Query::prefix(prefix)).keys()
    }

    pub fn values_with_prefix(&self, prefix: &str) -> Vec<&V> {
        self.select(&Query::prefix(prefix)).values()
    }

    pub fn entries_with_prefix(&self, prefix: &str) -> Vec<(String, &V)> {
        self.select(&Query::prefix(prefix)).entries()
    }

    pub fn keys_containing(&self, infix: &str) -> Vec<String> {
        self.select(&Query::containing(infix)).keys()
    }

    pub fn values_for_keys_containing(&self, infix: &str) -> Vec<&V> {
        self.select(&Query::containing(infix)).values()
    }

    pub fn entries_for_keys_containing(&self, infix: &str) -> Vec<(String, &V)> {
        self.select(&Query::containing(infix)).entries()
    }

    pub fn keys_ending_with(&self, suffix: &str) -> Vec<String> {
        self.select(&Query::ending_with(suffix)).keys()
    }

    pub fn values_for_keys_ending_with(&self, suffix: &str) -> Vec<&V> {
        self.select(&Query::ending_with(suffix)).values()
    }

    pub fn entries_for_keys_ending_with(&self, suffix: &str) -> Vec<(String, &V)> {
        self.select(&Query::ending_with(suffix)).entries()
    }

    /// `(key, &value)` pairs in key order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(self)
    }

    /// Resumable walk over every terminated node.
    pub fn terminated_nodes(&self) -> TerminatedNodes<'_, V> {
        TerminatedNodes::new(self)
    }

    // =========================================================================
    // Compaction
    // =========================================================================

    /// Drop nodes that neither hold a value nor lead to one, and renumber the
    /// rest densely. Returns the number of nodes dropped.
    ///
    /// Keys, values and order are unchanged, but every previously obtained
    /// [`NodeId`] and [`NodePath`] is invalidated.
    pub fn compact(&mut self) -> usize {
        let before = self.arena.len();
        let _span = tracing::debug_span!("tst_compact", nodes = before).entered();

        let mut live = vec![false; before];
        walk::post_order(&self.arena, NodeId::ROOT, |id| {
            let node = self.arena.node(id);
            let keep = id == NodeId::ROOT
                || node.is_terminated()
                || [node.low, node.equal, node.high]
                    .into_iter()
                    .any(|c| !c.is_null() && live[c.index()]);
            live[id.index()] = keep;
        });

        let mut order = Vec::with_capacity(before);
        walk::pre_order(&self.arena, NodeId::ROOT, |id| {
            if live[id.index()] {
                order.push(id);
            }
            Walk::Descend
        });
        if order.len() == before {
            self.tombstones = 0;
            return 0;
        }

        let mut remap = vec![NodeId::NULL; before];
        for (new, old) in order.iter().enumerate() {
            remap[old.index()] = NodeId(new as u32);
        }
        let relink = |id: NodeId| if id.is_null() { id } else { remap[id.index()] };

        let old = std::mem::replace(&mut self.arena, NodeArena::with_capacity(0));
        let mut slots: Vec<Option<Node<V>>> = old.into_nodes().into_iter().map(Some).collect();
        let mut nodes = Vec::with_capacity(order.len());
        for id in order {
            if let Some(mut node) = slots[id.index()].take() {
                node.low = relink(node.low);
                node.equal = relink(node.equal);
                node.high = relink(node.high);
                node.parent = relink(node.parent);
                nodes.push(node);
            }
        }
        self.arena = NodeArena::from_nodes(nodes);
        self.tombstones = 0;

        let removed = before - self.arena.len();
        tracing::debug!(removed, remaining = self.arena.len(), "compacted ternary tree");
        removed
    }
}

impl<V> Default for Tst<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for Tst<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, V> IntoIterator for &'a Tst<V> {
    type Item = (String, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: AsRef<str>, V> Extend<(K, V)> for Tst<V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key.as_ref(), value);
        }
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for Tst<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Tst::new();
        tree.extend(iter);
        tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Tst<&'static str> {
        [
            ("", "empty"),
            ("hello", "world"),
            ("cute", "1"),
            ("acup", "1"),
            ("at", "1"),
            ("he", "1"),
            ("us", "1"),
            ("i", "1"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_basic() {
        let mut t: Tst<u64> = Tst::new();
        assert_eq!(t.put("hello", 1), None);
        assert_eq!(t.put("world", 2), None);
        assert_eq!(t.get("hello"), Some(&1));
        assert_eq!(t.get("world"), Some(&2));
        assert_eq!(t.get("missing"), None);
        assert_eq!(t.get("hell"), None);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_update() {
        let mut t: Tst<u64> = Tst::new();
        assert_eq!(t.put("key", 1), None);
        assert_eq!(t.put("key", 2), Some(1));
        assert_eq!(t.get("key"), Some(&2));
        assert_eq!(t.len(), 1);
        *t.get_mut("key").unwrap() += 40;
        assert_eq!(t.get("key"), Some(&42));
    }

    #[test]
    fn test_sample_enumeration() {
        let t = sample_tree();
        assert_eq!(t.len(), 8);
        assert_eq!(
            t.keys(),
            vec!["", "acup", "at", "cute", "he", "hello", "i", "us"]
        );
        assert_eq!(t.values().len(), 8);
        assert_eq!(t.entries()[0], (String::new(), &"empty"));
        assert_eq!(t.get(""), Some(&"empty"));
    }

    #[test]
    fn test_prefix_queries() {
        let t = sample_tree();
        assert_eq!(t.keys_with_prefix("he"), vec!["he", "hello"]);
        assert_eq!(t.keys_with_prefix("a"), vec!["acup", "at"]);
        assert_eq!(t.values_with_prefix("hel"), vec![&"world"]);
        assert_eq!(
            t.entries_with_prefix("hello"),
            vec![("hello".to_string(), &"world")]
        );
        assert!(t.keys_with_prefix("x").is_empty());
        assert!(t.keys_with_prefix("helloo").is_empty());
        assert_eq!(t.keys_with_prefix("").len(), 8);
    }

    #[test]
    fn test_contains_queries() {
        let t = sample_tree();
        let mut got = t.keys_containing("u");
        got.sort();
        assert_eq!(got, vec!["acup", "cute", "us"]);

        let mut got = t.keys_containing("l");
        got.sort();
        assert_eq!(got, vec!["hello"]);

        assert_eq!(t.keys_containing("ll"), vec!["hello"]);
        assert!(t.keys_containing("zz").is_empty());
        assert_eq!(t.values_for_keys_containing("ell"), vec![&"world"]);
        let mut got = t.entries_for_keys_containing("cu");
        got.sort();
        assert_eq!(
            got,
            vec![("acup".to_string(), &"1"), ("cute".to_string(), &"1")]
        );
    }

    #[test]
    fn test_contains_no_duplicates() {
        let mut t: Tst<u32> = Tst::new();
        t.put("banana", 1);
        t.put("ana", 2);
        t.put("bandana", 3);
        let mut got = t.keys_containing("an");
        got.sort();
        assert_eq!(got, vec!["ana", "banana", "bandana"]);
        let mut got = t.keys_containing("ana");
        got.sort();
        assert_eq!(got, vec!["ana", "banana", "bandana"]);
    }

    #[test]
    fn test_contains_sees_low_siblings_of_a_match() {
        // "xab" hangs off the low link of the 'b' that terminates "xb".
        let mut t: Tst<u32> = Tst::new();
        t.put("xb", 1);
        t.put("xab", 2);
        let mut got = t.keys_containing("b");
        got.sort();
        assert_eq!(got, vec!["xab", "xb"]);
    }

    #[test]
    fn test_ends_with_queries() {
        let t = sample_tree();
        assert_eq!(t.keys_ending_with("e"), vec!["cute", "he"]);
        assert_eq!(t.keys_ending_with("lo"), vec!["hello"]);
        // "he" is a prefix of "hello" but "hello" does not end with it.
        assert_eq!(t.keys_ending_with("he"), vec!["he"]);
        assert_eq!(t.values_for_keys_ending_with("llo"), vec![&"world"]);
        assert_eq!(
            t.entries_for_keys_ending_with("s"),
            vec![("us".to_string(), &"1")]
        );
        assert!(t.keys_ending_with("q").is_empty());
    }

    #[test]
    fn test_case_insensitive() {
        let mut t: Tst<u32> = Tst::new();
        t.put("Hello", 1);
        t.put("WORLD", 2);
        assert!(!t.contains_key("hello"));
        assert!(t.contains_key_ignore_case("hello"));
        assert!(t.contains_key_ignore_case("world"));
        assert_eq!(t.find_node_ignore_case("HELLO"), t.find_node("Hello"));
        assert_eq!(
            t.select(&Query::containing("ELL").ignore_case()).keys(),
            vec!["Hello"]
        );
        assert_eq!(
            t.select(&Query::ending_with("rld").ignore_case()).keys(),
            vec!["WORLD"]
        );
        assert!(t.select(&Query::ending_with("rld")).is_empty());
    }

    #[test]
    fn test_remove_leaves_tombstone() {
        let mut t: Tst<&str> = Tst::new();
        t.put("bat", "b");
        t.put("batter", "c");
        let nodes = t.node_count();

        assert_eq!(t.remove("bat"), Some("b"));
        assert_eq!(t.get("bat"), None);
        assert!(!t.contains_key("bat"));
        assert_eq!(t.get("batter"), Some(&"c"));
        assert_eq!(t.len(), 1);
        assert_eq!(t.node_count(), nodes);
        assert!(t.find_node("bat").is_some());

        assert_eq!(t.remove("bat"), None);
        assert_eq!(t.remove("nope"), None);

        assert_eq!(t.put("bat", "again"), None);
        assert_eq!(t.node_count(), nodes);
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn test_nul_key_is_the_root() {
        let mut t: Tst<u32> = Tst::new();
        assert_eq!(t.put("", 0), None);
        assert_eq!(t.find_node("\0"), Some(NodeId::ROOT));
        assert_eq!(t.put("\0", 1), Some(0));
        assert_eq!(t.get(""), Some(&1));
        assert_eq!(t.keys(), vec![""]);
    }

    #[test]
    fn test_remove_updates_keys() {
        let mut t = sample_tree();
        assert_eq!(t.remove("he"), Some("1"));
        assert_eq!(t.keys().len(), 7);
        assert_eq!(t.keys_with_prefix("he"), vec!["hello"]);
        assert_eq!(t.remove(""), Some("empty"));
        assert_eq!(t.get(""), None);
        assert_eq!(t.len(), 6);
    }

    #[test]
    fn test_node_paths_round_trip() {
        let t = sample_tree();
        for key in t.keys() {
            let id = t.find_node(&key).unwrap();
            let path = t.path_of(id).unwrap();
            assert_eq!(t.follow_path(&path), Some(id), "key {key:?}");
            assert_eq!(t.node(id).unwrap().path(), path);
            assert_eq!(t.node(id).unwrap().key(), key);
        }
        assert!(t.path_of(NodeId(10_000)).is_none());
    }

    #[test]
    fn test_follow_path_missing_target() {
        let t = sample_tree();
        let path: NodePath = [Branch::Low, Branch::Low].into_iter().collect();
        assert_eq!(t.follow_path(&path), None);
    }

    #[test]
    fn test_custom_comparator_orders_keys() {
        let mut t: Tst<u32> = Tst::with_comparator(|a: char, b: char| b.cmp(&a));
        for (i, k) in ["apple", "banana", "cherry", "ban"].iter().enumerate() {
            t.put(k, i as u32);
        }
        assert_eq!(t.keys(), vec!["cherry", "ban", "banana", "apple"]);
        assert_eq!(t.get("banana"), Some(&1));
        assert_eq!(t.keys_with_prefix("ban"), vec!["ban", "banana"]);
        assert_eq!(t.iter().count(), 4);
    }

    #[test]
    fn test_contains_value_and_clear() {
        let mut t = sample_tree();
        assert!(t.contains_value(&"world"));
        assert!(!t.contains_value(&"nope"));
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.node_count(), 1);
        assert!(t.keys().is_empty());
        t.put("again", "x");
        assert_eq!(t.keys(), vec!["again"]);
    }

    #[test]
    fn test_compact() {
        let mut t: Tst<u64> = Tst::new();
        for i in 0..100u64 {
            t.put(&format!("key{i:05}"), i);
        }
        t.put("keyless", 1000);
        for i in 50..100u64 {
            assert_eq!(t.remove(&format!("key{i:05}")), Some(i));
        }
        let before = t.node_count();
        let removed = t.compact();
        assert!(removed > 0);
        assert_eq!(t.node_count(), before - removed);
        assert_eq!(t.len(), 51);
        for i in 0..50u64 {
            assert_eq!(t.get(&format!("key{i:05}")), Some(&i));
        }
        assert_eq!(t.get("keyless"), Some(&1000));
        for key in t.keys() {
            let id = t.find_node(&key).unwrap();
            assert_eq!(t.follow_path(&t.path_of(id).unwrap()), Some(id));
        }
        assert_eq!(t.compact(), 0);
    }

    #[test]
    fn test_auto_compact() {
        let config = Config {
            auto_compact: true,
            compaction_threshold: 2,
            ..Config::default()
        };
        let mut t: Tst<u32> = Tst::with_config(&config);
        t.put("abc", 1);
        t.put("abd", 2);
        t.put("x", 3);
        let full = t.node_count();
        t.remove("abc");
        assert_eq!(t.node_count(), full);
        t.remove("abd");
        assert!(t.node_count() < full);
        assert_eq!(t.keys(), vec!["x"]);
    }

    #[test]
    fn test_randomized_against_btreemap() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};
        use std::collections::BTreeMap;

        let alphabet = ['a', 'b', 'c', 'é', 'Z'];
        let mut rng = StdRng::seed_from_u64(7);
        let mut t: Tst<u64> = Tst::new();
        let mut m: BTreeMap<String, u64> = BTreeMap::new();

        for _ in 0..20_000 {
            let len = rng.gen_range(0..7);
            let key: String = (0..len)
                .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
                .collect();
            match rng.gen_range(0..100) {
                0..=54 => {
                    let v: u64 = rng.gen();
                    assert_eq!(t.put(&key, v), m.insert(key, v));
                }
                55..=79 => assert_eq!(t.remove(&key), m.remove(&key)),
                _ => assert_eq!(t.get(&key).copied(), m.get(&key).copied()),
            }
        }

        assert_eq!(t.len(), m.len());
        let got: Vec<(String, u64)> = t.iter().map(|(k, v)| (k, *v)).collect();
        let expected: Vec<(String, u64)> = m.iter().map(|(k, v)| (k.clone(), *v)).collect();
        assert_eq!(got, expected);
    }

    #[test]
    fn test_long_key() {
        let mut t: Tst<u32> = Tst::new();
        let key: String = std::iter::repeat('q').take(10_000).collect();
        t.put(&key, 9);
        assert_eq!(t.get(&key), Some(&9));
        assert_eq!(t.keys_ending_with("qq").len(), 1);
        assert_eq!(t.terminated_nodes().count(), 1);
        let id = t.find_node(&key).unwrap();
        assert_eq!(t.path_of(id).unwrap().len(), 10_000);
    }

    #[test]
    fn test_debug_as_map() {
        let mut t: Tst<u32> = Tst::new();
        t.put("b", 2);
        t.put("a", 1);
        assert_eq!(format!("{t:?}"), r#"{"a": 1, "b": 2}"#);
    }
}
