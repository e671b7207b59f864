//! # tst-rs
//!
//! A string-keyed ordered map on a ternary search tree, with prefix, infix
//! ("contains") and suffix ("ends with") search.
//!
//! Every node stores one character and three links: `low` and `high` lead to
//! keys that differ at the same position, `equal` advances to the next
//! position. Keys come back in the order of the tree's character collation,
//! which is code-point order unless a custom comparator is supplied.
//!
//! Two flavours share one implementation:
//!
//! - [`Tst`] is the plain tree. Mutation takes `&mut self`, and borrowing
//!   results (`&V`, [`NodeRef`], [`TerminatedNodes`]) tie them to the tree.
//! - [`TernaryTree`] wraps a `Tst` in a reader/writer lock for sharing between
//!   threads. Mutations take the write lock, lookups and traversals the read
//!   lock, and results are returned by value.
//!
//! ## Example
//!
//! ```rust
//! use tst_rs::{Query, TernaryTree};
//!
//! let tree = TernaryTree::new();
//! tree.put("cute", 1);
//! tree.put("acup", 2);
//! tree.put("hello", 3);
//! tree.put("he", 4);
//!
//! assert_eq!(tree.get("hello"), Some(3));
//! assert_eq!(tree.keys(), vec!["acup", "cute", "he", "hello"]);
//! assert_eq!(tree.keys_with_prefix("he"), vec!["he", "hello"]);
//! assert_eq!(tree.keys_ending_with("e"), vec!["cute", "he"]);
//!
//! let mut found = tree.keys_containing("cu");
//! found.sort();
//! assert_eq!(found, vec!["acup", "cute"]);
//!
//! let shouting = tree.select(&Query::prefix("HEL").ignore_case());
//! assert_eq!(shouting, vec![("hello".to_string(), 3)]);
//! ```
//!
//! ## Node handles and paths
//!
//! [`NodeId`]s and [`NodePath`]s address individual nodes. Removal leaves the
//! node in place (only its value is cleared), so handles stay valid until
//! [`Tst::clear`] or [`Tst::compact`].

#![warn(clippy::all)]

mod arena;
mod error;
mod iter;
mod node;
mod path;
mod query;
mod snapshot;
mod tree;
mod walk;

pub use error::{Error, Result};
pub use iter::{Iter, TerminatedNodes};
pub use node::{Branch, CharComparator, NodeId, NodeRef};
pub use path::{Moves, NodePath};
pub use query::{Query, QueryKind, Selection};
pub use tree::Tst;

use std::cmp::Ordering;
use std::fmt;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Configuration for a tree.
#[derive(Debug, Clone)]
pub struct Config {
    /// Initial capacity hint for the number of nodes
    pub initial_capacity: usize,
    /// Removals tolerated before an automatic compaction
    pub compaction_threshold: usize,
    /// Compact automatically once `compaction_threshold` removals accumulate
    pub auto_compact: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            compaction_threshold: 1_000_000,
            auto_compact: false,
        }
    }
}

/// A ternary search tree that can be shared between threads.
///
/// All methods take `&self`. Writers (`put`, `remove`, `clear`, `compact`)
/// hold the write lock; readers hold the read lock for the whole lookup or
/// traversal, so a traversal never observes a half-applied mutation.
///
/// For borrowing access (node views, the resumable iterator), take a guard
/// with [`TernaryTree::read`] and use the [`Tst`] API on it.
pub struct TernaryTree<V> {
    inner: RwLock<Tst<V>>,
}

impl<V> TernaryTree<V> {
    /// Create a new empty tree with default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Self {
        Self::from(Tst::with_config(&config))
    }

    /// A tree ordering characters with `comparator`.
    pub fn with_comparator<C>(comparator: C) -> Self
    where
        C: Fn(char, char) -> Ordering + Send + Sync + 'static,
    {
        Self::from(Tst::with_comparator(comparator))
    }

    /// Shared access to the underlying tree.
    pub fn read(&self) -> RwLockReadGuard<'_, Tst<V>> {
        self.inner.read()
    }

    /// Exclusive access to the underlying tree.
    pub fn write(&self) -> RwLockWriteGuard<'_, Tst<V>> {
        self.inner.write()
    }

    /// Lock-free access through a unique borrow.
    pub fn get_mut(&mut self) -> &mut Tst<V> {
        self.inner.get_mut()
    }

    pub fn into_inner(self) -> Tst<V> {
        self.inner.into_inner()
    }

    /// Insert a key-value pair.
    ///
    /// Returns the previous value if the key already existed.
    pub fn put(&self, key: &str, value: V) -> Option<V> {
        self.inner.write().put(key, value)
    }

    /// Remove a key. Returns the value if the key existed.
    pub fn remove(&self, key: &str) -> Option<V> {
        self.inner.write().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.read().contains_key(key)
    }

    pub fn contains_key_ignore_case(&self, key: &str) -> bool {
        self.inner.read().contains_key_ignore_case(key)
    }

    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.inner.read().contains_value(value)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// See [`Tst::compact`].
    pub fn compact(&self) -> usize {
        self.inner.write().compact()
    }

    pub fn node_count(&self) -> usize {
        self.inner.read().node_count()
    }

    pub fn memory_usage(&self) -> usize {
        self.inner.read().memory_usage()
    }

    pub fn find_node(&self, key: &str) -> Option<NodeId> {
        self.inner.read().find_node(key)
    }

    pub fn find_node_ignore_case(&self, key: &str) -> Option<NodeId> {
        self.inner.read().find_node_ignore_case(key)
    }

    /// Key a node terminates (or would terminate).
    pub fn key_of(&self, id: NodeId) -> Option<String> {
        self.inner.read().node(id).map(|node| node.key())
    }

    pub fn path_of(&self, id: NodeId) -> Option<NodePath> {
        self.inner.read().path_of(id)
    }

    pub fn follow_path(&self, path: &NodePath) -> Option<NodeId> {
        self.inner.read().follow_path(path)
    }

    pub fn keys(&self) -> Vec<String> {
        self.inner.read().keys()
    }

    pub fn keys_with_prefix(&self, prefix: &str) -> Vec<String> {
        self.inner.read().keys_with_prefix(prefix)
    }

    pub fn keys_containing(&self, infix: &str) -> Vec<String> {
        self.inner.read().keys_containing(infix)
    }

    pub fn keys_ending_with(&self, suffix: &str) -> Vec<String> {
        self.inner.read().keys_ending_with(suffix)
    }
}

impl<V> TernaryTree<V>
where
    V: Clone,
{
    /// Get a copy of the value for a key.
    pub fn get(&self, key: &str) -> Option<V> {
        self.inner.read().get(key).cloned()
    }

    /// Value held by a node, if it is terminated.
    pub fn value_of(&self, id: NodeId) -> Option<V> {
        let inner = self.inner.read();
        inner.node(id).and_then(|node| node.value().cloned())
    }

    /// Owned `(key, value)` pairs selected by `query`.
    pub fn select(&self, query: &Query<'_>) -> Vec<(String, V)> {
        let inner = self.inner.read();
        owned(inner.select(query).entries())
    }

    pub fn values(&self) -> Vec<V> {
        self.inner.read().values().into_iter().cloned().collect()
    }

    pub fn entries(&self) -> Vec<(String, V)> {
        owned(self.inner.read().entries())
    }

    pub fn values_with_prefix(&self, prefix: &str) -> Vec<V> {
        let inner = self.inner.read();
        inner.values_with_prefix(prefix).into_iter().cloned().collect()
    }

    pub fn entries_with_prefix(&self, prefix: &str) -> Vec<(String, V)> {
        owned(self.inner.read().entries_with_prefix(prefix))
    }

    pub fn values_for_keys_containing(&self, infix: &str) -> Vec<V> {
        let inner = self.inner.read();
        inner
            .values_for_keys_containing(infix)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn entries_for_keys_containing(&self, infix: &str) -> Vec<(String, V)> {
        owned(self.inner.read().entries_for_keys_containing(infix))
    }

    pub fn values_for_keys_ending_with(&self, suffix: &str) -> Vec<V> {
        let inner = self.inner.read();
        inner
            .values_for_keys_ending_with(suffix)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn entries_for_keys_ending_with(&self, suffix: &str) -> Vec<(String, V)> {
        owned(self.inner.read().entries_for_keys_ending_with(suffix))
    }
}

fn owned<V: Clone>(entries: Vec<(String, &V)>) -> Vec<(String, V)> {
    entries.into_iter().map(|(k, v)| (k, v.clone())).collect()
}

impl<V> Default for TernaryTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> From<Tst<V>> for TernaryTree<V> {
    fn from(tree: Tst<V>) -> Self {
        Self {
            inner: RwLock::new(tree),
        }
    }
}

impl<V: Clone> Clone for TernaryTree<V> {
    fn clone(&self) -> Self {
        let inner = self.inner.read();
        Self::from(Tst::clone(&inner))
    }
}

impl<V: fmt::Debug> fmt::Debug for TernaryTree<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.inner.read(), f)
    }
}

impl<K: AsRef<str>, V> FromIterator<(K, V)> for TernaryTree<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from(Tst::from_iter(iter))
    }
}


#[cfg(test)]
mod proptests;
