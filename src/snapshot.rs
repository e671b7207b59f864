//! Serde support.
//!
//! A tree is written as its node list in arena order, one record per node:
//! `{ "ch": 'h', "value": .., "low": 3, "equal": 4, "high": 9 }`, with absent
//! links and values omitted. Parent links are not stored; they are rebuilt on
//! load, after which the structure is checked to be a tree rooted at record 0.
//! Node handles (and so [`NodePath`](crate::NodePath)s) are the same before
//! and after a round trip.
//!
//! The node layout only makes sense under the character order that built it,
//! and a comparator cannot be serialized. The `Serialize` impls therefore
//! refuse trees built with a custom comparator; those go through
//! [`Tst::serialize_with_comparator`] and come back with
//! [`Tst::deserialize_with_comparator`] given the same comparator. Plain
//! `Deserialize` restores natural order.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::arena::NodeArena;
use crate::error::{Error, Result};
use crate::node::{Collation, Node, NodeId};
use crate::tree::Tst;
use crate::TernaryTree;

#[derive(Serialize)]
struct NodeRecordRef<'a, V> {
    ch: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<&'a V>,
    #[serde(skip_serializing_if = "Option::is_none")]
    low: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    equal: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    high: Option<u32>,
}

impl<'a, V> From<&'a Node<V>> for NodeRecordRef<'a, V> {
    fn from(node: &'a Node<V>) -> Self {
        Self {
            ch: node.ch,
            value: node.value.as_ref(),
            low: node.low.get().map(NodeId::as_u32),
            equal: node.equal.get().map(NodeId::as_u32),
            high: node.high.get().map(NodeId::as_u32),
        }
    }
}

/// Missing `value` and link fields decode as `None`.
#[derive(Deserialize)]
struct NodeRecord<V> {
    ch: char,
    value: Option<V>,
    low: Option<u32>,
    equal: Option<u32>,
    high: Option<u32>,
}

impl<V> NodeRecord<V> {
    fn links(&self) -> impl Iterator<Item = u32> {
        [self.low, self.equal, self.high].into_iter().flatten()
    }
}

/// Rebuild an arena from records, deriving parent links.
fn restore<V>(records: Vec<NodeRecord<V>>) -> Result<NodeArena<V>> {
    if records.is_empty() {
        return Err(Error::EmptySnapshot);
    }
    let count = records.len();

    let mut parents = vec![NodeId::NULL; count];
    for (index, record) in records.iter().enumerate() {
        for link in record.links() {
            let child = link as usize;
            if child >= count || link == NodeId::NULL.as_u32() {
                return Err(Error::DanglingLink { node: index, link });
            }
            if child == 0 || !parents[child].is_null() {
                return Err(Error::SharedNode { node: child });
            }
            parents[child] = NodeId(index as u32);
        }
    }

    // With one parent per node and none for the root, a walk from the root
    // meets each reachable node once; cycles can only exist off to the side.
    let mut reached = 0usize;
    let mut stack = vec![0usize];
    while let Some(index) = stack.pop() {
        reached += 1;
        stack.extend(records[index].links().map(|link| link as usize));
    }
    if reached != count {
        return Err(Error::UnreachableNodes {
            count: count - reached,
        });
    }

    let link = |l: Option<u32>| l.map_or(NodeId::NULL, NodeId);
    let nodes = records
        .into_iter()
        .zip(parents)
        .map(|(record, parent)| Node {
            ch: record.ch,
            low: link(record.low),
            equal: link(record.equal),
            high: link(record.high),
            value: record.value,
            parent,
        })
        .collect();
    Ok(NodeArena::from_nodes(nodes))
}

fn write_nodes<V, S>(tree: &Tst<V>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    serializer.collect_seq(tree.arena().iter().map(NodeRecordRef::from))
}

fn read_tree<'de, V, D>(deserializer: D, collation: Collation) -> std::result::Result<Tst<V>, D::Error>
where
    V: Deserialize<'de>,
    D: Deserializer<'de>,
{
    let records = Vec::<NodeRecord<V>>::deserialize(deserializer)?;
    let arena = restore(records).map_err(D::Error::custom)?;
    let tree = Tst::from_arena(arena, collation);
    tracing::debug!(
        nodes = tree.node_count(),
        keys = tree.len(),
        natural_order = tree.has_natural_order(),
        "restored ternary tree from snapshot"
    );
    Ok(tree)
}

impl<V: Serialize> Serialize for Tst<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if !self.has_natural_order() {
            return Err(S::Error::custom(
                "tree has a custom comparator; use serialize_with_comparator",
            ));
        }
        write_nodes(self, serializer)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Tst<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        read_tree(deserializer, Collation::default())
    }
}

impl<V> Tst<V> {
    /// Serialize the nodes whatever the tree's character order.
    ///
    /// Read the result back with [`Tst::deserialize_with_comparator`] and the
    /// comparator the tree was built with.
    pub fn serialize_with_comparator<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        V: Serialize,
        S: Serializer,
    {
        write_nodes(self, serializer)
    }

    /// Restore a tree that orders characters with `comparator`.
    pub fn deserialize_with_comparator<'de, D, C>(
        deserializer: D,
        comparator: C,
    ) -> std::result::Result<Self, D::Error>
    where
        V: Deserialize<'de>,
        D: Deserializer<'de>,
        C: Fn(char, char) -> Ordering + Send + Sync + 'static,
    {
        read_tree(deserializer, Collation::new(Some(Arc::new(comparator))))
    }
}

impl<V: Serialize> Serialize for TernaryTree<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.read().serialize(serializer)
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for TernaryTree<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Tst::deserialize(deserializer).map(TernaryTree::from)
    }
}

impl<V> TernaryTree<V> {
    /// See [`Tst::serialize_with_comparator`].
    pub fn serialize_with_comparator<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        V: Serialize,
        S: Serializer,
    {
        self.read().serialize_with_comparator(serializer)
    }

    /// See [`Tst::deserialize_with_comparator`].
    pub fn deserialize_with_comparator<'de, D, C>(
        deserializer: D,
        comparator: C,
    ) -> std::result::Result<Self, D::Error>
    where
        V: Deserialize<'de>,
        D: Deserializer<'de>,
        C: Fn(char, char) -> Ordering + Send + Sync + 'static,
    {
        Tst::deserialize_with_comparator(deserializer, comparator).map(TernaryTree::from)
    }
}
