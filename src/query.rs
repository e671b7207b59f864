//! Prefix, infix and suffix queries.
//!
//! A [`Query`] says what to look for; [`Visitor`] is the closed set of
//! per-node behaviours the walks in [`crate::walk`] are driven with.

use smallvec::SmallVec;

use crate::arena::NodeArena;
use crate::node::{chars_match, NodeId, NodeRef};
use crate::walk::{self, Walk};

/// What to select from a tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryKind<'q> {
    /// Every key.
    All,
    /// Keys starting with the text.
    Prefix(&'q str),
    /// Keys containing the text anywhere.
    Containing(&'q str),
    /// Keys ending with the text.
    EndingWith(&'q str),
}

/// A key selection, case-sensitive unless [`Query::ignore_case`] is applied.
///
/// ```rust
/// use tst_rs::{Query, Tst};
///
/// let mut tree = Tst::new();
/// tree.put("Hello", 1);
/// tree.put("world", 2);
///
/// assert!(tree.select(&Query::prefix("he")).is_empty());
/// assert_eq!(
///     tree.select(&Query::prefix("he").ignore_case()).keys(),
///     vec!["Hello"]
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Query<'q> {
    kind: QueryKind<'q>,
    case_sensitive: bool,
}

impl<'q> Query<'q> {
    pub fn new(kind: QueryKind<'q>) -> Self {
        Self {
            kind,
            case_sensitive: true,
        }
    }

    pub fn all() -> Self {
        Self::new(QueryKind::All)
    }

    pub fn prefix(prefix: &'q str) -> Self {
        Self::new(QueryKind::Prefix(prefix))
    }

    pub fn containing(infix: &'q str) -> Self {
        Self::new(QueryKind::Containing(infix))
    }

    pub fn ending_with(suffix: &'q str) -> Self {
        Self::new(QueryKind::EndingWith(suffix))
    }

    /// Compare characters after simple case folding.
    pub fn ignore_case(self) -> Self {
        self.case_sensitive(false)
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn kind(&self) -> QueryKind<'q> {
        self.kind
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

// =============================================================================
// Visitors
// =============================================================================

/// Matches nodes whose key ends with a fixed text.
pub(crate) struct SuffixMatcher {
    pattern: SmallVec<[char; 16]>,
    case_sensitive: bool,
}

impl SuffixMatcher {
    pub(crate) fn new(text: &str, case_sensitive: bool) -> Self {
        Self {
            pattern: text.chars().collect(),
            case_sensitive,
        }
    }

    /// Cheap character test first; the key is only walked on a hit.
    pub(crate) fn matches<V>(&self, arena: &NodeArena<V>, id: NodeId) -> bool {
        let Some(&last) = self.pattern.last() else {
            return false;
        };
        chars_match(arena.node(id).ch, last, self.case_sensitive)
            && arena.key_ends_with(id, &self.pattern, self.case_sensitive)
    }
}

pub(crate) enum Visitor {
    /// Every terminated node, in order.
    Accumulate,
    /// Nodes whose prefix ends with the text anchor a match; the anchor and
    /// everything completing it are taken, and its equal subtree is not
    /// searched again.
    ContainsAnchor(SuffixMatcher),
    /// Terminated nodes whose key ends with the text.
    EndsWithAnchor(SuffixMatcher),
}

impl Visitor {
    /// Walk the subtree at `start`, appending selected nodes to `out`.
    pub(crate) fn run<V>(&self, arena: &NodeArena<V>, start: NodeId, out: &mut Vec<NodeId>) {
        let terminated = |id: NodeId| arena.node(id).is_terminated();
        match self {
            Visitor::Accumulate => walk::in_order(arena, start, |id| {
                if terminated(id) {
                    out.push(id);
                }
            }),
            Visitor::ContainsAnchor(matcher) => walk::pre_order(arena, start, |id| {
                if !matcher.matches(arena, id) {
                    return Walk::Descend;
                }
                walk::center_only(arena, id, |n| {
                    if terminated(n) {
                        out.push(n);
                    }
                });
                Walk::SkipEqual
            }),
            Visitor::EndsWithAnchor(matcher) => walk::in_order(arena, start, |id| {
                if terminated(id) && matcher.matches(arena, id) {
                    out.push(id);
                }
            }),
        }
    }
}

// =============================================================================
// Results
// =============================================================================

/// Nodes selected by a query, borrowed from the tree.
pub struct Selection<'a, V> {
    pub(crate) arena: &'a NodeArena<V>,
    pub(crate) nodes: Vec<NodeId>,
}

impl<'a, V> Selection<'a, V> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn nodes(&self) -> impl Iterator<Item = NodeRef<'a, V>> + '_ {
        let arena = self.arena;
        self.nodes.iter().map(move |&id| arena.view(id))
    }

    pub fn keys(&self) -> Vec<String> {
        self.nodes.iter().map(|&id| self.arena.key_of(id)).collect()
    }

    pub fn values(&self) -> Vec<&'a V> {
        let arena = self.arena;
        self.nodes
            .iter()
            .filter_map(|&id| arena.node(id).value.as_ref())
            .collect()
    }

    pub fn entries(&self) -> Vec<(String, &'a V)> {
        let arena = self.arena;
        self.nodes
            .iter()
            .filter_map(|&id| {
                let value = arena.node(id).value.as_ref()?;
                Some((arena.key_of(id), value))
            })
            .collect()
    }
}
