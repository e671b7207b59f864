//! Tree vertices, node handles and character collation.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use crate::arena::NodeArena;
use crate::path::NodePath;

// =============================================================================
// Handles
// =============================================================================

/// Handle to a node inside a tree's arena.
///
/// Handles stay valid until the tree is cleared or compacted. They are plain
/// indices, so holding one never borrows the tree.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// The root node. It represents the empty-string key.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) const NULL: NodeId = NodeId(u32::MAX);

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn is_null(self) -> bool {
        self == Self::NULL
    }

    #[inline]
    pub(crate) fn get(self) -> Option<NodeId> {
        (!self.is_null()).then_some(self)
    }

    /// Raw arena index of this handle.
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("NodeId(NULL)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// One of the three child links of a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Branch {
    /// Same key position, smaller character.
    Low,
    /// Next key position.
    Equal,
    /// Same key position, greater character.
    High,
}

impl Branch {
    /// Branch that follows `self` in Low, Equal, High order.
    #[inline]
    pub fn next(self) -> Option<Branch> {
        match self {
            Branch::Low => Some(Branch::Equal),
            Branch::Equal => Some(Branch::High),
            Branch::High => None,
        }
    }
}

// =============================================================================
// Node
// =============================================================================

/// A single tree vertex.
///
/// A node is terminated iff `value` is present. Clearing the value leaves the
/// node in place as a tombstone so descendants are undisturbed.
#[derive(Clone)]
pub(crate) struct Node<V> {
    pub(crate) ch: char,
    pub(crate) value: Option<V>,
    pub(crate) low: NodeId,
    pub(crate) equal: NodeId,
    pub(crate) high: NodeId,
    /// Back-link for upward walks only; never ownership.
    pub(crate) parent: NodeId,
}

impl<V> Node<V> {
    pub(crate) fn new(parent: NodeId, ch: char) -> Self {
        Self {
            ch,
            value: None,
            low: NodeId::NULL,
            equal: NodeId::NULL,
            high: NodeId::NULL,
            parent,
        }
    }

    #[inline]
    pub(crate) fn is_terminated(&self) -> bool {
        self.value.is_some()
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent.get()
    }

    #[inline]
    pub(crate) fn child(&self, branch: Branch) -> Option<NodeId> {
        match branch {
            Branch::Low => self.low,
            Branch::Equal => self.equal,
            Branch::High => self.high,
        }
        .get()
    }

    #[inline]
    pub(crate) fn set_child(&mut self, branch: Branch, child: NodeId) {
        match branch {
            Branch::Low => self.low = child,
            Branch::Equal => self.equal = child,
            Branch::High => self.high = child,
        }
    }

    /// Which link of `self` points at `child`.
    pub(crate) fn branch_of(&self, child: NodeId) -> Option<Branch> {
        if child.is_null() {
            None
        } else if self.low == child {
            Some(Branch::Low)
        } else if self.equal == child {
            Some(Branch::Equal)
        } else if self.high == child {
            Some(Branch::High)
        } else {
            None
        }
    }
}

// =============================================================================
// Borrowed node view
// =============================================================================

/// Read-only view of one node, borrowed from its tree.
pub struct NodeRef<'a, V> {
    pub(crate) arena: &'a NodeArena<V>,
    pub(crate) id: NodeId,
}

impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}

impl<'a, V> NodeRef<'a, V> {
    #[inline]
    fn node(&self) -> &'a Node<V> {
        self.arena.node(self.id)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Character stored at this node. The root holds `'\0'`.
    pub fn ch(&self) -> char {
        self.node().ch
    }

    /// The key this node terminates (or would terminate).
    pub fn key(&self) -> String {
        self.arena.key_of(self.id)
    }

    pub fn value(&self) -> Option<&'a V> {
        self.node().value.as_ref()
    }

    pub fn is_terminated(&self) -> bool {
        self.node().is_terminated()
    }

    pub fn is_root(&self) -> bool {
        self.id == NodeId::ROOT
    }

    pub fn parent(&self) -> Option<NodeRef<'a, V>> {
        self.node().parent().map(|id| self.arena.view(id))
    }

    pub fn child(&self, branch: Branch) -> Option<NodeRef<'a, V>> {
        self.node().child(branch).map(|id| self.arena.view(id))
    }

    /// Root-to-node move sequence addressing this node.
    pub fn path(&self) -> NodePath {
        self.arena.path_of(self.id)
    }
}

impl<V: fmt::Debug> fmt::Debug for NodeRef<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("key", &self.key())
            .field("value", &self.value())
            .finish()
    }
}

// =============================================================================
// Collation
// =============================================================================

/// Custom character ordering used for descent.
pub type CharComparator = Arc<dyn Fn(char, char) -> Ordering + Send + Sync>;

/// Simple case folding: single-character lowercase mappings only.
#[inline]
pub(crate) fn fold(ch: char) -> char {
    if ch.is_ascii() {
        return ch.to_ascii_lowercase();
    }
    let mut lower = ch.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => ch,
    }
}

/// The one comparison every descent goes through.
#[derive(Clone, Default)]
pub(crate) struct Collation {
    comparator: Option<CharComparator>,
}

impl Collation {
    pub(crate) fn new(comparator: Option<CharComparator>) -> Self {
        Self { comparator }
    }

    #[inline]
    pub(crate) fn compare(&self, a: char, b: char, case_sensitive: bool) -> Ordering {
        let (a, b) = if case_sensitive {
            (a, b)
        } else {
            (fold(a), fold(b))
        };
        match &self.comparator {
            Some(cmp) => cmp(a, b),
            None => a.cmp(&b),
        }
    }

    pub(crate) fn is_natural(&self) -> bool {
        self.comparator.is_none()
    }
}

/// Character equality for matching, independent of the collation.
#[inline]
pub(crate) fn chars_match(a: char, b: char, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        fold(a) == fold(b)
    }
}
