//! Node storage.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`] index. The
//! root owns its children logically through the `low`/`equal`/`high` links;
//! `parent` is a back-link used only to walk upward (key reconstruction,
//! path extraction, iterator backtracking).

use smallvec::SmallVec;

use crate::node::{Branch, Node, NodeId, NodeRef};
use crate::path::NodePath;

/// Character stored in the root node.
pub(crate) const ROOT_CHAR: char = '\0';

#[derive(Clone)]
pub(crate) struct NodeArena<V> {
    nodes: Vec<Node<V>>,
}

impl<V> NodeArena<V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(Node::new(NodeId::NULL, ROOT_CHAR));
        Self { nodes }
    }

    /// Wrap nodes whose links are already known to form a tree rooted at 0.
    pub(crate) fn from_nodes(nodes: Vec<Node<V>>) -> Self {
        debug_assert!(!nodes.is_empty());
        Self { nodes }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn shrink_to_fit(&mut self) {
        self.nodes.shrink_to_fit();
    }

    /// Drop every node but a fresh root.
    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::new(NodeId::NULL, ROOT_CHAR));
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<V> {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[inline]
    pub(crate) fn view(&self, id: NodeId) -> NodeRef<'_, V> {
        NodeRef { arena: self, id }
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Node<V>> {
        self.nodes.iter()
    }

    pub(crate) fn into_nodes(self) -> Vec<Node<V>> {
        self.nodes
    }

    /// Allocate a node with character `ch` and hang it off `parent` at `branch`.
    pub(crate) fn attach(&mut self, parent: NodeId, branch: Branch, ch: char) -> NodeId {
        let idx = self.nodes.len();
        let id = match u32::try_from(idx) {
            Ok(raw) if raw != NodeId::NULL.0 => NodeId(raw),
            _ => panic!("node arena exhausted at {idx} nodes"),
        };
        self.nodes.push(Node::new(parent, ch));
        let parent_node = self.node_mut(parent);
        debug_assert!(parent_node.child(branch).is_none(), "attach over a live link");
        parent_node.set_child(branch, id);
        id
    }

    /// Branch by which `id` hangs off its parent.
    #[inline]
    pub(crate) fn branch_from_parent(&self, id: NodeId) -> Option<(NodeId, Branch)> {
        let parent = self.node(id).parent()?;
        let branch = self.node(parent).branch_of(id)?;
        Some((parent, branch))
    }

    // =========================================================================
    // Key reconstruction
    // =========================================================================

    /// Characters of the key ending at `id`, last character first.
    pub(crate) fn key_chars_rev(&self, id: NodeId) -> KeyCharsRev<'_, V> {
        KeyCharsRev {
            arena: self,
            cursor: (id != NodeId::ROOT).then_some(id),
        }
    }

    pub(crate) fn key_of(&self, id: NodeId) -> String {
        let mut chars: SmallVec<[char; 32]> = self.key_chars_rev(id).collect();
        chars.reverse();
        chars.into_iter().collect()
    }

    /// Whether the key ending at `id` ends with `pattern`, without building it.
    pub(crate) fn key_ends_with(&self, id: NodeId, pattern: &[char], case_sensitive: bool) -> bool {
        let mut key = self.key_chars_rev(id);
        pattern.iter().rev().all(|&p| {
            key.next()
                .is_some_and(|c| crate::node::chars_match(c, p, case_sensitive))
        })
    }

    // =========================================================================
    // Paths
    // =========================================================================

    pub(crate) fn path_of(&self, id: NodeId) -> NodePath {
        let mut path = NodePath::new();
        let mut node = id;
        while let Some((parent, branch)) = self.branch_from_parent(node) {
            path.push_front(branch);
            node = parent;
        }
        path
    }

    pub(crate) fn follow(&self, from: NodeId, path: &NodePath) -> Option<NodeId> {
        path.moves()
            .try_fold(from, |node, branch| self.node(node).child(branch))
    }
}

/// Walks a node's equal-link ancestors, yielding the key back to front.
///
/// Low/high transitions contribute no character; the node's own character
/// and that of every ancestor left through its equal link do.
pub(crate) struct KeyCharsRev<'a, V> {
    arena: &'a NodeArena<V>,
    cursor: Option<NodeId>,
}

impl<V> Iterator for KeyCharsRev<'_, V> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        let id = self.cursor.take()?;
        let ch = self.arena.node(id).ch;
        let mut child = id;
        while let Some((parent, branch)) = self.arena.branch_from_parent(child) {
            if branch == Branch::Equal {
                self.cursor = Some(parent);
                break;
            }
            child = parent;
        }
        Some(ch)
    }
}
