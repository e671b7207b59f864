//! Whole-subtree walks.
//!
//! Every walk keeps an explicit stack, so depth is bounded by memory rather
//! than by the call stack; a tree built from one long key is a single chain
//! of equal links as deep as the key is long.

use crate::arena::NodeArena;
use crate::node::NodeId;

/// What a pre-order visitor wants done with the node's children.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Walk {
    /// Visit low, equal and high subtrees.
    Descend,
    /// Skip the equal subtree (this node's completions); low and high
    /// siblings are unrelated keys and are still visited.
    SkipEqual,
}

enum Frame {
    Enter(NodeId),
    Visit(NodeId),
}

/// Low subtree, node, equal subtree, high subtree: sorted key order.
pub(crate) fn in_order<V>(arena: &NodeArena<V>, start: NodeId, mut visit: impl FnMut(NodeId)) {
    let mut stack: Vec<Frame> = Vec::with_capacity(64);
    stack.push(Frame::Enter(start));
    while let Some(frame) = stack.pop() {
        match frame {
            Frame::Visit(id) => visit(id),
            Frame::Enter(id) => {
                let node = arena.node(id);
                if !node.high.is_null() {
                    stack.push(Frame::Enter(node.high));
                }
                if !node.equal.is_null() {
                    stack.push(Frame::Enter(node.equal));
                }
                stack.push(Frame::Visit(id));
                if !node.low.is_null() {
                    stack.push(Frame::Enter(node.low));
                }
            }
        }
    }
}

/// Node first, then low, equal and high; the visitor may prune the equal subtree.
pub(crate) fn pre_order<V>(
    arena: &NodeArena<V>,
    start: NodeId,
    mut visit: impl FnMut(NodeId) -> Walk,
) {
    let mut stack: Vec<NodeId> = Vec::with_capacity(64);
    stack.push(start);
    while let Some(id) = stack.pop() {
        let walk = visit(id);
        let node = arena.node(id);
        if !node.high.is_null() {
            stack.push(node.high);
        }
        if walk == Walk::Descend && !node.equal.is_null() {
            stack.push(node.equal);
        }
        if !node.low.is_null() {
            stack.push(node.low);
        }
    }
}

/// Equal subtree in order, then the node itself.
///
/// This is exactly the node plus the keys that extend it; the node's
/// low/high siblings share its position but not its prefix.
pub(crate) fn center_only<V>(arena: &NodeArena<V>, node: NodeId, mut visit: impl FnMut(NodeId)) {
    let equal = arena.node(node).equal;
    if !equal.is_null() {
        in_order(arena, equal, &mut visit);
    }
    visit(node);
}

/// Children (low, equal, high) before their parent.
pub(crate) fn post_order<V>(arena: &NodeArena<V>, start: NodeId, mut visit: impl FnMut(NodeId)) {
    let mut stack: Vec<(NodeId, bool)> = Vec::with_capacity(64);
    stack.push((start, false));
    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            visit(id);
            continue;
        }
        stack.push((id, true));
        let node = arena.node(id);
        for child in [node.high, node.equal, node.low] {
            if !child.is_null() {
                stack.push((child, false));
            }
        }
    }
}
