//! Resumable iteration over terminated nodes.
//!
//! [`TerminatedNodes`] keeps its whole position in two fields (the last node
//! yielded and which of its branches to resume from) and walks with parent
//! links instead of a stack, so it can be paused indefinitely, rewound with
//! [`TerminatedNodes::reset`], and run over trees of any depth.
//!
//! The iterator borrows the tree, which rules out mutation while it is alive.

use std::iter::FusedIterator;

use crate::arena::NodeArena;
use crate::node::{Branch, NodeId, NodeRef};
use crate::tree::Tst;

/// Where the walk resumes at a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Step {
    Low,
    Equal,
    High,
    /// All branches done; continue at the parent.
    Up,
}

impl Step {
    fn after(branch: Branch) -> Step {
        match branch {
            Branch::Low => Step::Equal,
            Branch::Equal => Step::High,
            Branch::High => Step::Up,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Position {
    NotStarted,
    At(NodeId, Step),
    Finished,
}

fn accept_all<V>(_: NodeRef<'_, V>) -> bool {
    true
}

/// Depth-first walk over terminated nodes, in tree order.
///
/// - Started at the root without bounds, it yields every key.
/// - Bounded, it yields the start node and the keys completing it, and never
///   leaves that subtree.
/// - Unbounded from another node, it yields that node, its completions, and
///   then every key after them in tree order.
///
/// An optional filter skips nodes without stopping the walk.
pub struct TerminatedNodes<'a, V, F = fn(NodeRef<'a, V>) -> bool> {
    arena: &'a NodeArena<V>,
    start: NodeId,
    bounded: bool,
    filter: F,
    position: Position,
    current: Option<NodeId>,
    lookahead: Option<(NodeId, Position)>,
}

impl<'a, V> TerminatedNodes<'a, V> {
    /// Every terminated node of `tree`.
    pub fn new(tree: &'a Tst<V>) -> Self {
        Self::with_filter(tree, NodeId::ROOT, false, accept_all::<V>)
    }

    /// The node at `start` and the keys completing it. From the root this is
    /// every key, matching an empty prefix query.
    pub fn subtree(tree: &'a Tst<V>, start: NodeId) -> Self {
        Self::with_filter(tree, start, true, accept_all::<V>)
    }
}

impl<'a, V, F> TerminatedNodes<'a, V, F>
where
    F: FnMut(NodeRef<'a, V>) -> bool,
{
    /// A bounded walk from the root covers the whole tree, so it runs as an
    /// unbounded one.
    pub fn with_filter(tree: &'a Tst<V>, start: NodeId, bounded: bool, filter: F) -> Self {
        Self {
            arena: tree.arena(),
            start,
            bounded: bounded && start != NodeId::ROOT,
            filter,
            position: Position::NotStarted,
            current: None,
            lookahead: None,
        }
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn is_bounded(&self) -> bool {
        self.bounded
    }

    /// The node most recently returned by `next`.
    pub fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Rewind to the initial state.
    pub fn reset(&mut self) {
        self.position = Position::NotStarted;
        self.current = None;
        self.lookahead = None;
    }

    /// Whether `next` will return a node. The found node is kept until then.
    pub fn has_next(&mut self) -> bool {
        if self.lookahead.is_none() {
            let mut position = self.position;
            if let Some(id) = self.advance(&mut position) {
                self.lookahead = Some((id, position));
            }
        }
        self.lookahead.is_some()
    }

    #[inline]
    fn accepts(&mut self, id: NodeId) -> bool {
        let arena = self.arena;
        arena.node(id).is_terminated() && (self.filter)(arena.view(id))
    }

    /// Find the next terminated node after `position`, updating it.
    fn advance(&mut self, position: &mut Position) -> Option<NodeId> {
        let arena = self.arena;
        let (mut node, mut step) = match *position {
            Position::Finished => return None,
            Position::At(node, step) => (node, step),
            Position::NotStarted if self.start == NodeId::ROOT && !self.bounded => {
                (NodeId::ROOT, Step::Low)
            }
            Position::NotStarted => {
                if !arena.contains(self.start) {
                    *position = Position::Finished;
                    return None;
                }
                if self.accepts(self.start) {
                    *position = Position::At(self.start, Step::Equal);
                    return Some(self.start);
                }
                (self.start, Step::Equal)
            }
        };

        loop {
            let current = arena.node(node);
            match step {
                Step::Low => match current.child(Branch::Low) {
                    Some(low) => node = low,
                    None if self.accepts(node) => {
                        *position = Position::At(node, Step::Equal);
                        return Some(node);
                    }
                    None => step = Step::Equal,
                },
                Step::Equal => match current.child(Branch::Equal) {
                    Some(equal) => {
                        node = equal;
                        step = Step::Low;
                    }
                    None => step = Step::High,
                },
                Step::High => {
                    if self.bounded && node == self.start {
                        break;
                    }
                    match current.child(Branch::High) {
                        Some(high) => {
                            node = high;
                            step = Step::Low;
                        }
                        None => step = Step::Up,
                    }
                }
                Step::Up => {
                    if self.bounded && node == self.start {
                        break;
                    }
                    let Some((parent, branch)) = arena.branch_from_parent(node) else {
                        break;
                    };
                    if branch == Branch::Low && self.accepts(parent) {
                        *position = Position::At(parent, Step::Equal);
                        return Some(parent);
                    }
                    node = parent;
                    step = Step::after(branch);
                }
            }
        }

        *position = Position::Finished;
        None
    }
}

impl<'a, V, F> Iterator for TerminatedNodes<'a, V, F>
where
    F: FnMut(NodeRef<'a, V>) -> bool,
{
    type Item = NodeRef<'a, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let found = match self.lookahead.take() {
            Some((id, position)) => {
                self.position = position;
                Some(id)
            }
            None => {
                let mut position = self.position;
                let found = self.advance(&mut position);
                self.position = position;
                found
            }
        };
        self.current = found;
        let arena = self.arena;
        found.map(|id| arena.view(id))
    }
}

/// Iterator over `(key, &value)` pairs of a [`Tst`], in key order.
pub struct Iter<'a, V> {
    inner: TerminatedNodes<'a, V>,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(tree: &'a Tst<V>) -> Self {
        Self {
            inner: TerminatedNodes::new(tree),
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (String, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.inner.next()?;
        let value = node.value()?;
        Some((node.key(), value))
    }
}

impl<V> FusedIterator for Iter<'_, V> {}
