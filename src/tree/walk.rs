//! Breadth-first walk steered by its consumer.
//!
//! Each node handed out by `resume` waits for a `Directive` on the next
//! call: expand it (its children join the next level) or prune it. In
//! replace mode the next level is overwritten instead of extended, so only
//! the last node expanded on a level has its children visited.

use super::{NodeArena, NodeId, SourceNode};
use crate::error::NearestError;
use crate::types::Directive;

pub struct Walk<N> {
    arena: NodeArena<N>,
    root: NodeId,
    replace: bool,
    current: Vec<NodeId>,
    cursor: usize,
    next: Vec<NodeId>,
    /// Last node handed out, waiting for its directive.
    pending: Option<NodeId>,
}

impl<N: SourceNode> Walk<N> {
    /// Walk a fresh tree rooted at `root`.
    pub fn new(root: N, replace: bool) -> Result<Self, NearestError> {
        let mut arena = NodeArena::new();
        let id = arena.wrap(root, None)?;
        Ok(Self::within(arena, id, replace))
    }

    /// Walk the subtree under `root`, an existing wrapper whose parent links
    /// stay intact.
    #[must_use]
    pub fn within(arena: NodeArena<N>, root: NodeId, replace: bool) -> Self {
        Self {
            arena,
            root,
            replace,
            current: vec![root],
            cursor: 0,
            next: Vec::new(),
            pending: None,
        }
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    #[must_use]
    pub fn arena(&self) -> &NodeArena<N> {
        &self.arena
    }

    #[must_use]
    pub fn into_arena(self) -> NodeArena<N> {
        self.arena
    }

    /// Apply `directive` to the node returned by the previous call, then
    /// hand out the next node. The first call returns the root and ignores
    /// its directive. `Ok(None)` once the tree is exhausted.
    pub fn resume(&mut self, directive: Directive) -> Result<Option<NodeId>, NearestError> {
        if let Some(id) = self.pending.take()
            && directive.expands()
        {
            let children = self.arena.wrap_children(id)?;
            if self.replace {
                self.next = children;
            } else {
                self.next.extend(children);
            }
        }

        if self.cursor == self.current.len() {
            if self.next.is_empty() {
                self.current.clear();
                self.cursor = 0;
                return Ok(None);
            }
            self.current = std::mem::take(&mut self.next);
            self.cursor = 0;
        }

        let id = self.current[self.cursor];
        self.cursor += 1;
        self.pending = Some(id);
        Ok(Some(id))
    }
}

/// Undriven iteration: every directive is `Default`, so the whole tree is
/// visited level by level.
impl<N: SourceNode> Iterator for Walk<N> {
    type Item = Result<NodeId, NearestError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.resume(Directive::Default).transpose()
    }
}
