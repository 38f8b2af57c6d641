//! Node selection layered on the interactive walk.
//!
//! A `Select` implementation supplies three hooks; `Selection` drives the
//! walk with them and yields processed results lazily. The root is always
//! expanded, matches are always expanded, and everything else is expanded
//! only when `select_all` is set.

use tracing::trace;

use crate::error::NearestError;
use crate::tree::walk::Walk;
use crate::tree::{NodeArena, NodeId, NodeRef, SourceNode};
use crate::types::Directive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectOptions {
    /// Frontier policy of the underlying walk.
    pub replace: bool,
    /// Expand nodes that don't match.
    pub select_all: bool,
    /// Yield the root itself.
    pub select_root: bool,
    /// Run `Select::init_node` on every visited node before matching.
    pub init_node: bool,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            replace: false,
            select_all: false,
            select_root: false,
            init_node: true,
        }
    }
}

/// Hooks for a selection. Selectors that yield the nodes themselves
/// return `node.id()` from `process`.
pub trait Select<N: SourceNode> {
    type Output;

    /// Runs before matching, on every visited node including the root.
    fn init_node(&mut self, _node: NodeRef<'_, N>) -> Result<(), NearestError> {
        Ok(())
    }

    /// Whether a non-root node is selected. Selected nodes are expanded.
    fn matches(&mut self, _node: NodeRef<'_, N>) -> Result<bool, NearestError> {
        Ok(true)
    }

    fn process(&mut self, node: NodeRef<'_, N>) -> Result<Self::Output, NearestError>;
}

/// Lazy sequence of processed results. Stops after the first error.
pub struct Selection<'s, N, S> {
    walk: Walk<N>,
    selector: &'s mut S,
    options: SelectOptions,
    directive: Directive,
    done: bool,
}

impl<'s, N: SourceNode, S: Select<N>> Selection<'s, N, S> {
    /// Select from the tree rooted at `root`.
    pub fn new(root: N, selector: &'s mut S, options: SelectOptions) -> Result<Self, NearestError> {
        let walk = Walk::new(root, options.replace)?;
        Ok(Self::from_walk(walk, selector, options))
    }

    /// Select from the subtree under an already wrapped node, keeping the
    /// links to its ancestors.
    pub fn within(
        arena: NodeArena<N>,
        root: NodeId,
        selector: &'s mut S,
        options: SelectOptions,
    ) -> Self {
        let walk = Walk::within(arena, root, options.replace);
        Self::from_walk(walk, selector, options)
    }

    fn from_walk(walk: Walk<N>, selector: &'s mut S, options: SelectOptions) -> Self {
        Self {
            walk,
            selector,
            options,
            directive: Directive::Default,
            done: false,
        }
    }

    #[must_use]
    pub fn arena(&self) -> &NodeArena<N> {
        self.walk.arena()
    }

    /// Give up the wrappers built so far, e.g. to follow parents of results.
    #[must_use]
    pub fn into_arena(self) -> NodeArena<N> {
        self.walk.into_arena()
    }

    /// Decide the directive for `id` and process it if selected.
    fn visit(&mut self, id: NodeId) -> Result<Option<S::Output>, NearestError> {
        let node = self.walk.arena().node(id);
        if self.options.init_node {
            self.selector.init_node(node)?;
        }

        if id == self.walk.root() {
            self.directive = Directive::Expand;
            if self.options.select_root {
                return self.selector.process(node).map(Some);
            }
            return Ok(None);
        }

        if self.selector.matches(node)? {
            trace!(kind = node.kind(), line = node.line(), "selected");
            self.directive = Directive::Expand;
            return self.selector.process(node).map(Some);
        }

        self.directive = Directive::from(self.options.select_all);
        Ok(None)
    }
}

impl<N: SourceNode, S: Select<N>> Iterator for Selection<'_, N, S> {
    type Item = Result<S::Output, NearestError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let step = self
                .walk
                .resume(self.directive)
                .and_then(|id| id.map(|id| self.visit(id)).transpose());
            match step {
                Ok(Some(Some(output))) => return Some(Ok(output)),
                Ok(Some(None)) => {}
                Ok(None) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
