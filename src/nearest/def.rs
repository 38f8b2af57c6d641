use tracing::debug;

use super::{Candidate, Located, NearestBlock};
use crate::error::NearestError;
use crate::select::{Select, SelectOptions, Selection};
use crate::tree::{NodeRef, SourceNode};
use crate::types::NodeKind;

/// Extra condition a function or class must meet to be a candidate.
pub trait DefFilter {
    fn accept<N: SourceNode>(&self, node: NodeRef<'_, N>) -> Result<bool, NearestError>;
}

/// Every definition qualifies.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnyName;

impl DefFilter for AnyName {
    fn accept<N: SourceNode>(&self, _node: NodeRef<'_, N>) -> Result<bool, NearestError> {
        Ok(true)
    }
}

/// Finds the function or class that encloses a line.
///
/// The nearest top-level block bounds the search when it is itself a
/// definition; otherwise the whole module is searched. Among definitions
/// starting at or before the line the latest wins, but when a statement
/// starts exactly on the line, definitions indented past it are skipped.
/// The winner is then replaced by its outermost enclosing function, if any.
#[derive(Debug, Clone)]
pub struct NearestDef<F = AnyName> {
    line: u32,
    /// Column of the statement starting on `line`, recorded during the walk.
    anchor: Option<u32>,
    filter: F,
}

impl NearestDef {
    #[must_use]
    pub fn new(line: u32) -> Self {
        Self::with_filter(line, AnyName)
    }
}

impl<F: DefFilter> NearestDef<F> {
    #[must_use]
    pub fn with_filter(line: u32, filter: F) -> Self {
        Self {
            line,
            anchor: None,
            filter,
        }
    }

    /// The enclosing definition, after climbing to the outermost function.
    pub fn find<N: SourceNode>(&mut self, root: N) -> Result<Option<Located<N>>, NearestError> {
        let Some(found) = self.candidate(root)? else {
            return Ok(None);
        };

        let (arena, id) = found.into_parts();
        let outer = arena
            .node(id)
            .ancestors()
            .filter(|a| a.node_kind() == NodeKind::FunctionDef)
            .last()
            .map(|a| a.id());
        if let Some(outer) = outer {
            debug!(
                from = arena.node(id).line(),
                to = arena.node(outer).line(),
                "climbed to enclosing function"
            );
        }
        Ok(Some(Located::new(arena, outer.unwrap_or(id))))
    }

    /// The best-matching definition before the parent climb.
    pub fn candidate<N: SourceNode>(
        &mut self,
        root: N,
    ) -> Result<Option<Located<N>>, NearestError> {
        let Some(seed) = NearestBlock::new(self.line).find(root)? else {
            debug!(line = self.line, "no top-level block before line");
            return Ok(None);
        };

        let (arena, seed_id) = seed.into_parts();
        let seed_is_def = arena.node(seed_id).node_kind().is_definition();
        debug!(
            line = self.line,
            seed = arena.node(seed_id).line(),
            seed_is_def,
            "seed scope"
        );

        self.anchor = None;
        let options = SelectOptions {
            replace: false,
            select_all: true,
            select_root: seed_is_def,
            init_node: true,
        };
        let mut selection = if seed_is_def {
            Selection::within(arena, seed_id, self, options)
        } else {
            Selection::new(root, self, options)?
        };
        let candidates: Vec<Candidate> = selection
            .by_ref()
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>, NearestError>>()?;
        let arena = selection.into_arena();

        let anchor = self.anchor;
        let mut best: Option<Candidate> = None;
        for candidate in candidates {
            if best.is_none_or(|b| candidate.line > b.line)
                && anchor.is_none_or(|col| candidate.col_offset <= col)
            {
                best = Some(candidate);
            }
        }
        debug!(?anchor, best = ?best.map(|c| c.line), "definition candidate");

        Ok(best.map(|c| Located::new(arena, c.id)))
    }

    fn qualifies<N: SourceNode>(&self, node: NodeRef<'_, N>) -> Result<bool, NearestError> {
        Ok(node.node_kind().is_definition()
            && node.line() <= self.line
            && self.filter.accept(node)?)
    }
}

impl<N: SourceNode, F: DefFilter> Select<N> for NearestDef<F> {
    type Output = Option<Candidate>;

    fn init_node(&mut self, node: NodeRef<'_, N>) -> Result<(), NearestError> {
        if node.node_kind().is_statement() && node.line() == self.line {
            self.anchor = Some(node.col_offset());
        }
        Ok(())
    }

    fn matches(&mut self, node: NodeRef<'_, N>) -> Result<bool, NearestError> {
        self.qualifies(node)
    }

    /// The seed root is yielded without passing `matches`, so the
    /// predicate is applied again here.
    fn process(&mut self, node: NodeRef<'_, N>) -> Result<Option<Candidate>, NearestError> {
        Ok(self.qualifies(node)?.then(|| Candidate::of(node)))
    }
}
