use tracing::debug;

use super::{Candidate, Located};
use crate::error::NearestError;
use crate::select::{Select, SelectOptions, Selection};
use crate::tree::{NodeRef, SourceNode};
use crate::types::NodeKind;

/// Finds the latest top-level (column 0) block that starts at or before a
/// line. Runs in replace mode: only the last matching block on a level is
/// explored further, so earlier blocks are superseded by later ones.
///
/// An `elif` is reached as a child of its `if`. A decorator wrapper is
/// opened but never reported; the `def` under it starts on its own line.
#[derive(Debug, Clone)]
pub struct NearestBlock {
    line: u32,
}

impl NearestBlock {
    #[must_use]
    pub fn new(line: u32) -> Self {
        Self { line }
    }

    pub fn find<N: SourceNode>(&mut self, root: N) -> Result<Option<Located<N>>, NearestError> {
        let options = SelectOptions {
            replace: true,
            select_all: false,
            select_root: false,
            init_node: false,
        };
        let mut selection = Selection::new(root, self, options)?;

        let mut found: Option<Candidate> = None;
        for candidate in selection.by_ref() {
            let Some(candidate) = candidate? else {
                continue;
            };
            // Ties keep the first found.
            if found.is_none_or(|best| candidate.line > best.line) {
                found = Some(candidate);
            }
        }

        let arena = selection.into_arena();
        debug!(
            line = self.line,
            block = ?found.map(|c| c.line),
            "nearest top-level block"
        );
        Ok(found.map(|c| Located::new(arena, c.id)))
    }
}

impl<N: SourceNode> Select<N> for NearestBlock {
    type Output = Option<Candidate>;

    fn matches(&mut self, node: NodeRef<'_, N>) -> Result<bool, NearestError> {
        let kind = node.node_kind();
        Ok((kind.is_block() || kind == NodeKind::Decorated)
            && node.col_offset() == 0
            && node.line() <= self.line)
    }

    fn process(&mut self, node: NodeRef<'_, N>) -> Result<Option<Candidate>, NearestError> {
        Ok(node.node_kind().is_block().then(|| Candidate::of(node)))
    }
}
