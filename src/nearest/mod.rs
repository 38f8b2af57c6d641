//! Finders answering "which definition encloses line N?".
//!
//! `NearestBlock` picks the latest top-level block starting at or before the
//! line. `NearestDef` searches that block (or the whole module when the block
//! isn't a definition) for the latest function or class at or before the
//! line, then climbs to the outermost enclosing function. `NearestTestDef`
//! adds name globs on top.

mod block;
mod def;
mod test_def;

pub use block::NearestBlock;
pub use def::{AnyName, DefFilter, NearestDef};
pub use test_def::{NearestTestDef, TestGlobs, TestNames};

use crate::error::NearestError;
use crate::tree::{NodeArena, NodeId, NodeRef, SourceNode};
use crate::types::Definition;

/// A selected node, with the positions the tie-breaks need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub id: NodeId,
    pub line: u32,
    pub col_offset: u32,
}

impl Candidate {
    fn of<N: SourceNode>(node: NodeRef<'_, N>) -> Self {
        Self {
            id: node.id(),
            line: node.line(),
            col_offset: node.col_offset(),
        }
    }
}

/// A finder's answer. Owns the wrappers of the query so the node's
/// ancestors stay reachable.
#[derive(Debug)]
pub struct Located<N> {
    arena: NodeArena<N>,
    id: NodeId,
}

impl<N: SourceNode> Located<N> {
    pub(crate) fn new(arena: NodeArena<N>, id: NodeId) -> Self {
        Self { arena, id }
    }

    #[must_use]
    pub fn node(&self) -> NodeRef<'_, N> {
        self.arena.node(self.id)
    }

    #[must_use]
    pub fn into_parts(self) -> (NodeArena<N>, NodeId) {
        (self.arena, self.id)
    }

    /// Output summary. Nodes without a `name` (blocks) get `None`.
    #[must_use]
    pub fn definition(&self) -> Definition {
        let node = self.node();
        Definition {
            kind: node.node_kind(),
            grammar_kind: node.kind().to_string(),
            name: node.name().ok().map(str::to_string),
            line: node.line(),
            end_line: node.end_line(),
            column: node.col_offset(),
        }
    }
}

/// Latest top-level block starting at or before `line`.
pub fn find_nearest_block<N: SourceNode>(
    root: N,
    line: u32,
) -> Result<Option<Located<N>>, NearestError> {
    NearestBlock::new(line).find(root)
}

/// Function or class enclosing `line`; methods resolve to the outermost
/// enclosing function rather than their class.
pub fn find_nearest_definition<N: SourceNode>(
    root: N,
    line: u32,
) -> Result<Option<Located<N>>, NearestError> {
    NearestDef::new(line).find(root)
}

/// Like `find_nearest_definition`, counting only functions and classes whose
/// names match `globs`.
pub fn find_nearest_test_definition<N: SourceNode>(
    root: N,
    line: u32,
    globs: &TestGlobs,
) -> Result<Option<Located<N>>, NearestError> {
    NearestTestDef::for_tests(line, globs)?.find(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_python;
    use crate::types::NodeKind;

    #[test]
    fn empty_tree_has_no_answers() {
        let parsed = parse_python("").unwrap();
        let root = parsed.root();

        assert!(find_nearest_block(root, 1).unwrap().is_none());
        assert!(find_nearest_definition(root, 1).unwrap().is_none());
        assert!(
            find_nearest_test_definition(root, 1, &TestGlobs::default())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn definition_summary() {
        let parsed = parse_python("x = 1\n\nclass D:\n    def da(self):\n        return 'da'\n").unwrap();
        let found = find_nearest_definition(parsed.root(), 3).unwrap().unwrap();

        let def = found.definition();
        assert_eq!(def.kind, NodeKind::ClassDef);
        assert_eq!(def.grammar_kind, "class_definition");
        assert_eq!(def.name.as_deref(), Some("D"));
        assert_eq!((def.line, def.end_line, def.column), (3, 5, 0));
    }

    #[test]
    fn block_summary_has_no_name() {
        let parsed = parse_python("if True:\n    x = 1\n").unwrap();
        let found = find_nearest_block(parsed.root(), 2).unwrap().unwrap();

        let def = found.definition();
        assert_eq!(def.kind, NodeKind::If);
        assert_eq!(def.name, None);
    }
}
