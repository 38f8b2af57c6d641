//! Parent-aware wrappers over an opaque syntax tree.
//!
//! The parser's nodes know their children but not (cheaply) their parents,
//! and carry grammar-specific attributes. `TreeNode` adds a parent link;
//! `NodeArena` owns every wrapper built during one query, so parent links
//! are plain indices and the whole graph is dropped as a unit.

pub mod python;
pub mod walk;

use std::ops::Index;

use crate::error::NearestError;
use crate::types::{Attr, NodeKind};

/// What the traversal needs from a parser's node. Implementations are
/// cheap `Copy` handles into a tree that outlives the query.
pub trait SourceNode: Copy {
    /// Raw grammar kind, e.g. `function_definition`.
    fn kind(&self) -> &str;

    fn node_kind(&self) -> NodeKind;

    /// False for values that are not real tree nodes (tokens, error recovery).
    fn is_recognized(&self) -> bool;

    /// 1-based.
    fn start_line(&self) -> u32;

    fn end_line(&self) -> u32;

    /// 0-based byte column of the first character.
    fn col_offset(&self) -> u32;

    /// Child nodes in source order.
    fn children(&self) -> Vec<Self>;

    /// Named attribute lookup. `None` if the node has no such attribute.
    fn attribute(&self, name: &str) -> Option<Attr<'_>>;
}

/// Index of a `TreeNode` within its `NodeArena`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A source node plus the id of the wrapper it was reached from.
#[derive(Debug, Clone, Copy)]
pub struct TreeNode<N> {
    source: N,
    parent: Option<NodeId>,
}

impl<N: SourceNode> TreeNode<N> {
    #[must_use]
    pub fn source(&self) -> N {
        self.source
    }

    /// Set once at construction.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Owner of all wrappers created during one query.
#[derive(Debug)]
pub struct NodeArena<N> {
    nodes: Vec<TreeNode<N>>,
}

impl<N> Default for NodeArena<N> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

impl<N: SourceNode> NodeArena<N> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Wrap `node`, linking it to `parent`. The parent must already live in
    /// this arena.
    pub fn wrap(&mut self, node: N, parent: Option<NodeId>) -> Result<NodeId, NearestError> {
        if !node.is_recognized() {
            return Err(NearestError::InvalidNodeKind {
                kind: node.kind().to_string(),
            });
        }
        if let Some(p) = parent
            && p.0 >= self.nodes.len()
        {
            return Err(NearestError::InvalidParentType {
                parent: p.0,
                len: self.nodes.len(),
            });
        }
        self.nodes.push(TreeNode {
            source: node,
            parent,
        });
        Ok(NodeId(self.nodes.len() - 1))
    }

    /// Wrap every child of `id`, in source order, with `id` as parent.
    /// Each call builds fresh wrappers.
    pub fn wrap_children(&mut self, id: NodeId) -> Result<Vec<NodeId>, NearestError> {
        let children = self
            .get(id)
            .ok_or(NearestError::InvalidParentType {
                parent: id.0,
                len: self.nodes.len(),
            })?
            .source()
            .children();
        children
            .into_iter()
            .map(|child| self.wrap(child, Some(id)))
            .collect()
    }

    /// Borrowing handle for `id`, or `None` if this arena didn't issue it.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_, N>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { arena: self, id })
    }

    /// Handle for an id known to come from this arena.
    ///
    /// # Panics
    /// If `id` was not issued by this arena.
    #[must_use]
    pub(crate) fn node(&self, id: NodeId) -> NodeRef<'_, N> {
        assert!(id.0 < self.nodes.len(), "node id {} not in arena", id.0);
        NodeRef { arena: self, id }
    }
}

impl<N> Index<NodeId> for NodeArena<N> {
    type Output = TreeNode<N>;

    fn index(&self, id: NodeId) -> &TreeNode<N> {
        &self.nodes[id.0]
    }
}

/// A wrapper viewed through its arena, so parents can be followed.
/// Attribute reads are forwarded to the source node.
pub struct NodeRef<'a, N> {
    arena: &'a NodeArena<N>,
    id: NodeId,
}

impl<N> Clone for NodeRef<'_, N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N> Copy for NodeRef<'_, N> {}

impl<N> std::fmt::Debug for NodeRef<'_, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("NodeRef").field(&self.id).finish()
    }
}

impl<'a, N: SourceNode> NodeRef<'a, N> {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn wrapper(&self) -> &'a TreeNode<N> {
        &self.arena.nodes[self.id.0]
    }

    #[must_use]
    pub fn source(&self) -> N {
        self.wrapper().source
    }

    #[must_use]
    pub fn kind(&self) -> &'a str {
        self.wrapper().source.kind()
    }

    #[must_use]
    pub fn node_kind(&self) -> NodeKind {
        self.wrapper().source.node_kind()
    }

    #[must_use]
    pub fn line(&self) -> u32 {
        self.wrapper().source.start_line()
    }

    #[must_use]
    pub fn end_line(&self) -> u32 {
        self.wrapper().source.end_line()
    }

    #[must_use]
    pub fn col_offset(&self) -> u32 {
        self.wrapper().source.col_offset()
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeRef<'a, N>> {
        self.wrapper().parent.map(|id| NodeRef {
            arena: self.arena,
            id,
        })
    }

    /// Parent, grandparent, ... up to the root of the arena.
    pub fn ancestors(&self) -> impl Iterator<Item = NodeRef<'a, N>> + use<'a, N> {
        std::iter::successors(self.parent(), NodeRef::parent)
    }

    /// Forwarded attribute read.
    pub fn attr(&self, name: &str) -> Result<Attr<'a>, NearestError> {
        self.wrapper()
            .source
            .attribute(name)
            .ok_or_else(|| NearestError::MissingAttribute {
                kind: self.kind().to_string(),
                attr: name.to_string(),
            })
    }

    /// The `name` attribute, for definitions.
    pub fn name(&self) -> Result<&'a str, NearestError> {
        self.attr("name")?
            .as_text()
            .ok_or_else(|| NearestError::MissingAttribute {
                kind: self.kind().to_string(),
                attr: "name".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_python;
    use crate::tree::python::PyNode;

    fn first_def<'t>(root: PyNode<'t>) -> PyNode<'t> {
        root.children()
            .into_iter()
            .find(|n| n.node_kind() == NodeKind::FunctionDef)
            .expect("source has a def")
    }

    #[test]
    fn wrap_root_has_no_parent() {
        let parsed = parse_python("a = 1").unwrap();
        let mut arena = NodeArena::new();
        let id = arena.wrap(parsed.root(), None).unwrap();

        assert!(arena[id].parent().is_none());
        assert_eq!(arena.node(id).kind(), "module");
    }

    #[test]
    fn wrap_rejects_token() {
        let parsed = parse_python("def a():\n    return 42\n").unwrap();
        let def = first_def(parsed.root()).raw();
        let mut cursor = def.walk();
        let keyword = def
            .children(&mut cursor)
            .find(|c| !c.is_named())
            .expect("def keyword token");

        let mut arena = NodeArena::new();
        let err = arena
            .wrap(PyNode::new(keyword, parsed.text()), None)
            .unwrap_err();
        assert!(
            matches!(err, NearestError::InvalidNodeKind { ref kind } if kind == "def"),
            "{err}"
        );
    }

    #[test]
    fn wrap_rejects_foreign_parent() {
        let parsed = parse_python("b = 2").unwrap();
        let mut arena = NodeArena::new();
        let err = arena.wrap(parsed.root(), Some(NodeId(3))).unwrap_err();

        assert!(matches!(
            err,
            NearestError::InvalidParentType { parent: 3, len: 0 }
        ));
    }

    #[test]
    fn foreign_ids_are_errors_not_panics() {
        let parsed = parse_python("b = 2").unwrap();
        let mut arena = NodeArena::new();
        let root = arena.wrap(parsed.root(), None).unwrap();

        assert!(arena.get(root).is_some());
        assert!(arena.get(NodeId(7)).is_none());
        assert!(matches!(
            arena.wrap_children(NodeId(7)),
            Err(NearestError::InvalidParentType { parent: 7, len: 1 })
        ));
    }

    #[test]
    fn children_of_empty_module() {
        let parsed = parse_python("").unwrap();
        let mut arena = NodeArena::new();
        let root = arena.wrap(parsed.root(), None).unwrap();

        assert!(arena.wrap_children(root).unwrap().is_empty());
    }

    #[test]
    fn children_link_back_to_parent() {
        let parsed = parse_python("def a():\n    return 42\ndef b():\n    return 4242\n").unwrap();
        let mut arena = NodeArena::new();
        let root = arena.wrap(parsed.root(), None).unwrap();
        let children = arena.wrap_children(root).unwrap();

        let names: Vec<&str> = children
            .iter()
            .map(|&id| arena.node(id).name().unwrap())
            .collect();
        assert_eq!(names, ["a", "b"]);
        assert!(children.iter().all(|&id| arena[id].parent() == Some(root)));
    }

    #[test]
    fn children_are_restartable() {
        let parsed = parse_python("x = 1\ny = 2\n").unwrap();
        let mut arena = NodeArena::new();
        let root = arena.wrap(parsed.root(), None).unwrap();

        let first = arena.wrap_children(root).unwrap();
        let second = arena.wrap_children(root).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert_ne!(first, second);
        assert_eq!(
            arena.node(first[1]).line(),
            arena.node(second[1]).line()
        );
    }

    #[test]
    fn attributes_forward_to_source() {
        let parsed = parse_python("class D:\n    pass\n").unwrap();
        let mut arena = NodeArena::new();
        let root = arena.wrap(parsed.root(), None).unwrap();
        let class = arena.wrap_children(root).unwrap()[0];
        let node = arena.node(class);

        assert_eq!(node.attr("lineno").unwrap(), Attr::Int(1));
        assert_eq!(node.attr("col_offset").unwrap(), Attr::Int(0));
        assert_eq!(node.name().unwrap(), "D");
        assert_eq!(node.node_kind(), NodeKind::ClassDef);
    }

    #[test]
    fn missing_attribute_names_kind() {
        let parsed = parse_python("a = 1").unwrap();
        let mut arena = NodeArena::new();
        let root = arena.wrap(parsed.root(), None).unwrap();

        let err = arena.node(root).name().unwrap_err();
        assert_eq!(err.to_string(), "'module' node has no attribute 'name'");
    }

    #[test]
    fn ancestors_climb_to_root() {
        let parsed = parse_python("def b():\n    def z():\n        return 'z'\n").unwrap();
        let mut arena = NodeArena::new();
        let mut id = arena.wrap(parsed.root(), None).unwrap();
        // module -> b -> block -> z
        for _ in 0..3 {
            let children = arena.wrap_children(id).unwrap();
            id = *children.last().unwrap();
        }
        let z = arena.node(id);
        assert_eq!(z.name().unwrap(), "z");

        let kinds: Vec<&str> = z.ancestors().map(|n| n.kind()).collect();
        assert_eq!(kinds, ["block", "function_definition", "module"]);
    }
}
