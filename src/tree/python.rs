//! Python syntax nodes from tree-sitter-python.

use crate::tree::SourceNode;
use crate::types::{Attr, NodeKind};

/// Map a tree-sitter-python kind onto a `NodeKind`. Keep in sync with the
/// grammar version in Cargo.toml: `async def`, `async for` and `async with`
/// parse as the plain kinds with an `async` token. `elif` is an `if` of its
/// own; `else`, `except` and `finally` clauses are not statements.
#[must_use]
pub fn classify(kind: &str) -> NodeKind {
    match kind {
        "module" => NodeKind::Module,
        "function_definition" => NodeKind::FunctionDef,
        "class_definition" => NodeKind::ClassDef,
        "decorated_definition" => NodeKind::Decorated,
        "if_statement" | "elif_clause" => NodeKind::If,
        "for_statement" => NodeKind::For,
        "while_statement" => NodeKind::While,
        "with_statement" => NodeKind::With,
        "try_statement" => NodeKind::Try,
        k if k.ends_with("_statement") => NodeKind::Statement,
        _ => NodeKind::Other,
    }
}

/// A tree-sitter node together with the source it was parsed from, so
/// field attributes like `name` can be read as text.
#[derive(Debug, Clone, Copy)]
pub struct PyNode<'t> {
    node: tree_sitter::Node<'t>,
    source: &'t str,
}

impl<'t> PyNode<'t> {
    #[must_use]
    pub fn new(node: tree_sitter::Node<'t>, source: &'t str) -> Self {
        Self { node, source }
    }

    #[must_use]
    pub fn raw(&self) -> tree_sitter::Node<'t> {
        self.node
    }

    fn text(&self, node: tree_sitter::Node<'t>) -> Option<&'t str> {
        node.utf8_text(self.source.as_bytes()).ok()
    }
}

impl SourceNode for PyNode<'_> {
    fn kind(&self) -> &str {
        self.node.kind()
    }

    fn node_kind(&self) -> NodeKind {
        classify(self.node.kind())
    }

    fn is_recognized(&self) -> bool {
        self.node.is_named() && !self.node.is_error() && !self.node.is_missing()
    }

    fn start_line(&self) -> u32 {
        self.node.start_position().row as u32 + 1
    }

    fn end_line(&self) -> u32 {
        self.node.end_position().row as u32 + 1
    }

    fn col_offset(&self) -> u32 {
        self.node.start_position().column as u32
    }

    /// Named children only; comments and other extras are skipped, so the
    /// shape matches an abstract syntax tree.
    fn children(&self) -> Vec<Self> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .filter(|child| !child.is_extra())
            .map(|child| Self::new(child, self.source))
            .collect()
    }

    fn attribute(&self, name: &str) -> Option<Attr<'_>> {
        match name {
            "lineno" => Some(Attr::Int(self.start_line())),
            "end_lineno" => Some(Attr::Int(self.end_line())),
            "col_offset" => Some(Attr::Int(self.col_offset())),
            "end_col_offset" => Some(Attr::Int(self.node.end_position().column as u32)),
            "kind" => Some(Attr::Text(self.node.kind())),
            field => self
                .node
                .child_by_field_name(field)
                .and_then(|child| self.text(child))
                .map(Attr::Text),
        }
    }
}
