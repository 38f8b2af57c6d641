//! Parsing Python source into a tree the finders can walk.

use crate::error::NearestError;
use crate::tree::python::PyNode;

/// Parse content into a tree-sitter Tree. Returns `None` if the language
/// can't be set or parsing fails.
pub(crate) fn parse_tree(
    content: &str,
    ts_lang: &tree_sitter::Language,
) -> Option<tree_sitter::Tree> {
    let mut parser = tree_sitter::Parser::new();
    parser.set_language(ts_lang).ok()?;
    parser.parse(content, None)
}

/// A parsed, error-free Python module and the text it came from.
pub struct ParsedSource<'s> {
    tree: tree_sitter::Tree,
    text: &'s str,
}

impl ParsedSource<'_> {
    /// The `module` node.
    #[must_use]
    pub fn root(&self) -> PyNode<'_> {
        PyNode::new(self.tree.root_node(), self.text)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        self.text
    }

    #[must_use]
    pub fn line_count(&self) -> u32 {
        self.text.lines().count() as u32
    }
}

/// Parse Python source. Source that tree-sitter can only recover from is
/// rejected: the finders assume every statement is where it appears.
pub fn parse_python(source: &str) -> Result<ParsedSource<'_>, NearestError> {
    let language: tree_sitter::Language = tree_sitter_python::LANGUAGE.into();
    let tree =
        parse_tree(source, &language).ok_or(NearestError::ParseError { path: None, line: 1 })?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(NearestError::ParseError {
            path: None,
            line: first_error_line(root),
        });
    }

    Ok(ParsedSource { tree, text: source })
}

/// Line of the first ERROR or MISSING node under `node`, depth-first.
fn first_error_line(node: tree_sitter::Node) -> u32 {
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if child.is_error() || child.is_missing() {
            return child.start_position().row as u32 + 1;
        }
        if child.has_error() {
            return first_error_line(child);
        }
    }
    node.start_position().row as u32 + 1
}
