use serde::Serialize;

/// What the consumer of a walk tells it after seeing a node.
///
/// `Expand` and `Default` both explore the node's subtree; `Default` is what
/// plain iteration sends, so an undriven walk visits the whole tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Directive {
    Expand,
    Prune,
    #[default]
    Default,
}

impl Directive {
    #[must_use]
    pub fn expands(self) -> bool {
        !matches!(self, Self::Prune)
    }
}

impl From<bool> for Directive {
    fn from(expand: bool) -> Self {
        if expand { Self::Expand } else { Self::Prune }
    }
}

/// Grammar-independent classification of a syntax node. Adding a grammar
/// means mapping its kinds onto these tags; the finders only see tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Module,
    FunctionDef,
    ClassDef,
    /// Decorator wrapper around a function or class. Not a statement of
    /// its own: the wrapped `def` or `class` starts on its own line.
    Decorated,
    /// `if`, and each `elif` branch (a nested `if` at the `elif` column).
    If,
    For,
    While,
    With,
    Try,
    /// Any other statement.
    Statement,
    Other,
}

impl NodeKind {
    /// Kinds that open an indented block. Async variants share their
    /// synchronous tag.
    pub const BLOCKS: &'static [NodeKind] = &[
        Self::Try,
        Self::FunctionDef,
        Self::ClassDef,
        Self::If,
        Self::For,
        Self::With,
        Self::While,
    ];

    #[must_use]
    pub fn is_block(self) -> bool {
        Self::BLOCKS.contains(&self)
    }

    #[must_use]
    pub fn is_definition(self) -> bool {
        matches!(self, Self::FunctionDef | Self::ClassDef)
    }

    #[must_use]
    pub fn is_statement(self) -> bool {
        !matches!(self, Self::Module | Self::Decorated | Self::Other)
    }
}

/// Value of a forwarded node attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr<'a> {
    Int(u32),
    Text(&'a str),
}

impl<'a> Attr<'a> {
    #[must_use]
    pub fn as_int(self) -> Option<u32> {
        match self {
            Self::Int(n) => Some(n),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn as_text(self) -> Option<&'a str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Int(_) => None,
        }
    }
}

/// Which finder a query runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Mode {
    /// Latest top-level block at or before the line.
    Block,
    /// Innermost function or class enclosing the line.
    #[default]
    #[value(name = "def")]
    Definition,
    /// Like `def`, restricted to names matching the test globs.
    Test,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Block => write!(f, "block"),
            Self::Definition => write!(f, "def"),
            Self::Test => write!(f, "test"),
        }
    }
}

/// Serializable summary of a located node, for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    pub kind: NodeKind,
    pub grammar_kind: String,
    pub name: Option<String>,
    pub line: u32,
    pub end_line: u32,
    pub column: u32,
}
