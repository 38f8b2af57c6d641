use std::path::PathBuf;

use thiserror::Error;

/// Every error nearest can produce. Displayed as user-facing messages.
///
/// Node-contract violations (`InvalidNodeKind`, `InvalidParentType`,
/// `MissingAttribute`) are programmer errors and surface at the call that
/// broke the contract. A query that finds nothing is not an error.
#[derive(Debug, Error)]
pub enum NearestError {
    #[error("node arg expected a named syntax node, got {kind} instead")]
    InvalidNodeKind { kind: String },

    #[error("parent arg expected a node of this tree or none, got id {parent} (tree holds {len})")]
    InvalidParentType { parent: usize, len: usize },

    #[error("'{kind}' node has no attribute '{attr}'")]
    MissingAttribute { kind: String, attr: String },

    #[error("invalid glob \"{glob}\": {reason}")]
    InvalidGlob { glob: String, reason: String },

    #[error("invalid query \"{query}\": {reason}")]
    InvalidQuery { query: String, reason: String },

    #[error("not found: {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("{}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse error{} at line {line}", display_in(.path.as_deref()))]
    ParseError { path: Option<PathBuf>, line: u32 },
}

fn display_in(path: Option<&std::path::Path>) -> String {
    path.map(|p| format!(" in {}", p.display()))
        .unwrap_or_default()
}

impl NearestError {
    /// Process exit code for the CLI. 1 is reserved for "no match".
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::IoError { .. } => 2,
            Self::InvalidGlob { .. } | Self::InvalidQuery { .. } | Self::ParseError { .. } => 3,
            Self::InvalidNodeKind { .. }
            | Self::InvalidParentType { .. }
            | Self::MissingAttribute { .. } => 4,
        }
    }

    /// Attach a file path to a parse error raised before the path was known.
    #[must_use]
    pub fn with_path(self, file: &std::path::Path) -> Self {
        match self {
            Self::ParseError { path: None, line } => Self::ParseError {
                path: Some(file.to_path_buf()),
                line,
            },
            other => other,
        }
    }
}
