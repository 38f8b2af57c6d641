#![warn(clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,  // line numbers fit in u32
    clippy::module_name_repetitions,   // Rust naming conventions
    clippy::missing_errors_doc,        // every fn returns NearestError for the same reasons
    clippy::missing_panics_doc,        // same
)]

pub mod error;
pub(crate) mod format;
pub mod nearest;
pub mod parse;
pub mod select;
pub mod tree;
pub mod types;

use std::fs;
use std::path::Path;

use error::NearestError;
use nearest::TestGlobs;
use types::{Definition, Mode};

/// Most source lines shown under a text result.
const VIEW_CAP: usize = 40;

/// Run one finder over Python source held in memory.
pub fn locate_in_source(
    source: &str,
    line: u32,
    mode: Mode,
    globs: &TestGlobs,
) -> Result<Option<Definition>, NearestError> {
    let parsed = parse::parse_python(source)?;
    let last_line = parsed.line_count().max(1);
    if line == 0 || line > last_line {
        return Err(NearestError::InvalidQuery {
            query: line.to_string(),
            reason: format!("line must be between 1 and {last_line}"),
        });
    }

    let root = parsed.root();
    let found = match mode {
        Mode::Block => nearest::find_nearest_block(root, line)?,
        Mode::Definition => nearest::find_nearest_definition(root, line)?,
        Mode::Test => nearest::find_nearest_test_definition(root, line, globs)?,
    };
    Ok(found.map(|f| f.definition()))
}

/// Read `path` and run one finder over it.
pub fn locate(
    path: &Path,
    line: u32,
    mode: Mode,
    globs: &TestGlobs,
) -> Result<Option<Definition>, NearestError> {
    let source = read_source(path)?;
    locate_in_source(&source, line, mode, globs).map_err(|e| e.with_path(path))
}

/// The single CLI entry: locate, then render the node's source, or `None`
/// when nothing encloses the line.
pub fn run(
    path: &Path,
    line: u32,
    mode: Mode,
    globs: &TestGlobs,
) -> Result<Option<String>, NearestError> {
    let source = read_source(path)?;
    let found = locate_in_source(&source, line, mode, globs).map_err(|e| e.with_path(path))?;
    Ok(found.map(|def| format::definition_view(path, &source, &def, VIEW_CAP)))
}

/// JSON variant of `run`. A miss is reported in the JSON, not as `None`.
pub fn run_json(
    path: &Path,
    line: u32,
    mode: Mode,
    globs: &TestGlobs,
) -> Result<serde_json::Value, NearestError> {
    let found = locate(path, line, mode, globs)?;
    Ok(format::json_report(path, line, mode, found.as_ref()))
}

/// Text printed by the CLI when `run` finds nothing.
#[must_use]
pub fn no_match_line(path: &Path, line: u32, mode: Mode) -> String {
    format::no_match(path, line, mode)
}

fn read_source(path: &Path) -> Result<String, NearestError> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => NearestError::NotFound {
            path: path.to_path_buf(),
        },
        _ => NearestError::IoError {
            path: path.to_path_buf(),
            source,
        },
    })
}
