use std::fmt::Write;
use std::path::Path;

use serde_json::json;

use crate::types::{Definition, Mode};

/// Build the header line for a located node:
/// `# path/to/file.py:12-30 [function_definition] name`
pub fn definition_header(path: &Path, def: &Definition) -> String {
    let mut out = format!(
        "# {}:{}-{} [{}]",
        path.display(),
        def.line,
        def.end_line,
        def.grammar_kind
    );
    if let Some(name) = &def.name {
        let _ = write!(out, " {name}");
    }
    out
}

/// Header plus the node's numbered source lines, capped at `max_lines`.
pub fn definition_view(path: &Path, source: &str, def: &Definition, max_lines: usize) -> String {
    let mut out = definition_header(path, def);
    out.push_str("\n\n");

    let first = def.line.saturating_sub(1) as usize;
    let span = (def.end_line - def.line + 1) as usize;
    let shown = span.min(max_lines);
    let body: Vec<&str> = source.lines().skip(first).take(shown).collect();
    out.push_str(&number_lines(&body.join("\n"), def.line));

    if shown < span {
        let _ = writeln!(out, "... {} more lines", span - shown);
    }
    out
}

/// Line printed when a query finds nothing.
pub fn no_match(path: &Path, line: u32, mode: Mode) -> String {
    format!("# {}:{line} [no enclosing {mode}]", path.display())
}

/// JSON report; `found` is null when nothing encloses the line.
pub fn json_report(path: &Path, line: u32, mode: Mode, found: Option<&Definition>) -> serde_json::Value {
    json!({
        "path": path.display().to_string(),
        "line": line,
        "mode": mode.to_string(),
        "found": found,
    })
}

/// Prefix each line with its 1-indexed line number, right-aligned.
pub fn number_lines(content: &str, start: u32) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let last = (start as usize + lines.len()).max(1);
    let width = (last.ilog10() + 1) as usize;
    let mut out = String::with_capacity(content.len() + lines.len() * (width + 2));
    for (i, line) in lines.iter().enumerate() {
        let num = start as usize + i;
        let _ = writeln!(out, "{num:>width$}  {line}");
    }
    out
}
