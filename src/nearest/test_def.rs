use globset::{Glob, GlobMatcher};

use super::def::{DefFilter, NearestDef};
use crate::error::NearestError;
use crate::tree::{NodeRef, SourceNode};
use crate::types::NodeKind;

/// Name patterns that mark a definition as a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestGlobs {
    /// Applied to function names.
    pub def_glob: String,
    /// Applied to class names.
    pub class_glob: String,
}

impl Default for TestGlobs {
    fn default() -> Self {
        Self {
            def_glob: "test*".to_string(),
            class_glob: "Test*".to_string(),
        }
    }
}

/// Compiled `TestGlobs`.
#[derive(Debug, Clone)]
pub struct TestNames {
    def: GlobMatcher,
    class: GlobMatcher,
}

impl TestNames {
    pub fn compile(globs: &TestGlobs) -> Result<Self, NearestError> {
        Ok(Self {
            def: compile_glob(&globs.def_glob)?,
            class: compile_glob(&globs.class_glob)?,
        })
    }
}

fn compile_glob(pattern: &str) -> Result<GlobMatcher, NearestError> {
    let glob = Glob::new(pattern).map_err(|e| NearestError::InvalidGlob {
        glob: pattern.to_string(),
        reason: e.kind().to_string(),
    })?;
    Ok(glob.compile_matcher())
}

impl DefFilter for TestNames {
    fn accept<N: SourceNode>(&self, node: NodeRef<'_, N>) -> Result<bool, NearestError> {
        let matcher = if node.node_kind() == NodeKind::FunctionDef {
            &self.def
        } else {
            &self.class
        };
        Ok(matcher.is_match(node.name()?))
    }
}

/// `NearestDef` counting only test functions and test classes.
pub type NearestTestDef = NearestDef<TestNames>;

impl NearestDef<TestNames> {
    pub fn for_tests(line: u32, globs: &TestGlobs) -> Result<Self, NearestError> {
        Ok(Self::with_filter(line, TestNames::compile(globs)?))
    }
}
