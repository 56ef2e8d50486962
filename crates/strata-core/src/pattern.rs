//! Glob pattern matching for configuration layers
//!
//! Matching is pure: no filesystem access, no side effects. Ignore patterns
//! additionally accept gitignore-style shorthand (`dist/` for a directory,
//! `coverage` for a bare name anywhere in the tree), normalized to plain
//! globs before compilation.

use crate::error::ConstructionError;
use glob::Pattern;
use std::path::Path;

/// Test a single pattern against a path.
///
/// Invalid pattern syntax matches nothing.
pub fn matches(pattern: &str, path: &Path) -> bool {
    Pattern::new(pattern)
        .map(|pattern| pattern.matches_path(path))
        .unwrap_or(false)
}

/// Convert gitignore-style shorthand to a glob pattern
pub fn normalize_ignore(pattern: &str) -> String {
    if pattern.ends_with('/') {
        // Directory pattern: "dist/" becomes "dist/**"
        format!("{pattern}**")
    } else if !pattern.contains('*') && !pattern.contains('?') {
        // Plain filename: "coverage" becomes "**/coverage"
        if pattern.contains('/') {
            pattern.to_string()
        } else {
            format!("**/{pattern}")
        }
    } else {
        // Already a glob pattern
        pattern.to_string()
    }
}

/// A compiled, ordered list of glob patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile patterns verbatim.
    pub fn compile<'a>(
        patterns: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ConstructionError> {
        let mut compiled = Vec::new();
        for raw in patterns {
            let pattern = Pattern::new(raw).map_err(|e| ConstructionError::InvalidPattern {
                pattern: raw.to_string(),
                message: e.msg.to_string(),
            })?;
            compiled.push(pattern);
        }
        Ok(Self { patterns: compiled })
    }

    /// Compile ignore patterns, applying gitignore-style normalization first.
    pub fn compile_ignore<'a>(
        patterns: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, ConstructionError> {
        let mut compiled = Vec::new();
        for raw in patterns {
            let normalized = normalize_ignore(raw);
            let pattern =
                Pattern::new(&normalized).map_err(|e| ConstructionError::InvalidPattern {
                    pattern: raw.to_string(),
                    message: e.msg.to_string(),
                })?;
            compiled.push(pattern);
        }
        Ok(Self { patterns: compiled })
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether any pattern in the set matches the path. An empty set
    /// matches nothing; "empty means everything" is a coverage decision
    /// that belongs to the layer, not the pattern set.
    pub fn matches(&self, path: &Path) -> bool {
        self.patterns.iter().any(|pattern| pattern.matches_path(path))
    }
}
