//! Filesystem path matching.

use std::path::Path;

use globset::{GlobBuilder, GlobMatcher as CompiledGlob};
use walkdir::WalkDir;

use crate::error::{LatticeError, Result};

/// Returns the paths under `dir` matching `pattern`.
pub trait PathMatcher: Send + Sync {
    fn find(&self, dir: &Path, pattern: &str) -> Result<Vec<String>>;
}

/// Walks the discovery root and matches relative paths against a glob.
///
/// Entries are visited sorted by file name so discovery order is stable
/// across platforms. `*` stays within one directory level, `**` crosses
/// levels and `{a,b}` selects alternatives.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobMatcher;

impl GlobMatcher {
    pub fn new() -> Self {
        Self
    }
}

impl PathMatcher for GlobMatcher {
    fn find(&self, dir: &Path, pattern: &str) -> Result<Vec<String>> {
        let glob = compile(dir, pattern)?;

        let found: Vec<String> = WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .flatten()
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .strip_prefix(dir)
                    .map_or(false, |relative| glob.is_match(relative))
            })
            .map(|entry| entry.path().display().to_string())
            .collect();

        tracing::debug!(dir = %dir.display(), pattern, matches = found.len(), "Pattern scanned");
        Ok(found)
    }
}

fn compile(dir: &Path, pattern: &str) -> Result<CompiledGlob> {
    // Absolute patterns under `dir` are accepted and made relative.
    let relative = Path::new(pattern)
        .strip_prefix(dir)
        .ok()
        .and_then(|p| p.to_str())
        .unwrap_or(pattern);

    GlobBuilder::new(relative)
        .literal_separator(true)
        .build()
        .map(|glob| glob.compile_matcher())
        .map_err(|source| LatticeError::Pattern {
            pattern: pattern.to_string(),
            source,
        })
}
