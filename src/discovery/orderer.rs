//! Ordering stage.
//!
//! # Responsibilities
//! - Classify discovered paths as middleware or endpoint components
//! - Order them so middleware registers before any endpoint
//! - Hand the whole decision to a caller-supplied transform when present
//!
//! # Design Decisions
//! - Stable sort by class: relative discovery order survives within a class
//! - A transform replaces the rule entirely; its output is used verbatim
//! - Only the file name is inspected. A directory called `middleware/`
//!   does not reclassify the endpoints inside it.

use std::path::Path;
use std::sync::Arc;

/// File-name marker identifying middleware components.
pub const MIDDLEWARE_MARKER: &str = "middleware";

/// Caller-supplied ordering override.
pub type TransformPaths = Arc<dyn Fn(Vec<String>) -> Vec<String> + Send + Sync>;

/// Class of a discovered component path. Orders middleware first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathClass {
    Middleware,
    Endpoint,
}

impl PathClass {
    /// Classify a path by its file name.
    pub fn of(path: &str) -> Self {
        let file_name = Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(path);

        if file_name.contains(MIDDLEWARE_MARKER) {
            PathClass::Middleware
        } else {
            PathClass::Endpoint
        }
    }
}

/// Default rule: middleware paths first, discovery order kept within a class.
pub fn sort_components(mut paths: Vec<String>) -> Vec<String> {
    paths.sort_by_key(|path| PathClass::of(path));
    paths
}

/// Apply `transform` if given, otherwise the default rule.
pub fn order_paths(paths: Vec<String>, transform: Option<&TransformPaths>) -> Vec<String> {
    match transform {
        Some(transform) => transform(paths),
        None => sort_components(paths),
    }
}
