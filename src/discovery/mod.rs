//! Discovery subsystem.
//!
//! # Data Flow
//! ```text
//! AppConfig { dir, globs }
//!     → glob.rs (PathMatcher: patterns → matching paths, per pattern)
//!     → dedupe (first occurrence wins)
//!     → orderer.rs (middleware first, stable; or transform_paths override)
//!     → ordered path list for the loader
//! ```
//!
//! # Design Decisions
//! - A pattern that matches nothing is not an error
//! - Classification looks at file names only, never file contents
//! - Ordering is a pure function of its input

pub mod glob;
pub mod orderer;

pub use glob::{GlobMatcher, PathMatcher};
pub use orderer::{order_paths, sort_components, PathClass, TransformPaths, MIDDLEWARE_MARKER};
