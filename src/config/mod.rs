//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! lattice.toml (optional)
//!     → loader.rs (read & deserialize)
//!     → AppConfig (defaults filled by serde)
//!     → CLI overrides (binary only)
//!     → LatticeBuilder (code-only hooks: transform_paths, middleware)
//!     → Lattice (read once per register/serve, never mutated)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults; a missing file or key is never an error
//! - Defaults live in exactly one place (`impl Default for AppConfig`)
//! - No semantic validation: bad values surface where they are used

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, DiscoverySource, DEFAULT_GLOB};
