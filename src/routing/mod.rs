//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Component binding (verb, base path, relative path)
//!     → matcher.rs (join_paths → final route path)
//!     → router.rs (append to ordered route table)
//!
//! At serve time:
//!     route table
//!     → router.rs (compile back to front into axum::Router)
//!     → matcher.rs (middleware scoping, axum path syntax)
//!     → NormalizePath + compression + trace layers
//! ```
//!
//! # Design Decisions
//! - Registration order is the only ordering input; no priorities
//! - The table is append-only; routes live as long as the router

pub mod matcher;
pub mod router;

pub use matcher::{join_paths, pattern_matches};
pub use router::{Handler, HttpRouter, Middleware, RouteRecord, Verb};
