//! Components shipped with the `lattice` binary.
//!
//! Files follow the discovery convention (`*.controller.rs`,
//! `*.middleware.rs`) so the binary can find them on disk; [`link`] adds
//! them to a linkage table under the same relative keys.

use std::path::PathBuf;

use crate::component::{ComponentDescriptor, StaticLoader};

#[path = "echo.controller.rs"]
pub mod echo_controller;
#[path = "health.controller.rs"]
pub mod health_controller;
#[path = "server_timing.middleware.rs"]
pub mod server_timing_middleware;

pub use echo_controller::EchoController;
pub use health_controller::HealthController;
pub use server_timing_middleware::ServerTiming;

/// Directory holding the built-in component sources.
pub fn source_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/src/components"))
}

/// Link every built-in component, keyed by file name.
pub fn link(loader: StaticLoader) -> StaticLoader {
    loader
        .link("echo.controller.rs", ComponentDescriptor::of::<EchoController>())
        .link("health.controller.rs", ComponentDescriptor::of::<HealthController>())
        .link("server_timing.middleware.rs", ComponentDescriptor::of::<ServerTiming>())
}
