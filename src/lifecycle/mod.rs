//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     discover → order → load → instantiate/register → bind → serve
//!
//! Shutdown (shutdown.rs):
//!     trigger → axum stops accepting → in-flight requests drain → task exits
//!
//! Signals (signals.rs):
//!     SIGINT/SIGTERM → trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: any discovery, load or binding error aborts startup
//!   before a socket is opened
//! - Registration is sequential; loading may overlap
//! - The listener is bound last (traffic only when every route exists)

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Lattice, LatticeBuilder, Listening};
