//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! discovery / loading / registration / serving
//!     → tracing events with structured fields
//!     → logging.rs (subscriber: env filter + fmt, binary only)
//!
//! registration
//!     → metrics.rs (component and route counters)
//!     → Prometheus exporter (optional, binary only)
//! ```
//!
//! # Design Decisions
//! - The library only emits; installing subscribers/recorders is the host's job
//! - Metric updates are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
