//! Convention-based component discovery and route registration.

pub mod component;
pub mod components;
pub mod config;
pub mod discovery;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use component::{Component, ComponentDescriptor, Routes, Scope, StaticLoader};
pub use config::schema::AppConfig;
pub use error::{LatticeError, LoadError};
pub use lifecycle::{Lattice, LatticeBuilder, Listening, Shutdown};
pub use routing::{HttpRouter, Verb};
