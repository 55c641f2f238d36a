//! Component subsystem.
//!
//! # Data Flow
//! ```text
//! Component type
//!     → declaration.rs (Routes<C>: base path + bindings, once per type)
//!     → descriptor.rs (ComponentDescriptor, type erased)
//!     → loader.rs (path → descriptor via the linkage table)
//!     → driver.rs (sequential instantiate)
//!         → scope.rs (dependencies, router, instance cache)
//!         → routing::HttpRouter (one registration per enabled binding)
//! ```
//!
//! # Design Decisions
//! - Declaring routes never touches the router; binding happens per instance
//! - Dependencies arrive through an explicit `Scope`, not globals
//! - Loading may be concurrent, registration never is

pub mod declaration;
pub mod descriptor;
pub mod driver;
pub mod loader;
pub mod scope;

pub use declaration::{Condition, RouteBinding, Routes};
pub use descriptor::{Component, ComponentDescriptor, Instantiation};
pub use driver::register_components;
pub use loader::{load_components, ComponentLoader, ModuleFactory, StaticLoader};
pub use scope::Scope;
