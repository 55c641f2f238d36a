//! Injection scope.
//!
//! A type-keyed service map shared by every component constructed in one
//! application. Components receive it explicitly in `Component::create`
//! and resolve their dependencies from it; nothing is looked up from
//! process globals.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;

use crate::error::{LatticeError, Result};

type Service = Arc<dyn Any + Send + Sync>;

/// Services and constructed component instances for one application.
#[derive(Default)]
pub struct Scope {
    services: DashMap<TypeId, Service>,
}

impl Scope {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Provide a service, replacing any previous value of the same type.
    pub fn provide<T: Any + Send + Sync>(&self, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.provide_arc(value.clone());
        value
    }

    /// Provide an already shared service.
    pub fn provide_arc<T: Any + Send + Sync>(&self, value: Arc<T>) {
        self.services.insert(TypeId::of::<T>(), value);
    }

    /// Resolve a service if present.
    pub fn get<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        // Clone out of the shard guard before downcasting.
        let service = self.services.get(&TypeId::of::<T>())?.value().clone();
        service.downcast::<T>().ok()
    }

    /// Resolve a service or fail with `MissingService`.
    pub fn require<T: Any + Send + Sync>(&self) -> Result<Arc<T>> {
        self.get::<T>()
            .ok_or(LatticeError::MissingService(type_name::<T>()))
    }

    /// True if a service of type `T` is present.
    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.services.contains_key(&TypeId::of::<T>())
    }

    /// Number of services held.
    pub fn len(&self) -> usize {
        self.services.len()
    }

    /// True if nothing is provided.
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope")
            .field("services", &self.services.len())
            .finish()
    }
}
