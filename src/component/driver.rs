//! Registration driver.
//!
//! # Responsibilities
//! - Instantiate loaded descriptors strictly in order
//! - Await every instance's bindings before starting the next one
//!
//! # Design Decisions
//! - No concurrency here: a middleware component must be fully bound
//!   before any later component binds its handlers
//! - First failure stops the run; routes bound by earlier components stay
//!   on the router

use crate::component::descriptor::{ComponentDescriptor, Instantiation};
use crate::component::scope::Scope;
use crate::error::Result;
use crate::observability::metrics;

/// Instantiate each descriptor in order. Returns the number of bindings
/// registered.
pub async fn register_components(scope: &Scope, descriptors: &[ComponentDescriptor]) -> Result<usize> {
    let mut total = 0;

    for descriptor in descriptors {
        match descriptor.instantiate(scope).await {
            Ok(Instantiation::Created { bound }) => {
                metrics::record_component_registered(descriptor.name());
                tracing::info!(
                    component = descriptor.name(),
                    base_path = descriptor.base_path(),
                    bindings = bound,
                    "Component registered"
                );
                total += bound;
            }
            Ok(Instantiation::Cached) => {}
            Err(e) => {
                tracing::error!(component = descriptor.name(), error = %e, "Component registration failed");
                return Err(e);
            }
        }
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Component, Routes};
    use crate::error::{BoxError, LatticeError};
    use crate::routing::HttpRouter;
    use std::time::Duration;

    struct SlowFirst;
    impl Component for SlowFirst {
        fn routes(routes: &mut Routes<Self>) {
            routes.get("/first", |_this, _req| async { "first" });
        }
        async fn create(_scope: &Scope) -> Result<Self, BoxError> {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(Self)
        }
    }

    /// Fails construction unless the previous component already bound.
    struct Second;
    impl Component for Second {
        fn routes(routes: &mut Routes<Self>) {
            routes.get("/second", |_this, _req| async { "second" });
        }
        async fn create(scope: &Scope) -> Result<Self, BoxError> {
            let router = scope.require::<HttpRouter>()?;
            if router.len() != 1 {
                return Err("previous component not yet bound".into());
            }
            Ok(Self)
        }
    }

    struct Broken;
    impl Component for Broken {
        fn routes(routes: &mut Routes<Self>) {
            routes.get("/never", |_this, _req| async { "never" });
        }
        async fn create(_scope: &Scope) -> Result<Self, BoxError> {
            Err("constructor failed".into())
        }
    }

    #[tokio::test]
    async fn test_each_instance_completes_before_the_next() {
        let scope = Scope::new();
        let router = scope.provide(HttpRouter::new());
        let descriptors = vec![
            ComponentDescriptor::of::<SlowFirst>(),
            ComponentDescriptor::of::<Second>(),
        ];

        let bound = register_components(&scope, &descriptors).await.unwrap();
        assert_eq!(bound, 2);

        let table: Vec<String> = router.routes().iter().map(ToString::to_string).collect();
        assert_eq!(table, vec!["GET /first", "GET /second"]);
    }

    #[tokio::test]
    async fn test_failure_stops_later_components() {
        let scope = Scope::new();
        let router = scope.provide(HttpRouter::new());
        let descriptors = vec![
            ComponentDescriptor::of::<SlowFirst>(),
            ComponentDescriptor::of::<Broken>(),
            ComponentDescriptor::of::<Second>(),
        ];

        let err = register_components(&scope, &descriptors).await.unwrap_err();
        assert!(matches!(err, LatticeError::Construction { .. }));
        assert_eq!(router.len(), 1);
        assert!(!scope.contains::<Second>());
    }
}
