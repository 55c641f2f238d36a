//! Component contract and type-erased descriptors.
//!
//! # Responsibilities
//! - Define what a discoverable component must provide
//! - Run the declaration step once per descriptor
//! - Construct instances and bind their routes on the shared router
//!
//! # Design Decisions
//! - Every binding condition is evaluated before the router is touched,
//!   so a failing condition leaves no partial bindings for that instance
//! - Each binding captures its own `Arc` of the instance; two instances of
//!   the same type never share handler state
//! - Instances are cached in the scope; instantiating the same type twice
//!   in one scope binds nothing new

use std::any::type_name;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::{extract::Request, middleware::Next};
use futures_util::future::BoxFuture;

use crate::component::declaration::{Routes, Target};
use crate::component::scope::Scope;
use crate::error::{BoxError, LatticeError, Result};
use crate::observability::metrics;
use crate::routing::{join_paths, Handler, HttpRouter, Middleware};

/// A constructible unit discovered by file convention.
pub trait Component: Send + Sync + Sized + 'static {
    /// Declare the base path and route bindings. Runs once per descriptor,
    /// never per instance.
    fn routes(routes: &mut Routes<Self>);

    /// Build an instance, resolving dependencies from `scope`.
    fn create(scope: &Scope) -> impl Future<Output = Result<Self, BoxError>> + Send;
}

/// Outcome of instantiating a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instantiation {
    /// A new instance was built and `bound` bindings were registered.
    Created { bound: usize },
    /// The scope already held an instance of this component.
    Cached,
}

trait Erased: Send + Sync {
    fn base_path(&self) -> &str;
    fn binding_count(&self) -> usize;
    fn instantiate<'a>(&'a self, scope: &'a Scope) -> BoxFuture<'a, Result<Instantiation>>;
}

struct Declared<C> {
    routes: Routes<C>,
}

/// Type-erased, cheaply cloneable handle to a declared component.
#[derive(Clone)]
pub struct ComponentDescriptor {
    name: &'static str,
    inner: Arc<dyn Erased>,
}

impl ComponentDescriptor {
    /// Declare component `C`.
    pub fn of<C: Component>() -> Self {
        let mut routes = Routes::new();
        C::routes(&mut routes);

        Self {
            name: type_name::<C>(),
            inner: Arc::new(Declared { routes }),
        }
    }

    /// Fully qualified type name of the component.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared base path.
    pub fn base_path(&self) -> &str {
        self.inner.base_path()
    }

    /// Number of declared bindings.
    pub fn binding_count(&self) -> usize {
        self.inner.binding_count()
    }

    /// Construct an instance in `scope` and register its bindings on the
    /// scope's router. Completes only once every binding is registered.
    pub async fn instantiate(&self, scope: &Scope) -> Result<Instantiation> {
        self.inner.instantiate(scope).await
    }
}

impl fmt::Debug for ComponentDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentDescriptor")
            .field("name", &self.name)
            .field("base_path", &self.base_path())
            .field("bindings", &self.binding_count())
            .finish()
    }
}

impl<C: Component> Erased for Declared<C> {
    fn base_path(&self) -> &str {
        self.routes.prefix()
    }

    fn binding_count(&self) -> usize {
        self.routes.bindings().len()
    }

    fn instantiate<'a>(&'a self, scope: &'a Scope) -> BoxFuture<'a, Result<Instantiation>> {
        Box::pin(async move {
            let component = type_name::<C>();
            if scope.contains::<C>() {
                tracing::debug!(component, "Component already constructed in scope");
                return Ok(Instantiation::Cached);
            }

            let router = scope.require::<HttpRouter>()?;
            let instance = Arc::new(
                C::create(scope)
                    .await
                    .map_err(|source| LatticeError::Construction { component, source })?,
            );

            let base_path = self.routes.prefix();
            let mut enabled = Vec::with_capacity(self.routes.bindings().len());
            for binding in self.routes.bindings() {
                let path = join_paths(base_path, &binding.path);
                let active = match &binding.condition {
                    Some(condition) => condition(instance.as_ref(), scope).map_err(|source| {
                        LatticeError::BindingCondition {
                            component,
                            path: path.clone(),
                            source,
                        }
                    })?,
                    None => true,
                };

                if active {
                    enabled.push((binding.verb, path, binding.target.clone()));
                } else {
                    tracing::debug!(component, path = %path, "Binding disabled by condition");
                }
            }

            let bound = enabled.len();
            for (verb, path, target) in enabled {
                metrics::record_route_registered(verb);
                match target {
                    Target::Route(handler) => {
                        let this = instance.clone();
                        let bound_handler: Handler =
                            Arc::new(move |request: Request| handler(this.clone(), request));
                        router.on(verb, path, bound_handler);
                    }
                    Target::Middleware(handler) => {
                        let this = instance.clone();
                        let bound_middleware: Middleware = Arc::new(
                            move |request: Request, next: Next| handler(this.clone(), request, next),
                        );
                        router.use_middleware(path, bound_middleware);
                    }
                }
            }

            scope.provide_arc(instance);
            Ok(Instantiation::Created { bound })
        })
    }
}
