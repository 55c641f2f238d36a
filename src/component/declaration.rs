//! Route-binding declarations.
//!
//! A component fills a [`Routes`] table once, when its descriptor is
//! created. The table never touches the router; it is read when an
//! instance is constructed, and every binding is then bound to that
//! instance.
//!
//! ```text
//! impl Component for Users {
//!     fn routes(routes: &mut Routes<Self>) {
//!         routes
//!             .base_path("/users")
//!             .get("/:id", |this, req| async move { this.find(req).await })
//!             .post("", |this, req| async move { this.create(req).await })
//!             .when(|this, _scope| Ok(this.writable));
//!     }
//! }
//! ```

use std::future::Future;
use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use futures_util::future::{BoxFuture, FutureExt};

use crate::component::scope::Scope;
use crate::error::BoxError;
use crate::routing::Verb;

/// Route handler bound to an instance of `C`.
pub type RouteFn<C> = Arc<dyn Fn(Arc<C>, Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// Middleware bound to an instance of `C`.
pub type MiddlewareFn<C> =
    Arc<dyn Fn(Arc<C>, Request, Next) -> BoxFuture<'static, Response> + Send + Sync>;

/// Gate evaluated per instance before its binding is registered.
pub type Condition<C> = Arc<dyn Fn(&C, &Scope) -> Result<bool, BoxError> + Send + Sync>;

/// What a binding registers.
pub enum Target<C> {
    Route(RouteFn<C>),
    Middleware(MiddlewareFn<C>),
}

impl<C> Clone for Target<C> {
    fn clone(&self) -> Self {
        match self {
            Target::Route(handler) => Target::Route(handler.clone()),
            Target::Middleware(handler) => Target::Middleware(handler.clone()),
        }
    }
}

/// One declared binding: verb, path relative to the base path, handler and
/// optional condition.
pub struct RouteBinding<C> {
    pub verb: Verb,
    pub path: String,
    pub target: Target<C>,
    pub condition: Option<Condition<C>>,
}

/// Declared base path and bindings of a component type.
pub struct Routes<C> {
    base_path: String,
    bindings: Vec<RouteBinding<C>>,
}

impl<C: Send + Sync + 'static> Routes<C> {
    pub fn new() -> Self {
        Self {
            base_path: String::new(),
            bindings: Vec::new(),
        }
    }

    /// Prefix applied to every binding of this component. Defaults to `""`.
    pub fn base_path(&mut self, path: impl Into<String>) -> &mut Self {
        self.base_path = path.into();
        self
    }

    pub fn get<F, Fut, R>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Arc<C>, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.route(Verb::Get, path, handler)
    }

    pub fn post<F, Fut, R>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Arc<C>, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.route(Verb::Post, path, handler)
    }

    pub fn put<F, Fut, R>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Arc<C>, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.route(Verb::Put, path, handler)
    }

    pub fn patch<F, Fut, R>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Arc<C>, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.route(Verb::Patch, path, handler)
    }

    pub fn delete<F, Fut, R>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Arc<C>, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.route(Verb::Delete, path, handler)
    }

    /// Handler for every method at `path`.
    pub fn all<F, Fut, R>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Arc<C>, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        self.route(Verb::All, path, handler)
    }

    /// Declare a handler for an arbitrary verb.
    pub fn route<F, Fut, R>(&mut self, verb: Verb, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Arc<C>, Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let handler: RouteFn<C> = Arc::new(move |this: Arc<C>, request: Request| {
            let response = handler(this, request);
            async move { response.await.into_response() }.boxed()
        });

        self.bindings.push(RouteBinding {
            verb,
            path: path.into(),
            target: Target::Route(handler),
            condition: None,
        });
        self
    }

    /// Declare a middleware for requests matching `path` (wildcard verb).
    /// It covers this component's later bindings and every component
    /// registered after this one.
    pub fn middleware<F, Fut, R>(&mut self, path: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(Arc<C>, Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
        R: IntoResponse,
    {
        let handler: MiddlewareFn<C> = Arc::new(move |this: Arc<C>, request: Request, next: Next| {
            let response = handler(this, request, next);
            async move { response.await.into_response() }.boxed()
        });

        self.bindings.push(RouteBinding {
            verb: Verb::All,
            path: path.into(),
            target: Target::Middleware(handler),
            condition: None,
        });
        self
    }

    /// Gate the most recently declared binding.
    pub fn when<F>(&mut self, condition: F) -> &mut Self
    where
        F: Fn(&C, &Scope) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        match self.bindings.last_mut() {
            Some(binding) => binding.condition = Some(Arc::new(condition)),
            None => tracing::warn!(
                component = std::any::type_name::<C>(),
                "Condition declared before any binding; ignored"
            ),
        }
        self
    }

    /// Declared base path.
    pub fn prefix(&self) -> &str {
        &self.base_path
    }

    /// Declared bindings, in declaration order.
    pub fn bindings(&self) -> &[RouteBinding<C>] {
        &self.bindings
    }
}

impl<C: Send + Sync + 'static> Default for Routes<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe {
        enabled: bool,
    }

    #[test]
    fn test_declaration_records_bindings_in_order() {
        let mut routes = Routes::<Probe>::new();
        routes
            .base_path("/probe")
            .middleware("*", |_this, req, next: Next| async move { next.run(req).await })
            .get("", |_this, _req| async { "get" })
            .post("/submit", |_this, _req| async { "post" })
            .all("/any", |_this, _req| async { "any" });

        assert_eq!(routes.prefix(), "/probe");
        let declared: Vec<(Verb, &str)> = routes
            .bindings()
            .iter()
            .map(|b| (b.verb, b.path.as_str()))
            .collect();
        assert_eq!(
            declared,
            vec![
                (Verb::All, "*"),
                (Verb::Get, ""),
                (Verb::Post, "/submit"),
                (Verb::All, "/any"),
            ]
        );
        assert!(matches!(routes.bindings()[0].target, Target::Middleware(_)));
    }

    #[test]
    fn test_when_gates_last_binding_only() {
        let mut routes = Routes::<Probe>::new();
        routes
            .get("/open", |_this, _req| async { "open" })
            .get("/gated", |_this, _req| async { "gated" })
            .when(|this, _scope| Ok(this.enabled));

        let bindings = routes.bindings();
        assert!(bindings[0].condition.is_none());

        let condition = bindings[1].condition.as_ref().unwrap();
        let scope = Scope::new();
        assert!(condition(&Probe { enabled: true }, &scope).unwrap());
        assert!(!condition(&Probe { enabled: false }, &scope).unwrap());
    }

    #[test]
    fn test_when_without_binding_is_ignored() {
        let mut routes = Routes::<Probe>::new();
        routes.when(|_this, _scope| Ok(false));
        assert!(routes.bindings().is_empty());
    }
}
