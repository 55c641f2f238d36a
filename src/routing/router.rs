//! Shared HTTP router.
//!
//! # Responsibilities
//! - Record route and middleware registrations in arrival order
//! - Expose the registered route table (`ALL /*`, `GET /a`, ...)
//! - Compile the table into an `axum::Router`
//! - Serve single requests in-process (tests, health probes)
//!
//! # Design Decisions
//! - A middleware wraps exactly the routes registered after it; earlier
//!   routes never see it. The axum tree is built back to front so each
//!   `layer` call only covers later registrations.
//! - First registration of a (verb, path) pair wins; later duplicates are
//!   skipped with a warning instead of panicking inside axum
//! - Parameters at the same position take the first registered name, so
//!   `/users/:id` and `/users/:user_id` compile to one axum route
//! - Mutation is sequential by construction; the lock only guards against
//!   accidental sharing, never real contention

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{any, on, MethodFilter, MethodRouter},
    Router,
};
use futures_util::future::BoxFuture;
use parking_lot::RwLock;
use tower::{Layer, ServiceExt};
use tower_http::{
    compression::CompressionLayer,
    normalize_path::{NormalizePath, NormalizePathLayer},
    trace::TraceLayer,
};

use crate::routing::matcher::{pattern_matches, ParamNames};

/// Type-erased request handler.
pub type Handler = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// Type-erased middleware.
pub type Middleware = Arc<dyn Fn(Request, Next) -> BoxFuture<'static, Response> + Send + Sync>;

/// HTTP verb of a route binding. `All` is the wildcard verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    All,
}

impl Verb {
    fn method_filter(self) -> Option<MethodFilter> {
        match self {
            Verb::Get => Some(MethodFilter::GET),
            Verb::Post => Some(MethodFilter::POST),
            Verb::Put => Some(MethodFilter::PUT),
            Verb::Patch => Some(MethodFilter::PATCH),
            Verb::Delete => Some(MethodFilter::DELETE),
            Verb::Head => Some(MethodFilter::HEAD),
            Verb::Options => Some(MethodFilter::OPTIONS),
            Verb::All => None,
        }
    }

    fn overlaps(self, other: Verb) -> bool {
        self == other || self == Verb::All || other == Verb::All
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Patch => "PATCH",
            Verb::Delete => "DELETE",
            Verb::Head => "HEAD",
            Verb::Options => "OPTIONS",
            Verb::All => "ALL",
        };
        f.write_str(name)
    }
}

/// One row of the registered route table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRecord {
    pub method: Verb,
    pub path: String,
}

impl fmt::Display for RouteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

enum Entry {
    Route {
        verb: Verb,
        path: String,
        handler: Handler,
    },
    Middleware {
        path: String,
        middleware: Middleware,
    },
}

impl Entry {
    fn record(&self) -> RouteRecord {
        match self {
            Entry::Route { verb, path, .. } => RouteRecord {
                method: *verb,
                path: path.clone(),
            },
            Entry::Middleware { path, .. } => RouteRecord {
                method: Verb::All,
                path: path.clone(),
            },
        }
    }
}

/// Router shared by every component in an injection scope.
pub struct HttpRouter {
    entries: RwLock<Vec<Entry>>,
    compress: bool,
}

impl HttpRouter {
    /// Create an empty router with compression enabled.
    pub fn new() -> Self {
        Self::with_compression(true)
    }

    /// Create an empty router, choosing whether responses are gzip-compressed.
    pub fn with_compression(compress: bool) -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            compress,
        }
    }

    /// Register a handler for `verb` at `path`.
    pub fn on(&self, verb: Verb, path: impl Into<String>, handler: Handler) {
        let path = path.into();
        tracing::debug!(method = %verb, path = %path, "Route registered");
        self.entries.write().push(Entry::Route { verb, path, handler });
    }

    /// Register a middleware for every request whose path matches `pattern`.
    pub fn use_middleware(&self, pattern: impl Into<String>, middleware: Middleware) {
        let path = pattern.into();
        tracing::debug!(path = %path, "Middleware registered");
        self.entries.write().push(Entry::Middleware { path, middleware });
    }

    /// Registered routes and middleware, in registration order.
    pub fn routes(&self) -> Vec<RouteRecord> {
        self.entries.read().iter().map(Entry::record).collect()
    }

    /// Number of registrations.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Compile the registrations into an axum router.
    pub fn build(&self) -> Router {
        let entries = self.entries.read();
        let axum_paths = axum_paths(&entries);

        let mut router = Router::new();
        for (entry, axum_path) in entries.iter().zip(&axum_paths).rev() {
            match entry {
                Entry::Route { verb, path, handler } => {
                    let Some(axum_path) = axum_path else {
                        tracing::warn!(method = %verb, path = %path, "Duplicate route ignored");
                        continue;
                    };
                    router = router.route(axum_path, method_router(*verb, handler.clone()));
                }
                Entry::Middleware { path, middleware: handler } => {
                    let pattern = path.clone();
                    let handler = handler.clone();
                    router = router.layer(middleware::from_fn(
                        move |request: Request, next: Next| -> BoxFuture<'static, Response> {
                            if pattern_matches(&pattern, request.uri().path()) {
                                handler(request, next)
                            } else {
                                Box::pin(next.run(request))
                            }
                        },
                    ));
                }
            }
        }
        router
    }

    /// Full HTTP service: compiled routes plus trailing-slash trimming,
    /// optional compression and request tracing.
    pub fn into_service(&self) -> NormalizePath<Router> {
        let mut router = self.build();
        if self.compress {
            router = router.layer(CompressionLayer::new());
        }
        router = router.layer(TraceLayer::new_for_http());

        NormalizePathLayer::trim_trailing_slash().layer(router)
    }

    /// Run a single request through the router without opening a socket.
    pub async fn request(&self, request: Request) -> Response {
        match self.into_service().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }
}

impl Default for HttpRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HttpRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRouter")
            .field("routes", &self.routes())
            .field("compress", &self.compress)
            .finish()
    }
}

/// axum path per entry, in registration order. `None` for middleware and
/// for routes hidden by an earlier registration on the same path.
fn axum_paths(entries: &[Entry]) -> Vec<Option<String>> {
    let mut names = ParamNames::new();
    let mut seen: Vec<(Verb, String)> = Vec::new();

    entries
        .iter()
        .map(|entry| {
            let Entry::Route { verb, path, .. } = entry else {
                return None;
            };
            let key = names.axum_path(path);
            if seen.iter().any(|(v, p)| *p == key && v.overlaps(*verb)) {
                return None;
            }
            seen.push((*verb, key.clone()));
            Some(key)
        })
        .collect()
}

fn method_router(verb: Verb, handler: Handler) -> MethodRouter {
    let endpoint = move |request: Request| handler(request);
    match verb.method_filter() {
        Some(filter) => on(filter, endpoint),
        None => any(endpoint),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::HeaderValue, http::StatusCode, response::IntoResponse};
    use futures_util::FutureExt;

    fn text(body: &'static str) -> Handler {
        Arc::new(move |_req: Request| async move { body.into_response() }.boxed())
    }

    fn header(name: &'static str) -> Middleware {
        Arc::new(move |req: Request, next: Next| {
            async move {
                let mut response = next.run(req).await;
                response
                    .headers_mut()
                    .insert(name, HeaderValue::from_static("active"));
                response
            }
            .boxed()
        })
    }

    fn get(path: &str) -> Request {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    #[test]
    fn test_route_table_keeps_registration_order() {
        let router = HttpRouter::new();
        router.use_middleware("/*", header("x-one"));
        router.on(Verb::Get, "/a", text("a"));
        router.on(Verb::Post, "/b", text("b"));

        let table: Vec<String> = router.routes().iter().map(ToString::to_string).collect();
        assert_eq!(table, vec!["ALL /*", "GET /a", "POST /b"]);
        assert_eq!(router.len(), 3);
    }

    #[tokio::test]
    async fn test_middleware_only_wraps_later_routes() {
        let router = HttpRouter::new();
        router.on(Verb::Get, "/early", text("early"));
        router.use_middleware("/*", header("x-mw"));
        router.on(Verb::Get, "/late", text("late"));

        let early = router.request(get("/early")).await;
        assert_eq!(early.status(), StatusCode::OK);
        assert!(early.headers().get("x-mw").is_none());

        let late = router.request(get("/late")).await;
        assert_eq!(late.status(), StatusCode::OK);
        assert_eq!(late.headers().get("x-mw").unwrap(), "active");
    }

    #[tokio::test]
    async fn test_scoped_middleware_skips_other_paths() {
        let router = HttpRouter::new();
        router.use_middleware("/api/*", header("x-api"));
        router.on(Verb::Get, "/api/items", text("items"));
        router.on(Verb::Get, "/public", text("public"));

        let api = router.request(get("/api/items")).await;
        assert!(api.headers().get("x-api").is_some());

        let public = router.request(get("/public")).await;
        assert!(public.headers().get("x-api").is_none());
    }

    #[tokio::test]
    async fn test_first_duplicate_wins() {
        let router = HttpRouter::new();
        router.on(Verb::Get, "/dup", text("first"));
        router.on(Verb::Get, "/dup", text("second"));
        router.on(Verb::All, "/dup", text("third"));

        let response = router.request(get("/dup")).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"first");
    }

    #[tokio::test]
    async fn test_trailing_slash_and_unknown_route() {
        let router = HttpRouter::new();
        router.on(Verb::Get, "/a", text("a"));

        assert_eq!(router.request(get("/a/")).await.status(), StatusCode::OK);
        assert_eq!(router.request(get("/missing")).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_differently_named_params_share_a_route() {
        let router = HttpRouter::new();
        router.on(Verb::Get, "/users/:id", text("read"));
        router.on(Verb::Delete, "/users/:user_id", text("delete"));
        router.on(Verb::Get, "/users/{uid}", text("shadowed"));

        let read = router.request(get("/users/7")).await;
        let body = axum::body::to_bytes(read.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"read");

        let request = Request::builder()
            .method("DELETE")
            .uri("/users/7")
            .body(Body::empty())
            .unwrap();
        let response = router.request(request).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"delete");
    }

    #[tokio::test]
    async fn test_verbs_on_same_path() {
        let router = HttpRouter::new();
        router.on(Verb::Get, "/items/:id", text("read"));
        router.on(Verb::Delete, "/items/:id", text("delete"));

        let request = Request::builder()
            .method("DELETE")
            .uri("/items/7")
            .body(Body::empty())
            .unwrap();
        let response = router.request(request).await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"delete");
    }
}
