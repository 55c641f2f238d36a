//! Startup orchestration.
//!
//! # Responsibilities
//! - Discover component paths and order them
//! - Load descriptors and register them sequentially on the shared router
//! - Bind the listener and serve the compiled router
//!
//! # Design Decisions
//! - Configuration is read once, at build time; nothing mutates it later
//! - Pre-registered middleware is bound after loading succeeds and before
//!   any discovered component, so a load failure leaves the router empty
//! - Routes are compiled when `serve` runs; bindings added afterwards are
//!   not served

use std::collections::HashSet;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{extract::Request, middleware::Next, response::Response, ServiceExt};
use futures_util::FutureExt;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::component::{load_components, register_components, ComponentLoader, Scope, StaticLoader};
use crate::config::{AppConfig, DiscoverySource};
use crate::discovery::{order_paths, GlobMatcher, PathMatcher, TransformPaths};
use crate::error::{LatticeError, Result};
use crate::lifecycle::Shutdown;
use crate::routing::{HttpRouter, Middleware};

/// Convention-based application: discover → order → load → register → listen.
pub struct Lattice {
    config: Arc<AppConfig>,
    scope: Arc<Scope>,
    router: Arc<HttpRouter>,
    loader: Arc<dyn ComponentLoader>,
    matcher: Arc<dyn PathMatcher>,
    transform_paths: Option<TransformPaths>,
    middleware: Vec<Middleware>,
    registration: Mutex<Registration>,
}

/// Progress of the one-shot registration run.
#[derive(Debug)]
enum Registration {
    Pending,
    Done,
    Failed(String),
}

/// Builder for [`Lattice`].
pub struct LatticeBuilder {
    config: AppConfig,
    scope: Scope,
    loader: Option<Arc<dyn ComponentLoader>>,
    matcher: Option<Arc<dyn PathMatcher>>,
    linked: Option<StaticLoader>,
    transform_paths: Option<TransformPaths>,
    middleware: Vec<Middleware>,
}

impl LatticeBuilder {
    /// Use a static linkage table as the loader. With
    /// `discovery = "linked"` it also serves as the path matcher.
    pub fn linked(mut self, loader: StaticLoader) -> Self {
        self.linked = Some(loader);
        self
    }

    /// Use a custom component loader.
    pub fn loader<L: ComponentLoader + 'static>(mut self, loader: L) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    /// Use a custom path matcher.
    pub fn matcher<M: PathMatcher + 'static>(mut self, matcher: M) -> Self {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    /// Replace the default middleware-first ordering.
    pub fn transform_paths<F>(mut self, transform: F) -> Self
    where
        F: Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static,
    {
        self.transform_paths = Some(Arc::new(transform));
        self
    }

    /// Add a middleware applied to every request, ahead of all discovered
    /// components. Multiple calls keep their order.
    pub fn middleware<F, Fut>(mut self, middleware: F) -> Self
    where
        F: Fn(Request, Next) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.middleware
            .push(Arc::new(move |request: Request, next: Next| middleware(request, next).boxed()));
        self
    }

    /// Make a service available to component constructors.
    pub fn provide<T: Send + Sync + 'static>(self, value: T) -> Self {
        self.scope.provide(value);
        self
    }

    pub fn build(self) -> Lattice {
        let config = Arc::new(self.config);
        let router = Arc::new(HttpRouter::with_compression(config.compress));

        let scope = Arc::new(self.scope);
        scope.provide_arc(router.clone());
        scope.provide_arc(config.clone());

        let loader: Arc<dyn ComponentLoader> = match (self.loader, &self.linked) {
            (Some(loader), _) => loader,
            (None, Some(linked)) => Arc::new(linked.clone()),
            (None, None) => Arc::new(StaticLoader::new(&config.dir)),
        };

        let matcher: Arc<dyn PathMatcher> = match (self.matcher, config.discovery, self.linked) {
            (Some(matcher), _, _) => matcher,
            (None, DiscoverySource::Linked, Some(linked)) => Arc::new(linked),
            (None, DiscoverySource::Linked, None) => {
                tracing::warn!("Linked discovery requested without a linkage table; walking the filesystem");
                Arc::new(GlobMatcher::new())
            }
            (None, DiscoverySource::Filesystem, _) => Arc::new(GlobMatcher::new()),
        };

        Lattice {
            config,
            scope,
            router,
            loader,
            matcher,
            transform_paths: self.transform_paths,
            middleware: self.middleware,
            registration: Mutex::new(Registration::Pending),
        }
    }
}

impl Lattice {
    /// Start building an application from `config`.
    pub fn builder(config: AppConfig) -> LatticeBuilder {
        LatticeBuilder {
            config,
            scope: Scope::new(),
            loader: None,
            matcher: None,
            linked: None,
            transform_paths: None,
            middleware: Vec::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn scope(&self) -> &Arc<Scope> {
        &self.scope
    }

    /// The shared router every component binds to.
    pub fn router(&self) -> &Arc<HttpRouter> {
        &self.router
    }

    /// Discover component paths and return them in registration order.
    pub fn find_components(&self) -> Result<Vec<String>> {
        let dir = &self.config.dir;
        let mut seen = HashSet::new();
        let mut paths = Vec::new();

        for pattern in self.config.patterns() {
            for path in self.matcher.find(dir, &pattern)? {
                if seen.insert(path.clone()) {
                    paths.push(path);
                }
            }
        }

        let ordered = order_paths(paths, self.transform_paths.as_ref());
        tracing::info!(
            dir = %dir.display(),
            count = ordered.len(),
            custom_order = self.transform_paths.is_some(),
            "Components discovered"
        );
        Ok(ordered)
    }

    /// Discover, load and register every component. Returns the number of
    /// bindings registered.
    ///
    /// Runs once. After a success later calls return `Ok(0)`; after a
    /// failure they return [`LatticeError::RegistrationFailed`]. Concurrent
    /// callers wait for the first run to finish.
    pub async fn register_routes(&self) -> Result<usize> {
        let mut registration = self.registration.lock().await;
        match &*registration {
            Registration::Pending => {}
            Registration::Done => {
                tracing::debug!("Routes already registered");
                return Ok(0);
            }
            Registration::Failed(reason) => return Err(LatticeError::RegistrationFailed(reason.clone())),
        }

        let outcome = self.run_registration().await;
        *registration = match &outcome {
            Ok(_) => Registration::Done,
            Err(e) => Registration::Failed(e.to_string()),
        };
        outcome
    }

    async fn run_registration(&self) -> Result<usize> {
        let paths = self.find_components()?;
        let descriptors = load_components(self.loader.as_ref(), &paths).await?;

        for middleware in &self.middleware {
            self.router.use_middleware("/*", middleware.clone());
        }

        let bound = register_components(&self.scope, &descriptors).await?;
        let total = bound + self.middleware.len();

        tracing::info!(components = descriptors.len(), routes = total, "Routes registered");
        Ok(total)
    }

    /// Register routes, bind the configured address and start serving in a
    /// background task. Resolves once the socket is listening.
    pub async fn serve(&self) -> Result<Listening> {
        self.register_routes().await?;

        let address = self.config.listen_address();
        let listener = TcpListener::bind((self.config.host.as_str(), self.config.port))
            .await
            .map_err(|source| LatticeError::Bind {
                address: address.clone(),
                source,
            })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| LatticeError::Bind { address, source })?;

        let service = self.router.into_service();
        let shutdown = Shutdown::new();
        let stopped = shutdown.wait();

        let task = tokio::spawn(async move {
            axum::serve(listener, ServiceExt::<Request>::into_make_service(service))
                .with_graceful_shutdown(stopped)
                .await
        });

        tracing::info!(address = %local_addr, routes = self.router.len(), "Listening for connections");
        Ok(Listening {
            local_addr,
            shutdown,
            task,
        })
    }
}

/// A running server.
pub struct Listening {
    local_addr: SocketAddr,
    shutdown: Shutdown,
    task: JoinHandle<std::io::Result<()>>,
}

impl Listening {
    /// Address the server is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Handle that stops the server when triggered.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(self) -> Result<()> {
        self.shutdown.trigger();
        self.wait().await
    }

    /// Wait until the server task exits.
    pub async fn wait(self) -> Result<()> {
        match self.task.await {
            Ok(Ok(())) => {
                tracing::info!(address = %self.local_addr, "Server stopped");
                Ok(())
            }
            Ok(Err(e)) => Err(LatticeError::Server(e.to_string())),
            Err(e) => Err(LatticeError::Server(e.to_string())),
        }
    }
}
