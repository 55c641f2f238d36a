//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::path::{Path, PathBuf};

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode},
};
use serde_json::Value;

use lattice::{AppConfig, ComponentDescriptor, HttpRouter, Lattice, StaticLoader};

#[path = "../fixtures/mock/a.controller.rs"]
pub mod a_controller;
#[path = "../fixtures/mock/b.controller.rs"]
pub mod b_controller;
#[path = "../fixtures/mock/c.middleware.rs"]
pub mod c_middleware;
#[path = "../fixtures/mock/d.controller.rs"]
pub mod d_controller;

pub use a_controller::AController;
pub use b_controller::BController;
pub use c_middleware::CMiddleware;
pub use d_controller::DController;

/// Discovery root holding `mock/`.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

/// Linkage table for every fixture component.
pub fn fixture_loader() -> StaticLoader {
    StaticLoader::new(fixtures_dir())
        .link("mock/a.controller.rs", ComponentDescriptor::of::<AController>())
        .link("mock/b.controller.rs", ComponentDescriptor::of::<BController>())
        .link("mock/c.middleware.rs", ComponentDescriptor::of::<CMiddleware>())
        .link("mock/d.controller.rs", ComponentDescriptor::of::<DController>())
}

/// Config rooted at the fixtures, bound to an ephemeral local port.
pub fn fixture_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..AppConfig::with_dir(fixtures_dir())
    }
}

/// Application over the fixtures with a fresh scope and router.
pub fn fixture_app() -> Lattice {
    Lattice::builder(fixture_config()).linked(fixture_loader()).build()
}

/// Paths relative to the fixtures dir, `/`-separated.
pub fn relative(paths: &[String]) -> Vec<String> {
    let root = fixtures_dir();
    paths
        .iter()
        .map(|p| {
            Path::new(p)
                .strip_prefix(&root)
                .unwrap_or(Path::new(p))
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

/// Route table rendered as `METHOD /path` strings.
pub fn table(router: &HttpRouter) -> Vec<String> {
    router.routes().iter().map(ToString::to_string).collect()
}

/// Issue a GET in-process and decode the JSON body (`Null` when empty).
pub async fn get_json(router: &HttpRouter, path: &str) -> (StatusCode, HeaderMap, Value) {
    let request = Request::builder().uri(path).body(Body::empty()).unwrap();
    let response = router.request(request).await;

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, headers, body)
}
