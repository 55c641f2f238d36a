//! JSON echo endpoint.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::component::{Component, Routes, Scope};
use crate::error::BoxError;

/// Maximum accepted body size, in bytes. Optional scope service.
#[derive(Debug, Clone, Copy)]
pub struct EchoLimit(pub usize);

impl Default for EchoLimit {
    fn default() -> Self {
        Self(64 * 1024)
    }
}

/// `POST /echo`: answers with the JSON body it received.
pub struct EchoController {
    limit: usize,
}

impl EchoController {
    async fn echo(&self, request: Request) -> Response {
        let bytes = match axum::body::to_bytes(request.into_body(), self.limit).await {
            Ok(bytes) => bytes,
            Err(_) => return error(StatusCode::PAYLOAD_TOO_LARGE, "body exceeds limit"),
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Json(value).into_response(),
            Err(e) => error(StatusCode::BAD_REQUEST, &e.to_string()),
        }
    }
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

impl Component for EchoController {
    fn routes(routes: &mut Routes<Self>) {
        routes.post("/echo", |this: Arc<Self>, req| async move { this.echo(req).await });
    }

    async fn create(scope: &Scope) -> Result<Self, BoxError> {
        let limit = scope.get::<EchoLimit>().map(|l| *l).unwrap_or_default();
        Ok(Self { limit: limit.0 })
    }
}
