//! Liveness endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use serde::Serialize;

use crate::component::{Component, Routes, Scope};
use crate::error::BoxError;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
}

/// `GET /health`
pub struct HealthController {
    started: Instant,
}

impl HealthController {
    fn report(&self) -> HealthReport {
        HealthReport {
            status: "ok",
            version: env!("CARGO_PKG_VERSION"),
            uptime_secs: self.started.elapsed().as_secs(),
        }
    }
}

impl Component for HealthController {
    fn routes(routes: &mut Routes<Self>) {
        routes
            .base_path("/health")
            .get("", |this: Arc<Self>, _req| async move { Json(this.report()) });
    }

    async fn create(_scope: &Scope) -> Result<Self, BoxError> {
        Ok(Self {
            started: Instant::now(),
        })
    }
}
