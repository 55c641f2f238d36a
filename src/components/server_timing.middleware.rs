//! Adds a `server-timing` header with the time spent handling each request.

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::Request, http::HeaderValue, middleware::Next};

use crate::component::{Component, Routes, Scope};
use crate::error::BoxError;

pub const HEADER: &str = "server-timing";

/// Wraps every later-registered route.
pub struct ServerTiming {
    metric: &'static str,
}

impl Component for ServerTiming {
    fn routes(routes: &mut Routes<Self>) {
        routes.middleware("*", |this: Arc<Self>, req: Request, next: Next| async move {
            let started = Instant::now();
            let mut response = next.run(req).await;

            let elapsed = started.elapsed().as_secs_f64() * 1000.0;
            if let Ok(value) = HeaderValue::from_str(&format!("{};dur={elapsed:.3}", this.metric)) {
                response.headers_mut().insert(HEADER, value);
            }
            response
        });
    }

    async fn create(_scope: &Scope) -> Result<Self, BoxError> {
        Ok(Self { metric: "app" })
    }
}
