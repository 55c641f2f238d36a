use std::sync::Arc;

use axum::{extract::Request, http::HeaderValue, middleware::Next};

use lattice::error::BoxError;
use lattice::{Component, Routes, Scope};

pub struct CMiddleware;

impl Component for CMiddleware {
    fn routes(routes: &mut Routes<Self>) {
        routes.middleware("*", |_this: Arc<Self>, req: Request, next: Next| async move {
            let mut response = next.run(req).await;
            response
                .headers_mut()
                .insert("middleware-c", HeaderValue::from_static("active"));
            response
        });
    }

    async fn create(_scope: &Scope) -> Result<Self, BoxError> {
        Ok(Self)
    }
}
