use std::sync::Arc;

use axum::Json;
use serde_json::{json, Value};

use lattice::error::BoxError;
use lattice::{Component, Routes, Scope};

pub struct DController;

impl Component for DController {
    fn routes(routes: &mut Routes<Self>) {
        routes
            .base_path("/d")
            .get("", |_this: Arc<Self>, _req| async { Json::<Value>(json!({ "message": "Controller /d" })) });
    }

    async fn create(_scope: &Scope) -> Result<Self, BoxError> {
        Ok(Self)
    }
}
