//! Landing endpoint

use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
pub struct IndexResponse {
    pub message: &'static str,
}

/// GET /
async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        message: "custdesk customer API",
    })
}

pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(index))
}
