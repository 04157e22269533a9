//! HTTP server layer
//!
//! Axum server with:
//! - CORS (permissive unless origins are listed)
//! - Request tracing and timeout
//! - Graceful shutdown
//! - JSON error responses

pub mod error;
pub mod extractors;
pub mod routes;
pub mod server;

pub use axum::http::HeaderValue;
pub use error::ApiError;
pub use server::{build_router, run_server, ServerConfig, ServerError};
