//! custdesk-server: HTTP server for customer records
//!
//! Five CRUD endpoints over a single `customers` table. All database access
//! goes through the [`db::Executor`] trait so the pool can be swapped for an
//! in-memory store in tests.

pub mod db;
pub mod http;
pub mod models;
pub mod state;

pub use db::{DbError, Executor, MemoryExecutor, MySqlExecutor};
pub use http::{build_router, run_server, ServerConfig, ServerError};
pub use models::{Customer, CustomerId, ValidationError};
pub use state::AppState;
