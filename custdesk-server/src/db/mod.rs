//! Database layer - statement dispatch, connection pool and repository
//!
//! # Design Principles
//!
//! - One dispatch point: every statement goes through [`Executor::execute`]
//! - Statements are named constants tagged Read or Write, never sniffed
//! - Values are always bound, never formatted into SQL
//! - Rely on DB constraints - no check-then-insert

pub mod executor;
pub mod memory;
pub mod pool;
pub mod queries;
pub mod repo;

pub use executor::{DbError, Executor, Outcome, Param, Row, Statement, StatementKind};
pub use memory::MemoryExecutor;
pub use pool::MySqlExecutor;
pub use repo::CustomerRepo;
