//! Domain models with validation at construction
//!
//! Invalid input returns ValidationError, not panic.

pub mod customer;
pub mod validation;

pub use customer::{Customer, CustomerId};
pub use validation::ValidationError;
