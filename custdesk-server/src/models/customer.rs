//! Customer record and its identifier

use serde::{Deserialize, Serialize};

use super::ValidationError;
use crate::db::{DbError, Row};

/// Validated customer identifier (caller-supplied, never generated)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomerId(String);

impl CustomerId {
    /// Create a customer id, rejecting blank input.
    ///
    /// # Example
    /// ```
    /// use custdesk_server::models::CustomerId;
    ///
    /// assert!(CustomerId::new("C1").is_ok());
    /// assert!(CustomerId::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::Empty {
                field: "customer_id",
            });
        }

        Ok(Self(s.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

/// A row of the `customers` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: String,
    pub customer_name: String,
    pub age: i32,
    pub gender: String,
}

impl Customer {
    /// Check the fields the table relies on.
    pub fn validate(&self) -> Result<CustomerId, ValidationError> {
        CustomerId::new(&self.customer_id)
    }

    /// Decode a row returned by a read statement.
    ///
    /// Columns beyond the four known ones are ignored.
    pub fn from_row(row: Row) -> Result<Self, DbError> {
        serde_json::from_value(serde_json::Value::Object(row))
            .map_err(|e| DbError::Decode(e.to_string()))
    }
}
