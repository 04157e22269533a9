//! Customer repository
//!
//! Turns the named statements into typed operations:
//! - create/update: write, then re-read the row by id
//! - get: zero rows is `DbError::NotFound`
//! - delete: no existence check, deleting twice is fine

use super::executor::{DbError, Executor, Param};
use super::queries;
use crate::models::Customer;

const RESOURCE: &str = "customer";

/// Customer repository
pub struct CustomerRepo<'a> {
    executor: &'a dyn Executor,
}

impl<'a> CustomerRepo<'a> {
    pub fn new(executor: &'a dyn Executor) -> Self {
        Self { executor }
    }

    /// Insert a customer and return the stored row.
    ///
    /// A duplicate id fails at the primary key; there is no pre-check.
    pub async fn create(&self, customer: &Customer) -> Result<Customer, DbError> {
        self.executor
            .execute(
                &queries::INSERT_CUSTOMER,
                &[
                    Param::from(customer.customer_id.as_str()),
                    Param::from(customer.customer_name.as_str()),
                    Param::from(customer.age),
                    Param::from(customer.gender.as_str()),
                ],
            )
            .await?;

        self.get(&customer.customer_id).await
    }

    /// Get a single customer by id.
    pub async fn get(&self, customer_id: &str) -> Result<Customer, DbError> {
        let row = self
            .executor
            .execute(&queries::SELECT_CUSTOMER, &[Param::from(customer_id)])
            .await?
            .into_rows()
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound {
                resource: RESOURCE,
                id: customer_id.to_owned(),
            })?;

        Customer::from_row(row)
    }

    /// List every customer in store order.
    pub async fn list(&self) -> Result<Vec<Customer>, DbError> {
        self.executor
            .execute(&queries::SELECT_ALL_CUSTOMERS, &[])
            .await?
            .into_rows()
            .into_iter()
            .map(Customer::from_row)
            .collect()
    }

    /// Overwrite name, age and gender, then re-read.
    ///
    /// An id matching no row updates nothing; the re-read reports NotFound.
    pub async fn update(&self, customer: &Customer) -> Result<Customer, DbError> {
        self.executor
            .execute(
                &queries::UPDATE_CUSTOMER,
                &[
                    Param::from(customer.customer_name.as_str()),
                    Param::from(customer.age),
                    Param::from(customer.gender.as_str()),
                    Param::from(customer.customer_id.as_str()),
                ],
            )
            .await?;

        self.get(&customer.customer_id).await
    }

    /// Delete by id, whether or not the row exists.
    pub async fn delete(&self, customer_id: &str) -> Result<(), DbError> {
        self.executor
            .execute(&queries::DELETE_CUSTOMER, &[Param::from(customer_id)])
            .await?;
        Ok(())
    }

    /// Number of stored customers.
    pub async fn count(&self) -> Result<i64, DbError> {
        let rows = self
            .executor
            .execute(&queries::COUNT_CUSTOMERS, &[])
            .await?
            .into_rows();

        rows.first()
            .and_then(|row| row.get("customer_count"))
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| DbError::Decode("missing customer_count column".into()))
    }
}
