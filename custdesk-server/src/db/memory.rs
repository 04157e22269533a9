//! In-process executor for tests and local runs without MySQL
//!
//! Interprets the named statements in [`queries`](super::queries) over a
//! `BTreeMap` keyed by customer id. Unknown statements are rejected.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::executor::{DbError, Executor, Outcome, Param, Row, Statement};
use super::queries;
use crate::models::Customer;

/// In-memory stand-in for the `customers` table
#[derive(Default)]
pub struct MemoryExecutor {
    customers: Mutex<BTreeMap<String, Customer>>,
}

impl MemoryExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored customers.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Customer>> {
        // Every mutation is a single map operation, so a poisoned map is still consistent.
        self.customers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Executor for MemoryExecutor {
    async fn execute(&self, statement: &Statement, params: &[Param]) -> Result<Outcome, DbError> {
        DbError::check_arity(statement, params)?;
        let mut customers = self.lock();

        let outcome = match *statement {
            queries::INSERT_CUSTOMER => {
                let customer = Customer {
                    customer_id: text(params, 0)?.to_owned(),
                    customer_name: text(params, 1)?.to_owned(),
                    age: int(params, 2)?,
                    gender: text(params, 3)?.to_owned(),
                };
                if customers.contains_key(&customer.customer_id) {
                    return Err(DbError::Constraint(format!(
                        "Duplicate entry '{}' for key 'customers.PRIMARY'",
                        customer.customer_id
                    )));
                }
                customers.insert(customer.customer_id.clone(), customer);
                Outcome::Done
            }
            queries::SELECT_CUSTOMER => {
                let rows = customers
                    .get(text(params, 0)?)
                    .map(to_row)
                    .into_iter()
                    .collect();
                Outcome::Rows(rows)
            }
            queries::SELECT_ALL_CUSTOMERS => Outcome::Rows(customers.values().map(to_row).collect()),
            queries::UPDATE_CUSTOMER => {
                let (name, age, gender) = (text(params, 0)?, int(params, 1)?, text(params, 2)?);
                if let Some(existing) = customers.get_mut(text(params, 3)?) {
                    existing.customer_name = name.to_owned();
                    existing.age = age;
                    existing.gender = gender.to_owned();
                }
                Outcome::Done
            }
            queries::DELETE_CUSTOMER => {
                customers.remove(text(params, 0)?);
                Outcome::Done
            }
            queries::COUNT_CUSTOMERS => {
                let mut row = Row::new();
                row.insert("customer_count".into(), json!(customers.len()));
                Outcome::Rows(vec![row])
            }
            _ => return Err(DbError::Unsupported(statement.name)),
        };

        Ok(outcome)
    }
}

fn to_row(customer: &Customer) -> Row {
    let mut row = Row::new();
    row.insert("customer_id".into(), json!(customer.customer_id));
    row.insert("customer_name".into(), json!(customer.customer_name));
    row.insert("age".into(), json!(customer.age));
    row.insert("gender".into(), json!(customer.gender));
    row
}

fn text(params: &[Param], index: usize) -> Result<&str, DbError> {
    match params.get(index) {
        Some(Param::Text(value)) => Ok(value.as_str()),
        other => Err(DbError::Decode(format!(
            "expected text parameter at {}, got {:?}",
            index, other
        ))),
    }
}

fn int(params: &[Param], index: usize) -> Result<i32, DbError> {
    match params.get(index) {
        Some(Param::Int(value)) => i32::try_from(*value)
            .map_err(|_| DbError::Decode(format!("integer parameter {} out of range", value))),
        other => Err(DbError::Decode(format!(
            "expected integer parameter at {}, got {:?}",
            index, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_params(id: &str) -> Vec<Param> {
        vec![
            Param::from(id),
            Param::from("Alice"),
            Param::from(30),
            Param::from("F"),
        ]
    }

    #[tokio::test]
    async fn insert_then_select() {
        let db = MemoryExecutor::new();
        db.execute(&queries::INSERT_CUSTOMER, &insert_params("C1"))
            .await
            .unwrap();

        let rows = db
            .execute(&queries::SELECT_CUSTOMER, &[Param::from("C1")])
            .await
            .unwrap()
            .into_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["customer_name"], "Alice");
        assert_eq!(rows[0]["age"], 30);
    }

    #[tokio::test]
    async fn duplicate_insert_is_constraint_error() {
        let db = MemoryExecutor::new();
        db.execute(&queries::INSERT_CUSTOMER, &insert_params("C1"))
            .await
            .unwrap();

        let err = db
            .execute(&queries::INSERT_CUSTOMER, &insert_params("C1"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
        assert_eq!(db.len(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_row_changes_nothing() {
        let db = MemoryExecutor::new();
        let outcome = db
            .execute(
                &queries::UPDATE_CUSTOMER,
                &[
                    Param::from("Bob"),
                    Param::from(40),
                    Param::from("M"),
                    Param::from("missing"),
                ],
            )
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Done);
        assert!(db.is_empty());
    }

    #[tokio::test]
    async fn rows_keep_column_order() {
        let db = MemoryExecutor::new();
        db.execute(&queries::INSERT_CUSTOMER, &insert_params("C1"))
            .await
            .unwrap();

        let rows = db
            .execute(&queries::SELECT_ALL_CUSTOMERS, &[])
            .await
            .unwrap()
            .into_rows();
        let columns: Vec<_> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(columns, ["customer_id", "customer_name", "age", "gender"]);
    }

    #[tokio::test]
    async fn unknown_statement_rejected() {
        let db = MemoryExecutor::new();
        let stmt = Statement::read("orders.all", "SELECT * FROM orders");
        let err = db.execute(&stmt, &[]).await.unwrap_err();
        assert!(matches!(err, DbError::Unsupported("orders.all")));
    }

    #[tokio::test]
    async fn wrong_parameter_type_rejected() {
        let db = MemoryExecutor::new();
        let err = db
            .execute(
                &queries::INSERT_CUSTOMER,
                &[
                    Param::from("C1"),
                    Param::from("Alice"),
                    Param::from("thirty"),
                    Param::from("F"),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Decode(_)));
    }
}
