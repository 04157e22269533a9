//! MySQL-backed executor with a lazily created connection pool
//!
//! The pool is created on first use (or by [`Executor::warm_up`]) and reused
//! afterwards. Connections are pinged before being handed out, so a
//! connection the server dropped is replaced instead of failing the
//! statement.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::types::chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use sqlx::{Column, Row as _, TypeInfo, ValueRef};
use tokio::sync::OnceCell;

use super::executor::{DbError, Executor, Outcome, Param, Row, Statement, StatementKind};

/// Default maximum connections for the pool.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Executor backed by a sqlx `MySqlPool`.
pub struct MySqlExecutor {
    options: MySqlConnectOptions,
    max_connections: u32,
    pool: OnceCell<MySqlPool>,
}

impl MySqlExecutor {
    pub fn new(options: MySqlConnectOptions) -> Self {
        Self::with_max_connections(options, DEFAULT_MAX_CONNECTIONS)
    }

    pub fn with_max_connections(options: MySqlConnectOptions, max_connections: u32) -> Self {
        Self {
            options,
            max_connections: max_connections.max(1),
            pool: OnceCell::new(),
        }
    }

    /// Whether the pool has been created yet.
    pub fn is_active(&self) -> bool {
        self.pool.initialized()
    }

    async fn pool(&self) -> Result<&MySqlPool, DbError> {
        let pool = self
            .pool
            .get_or_try_init(|| async {
                tracing::info!(
                    host = self.options.get_host(),
                    database = ?self.options.get_database(),
                    max_connections = self.max_connections,
                    "Creating MySQL connection pool"
                );
                MySqlPoolOptions::new()
                    .max_connections(self.max_connections)
                    .test_before_acquire(true)
                    .connect_with(self.options.clone())
                    .await
            })
            .await?;
        Ok(pool)
    }
}

#[async_trait]
impl Executor for MySqlExecutor {
    async fn execute(&self, statement: &Statement, params: &[Param]) -> Result<Outcome, DbError> {
        DbError::check_arity(statement, params)?;
        let pool = self.pool().await?;
        tracing::debug!(statement = statement.name, "executing statement");

        match statement.kind {
            StatementKind::Read => {
                let mut conn = pool.acquire().await?;
                let rows = bind_params(sqlx::query(statement.sql), params)
                    .fetch_all(&mut *conn)
                    .await?;
                let rows = rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?;
                Ok(Outcome::Rows(rows))
            }
            StatementKind::Write => {
                // Dropping the transaction on error rolls back and returns the connection.
                let mut tx = pool.begin().await?;
                let result = bind_params(sqlx::query(statement.sql), params)
                    .execute(&mut *tx)
                    .await?;
                tx.commit().await?;
                tracing::debug!(
                    statement = statement.name,
                    rows_affected = result.rows_affected(),
                    "statement committed"
                );
                Ok(Outcome::Done)
            }
        }
    }

    async fn warm_up(&self) -> Result<(), DbError> {
        self.pool().await.map(|_| ())
    }
}

fn bind_params<'q>(
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &'q [Param],
) -> Query<'q, MySql, MySqlArguments> {
    for param in params {
        query = match param {
            Param::Text(value) => query.bind(value.as_str()),
            Param::Int(value) => query.bind(*value),
        };
    }
    query
}

fn decode_row(row: &MySqlRow) -> Result<Row, DbError> {
    let mut map = Row::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal())?;
        map.insert(column.name().to_owned(), value);
    }
    Ok(map)
}

fn decode_column(row: &MySqlRow, index: usize) -> Result<Value, DbError> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let type_name = raw.type_info().name().to_owned();

    let value = match type_name.as_str() {
        "BOOLEAN" => Value::from(row.try_get::<bool, _>(index)?),
        name if name.ends_with("UNSIGNED") => Value::from(row.try_get::<u64, _>(index)?),
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => {
            Value::from(row.try_get::<i64, _>(index)?)
        }
        "FLOAT" => Value::from(f64::from(row.try_get::<f32, _>(index)?)),
        "DOUBLE" => Value::from(row.try_get::<f64, _>(index)?),
        // Temporal values come packed in the binary protocol
        "DATETIME" | "TIMESTAMP" => {
            Value::from(row.try_get::<NaiveDateTime, _>(index)?.to_string())
        }
        "DATE" => Value::from(row.try_get::<NaiveDate, _>(index)?.to_string()),
        "TIME" => Value::from(row.try_get::<NaiveTime, _>(index)?.to_string()),
        _ => match row.try_get::<String, _>(index) {
            Ok(text) => Value::from(text),
            // DECIMAL is sent as its decimal text but does not decode as String
            Err(_) => {
                let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
                Value::from(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::queries;

    fn options() -> MySqlConnectOptions {
        MySqlConnectOptions::new()
            .host("127.0.0.1")
            .username("root")
            .database("customers")
    }

    #[test]
    fn pool_is_created_lazily() {
        let executor = MySqlExecutor::new(options());
        assert!(!executor.is_active());
    }

    #[test]
    fn zero_pool_size_is_clamped() {
        let executor = MySqlExecutor::with_max_connections(options(), 0);
        assert_eq!(executor.max_connections, 1);
    }

    #[tokio::test]
    async fn arity_checked_before_connecting() {
        let executor = MySqlExecutor::new(options());
        let err = executor
            .execute(&queries::SELECT_CUSTOMER, &[])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Arity { expected: 1, actual: 0, .. }));
        assert!(!executor.is_active());
    }

    // Integration tests require a real database
    // Run with: DATABASE_URL=mysql://... cargo test -p custdesk-server -- --ignored

    fn live_executor() -> MySqlExecutor {
        live_executor_with(DEFAULT_MAX_CONNECTIONS)
    }

    fn live_executor_with(max_connections: u32) -> MySqlExecutor {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let options: MySqlConnectOptions = url.parse().expect("invalid DATABASE_URL");
        MySqlExecutor::with_max_connections(options, max_connections)
    }

    async fn remove(executor: &MySqlExecutor, id: &str) {
        executor
            .execute(&queries::DELETE_CUSTOMER, &[Param::from(id)])
            .await
            .expect("cleanup failed");
    }

    async fn fetch(executor: &MySqlExecutor, id: &str) -> Vec<Row> {
        executor
            .execute(&queries::SELECT_CUSTOMER, &[Param::from(id)])
            .await
            .expect("select failed")
            .into_rows()
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn first_statement_activates_pool() {
        let executor = live_executor();
        let rows = executor
            .execute(&queries::COUNT_CUSTOMERS, &[])
            .await
            .expect("count failed")
            .into_rows();

        assert!(executor.is_active());
        assert_eq!(rows.len(), 1);
        assert!(rows[0]["customer_count"].is_i64());
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_statements_share_pool() {
        let executor = std::sync::Arc::new(live_executor());

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let executor = executor.clone();
                tokio::spawn(async move {
                    executor
                        .execute(&queries::COUNT_CUSTOMERS, &[])
                        .await
                        .expect("concurrent query failed")
                })
            })
            .collect();

        for handle in handles {
            let outcome = handle.await.expect("task panicked");
            assert_eq!(outcome.into_rows().len(), 1);
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_is_committed_and_read_back_in_column_order() {
        let executor = live_executor();
        remove(&executor, "pool-insert").await;

        executor
            .execute(
                &queries::INSERT_CUSTOMER,
                &[
                    Param::from("pool-insert"),
                    Param::from("Alice"),
                    Param::from(30),
                    Param::from("F"),
                ],
            )
            .await
            .expect("insert failed");

        let rows = fetch(&executor, "pool-insert").await;
        assert_eq!(rows.len(), 1);
        let columns: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(columns, ["customer_id", "customer_name", "age", "gender"]);
        assert_eq!(rows[0]["customer_name"], "Alice");
        assert!(rows[0]["age"].is_i64());
        assert_eq!(rows[0]["age"], 30);

        remove(&executor, "pool-insert").await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn failed_write_returns_its_connection() {
        // A single connection: a leaked one would starve the next statement.
        let executor = live_executor_with(1);
        remove(&executor, "pool-duplicate").await;

        let params = [
            Param::from("pool-duplicate"),
            Param::from("Bob"),
            Param::from(41),
            Param::from("M"),
        ];
        executor
            .execute(&queries::INSERT_CUSTOMER, &params)
            .await
            .expect("first insert failed");

        let err = executor
            .execute(&queries::INSERT_CUSTOMER, &params)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Sqlx(_)), "unexpected error: {err:?}");

        let rows = fetch(&executor, "pool-duplicate").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["customer_name"], "Bob");

        remove(&executor, "pool-duplicate").await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn update_is_visible_to_next_read() {
        let executor = live_executor();
        remove(&executor, "pool-update").await;

        executor
            .execute(
                &queries::INSERT_CUSTOMER,
                &[
                    Param::from("pool-update"),
                    Param::from("Carol"),
                    Param::from(25),
                    Param::from("F"),
                ],
            )
            .await
            .expect("insert failed");
        executor
            .execute(
                &queries::UPDATE_CUSTOMER,
                &[
                    Param::from("Caroline"),
                    Param::from(26),
                    Param::from("F"),
                    Param::from("pool-update"),
                ],
            )
            .await
            .expect("update failed");

        let rows = fetch(&executor, "pool-update").await;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["customer_name"], "Caroline");
        assert_eq!(rows[0]["age"], 26);

        remove(&executor, "pool-update").await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn column_types_decode_to_json() {
        const DROP: Statement =
            Statement::write("scratch.drop", "DROP TABLE IF EXISTS custdesk_decode_types");
        const CREATE: Statement = Statement::write(
            "scratch.create",
            r#"
            CREATE TABLE custdesk_decode_types (
                flag BOOLEAN, small TINYINT, big BIGINT UNSIGNED, ratio FLOAT,
                score DOUBLE, price DECIMAL(6, 2), label VARCHAR(16), missing INT NULL,
                stamp DATETIME, day DATE, clock TIME
            )
            "#,
        );
        const INSERT: Statement = Statement::write(
            "scratch.insert",
            r#"
            INSERT INTO custdesk_decode_types VALUES
                (TRUE, -3, 4000000000, 1.5, 2.25, 12.50, 'x', NULL,
                 '2024-01-02 03:04:05', '2024-01-02', '03:04:05')
            "#,
        );
        const SELECT: Statement =
            Statement::read("scratch.select", "SELECT * FROM custdesk_decode_types");

        let executor = live_executor();
        executor.execute(&DROP, &[]).await.expect("drop failed");
        executor.execute(&CREATE, &[]).await.expect("create failed");
        executor.execute(&INSERT, &[]).await.expect("insert failed");

        let rows = executor.execute(&SELECT, &[]).await.expect("select failed").into_rows();
        executor.execute(&DROP, &[]).await.expect("drop failed");

        let row = &rows[0];
        assert_eq!(row["flag"], true);
        assert_eq!(row["small"], -3);
        assert_eq!(row["big"], 4_000_000_000u64);
        assert_eq!(row["ratio"], 1.5);
        assert_eq!(row["score"], 2.25);
        assert_eq!(row["price"], "12.50");
        assert_eq!(row["label"], "x");
        assert!(row["missing"].is_null());
        assert_eq!(row["stamp"], "2024-01-02 03:04:05");
        assert_eq!(row["day"], "2024-01-02");
        assert_eq!(row["clock"], "03:04:05");
    }
}
