//! Statement dispatch trait and the values flowing through it

use async_trait::async_trait;

/// A row returned by a read: column name to value, in column order.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Whether a statement returns rows or changes data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    /// Returns rows, never commits
    Read,
    /// Returns nothing, committed before the call returns
    Write,
}

/// A named, parameterized SQL statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statement {
    pub name: &'static str,
    pub kind: StatementKind,
    pub sql: &'static str,
}

impl Statement {
    pub const fn read(name: &'static str, sql: &'static str) -> Self {
        Self {
            name,
            kind: StatementKind::Read,
            sql,
        }
    }

    pub const fn write(name: &'static str, sql: &'static str) -> Self {
        Self {
            name,
            kind: StatementKind::Write,
            sql,
        }
    }

    /// Number of `?` placeholders in the SQL text.
    pub fn placeholders(&self) -> usize {
        self.sql.matches('?').count()
    }
}

/// A scalar value bound to a placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    Text(String),
    Int(i64),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i32> for Param {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Result of executing a statement
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Rows(Vec<Row>),
    Done,
}

impl Outcome {
    /// Rows of a read; a write yields none.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Self::Rows(rows) => rows,
            Self::Done => Vec::new(),
        }
    }
}

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("constraint violation: {0}")]
    Constraint(String),

    #[error("{statement} expects {expected} parameters, got {actual}")]
    Arity {
        statement: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported statement: {0}")]
    Unsupported(&'static str),

    #[error("row decode error: {0}")]
    Decode(String),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },
}

impl DbError {
    pub(crate) fn check_arity(statement: &Statement, params: &[Param]) -> Result<(), Self> {
        let expected = statement.placeholders();
        if expected != params.len() {
            return Err(Self::Arity {
                statement: statement.name,
                expected,
                actual: params.len(),
            });
        }
        Ok(())
    }
}

/// Single dispatch point for parameterized statements.
///
/// Implementations acquire a connection per call and release it before
/// returning, whether the statement succeeded or not. Errors propagate
/// unmodified; nothing is retried.
#[async_trait]
pub trait Executor: Send + Sync {
    /// Run `statement` with `params` bound in order.
    ///
    /// Reads return [`Outcome::Rows`]; writes are committed and return
    /// [`Outcome::Done`].
    async fn execute(&self, statement: &Statement, params: &[Param]) -> Result<Outcome, DbError>;

    /// Establish the underlying connection ahead of the first statement.
    async fn warm_up(&self) -> Result<(), DbError> {
        Ok(())
    }
}
