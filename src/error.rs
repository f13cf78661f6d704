use thiserror::Error;

/// Common result type used across the crate.
pub type Result<T> = std::result::Result<T, MemSqlError>;

/// Unified error enum surfaced by all public APIs.
///
/// Admin operations only ever return [`MemSqlError::Service`]; the other
/// variants come from client construction, configuration and the raw
/// [`DbClient`](crate::backend::DbClient) calls underneath.
#[derive(Error, Debug)]
pub enum MemSqlError {
    #[error("connection error: {0}")]
    Connection(String),
    #[error("sql error: {0}")]
    Sql(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("service error: {0}")]
    Service(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for MemSqlError {
    fn from(value: sqlx::Error) -> Self {
        MemSqlError::Sql(value.to_string())
    }
}
