use crate::error::Result;

/// Connection collaborator used by the admin service.
///
/// Implementations own connection lifetime and pooling; every call is expected
/// to run on a ready connection handed out for that call.
#[async_trait::async_trait]
pub trait DbClient: Send + Sync {
    /// Execute a SQL statement that does not return rows.
    async fn execute(&self, sql: &str) -> Result<()>;

    /// Fetch the first column of every row as a string.
    async fn fetch_column(&self, sql: &str) -> Result<Vec<String>>;

    /// Names of every catalog (database) visible on the connection.
    async fn list_catalogs(&self) -> Result<Vec<String>>;

    fn host(&self) -> &str;

    fn port(&self) -> u16;
}
