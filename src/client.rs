use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlRow};
use sqlx::{Executor, MySqlPool, Row};
use tracing::debug;

use crate::backend::DbClient;
use crate::config::ServerConfig;
use crate::error::{MemSqlError, Result};

/// Builder for configuring and constructing a [`MemSqlClient`].
pub struct MemSqlClientBuilder {
    host: String,
    port: u16,
    user: String,
    password: String,
    database: Option<String>,
    max_connections: u32,
}

/// Pooled client that talks to MemSQL over the MySQL protocol.
#[derive(Clone)]
pub struct MemSqlClient {
    pool: MySqlPool,
    host: String,
    port: u16,
}

impl MemSqlClient {
    /// Build a client from a `ServerConfig`.
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        Self::connect_internal(
            &config.host,
            config.port,
            &config.user,
            &config.password,
            config.database.as_deref(),
            config.max_connections,
        )
        .await
    }

    pub async fn from_env() -> Result<Self> {
        let config = ServerConfig::from_env()?;
        Self::from_config(&config).await
    }

    pub fn builder() -> MemSqlClientBuilder {
        MemSqlClientBuilder::new()
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    async fn connect_internal(
        host: &str,
        port: u16,
        user: &str,
        password: &str,
        database: Option<&str>,
        max_connections: u32,
    ) -> Result<Self> {
        let options = connect_options(host, port, user, password, database);
        let pool = MySqlPoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| MemSqlError::Connection(e.to_string()))?;

        debug!(host, port, max_connections, "connected to memsql");

        Ok(Self {
            pool,
            host: host.to_string(),
            port,
        })
    }
}

// Statements are sent as plain `&str` so sqlx uses the text protocol rather
// than a server-side prepare; admin DDL and GRANT are not preparable everywhere.
#[async_trait]
impl DbClient for MemSqlClient {
    async fn execute(&self, sql: &str) -> Result<()> {
        self.pool.execute(sql).await?;
        Ok(())
    }

    async fn fetch_column(&self, sql: &str) -> Result<Vec<String>> {
        let rows = self.pool.fetch_all(sql).await?;
        rows.iter().map(first_column).collect()
    }

    async fn list_catalogs(&self) -> Result<Vec<String>> {
        self.fetch_column("SHOW DATABASES").await
    }

    fn host(&self) -> &str {
        &self.host
    }

    fn port(&self) -> u16 {
        self.port
    }
}

// information_schema columns can be reported with a binary collation.
fn first_column(row: &MySqlRow) -> Result<String> {
    row.try_get::<String, _>(0)
        .or_else(|_| {
            row.try_get::<Vec<u8>, _>(0)
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        })
        .map_err(Into::into)
}

// Options are set field by field so credentials never need URL escaping.
fn connect_options(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
    database: Option<&str>,
) -> MySqlConnectOptions {
    let options = MySqlConnectOptions::new()
        .host(host)
        .port(port)
        .username(user)
        .password(password);
    match database {
        Some(database) => options.database(database),
        None => options,
    }
}

impl MemSqlClientBuilder {
    fn new() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: String::new(),
            database: None,
            max_connections: 5,
        }
    }

    /// Populate the builder from `MEMSQL_*` environment variables using
    /// [`ServerConfig::from_env`]. Individual fields can still be overridden
    /// afterwards.
    pub fn from_env() -> Result<Self> {
        let config = ServerConfig::from_env()?;
        Ok(Self {
            host: config.host,
            port: config.port,
            user: config.user,
            password: config.password,
            database: config.database,
            max_connections: config.max_connections,
        })
    }

    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = user.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    /// Build a [`MemSqlClient`] using the current builder configuration.
    pub async fn build(self) -> Result<MemSqlClient> {
        MemSqlClient::connect_internal(
            &self.host,
            self.port,
            &self.user,
            &self.password,
            self.database.as_deref(),
            self.max_connections,
        )
        .await
    }
}
