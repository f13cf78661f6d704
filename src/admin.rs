use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::backend::DbClient;
use crate::client::MemSqlClient;
use crate::config::ServerConfig;
use crate::edition::{Edition, EditionState};
use crate::error::{MemSqlError, Result};
use crate::names::{format_db_name, format_user_name};
use crate::types::DatabaseCredentials;

/// Admin API for tenant database and user lifecycle.
#[async_trait]
pub trait AdminApi {
    async fn database_exists(&self, name: &str) -> Result<bool>;
    async fn user_exists(&self, name: &str) -> Result<bool>;
    async fn create_database(&self, name: &str) -> Result<String>;
    async fn delete_database(&self, name: &str) -> Result<()>;
    async fn create_user(
        &self,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<DatabaseCredentials>;
    async fn delete_user(&self, database: &str, username: &str) -> Result<()>;
}

/// Creates and drops tenant databases and users on a MemSQL cluster.
///
/// Tenant names are mapped to physical names through [`crate::names`]. The
/// engine edition is remembered for the lifetime of the service and shared by
/// all of its clones: once a database-scoped grant has failed, every later
/// user is granted on `*.*` instead.
pub struct AdminService<C = MemSqlClient> {
    client: Arc<C>,
    edition: Arc<EditionState>,
}

impl<C> Clone for AdminService<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            edition: Arc::clone(&self.edition),
        }
    }
}

impl AdminService<MemSqlClient> {
    /// Connect using a `ServerConfig`, starting from its configured edition.
    pub async fn from_config(config: &ServerConfig) -> Result<Self> {
        let client = MemSqlClient::from_config(config).await?;
        Ok(Self::with_edition(Arc::new(client), config.edition))
    }

    pub async fn from_env() -> Result<Self> {
        let config = ServerConfig::from_env()?;
        Self::from_config(&config).await
    }
}

impl<C: DbClient> AdminService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self::with_edition(client, Edition::default())
    }

    pub fn with_edition(client: Arc<C>, edition: Edition) -> Self {
        Self {
            client,
            edition: Arc::new(EditionState::new(edition)),
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Edition currently assumed for user grants.
    pub fn edition(&self) -> Edition {
        self.edition.current()
    }

    async fn database_exists_impl(&self, name: &str) -> Result<bool> {
        let db_name = format_db_name(name);
        let catalogs = self
            .client
            .list_catalogs()
            .await
            .map_err(|e| service_error("database_exists", e))?;
        Ok(catalogs.iter().any(|c| *c == db_name))
    }

    async fn user_exists_impl(&self, name: &str) -> Result<bool> {
        let user = format_user_name(name);
        let grantees = self
            .client
            .fetch_column(&user_privileges_sql(&user))
            .await
            .map_err(|e| service_error("user_exists", e))?;

        let quoted = format!("'{user}'");
        Ok(grantees.iter().any(|g| grantee_user(g) == quoted))
    }

    async fn create_database_impl(&self, name: &str) -> Result<String> {
        let sql = format!("CREATE DATABASE IF NOT EXISTS {}", format_db_name(name));
        info!(statement = %sql, "creating database");
        self.client
            .execute(&sql)
            .await
            .map_err(|e| service_error("create_database", e))?;
        Ok(name.to_string())
    }

    async fn delete_database_impl(&self, name: &str) -> Result<()> {
        let sql = format!("DROP DATABASE {}", format_db_name(name));
        self.client
            .execute(&sql)
            .await
            .map_err(|e| service_error("delete_database", e))
    }

    async fn create_user_impl(
        &self,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<DatabaseCredentials> {
        let db_name = format_db_name(database);
        let user = format_user_name(username);
        let credentials = DatabaseCredentials::new(
            db_name.as_str(),
            user.as_str(),
            password,
            self.client.host(),
            self.client.port(),
        );

        let granted = match self.edition.current() {
            Edition::Enterprise => {
                info!(database = %db_name, user = %user, "granting database-scoped access");
                let scoped = grant_sql(&format!("{db_name}.*"), &user, password);
                match self.client.execute(&scoped).await {
                    Ok(()) => Ok(()),
                    Err(e) => {
                        if self.edition.mark_community() {
                            error!(
                                error = %e,
                                "server is not running enterprise edition; switching to community edition"
                            );
                            error!("users created from now on can access all databases");
                        }
                        self.client.execute(&grant_sql("*.*", &user, password)).await
                    }
                }
            }
            Edition::Community => {
                info!(user = %user, "community edition: granting access to all databases");
                self.client.execute(&grant_sql("*.*", &user, password)).await
            }
        };

        match granted {
            Ok(()) => Ok(credentials),
            Err(e) => {
                self.drop_user_best_effort(&user).await;
                Err(service_error("create_user", e))
            }
        }
    }

    async fn delete_user_impl(&self, _database: &str, username: &str) -> Result<()> {
        self.client
            .execute(&drop_user_sql(&format_user_name(username)))
            .await
            .map_err(|e| service_error("delete_user", e))
    }

    /// Drop an already formatted user after a failed grant. Failures are
    /// logged and discarded so they never replace the grant error.
    async fn drop_user_best_effort(&self, user: &str) {
        if let Err(e) = self.client.execute(&drop_user_sql(user)).await {
            warn!(user, error = %e, "cleanup of partially created user failed");
        }
    }

    // Inherent methods matching AdminApi for direct calls.
    pub async fn database_exists(&self, name: &str) -> Result<bool> {
        self.database_exists_impl(name).await
    }

    pub async fn user_exists(&self, name: &str) -> Result<bool> {
        self.user_exists_impl(name).await
    }

    pub async fn create_database(&self, name: &str) -> Result<String> {
        self.create_database_impl(name).await
    }

    pub async fn delete_database(&self, name: &str) -> Result<()> {
        self.delete_database_impl(name).await
    }

    pub async fn create_user(
        &self,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<DatabaseCredentials> {
        self.create_user_impl(database, username, password).await
    }

    pub async fn delete_user(&self, database: &str, username: &str) -> Result<()> {
        self.delete_user_impl(database, username).await
    }
}

#[async_trait]
impl<C: DbClient> AdminApi for AdminService<C> {
    async fn database_exists(&self, name: &str) -> Result<bool> {
        self.database_exists_impl(name).await
    }

    async fn user_exists(&self, name: &str) -> Result<bool> {
        self.user_exists_impl(name).await
    }

    async fn create_database(&self, name: &str) -> Result<String> {
        self.create_database_impl(name).await
    }

    async fn delete_database(&self, name: &str) -> Result<()> {
        self.delete_database_impl(name).await
    }

    async fn create_user(
        &self,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<DatabaseCredentials> {
        self.create_user_impl(database, username, password).await
    }

    async fn delete_user(&self, database: &str, username: &str) -> Result<()> {
        self.delete_user_impl(database, username).await
    }
}

/// `GRANT all ON <scope> TO ? IDENTIFIED BY ?` with both markers filled in
/// as string literals. Account names cannot be server-side parameters, so the
/// statement goes out as plain text.
fn grant_sql(scope: &str, user: &str, password: &str) -> String {
    format!(
        "GRANT all ON {scope} TO {} IDENTIFIED BY {}",
        quote_literal(user),
        quote_literal(password)
    )
}

/// Single-quoted MySQL string literal with quotes, backslashes and control
/// characters escaped.
fn quote_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x1a' => out.push_str("\\Z"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn drop_user_sql(user: &str) -> String {
    format!("DROP USER {user}")
}

fn user_privileges_sql(user: &str) -> String {
    format!(
        "SELECT DISTINCT GRANTEE FROM information_schema.USER_PRIVILEGES \
         WHERE GRANTEE LIKE '\\'{user}\\'%'"
    )
}

/// User part of a `'user'@'host'` grantee.
fn grantee_user(grantee: &str) -> &str {
    grantee.split('@').next().unwrap_or(grantee)
}

fn service_error(operation: &'static str, err: MemSqlError) -> MemSqlError {
    warn!(operation, error = %err, "admin operation failed");
    let message = match err {
        MemSqlError::Sql(msg) | MemSqlError::Connection(msg) | MemSqlError::Service(msg) => msg,
        other => other.to_string(),
    };
    MemSqlError::Service(message)
}
