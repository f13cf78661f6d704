use crate::admin::AdminService;
use crate::config::ServerConfig;
use crate::edition::Edition;
use crate::error::{MemSqlError, Result};
use crate::types::DatabaseCredentials;

/// Blocking wrapper around [`AdminService`].
///
/// This type is only available when the `sync` feature is enabled. It runs all
/// operations on an internal Tokio runtime using `block_on`.
///
/// Note: do not call these blocking APIs from within an existing Tokio runtime,
/// as that can lead to deadlocks. In async contexts, use [`AdminService`]
/// directly instead.
pub struct SyncAdminService {
    rt: tokio::runtime::Runtime,
    service: AdminService,
}

impl SyncAdminService {
    /// Build a synchronous service from a [`ServerConfig`].
    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        let rt = new_runtime()?;
        let service = rt.block_on(AdminService::from_config(config))?;
        Ok(Self { rt, service })
    }

    /// Build a synchronous service from environment variables.
    pub fn from_env() -> Result<Self> {
        let rt = new_runtime()?;
        let service = rt.block_on(AdminService::from_env())?;
        Ok(Self { rt, service })
    }

    /// The async service driven by this wrapper.
    pub fn service(&self) -> &AdminService {
        &self.service
    }

    pub fn edition(&self) -> Edition {
        self.service.edition()
    }

    pub fn database_exists(&self, name: &str) -> Result<bool> {
        self.rt.block_on(self.service.database_exists(name))
    }

    pub fn user_exists(&self, name: &str) -> Result<bool> {
        self.rt.block_on(self.service.user_exists(name))
    }

    pub fn create_database(&self, name: &str) -> Result<String> {
        self.rt.block_on(self.service.create_database(name))
    }

    pub fn delete_database(&self, name: &str) -> Result<()> {
        self.rt.block_on(self.service.delete_database(name))
    }

    pub fn create_user(
        &self,
        database: &str,
        username: &str,
        password: &str,
    ) -> Result<DatabaseCredentials> {
        self.rt.block_on(self.service.create_user(database, username, password))
    }

    pub fn delete_user(&self, database: &str, username: &str) -> Result<()> {
        self.rt.block_on(self.service.delete_user(database, username))
    }
}

fn new_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Runtime::new().map_err(|e| MemSqlError::Other(anyhow::Error::new(e)))
}
