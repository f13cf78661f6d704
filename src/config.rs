use std::env;

use crate::edition::Edition;
use crate::error::{MemSqlError, Result};

/// Connection configuration for the MemSQL admin endpoint.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: Option<String>,
    pub max_connections: u32,
    pub edition: Edition,
}

impl ServerConfig {
    /// Build configuration from environment variables:
    /// `MEMSQL_HOST`, `MEMSQL_PORT` (default 3306), `MEMSQL_USER`,
    /// `MEMSQL_PASSWORD` (default empty), `MEMSQL_DATABASE` (optional),
    /// `MEMSQL_MAX_CONNECTIONS` (default 5), `MEMSQL_EDITION` (default `enterprise`).
    pub fn from_env() -> Result<Self> {
        let host = require_env("MEMSQL_HOST")?;
        let port = parse_env("MEMSQL_PORT").unwrap_or(3306);
        let user = require_env("MEMSQL_USER")?;
        let password = env::var("MEMSQL_PASSWORD").unwrap_or_default();
        let database = env::var("MEMSQL_DATABASE").ok().filter(|v| !v.is_empty());
        let max_connections = parse_env("MEMSQL_MAX_CONNECTIONS").unwrap_or(5);
        let edition = match env::var("MEMSQL_EDITION") {
            Ok(v) => v.parse()?,
            Err(_) => Edition::default(),
        };

        Ok(Self {
            host,
            port,
            user,
            password,
            database,
            max_connections,
            edition,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| MemSqlError::Config(format!("missing env: {key}")))
}

fn parse_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
