//! Database and user administration for a MemSQL service broker.

pub mod admin;
pub mod backend;
pub mod client;
pub mod config;
pub mod edition;
pub mod error;
pub mod names;
#[cfg(feature = "sync")]
pub mod sync;
pub mod types;

pub use crate::admin::{AdminApi, AdminService};
pub use crate::backend::DbClient;
pub use crate::client::{MemSqlClient, MemSqlClientBuilder};
pub use crate::config::ServerConfig;
pub use crate::edition::{Edition, EditionState};
pub use crate::error::{MemSqlError, Result};
pub use crate::names::{DatabaseNames, UserNames, format_db_name, format_user_name, shorten_name};
pub use crate::types::DatabaseCredentials;

#[cfg(feature = "sync")]
pub use crate::sync::SyncAdminService;
