use std::time::{SystemTime, UNIX_EPOCH};

use memsql_broker_admin::ServerConfig;

/// Load ServerConfig from environment when `MEMSQL_INTEGRATION=1` is set.
/// Returns None and prints a SKIP message otherwise.
pub fn load_config_for_integration() -> Option<ServerConfig> {
    init_tracing();
    if std::env::var("MEMSQL_INTEGRATION").ok().as_deref() != Some("1") {
        eprintln!("SKIP: set MEMSQL_INTEGRATION=1 and MEMSQL_* env vars to run integration tests");
        return None;
    }
    ServerConfig::from_env().ok()
}

/// Millisecond timestamp string used to make tenant names unique.
pub fn ts_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    ts.to_string()
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
