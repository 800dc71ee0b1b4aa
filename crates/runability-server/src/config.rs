//! Configuration loading and resolution.
//!
//! Every setting resolves as: explicit CLI flag, then environment
//! variable, then built-in default.

use std::path::PathBuf;
use std::time::Duration;

use runability::DEFAULT_LOOKUP_BASE;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// SQLite path that keeps the library in memory only.
pub const IN_MEMORY_DB: &str = ":memory:";

/// Fully resolved server settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (host:port).
    pub addr: String,
    /// Base URL of the song-information site.
    pub lookup_base: String,
    /// Upper bound on a single upstream fetch.
    pub timeout_ms: u64,
    /// Song library database path.
    pub db_path: String,
}

/// Values supplied on the command line, if any.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub addr: Option<String>,
    pub lookup_base: Option<String>,
    pub timeout_ms: Option<u64>,
    pub db_path: Option<String>,
}

impl ServerConfig {
    pub fn resolve(overrides: ConfigOverrides) -> Self {
        Self {
            addr: resolve_addr(overrides.addr.as_deref()),
            lookup_base: resolve_lookup_base(overrides.lookup_base.as_deref()),
            timeout_ms: resolve_timeout_ms(overrides.timeout_ms),
            db_path: resolve_db_path(overrides.db_path.as_deref()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Resolve the listen address.
pub fn resolve_addr(explicit: Option<&str>) -> String {
    resolve_string(explicit, "RUNABILITY_ADDR", DEFAULT_ADDR)
}

/// Resolve the lookup base URL.
pub fn resolve_lookup_base(explicit: Option<&str>) -> String {
    resolve_string(explicit, "RUNABILITY_LOOKUP_BASE", DEFAULT_LOOKUP_BASE)
}

/// Resolve the upstream fetch timeout. Unparseable or zero values from the
/// environment fall back to the default.
pub fn resolve_timeout_ms(explicit: Option<u64>) -> u64 {
    if let Some(ms) = explicit.filter(|ms| *ms > 0) {
        return ms;
    }

    if let Some(raw) = env_value("RUNABILITY_TIMEOUT_MS") {
        match raw.trim().parse::<u64>() {
            Ok(ms) if ms > 0 => return ms,
            _ => tracing::warn!("Ignoring invalid RUNABILITY_TIMEOUT_MS={raw:?}"),
        }
    }

    DEFAULT_TIMEOUT_MS
}

/// Resolve the song library database path.
pub fn resolve_db_path(explicit: Option<&str>) -> String {
    if let Some(path) = explicit {
        return path.to_string();
    }

    env_value("RUNABILITY_DB").unwrap_or_else(resolve_default_db_path)
}

fn resolve_default_db_path() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".runability")
        .join("songs.db")
        .display()
        .to_string()
}

fn resolve_string(explicit: Option<&str>, env_key: &str, default: &str) -> String {
    if let Some(value) = explicit {
        return value.to_string();
    }

    env_value(env_key).unwrap_or_else(|| default.to_string())
}

/// Read an environment variable, treating blank values as unset.
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
