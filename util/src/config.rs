//! Global application configuration manager.
//!
//! `AppConfig` is a lazily initialized, globally accessible singleton containing
//! runtime configuration values loaded from environment variables (and `.env`).
//! Free accessor functions (`config::port()`, `config::rotation_seconds()`, ...)
//! read through the singleton; per-field setters exist so tests can override values.

use std::env;
use std::str::FromStr;
use std::sync::{OnceLock, RwLock, RwLockReadGuard};

/// Complete application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub project_name: String,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
    pub database_path: String,
    pub host: String,
    pub port: u16,
    pub rotation_seconds: u64,
    pub code_prefix: String,
    pub schedule_overlap_policy: String,
    pub loopback_fingerprint: String,
    pub ws_ping_seconds: u64,
}

static CONFIG_INSTANCE: OnceLock<RwLock<AppConfig>> = OnceLock::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parses `key` into `T`, falling back to `default` when unset or malformed.
fn parsed_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            env: "development".into(),
            project_name: "zero-proxy".into(),
            log_level: "api=info,services=info".into(),
            log_file: "api.log".into(),
            log_to_stdout: false,
            database_path: "data/attendance.db".into(),
            host: "0.0.0.0".into(),
            port: 3000,
            rotation_seconds: 10,
            code_prefix: "ZP".into(),
            schedule_overlap_policy: "first".into(),
            loopback_fingerprint: "00-11-22-33-44-55".into(),
            ws_ping_seconds: 30,
        }
    }
}

impl AppConfig {
    /// Loads the configuration from `.env` and environment variables.
    ///
    /// Every key has a default, so this never fails; malformed numbers
    /// silently fall back to their defaults.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let d = AppConfig::default();

        Self {
            env: var_or("APP_ENV", &d.env),
            project_name: var_or("PROJECT_NAME", &d.project_name),
            log_level: var_or("LOG_LEVEL", &d.log_level),
            log_file: var_or("LOG_FILE", &d.log_file),
            log_to_stdout: var_or("LOG_TO_STDOUT", "false") == "true",
            database_path: var_or("DATABASE_PATH", &d.database_path),
            host: var_or("HOST", &d.host),
            port: parsed_or("PORT", d.port),
            rotation_seconds: parsed_or("ROTATION_SECONDS", d.rotation_seconds).max(1),
            code_prefix: var_or("CODE_PREFIX", &d.code_prefix),
            schedule_overlap_policy: var_or("SCHEDULE_OVERLAP_POLICY", &d.schedule_overlap_policy),
            loopback_fingerprint: var_or("LOOPBACK_FINGERPRINT", &d.loopback_fingerprint),
            ws_ping_seconds: parsed_or("WS_PING_SECONDS", d.ws_ping_seconds).max(1),
        }
    }

    fn lock() -> &'static RwLock<AppConfig> {
        CONFIG_INSTANCE.get_or_init(|| RwLock::new(AppConfig::from_env()))
    }

    /// Returns a read guard on the global configuration.
    ///
    /// A poisoned lock is recovered rather than propagated; the config holds
    /// plain values, so a panicked writer cannot leave it half-updated.
    pub fn global() -> RwLockReadGuard<'static, AppConfig> {
        Self::lock()
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Reloads the configuration from the environment, clearing overrides.
    pub fn reset() {
        Self::set_field(|cfg| *cfg = AppConfig::from_env());
    }

    fn set_field<F>(setter: F)
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut guard = Self::lock()
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        setter(&mut guard);
    }

    // --- Per-field setters below ---

    pub fn set_env(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.env = value.into());
    }

    pub fn set_log_to_stdout(value: bool) {
        AppConfig::set_field(|cfg| cfg.log_to_stdout = value);
    }

    pub fn set_database_path(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.database_path = value.into());
    }

    pub fn set_port(value: u16) {
        AppConfig::set_field(|cfg| cfg.port = value);
    }

    pub fn set_rotation_seconds(value: u64) {
        AppConfig::set_field(|cfg| cfg.rotation_seconds = value.max(1));
    }

    pub fn set_code_prefix(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.code_prefix = value.into());
    }

    pub fn set_schedule_overlap_policy(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.schedule_overlap_policy = value.into());
    }

    pub fn set_loopback_fingerprint(value: impl Into<String>) {
        AppConfig::set_field(|cfg| cfg.loopback_fingerprint = value.into());
    }
}

pub fn env() -> String {
    AppConfig::global().env.clone()
}

pub fn project_name() -> String {
    AppConfig::global().project_name.clone()
}

pub fn log_level() -> String {
    AppConfig::global().log_level.clone()
}

pub fn log_file() -> String {
    AppConfig::global().log_file.clone()
}

pub fn log_to_stdout() -> bool {
    AppConfig::global().log_to_stdout
}

pub fn database_path() -> String {
    AppConfig::global().database_path.clone()
}

pub fn host() -> String {
    AppConfig::global().host.clone()
}

pub fn port() -> u16 {
    AppConfig::global().port
}

pub fn rotation_seconds() -> u64 {
    AppConfig::global().rotation_seconds
}

pub fn code_prefix() -> String {
    AppConfig::global().code_prefix.clone()
}

pub fn schedule_overlap_policy() -> String {
    AppConfig::global().schedule_overlap_policy.clone()
}

pub fn loopback_fingerprint() -> String {
    AppConfig::global().loopback_fingerprint.clone()
}

pub fn ws_ping_seconds() -> u64 {
    AppConfig::global().ws_ping_seconds
}
