//! Configuration resolution for Quill.
//!
//! Implements hierarchical config resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/quill/settings.json)
//! 3. Project config (.quill/settings.json)
//! 4. Environment variables (highest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Complete Quill configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub feature_flags: std::collections::HashMap<String, bool>,
}

/// API server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub api_prefix: String,
    pub log_level: String,
    pub database_path: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            api_prefix: "/api".to_string(),
            log_level: "info".to_string(),
            database_path: None,
        }
    }
}

/// Credential issuance configuration.
///
/// The TTLs gate the account lifecycle flows: the register token is a
/// self-validating signed token with a 24-hour expiry, while the email
/// verification code and password reset token are store-backed artifacts
/// that lapse after 3 minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret for token signing. Usually supplied via `QUILL_TOKEN_SECRET`.
    pub token_secret: Option<String>,
    /// Register token expiry (seconds). Default: 24 hours.
    pub register_token_ttl_secs: u64,
    /// Email verification code TTL (seconds). Default: 3 minutes.
    pub verify_code_ttl_secs: u64,
    /// Password reset token TTL (seconds). Default: 3 minutes.
    pub reset_token_ttl_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: None,
            register_token_ttl_secs: 24 * 60 * 60,
            verify_code_ttl_secs: 3 * 60,
            reset_token_ttl_secs: 3 * 60,
        }
    }
}

/// Configuration source priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    Default = 0,
    Global = 1,
    Project = 2,
    Environment = 3,
}

/// Load configuration with hierarchical resolution.
pub fn load_config(project_dir: Option<&Path>) -> Result<Config> {
    let mut config = Config::default();

    // Load global config
    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            let global = load_config_file(&global_path)?;
            merge_config(&mut config, global);
        }
    }

    // Load project config
    if let Some(dir) = project_dir {
        let project_path = dir.join(".quill").join("settings.json");
        if project_path.exists() {
            let project = load_config_file(&project_path)?;
            merge_config(&mut config, project);
        }
    }

    // Apply environment overrides
    apply_env_overrides(&mut config);

    Ok(config)
}

/// Get the global config file path.
pub fn global_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".quill").join("settings.json"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/quill/settings.json"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("quill").join("settings.json"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

fn load_config_file(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Config(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut Config, overlay: Config) {
    // Merge api config
    if overlay.api.database_path.is_some() {
        base.api.database_path = overlay.api.database_path;
    }
    base.api.port = overlay.api.port;
    base.api.api_prefix = overlay.api.api_prefix;
    base.api.log_level = overlay.api.log_level;

    // Merge auth config
    if overlay.auth.token_secret.is_some() {
        base.auth.token_secret = overlay.auth.token_secret;
    }
    base.auth.register_token_ttl_secs = overlay.auth.register_token_ttl_secs;
    base.auth.verify_code_ttl_secs = overlay.auth.verify_code_ttl_secs;
    base.auth.reset_token_ttl_secs = overlay.auth.reset_token_ttl_secs;

    // Merge feature flags
    base.feature_flags.extend(overlay.feature_flags);
}

fn apply_env_overrides(config: &mut Config) {
    if let Ok(val) = std::env::var("QUILL_PORT") {
        if let Ok(n) = val.parse() {
            config.api.port = n;
        }
    }
    if let Ok(val) = std::env::var("QUILL_LOG_LEVEL") {
        config.api.log_level = val;
    }
    if let Ok(val) = std::env::var("QUILL_TOKEN_SECRET") {
        config.auth.token_secret = Some(val);
    }
}
