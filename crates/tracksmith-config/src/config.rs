//! Configuration types and loading for the tracksmith system.
//!
//! The main entry point is [`TracksmithConfig`], which represents the
//! contents of `tracksmith.yaml`. Configuration is loaded with
//! [`load_config`] and saved with [`save_config`]; a missing or empty file
//! yields the defaults.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// No `tracksmith.yaml` was found walking up the directory tree.
    #[error("no tracksmith.yaml found (pass --config or create one)")]
    ConfigNotFound,
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Config sections
// ---------------------------------------------------------------------------

/// Tracker connection section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// API endpoint base URL.
    #[serde(default = "default_api_url", rename = "api-url")]
    pub api_url: String,

    /// Repository owner (organization or user).
    #[serde(default)]
    pub owner: String,

    /// Repository name.
    #[serde(default)]
    pub repo: String,

    /// Name of the environment variable holding the access token.
    #[serde(default = "default_token_env", rename = "token-env")]
    pub token_env: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            owner: String::new(),
            repo: String::new(),
            token_env: default_token_env(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

/// Generation run section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Fixed pause between tracker calls, in milliseconds. Rate-limit
    /// courtesy only; not a correctness requirement.
    #[serde(default = "default_pause_ms", rename = "pause-ms")]
    pub pause_ms: u64,

    /// Path of the audit record, relative to the config file's directory.
    #[serde(default = "default_audit_file", rename = "audit-file")]
    pub audit_file: String,

    /// Whether to create template labels missing from the tracker.
    #[serde(default = "default_true", rename = "ensure-labels")]
    pub ensure_labels: bool,

    /// Color for labels created by `ensure-labels`.
    #[serde(default = "default_label_color", rename = "label-color")]
    pub label_color: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            pause_ms: default_pause_ms(),
            audit_file: default_audit_file(),
            ensure_labels: true,
            label_color: default_label_color(),
        }
    }
}

fn default_pause_ms() -> u64 {
    1000
}

fn default_audit_file() -> String {
    ".tracksmith/generated.txt".to_string()
}

fn default_label_color() -> String {
    "ededed".to_string()
}

fn default_true() -> bool {
    true
}

/// The complete contents of `tracksmith.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracksmithConfig {
    /// Tracker connection settings.
    #[serde(default)]
    pub tracker: TrackerConfig,

    /// Generation run settings.
    #[serde(default)]
    pub run: RunConfig,
}

// ---------------------------------------------------------------------------
// Load / save
// ---------------------------------------------------------------------------

/// Load configuration from the given file path.
///
/// A missing or empty file yields [`TracksmithConfig::default`].
pub fn load_config(path: &Path) -> Result<TracksmithConfig> {
    if !path.exists() {
        return Ok(TracksmithConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(TracksmithConfig::default());
    }

    let config: TracksmithConfig = serde_yaml::from_str(&content)?;
    Ok(config)
}

/// Save configuration to the given file path, creating parent directories.
pub fn save_config(path: &Path, config: &TracksmithConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_file_missing() {
        let tmp = TempDir::new().unwrap();
        let cfg = load_config(&tmp.path().join("tracksmith.yaml")).unwrap();
        assert_eq!(cfg.tracker.api_url, "https://api.github.com");
        assert_eq!(cfg.tracker.token_env, "GITHUB_TOKEN");
        assert_eq!(cfg.run.pause_ms, 1000);
        assert!(cfg.run.ensure_labels);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tracksmith.yaml");
        std::fs::write(
            &path,
            "tracker:\n  owner: acme\n  repo: rocket\nrun:\n  pause-ms: 0\n",
        )
        .unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.tracker.owner, "acme");
        assert_eq!(cfg.tracker.repo, "rocket");
        assert_eq!(cfg.run.pause_ms, 0);
        assert_eq!(cfg.run.audit_file, ".tracksmith/generated.txt");
    }

    #[test]
    fn save_then_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/tracksmith.yaml");

        let mut cfg = TracksmithConfig::default();
        cfg.tracker.owner = "acme".into();
        cfg.run.ensure_labels = false;

        save_config(&path, &cfg).unwrap();
        let back = load_config(&path).unwrap();
        assert_eq!(back, cfg);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tracksmith.yaml");
        std::fs::write(&path, "tracker: [not a map").unwrap();
        assert!(matches!(
            load_config(&path).unwrap_err(),
            ConfigError::ParseError(_)
        ));
    }
}
