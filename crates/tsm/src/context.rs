//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds the state every command handler needs:
//! the config file location, global output flags, and config loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use tracksmith_config::{TracksmithConfig, find_config_file, load_config};

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Explicit config file path from `--config` / `TRACKSMITH_CONFIG`.
    pub config_path: Option<PathBuf>,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

/// Configuration plus the directory relative paths resolve against.
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: TracksmithConfig,

    /// Directory of the config file when one was found, otherwise the
    /// current working directory.
    pub root: PathBuf,
}

impl LoadedConfig {
    /// Absolute location of the audit record.
    pub fn audit_path(&self) -> PathBuf {
        let configured = Path::new(&self.config.run.audit_file);
        if configured.is_absolute() {
            configured.to_path_buf()
        } else {
            self.root.join(configured)
        }
    }
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    pub fn from_global_args(global: &GlobalArgs) -> Self {
        Self {
            config_path: global.config.clone(),
            json: global.json,
            verbose: global.verbose,
            quiet: global.quiet,
        }
    }

    /// Load configuration: the explicit `--config` path wins, otherwise the
    /// tree is walked upward from the current directory. No config file
    /// anywhere yields the defaults rooted at the current directory.
    pub fn load_config(&self) -> Result<LoadedConfig> {
        let cwd = std::env::current_dir().context("cannot determine current directory")?;

        let path = match &self.config_path {
            Some(explicit) => Some(explicit.clone()),
            None => find_config_file(&cwd),
        };

        match path {
            Some(path) => {
                tracing::debug!(config = %path.display(), "using config file");
                let config = load_config(&path)
                    .with_context(|| format!("loading config {}", path.display()))?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                Ok(LoadedConfig { config, root })
            }
            None => Ok(LoadedConfig {
                config: TracksmithConfig::default(),
                root: cwd,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn audit_path_resolves_relative_to_root() {
        let loaded = LoadedConfig {
            config: TracksmithConfig::default(),
            root: PathBuf::from("/srv/project"),
        };
        assert_eq!(
            loaded.audit_path(),
            PathBuf::from("/srv/project/.tracksmith/generated.txt")
        );
    }

    #[test]
    fn absolute_audit_path_kept_as_is() {
        let mut config = TracksmithConfig::default();
        config.run.audit_file = "/var/lib/tsm/generated.txt".into();
        let loaded = LoadedConfig {
            config,
            root: PathBuf::from("/srv/project"),
        };
        assert_eq!(
            loaded.audit_path(),
            PathBuf::from("/var/lib/tsm/generated.txt")
        );
    }
}
