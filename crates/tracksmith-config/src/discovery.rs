//! Discovery of the `tracksmith.yaml` configuration file.
//!
//! The config file is found by walking up the directory tree from a starting
//! point, with the `TRACKSMITH_CONFIG` environment variable taking priority.

use std::path::{Path, PathBuf};

/// The configuration file name looked for during discovery.
pub const CONFIG_FILE_NAME: &str = "tracksmith.yaml";

/// Environment variable that overrides config discovery.
const CONFIG_ENV: &str = "TRACKSMITH_CONFIG";

/// Walk up the directory tree from `start` looking for `tracksmith.yaml`.
///
/// The `TRACKSMITH_CONFIG` environment variable is checked first. Returns
/// `None` if the filesystem root is reached without finding a config file;
/// callers fall back to default configuration in that case.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var(CONFIG_ENV) {
        let env_path = PathBuf::from(&env_path);
        if env_path.is_file() {
            return Some(env_path);
        }
    }

    let start = start.canonicalize().ok()?;
    let mut current = start.as_path();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => break,
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn finds_config_in_ancestor_directory() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a/b/c");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "").unwrap();

        let found = find_config_file(&nested).unwrap();
        assert!(found.ends_with(CONFIG_FILE_NAME));
    }

    #[test]
    fn returns_none_when_absent() {
        let tmp = TempDir::new().unwrap();
        assert!(find_config_file(tmp.path()).is_none());
    }
}
