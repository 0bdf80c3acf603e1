//! The audit record -- a flat list of identifiers from one generation run.
//!
//! First line is the tracking issue number, remaining lines the
//! implementation issue numbers in assignment order. One run per file (a
//! new run overwrites the previous record); this file is the sole input to
//! cleanup and is never reconciled against the tracker.

use std::path::{Path, PathBuf};

use serde::Serialize;

use tracksmith_core::IssueNumber;

/// The identifiers produced by one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSet {
    /// The tracking issue.
    pub tracking: IssueNumber,
    /// Implementation issues in assignment order.
    pub implementations: Vec<IssueNumber>,
}

impl GeneratedSet {
    /// All identifiers, tracking first.
    pub fn identifiers(&self) -> Vec<IssueNumber> {
        let mut all = Vec::with_capacity(1 + self.implementations.len());
        all.push(self.tracking);
        all.extend(&self.implementations);
        all
    }
}

/// Errors that can occur reading or writing the audit record.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// No audit record exists at the given path.
    #[error("no audit record found at {0}")]
    NotFound(PathBuf),

    /// The record exists but could not be read or removed.
    #[error("failed to read audit record {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record could not be written.
    #[error("failed to write audit record {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record contents are not a list of issue numbers.
    #[error("malformed audit record {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// Write the audit record, creating parent directories as needed.
pub fn write_audit(path: &Path, set: &GeneratedSet) -> Result<(), AuditError> {
    let write_err = |source| AuditError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut content = String::new();
    for number in set.identifiers() {
        content.push_str(&number.to_string());
        content.push('\n');
    }
    std::fs::write(path, content).map_err(write_err)
}

/// Read the audit record back into a [`GeneratedSet`].
pub fn read_audit(path: &Path) -> Result<GeneratedSet, AuditError> {
    if !path.is_file() {
        return Err(AuditError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|source| AuditError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut numbers = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let number: IssueNumber = line.parse().map_err(|_| AuditError::Malformed {
            path: path.to_path_buf(),
            reason: format!("not an issue number: {line:?}"),
        })?;
        numbers.push(number);
    }

    if numbers.is_empty() {
        return Err(AuditError::Malformed {
            path: path.to_path_buf(),
            reason: "record is empty".to_string(),
        });
    }

    let tracking = numbers.remove(0);
    Ok(GeneratedSet {
        tracking,
        implementations: numbers,
    })
}

/// Remove the audit record after a successful cleanup.
pub fn remove_audit(path: &Path) -> Result<(), AuditError> {
    std::fs::remove_file(path).map_err(|source| AuditError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn write_then_read_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/generated.txt");
        let set = GeneratedSet {
            tracking: 10,
            implementations: vec![11, 12],
        };

        write_audit(&path, &set).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "10\n11\n12\n",
            "tracking identifier must come first"
        );
        assert_eq!(read_audit(&path).unwrap(), set);
    }

    #[test]
    fn missing_record_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = read_audit(&tmp.path().join("generated.txt")).unwrap_err();
        assert!(matches!(err, AuditError::NotFound(_)));
    }

    #[test]
    fn garbage_record_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("generated.txt");
        std::fs::write(&path, "10\noops\n").unwrap();
        assert!(matches!(
            read_audit(&path).unwrap_err(),
            AuditError::Malformed { .. }
        ));
    }

    #[test]
    fn tracking_only_set_is_valid() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("generated.txt");
        std::fs::write(&path, "7\n").unwrap();
        let set = read_audit(&path).unwrap();
        assert_eq!(set.tracking, 7);
        assert!(set.implementations.is_empty());
    }
}
