//! Dependency declarations file -- `dependencies.txt` parsing.
//!
//! Each non-empty line has the shape `NN:expr[,expr...]`, where `NN` is an
//! implementation ordinal and each expression is either a fixed reference
//! (`#123`) or a placeholder reference (`#{{IMPL_n}}`). Expressions are kept
//! as raw strings; resolution happens later against the assignment.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::DepfileError;

/// The conventional declarations file name inside a template directory.
pub const DEPENDENCIES_FILE: &str = "dependencies.txt";

/// Mapping from implementation ordinal to its raw dependency expressions,
/// in declaration order.
pub type DependencyTable = BTreeMap<String, Vec<String>>;

/// Load the dependency declarations file.
///
/// A missing file is not an error: it yields an empty table. Lines that do
/// not match the `NN:expr[,expr...]` shape are skipped; this leniency is a
/// deliberate design choice inherited from the declarations format.
pub fn load_dependencies(path: &Path) -> Result<DependencyTable, DepfileError> {
    if !path.is_file() {
        return Ok(DependencyTable::new());
    }

    let content = std::fs::read_to_string(path).map_err(|source| DepfileError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(parse_dependencies(&content))
}

/// Parse declaration lines into a [`DependencyTable`].
pub fn parse_dependencies(content: &str) -> DependencyTable {
    let mut table = DependencyTable::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let Some((ordinal, rest)) = line.split_once(':') else {
            tracing::debug!(line, "skipping malformed dependency line");
            continue;
        };

        let ordinal = ordinal.trim();
        if ordinal.len() != 2 || !ordinal.bytes().all(|b| b.is_ascii_digit()) {
            tracing::debug!(line, "skipping dependency line with invalid ordinal");
            continue;
        }

        let expressions: Vec<String> = rest
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();
        if expressions.is_empty() {
            continue;
        }

        table
            .entry(ordinal.to_string())
            .or_default()
            .extend(expressions);
    }

    table
}
