//! Error types for template loading and placeholder resolution.

use std::path::PathBuf;

/// Errors that can occur while loading a template directory.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template directory does not exist or is not a directory.
    #[error("template directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    /// No file matched the tracking-template naming convention (`00_*.md`).
    #[error("no tracking template (00_*.md) found in {0}")]
    NoTrackingTemplate(PathBuf),

    /// No implementation templates (`01_*.md`..`99_*.md`) were found.
    #[error("no implementation templates found in {0}")]
    EmptyTemplateSet(PathBuf),

    /// Two template files carry the same ordinal.
    #[error("duplicate ordinal {ordinal}: {first} and {second}")]
    DuplicateOrdinal {
        /// The ordinal that appeared twice.
        ordinal: String,
        /// File name of the first template with this ordinal.
        first: String,
        /// File name of the conflicting template.
        second: String,
    },

    /// A template file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur while loading the dependency declarations file.
#[derive(Debug, thiserror::Error)]
pub enum DepfileError {
    /// The declarations file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during placeholder resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// A `{{IMPL_n}}` placeholder referenced a sequence position that has
    /// no assigned issue number. This indicates resolution ran before all
    /// creation completed and is treated as fatal.
    #[error("unresolved placeholder {{{{IMPL_{index}}}}}: only {assigned} implementation issue(s) assigned")]
    UnresolvedPlaceholder {
        /// The 1-based sequence position requested by the placeholder.
        index: usize,
        /// How many issue numbers were assigned at resolution time.
        assigned: usize,
    },
}
