//! Generation engine for the tracksmith system.
//!
//! Drives the two-pass protocol over a [`tracksmith_tracker::TrackerClient`]:
//! pass 1 creates all issues from raw templates and allocates identifiers,
//! pass 2 resolves placeholders and pushes updated bodies. Also owns the
//! audit record and cleanup of the last generated set.

pub mod audit;
pub mod cleanup;
pub mod generate;

pub use audit::{AuditError, GeneratedSet, read_audit, remove_audit, write_audit};
pub use cleanup::{CleanupReport, FailedDelete, cleanup};
pub use generate::{GenerateError, GenerateFailure, GenerateOptions, Generator, Phase, RunReport};
