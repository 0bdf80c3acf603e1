//! Cleanup of the last generated set.
//!
//! Deletes every issue listed in the audit record, tracking issue first.
//! Individual delete failures do not abort the sweep; they are collected so
//! the caller can decide whether to keep the audit record for a retry.

use std::time::Duration;

use serde::Serialize;

use tracksmith_core::IssueNumber;
use tracksmith_tracker::TrackerClient;

use crate::audit::GeneratedSet;

/// Outcome of one cleanup sweep.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupReport {
    /// Issues successfully deleted.
    pub deleted: Vec<IssueNumber>,
    /// Issues that could not be deleted, with the tracker's error text.
    pub failed: Vec<FailedDelete>,
}

/// A single failed delete.
#[derive(Debug, Clone, Serialize)]
pub struct FailedDelete {
    pub number: IssueNumber,
    pub error: String,
}

impl CleanupReport {
    /// Whether every identifier in the set was deleted.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Delete every issue in the generated set.
pub fn cleanup<C: TrackerClient + ?Sized>(
    client: &C,
    set: &GeneratedSet,
    pause: Duration,
) -> CleanupReport {
    let mut report = CleanupReport::default();

    for (i, number) in set.identifiers().into_iter().enumerate() {
        if i > 0 && !pause.is_zero() {
            std::thread::sleep(pause);
        }
        match client.delete_issue(number) {
            Ok(()) => {
                tracing::info!(number, "deleted issue");
                report.deleted.push(number);
            }
            Err(e) => {
                tracing::warn!(number, error = %e, "failed to delete issue");
                report.failed.push(FailedDelete {
                    number,
                    error: e.to_string(),
                });
            }
        }
    }

    report
}
