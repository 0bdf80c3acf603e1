//! In-memory implementation of [`TrackerClient`].
//!
//! Backs the engine's test suite and the CLI's `--dry-run` mode: the full
//! two-pass protocol runs against a map of stored issues, and the final
//! state can be inspected afterwards.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde::Serialize;

use tracksmith_core::IssueNumber;

use crate::error::{Result, TrackerError};
use crate::traits::TrackerClient;

/// An issue as held by the in-memory tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredIssue {
    pub number: IssueNumber,
    pub title: String,
    pub body: String,
    pub labels: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    next_number: IssueNumber,
    issues: BTreeMap<IssueNumber, StoredIssue>,
    labels: Vec<String>,
}

/// A tracker that lives entirely in process memory.
#[derive(Debug)]
pub struct InMemoryTracker {
    state: Mutex<State>,
}

impl InMemoryTracker {
    /// A tracker whose first issue gets number 1.
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    /// A tracker whose first issue gets the given number. Useful in tests to
    /// keep issue numbers distinct from sequence positions.
    pub fn starting_at(first_number: IssueNumber) -> Self {
        Self {
            state: Mutex::new(State {
                next_number: first_number,
                ..State::default()
            }),
        }
    }

    /// Snapshot of all stored issues in number order.
    pub fn issues(&self) -> Vec<StoredIssue> {
        let state = self.state.lock().expect("tracker state poisoned");
        state.issues.values().cloned().collect()
    }

    /// Look up a single issue by number.
    pub fn issue(&self, number: IssueNumber) -> Option<StoredIssue> {
        let state = self.state.lock().expect("tracker state poisoned");
        state.issues.get(&number).cloned()
    }

    /// Names of all labels defined so far.
    pub fn label_names(&self) -> Vec<String> {
        let state = self.state.lock().expect("tracker state poisoned");
        state.labels.clone()
    }
}

impl Default for InMemoryTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerClient for InMemoryTracker {
    fn create_issue(&self, title: &str, body: &str, labels: &[String]) -> Result<IssueNumber> {
        let mut state = self.state.lock().expect("tracker state poisoned");
        let number = state.next_number;
        state.next_number += 1;
        state.issues.insert(
            number,
            StoredIssue {
                number,
                title: title.to_string(),
                body: body.to_string(),
                labels: labels.to_vec(),
            },
        );
        Ok(number)
    }

    fn update_issue_body(&self, number: IssueNumber, body: &str) -> Result<()> {
        let mut state = self.state.lock().expect("tracker state poisoned");
        let issue = state
            .issues
            .get_mut(&number)
            .ok_or(TrackerError::IssueNotFound(number))?;
        issue.body = body.to_string();
        Ok(())
    }

    fn delete_issue(&self, number: IssueNumber) -> Result<()> {
        let mut state = self.state.lock().expect("tracker state poisoned");
        state
            .issues
            .remove(&number)
            .ok_or(TrackerError::IssueNotFound(number))?;
        Ok(())
    }

    fn list_labels(&self) -> Result<Vec<String>> {
        Ok(self.label_names())
    }

    fn create_label(&self, name: &str, _color: &str) -> Result<()> {
        let mut state = self.state.lock().expect("tracker state poisoned");
        if !state.labels.iter().any(|l| l == name) {
            state.labels.push(name.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn assigns_sequential_numbers() {
        let tracker = InMemoryTracker::starting_at(40);
        let a = tracker.create_issue("a", "", &[]).unwrap();
        let b = tracker.create_issue("b", "", &[]).unwrap();
        assert_eq!((a, b), (40, 41));
    }

    #[test]
    fn update_and_delete_roundtrip() {
        let tracker = InMemoryTracker::new();
        let n = tracker.create_issue("t", "old", &["x".into()]).unwrap();

        tracker.update_issue_body(n, "new").unwrap();
        assert_eq!(tracker.issue(n).unwrap().body, "new");

        tracker.delete_issue(n).unwrap();
        assert!(tracker.issue(n).is_none());
        assert!(matches!(
            tracker.delete_issue(n).unwrap_err(),
            TrackerError::IssueNotFound(_)
        ));
    }

    #[test]
    fn labels_deduplicate() {
        let tracker = InMemoryTracker::new();
        tracker.create_label("epic", "ededed").unwrap();
        tracker.create_label("epic", "ededed").unwrap();
        tracker.create_label("task", "ededed").unwrap();
        assert_eq!(tracker.list_labels().unwrap(), vec!["epic", "task"]);
    }

    #[test]
    fn update_unknown_issue_fails() {
        let tracker = InMemoryTracker::new();
        assert!(matches!(
            tracker.update_issue_body(99, "x").unwrap_err(),
            TrackerError::IssueNotFound(99)
        ));
    }
}
