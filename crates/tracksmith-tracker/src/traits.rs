//! The narrow capability interface the generation engine depends on.

use tracksmith_core::IssueNumber;

use crate::error::Result;

/// The tracker operations the engine requires. Authentication, transport,
/// retries, and rate limiting are the implementation's concern.
pub trait TrackerClient {
    /// Create an issue and return the identifier the tracker assigned.
    fn create_issue(&self, title: &str, body: &str, labels: &[String]) -> Result<IssueNumber>;

    /// Replace an existing issue's body.
    fn update_issue_body(&self, number: IssueNumber, body: &str) -> Result<()>;

    /// Remove an issue. Backends without true deletion may map this to the
    /// closest terminal state they support.
    fn delete_issue(&self, number: IssueNumber) -> Result<()>;

    /// Names of all labels defined on the tracker.
    fn list_labels(&self) -> Result<Vec<String>>;

    /// Define a new label.
    fn create_label(&self, name: &str, color: &str) -> Result<()>;
}
