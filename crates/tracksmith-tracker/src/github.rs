//! GitHub REST implementation of [`TrackerClient`].
//!
//! Talks to `{api_url}/repos/{owner}/{repo}` with a bearer token. All calls
//! are blocking; pacing between calls is the caller's responsibility.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use tracksmith_core::IssueNumber;

use crate::error::{Result, TrackerError};
use crate::traits::TrackerClient;

/// Default GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("tracksmith/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github+json";

/// A GitHub repository-scoped issue client.
pub struct GithubTracker {
    agent: ureq::Agent,
    api_url: String,
    owner: String,
    repo: String,
    auth: String,
}

/// The subset of GitHub's issue response we care about.
#[derive(Debug, Deserialize)]
struct IssueResponse {
    number: IssueNumber,
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct LabelResponse {
    name: String,
}

impl GithubTracker {
    pub fn new(api_url: &str, owner: &str, repo: &str, token: &str) -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_url: api_url.trim_end_matches('/').to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            auth: format!("Bearer {token}"),
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_url, self.owner, self.repo, path
        )
    }

    /// Maps a 404 response on an issue-scoped call to [`TrackerError::IssueNotFound`].
    fn issue_error(err: ureq::Error, number: IssueNumber) -> TrackerError {
        match err {
            ureq::Error::StatusCode(404) => TrackerError::IssueNotFound(number),
            other => other.into(),
        }
    }
}

impl TrackerClient for GithubTracker {
    fn create_issue(&self, title: &str, body: &str, labels: &[String]) -> Result<IssueNumber> {
        let payload = serde_json::json!({
            "title": title,
            "body": body,
            "labels": labels,
        });

        let mut response = self
            .agent
            .post(&self.url("/issues"))
            .header("Authorization", &self.auth)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .send_json(&payload)?;

        let issue: IssueResponse = response.body_mut().read_json()?;
        tracing::debug!(number = issue.number, created_at = ?issue.created_at, "created issue");
        Ok(issue.number)
    }

    fn update_issue_body(&self, number: IssueNumber, body: &str) -> Result<()> {
        let payload = serde_json::json!({ "body": body });

        self.agent
            .patch(&self.url(&format!("/issues/{number}")))
            .header("Authorization", &self.auth)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .send_json(&payload)
            .map_err(|e| Self::issue_error(e, number))?;

        tracing::debug!(number, "updated issue body");
        Ok(())
    }

    /// GitHub's REST API has no issue deletion; the closest terminal state
    /// is closing the issue as not planned.
    fn delete_issue(&self, number: IssueNumber) -> Result<()> {
        let payload = serde_json::json!({
            "state": "closed",
            "state_reason": "not_planned",
        });

        self.agent
            .patch(&self.url(&format!("/issues/{number}")))
            .header("Authorization", &self.auth)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .send_json(&payload)
            .map_err(|e| Self::issue_error(e, number))?;

        tracing::debug!(number, "closed issue (delete)");
        Ok(())
    }

    fn list_labels(&self) -> Result<Vec<String>> {
        let mut response = self
            .agent
            .get(&self.url("/labels"))
            .query("per_page", "100")
            .header("Authorization", &self.auth)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .call()?;

        let labels: Vec<LabelResponse> = response.body_mut().read_json()?;
        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    fn create_label(&self, name: &str, color: &str) -> Result<()> {
        let payload = serde_json::json!({ "name": name, "color": color });

        self.agent
            .post(&self.url("/labels"))
            .header("Authorization", &self.auth)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT)
            .send_json(&payload)?;

        tracing::debug!(name, "created label");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_repo_scoped_urls() {
        let tracker = GithubTracker::new("https://api.github.com/", "acme", "rocket", "t0ken");
        assert_eq!(
            tracker.url("/issues/7"),
            "https://api.github.com/repos/acme/rocket/issues/7"
        );
    }

    #[test]
    fn not_found_maps_to_issue_not_found() {
        let err = GithubTracker::issue_error(ureq::Error::StatusCode(404), 9);
        assert!(matches!(err, TrackerError::IssueNotFound(9)));

        let err = GithubTracker::issue_error(ureq::Error::StatusCode(500), 9);
        assert!(matches!(err, TrackerError::Http(_)));
    }
}
