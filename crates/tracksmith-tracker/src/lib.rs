//! Issue tracker client boundary for the tracksmith system.
//!
//! Consumers depend on the [`TrackerClient`] trait rather than on a concrete
//! backend, so the generation engine can run against the real GitHub API or
//! against an in-memory tracker in tests and dry runs.

pub mod error;
pub mod github;
pub mod memory;
pub mod traits;

pub use error::{Result, TrackerError};
pub use github::GithubTracker;
pub use memory::InMemoryTracker;
pub use traits::TrackerClient;
