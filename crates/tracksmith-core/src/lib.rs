//! Core types and logic for the tracksmith system.
//!
//! This crate holds everything that works without a tracker connection:
//! template loading and frontmatter parsing, the dependency declarations
//! table, and placeholder resolution against an issue-number assignment.

pub mod depfile;
pub mod error;
pub mod resolver;
pub mod template;

/// An issue identifier as assigned by the tracker (e.g., a GitHub issue
/// number).
pub type IssueNumber = u64;

/// Renders an issue number in cross-reference form (`#42`).
pub fn cross_reference(number: IssueNumber) -> String {
    format!("#{number}")
}
