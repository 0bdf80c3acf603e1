//! The generation orchestrator -- the two-pass create-then-patch protocol.
//!
//! Pass 1 creates the tracking issue and every implementation issue from
//! their raw templates, recording the tracker-assigned numbers in ordinal
//! order. Only once pass 1 has completed does pass 2 resolve placeholders
//! and push updated bodies. Interleaving the passes would reintroduce the
//! forward-reference problem this protocol exists to solve.
//!
//! A failed tracker call aborts the remainder of its phase without rolling
//! back earlier calls; the error carries the partial [`RunReport`] so the
//! caller can persist the audit record and report progress.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use tracksmith_core::error::{DepfileError, ResolveError, TemplateError};
use tracksmith_core::resolver::{Assignment, resolve};
use tracksmith_core::{IssueNumber, depfile, template};
use tracksmith_tracker::{TrackerClient, TrackerError};

use crate::audit::GeneratedSet;

/// Tunables for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Fixed pause between consecutive tracker write calls. Rate-limit
    /// courtesy only; correctness never depends on it.
    pub pause: Duration,

    /// Create template labels missing from the tracker before pass 1.
    pub ensure_labels: bool,

    /// Color for labels created by `ensure_labels`.
    pub label_color: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            pause: Duration::from_secs(1),
            ensure_labels: true,
            label_color: "ededed".to_string(),
        }
    }
}

/// The phase a run was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Load,
    EnsureLabels,
    CreateTracking,
    CreateImplementations,
    PatchTracking,
    PatchImplementations,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Load => "load",
            Phase::EnsureLabels => "ensure-labels",
            Phase::CreateTracking => "create-tracking",
            Phase::CreateImplementations => "create-implementations",
            Phase::PatchTracking => "patch-tracking",
            Phase::PatchImplementations => "patch-implementations",
        };
        f.write_str(name)
    }
}

/// Progress of one run: which issues exist and how many calls succeeded.
/// Available even when a phase failed mid-way.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// The tracking issue, once created.
    pub tracking: Option<IssueNumber>,

    /// Implementation issues in assignment order.
    pub implementations: Vec<IssueNumber>,

    /// Successful create calls.
    pub created: usize,

    /// Successful update calls.
    pub updated: usize,
}

impl RunReport {
    /// The generated set for the audit record, if anything was created.
    pub fn generated(&self) -> Option<GeneratedSet> {
        self.tracking.map(|tracking| GeneratedSet {
            tracking,
            implementations: self.implementations.clone(),
        })
    }
}

/// What went wrong inside a phase.
#[derive(Debug, thiserror::Error)]
pub enum GenerateFailure {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Dependencies(#[from] DepfileError),

    #[error(transparent)]
    Tracker(#[from] TrackerError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// A failed run: the phase, the underlying failure, and the partial report.
#[derive(Debug, thiserror::Error)]
#[error("generation failed during {phase}: {source}")]
pub struct GenerateError {
    pub phase: Phase,
    pub report: RunReport,
    #[source]
    pub source: GenerateFailure,
}

fn fail(phase: Phase, report: &RunReport, source: impl Into<GenerateFailure>) -> GenerateError {
    GenerateError {
        phase,
        report: report.clone(),
        source: source.into(),
    }
}

/// Orchestrates one generation run against a tracker client.
///
/// The assignment and generated set are owned by the run, never ambient
/// state, so independent runs can coexist and the resolver can be exercised
/// with synthetic assignments.
pub struct Generator<'a, C: TrackerClient + ?Sized> {
    client: &'a C,
    options: GenerateOptions,
}

impl<'a, C: TrackerClient + ?Sized> Generator<'a, C> {
    pub fn new(client: &'a C, options: GenerateOptions) -> Self {
        Self { client, options }
    }

    /// Run the full two-pass protocol over a template directory.
    pub fn generate(&self, dir: &Path) -> Result<RunReport, GenerateError> {
        let mut report = RunReport::default();

        // Load: no side effects yet, structural errors abort the run.
        let set =
            template::load_templates(dir).map_err(|e| fail(Phase::Load, &report, e))?;
        let deps = depfile::load_dependencies(&dir.join(depfile::DEPENDENCIES_FILE))
            .map_err(|e| fail(Phase::Load, &report, e))?;
        tracing::info!(
            implementations = set.implementations.len(),
            dependency_entries = deps.len(),
            "loaded templates"
        );

        if self.options.ensure_labels {
            let existing = self
                .client
                .list_labels()
                .map_err(|e| fail(Phase::EnsureLabels, &report, e))?;
            for label in set.all_labels() {
                if !existing.contains(&label) {
                    tracing::debug!(label, "creating missing label");
                    self.client
                        .create_label(&label, &self.options.label_color)
                        .map_err(|e| fail(Phase::EnsureLabels, &report, e))?;
                }
            }
        }

        // Pass 1: create everything from raw (unresolved) templates.
        let tracking_number = self
            .client
            .create_issue(
                &set.tracking.title,
                &set.tracking.body,
                &set.tracking.labels,
            )
            .map_err(|e| fail(Phase::CreateTracking, &report, e))?;
        report.tracking = Some(tracking_number);
        report.created += 1;
        tracing::info!(number = tracking_number, "created tracking issue");

        // Creation order is load-bearing: placeholder index n refers to the
        // n-th implementation template in ascending-ordinal order.
        let mut assignment = Assignment::new();
        for tpl in &set.implementations {
            self.pause();
            let number = self
                .client
                .create_issue(&tpl.title, &tpl.body, &tpl.labels)
                .map_err(|e| fail(Phase::CreateImplementations, &report, e))?;
            assignment.record(number);
            report.implementations.push(number);
            report.created += 1;
            tracing::info!(ordinal = %tpl.ordinal, number, "created implementation issue");
        }

        // Pass 2: resolve against the completed assignment and patch.
        let resolved = resolve(&set.tracking.body, &assignment)
            .map_err(|e| fail(Phase::PatchTracking, &report, e))?;
        let tracking_body = prepend_checklist(&resolved, &assignment);
        self.pause();
        self.client
            .update_issue_body(tracking_number, &tracking_body)
            .map_err(|e| fail(Phase::PatchTracking, &report, e))?;
        report.updated += 1;

        for (position, tpl) in set.implementations.iter().enumerate() {
            let number = report.implementations[position];
            let mut body = resolve(&tpl.body, &assignment)
                .map_err(|e| fail(Phase::PatchImplementations, &report, e))?;

            if let Some(expressions) = deps.get(&tpl.ordinal) {
                let mut references = Vec::with_capacity(expressions.len());
                for expression in expressions {
                    let reference = resolve(expression, &assignment)
                        .map_err(|e| fail(Phase::PatchImplementations, &report, e))?;
                    references.push(reference);
                }
                body = splice_depends_block(&body, &render_depends_block(&references));
            }

            // Nothing changed for this issue: skip the tracker call.
            if body == tpl.body {
                continue;
            }

            self.pause();
            self.client
                .update_issue_body(number, &body)
                .map_err(|e| fail(Phase::PatchImplementations, &report, e))?;
            report.updated += 1;
            tracing::info!(ordinal = %tpl.ordinal, number, "patched implementation issue");
        }

        Ok(report)
    }

    fn pause(&self) {
        if !self.options.pause.is_zero() {
            std::thread::sleep(self.options.pause);
        }
    }
}

// ---------------------------------------------------------------------------
// Body assembly
// ---------------------------------------------------------------------------

/// Prepend the generated checklist (one line per implementation issue, in
/// assignment order) to the resolved tracking body.
fn prepend_checklist(resolved_body: &str, assignment: &Assignment) -> String {
    let checklist: Vec<String> = assignment
        .numbers()
        .iter()
        .map(|n| format!("- [ ] #{n}"))
        .collect();
    let checklist = checklist.join("\n");

    if resolved_body.trim().is_empty() {
        checklist
    } else {
        format!("{checklist}\n\n{resolved_body}")
    }
}

/// Render the "Depends on" block from already-resolved references.
fn render_depends_block(references: &[String]) -> String {
    let items: Vec<String> = references.iter().map(|r| format!("- {r}")).collect();
    format!("### Depends on\n\n{}", items.join("\n"))
}

/// Splice the block immediately after the first "Overview" heading, or
/// append it at the end when no such heading exists.
fn splice_depends_block(body: &str, block: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();

    if let Some(pos) = lines.iter().position(|l| is_overview_heading(l)) {
        let mut out = Vec::with_capacity(lines.len() + 2);
        out.extend_from_slice(&lines[..=pos]);
        out.push("");
        out.push(block);
        out.extend_from_slice(&lines[pos + 1..]);
        out.join("\n")
    } else if body.trim().is_empty() {
        block.to_string()
    } else {
        format!("{body}\n\n{block}")
    }
}

fn is_overview_heading(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('#') && trimmed.contains("Overview")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
