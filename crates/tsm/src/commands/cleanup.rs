//! `tsm cleanup` -- delete the issues from the last generation run.

use std::time::Duration;

use anyhow::{Context, Result, bail};

use tracksmith_core::cross_reference;
use tracksmith_engine::{AuditError, cleanup, read_audit, remove_audit};
use tracksmith_tracker::GithubTracker;

use crate::cli::CleanupArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `tsm cleanup` command.
pub fn run(ctx: &RuntimeContext, args: &CleanupArgs) -> Result<()> {
    let loaded = ctx.load_config()?;
    let audit_path = loaded.audit_path();

    let set = match read_audit(&audit_path) {
        Ok(set) => set,
        Err(AuditError::NotFound(_)) => {
            if ctx.json {
                output_json(&serde_json::json!({ "deleted": [], "failed": [] }));
            } else if !ctx.quiet {
                println!("No generated set recorded; nothing to clean up.");
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    // Deletion is destructive; without --yes only show what would go.
    if !args.yes {
        let ids: Vec<String> = set
            .identifiers()
            .iter()
            .map(|n| cross_reference(*n))
            .collect();
        println!("Would delete {} issue(s): {}", ids.len(), ids.join(", "));
        println!("Pass --yes to delete them.");
        return Ok(());
    }

    let config = &loaded.config;
    if config.tracker.owner.is_empty() || config.tracker.repo.is_empty() {
        bail!(
            "tracker repository not configured: set tracker.owner and tracker.repo \
             in tracksmith.yaml"
        );
    }
    let token = std::env::var(&config.tracker.token_env).with_context(|| {
        format!(
            "tracker token not found: set the {} environment variable",
            config.tracker.token_env
        )
    })?;

    let tracker = GithubTracker::new(
        &config.tracker.api_url,
        &config.tracker.owner,
        &config.tracker.repo,
        &token,
    );

    let report = cleanup(
        &tracker,
        &set,
        Duration::from_millis(config.run.pause_ms),
    );

    if report.is_complete() {
        remove_audit(&audit_path)
            .with_context(|| format!("removing audit record {}", audit_path.display()))?;
    }

    if ctx.json {
        output_json(&report);
    } else if !ctx.quiet {
        println!("Deleted {} issue(s)", report.deleted.len());
        for failure in &report.failed {
            eprintln!("Failed to delete #{}: {}", failure.number, failure.error);
        }
    }

    if !report.is_complete() {
        bail!(
            "{} issue(s) could not be deleted; audit record kept at {}",
            report.failed.len(),
            audit_path.display()
        );
    }

    Ok(())
}
