//! `tsm generate` -- create a tracking set from a template directory.

use std::time::Duration;

use anyhow::{Context, Result, bail};

use tracksmith_core::cross_reference;
use tracksmith_engine::{GenerateOptions, Generator, write_audit};
use tracksmith_tracker::{GithubTracker, InMemoryTracker};

use crate::cli::GenerateArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `tsm generate` command.
pub fn run(ctx: &RuntimeContext, args: &GenerateArgs) -> Result<()> {
    let loaded = ctx.load_config()?;
    let mut config = loaded.config.clone();

    if let Some(repo) = &args.repo {
        let (owner, name) = repo
            .split_once('/')
            .context("--repo must have the form owner/name")?;
        config.tracker.owner = owner.to_string();
        config.tracker.repo = name.to_string();
    }

    let options = GenerateOptions {
        pause: Duration::from_millis(args.pause.unwrap_or(config.run.pause_ms)),
        ensure_labels: config.run.ensure_labels,
        label_color: config.run.label_color.clone(),
    };

    if args.dry_run {
        return run_dry(ctx, args, options);
    }

    if config.tracker.owner.is_empty() || config.tracker.repo.is_empty() {
        bail!(
            "tracker repository not configured: set tracker.owner and tracker.repo \
             in tracksmith.yaml or pass --repo owner/name"
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
    let audit_path = loaded.audit_path();

    match Generator::new(&tracker, options).generate(&args.dir) {
        Ok(report) => {
            let set = report
                .generated()
                .context("run completed without creating a tracking issue")?;
            write_audit(&audit_path, &set)
                .with_context(|| format!("recording run in {}", audit_path.display()))?;

            if ctx.json {
                output_json(&serde_json::json!({
                    "report": report,
                    "audit_file": audit_path,
                }));
            } else if !ctx.quiet {
                println!("Created tracking issue: {}", cross_reference(set.tracking));
                let impls: Vec<String> = set
                    .implementations
                    .iter()
                    .map(|n| cross_reference(*n))
                    .collect();
                println!("Created implementation issues: {}", impls.join(", "));
                println!("Updated {} issue(s)", report.updated);
                println!("Audit record: {}", audit_path.display());
            }
            Ok(())
        }
        Err(e) => {
            // No rollback: record whatever was created so cleanup can find it.
            if let Some(set) = e.report.generated() {
                match write_audit(&audit_path, &set) {
                    Ok(()) => eprintln!(
                        "Recorded {} partially created issue(s) in {}",
                        set.identifiers().len(),
                        audit_path.display()
                    ),
                    Err(write_err) => {
                        eprintln!("Warning: failed to record partial run: {write_err}")
                    }
                }
            }
            eprintln!(
                "Created {} issue(s) and updated {} before the failure",
                e.report.created, e.report.updated
            );
            Err(e.into())
        }
    }
}

/// Run the full two-pass protocol against an in-memory tracker and show the
/// result without touching the real tracker.
fn run_dry(ctx: &RuntimeContext, args: &GenerateArgs, options: GenerateOptions) -> Result<()> {
    let tracker = InMemoryTracker::new();
    let options = GenerateOptions {
        pause: Duration::ZERO,
        ..options
    };

    let report = Generator::new(&tracker, options).generate(&args.dir)?;

    if ctx.json {
        output_json(&serde_json::json!({
            "dry_run": true,
            "report": report,
            "issues": tracker.issues(),
        }));
    } else if !ctx.quiet {
        println!("[DRY RUN] Would create {} issue(s):", report.created);
        for issue in tracker.issues() {
            let kind = if Some(issue.number) == report.tracking {
                "tracking"
            } else {
                "implementation"
            };
            println!("  #{} [{}] {}", issue.number, kind, issue.title);
        }
        println!("[DRY RUN] Would update {} issue(s)", report.updated);
    }

    Ok(())
}
