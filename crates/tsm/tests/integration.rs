//! End-to-end CLI integration tests for the `tsm` binary.
//!
//! Each test creates its own temporary directory and exercises the `tsm`
//! binary as a subprocess via `assert_cmd`. Generation runs in `--dry-run`
//! mode, which drives the full two-pass protocol against the in-memory
//! tracker, so no network or token is needed.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a `Command` targeting the cargo-built `tsm` binary, with tracker
/// credentials and config discovery neutralized.
fn tsm() -> Command {
    let mut cmd = Command::cargo_bin("tsm").unwrap();
    cmd.env_remove("TRACKSMITH_CONFIG");
    cmd.env_remove("GITHUB_TOKEN");
    cmd
}

/// Write a standard template directory under `<tmp>/templates`.
fn write_templates(tmp: &TempDir) {
    let dir = tmp.path().join("templates");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("00_tracking.md"),
        "---\ntitle: \"Tracking\"\nlabels: epic\n---\nStart with {{IMPL_1}}.\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("01_a.md"),
        "---\ntitle: \"a\"\nlabels: task\n---\n## Overview\n\nFirst unit.\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("02_b.md"),
        "---\ntitle: \"b\"\nlabels: task\n---\n## Overview\n\nSecond unit.\n",
    )
    .unwrap();
    std::fs::write(dir.join("dependencies.txt"), "02:#1,#{{IMPL_1}}\n").unwrap();
}

// ---------------------------------------------------------------------------
// Generate
// ---------------------------------------------------------------------------

#[test]
fn dry_run_resolves_placeholders_end_to_end() {
    let tmp = TempDir::new().unwrap();
    write_templates(&tmp);

    let output = tsm()
        .args(["generate", "templates", "--dry-run", "--json"])
        .current_dir(tmp.path())
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["dry_run"], true);
    assert_eq!(json["report"]["tracking"], 1);
    assert_eq!(json["report"]["implementations"][0], 2);
    assert_eq!(json["report"]["implementations"][1], 3);
    assert_eq!(json["report"]["created"], 3);

    let issues = json["issues"].as_array().unwrap();
    assert_eq!(issues.len(), 3);

    // Tracking body: checklist prepended, placeholder resolved.
    let tracking_body = issues[0]["body"].as_str().unwrap();
    assert_eq!(tracking_body, "- [ ] #2\n- [ ] #3\n\nStart with #2.");

    // Implementation 02: dependency block spliced after the Overview heading,
    // fixed reference kept, placeholder rewritten to the assigned number.
    let b_body = issues[2]["body"].as_str().unwrap();
    assert_eq!(
        b_body,
        "## Overview\n\n### Depends on\n\n- #1\n- #2\n\nSecond unit."
    );
}

#[test]
fn dry_run_human_output_lists_issues() {
    let tmp = TempDir::new().unwrap();
    write_templates(&tmp);

    tsm()
        .args(["generate", "templates", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN] Would create 3 issue(s):"))
        .stdout(predicate::str::contains("#1 [tracking] Tracking"))
        .stdout(predicate::str::contains("#3 [implementation] b"));
}

#[test]
fn missing_tracking_template_aborts_with_error() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("templates");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("01_a.md"), "---\ntitle: \"a\"\n---\n").unwrap();

    tsm()
        .args(["generate", "templates", "--dry-run"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("no tracking template"));
}

#[test]
fn generate_without_repo_configuration_fails_before_creating() {
    let tmp = TempDir::new().unwrap();
    write_templates(&tmp);

    tsm()
        .args(["generate", "templates"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("repository not configured"));

    // Nothing ran, so no audit record may exist.
    assert!(!tmp.path().join(".tracksmith/generated.txt").exists());
}

// ---------------------------------------------------------------------------
// Cleanup
// ---------------------------------------------------------------------------

#[test]
fn cleanup_without_audit_record_is_a_noop() {
    let tmp = TempDir::new().unwrap();

    tsm()
        .arg("cleanup")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to clean up"));
}

#[test]
fn cleanup_without_yes_only_lists_identifiers() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join(".tracksmith")).unwrap();
    std::fs::write(tmp.path().join(".tracksmith/generated.txt"), "10\n11\n12\n").unwrap();

    tsm()
        .arg("cleanup")
        .current_dir(tmp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Would delete 3 issue(s): #10, #11, #12",
        ))
        .stdout(predicate::str::contains("Pass --yes to delete them."));

    // Listing must not consume the record.
    assert!(tmp.path().join(".tracksmith/generated.txt").exists());
}

// ---------------------------------------------------------------------------
// Version
// ---------------------------------------------------------------------------

#[test]
fn version_prints_platform_info() {
    tsm()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tsm version"));
}

#[test]
fn version_json_has_expected_fields() {
    let output = tsm().args(["version", "--json"]).output().unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["version"].is_string());
    assert!(json["os"].is_string());
    assert!(json["arch"].is_string());
}
