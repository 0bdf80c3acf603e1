//! Template store -- loads and parses a directory of markdown templates.
//!
//! A template directory holds one tracking template (`00_*.md`) and any
//! number of implementation templates (`01_*.md`..`99_*.md`). Each file
//! starts with a `---`-delimited frontmatter block carrying a quoted
//! `title` and an optional comma-separated `labels` line, followed by a
//! verbatim markdown body.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::TemplateError;

/// The ordinal reserved for the tracking template.
pub const TRACKING_ORDINAL: &str = "00";

/// Whether a template aggregates work (tracking) or describes one unit of
/// work (implementation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    /// The single aggregating template (`00_*.md`).
    Tracking,
    /// A numbered unit-of-work template (`01_*.md`..`99_*.md`).
    Implementation,
}

/// A parsed template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub kind: TemplateKind,

    /// Two-digit index from the filename (`"00"` for tracking).
    pub ordinal: String,

    /// Title from the frontmatter, with surrounding quotes stripped.
    pub title: String,

    /// Labels in frontmatter order, trimmed, duplicates collapsed.
    pub labels: Vec<String>,

    /// The raw markdown body, line breaks preserved.
    pub body: String,
}

/// The result of loading a template directory: one tracking template plus
/// the implementation templates in ascending ordinal order.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub tracking: Template,
    pub implementations: Vec<Template>,
}

impl TemplateSet {
    /// All labels used across the set, first occurrence order, deduplicated.
    pub fn all_labels(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        for template in std::iter::once(&self.tracking).chain(self.implementations.iter()) {
            for label in &template.labels {
                if !seen.contains(label) {
                    seen.push(label.clone());
                }
            }
        }
        seen
    }
}

/// Load all templates from a directory.
///
/// Files that do not match the `NN_name.md` convention are ignored. The
/// implementation templates are returned sorted ascending by ordinal; this
/// order defines the `{{IMPL_n}}` sequence positions.
///
/// # Errors
///
/// - [`TemplateError::DirectoryNotFound`] if `dir` is not a directory.
/// - [`TemplateError::NoTrackingTemplate`] if no `00_*.md` file exists.
/// - [`TemplateError::EmptyTemplateSet`] if no implementation templates exist.
/// - [`TemplateError::DuplicateOrdinal`] if two files share an ordinal.
pub fn load_templates(dir: &Path) -> Result<TemplateSet, TemplateError> {
    if !dir.is_dir() {
        return Err(TemplateError::DirectoryNotFound(dir.to_path_buf()));
    }

    // ordinal -> (file name, template); BTreeMap gives ascending ordinal order.
    let mut by_ordinal: BTreeMap<String, (String, Template)> = BTreeMap::new();

    let entries = std::fs::read_dir(dir).map_err(|source| TemplateError::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| TemplateError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        let file_name = entry.file_name().to_string_lossy().into_owned();

        let Some(ordinal) = template_ordinal(&file_name) else {
            continue;
        };

        let path = entry.path();
        let content = std::fs::read_to_string(&path).map_err(|source| TemplateError::Read {
            path: path.clone(),
            source,
        })?;

        let kind = if ordinal == TRACKING_ORDINAL {
            TemplateKind::Tracking
        } else {
            TemplateKind::Implementation
        };

        let template = parse_template(kind, ordinal, &content);
        tracing::debug!(file = %file_name, ordinal, "parsed template");

        if let Some((first, _)) = by_ordinal.get(&template.ordinal) {
            return Err(TemplateError::DuplicateOrdinal {
                ordinal: template.ordinal.clone(),
                first: first.clone(),
                second: file_name,
            });
        }
        by_ordinal.insert(template.ordinal.clone(), (file_name, template));
    }

    let tracking = by_ordinal
        .remove(TRACKING_ORDINAL)
        .map(|(_, t)| t)
        .ok_or_else(|| TemplateError::NoTrackingTemplate(dir.to_path_buf()))?;

    let implementations: Vec<Template> = by_ordinal.into_values().map(|(_, t)| t).collect();
    if implementations.is_empty() {
        return Err(TemplateError::EmptyTemplateSet(dir.to_path_buf()));
    }

    Ok(TemplateSet {
        tracking,
        implementations,
    })
}

/// Extracts the two-digit ordinal from a `NN_name.md` file name, or `None`
/// if the name does not follow the convention.
fn template_ordinal(file_name: &str) -> Option<&str> {
    let bytes = file_name.as_bytes();
    if bytes.len() < 6 || !file_name.ends_with(".md") {
        return None;
    }
    if bytes[0].is_ascii_digit() && bytes[1].is_ascii_digit() && bytes[2] == b'_' {
        Some(&file_name[..2])
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Frontmatter parsing
// ---------------------------------------------------------------------------

/// Parser state for a single template file.
enum ParseState {
    BeforeFrontmatter,
    InFrontmatter,
    InBody,
}

/// Parse a template file's content.
///
/// The parser is a small state machine driven by literal `---` delimiter
/// lines. Inside the frontmatter exactly two keys are recognized (`title`,
/// `labels`); everything else is ignored. A missing closing delimiter is
/// lenient by design: the template comes back with empty title/labels and
/// an empty body rather than an error.
pub fn parse_template(kind: TemplateKind, ordinal: &str, content: &str) -> Template {
    let mut state = ParseState::BeforeFrontmatter;
    let mut title = String::new();
    let mut labels: Vec<String> = Vec::new();
    let mut body_lines: Vec<&str> = Vec::new();

    for line in content.lines() {
        match state {
            ParseState::BeforeFrontmatter => {
                if line.trim_end() == "---" {
                    state = ParseState::InFrontmatter;
                }
                // Anything before the opening delimiter is ignored.
            }
            ParseState::InFrontmatter => {
                if line.trim_end() == "---" {
                    state = ParseState::InBody;
                } else if let Some(rest) = line.strip_prefix("title:") {
                    title = unquote(rest.trim()).to_string();
                } else if let Some(rest) = line.strip_prefix("labels:") {
                    for label in rest.split(',') {
                        let label = label.trim();
                        if !label.is_empty() && !labels.iter().any(|l| l == label) {
                            labels.push(label.to_string());
                        }
                    }
                }
                // Unrecognized frontmatter keys are ignored.
            }
            ParseState::InBody => {
                body_lines.push(line);
            }
        }
    }

    // Missing closing delimiter: drop whatever was parsed, keep going.
    if matches!(state, ParseState::InFrontmatter) {
        title.clear();
        labels.clear();
    }

    Template {
        kind,
        ordinal: ordinal.to_string(),
        title,
        labels,
        body: body_lines.join("\n"),
    }
}

/// Strips one pair of surrounding double quotes, if present.
fn unquote(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) {
        std::fs::write(dir.path().join(name), content).unwrap();
    }

    const TRACKING: &str = "---\ntitle: \"Tracking\"\nlabels: epic, tracking\n---\nAggregates {{IMPL_1}}.\n";
    const IMPL: &str = "---\ntitle: \"Impl\"\nlabels: task\n---\n## Overview\n\nDo the work.\n";

    #[test]
    fn parse_basic_frontmatter() {
        let t = parse_template(TemplateKind::Tracking, "00", TRACKING);
        assert_eq!(t.title, "Tracking");
        assert_eq!(t.labels, vec!["epic", "tracking"]);
        assert_eq!(t.body, "Aggregates {{IMPL_1}}.");
    }

    #[test]
    fn parse_unquoted_title_and_unknown_keys() {
        let content = "---\nassignee: alice\ntitle: Plain title\n---\nbody\n";
        let t = parse_template(TemplateKind::Implementation, "01", content);
        assert_eq!(t.title, "Plain title");
        assert!(t.labels.is_empty());
        assert_eq!(t.body, "body");
    }

    #[test]
    fn labels_trimmed_and_deduplicated() {
        let content = "---\ntitle: \"x\"\nlabels:  a , b,, a ,c\n---\n";
        let t = parse_template(TemplateKind::Implementation, "01", content);
        assert_eq!(t.labels, vec!["a", "b", "c"]);
    }

    #[test]
    fn missing_closing_delimiter_is_lenient() {
        let content = "---\ntitle: \"lost\"\nlabels: a\nno closing delimiter";
        let t = parse_template(TemplateKind::Implementation, "01", content);
        assert_eq!(t.title, "");
        assert!(t.labels.is_empty());
        assert_eq!(t.body, "");
    }

    #[test]
    fn body_preserves_line_breaks_and_delimiters() {
        let content = "---\ntitle: \"x\"\n---\nline one\n\n---\nline two";
        let t = parse_template(TemplateKind::Implementation, "01", content);
        assert_eq!(t.body, "line one\n\n---\nline two");
    }

    #[test]
    fn load_sorts_implementations_by_ordinal() {
        let dir = TempDir::new().unwrap();
        write(&dir, "00_tracking.md", TRACKING);
        write(&dir, "03_late.md", IMPL);
        write(&dir, "01_early.md", IMPL);
        write(&dir, "02_middle.md", IMPL);
        write(&dir, "notes.txt", "ignored");
        write(&dir, "README.md", "no ordinal, ignored");

        let set = load_templates(dir.path()).unwrap();
        assert_eq!(set.tracking.kind, TemplateKind::Tracking);
        let ordinals: Vec<&str> = set
            .implementations
            .iter()
            .map(|t| t.ordinal.as_str())
            .collect();
        assert_eq!(ordinals, vec!["01", "02", "03"]);
    }

    #[test]
    fn load_rejects_duplicate_ordinals() {
        let dir = TempDir::new().unwrap();
        write(&dir, "00_tracking.md", TRACKING);
        write(&dir, "01_a.md", IMPL);
        write(&dir, "01_b.md", IMPL);

        let err = load_templates(dir.path()).unwrap_err();
        assert!(matches!(err, TemplateError::DuplicateOrdinal { ref ordinal, .. } if ordinal == "01"));
    }

    #[test]
    fn load_requires_tracking_template() {
        let dir = TempDir::new().unwrap();
        write(&dir, "01_a.md", IMPL);

        let err = load_templates(dir.path()).unwrap_err();
        assert!(matches!(err, TemplateError::NoTrackingTemplate(_)));
    }

    #[test]
    fn load_rejects_empty_implementation_set() {
        let dir = TempDir::new().unwrap();
        write(&dir, "00_tracking.md", TRACKING);

        let err = load_templates(dir.path()).unwrap_err();
        assert!(matches!(err, TemplateError::EmptyTemplateSet(_)));
    }

    #[test]
    fn load_missing_directory() {
        let err = load_templates(Path::new("/nonexistent/templates")).unwrap_err();
        assert!(matches!(err, TemplateError::DirectoryNotFound(_)));
    }

    #[test]
    fn all_labels_union_preserves_order() {
        let dir = TempDir::new().unwrap();
        write(&dir, "00_tracking.md", TRACKING);
        write(&dir, "01_a.md", IMPL);
        let set = load_templates(dir.path()).unwrap();
        assert_eq!(set.all_labels(), vec!["epic", "tracking", "task"]);
    }
}
