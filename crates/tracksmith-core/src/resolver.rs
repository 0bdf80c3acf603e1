//! Placeholder resolver -- rewrites `{{IMPL_n}}` references to issue numbers.
//!
//! Template text may forward-reference implementation issues that do not
//! exist yet. After pass 1 has created them, [`resolve`] rewrites every
//! placeholder into the concrete cross-reference form (`#42`). Resolution is
//! idempotent because resolved text contains no placeholder syntax.

use serde::Serialize;

use crate::IssueNumber;
use crate::error::ResolveError;

/// The mapping from 1-based sequence position (ascending-ordinal processing
/// order of implementation templates) to the issue number the tracker
/// assigned in pass 1.
///
/// Built incrementally during creation, read-only during resolution, and
/// owned by the orchestrator for the duration of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Assignment {
    numbers: Vec<IssueNumber>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an assignment from already-known numbers (synthetic runs, tests).
    pub fn from_numbers(numbers: Vec<IssueNumber>) -> Self {
        Self { numbers }
    }

    /// Records the issue number for the next sequence position.
    pub fn record(&mut self, number: IssueNumber) {
        self.numbers.push(number);
    }

    /// Returns the issue number at the given 1-based position.
    pub fn get(&self, position: usize) -> Option<IssueNumber> {
        if position == 0 {
            return None;
        }
        self.numbers.get(position - 1).copied()
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// All assigned numbers in sequence order.
    pub fn numbers(&self) -> &[IssueNumber] {
        &self.numbers
    }
}

/// A reference matched inside double braces.
enum Reference {
    /// `{{IMPL_n}}` -- 1-based position into the assignment.
    Sequence(usize),
    /// `{{123}}` -- an already-numeric reference, normalized to `#123`.
    Literal(IssueNumber),
}

/// Replace every placeholder in `text` with its cross-reference form.
///
/// Two patterns are rewritten:
///
/// - `{{IMPL_n}}` becomes `#<assignment[n]>`
/// - `{{123}}` becomes `#123`
///
/// A `#` sigil immediately preceding either pattern is absorbed, so the
/// declaration form `#{{IMPL_1}}` resolves to `#41` rather than `##41`.
/// Text containing no placeholder syntax is returned unchanged, which makes
/// resolution idempotent.
///
/// # Errors
///
/// Returns [`ResolveError::UnresolvedPlaceholder`] when `{{IMPL_n}}` names a
/// position outside the assignment. Callers must only resolve after all of
/// pass 1 has completed.
pub fn resolve(text: &str, assignment: &Assignment) -> Result<String, ResolveError> {
    let bytes = text.as_bytes();
    let len = bytes.len();
    let mut out = String::with_capacity(len);
    let mut flushed = 0;
    let mut i = 0;

    while i < len {
        if bytes[i] == b'#' || bytes[i] == b'{' {
            let brace = if bytes[i] == b'#' { i + 1 } else { i };
            let matched = if brace + 1 < len && bytes[brace] == b'{' && bytes[brace + 1] == b'{' {
                match_reference(text, brace)
            } else {
                None
            };
            if let Some((end, reference)) = matched {
                let number = match reference {
                    Reference::Sequence(n) => {
                        assignment
                            .get(n)
                            .ok_or(ResolveError::UnresolvedPlaceholder {
                                index: n,
                                assigned: assignment.len(),
                            })?
                    }
                    Reference::Literal(n) => n,
                };
                out.push_str(&text[flushed..i]);
                out.push_str(&crate::cross_reference(number));
                flushed = end;
                i = end;
                continue;
            }
        }
        i += 1;
    }

    out.push_str(&text[flushed..]);
    Ok(out)
}

/// Try to match a reference starting at the `{{` at byte offset `start`.
///
/// Returns the byte offset just past the closing `}}` and the parsed
/// reference, or `None` if the braces do not contain a recognized pattern
/// (such text is left verbatim).
fn match_reference(text: &str, start: usize) -> Option<(usize, Reference)> {
    let bytes = text.as_bytes();
    let len = bytes.len();

    let mut j = start + 2;
    let is_sequence = text[j..].starts_with("IMPL_");
    if is_sequence {
        j += 5;
    }

    let digits_start = j;
    while j < len && bytes[j].is_ascii_digit() {
        j += 1;
    }
    if j == digits_start {
        return None;
    }
    if j + 1 >= len || bytes[j] != b'}' || bytes[j + 1] != b'}' {
        return None;
    }

    let digits = &text[digits_start..j];
    let end = j + 2;
    if is_sequence {
        Some((end, Reference::Sequence(digits.parse().ok()?)))
    } else {
        Some((end, Reference::Literal(digits.parse().ok()?)))
    }
}
