//! Line splice primitives
//!
//! Generic helpers for inserting a snippet into a document at a 1-based line
//! boundary. The snippet is trimmed of surrounding blank lines and spliced as
//! a single element, so the rejoin leaves exactly one blank line between the
//! snippet and the neighbor it was anchored against — the separator
//! convention every insertion operation relies on.
//!
//! Only `\n` separators are introduced by these helpers; existing `\r`s in
//! the document pass through untouched.

use std::borrow::Cow;

/// Insert `to_insert` so it ends up immediately before `line`, followed by a
/// blank line.
///
/// Out-of-range lines clamp to the document edges.
#[must_use]
pub fn insert_before_line(target: &str, to_insert: &str, line: usize) -> String {
    let mut lines: Vec<Cow<'_, str>> = target.split('\n').map(Cow::Borrowed).collect();
    let element = format!("{}\n", trim_blank(to_insert));
    let index = line.saturating_sub(1).min(lines.len());
    lines.insert(index, Cow::Owned(element));
    lines.join("\n")
}

/// Insert `to_insert` immediately after `line`, optionally preceded by a
/// blank line.
///
/// Out-of-range lines clamp to the document edges.
#[must_use]
pub fn insert_after_line(target: &str, to_insert: &str, line: usize, leading_newline: bool) -> String {
    let mut lines: Vec<Cow<'_, str>> = target.split('\n').map(Cow::Borrowed).collect();
    let trimmed = trim_blank(to_insert);
    let element = if leading_newline {
        format!("\n{trimmed}")
    } else {
        trimmed.to_string()
    };
    let index = line.min(lines.len());
    lines.insert(index, Cow::Owned(element));
    lines.join("\n")
}

/// Strip surrounding newline characters from a snippet.
pub(crate) fn trim_blank(text: &str) -> &str {
    text.trim_matches(['\n', '\r'])
}
