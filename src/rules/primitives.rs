//! Pure text-rewriting building blocks
//!
//! Replacement text is always inserted literally; `$` in a snippet is never
//! treated as a capture reference.

use regex::{NoExpand, Regex};

/// How many matches a pattern rewrite touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occurrences {
    First,
    All,
}

/// Replace every verbatim occurrence of `from` with `to`
pub fn replace_literal(contents: &str, from: &str, to: &str) -> String {
    contents.replace(from, to)
}

/// Replace matches of `pattern` with the literal `replacement`
pub fn replace_pattern(
    contents: &str,
    pattern: &Regex,
    replacement: &str,
    occurrences: Occurrences,
) -> String {
    match occurrences {
        Occurrences::First => pattern.replace(contents, NoExpand(replacement)),
        Occurrences::All => pattern.replace_all(contents, NoExpand(replacement)),
    }
    .into_owned()
}

/// Apply pattern/replacement pairs in order unless `marker` is present
///
/// The marker check is a plain substring search over the whole text, so a
/// marker sitting in a comment also suppresses the rewrite. Each pair sees
/// the output of the previous one.
pub fn guarded_rewrite(contents: &str, marker: &str, rewrites: &[(&Regex, &str)]) -> String {
    if contents.contains(marker) {
        return contents.to_string();
    }

    rewrites
        .iter()
        .fold(contents.to_string(), |text, (pattern, replacement)| {
            replace_pattern(&text, pattern, replacement, Occurrences::All)
        })
}
