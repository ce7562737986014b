//! Function prototype reconstruction for `FUNCTION` tags.
//!
//! The source language is never parsed; a declaration is recognised only by
//! its shape: return-type characters, the identifier, and a parameter list
//! that may wrap onto following lines.

use regex::Regex;

/// Lines searched for the identifier after a tag body
pub const SEARCH_WINDOW: usize = 20;

/// Lines after the matching line that may hold the rest of the declaration
pub const DECLARATION_SPAN: usize = 5;

/// Find the declaration of `identifier` starting at line `start`.
///
/// Returns the prototype text, or `None` when the identifier does not appear
/// in the window or the matching block does not look like a declaration.
pub fn extract_signature(lines: &[&str], start: usize, identifier: &str) -> Option<String> {
    if identifier.is_empty() || start >= lines.len() {
        return None;
    }

    let escaped = regex::escape(identifier);
    let word = Regex::new(&format!(r"\b{}\b", escaped)).ok()?;

    let end = (start + SEARCH_WINDOW).min(lines.len());
    // Statement separators are masked before the word search
    let offset = lines[start..end]
        .iter()
        .position(|line| word.is_match(&line.replace(';', "#")))?;

    let first = start + offset;
    let last = (first + DECLARATION_SPAN).min(lines.len() - 1);
    let block = lines[first..=last].join("\n");

    let declaration = Regex::new(&format!(
        r"^[ \t]*(?:[a-zA-Z_][a-zA-Z0-9_* \t\n]*)?\b{}\b[ \t\n]*\([ \t\na-zA-Z_0-9*,.]*\)?",
        escaped
    ))
    .ok()?;

    declaration.find(&block).map(|m| m.as_str().to_string())
}
