//! Cleaning of bilingual fire cause text.
//!
//! Agency cause strings look like `"Lightning (Final) / Foudre (Final)"`.
//! Only the English half is kept, and a trailing `(Final)` qualifier is
//! dropped. A `(Final)` in the middle of the text is part of the cause and
//! stays.

use std::sync::LazyLock;

use regex::Regex;

/// Separator between the English and French halves.
pub const BILINGUAL_SEPARATOR: &str = " / ";

// Repeated qualifiers are stripped together so cleaning is idempotent.
static TRAILING_FINAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\s*\(final\))+\s*$").unwrap_or_else(|_| unreachable!())
});

/// Returns the canonical English cause, or `None` when nothing meaningful
/// remains.
#[must_use]
pub fn clean_cause(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if is_blank(trimmed) {
        return None;
    }

    let english = trimmed
        .split(BILINGUAL_SEPARATOR)
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned = TRAILING_FINAL.replace(english, "");
    let cleaned = cleaned.trim();

    if is_blank(cleaned) {
        None
    } else {
        Some(cleaned.to_string())
    }
}

fn is_blank(s: &str) -> bool {
    s.is_empty() || s == "/" || s == BILINGUAL_SEPARATOR
}

/// Whether a cleaned cause is an explicit "unknown" rather than a real
/// cause.
#[must_use]
pub fn is_unknown_cause(cause: &str) -> bool {
    cause.to_lowercase().contains("unknown")
}
