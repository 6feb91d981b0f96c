//! Relevance scoring for a single note name.
//!
//! The score is a weighted sum: a bonus for notes dated in the current year, an
//! fzf-style subsequence match against the query, and inverse-square-root
//! decay terms for creation and modification time.

use crate::Timestamp;

/// Added when the name starts with the current year followed by `-`.
pub const CURRENT_YEAR_BONUS: f64 = 2.0;
/// Added per matched query character.
pub const MATCH_WEIGHT: f64 = 1.0;
/// Added when a match starts a word (index 0 or after a non-alphanumeric).
pub const WORD_BOUNDARY_BONUS: f64 = 1.0;
/// Numerator of the `1 / sqrt(gap + 1)` proximity term between matches.
pub const PROXIMITY_WEIGHT: f64 = 1.0;
/// Name length at which the length normalization halves the text score.
pub const LENGTH_DAMPING: f64 = 10.0;
/// Numerator of the creation decay, measured in days.
pub const CREATED_WEIGHT: f64 = 2.0;
/// Numerator of the modification decay, measured in hours.
pub const MODIFIED_WEIGHT: f64 = 3.0;

/// Score `name` against `query` at time `now`.
///
/// Returns exactly `0.0` when `query` is non-empty and its characters do not all
/// occur in `name` in order (case-insensitively). An empty query skips text
/// matching and ranks by the year bonus and recency alone. Timestamps that are
/// absent or zero contribute nothing; timestamps after `now` score as `now`.
pub fn score(
    name: &str,
    query: &str,
    created_at: Option<Timestamp>,
    modified_at: Option<Timestamp>,
    now: Timestamp,
) -> f64 {
    let mut total = 0.0;

    if has_current_year_prefix(name, now) {
        total += CURRENT_YEAR_BONUS;
    }

    if !query.is_empty() {
        match subsequence_score(name, query, total) {
            Some(text_score) => total = text_score,
            None => return 0.0,
        }
    }

    // Times ahead of `now` (clock skew, copied files) count as "just now".
    if let Some(created) = created_at.filter(|ts| !ts.is_zero()) {
        let days = created.days_until(now).max(0.0);
        total += CREATED_WEIGHT / (days + 1.0).sqrt();
    }
    if let Some(modified) = modified_at.filter(|ts| !ts.is_zero()) {
        let hours = modified.hours_until(now).max(0.0);
        total += MODIFIED_WEIGHT / (hours + 1.0).sqrt();
    }

    total
}

fn has_current_year_prefix(name: &str, now: Timestamp) -> bool {
    now.local_year()
        .is_some_and(|year| name.starts_with(&format!("{year:04}-")))
}

/// Walk `name` and `query` together, accumulating onto `base`.
///
/// Both normalizations apply to the whole accumulated value, year bonus
/// included. `None` means some query character was left unmatched.
fn subsequence_score(name: &str, query: &str, base: f64) -> Option<f64> {
    let haystack: Vec<char> = name.chars().flat_map(char::to_lowercase).collect();
    let needle: Vec<char> = query.chars().flat_map(char::to_lowercase).collect();

    let mut total = base;
    let mut matched = 0usize;
    let mut last_pos: Option<usize> = None;

    for (pos, &ch) in haystack.iter().enumerate() {
        if matched == needle.len() {
            break;
        }
        if ch != needle[matched] {
            continue;
        }

        total += MATCH_WEIGHT;
        if pos == 0 || !haystack[pos - 1].is_alphanumeric() {
            total += WORD_BOUNDARY_BONUS;
        }
        if let Some(prev) = last_pos {
            let gap = (pos - prev - 1) as f64;
            total += PROXIMITY_WEIGHT / (gap + 1.0).sqrt();
        }
        last_pos = Some(pos);
        matched += 1;
    }

    if matched < needle.len() {
        return None;
    }

    if let Some(last) = last_pos {
        total *= needle.len() as f64 / (last + 1) as f64;
    }

    let name_len = name.chars().count() as f64;
    Some(total * (LENGTH_DAMPING / (name_len + LENGTH_DAMPING)))
}
