use serde::{Deserialize, Serialize};

use crate::{score, Timestamp};

/// Metadata snapshot of one note file, taken at scan time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NoteEntry {
    pub name: String,
    pub created_at: Option<Timestamp>,
    pub modified_at: Option<Timestamp>,
}

impl NoteEntry {
    pub fn new(
        name: impl Into<String>,
        created_at: Option<Timestamp>,
        modified_at: Option<Timestamp>,
    ) -> Self {
        Self {
            name: name.into(),
            created_at,
            modified_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoredEntry {
    #[serde(flatten)]
    pub entry: NoteEntry,
    pub score: f64,
}

/// Score and rank `entries` for `query`.
///
/// With a non-empty query, entries scoring `<= 0` are dropped. Results are
/// sorted by descending score; ties keep their input order.
pub fn search<I>(query: &str, entries: I, now: Timestamp) -> Vec<ScoredEntry>
where
    I: IntoIterator<Item = NoteEntry>,
{
    let mut scored: Vec<ScoredEntry> = entries
        .into_iter()
        .filter_map(|entry| {
            let relevance = score(
                &entry.name,
                query,
                entry.created_at,
                entry.modified_at,
                now,
            );
            (query.is_empty() || relevance > 0.0).then_some(ScoredEntry {
                entry,
                score: relevance,
            })
        })
        .collect();

    // `sort_by` is stable, which keeps enumeration order for equal scores.
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}
