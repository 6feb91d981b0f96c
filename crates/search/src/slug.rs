/// Title used when the user does not provide one.
pub const DEFAULT_TITLE: &str = "note";

/// Convert a free-text title into a lowercase hyphenated token
/// (e.g. "Weekly Sync: Product" -> "weekly-sync-product").
///
/// Every run of characters outside `[a-z0-9]` collapses into a single hyphen and
/// leading/trailing hyphens are dropped, so punctuation-only input yields `""`.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
