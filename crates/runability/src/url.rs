//! Lookup URL derivation.

use crate::types::SongQuery;

/// Host serving the song-information pages.
pub const DEFAULT_LOOKUP_BASE: &str = "https://songbpm.com";

/// Lowercase a display string and replace every space with a hyphen.
///
/// No other characters are touched; input is trusted as-is.
pub fn slugify(segment: &str) -> String {
    segment.to_lowercase().replace(' ', "-")
}

/// Build the page URL for a song: `{base}/@{artist}/{title}`.
pub fn build_lookup_url(base: &str, query: &SongQuery) -> String {
    format!(
        "{}/@{}/{}",
        base.trim_end_matches('/'),
        slugify(&query.artist),
        slugify(&query.title)
    )
}
