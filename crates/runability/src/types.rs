//! Core data types for song lookups and runability results.

use serde::{Deserialize, Serialize};

/// Duration reported when the page carries no `Duration` entry.
pub const UNKNOWN_DURATION: &str = "Unknown";

/// An artist/title pair identifying the song to look up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongQuery {
    pub artist: String,
    pub title: String,
}

impl SongQuery {
    pub fn new(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: artist.into(),
            title: title.into(),
        }
    }

    /// Reject queries where either field is blank.
    pub fn validate(&self) -> AnalyzeResult<()> {
        if self.artist.trim().is_empty() {
            return Err(AnalyzeError::Validation("artist must not be empty".into()));
        }
        if self.title.trim().is_empty() {
            return Err(AnalyzeError::Validation("title must not be empty".into()));
        }
        Ok(())
    }
}

/// Labels and duration scraped from a song page.
///
/// Every field is `None` when the page lacks the corresponding markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLabels {
    pub energy_label: Option<String>,
    pub danceability_label: Option<String>,
    pub duration: Option<String>,
}

/// A qualitative label found on the page and its table score.
///
/// `score` is `None` when the label is not present in the score table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatedLabel {
    pub label: String,
    pub score: Option<f64>,
}

/// The outcome of one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub duration: String,
    pub runability_score: f64,
    /// `None` when no energy label was found on the page.
    pub energy: Option<RatedLabel>,
    /// `None` when no danceability label was found on the page.
    pub danceability: Option<RatedLabel>,
}

/// Everything that can go wrong while analyzing a song.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Song not found: {0}")]
    SongNotFound(String),

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { status: u16, url: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Upstream timed out: {0}")]
    Timeout(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl AnalyzeError {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            AnalyzeError::Validation(_) => "E_VALIDATION",
            AnalyzeError::SongNotFound(_) => "E_SONG_NOT_FOUND",
            AnalyzeError::UpstreamStatus { .. } => "E_UPSTREAM_STATUS",
            AnalyzeError::Network(_) => "E_NETWORK",
            AnalyzeError::Timeout(_) => "E_TIMEOUT",
            AnalyzeError::Parse(_) => "E_PARSE",
        }
    }
}

/// Convenience result type.
pub type AnalyzeResult<T> = Result<T, AnalyzeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_display_strings() {
        assert!(SongQuery::new("Taylor Swift", "Anti-Hero").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let err = SongQuery::new("  ", "Anti-Hero").validate().unwrap_err();
        assert!(matches!(err, AnalyzeError::Validation(_)));

        let err = SongQuery::new("Taylor Swift", "").validate().unwrap_err();
        assert_eq!(err.code(), "E_VALIDATION");
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            AnalyzeError::Validation(String::new()),
            AnalyzeError::SongNotFound(String::new()),
            AnalyzeError::UpstreamStatus {
                status: 500,
                url: String::new(),
            },
            AnalyzeError::Network(String::new()),
            AnalyzeError::Timeout(String::new()),
            AnalyzeError::Parse(String::new()),
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
