//! The lookup pipeline: build URL, fetch, extract, score.
//!
//! HTML parsing runs on the blocking pool via `spawn_blocking`, so
//! [`Analyzer::analyze`] must be awaited inside a tokio runtime.

use std::sync::Arc;

use async_trait::async_trait;

use crate::extract::extract_labels;
use crate::score::ScoreTables;
use crate::types::{AnalysisResult, AnalyzeError, AnalyzeResult, SongQuery};
use crate::url::build_lookup_url;

/// Source of song page HTML.
///
/// Implementations issue a single GET and classify failures into
/// [`AnalyzeError`](crate::AnalyzeError) variants.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> AnalyzeResult<String>;
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Arc<F> {
    async fn fetch(&self, url: &str) -> AnalyzeResult<String> {
        (**self).fetch(url).await
    }
}

/// Runs the lookup pipeline against a fetcher and a fixed set of score tables.
pub struct Analyzer<F> {
    fetcher: F,
    tables: Arc<ScoreTables>,
    lookup_base: String,
}

impl<F: PageFetcher> Analyzer<F> {
    pub fn new(fetcher: F, tables: Arc<ScoreTables>, lookup_base: impl Into<String>) -> Self {
        Self {
            fetcher,
            tables,
            lookup_base: lookup_base.into(),
        }
    }

    pub fn lookup_base(&self) -> &str {
        &self.lookup_base
    }

    /// Analyze one song.
    pub async fn analyze(&self, query: &SongQuery) -> AnalyzeResult<AnalysisResult> {
        query.validate()?;

        let url = build_lookup_url(&self.lookup_base, query);
        tracing::debug!("Fetching song page {url}");

        let html = self.fetcher.fetch(&url).await.inspect_err(|e| {
            tracing::warn!("Lookup failed for {url}: {e}");
        })?;

        let labels = tokio::task::spawn_blocking(move || extract_labels(&html))
            .await
            .map_err(|e| AnalyzeError::Parse(format!("extraction task failed: {e}")))?;
        tracing::debug!(
            energy = ?labels.energy_label,
            danceability = ?labels.danceability_label,
            duration = ?labels.duration,
            "Extracted labels"
        );

        let result = self.tables.score(labels);
        tracing::info!(
            "{} - {}: runability {:.4}, duration {}",
            query.artist,
            query.title,
            result.runability_score,
            result.duration
        );
        Ok(result)
    }
}
