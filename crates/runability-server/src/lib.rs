//! Runability server — HTTP API for song runability lookups and the
//! song library.

pub mod config;
pub mod fetch;
pub mod library;
pub mod rest;

use std::sync::Arc;

use runability::{Analyzer, PageFetcher, ScoreTables};

pub use config::{ConfigOverrides, ServerConfig};
pub use fetch::HttpFetcher;
pub use library::SongLibrary;
pub use rest::{router, AppState};

/// Build an analyzer backed by the real HTTP fetcher.
pub fn http_analyzer(config: &ServerConfig) -> anyhow::Result<Analyzer<Arc<dyn PageFetcher>>> {
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpFetcher::new(config.timeout())?);
    Ok(Analyzer::new(
        fetcher,
        Arc::new(ScoreTables::default()),
        config.lookup_base.clone(),
    ))
}

/// Open the library, wire up the analyzer and serve until shutdown.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let analyzer = http_analyzer(&config)?;
    let library = SongLibrary::open(&config.db_path)?;

    tracing::info!("Lookup base: {}", analyzer.lookup_base());
    tracing::info!("Upstream timeout: {} ms", config.timeout_ms);
    tracing::info!(
        "Song library: {} ({} songs)",
        config.db_path,
        library.count()?
    );
    let state = Arc::new(AppState::new(analyzer, library));

    rest::start(&config.addr, state).await
}
