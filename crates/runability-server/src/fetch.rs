//! Song page fetcher wrapping reqwest.
//!
//! One GET per lookup with a bounded timeout and no retry. Failures are
//! classified so the API can report them honestly.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use runability::{AnalyzeError, AnalyzeResult, PageFetcher};

/// HTTP client for song pages.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .user_agent(concat!("runability/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> AnalyzeResult<String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AnalyzeError::SongNotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(AnalyzeError::UpstreamStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.text().await.map_err(|e| classify(url, e))?;
        if body.trim().is_empty() {
            return Err(AnalyzeError::Parse(format!(
                "upstream returned an empty document for {url}"
            )));
        }

        tracing::debug!("Fetched {} bytes from {url}", body.len());
        Ok(body)
    }
}

/// Map a transport-level reqwest error onto the analysis error taxonomy.
fn classify(url: &str, e: reqwest::Error) -> AnalyzeError {
    if e.is_timeout() {
        AnalyzeError::Timeout(url.to_string())
    } else if e.is_builder() {
        AnalyzeError::Validation(format!("cannot request {url}: {e}"))
    } else if e.is_decode() {
        AnalyzeError::Parse(format!("{url}: {e}"))
    } else {
        AnalyzeError::Network(format!("{url}: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_fetcher_creation() {
        assert!(HttpFetcher::new(Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn test_unparseable_url_is_a_validation_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();
        let err = fetcher.fetch("not a url/@a/b").await.unwrap_err();
        assert!(matches!(err, AnalyzeError::Validation(_)), "{err:?}");
    }

    #[tokio::test]
    async fn test_connection_refused_is_a_network_error() {
        // Bind then drop a listener so the port is known to be closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        let err = fetcher
            .fetch(&format!("http://127.0.0.1:{port}/@a/b"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E_NETWORK", "{err:?}");
    }
}
