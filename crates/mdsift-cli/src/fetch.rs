//! URL fetching with retry and bounded concurrency.
//!
//! Transient failures (network errors, 5xx, 429) retry with exponential
//! backoff; a definitive client error fails immediately. The conversion core
//! is invoked by the caller once per successful fetch; nothing here shares
//! state across requests.

use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use rand::seq::IndexedRandom;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::redirect::Policy;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Fetch configuration.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout: Duration,
    /// Additional attempts after the first.
    pub retries: u32,
    /// First backoff delay; doubles per attempt.
    pub backoff_base: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 2,
            backoff_base: Duration::from_secs(1),
        }
    }
}

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    /// URL after redirects; used as the conversion base URL.
    pub final_url: String,
    pub status: u16,
    pub html: String,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    /// A definitive client error; retrying cannot help.
    #[error("HTTP {status}")]
    Definitive { status: u16 },

    #[error("failed after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: String },
}

enum AttemptError {
    Definitive(u16),
    Transient(String),
}

pub struct Fetcher {
    client: reqwest::Client,
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .redirect(Policy::limited(5))
            .build()
            .map_err(FetchError::Client)?;
        Ok(Self { client, options })
    }

    /// Fetch one URL, retrying transient failures with exponential backoff.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut last = String::new();

        for attempt in 0..=self.options.retries {
            match self.attempt(url).await {
                Ok(page) => return Ok(page),
                Err(AttemptError::Definitive(status)) => {
                    return Err(FetchError::Definitive { status });
                }
                Err(AttemptError::Transient(reason)) => {
                    tracing::debug!(url, attempt, %reason, "fetch attempt failed");
                    last = reason;
                    if attempt < self.options.retries {
                        tokio::time::sleep(self.options.backoff_base * 2u32.pow(attempt)).await;
                    }
                }
            }
        }

        Err(FetchError::Exhausted {
            attempts: self.options.retries + 1,
            last,
        })
    }

    async fn attempt(&self, url: &str) -> Result<FetchedPage, AttemptError> {
        let agent = USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(USER_AGENTS[0]);

        let response = self
            .client
            .get(url)
            .header(USER_AGENT, agent)
            .header(ACCEPT, ACCEPT_HTML)
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.5")
            .send()
            .await
            .map_err(|err| AttemptError::Transient(err.to_string()))?;

        let status = response.status();
        if status.is_client_error() && status.as_u16() != 429 {
            return Err(AttemptError::Definitive(status.as_u16()));
        }
        if !(status.is_success() || status.is_redirection()) {
            return Err(AttemptError::Transient(format!("HTTP {status}")));
        }

        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|err| AttemptError::Transient(err.to_string()))?;

        Ok(FetchedPage {
            url: url.to_string(),
            final_url,
            status: status.as_u16(),
            html,
        })
    }

    /// Fetch many URLs with at most `concurrency` requests in flight,
    /// yielding results in input order.
    pub fn fetch_many<'a>(
        &'a self,
        urls: &'a [String],
        concurrency: usize,
    ) -> impl Stream<Item = (String, Result<FetchedPage, FetchError>)> + 'a {
        stream::iter(urls.iter().cloned())
            .map(move |url| async move {
                let outcome = self.fetch(&url).await;
                (url, outcome)
            })
            .buffered(concurrency.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quick_options() -> FetchOptions {
        FetchOptions {
            timeout: Duration::from_secs(5),
            retries: 1,
            backoff_base: Duration::from_millis(5),
        }
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .with_status(200)
            .with_body("<html><body><p>Hi</p></body></html>")
            .create_async()
            .await;

        let fetcher = Fetcher::new(quick_options()).expect("client");
        let page = fetcher
            .fetch(&format!("{}/page", server.url()))
            .await
            .expect("fetch");

        assert_eq!(page.status, 200);
        assert!(page.html.contains("Hi"));
        assert!(page.final_url.ends_with("/page"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_definitive_client_error_does_not_retry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .expect(1)
            .create_async()
            .await;

        let fetcher = Fetcher::new(quick_options()).expect("client");
        let err = fetcher
            .fetch(&format!("{}/missing", server.url()))
            .await
            .expect_err("should fail");

        assert!(matches!(err, FetchError::Definitive { status: 404 }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transient_error_exhausts_retries() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/flaky")
            .with_status(500)
            .expect(2)
            .create_async()
            .await;

        let fetcher = Fetcher::new(quick_options()).expect("client");
        let err = fetcher
            .fetch(&format!("{}/flaky", server.url()))
            .await
            .expect_err("should fail");

        assert!(matches!(err, FetchError::Exhausted { attempts: 2, .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_many_preserves_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock_a = server
            .mock("GET", "/a")
            .with_status(200)
            .with_body("A")
            .create_async()
            .await;
        let _mock_b = server
            .mock("GET", "/b")
            .with_status(200)
            .with_body("B")
            .create_async()
            .await;

        let fetcher = Fetcher::new(quick_options()).expect("client");
        let urls = vec![
            format!("{}/a", server.url()),
            format!("{}/b", server.url()),
        ];
        let results: Vec<_> = fetcher.fetch_many(&urls, 2).collect().await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, urls[0]);
        assert_eq!(results[1].0, urls[1]);
        assert_eq!(results[0].1.as_ref().expect("page a").html, "A");
        assert_eq!(results[1].1.as_ref().expect("page b").html, "B");
    }
}
