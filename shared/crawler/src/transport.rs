//! Outbound HTTP transport.
//!
//! The crawler never reaches for a global client: every fetch goes through an
//! injected [`Transport`], which keeps retries and timeouts in one place and
//! lets tests count calls.

use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client, Method};
use scout_models::FetchResult;
use scout_utils::{FetcherConfig, ScoutError, ScoutResult};
use tracing::{debug, warn};

#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url`. Non-2xx responses fail with a network error.
    async fn get(&self, url: &str) -> ScoutResult<FetchResult>;

    /// HEAD `url`; the returned body is always empty.
    async fn head(&self, url: &str) -> ScoutResult<FetchResult>;
}

/// reqwest-backed transport with bounded retries on transient failures.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    config: FetcherConfig,
}

impl HttpTransport {
    pub fn new(config: &FetcherConfig) -> ScoutResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ScoutError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn send_with_retry(&self, method: Method, url: &str) -> ScoutResult<FetchResult> {
        let mut attempt = 0;

        loop {
            match self.send(method.clone(), url).await {
                Ok(fetched) => return Ok(fetched),
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.config.backoff(attempt);
                    warn!(%url, %method, attempt, delay_ms = delay.as_millis() as u64, error = %e, "Retrying request");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send(&self, method: Method, url: &str) -> ScoutResult<FetchResult> {
        let mut response = self.client.request(method.clone(), url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoutError::http_status(url, status.as_u16()));
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        if method == Method::HEAD {
            return Ok(FetchResult::new(final_url, status.as_u16(), content_type, Vec::new()));
        }

        let limit = self.config.max_document_bytes;
        if let Some(length) = response.content_length() {
            if length > limit as u64 {
                return Err(exceeds_limit(url, length, limit));
            }
        }

        // Chunked bodies carry no length, so the limit is enforced while reading
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(exceeds_limit(url, (body.len() + chunk.len()) as u64, limit));
            }
            body.extend_from_slice(&chunk);
        }
        debug!(%url, status = status.as_u16(), bytes = body.len(), "Fetched");

        Ok(FetchResult::new(final_url, status.as_u16(), content_type, body))
    }
}

fn exceeds_limit(url: &str, length: u64, limit: usize) -> ScoutError {
    ScoutError::network(url, format!("response of {} bytes exceeds limit of {}", length, limit))
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> ScoutResult<FetchResult> {
        self.send_with_retry(Method::GET, url).await
    }

    async fn head(&self, url: &str) -> ScoutResult<FetchResult> {
        self.send_with_retry(Method::HEAD, url).await
    }
}
