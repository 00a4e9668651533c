//! Source selection and fetching for a classified identifier.

use scout_models::{FetchResult, Identifier};
use scout_utils::{ScoutError, ScoutResult};
use tracing::{debug, info};
use url::{form_urlencoded, Url};

use crate::transport::Transport;

const QUERY_PLACEHOLDER: &str = "{query}";

pub struct Fetcher<T> {
    transport: T,
    search_url_template: String,
    max_document_bytes: usize,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, search_url_template: impl Into<String>, max_document_bytes: usize) -> Self {
        Self {
            transport,
            search_url_template: search_url_template.into(),
            max_document_bytes,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Search URL for an identifier: the configured template with the
    /// URL-encoded query substituted for `{query}`.
    pub fn search_url(&self, identifier: &Identifier) -> ScoutResult<Url> {
        if !self.search_url_template.contains(QUERY_PLACEHOLDER) {
            return Err(ScoutError::configuration(format!(
                "search URL template has no {} placeholder: {}",
                QUERY_PLACEHOLDER, self.search_url_template
            )));
        }

        let encoded: String = form_urlencoded::byte_serialize(identifier.search_query().as_bytes()).collect();
        let url = self.search_url_template.replace(QUERY_PLACEHOLDER, &encoded);

        Url::parse(&url).map_err(|e| ScoutError::configuration(format!("invalid search URL {}: {}", url, e)))
    }

    /// Fetch the search results page for an identifier.
    ///
    /// An empty page means the source answered but had nothing for us.
    pub async fn search(&self, identifier: &Identifier) -> ScoutResult<FetchResult> {
        let url = self.search_url(identifier)?;
        info!(identifier = %identifier, kind = ?identifier.kind(), url = %url, "Searching source");

        let fetched = self.transport.get(url.as_str()).await?;
        if fetched.body.iter().all(u8::is_ascii_whitespace) {
            return Err(ScoutError::not_found(format!("search results for {}", identifier)));
        }

        Ok(fetched)
    }

    /// Fetch a caller-supplied page or document.
    pub async fn fetch_page(&self, url: &Url) -> ScoutResult<FetchResult> {
        self.transport.get(url.as_str()).await
    }

    /// Download a candidate document, enforcing the size limit even when the
    /// server sent no Content-Length.
    pub async fn fetch_document(&self, url: &Url) -> ScoutResult<FetchResult> {
        let fetched = self.transport.get(url.as_str()).await?;

        if fetched.body.len() > self.max_document_bytes {
            return Err(ScoutError::network(
                url.as_str(),
                format!(
                    "document of {} bytes exceeds limit of {}",
                    fetched.body.len(),
                    self.max_document_bytes
                ),
            ));
        }

        debug!(url = %url, bytes = fetched.body.len(), "Downloaded candidate");
        Ok(fetched)
    }

    /// HEAD a link and report whether it serves `application/pdf`.
    pub async fn probe_is_pdf(&self, url: &Url) -> ScoutResult<bool> {
        let head = self.transport.head(url.as_str()).await?;
        Ok(head.media_type().as_deref() == Some("application/pdf"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::HttpTransport;
    use httpmock::prelude::*;
    use scout_utils::FetcherConfig;

    fn fetcher(template: &str) -> Fetcher<HttpTransport> {
        let transport = HttpTransport::new(&FetcherConfig::default()).unwrap();
        Fetcher::new(transport, template, 1024)
    }

    #[test]
    fn test_search_url_encodes_query() {
        let fetcher = fetcher("https://search.test/html/?q={query}");
        let id = Identifier::parse("50-00-0").unwrap();

        let url = fetcher.search_url(&id).unwrap();
        assert_eq!(
            url.as_str(),
            "https://search.test/html/?q=%2250-00-0%22+filetype%3Apdf"
        );

        let query: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(query, vec![("q".to_string(), "\"50-00-0\" filetype:pdf".to_string())]);
    }

    #[test]
    fn test_search_url_requires_placeholder() {
        let fetcher = fetcher("https://search.test/html/");
        let id = Identifier::parse("acetone").unwrap();

        let err = fetcher.search_url(&id).unwrap_err();
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_empty_search_page_is_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/search");
                then.status(200).body("  \n");
            })
            .await;

        let fetcher = fetcher(&format!("{}?q={{query}}", server.url("/search")));
        let id = Identifier::parse("acetone").unwrap();

        let err = fetcher.search(&id).await.unwrap_err();
        assert!(matches!(err, ScoutError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_probe_reads_content_type() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(httpmock::Method::HEAD).path("/download");
                then.status(200).header("Content-Type", "application/pdf");
            })
            .await;

        let fetcher = fetcher("https://search.test/?q={query}");
        let url = Url::parse(&server.url("/download")).unwrap();

        assert!(fetcher.probe_is_pdf(&url).await.unwrap());
    }
}
