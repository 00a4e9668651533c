//! Scout
//!
//! Ties the fetcher and the validator together: search a source for an
//! identifier, scrape the candidate links, and return the first document
//! that validates.

use scout_models::{
    BatchReport, BatchRequest, FetchResult, Identifier, ReportEntry, ValidationOutcome,
};
use scout_utils::{validate_http_url, AppConfig, ScoutError, ScoutResult, SourcesConfig};
use tracing::{debug, info, warn};
use url::Url;

use crate::fetcher::Fetcher;
use crate::links::{extract_links, has_pdf_path, provider, CandidateFilter};
use crate::transport::{HttpTransport, Transport};
use crate::validator::{DocumentCheck, Validator};

pub struct Scout<T> {
    fetcher: Fetcher<T>,
    validator: Validator,
    sources: SourcesConfig,
}

impl Scout<HttpTransport> {
    /// Build a scout with its own HTTP client.
    pub fn from_config(config: &AppConfig) -> ScoutResult<Self> {
        Ok(Self::new(HttpTransport::new(&config.fetcher)?, config))
    }
}

impl<T: Transport> Scout<T> {
    pub fn new(transport: T, config: &AppConfig) -> Self {
        Self {
            fetcher: Fetcher::new(
                transport,
                config.sources.search_url_template.clone(),
                config.fetcher.max_document_bytes,
            ),
            validator: Validator::new(&config.validation),
            sources: config.sources.clone(),
        }
    }

    pub fn transport(&self) -> &T {
        self.fetcher.transport()
    }

    /// Classify `raw`, search the configured source and validate what it links to.
    ///
    /// Malformed identifiers fail before any request is made.
    pub async fn scout(&self, raw: &str) -> ScoutResult<ValidationOutcome> {
        let identifier = Identifier::parse(raw)?;
        self.scout_identifier(&identifier).await
    }

    pub async fn scout_identifier(&self, identifier: &Identifier) -> ScoutResult<ValidationOutcome> {
        self.search_and_evaluate(identifier, None).await
    }

    /// Scout a caller-supplied page or document instead of the search source.
    pub async fn scout_url(&self, raw: &str, url: &str) -> ScoutResult<ValidationOutcome> {
        let identifier = Identifier::parse(raw)?;
        self.scout_identifier_at(&identifier, url).await
    }

    pub async fn scout_identifier_at(
        &self,
        identifier: &Identifier,
        url: &str,
    ) -> ScoutResult<ValidationOutcome> {
        self.fetch_and_evaluate(identifier, None, url).await
    }

    async fn search_and_evaluate(
        &self,
        identifier: &Identifier,
        also: Option<&Identifier>,
    ) -> ScoutResult<ValidationOutcome> {
        let page = match self.fetcher.search(identifier).await {
            Ok(page) => page,
            Err(ScoutError::NotFound { resource }) => {
                return Ok(ValidationOutcome::not_found(format!("no results: {}", resource)))
            }
            Err(e) => return Err(e),
        };

        let outcome = self.evaluate(identifier, also, page).await;
        info!(identifier = %identifier, status = outcome.status(), "Scout finished");
        Ok(outcome)
    }

    async fn fetch_and_evaluate(
        &self,
        identifier: &Identifier,
        also: Option<&Identifier>,
        url: &str,
    ) -> ScoutResult<ValidationOutcome> {
        validate_http_url(url)?;
        let url = Url::parse(url.trim())
            .map_err(|e| ScoutError::validation("url", format!("{}: {}", url, e)))?;

        let page = self.fetcher.fetch_page(&url).await?;
        let outcome = self.evaluate(identifier, also, page).await;
        info!(identifier = %identifier, url = %url, status = outcome.status(), "Scout finished");
        Ok(outcome)
    }

    /// Validate fetched content: a PDF directly, anything else as a page of
    /// candidate links. Documents must mention `also` too when it is given.
    pub async fn evaluate(
        &self,
        identifier: &Identifier,
        also: Option<&Identifier>,
        fetched: FetchResult,
    ) -> ValidationOutcome {
        if self.validator.processor().looks_like_pdf(&fetched) {
            return self.validator.validate(identifier, also, &fetched).await;
        }

        let base = match Url::parse(&fetched.url) {
            Ok(base) => base,
            Err(e) => return ValidationOutcome::error(format!("invalid page URL {}: {}", fetched.url, e)),
        };

        let links = match extract_links(&fetched.text(), &base) {
            Ok(links) => links,
            Err(e) => return ValidationOutcome::error(e.to_string()),
        };
        let candidates = CandidateFilter::new(&self.sources).select(links);
        debug!(page = %fetched.url, candidates = candidates.len(), "Extracted candidates");

        self.validate_candidates(identifier, also, candidates).await
    }

    /// First validated candidate in source order wins. A corrupt PDF is only
    /// reported when no later candidate validates.
    async fn validate_candidates(
        &self,
        identifier: &Identifier,
        also: Option<&Identifier>,
        candidates: Vec<Url>,
    ) -> ValidationOutcome {
        if candidates.is_empty() {
            return ValidationOutcome::not_found("no candidate documents found");
        }

        let total = candidates.len();
        let mut downloads = 0;
        let mut mismatches = 0;
        let mut failures = 0;
        let mut first_corrupt: Option<String> = None;

        for url in candidates {
            if downloads >= self.sources.max_downloads {
                debug!(limit = self.sources.max_downloads, "Download limit reached");
                break;
            }

            if !self.is_pdf_candidate(&url).await {
                continue;
            }

            downloads += 1;
            let document = match self.fetcher.fetch_document(&url).await {
                Ok(document) => document,
                Err(e) => {
                    warn!(url = %url, error = %e, "Failed to download candidate");
                    failures += 1;
                    continue;
                }
            };

            match self.validator.check(identifier, also, &document).await {
                DocumentCheck::Verified => {
                    info!(identifier = %identifier, url = %document.url, "Verified document");
                    return ValidationOutcome::found(identifier.as_str(), document.url);
                }
                DocumentCheck::Mismatch { missing } => {
                    debug!(url = %url, missing = ?missing, "Document does not match");
                    mismatches += 1;
                }
                DocumentCheck::Corrupt { cause } => {
                    warn!(url = %url, cause = %cause, "Corrupt document");
                    first_corrupt.get_or_insert_with(|| format!("{}: {}", url, cause));
                }
                DocumentCheck::NotPdf => {
                    debug!(url = %url, "Skipping non-PDF download");
                }
            }
        }

        if let Some(cause) = first_corrupt {
            return ValidationOutcome::error(cause);
        }

        if downloads == 0 {
            return ValidationOutcome::not_found(format!("no PDF documents among {} candidate links", total));
        }

        ValidationOutcome::not_found(format!(
            "{} of {} downloaded documents did not mention {} ({} failed to download)",
            mismatches, downloads, identifier, failures
        ))
    }

    async fn is_pdf_candidate(&self, url: &Url) -> bool {
        if has_pdf_path(url) {
            return true;
        }
        if !self.sources.probe_content_type {
            return false;
        }

        match self.fetcher.probe_is_pdf(url).await {
            Ok(is_pdf) => is_pdf,
            Err(e) => {
                debug!(url = %url, error = %e, "Content type probe failed");
                false
            }
        }
    }

    /// Scout every entry of a batch independently and collect the verified documents.
    pub async fn scout_batch(&self, request: &BatchRequest) -> BatchReport {
        let mut report = BatchReport::default();

        for entry in &request.entries {
            let ids = match entry.identifiers() {
                Some(Ok(ids)) => ids,
                Some(Err(e)) => {
                    report.errors.push(format!("{}: {}", entry.label(), e));
                    report.skipped += 1;
                    continue;
                }
                None => {
                    debug!(?entry, "Skipping entry without cas or name");
                    report.skipped += 1;
                    continue;
                }
            };
            let identifier = &ids.primary;
            let also = ids.also.as_ref();

            report.processed += 1;

            let results = match entry.urls.as_deref() {
                Some(urls) if !urls.is_empty() => {
                    let mut results = Vec::with_capacity(urls.len());
                    for url in urls {
                        results.push(self.fetch_and_evaluate(identifier, also, url).await);
                    }
                    results
                }
                _ => vec![self.search_and_evaluate(identifier, also).await],
            };

            for result in results {
                match result {
                    Ok(ValidationOutcome::Found { source_url, .. }) => report.entries.push(ReportEntry {
                        cas: entry.cas.clone(),
                        name: entry.name.clone(),
                        provider: provider(&source_url),
                        verified: true,
                        url: source_url,
                    }),
                    Ok(ValidationOutcome::Error { cause }) => {
                        report.errors.push(format!("{}: {}", identifier, cause))
                    }
                    Ok(ValidationOutcome::NotFound { .. }) => {}
                    Err(e) => report.errors.push(format!("{}: {}", identifier, e)),
                }
            }
        }

        info!(
            processed = report.processed,
            skipped = report.skipped,
            verified = report.entries.len(),
            "Batch finished"
        );
        report
    }
}
