//! Document validation: is this PDF well-formed and about this identifier?

use scout_models::{FetchResult, Identifier, ValidationOutcome};
use scout_utils::ValidationConfig;
use tracing::debug;

use crate::pdf::PdfProcessor;

/// What a single candidate document turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentCheck {
    /// Parsed, and every expected term was present.
    Verified,
    /// Parsed, but these expected terms were missing.
    Mismatch { missing: Vec<String> },
    /// Claimed to be a PDF but could not be parsed.
    Corrupt { cause: String },
    /// Not a PDF at all.
    NotPdf,
}

#[derive(Debug, Clone, Default)]
pub struct Validator {
    processor: PdfProcessor,
    required_phrases: Vec<String>,
}

impl Validator {
    pub fn new(config: &ValidationConfig) -> Self {
        Self {
            processor: PdfProcessor::new(),
            required_phrases: config
                .required_phrases
                .iter()
                .map(|p| normalize(p))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn processor(&self) -> &PdfProcessor {
        &self.processor
    }

    /// Check one document. `also` is a second identifier, such as the
    /// substance name next to a CAS number, that must appear as well.
    pub async fn check(
        &self,
        identifier: &Identifier,
        also: Option<&Identifier>,
        fetched: &FetchResult,
    ) -> DocumentCheck {
        if !self.processor.looks_like_pdf(fetched) {
            return DocumentCheck::NotPdf;
        }

        match self.processor.extract_text(fetched.body.clone()).await {
            Ok(text) => match self.missing_terms(identifier, also, &text) {
                missing if missing.is_empty() => DocumentCheck::Verified,
                missing => DocumentCheck::Mismatch { missing },
            },
            Err(e) => DocumentCheck::Corrupt {
                cause: e.to_string(),
            },
        }
    }

    /// Validate one fetched document on its own.
    pub async fn validate(
        &self,
        identifier: &Identifier,
        also: Option<&Identifier>,
        fetched: &FetchResult,
    ) -> ValidationOutcome {
        let outcome = match self.check(identifier, also, fetched).await {
            DocumentCheck::Verified => ValidationOutcome::found(identifier.as_str(), &fetched.url),
            DocumentCheck::Mismatch { missing } => ValidationOutcome::not_found(format!(
                "document does not mention {}",
                missing.join(", ")
            )),
            DocumentCheck::Corrupt { cause } => ValidationOutcome::error(cause),
            DocumentCheck::NotPdf => ValidationOutcome::not_found("document is not a PDF"),
        };

        debug!(identifier = %identifier, url = %fetched.url, status = outcome.status(), "Validated document");
        outcome
    }

    /// Expected terms absent from `text`, compared case-insensitively with
    /// whitespace collapsed.
    pub fn missing_terms(&self, identifier: &Identifier, also: Option<&Identifier>, text: &str) -> Vec<String> {
        let haystack = normalize(text);

        std::iter::once(identifier)
            .chain(also)
            .map(|id| normalize(id.as_str()))
            .chain(self.required_phrases.iter().cloned())
            .filter(|term| !haystack.contains(term.as_str()))
            .collect()
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
