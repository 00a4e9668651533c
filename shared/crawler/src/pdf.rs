//! PDF Processor
//!
//! Detects PDF payloads and extracts their text.

use scout_models::FetchResult;
use scout_utils::{ScoutError, ScoutResult};
use url::Url;

use crate::links::has_pdf_path;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// PDF processor
#[derive(Debug, Clone, Default)]
pub struct PdfProcessor;

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extract text from PDF bytes on a blocking worker.
    ///
    /// Malformed input, including input that makes the parser panic, comes
    /// back as a parse error.
    pub async fn extract_text(&self, data: Vec<u8>) -> ScoutResult<String> {
        let extracted = tokio::task::spawn_blocking(move || {
            pdf_extract::extract_text_from_mem(&data).map_err(|e| e.to_string())
        })
        .await;

        match extracted {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(message)) => Err(ScoutError::parse(format!(
                "Failed to extract text from PDF: {}",
                message
            ))),
            Err(join_error) if join_error.is_panic() => {
                Err(ScoutError::parse("PDF parser aborted on malformed input"))
            }
            Err(join_error) => Err(ScoutError::internal(join_error.to_string())),
        }
    }

    /// Whether a fetched body should be treated as a PDF.
    ///
    /// - Content-Type `application/pdf` is a PDF, `text/*` never is
    /// - Otherwise the magic bytes `%PDF-` or a `.pdf` path decide
    pub fn looks_like_pdf(&self, fetched: &FetchResult) -> bool {
        match fetched.media_type() {
            Some(media) if media == "application/pdf" => true,
            Some(media) if media.starts_with("text/") => false,
            _ => {
                has_pdf_magic(&fetched.body)
                    || Url::parse(&fetched.url).map_or(false, |u| has_pdf_path(&u))
            }
        }
    }
}

/// PDFs may carry a few junk bytes before the header.
pub fn has_pdf_magic(body: &[u8]) -> bool {
    body.windows(PDF_MAGIC.len())
        .take(1024)
        .any(|window| window == PDF_MAGIC)
}
