//! # Scout Crawler
//!
//! Finds and validates safety data sheets for a chemical identifier.
//!
//! - [`transport`]: injected HTTP client with bounded retries
//! - [`fetcher`]: search URL construction and document downloads
//! - [`links`]: candidate extraction and per-request filtering
//! - [`pdf`] / [`validator`]: PDF detection, text extraction and matching
//! - [`scout`]: the end-to-end flow

pub mod fetcher;
pub mod links;
pub mod pdf;
pub mod scout;
pub mod transport;
pub mod validator;

pub use fetcher::Fetcher;
pub use pdf::PdfProcessor;
pub use scout::Scout;
pub use transport::{HttpTransport, Transport};
pub use validator::{DocumentCheck, Validator};
