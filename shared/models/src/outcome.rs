//! Validation outcomes and batch report types.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::identifier::{CasNumber, Identifier, IdentifierError};

/// Result of scouting one identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// A document mentioning the identifier was found.
    Found { details: String, source_url: String },
    /// Sources were reachable but no document matched.
    NotFound { reason: String },
    /// A candidate document was corrupt or unparsable.
    Error { cause: String },
}

impl ValidationOutcome {
    pub fn found(details: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self::Found {
            details: details.into(),
            source_url: source_url.into(),
        }
    }

    pub fn not_found(reason: impl Into<String>) -> Self {
        Self::NotFound {
            reason: reason.into(),
        }
    }

    pub fn error(cause: impl Into<String>) -> Self {
        Self::Error {
            cause: cause.into(),
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Found { .. } => "found",
            Self::NotFound { .. } => "not_found",
            Self::Error { .. } => "error",
        }
    }
}

/// One entry of a batch scouting request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct BatchEntry {
    #[validate(length(max = 200))]
    pub cas: Option<String>,
    #[validate(length(max = 200))]
    pub name: Option<String>,
    /// Pages or documents to scout instead of the search source.
    #[validate(length(max = 20, message = "At most 20 URLs per entry"))]
    pub urls: Option<Vec<String>>,
}

/// Identifiers parsed from a batch entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryIdentifiers {
    /// What the sources are searched for; the CAS number when one is given.
    pub primary: Identifier,
    /// The name a document must also mention when both fields are given.
    pub also: Option<Identifier>,
}

impl BatchEntry {
    /// `None` when the entry has neither a CAS number nor a name.
    ///
    /// A `cas` value must match the CAS pattern; it is never searched as a name.
    pub fn identifiers(&self) -> Option<Result<EntryIdentifiers, IdentifierError>> {
        match (non_blank(&self.cas), non_blank(&self.name)) {
            (None, None) => None,
            (None, Some(name)) => Some(Identifier::parse(name).map(|primary| EntryIdentifiers {
                primary,
                also: None,
            })),
            (Some(cas), name) => Some(parse_cas_entry(cas, name)),
        }
    }

    /// Raw text used to label this entry in reports.
    pub fn label(&self) -> &str {
        non_blank(&self.cas).or_else(|| non_blank(&self.name)).unwrap_or_default()
    }
}

fn parse_cas_entry(cas: &str, name: Option<&str>) -> Result<EntryIdentifiers, IdentifierError> {
    let cas = cas.trim();
    let primary = CasNumber::parse(cas)
        .map(Identifier::Cas)
        .ok_or_else(|| IdentifierError::NotCas(cas.to_string()))?;
    let also = name.map(Identifier::parse).transpose()?;

    Ok(EntryIdentifiers { primary, also })
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BatchRequest {
    #[validate(length(min = 1, max = 50, message = "Between 1 and 50 entries required"))]
    pub entries: Vec<BatchEntry>,
}

impl BatchRequest {
    /// Validates the request and then every entry in it.
    pub fn validate_all(&self) -> Result<(), ValidationErrors> {
        self.validate()?;
        self.entries.iter().try_for_each(|entry| entry.validate())
    }
}

/// A verified document collected while processing a batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub cas: Option<String>,
    pub name: Option<String>,
    /// Host the document was served from.
    pub provider: String,
    pub verified: bool,
    pub url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub entries: Vec<ReportEntry>,
    pub processed: usize,
    pub skipped: usize,
    /// Per-entry failures, prefixed with the identifier.
    pub errors: Vec<String>,
}
