//! Chemical identifier classification.
//!
//! A raw identifier is classified exactly once, at parse time, into either a
//! CAS registry number or a free-text substance name.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Longest identifier accepted, in characters.
pub const MAX_IDENTIFIER_LEN: usize = 200;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("identifier is empty")]
    Empty,

    #[error("identifier contains no letters or digits: {0:?}")]
    NoAlphanumeric(String),

    #[error("identifier exceeds {} characters", MAX_IDENTIFIER_LEN)]
    TooLong,

    #[error("identifier contains control characters")]
    ControlCharacters,

    #[error("not a CAS registry number: {0:?}")]
    NotCas(String),
}

fn cas_pattern() -> &'static Regex {
    static CAS: OnceLock<Regex> = OnceLock::new();
    CAS.get_or_init(|| Regex::new(r"^[0-9]{2,7}-[0-9]{2}-[0-9]$").expect("CAS pattern compiles"))
}

/// A CAS registry number in `ddddddd-dd-d` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CasNumber(String);

impl CasNumber {
    /// Parses a string that matches `^\d{2,7}-\d{2}-\d$`.
    pub fn parse(value: &str) -> Option<Self> {
        Self::matches_pattern(value).then(|| Self(value.to_string()))
    }

    pub fn matches_pattern(value: &str) -> bool {
        cas_pattern().is_match(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Verifies the check digit: the weighted sum of the other digits, weights
    /// counted from the right starting at 1, modulo 10.
    pub fn has_valid_checksum(&self) -> bool {
        let digits: Vec<u32> = self.0.chars().filter_map(|c| c.to_digit(10)).collect();
        let Some((check, body)) = digits.split_last() else {
            return false;
        };

        let sum: u32 = body
            .iter()
            .rev()
            .enumerate()
            .map(|(i, d)| d * (i as u32 + 1))
            .sum();

        sum % 10 == *check
    }
}

impl TryFrom<String> for CasNumber {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid CAS number: {}", value))
    }
}

impl From<CasNumber> for String {
    fn from(cas: CasNumber) -> Self {
        cas.0
    }
}

impl fmt::Display for CasNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierKind {
    Cas,
    Name,
}

/// A classified chemical identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identifier {
    Cas(CasNumber),
    Name(String),
}

impl Identifier {
    /// Trims and classifies a raw identifier.
    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let value = raw.trim();

        if value.is_empty() {
            return Err(IdentifierError::Empty);
        }
        if value.chars().count() > MAX_IDENTIFIER_LEN {
            return Err(IdentifierError::TooLong);
        }
        if value.chars().any(char::is_control) {
            return Err(IdentifierError::ControlCharacters);
        }

        if let Some(cas) = CasNumber::parse(value) {
            return Ok(Self::Cas(cas));
        }

        if !value.chars().any(char::is_alphanumeric) {
            return Err(IdentifierError::NoAlphanumeric(value.to_string()));
        }

        // Tabs and newlines were rejected above; collapse runs of spaces so
        // "sodium   chloride" searches and matches as "sodium chloride".
        Ok(Self::Name(value.split_whitespace().collect::<Vec<_>>().join(" ")))
    }

    pub fn kind(&self) -> IdentifierKind {
        match self {
            Self::Cas(_) => IdentifierKind::Cas,
            Self::Name(_) => IdentifierKind::Name,
        }
    }

    /// Text expected to appear in a matching document.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Cas(cas) => cas.as_str(),
            Self::Name(name) => name,
        }
    }

    /// Search-engine query used to discover candidate documents.
    pub fn search_query(&self) -> String {
        match self {
            Self::Cas(cas) => format!("\"{}\" filetype:pdf", cas),
            Self::Name(name) => format!("\"{}\" \"safety data sheet\" filetype:pdf", name),
        }
    }

    pub fn cas(&self) -> Option<&CasNumber> {
        match self {
            Self::Cas(cas) => Some(cas),
            Self::Name(_) => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Cas(_) => None,
            Self::Name(name) => Some(name),
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
