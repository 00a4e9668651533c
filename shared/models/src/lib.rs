//! # Scout Domain Models
//!
//! Core data types shared by the crawler and the HTTP service.
//!
//! ## Key Models
//!
//! - **Identifier**: a raw input classified once into a CAS number or a substance name
//! - **FetchResult**: bytes of a fetched page or document with its URL and status
//! - **ValidationOutcome**: `Found`, `NotFound` or `Error` for one identifier
//! - **BatchRequest / BatchReport**: multi-identifier scouting input and collected results
//!
//! Nothing in this crate holds state across requests.

pub mod fetch;
pub mod identifier;
pub mod outcome;


pub use fetch::FetchResult;
pub use identifier::{CasNumber, Identifier, IdentifierError, IdentifierKind, MAX_IDENTIFIER_LEN};
pub use outcome::{
    BatchEntry, BatchReport, BatchRequest, EntryIdentifiers, ReportEntry, ValidationOutcome,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formaldehyde_identifier() {
        let id = Identifier::parse("50-00-0").unwrap();
        assert_eq!(id.kind(), IdentifierKind::Cas);
        assert!(id.cas().unwrap().has_valid_checksum());
        assert_eq!(id.name(), None);
    }

    #[test]
    fn test_outcome_round_trip() {
        let outcome = ValidationOutcome::error("xref table missing");
        let json = serde_json::to_string(&outcome).unwrap();
        let parsed: ValidationOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, outcome);
    }
}
