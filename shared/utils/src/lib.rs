pub mod config;
pub mod error;
pub mod logging;
pub mod validation;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use validation::*;

#[cfg(test)]
mod tests {
    use super::*;
    use scout_models::Identifier;

    #[test]
    fn test_config_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.fetcher.timeout_seconds, 10);
        assert!(config.sources.search_url_template.contains("{query}"));
    }

    #[test]
    fn test_error_handling() {
        let error = ScoutError::validation("test_field", "test message");
        assert_eq!(error.error_code(), "VALIDATION_ERROR");
        assert_eq!(error.http_status_code(), 400);

        let error: ScoutError = Identifier::parse("").unwrap_err().into();
        assert_eq!(error.error_code(), "INVALID_IDENTIFIER");
        assert_eq!(error.status_label(), "invalid_identifier");
        assert_eq!(error.http_status_code(), 400);
    }

    #[test]
    fn test_http_status_retry_classification() {
        assert!(ScoutError::http_status("https://example.com", 503).is_retryable());
        assert!(ScoutError::http_status("https://example.com", 429).is_retryable());
        assert!(!ScoutError::http_status("https://example.com", 404).is_retryable());
        assert!(!ScoutError::network("https://example.com", "refused").is_retryable());

        let error = ScoutError::http_status("https://example.com", 500);
        assert_eq!(error.http_status_code(), 502);
        assert_eq!(ErrorResponse::from(error).code, "NETWORK_ERROR");
    }
}
