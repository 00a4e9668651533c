use scout_models::IdentifierError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum ScoutError {
    #[error("Invalid identifier: {message}")]
    InvalidIdentifier { message: String },

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Network error: {url} - {message}")]
    Network {
        url: String,
        message: String,
        status: Option<u16>,
        retryable: bool,
    },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Parse error: {message}")]
    Parse { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl ScoutError {
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Network failure that should not be retried.
    pub fn network(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Network {
            url: url.into(),
            message: message.into(),
            status: None,
            retryable: false,
        }
    }

    /// Non-2xx response. 5xx and 429 are retryable, other statuses are not.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::Network {
            url: url.into(),
            message: format!("unexpected HTTP status {}", status),
            status: Some(status),
            retryable: status >= 500 || status == 429,
        }
    }

    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network { retryable: true, .. })
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::Network { .. } => "NETWORK_ERROR",
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Parse { .. } => "PARSE_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::Internal { .. } => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Short status string used in JSON responses.
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { .. } | Self::Validation { .. } => "invalid_identifier",
            Self::Network { .. } => "network_error",
            Self::NotFound { .. } => "not_found",
            Self::Parse { .. } => "error",
            Self::Configuration { .. } | Self::Internal { .. } => "internal_error",
        }
    }

    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::InvalidIdentifier { .. } => 400,
            Self::Validation { .. } => 400,
            Self::Network { .. } => 502,
            Self::NotFound { .. } => 404,
            Self::Parse { .. } => 422,
            Self::Configuration { .. } => 500,
            Self::Internal { .. } => 500,
        }
    }
}

pub type ScoutResult<T> = Result<T, ScoutError>;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl From<ScoutError> for ErrorResponse {
    fn from(error: ScoutError) -> Self {
        Self {
            error: error.status_label().to_string(),
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }
}

impl From<IdentifierError> for ScoutError {
    fn from(error: IdentifierError) -> Self {
        Self::invalid_identifier(error.to_string())
    }
}

impl From<reqwest::Error> for ScoutError {
    fn from(error: reqwest::Error) -> Self {
        let url = error.url().map(|u| u.to_string()).unwrap_or_default();
        let status = error.status().map(|s| s.as_u16());
        let retryable = error.is_timeout()
            || error.is_connect()
            || status.map_or(false, |s| s >= 500 || s == 429);

        Self::Network {
            url,
            message: error.to_string(),
            status,
            retryable,
        }
    }
}

impl From<validator::ValidationErrors> for ScoutError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::validation("request", crate::format_validation_errors(&errors))
    }
}

impl From<serde_json::Error> for ScoutError {
    fn from(error: serde_json::Error) -> Self {
        Self::validation("JSON", error.to_string())
    }
}
