use crate::error::{ScoutError, ScoutResult};
use std::borrow::Cow;
use validator::{Validate, ValidationErrors};

pub fn validate_model<T: Validate>(model: &T) -> ScoutResult<()> {
    model.validate().map_err(ScoutError::from)
}

pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = match (&error.message, &error.code) {
                (Some(message), _) => format!("{}: {}", field, message),
                (None, Cow::Borrowed("length")) => {
                    format!("Length validation failed for field '{}'", field)
                }
                (None, Cow::Borrowed("range")) => {
                    format!("Value out of range for field '{}'", field)
                }
                (None, code) => format!("Validation failed for field '{}': {}", field, code),
            };
            messages.push(message);
        }
    }

    messages.sort();
    messages.join(", ")
}

/// Checks that a caller-supplied URL is absolute http(s).
pub fn validate_http_url(value: &str) -> ScoutResult<()> {
    let lower = value.trim().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(())
    } else {
        Err(ScoutError::validation(
            "url",
            format!("Expected an absolute http(s) URL, got {:?}", value),
        ))
    }
}
