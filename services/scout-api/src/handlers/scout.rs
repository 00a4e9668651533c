//! Scouting endpoints.
//!
//! Every outcome, including failures, is answered with the same JSON shape
//! so callers only ever parse `{status, details?, error?}`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use scout_models::{BatchRequest, Identifier, IdentifierKind, ValidationOutcome};
use scout_utils::{format_validation_errors, ErrorResponse, ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoutResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<IdentifierKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScoutResponse {
    fn from_outcome(identifier: &Identifier, outcome: ValidationOutcome) -> (StatusCode, Self) {
        let mut response = Self {
            status: outcome.status().to_string(),
            identifier: Some(identifier.as_str().to_string()),
            kind: Some(identifier.kind()),
            details: None,
            source_url: None,
            error: None,
        };

        let status = match outcome {
            ValidationOutcome::Found { details, source_url } => {
                response.details = Some(details);
                response.source_url = Some(source_url);
                StatusCode::OK
            }
            ValidationOutcome::NotFound { reason } => {
                response.details = Some(reason);
                StatusCode::OK
            }
            ValidationOutcome::Error { cause } => {
                response.error = Some(cause);
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };

        (status, response)
    }

    fn from_error(identifier: Option<&Identifier>, error: &ScoutError) -> (StatusCode, Self) {
        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            Self {
                status: error.status_label().to_string(),
                identifier: identifier.map(|id| id.as_str().to_string()),
                kind: identifier.map(Identifier::kind),
                details: None,
                source_url: None,
                error: Some(error.to_string()),
            },
        )
    }
}

/// Parse the identifier once, run `scout` with it, and shape the reply.
async fn respond<F, Fut>(state: &AppState, route: &str, raw: &str, scout: F) -> Response
where
    F: FnOnce(Identifier) -> Fut,
    Fut: std::future::Future<Output = (Identifier, ScoutResult<ValidationOutcome>)>,
{
    let (status, body) = match Identifier::parse(raw) {
        Err(e) => ScoutResponse::from_error(None, &ScoutError::from(e)),
        Ok(identifier) => match scout(identifier).await {
            (identifier, Ok(outcome)) => ScoutResponse::from_outcome(&identifier, outcome),
            (identifier, Err(e)) => {
                warn!(identifier = %identifier, error = %e, "Scout failed");
                ScoutResponse::from_error(Some(&identifier), &e)
            }
        },
    };

    state.metrics.record(route, &body.status);
    (status, Json(body)).into_response()
}

/// GET /scout/:cas_or_name
pub async fn scout_by_identifier(State(state): State<AppState>, Path(cas_or_name): Path<String>) -> Response {
    let scout = state.scout.clone();
    respond(&state, "scout", &cas_or_name, |identifier| async move {
        let result = scout.scout_identifier(&identifier).await;
        (identifier, result)
    })
    .await
}

#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    pub identifier: Option<String>,
    pub url: Option<String>,
}

/// GET /validate?identifier=..&url=..
pub async fn validate_url(State(state): State<AppState>, Query(params): Query<ValidateParams>) -> Response {
    let Some(url) = params.url.filter(|u| !u.trim().is_empty()) else {
        let error = ScoutError::validation("url", "Query parameter 'url' is required");
        let (status, body) = ScoutResponse::from_error(None, &error);
        state.metrics.record("validate", &body.status);
        return (status, Json(body)).into_response();
    };

    let raw = params.identifier.unwrap_or_default();
    let scout = state.scout.clone();
    respond(&state, "validate", &raw, |identifier| async move {
        let result = scout.scout_identifier_at(&identifier, &url).await;
        (identifier, result)
    })
    .await
}

/// POST /scout/batch
pub async fn scout_batch(State(state): State<AppState>, Json(request): Json<BatchRequest>) -> Response {
    if let Err(errors) = request.validate_all() {
        let error = ScoutError::validation("request", format_validation_errors(&errors));
        return (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(error))).into_response();
    }

    let report = state.scout.scout_batch(&request).await;
    state.metrics.record("batch", if report.errors.is_empty() { "ok" } else { "partial" });

    Json(report).into_response()
}
