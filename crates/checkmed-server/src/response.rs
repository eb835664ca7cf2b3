//! Wire-status mapping for pipeline outcomes.
//!
//! The pipeline's discriminated result carries everything; this module only
//! decides status codes and message wording. One rule matters: a HIGH-RISK
//! finding is a successful verification (200), while a comparator outage is
//! 502 — the two must never blur into each other on the wire.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use checkmed_core::{FormFactor, VerificationResult, VerifyError};
use serde_json::json;

/// Transport-level failure (malformed upload, storage trouble).
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub fn verdict_response(result: Result<VerificationResult, VerifyError>) -> Response {
    match result {
        Ok(VerificationResult::Verified) => (
            StatusCode::OK,
            Json(json!({ "status": "VERIFIED", "reason": "All checks passed." })),
        )
            .into_response(),

        Ok(finding @ VerificationResult::HighRisk { .. }) => {
            (StatusCode::OK, Json(finding)).into_response()
        }

        Ok(VerificationResult::NotFound {
            requested_name,
            requested_form,
            available,
        }) => {
            let reason = not_found_reason(&requested_name, requested_form, &available);
            (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "status": "NOT-FOUND",
                    "reason": reason,
                    "available_form_factors": available,
                })),
            )
                .into_response()
        }

        Ok(VerificationResult::ConfigurationError { detail }) => {
            tracing::error!(%detail, "verification hit inconsistent reference data");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "CONFIGURATION-ERROR", "detail": detail })),
            )
                .into_response()
        }

        Err(VerifyError::Validation(e)) => {
            ApiError::new(StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }

        Err(VerifyError::ComparatorUnavailable { provider, detail }) => {
            tracing::warn!(%provider, %detail, "comparator unavailable");
            ApiError::new(
                StatusCode::BAD_GATEWAY,
                format!("visual comparison service unavailable ({provider}); please retry"),
            )
            .into_response()
        }

        Err(VerifyError::Registry(e)) => {
            tracing::error!(error = %format!("{e:#}"), "registry lookup failed");
            ApiError::internal("registry unavailable").into_response()
        }
    }
}

fn not_found_reason(name: &str, form: FormFactor, available: &[FormFactor]) -> String {
    if available.is_empty() {
        format!("drug '{name}' is not registered")
    } else {
        let forms = available
            .iter()
            .map(FormFactor::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        format!("'{name}' is not registered as a {form}; available form factors: {forms}")
    }
}
