//! `POST /api/report` — file a counterfeit incident report.

use crate::extract::FormData;
use crate::response::ApiError;
use crate::state::AppState;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use checkmed_core::report::IncidentReport;
use serde_json::json;

/// Multipart fields: `drug_name`, `registration_number`, `reason`,
/// `location`, `box_image`, optional `blister_pack_image`.
///
/// Dispatch runs in the background; the caller gets an immediate "queued"
/// response. Delivery failures are the sink's problem to log, not the
/// user's to wait on.
pub async fn handle(State(state): State<AppState>, multipart: Multipart) -> Response {
    let mut form = match FormData::read(multipart).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let Some(package_image) = form.take_file("box_image") else {
        return ApiError::new(StatusCode::BAD_REQUEST, "package image is required")
            .into_response();
    };

    let report = IncidentReport {
        drug_name: form.text("drug_name"),
        registration_number: form.text("registration_number"),
        reason: form.text("reason"),
        location: form.text("location"),
        package_image,
        secondary_image: form.take_file("blister_pack_image"),
    };

    let sink = state.reports.clone();
    tokio::spawn(async move {
        if let Err(e) = sink.dispatch(&report).await {
            tracing::error!(
                sink = sink.sink_name(),
                error = %format!("{e:#}"),
                "incident report dispatch failed"
            );
        }
    });

    (
        StatusCode::OK,
        Json(json!({ "message": "Report has been queued for sending." })),
    )
        .into_response()
}
