//! `POST /api/register-drug` — add a golden-standard record.

use crate::extract::FormData;
use crate::response::ApiError;
use crate::state::AppState;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use checkmed_core::FormFactor;
use checkmed_registry::{ImageKind, NewMedicine, RegistryError};
use serde_json::json;

/// Multipart fields: `drug_name`, `form_factor`, `registration_number`,
/// `manufacturer`, `box_image`, and `blister_pack_image` (tablets only).
pub async fn handle(State(state): State<AppState>, multipart: Multipart) -> Response {
    let mut form = match FormData::read(multipart).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let drug_name = form.text("drug_name").trim().to_lowercase();
    if drug_name.is_empty() {
        return ApiError::new(StatusCode::BAD_REQUEST, "drug name must not be empty")
            .into_response();
    }

    let form_factor_raw = form.text("form_factor");
    let Some(form_factor) = FormFactor::parse(&form_factor_raw) else {
        return ApiError::new(
            StatusCode::BAD_REQUEST,
            format!(
                "invalid form factor '{}'; must be one of: tablet, syrup",
                form_factor_raw.trim()
            ),
        )
        .into_response();
    };

    let Some(package) = form.take_file("box_image") else {
        return ApiError::new(StatusCode::BAD_REQUEST, "package image is required")
            .into_response();
    };
    let secondary = form.take_file("blister_pack_image");
    if form_factor == FormFactor::Tablet && secondary.is_none() {
        return ApiError::new(
            StatusCode::BAD_REQUEST,
            "blister pack image is required for tablet products",
        )
        .into_response();
    }

    // Blobs first, record second; a failed insert rolls the blobs back so
    // a rejected registration leaves no orphan files behind.
    let package_ref = match state.images.save(
        &drug_name,
        form_factor,
        ImageKind::Package,
        &package.mime_type,
        &package.bytes,
    ) {
        Ok(image_ref) => image_ref,
        Err(e) => {
            tracing::error!(error = %e, "failed to store package image");
            return ApiError::internal("failed to store package image").into_response();
        }
    };

    let secondary_ref = match secondary {
        Some(blob) => match state.images.save(
            &drug_name,
            form_factor,
            ImageKind::Secondary,
            &blob.mime_type,
            &blob.bytes,
        ) {
            Ok(image_ref) => Some(image_ref),
            Err(e) => {
                tracing::error!(error = %e, "failed to store blister image");
                state.images.remove(&package_ref);
                return ApiError::internal("failed to store blister image").into_response();
            }
        },
        None => None,
    };

    let new = NewMedicine {
        drug_name,
        form_factor,
        registration_number: form.text("registration_number"),
        manufacturer: form.text("manufacturer"),
        package_image_ref: package_ref.clone(),
        secondary_image_ref: secondary_ref.clone(),
    };

    match state.store.register(new) {
        Ok(record) => (
            StatusCode::OK,
            Json(json!({ "status": "success", "data": record })),
        )
            .into_response(),
        Err(e) => {
            state.images.remove(&package_ref);
            if let Some(image_ref) = &secondary_ref {
                state.images.remove(image_ref);
            }
            let status = match &e {
                RegistryError::Duplicate { .. } => StatusCode::CONFLICT,
                RegistryError::InvalidRecord { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            ApiError::new(status, e.to_string()).into_response()
        }
    }
}
