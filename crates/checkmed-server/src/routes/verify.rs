//! `POST /api/verify` — run the verification pipeline on a submission.

use crate::extract::FormData;
use crate::response::verdict_response;
use crate::state::AppState;
use axum::extract::{Multipart, State};
use axum::response::{IntoResponse, Response};
use checkmed_core::RawEvidence;

/// Multipart fields: `drug_name`, `form_factor`, `registration_number`,
/// `box_image`, and `blister_pack_image` (tablets only).
///
/// Field-level validation is the normalizer's job; this handler only moves
/// bytes into [`RawEvidence`].
pub async fn handle(State(state): State<AppState>, multipart: Multipart) -> Response {
    let mut form = match FormData::read(multipart).await {
        Ok(form) => form,
        Err(e) => return e.into_response(),
    };

    let raw = RawEvidence {
        drug_name: form.text("drug_name"),
        form_factor: form.text("form_factor"),
        registration_number: form.text("registration_number"),
        package_image: form.take_file("box_image"),
        secondary_image: form.take_file("blister_pack_image"),
    };

    verdict_response(state.pipeline.verify_submission(raw).await)
}
