//! Evidence normalization and validation.
//!
//! Pure input hygiene. Everything here runs before any registry lookup or
//! comparator call, so a caller-input defect never costs an external call.

use crate::errors::ValidationError;
use crate::model::{Evidence, FormFactor, ImageBlob};

/// Unvalidated caller input, as it arrives from the transport layer.
#[derive(Debug, Default)]
pub struct RawEvidence {
    pub drug_name: String,
    pub form_factor: String,
    pub registration_number: String,
    pub package_image: Option<ImageBlob>,
    pub secondary_image: Option<ImageBlob>,
}

/// Validate and normalize raw input into [`Evidence`].
pub fn evidence(raw: RawEvidence) -> Result<Evidence, ValidationError> {
    let drug_name = raw.drug_name.trim().to_lowercase();
    if drug_name.is_empty() {
        return Err(ValidationError::EmptyDrugName);
    }

    let form_factor =
        FormFactor::parse(&raw.form_factor).ok_or_else(|| ValidationError::InvalidFormFactor {
            given: raw.form_factor.trim().to_string(),
        })?;

    // Registration codes are case-significant alphanumerics; trim only.
    let registration_number = raw.registration_number.trim().to_string();

    let package_image = raw
        .package_image
        .ok_or(ValidationError::MissingPackageImage)?;

    let secondary_image = match form_factor {
        FormFactor::Tablet => Some(
            raw.secondary_image
                .ok_or(ValidationError::MissingSecondaryImage)?,
        ),
        // A stray blister image on a syrup submission is dropped, not rejected.
        FormFactor::Syrup => None,
    };

    Ok(Evidence {
        drug_name,
        form_factor,
        registration_number,
        package_image,
        secondary_image,
    })
}
