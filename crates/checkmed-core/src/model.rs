//! Domain types shared across the pipeline and its collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Product packaging category. Determines which pipeline stages apply:
/// tablet products get the secondary (blister pack) check, syrup products
/// do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
    Tablet,
    Syrup,
}

impl FormFactor {
    /// Accepted input values, for validation messages.
    pub const ACCEPTED: &'static [&'static str] = &["tablet", "syrup"];

    /// Case-insensitive parse after trimming. `None` for anything outside
    /// the accepted set.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "tablet" => Some(Self::Tablet),
            "syrup" => Some(Self::Syrup),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tablet => "tablet",
            Self::Syrup => "syrup",
        }
    }
}

impl std::fmt::Display for FormFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque image bytes plus the declared MIME type.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageBlob {
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

impl ImageBlob {
    pub fn new(bytes: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self {
            bytes,
            mime_type: mime_type.into(),
        }
    }
}

// Manual Debug: image payloads are large and useless in logs.
impl std::fmt::Debug for ImageBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageBlob")
            .field("bytes", &format_args!("{} bytes", self.bytes.len()))
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Caller-supplied evidence for one verification, immutable once built.
///
/// Only [`crate::normalize::evidence`] constructs this, so every field is
/// already trimmed/lowercased as the pipeline expects and the secondary
/// image is present exactly when the form factor requires it.
#[derive(Debug, Clone)]
pub struct Evidence {
    pub drug_name: String,
    pub form_factor: FormFactor,
    pub registration_number: String,
    pub package_image: ImageBlob,
    pub secondary_image: Option<ImageBlob>,
}

/// Trusted reference record for a genuine product.
///
/// `(drug_name, form_factor)` is the unique lookup key; a name may carry one
/// record per form factor but never two for the same pair. The image refs
/// are opaque keys resolved through [`crate::registry::ImageStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoldenRecord {
    pub drug_name: String,
    pub form_factor: FormFactor,
    pub registration_number: String,
    /// Informational only; no stage compares it.
    pub manufacturer: String,
    pub package_image_ref: String,
    /// Present iff `form_factor` is tablet in a well-formed registry. The
    /// pipeline still checks rather than assumes.
    #[serde(default)]
    pub secondary_image_ref: Option<String>,
    pub created_at: DateTime<Utc>,
}
