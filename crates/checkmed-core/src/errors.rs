//! Error taxonomy for validation and pipeline execution.
//!
//! A HIGH-RISK verdict is not an error: it is a successful run with a
//! negative finding and lives in [`crate::pipeline::VerificationResult`].
//! The types here cover everything that must never be mistaken for such a
//! finding.

/// Caller-input defect, fixable by the caller without new reference data.
///
/// All variants are detected before any registry lookup or comparator call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("drug name must not be empty")]
    EmptyDrugName,

    #[error("invalid form factor '{given}'; must be one of: tablet, syrup")]
    InvalidFormFactor { given: String },

    #[error("package image is required")]
    MissingPackageImage,

    #[error("blister pack image is required for tablet products")]
    MissingSecondaryImage,
}

/// Failure that aborts a verification run.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The comparator call itself failed: transport error, empty response,
    /// or a reply that did not parse. Never retried here (retrying a paid,
    /// rate-limited service is the caller's decision) and never to be
    /// conflated with a HIGH-RISK finding.
    #[error("comparator unavailable ({provider}): {detail}")]
    ComparatorUnavailable { provider: String, detail: String },

    /// The registry could not answer the lookup at all.
    #[error("registry lookup failed: {0:#}")]
    Registry(anyhow::Error),
}
