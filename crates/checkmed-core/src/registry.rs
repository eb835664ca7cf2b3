//! Collaborator contracts the pipeline depends on.
//!
//! The registry and image store are owned externally (persistence lives in
//! `checkmed-registry`); the pipeline only sees these traits and treats a
//! lookup result as a snapshot that cannot change mid-request.

use crate::model::{FormFactor, GoldenRecord, ImageBlob};
use async_trait::async_trait;

/// Outcome of a golden-standard lookup.
#[derive(Debug, Clone)]
pub enum Lookup {
    Hit(GoldenRecord),
    /// No record for the requested (name, form factor) pair. `available`
    /// lists the form factors that DO exist for the name, in registration
    /// order; empty means the name is absent entirely.
    Miss { available: Vec<FormFactor> },
}

/// Resolves a (name, form factor) pair to a golden record.
///
/// At most one record exists per pair; the registration path enforces that
/// at write time.
#[async_trait]
pub trait GoldenRegistry: Send + Sync {
    async fn lookup(&self, name: &str, form: FormFactor) -> anyhow::Result<Lookup>;
}

/// Resolves reference-image refs from a golden record to bytes.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Load the blob behind an image ref. Any failure means the reference
    /// data is unusable, which the pipeline reports as a configuration
    /// error rather than a finding about the submission.
    async fn load(&self, image_ref: &str) -> anyhow::Result<ImageBlob>;
}
