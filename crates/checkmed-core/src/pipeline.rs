//! The verification pipeline: ordered stages, each with veto power.
//!
//! Stages run strictly in sequence and the first non-passing stage
//! terminates the run. The identity check is a pure string comparison and
//! costs nothing; both visual checks are comparator calls. Keeping the
//! cheap decisive check first means the common counterfeit case (wrong
//! registration number) never reaches the comparator at all, and the
//! form-factor-conditional third stage avoids calling the comparator for a
//! reference image that does not exist for syrup products.

use crate::comparator::{Comparator, ComparatorStatus};
use crate::errors::{ValidationError, VerifyError};
use crate::model::{Evidence, FormFactor, GoldenRecord};
use crate::normalize::{self, RawEvidence};
use crate::profile::InstructionProfile;
use crate::registry::{GoldenRegistry, ImageStore, Lookup};
use serde::Serialize;
use std::sync::Arc;

/// Pipeline stage that produced a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Identity,
    Package,
    Secondary,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Package => "package",
            Self::Secondary => "secondary",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of one verification run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status")]
pub enum VerificationResult {
    /// Every applicable stage passed.
    #[serde(rename = "VERIFIED")]
    Verified,

    /// A stage failed. This is a successful run with a negative finding.
    #[serde(rename = "HIGH-RISK")]
    HighRisk {
        stage: Stage,
        reason: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        expected: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        provided: Option<String>,
    },

    /// No golden record for the requested pair. `available` lists the form
    /// factors that do exist for the name; empty means the name is unknown.
    #[serde(rename = "NOT-FOUND")]
    NotFound {
        requested_name: String,
        requested_form: FormFactor,
        available: Vec<FormFactor>,
    },

    /// Reference data is inconsistent or unreadable. An operator problem,
    /// not a finding about the submitted product.
    #[serde(rename = "CONFIGURATION-ERROR")]
    ConfigurationError { detail: String },
}

/// Stateful multi-stage decision process for one submission.
///
/// Holds no mutable state of its own; every run owns its evidence and
/// golden record exclusively, so one pipeline value can serve concurrent
/// requests behind an `Arc`.
pub struct Pipeline {
    registry: Arc<dyn GoldenRegistry>,
    images: Arc<dyn ImageStore>,
    comparator: Arc<dyn Comparator>,
}

impl Pipeline {
    pub fn new(
        registry: Arc<dyn GoldenRegistry>,
        images: Arc<dyn ImageStore>,
        comparator: Arc<dyn Comparator>,
    ) -> Self {
        Self {
            registry,
            images,
            comparator,
        }
    }

    /// Normalize raw caller input, then run the pipeline against it.
    ///
    /// The single composed entry point: validation failures surface before
    /// any registry lookup or comparator call.
    pub async fn verify_submission(
        &self,
        raw: RawEvidence,
    ) -> Result<VerificationResult, VerifyError> {
        let evidence = normalize::evidence(raw)?;
        self.run(&evidence).await
    }

    /// Run all applicable stages against already-normalized evidence.
    pub async fn run(&self, evidence: &Evidence) -> Result<VerificationResult, VerifyError> {
        let record = match self
            .registry
            .lookup(&evidence.drug_name, evidence.form_factor)
            .await
            .map_err(VerifyError::Registry)?
        {
            Lookup::Hit(record) => record,
            Lookup::Miss { available } => {
                tracing::info!(
                    drug = %evidence.drug_name,
                    form = %evidence.form_factor,
                    available = available.len(),
                    "no golden record for submission"
                );
                return Ok(VerificationResult::NotFound {
                    requested_name: evidence.drug_name.clone(),
                    requested_form: evidence.form_factor,
                    available,
                });
            }
        };

        if let Some(result) = self.identity_check(evidence, &record) {
            return Ok(result);
        }
        tracing::debug!(drug = %evidence.drug_name, "identity check passed");

        if let Some(result) = self.package_check(evidence, &record).await? {
            return Ok(result);
        }
        tracing::debug!(drug = %evidence.drug_name, "package check passed");

        if evidence.form_factor == FormFactor::Tablet {
            if let Some(result) = self.secondary_check(evidence, &record).await? {
                return Ok(result);
            }
            tracing::debug!(drug = %evidence.drug_name, "secondary check passed");
        }

        tracing::info!(drug = %evidence.drug_name, "all checks passed");
        Ok(VerificationResult::Verified)
    }

    /// Stage 1: exact registration number comparison. Pure, no external call.
    fn identity_check(
        &self,
        evidence: &Evidence,
        record: &GoldenRecord,
    ) -> Option<VerificationResult> {
        let expected = record.registration_number.trim();
        if expected.is_empty() {
            // Cannot verify against an unset expectation.
            return Some(VerificationResult::ConfigurationError {
                detail: format!(
                    "golden record for '{}' ({}) has no registration number",
                    record.drug_name, record.form_factor
                ),
            });
        }
        if evidence.registration_number != expected {
            return Some(VerificationResult::HighRisk {
                stage: Stage::Identity,
                reason: "registration number mismatch".to_string(),
                expected: Some(expected.to_string()),
                provided: Some(evidence.registration_number.clone()),
            });
        }
        None
    }

    /// Stage 2: outer-packaging visual comparison.
    async fn package_check(
        &self,
        evidence: &Evidence,
        record: &GoldenRecord,
    ) -> Result<Option<VerificationResult>, VerifyError> {
        let reference = match self.images.load(&record.package_image_ref).await {
            Ok(blob) => blob,
            Err(e) => {
                return Ok(Some(VerificationResult::ConfigurationError {
                    detail: format!(
                        "golden package image '{}' is unusable: {e:#}",
                        record.package_image_ref
                    ),
                }))
            }
        };
        self.visual_check(
            Stage::Package,
            InstructionProfile::Package,
            &reference,
            &evidence.package_image,
        )
        .await
    }

    /// Stage 3: blister-pack comparison, tablet products only.
    ///
    /// The normalizer and registry consistency are both supposed to make
    /// the absent cases impossible; re-check rather than dereference.
    async fn secondary_check(
        &self,
        evidence: &Evidence,
        record: &GoldenRecord,
    ) -> Result<Option<VerificationResult>, VerifyError> {
        let Some(secondary_ref) = record.secondary_image_ref.as_deref() else {
            return Ok(Some(VerificationResult::ConfigurationError {
                detail: format!(
                    "golden record for '{}' (tablet) is missing its blister image",
                    record.drug_name
                ),
            }));
        };
        let Some(submitted) = evidence.secondary_image.as_ref() else {
            return Err(ValidationError::MissingSecondaryImage.into());
        };
        let reference = match self.images.load(secondary_ref).await {
            Ok(blob) => blob,
            Err(e) => {
                return Ok(Some(VerificationResult::ConfigurationError {
                    detail: format!("golden blister image '{secondary_ref}' is unusable: {e:#}"),
                }))
            }
        };
        self.visual_check(
            Stage::Secondary,
            InstructionProfile::Secondary,
            &reference,
            submitted,
        )
        .await
    }

    async fn visual_check(
        &self,
        stage: Stage,
        profile: InstructionProfile,
        reference: &crate::model::ImageBlob,
        submitted: &crate::model::ImageBlob,
    ) -> Result<Option<VerificationResult>, VerifyError> {
        let comparison = self
            .comparator
            .compare(reference, submitted, profile)
            .await
            .map_err(|e| VerifyError::ComparatorUnavailable {
                provider: self.comparator.provider_name().to_string(),
                detail: format!("{e:#}"),
            })?;

        match comparison.status {
            ComparatorStatus::Verified => Ok(None),
            ComparatorStatus::HighRisk => {
                tracing::info!(%stage, reason = %comparison.reason, "visual check flagged submission");
                Ok(Some(VerificationResult::HighRisk {
                    stage,
                    reason: comparison.reason,
                    expected: None,
                    provided: None,
                }))
            }
        }
    }
}
