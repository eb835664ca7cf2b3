//! Visual comparison providers.
//!
//! The comparator is a paid, rate-limited external capability. The pipeline
//! calls it synchronously, never speculatively, and never retries: a failed
//! call surfaces as `ComparatorUnavailable`, which callers must keep
//! distinct from a HIGH-RISK finding.

pub mod fake;
pub mod gemini;

pub use fake::{FakeComparator, FakeOutcome};
pub use gemini::GeminiComparator;

use crate::model::ImageBlob;
use crate::profile::InstructionProfile;
use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Verdict from a comparator call that completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparison {
    pub status: ComparatorStatus,
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparatorStatus {
    #[serde(rename = "VERIFIED")]
    Verified,
    #[serde(rename = "HIGH-RISK")]
    HighRisk,
}

#[async_trait]
pub trait Comparator: Send + Sync {
    /// Compare the submitted image against the trusted reference under the
    /// given instruction profile. An `Err` means the call itself failed and
    /// must never be read as a finding.
    async fn compare(
        &self,
        reference: &ImageBlob,
        submitted: &ImageBlob,
        profile: InstructionProfile,
    ) -> anyhow::Result<Comparison>;

    fn provider_name(&self) -> &'static str;
}

/// Parse a model reply into a [`Comparison`].
///
/// Models are instructed to answer with one minified JSON object; a fenced
/// code block around it is tolerated, anything else is a failure.
pub(crate) fn parse_reply(text: &str) -> anyhow::Result<Comparison> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        anyhow::bail!("comparator returned an empty response");
    }
    serde_json::from_str(strip_code_fence(trimmed))
        .with_context(|| format!("comparator returned an unparseable verdict: {trimmed}"))
}

fn strip_code_fence(s: &str) -> &str {
    let Some(rest) = s.strip_prefix("```") else {
        return s;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim();
    rest.strip_suffix("```").map(str::trim).unwrap_or(rest)
}
