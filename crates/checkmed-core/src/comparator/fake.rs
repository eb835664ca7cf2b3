//! Scripted comparator for tests and offline runs.

use super::{Comparator, ComparatorStatus, Comparison};
use crate::model::ImageBlob;
use crate::profile::InstructionProfile;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted outcome for one instruction profile.
#[derive(Debug, Clone)]
pub enum FakeOutcome {
    Verdict(Comparison),
    /// Simulated transport failure.
    Unavailable(String),
}

impl FakeOutcome {
    pub fn verified(reason: impl Into<String>) -> Self {
        Self::Verdict(Comparison {
            status: ComparatorStatus::Verified,
            reason: reason.into(),
        })
    }

    pub fn high_risk(reason: impl Into<String>) -> Self {
        Self::Verdict(Comparison {
            status: ComparatorStatus::HighRisk,
            reason: reason.into(),
        })
    }
}

/// Test double: a fixed outcome per profile plus a record of every call.
///
/// Unscripted profiles answer VERIFIED so tests only script what they assert
/// on. The call log is what short-circuit tests inspect.
#[derive(Debug, Default)]
pub struct FakeComparator {
    outcomes: Mutex<HashMap<InstructionProfile, FakeOutcome>>,
    calls: Mutex<Vec<InstructionProfile>>,
}

impl FakeComparator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, profile: InstructionProfile, outcome: FakeOutcome) -> Self {
        self.outcomes.lock().unwrap().insert(profile, outcome);
        self
    }

    /// Profiles of every call made so far, in order.
    pub fn calls(&self) -> Vec<InstructionProfile> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_for(&self, profile: InstructionProfile) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|p| **p == profile)
            .count()
    }
}

#[async_trait]
impl Comparator for FakeComparator {
    async fn compare(
        &self,
        _reference: &ImageBlob,
        _submitted: &ImageBlob,
        profile: InstructionProfile,
    ) -> anyhow::Result<Comparison> {
        self.calls.lock().unwrap().push(profile);
        let outcome = self.outcomes.lock().unwrap().get(&profile).cloned();
        match outcome {
            Some(FakeOutcome::Verdict(comparison)) => Ok(comparison),
            Some(FakeOutcome::Unavailable(detail)) => Err(anyhow::anyhow!(detail)),
            None => Ok(Comparison {
                status: ComparatorStatus::Verified,
                reason: "unscripted profile".to_string(),
            }),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
