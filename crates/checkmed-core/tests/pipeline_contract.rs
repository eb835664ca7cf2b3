//! End-to-end pipeline contract: stage ordering, short-circuiting, and the
//! canonical submission scenarios, driven through test doubles.

use async_trait::async_trait;
use checkmed_core::comparator::{FakeComparator, FakeOutcome};
use checkmed_core::{
    Evidence, FormFactor, GoldenRecord, GoldenRegistry, ImageBlob, ImageStore, InstructionProfile,
    Lookup, Pipeline, RawEvidence, Stage, ValidationError, VerificationResult, VerifyError,
};
use std::collections::HashMap;
use std::sync::Arc;

struct MemRegistry {
    records: Vec<GoldenRecord>,
}

#[async_trait]
impl GoldenRegistry for MemRegistry {
    async fn lookup(&self, name: &str, form: FormFactor) -> anyhow::Result<Lookup> {
        if let Some(r) = self
            .records
            .iter()
            .find(|r| r.drug_name == name && r.form_factor == form)
        {
            return Ok(Lookup::Hit(r.clone()));
        }
        let available = self
            .records
            .iter()
            .filter(|r| r.drug_name == name)
            .map(|r| r.form_factor)
            .collect();
        Ok(Lookup::Miss { available })
    }
}

struct MemImages {
    blobs: HashMap<String, ImageBlob>,
}

#[async_trait]
impl ImageStore for MemImages {
    async fn load(&self, image_ref: &str) -> anyhow::Result<ImageBlob> {
        self.blobs
            .get(image_ref)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no blob at '{image_ref}'"))
    }
}

fn jpeg() -> ImageBlob {
    ImageBlob::new(vec![0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg")
}

fn seed_records() -> Vec<GoldenRecord> {
    vec![
        GoldenRecord {
            drug_name: "artcin".to_string(),
            form_factor: FormFactor::Tablet,
            registration_number: "04-4213".to_string(),
            manufacturer: "Yangzhou No. 3 Pharmaceutical Co., Ltd.".to_string(),
            package_image_ref: "artcin/tablet_package.jpg".to_string(),
            secondary_image_ref: Some("artcin/tablet_blister.jpg".to_string()),
            created_at: chrono::DateTime::UNIX_EPOCH,
        },
        GoldenRecord {
            drug_name: "nasodyne".to_string(),
            form_factor: FormFactor::Syrup,
            registration_number: "A11-1161".to_string(),
            manufacturer: "May & Baker Nigeria PLC".to_string(),
            package_image_ref: "nasodyne/syrup_package.jpg".to_string(),
            secondary_image_ref: None,
            created_at: chrono::DateTime::UNIX_EPOCH,
        },
    ]
}

fn seed_images() -> HashMap<String, ImageBlob> {
    [
        "artcin/tablet_package.jpg",
        "artcin/tablet_blister.jpg",
        "nasodyne/syrup_package.jpg",
    ]
    .into_iter()
    .map(|k| (k.to_string(), jpeg()))
    .collect()
}

fn pipeline(comparator: FakeComparator) -> (Pipeline, Arc<FakeComparator>) {
    let comparator = Arc::new(comparator);
    let pipeline = Pipeline::new(
        Arc::new(MemRegistry {
            records: seed_records(),
        }),
        Arc::new(MemImages {
            blobs: seed_images(),
        }),
        comparator.clone(),
    );
    (pipeline, comparator)
}

fn artcin_tablet(registration: &str) -> Evidence {
    Evidence {
        drug_name: "artcin".to_string(),
        form_factor: FormFactor::Tablet,
        registration_number: registration.to_string(),
        package_image: jpeg(),
        secondary_image: Some(jpeg()),
    }
}

fn nasodyne_syrup() -> Evidence {
    Evidence {
        drug_name: "nasodyne".to_string(),
        form_factor: FormFactor::Syrup,
        registration_number: "A11-1161".to_string(),
        package_image: jpeg(),
        secondary_image: None,
    }
}

// Scenario A: identity matches and both visual checks pass.
#[tokio::test]
async fn matching_tablet_submission_is_verified() {
    let (pipeline, comparator) = pipeline(FakeComparator::new());
    let result = pipeline.run(&artcin_tablet("04-4213")).await.unwrap();
    assert_eq!(result, VerificationResult::Verified);
    assert_eq!(
        comparator.calls(),
        vec![InstructionProfile::Package, InstructionProfile::Secondary]
    );
}

// Scenario B: registration mismatch fails stage 1 with both values and
// costs zero comparator calls.
#[tokio::test]
async fn registration_mismatch_is_high_risk_with_zero_comparator_calls() {
    let (pipeline, comparator) = pipeline(FakeComparator::new());
    let result = pipeline.run(&artcin_tablet("00-0000")).await.unwrap();
    assert_eq!(
        result,
        VerificationResult::HighRisk {
            stage: Stage::Identity,
            reason: "registration number mismatch".to_string(),
            expected: Some("04-4213".to_string()),
            provided: Some("00-0000".to_string()),
        }
    );
    assert_eq!(comparator.call_count(), 0);
}

// Scenario C: the name exists, but only under another form factor.
#[tokio::test]
async fn wrong_form_factor_reports_available_forms() {
    let (pipeline, _) = pipeline(FakeComparator::new());
    let evidence = Evidence {
        drug_name: "nasodyne".to_string(),
        form_factor: FormFactor::Tablet,
        registration_number: "A11-1161".to_string(),
        package_image: jpeg(),
        secondary_image: Some(jpeg()),
    };
    let result = pipeline.run(&evidence).await.unwrap();
    assert_eq!(
        result,
        VerificationResult::NotFound {
            requested_name: "nasodyne".to_string(),
            requested_form: FormFactor::Tablet,
            available: vec![FormFactor::Syrup],
        }
    );
}

// Scenario D: the name is absent entirely.
#[tokio::test]
async fn unknown_drug_reports_empty_available_forms() {
    let (pipeline, comparator) = pipeline(FakeComparator::new());
    let evidence = Evidence {
        drug_name: "unknown-drug".to_string(),
        form_factor: FormFactor::Syrup,
        registration_number: "11-1111".to_string(),
        package_image: jpeg(),
        secondary_image: None,
    };
    let result = pipeline.run(&evidence).await.unwrap();
    match result {
        VerificationResult::NotFound { available, .. } => assert!(available.is_empty()),
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(comparator.call_count(), 0);
}

// Scenario E: a transport failure in the secondary stage must abort the
// run, never masquerading as Verified or HighRisk.
#[tokio::test]
async fn secondary_transport_failure_is_comparator_unavailable() {
    let (pipeline, comparator) = pipeline(FakeComparator::new().respond(
        InstructionProfile::Secondary,
        FakeOutcome::Unavailable("connection reset by peer".to_string()),
    ));
    let err = pipeline.run(&artcin_tablet("04-4213")).await.unwrap_err();
    match err {
        VerifyError::ComparatorUnavailable { provider, detail } => {
            assert_eq!(provider, "fake");
            assert!(detail.contains("connection reset"));
        }
        other => panic!("expected ComparatorUnavailable, got {other:?}"),
    }
    // The package stage ran and passed before the failure.
    assert_eq!(
        comparator.calls(),
        vec![InstructionProfile::Package, InstructionProfile::Secondary]
    );
}

#[tokio::test]
async fn package_high_risk_short_circuits_secondary_stage() {
    let (pipeline, comparator) = pipeline(FakeComparator::new().respond(
        InstructionProfile::Package,
        FakeOutcome::high_risk("font weight differs on the brand name"),
    ));
    let result = pipeline.run(&artcin_tablet("04-4213")).await.unwrap();
    match result {
        VerificationResult::HighRisk { stage, reason, .. } => {
            assert_eq!(stage, Stage::Package);
            assert_eq!(reason, "font weight differs on the brand name");
        }
        other => panic!("expected HighRisk, got {other:?}"),
    }
    assert_eq!(comparator.calls_for(InstructionProfile::Secondary), 0);
}

#[tokio::test]
async fn syrup_submissions_never_reach_the_secondary_stage() {
    // Even a comparator scripted to flag the secondary profile must never
    // be consulted for a syrup product.
    let (pipeline, comparator) = pipeline(FakeComparator::new().respond(
        InstructionProfile::Secondary,
        FakeOutcome::high_risk("should never run"),
    ));
    let result = pipeline.run(&nasodyne_syrup()).await.unwrap();
    assert_eq!(result, VerificationResult::Verified);
    assert_eq!(comparator.calls(), vec![InstructionProfile::Package]);
}

#[tokio::test]
async fn identical_inputs_yield_identical_results() {
    let (pipeline, _) = pipeline(FakeComparator::new().respond(
        InstructionProfile::Package,
        FakeOutcome::high_risk("color saturation is off"),
    ));
    let first = pipeline.run(&artcin_tablet("04-4213")).await.unwrap();
    let second = pipeline.run(&artcin_tablet("04-4213")).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn tablet_without_blister_image_fails_validation_before_lookup() {
    struct PanickingRegistry;

    #[async_trait]
    impl GoldenRegistry for PanickingRegistry {
        async fn lookup(&self, _name: &str, _form: FormFactor) -> anyhow::Result<Lookup> {
            panic!("lookup must not run for invalid input");
        }
    }

    let comparator = Arc::new(FakeComparator::new());
    let pipeline = Pipeline::new(
        Arc::new(PanickingRegistry),
        Arc::new(MemImages {
            blobs: HashMap::new(),
        }),
        comparator.clone(),
    );

    let raw = RawEvidence {
        drug_name: "artcin".to_string(),
        form_factor: "tablet".to_string(),
        registration_number: "04-4213".to_string(),
        package_image: Some(jpeg()),
        secondary_image: None,
    };
    let err = pipeline.verify_submission(raw).await.unwrap_err();
    match err {
        VerifyError::Validation(v) => assert_eq!(v, ValidationError::MissingSecondaryImage),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(comparator.call_count(), 0);
}

#[tokio::test]
async fn verify_submission_normalizes_before_lookup() {
    let (pipeline, _) = pipeline(FakeComparator::new());
    let raw = RawEvidence {
        drug_name: "  ARTCIN ".to_string(),
        form_factor: " Tablet ".to_string(),
        registration_number: " 04-4213 ".to_string(),
        package_image: Some(jpeg()),
        secondary_image: Some(jpeg()),
    };
    let result = pipeline.verify_submission(raw).await.unwrap();
    assert_eq!(result, VerificationResult::Verified);
}
