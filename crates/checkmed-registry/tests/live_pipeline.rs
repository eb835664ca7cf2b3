//! The full pipeline wired against the real stores (SQLite + tempdir
//! filesystem), with only the comparator faked.

use checkmed_core::comparator::{FakeComparator, FakeOutcome};
use checkmed_core::{FormFactor, InstructionProfile, Pipeline, RawEvidence, VerificationResult};
use checkmed_registry::{ImageDir, ImageKind, NewMedicine, Store};
use std::sync::Arc;

fn jpeg() -> Vec<u8> {
    vec![0xFF, 0xD8, 0xFF, 0xE0]
}

fn seeded_stores(tmp: &tempfile::TempDir) -> (Store, ImageDir) {
    let store = Store::open(&tmp.path().join("checkmed.db")).unwrap();
    store.init_schema().unwrap();
    let images = ImageDir::new(tmp.path().join("medicine_images"));

    let package_ref = images
        .save(
            "artcin",
            FormFactor::Tablet,
            ImageKind::Package,
            "image/jpeg",
            &jpeg(),
        )
        .unwrap();
    let blister_ref = images
        .save(
            "artcin",
            FormFactor::Tablet,
            ImageKind::Secondary,
            "image/jpeg",
            &jpeg(),
        )
        .unwrap();
    store
        .register(NewMedicine {
            drug_name: "artcin".to_string(),
            form_factor: FormFactor::Tablet,
            registration_number: "04-4213".to_string(),
            manufacturer: "Yangzhou No. 3 Pharmaceutical Co., Ltd.".to_string(),
            package_image_ref: package_ref,
            secondary_image_ref: Some(blister_ref),
        })
        .unwrap();

    let syrup_ref = images
        .save(
            "nasodyne",
            FormFactor::Syrup,
            ImageKind::Package,
            "image/jpeg",
            &jpeg(),
        )
        .unwrap();
    store
        .register(NewMedicine {
            drug_name: "nasodyne".to_string(),
            form_factor: FormFactor::Syrup,
            registration_number: "A11-1161".to_string(),
            manufacturer: "May & Baker Nigeria PLC".to_string(),
            package_image_ref: syrup_ref,
            secondary_image_ref: None,
        })
        .unwrap();

    (store, images)
}

fn raw_tablet() -> RawEvidence {
    RawEvidence {
        drug_name: "Artcin".to_string(),
        form_factor: "tablet".to_string(),
        registration_number: "04-4213".to_string(),
        package_image: Some(checkmed_core::ImageBlob::new(jpeg(), "image/jpeg")),
        secondary_image: Some(checkmed_core::ImageBlob::new(jpeg(), "image/jpeg")),
    }
}

#[tokio::test]
async fn verifies_a_matching_submission_end_to_end() {
    let tmp = tempfile::tempdir().unwrap();
    let (store, images) = seeded_stores(&tmp);
    let comparator = Arc::new(FakeComparator::new());
    let pipeline = Pipeline::new(Arc::new(store), Arc::new(images), comparator.clone());

    let result = pipeline.verify_submission(raw_tablet()).await.unwrap();
    assert_eq!(result, VerificationResult::Verified);
    assert_eq!(
        comparator.calls(),
        vec![InstructionProfile::Package, InstructionProfile::Secondary]
    );
}

#[tokio::test]
async fn wrong_form_factor_surfaces_the_real_registry_answer() {
    let tmp = tempfile::tempdir().unwrap();
    let (store, images) = seeded_stores(&tmp);
    let pipeline = Pipeline::new(
        Arc::new(store),
        Arc::new(images),
        Arc::new(FakeComparator::new()),
    );

    let mut raw = raw_tablet();
    raw.drug_name = "nasodyne".to_string();
    let result = pipeline.verify_submission(raw).await.unwrap();
    assert_eq!(
        result,
        VerificationResult::NotFound {
            requested_name: "nasodyne".to_string(),
            requested_form: FormFactor::Tablet,
            available: vec![FormFactor::Syrup],
        }
    );
}

#[tokio::test]
async fn deleted_reference_image_is_a_configuration_error() {
    let tmp = tempfile::tempdir().unwrap();
    let (store, images) = seeded_stores(&tmp);
    // Operator breakage: the record survives but its blob is gone.
    images.remove("artcin/artcin_tablet_package.jpg");
    let pipeline = Pipeline::new(
        Arc::new(store),
        Arc::new(images),
        Arc::new(FakeComparator::new()),
    );

    let result = pipeline.verify_submission(raw_tablet()).await.unwrap();
    assert!(matches!(
        result,
        VerificationResult::ConfigurationError { .. }
    ));
}

#[tokio::test]
async fn high_risk_package_verdict_passes_through() {
    let tmp = tempfile::tempdir().unwrap();
    let (store, images) = seeded_stores(&tmp);
    let comparator = Arc::new(FakeComparator::new().respond(
        InstructionProfile::Package,
        FakeOutcome::high_risk("logo placement differs"),
    ));
    let pipeline = Pipeline::new(Arc::new(store), Arc::new(images), comparator.clone());

    let result = pipeline.verify_submission(raw_tablet()).await.unwrap();
    match result {
        VerificationResult::HighRisk { reason, .. } => {
            assert_eq!(reason, "logo placement differs");
        }
        other => panic!("expected HighRisk, got {other:?}"),
    }
    assert_eq!(comparator.calls_for(InstructionProfile::Secondary), 0);
}
