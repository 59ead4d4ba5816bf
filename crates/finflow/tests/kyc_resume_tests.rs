//! KYC wizard ordering, idempotence and resume behavior.

mod common;

use finflow::records::KycStep;

use common::builders::{sample_image, TestEnv};

async fn env_with_user() -> TestEnv {
    let env = TestEnv::new();
    env.register().await;
    env
}

#[tokio::test]
async fn test_scenario_d_pan_skipped_aadhaar_uploaded() {
    let env = env_with_user().await;
    let kyc = env.kyc();

    kyc.skip_pan().unwrap();
    kyc.capture_aadhaar(sample_image()).await.unwrap();

    // Next missing document is the selfie, not PAN.
    assert_eq!(kyc.resume(), KycStep::Selfie);
}

#[tokio::test]
async fn test_next_missing_document_is_idempotent() {
    let env = env_with_user().await;
    let kyc = env.kyc();
    kyc.begin(None).unwrap();

    for _ in 0..3 {
        assert_eq!(kyc.resume(), KycStep::Pan);
    }
    kyc.skip_pan().unwrap();
    for _ in 0..3 {
        assert_eq!(kyc.resume(), KycStep::Aadhaar);
    }
}

#[tokio::test]
async fn test_aadhaar_before_selfie_regardless_of_visit_order() {
    let env = env_with_user().await;
    let kyc = env.kyc();

    // The user deep-links straight to the selfie screen with PAN handled
    // but Aadhaar missing: the entry guard routes to Aadhaar first.
    kyc.skip_pan().unwrap();
    assert_eq!(kyc.enter(KycStep::Selfie), KycStep::Aadhaar);
}

#[tokio::test]
async fn test_verified_never_without_selfie() {
    let env = env_with_user().await;
    let kyc = env.kyc();

    kyc.skip_pan().unwrap();
    kyc.skip_aadhaar().unwrap();
    assert!(!kyc.is_verified());

    let record = kyc.capture_selfie(sample_image()).await.unwrap();
    assert!(record.is_verified);
    assert!(record.selfie_present());
    // No skip flag exists for the selfie on the wire.
    let value = serde_json::to_value(&record).unwrap();
    assert!(value.get("selfieSkipped").is_none());
}

#[tokio::test]
async fn test_completed_steps_auto_skip_on_reentry() {
    let env = env_with_user().await;
    let kyc = env.kyc();

    kyc.capture_pan(sample_image()).await.unwrap();
    kyc.capture_aadhaar(sample_image()).await.unwrap();
    kyc.capture_selfie(sample_image()).await.unwrap();

    // Every screen now resolves to done.
    for step in [KycStep::Pan, KycStep::Aadhaar, KycStep::Selfie] {
        assert_eq!(kyc.enter(step), KycStep::Done);
    }
}
