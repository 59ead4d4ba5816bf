//! End-to-end journeys through the public API: registration → KYC → loan
//! to disbursement → EWA drawdowns, plus resume behavior across a
//! simulated reload (a fresh set of flow controllers over the same store).

mod common;

use std::sync::Arc;

use chrono::Utc;
use finflow::flows::{entry_point, services_gate, EwaSetupStep, Route};
use finflow::records::ewa::DrawdownStatus;
use finflow::records::loan::LoanStatus;
use finflow::records::{AvailabilityAnswers, KycStep};
use finflow::repo::user_repo;
use finflow::store::FileStore;
use finflow::LoanRequest;

use common::builders::{mandate_authorization, sample_image, TestEnv};

#[tokio::test]
async fn test_full_journey_registration_to_ewa_drawdown() {
    let env = TestEnv::new();

    // Fresh visit lands on language selection, then registration.
    assert_eq!(entry_point(env.store.as_ref()), Route::LanguageSelect);
    user_repo::set_selected_language(env.store.as_ref(), "en").unwrap();
    assert_eq!(entry_point(env.store.as_ref()), Route::Registration);

    // Scenario: register via mobile 8077319041.
    let user = env.register().await;
    assert!(user.is_registered);
    assert_eq!(user.name, "aseem");
    assert_eq!(entry_point(env.store.as_ref()), Route::Services);

    // Services are still gated on document availability.
    assert!(services_gate(env.store.as_ref()).is_err());
    env.kyc()
        .submit_availability(AvailabilityAnswers {
            has_pan: true,
            has_aadhaar: true,
            has_both_now: true,
        })
        .unwrap();
    services_gate(env.store.as_ref()).unwrap();

    // KYC: capture PAN, skip Aadhaar, selfie.
    let kyc = env.kyc();
    kyc.capture_pan(sample_image()).await.unwrap();
    kyc.skip_aadhaar().unwrap();
    let record = kyc.capture_selfie(sample_image()).await.unwrap();
    assert!(record.is_verified);

    // Loan: submit, approve, terms, mandate, signature, disbursement.
    let loan = env.loan();
    let app = loan
        .submit(LoanRequest {
            amount: 50000,
            tenure: 12,
            consent: true,
        })
        .await
        .unwrap();
    loan.approve(&app.id).unwrap();
    loan.accept_terms(&app.id).unwrap();
    loan.complete_mandate(&app.id, mandate_authorization())
        .await
        .unwrap();
    loan.complete_signature(&app.id, vec!["agreement.pdf".to_string()])
        .await
        .unwrap();
    let disbursed = loan.run_disbursement(&app.id).await.unwrap();
    assert_eq!(disbursed.status, LoanStatus::Disbursed);

    let completion = loan.completion_for(&app.id).unwrap();
    assert!(completion.enach_mandate.completed);
    assert!(completion.e_signature.completed);

    // EWA: consent, mandate, agreement, first drawdown.
    let ewa = env.ewa();
    ewa.give_consent().unwrap();
    ewa.complete_mandate(mandate_authorization()).await.unwrap();
    ewa.sign_agreement().await.unwrap();

    let now = Utc::now();
    let request = ewa
        .request_drawdown(10000, Some("school fees".to_string()), now)
        .unwrap();
    assert_eq!(request.status, DrawdownStatus::Requested);
    assert_eq!(ewa.available_balance(now).unwrap(), 6000);
}

#[tokio::test]
async fn test_resume_positions_survive_reload() {
    let env = TestEnv::new();
    env.register().await;

    let kyc = env.kyc();
    kyc.skip_pan().unwrap();
    kyc.capture_aadhaar(sample_image()).await.unwrap();

    // "Reload": brand-new controllers over the same store.
    let fresh = TestEnv::with_store(Arc::clone(&env.store));
    assert_eq!(fresh.kyc().resume(), KycStep::Selfie);
    assert_eq!(fresh.kyc().enter(KycStep::Pan), KycStep::Selfie);

    fresh.kyc().capture_selfie(sample_image()).await.unwrap();
    fresh.ewa().give_consent().unwrap();

    let after_consent = TestEnv::with_store(Arc::clone(&env.store));
    assert_eq!(after_consent.ewa().resume(), EwaSetupStep::Mandate);
}

#[tokio::test]
async fn test_state_survives_process_restart_with_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let store = Arc::new(FileStore::open(&path).unwrap());
        let env = TestEnv::with_store(store);
        env.register().await;
        env.complete_kyc().await;
        env.loan()
            .submit(LoanRequest {
                amount: 50000,
                tenure: 12,
                consent: true,
            })
            .await
            .unwrap();
    }

    // New process: everything is where the last one left it.
    let store = Arc::new(FileStore::open(&path).unwrap());
    let env = TestEnv::with_store(store);
    assert!(env.registration().user().unwrap().is_registered);
    assert!(env.kyc().is_verified());

    let apps = env.loan().applications();
    assert_eq!(apps.len(), 1);
    assert_eq!(apps[0].status, LoanStatus::KycDone);

    // The in-flight application still blocks a second submission.
    assert!(env.loan().can_submit().is_err());
}

#[tokio::test]
async fn test_malformed_record_sends_flow_back_to_start() {
    let env = TestEnv::new();
    env.register().await;
    env.complete_kyc().await;

    // Corrupt the KYC record behind the repositories' back.
    env.store
        .set("kycData", serde_json::json!({"isVerified": "definitely"}))
        .unwrap();

    // The record reads as absent and the wizard restarts at PAN.
    assert!(!env.kyc().is_verified());
    assert_eq!(env.kyc().resume(), KycStep::Pan);
}
