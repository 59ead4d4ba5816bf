//! Builders for wiring up flow controllers against an isolated store.

#![allow(dead_code)]

use std::sync::Arc;

use finflow::config::{ProductConfig, SimulationDelays};
use finflow::flows::{EwaFlow, KycFlow, LoanFlow, RegistrationFlow};
use finflow::records::kyc::DocumentImage;
use finflow::records::loan::{AuthenticationMode, BankDetails, MandateAuthorization};
use finflow::records::{AuthMethod, UserRecord};
use finflow::store::{KeyValueStore, MemoryStore};

/// An isolated environment: one store, one zero-delay config, and flow
/// constructors over both.
pub struct TestEnv {
    pub store: Arc<dyn KeyValueStore>,
    pub config: Arc<ProductConfig>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        let mut config = ProductConfig::default();
        config.simulation = SimulationDelays::none();
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn registration(&self) -> RegistrationFlow {
        RegistrationFlow::new(Arc::clone(&self.store), &self.config)
    }

    pub fn kyc(&self) -> KycFlow {
        KycFlow::new(Arc::clone(&self.store), &self.config)
    }

    pub fn loan(&self) -> LoanFlow {
        LoanFlow::new(Arc::clone(&self.store), Arc::clone(&self.config))
    }

    pub fn ewa(&self) -> EwaFlow {
        EwaFlow::new(Arc::clone(&self.store), Arc::clone(&self.config))
    }

    /// Runs the registration journey with the canonical demo number.
    pub async fn register(&self) -> UserRecord {
        let flow = self.registration();
        let profile = flow.lookup_profile("8077319041").await.unwrap();
        flow.verify_otp("123456").await.unwrap();
        flow.register(&profile, AuthMethod::MobileOtp).unwrap()
    }

    /// Completes KYC the fast way: both documents skipped, selfie captured.
    pub async fn complete_kyc(&self) {
        let flow = self.kyc();
        flow.skip_pan().unwrap();
        flow.skip_aadhaar().unwrap();
        flow.capture_selfie(sample_image()).await.unwrap();
    }
}

pub fn sample_image() -> DocumentImage {
    DocumentImage {
        data: "ZmFrZS1pbWFnZS1wYXlsb2Fk".to_string(),
        file_name: Some("capture.jpg".to_string()),
        mime_type: Some("image/jpeg".to_string()),
    }
}

pub fn mandate_authorization() -> MandateAuthorization {
    MandateAuthorization {
        authorized: true,
        authentication_mode: AuthenticationMode::NetBanking,
        bank_details: BankDetails {
            bank_name: "State Bank".to_string(),
            account_number: "00112233445".to_string(),
            ifsc: "SBIN0000001".to_string(),
        },
    }
}
