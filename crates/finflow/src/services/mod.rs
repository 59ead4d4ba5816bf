//! Simulated external services.
//!
//! Each call stands in for a real network round-trip: a fixed artificial
//! delay followed by a constant payload, so callers can exercise loading
//! states. Every call succeeds; failure injection is deliberately not
//! modeled, matching the behavior these stubs replace. Swapping a method
//! for a real client must not require touching flow logic.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ProductConfig, SimulationDelays};

/// The constant employee directory entry returned for every lookup,
/// regardless of the mobile number supplied.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeProfile {
    pub name: String,
    pub mobile: String,
    pub employee_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pan,
    Aadhaar,
    Selfie,
}

impl DocumentKind {
    fn as_str(&self) -> &'static str {
        match self {
            Self::Pan => "pan",
            Self::Aadhaar => "aadhaar",
            Self::Selfie => "selfie",
        }
    }
}

/// Verification outcome for a captured document. `accepted` is always true.
#[derive(Debug, Clone)]
pub struct DocumentVerification {
    pub accepted: bool,
    pub reference: String,
}

/// The constant employment snapshot used by loan underwriting.
#[derive(Debug, Clone)]
pub struct EmploymentInfo {
    pub employer: String,
    pub monthly_salary: u64,
}

#[derive(Debug, Clone)]
pub struct MandateReceipt {
    pub reference: String,
    pub authorized_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SignatureReceipt {
    pub reference: String,
    pub signed_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct DisbursementReceipt {
    pub utr: String,
    pub disbursed_at: DateTime<Utc>,
}

/// Fixed-delay, constant-output stand-in for every external collaborator.
#[derive(Debug, Clone, Copy)]
pub struct Simulator {
    delays: SimulationDelays,
}

impl Simulator {
    pub fn new(delays: SimulationDelays) -> Self {
        Self { delays }
    }

    pub fn from_config(config: &ProductConfig) -> Self {
        Self::new(config.simulation)
    }

    pub fn delays(&self) -> SimulationDelays {
        self.delays
    }

    async fn pause(&self, operation: &'static str, millis: u64) {
        debug!(operation, delay_ms = millis, "simulated service call");
        if millis > 0 {
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
    }

    /// Identity lookup by mobile number. Always the same triple.
    pub async fn fetch_employee_profile(&self, _mobile: &str) -> EmployeeProfile {
        self.pause("fetch_employee_profile", self.delays.profile_lookup_ms)
            .await;
        EmployeeProfile {
            name: "aseem".to_string(),
            mobile: "8077319041".to_string(),
            employee_id: "EMP123".to_string(),
        }
    }

    /// OTP check. Succeeds for any code; callers validate the shape first.
    pub async fn verify_otp(&self, _code: &str) {
        self.pause("verify_otp", self.delays.otp_verify_ms).await;
    }

    /// Document OCR/verification. Always accepted.
    pub async fn verify_document(&self, kind: DocumentKind) -> DocumentVerification {
        self.pause("verify_document", self.delays.document_verify_ms)
            .await;
        DocumentVerification {
            accepted: true,
            reference: format!("VRF-{}-{}", kind.as_str(), uuid::Uuid::new_v4()),
        }
    }

    /// Employment snapshot fetched during loan submission.
    pub async fn fetch_employment_info(&self) -> EmploymentInfo {
        self.pause("fetch_employment_info", self.delays.employment_fetch_ms)
            .await;
        EmploymentInfo {
            employer: "Acme Industries Pvt Ltd".to_string(),
            monthly_salary: 50_000,
        }
    }

    /// eNACH mandate authorization. Always succeeds.
    pub async fn authorize_mandate(&self) -> MandateReceipt {
        self.pause("authorize_mandate", self.delays.signature_ms).await;
        MandateReceipt {
            reference: format!("NACH-{}", uuid::Uuid::new_v4()),
            authorized_at: Utc::now(),
        }
    }

    /// Contract e-signature. Always succeeds.
    pub async fn sign_contract(&self) -> SignatureReceipt {
        self.pause("sign_contract", self.delays.signature_ms).await;
        SignatureReceipt {
            reference: format!("SIG-{}", uuid::Uuid::new_v4()),
            signed_at: Utc::now(),
        }
    }

    /// Payment disbursement. Always succeeds.
    pub async fn disburse(&self) -> DisbursementReceipt {
        self.pause("disburse", self.delays.disbursement_ms).await;
        DisbursementReceipt {
            utr: format!("UTR{}", uuid::Uuid::new_v4().simple()),
            disbursed_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulator() -> Simulator {
        Simulator::new(SimulationDelays::none())
    }

    #[tokio::test]
    async fn test_profile_lookup_ignores_input() {
        let sim = simulator();
        let a = sim.fetch_employee_profile("8077319041").await;
        let b = sim.fetch_employee_profile("0000000000").await;
        assert_eq!(a.name, "aseem");
        assert_eq!(a.mobile, b.mobile);
        assert_eq!(b.employee_id, "EMP123");
    }

    #[tokio::test]
    async fn test_document_verification_always_accepts() {
        let sim = simulator();
        for kind in [DocumentKind::Pan, DocumentKind::Aadhaar, DocumentKind::Selfie] {
            let outcome = sim.verify_document(kind).await;
            assert!(outcome.accepted);
            assert!(outcome.reference.starts_with("VRF-"));
        }
    }

    #[tokio::test]
    async fn test_zero_delay_calls_complete_quickly() {
        let sim = simulator();
        let start = std::time::Instant::now();
        sim.verify_otp("123456").await;
        sim.sign_contract().await;
        sim.disburse().await;
        assert!(start.elapsed() < Duration::from_millis(500));
    }
}
