//! KYC capture wizard.
//!
//! Availability questions → PAN capture-or-skip → Aadhaar capture-or-skip
//! → mandatory selfie → verified. Every step checks on entry whether its
//! document is already on file and auto-skips forward, so the wizard is
//! idempotent and re-entrant from any bookmarked position.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::ProductConfig;
use crate::error::{FlowError, Result, ValidationError};
use crate::records::kyc::Gender;
use crate::records::{AvailabilityAnswers, DocumentImage, KycAvailability, KycRecord, KycStep};
use crate::repo::{kyc_repo, user_repo};
use crate::services::{DocumentKind, Simulator};
use crate::store::KeyValueStore;

#[derive(Clone)]
pub struct KycFlow {
    store: Arc<dyn KeyValueStore>,
    sim: Simulator,
}

impl KycFlow {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &ProductConfig) -> Self {
        Self {
            store,
            sim: Simulator::from_config(config),
        }
    }

    pub fn availability(&self) -> Option<KycAvailability> {
        kyc_repo::availability(self.store.as_ref())
    }

    /// Persists the three availability answers. `can_proceed` is derived,
    /// never supplied.
    pub fn submit_availability(&self, answers: AvailabilityAnswers) -> Result<KycAvailability> {
        let availability: KycAvailability = answers.into();
        kyc_repo::save_availability(self.store.as_ref(), &availability)?;
        Ok(availability)
    }

    pub fn record(&self) -> Option<KycRecord> {
        kyc_repo::record(self.store.as_ref())
    }

    pub fn is_verified(&self) -> bool {
        self.record().is_some_and(|r| r.is_verified)
    }

    /// Loads the existing record or seeds a fresh one from the registered
    /// user. Reaching capture without a registered user redirects upstream.
    fn load_or_begin(&self, gender: Option<Gender>) -> Result<KycRecord> {
        if let Some(record) = self.record() {
            return Ok(record);
        }
        let user = user_repo::get(self.store.as_ref()).ok_or(FlowError::NotRegistered)?;
        Ok(KycRecord::new(user.name, user.mobile, gender))
    }

    /// Starts (or re-enters) the wizard.
    pub fn begin(&self, gender: Option<Gender>) -> Result<KycRecord> {
        let record = self.load_or_begin(gender)?;
        kyc_repo::save_record(self.store.as_ref(), &record)?;
        Ok(record)
    }

    /// Entry guard for a capture screen: returns the step to actually
    /// show. A satisfied or not-yet-reachable step resolves to the next
    /// missing document, which makes every deep link resume-safe.
    pub fn enter(&self, _requested: KycStep) -> KycStep {
        self.resume()
    }

    /// Recomputes the resume position from the documents on file.
    pub fn resume(&self) -> KycStep {
        self.record()
            .map(|r| r.next_missing_document())
            .unwrap_or(KycStep::Pan)
    }

    pub async fn capture_pan(&self, image: DocumentImage) -> Result<KycRecord> {
        if !image.is_present() {
            return Err(ValidationError::EmptyDocument.into());
        }
        let mut record = self.load_or_begin(None)?;
        self.sim.verify_document(DocumentKind::Pan).await;
        record.pan_document = Some(image);
        record.pan_skipped = false;
        kyc_repo::save_record(self.store.as_ref(), &record)?;
        Ok(record)
    }

    pub fn skip_pan(&self) -> Result<KycRecord> {
        let mut record = self.load_or_begin(None)?;
        record.pan_skipped = true;
        kyc_repo::save_record(self.store.as_ref(), &record)?;
        Ok(record)
    }

    pub async fn capture_aadhaar(&self, image: DocumentImage) -> Result<KycRecord> {
        if !image.is_present() {
            return Err(ValidationError::EmptyDocument.into());
        }
        let mut record = self.load_or_begin(None)?;
        self.sim.verify_document(DocumentKind::Aadhaar).await;
        record.aadhaar_document = Some(image);
        record.aadhaar_skipped = false;
        kyc_repo::save_record(self.store.as_ref(), &record)?;
        Ok(record)
    }

    pub fn skip_aadhaar(&self) -> Result<KycRecord> {
        let mut record = self.load_or_begin(None)?;
        record.aadhaar_skipped = true;
        kyc_repo::save_record(self.store.as_ref(), &record)?;
        Ok(record)
    }

    /// The selfie has no skip path; capturing it completes verification.
    pub async fn capture_selfie(&self, image: DocumentImage) -> Result<KycRecord> {
        if !image.is_present() {
            return Err(ValidationError::EmptyDocument.into());
        }
        let mut record = self.load_or_begin(None)?;
        self.sim.verify_document(DocumentKind::Selfie).await;
        record.selfie_document = Some(image);
        record.is_verified = true;
        record.completed_at = Some(Utc::now());
        kyc_repo::save_record(self.store.as_ref(), &record)?;
        info!(mobile = %record.mobile, "kyc verification complete");
        Ok(record)
    }
}
