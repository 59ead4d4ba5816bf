//! Owns `kycAvailability`, `kycData` and the `kycCurrentStep` bookmark.

use chrono::Utc;

use crate::error::StoreError;
use crate::records::{FlowProgress, KycAvailability, KycRecord, KycStep};
use crate::store::{keys, KeyValueStore};

use super::{read_record, write_record};

const KYC_STEPS: &[&str] = &["pan", "aadhaar", "selfie"];

pub fn availability(store: &dyn KeyValueStore) -> Option<KycAvailability> {
    read_record(store, keys::KYC_AVAILABILITY)
}

pub fn save_availability(
    store: &dyn KeyValueStore,
    availability: &KycAvailability,
) -> Result<(), StoreError> {
    write_record(store, keys::KYC_AVAILABILITY, availability)
}

pub fn record(store: &dyn KeyValueStore) -> Option<KycRecord> {
    read_record(store, keys::KYC_DATA)
}

/// Persists the record and writes the derived step bookmark through.
pub fn save_record(store: &dyn KeyValueStore, record: &KycRecord) -> Result<(), StoreError> {
    write_record(store, keys::KYC_DATA, record)?;
    write_bookmark(store, record)
}

/// `kycCurrentStep` is derived from the record, never maintained
/// independently, so it cannot disagree with the documents on file.
fn write_bookmark(store: &dyn KeyValueStore, record: &KycRecord) -> Result<(), StoreError> {
    let current = match record.next_missing_document() {
        KycStep::Pan => 0,
        KycStep::Aadhaar => 1,
        KycStep::Selfie => 2,
        KycStep::Done => KYC_STEPS.len(),
    };
    let progress = FlowProgress::at(KYC_STEPS, current, Utc::now());
    write_record(store, keys::KYC_CURRENT_STEP, &progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::kyc::DocumentImage;
    use crate::store::MemoryStore;

    #[test]
    fn test_bookmark_tracks_documents_on_file() {
        let store = MemoryStore::new();
        let mut rec = KycRecord::new("aseem".to_string(), "8077319041".to_string(), None);
        rec.pan_skipped = true;
        save_record(&store, &rec).unwrap();

        let bookmark: FlowProgress = read_record(&store, keys::KYC_CURRENT_STEP).unwrap();
        assert_eq!(bookmark.current_step, "aadhaar");
        assert_eq!(bookmark.completed_steps, vec!["pan"]);

        rec.aadhaar_document = Some(DocumentImage::new("ZGF0YQ=="));
        rec.selfie_document = Some(DocumentImage::new("ZGF0YQ=="));
        save_record(&store, &rec).unwrap();

        let bookmark: FlowProgress = read_record(&store, keys::KYC_CURRENT_STEP).unwrap();
        assert_eq!(bookmark.current_step, "done");
    }
}
