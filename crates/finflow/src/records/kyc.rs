use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The three yes/no answers from the document availability screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct AvailabilityAnswers {
    pub has_pan: bool,
    pub has_aadhaar: bool,
    pub has_both_now: bool,
}

/// Persisted under `kycAvailability`. `can_proceed` gates access to the
/// services screen and is true iff all three answers are yes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycAvailability {
    pub has_pan: bool,
    pub has_aadhaar: bool,
    pub has_both_now: bool,
    pub can_proceed: bool,
}

impl From<AvailabilityAnswers> for KycAvailability {
    fn from(answers: AvailabilityAnswers) -> Self {
        Self {
            has_pan: answers.has_pan,
            has_aadhaar: answers.has_aadhaar,
            has_both_now: answers.has_both_now,
            can_proceed: answers.has_pan && answers.has_aadhaar && answers.has_both_now,
        }
    }
}

/// An opaque captured image. The capture widget hands back a base64 payload
/// plus file metadata; the flows never inspect the contents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentImage {
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl DocumentImage {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            file_name: None,
            mime_type: None,
        }
    }

    pub fn is_present(&self) -> bool {
        !self.data.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// The wizard's document steps in their fixed order: PAN is handled first,
/// then Aadhaar, then the mandatory selfie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KycStep {
    Pan,
    Aadhaar,
    Selfie,
    Done,
}

/// Persisted under `kycData`, mutated incrementally as each document step
/// completes. "Document present" means a non-empty image payload or the
/// corresponding skip flag; the selfie has no skip path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycRecord {
    pub name: String,
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan_document: Option<DocumentImage>,
    #[serde(default)]
    pub pan_skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aadhaar_document: Option<DocumentImage>,
    #[serde(default)]
    pub aadhaar_skipped: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selfie_document: Option<DocumentImage>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl KycRecord {
    pub fn new(name: String, mobile: String, gender: Option<Gender>) -> Self {
        Self {
            name,
            mobile,
            gender,
            pan_document: None,
            pan_skipped: false,
            aadhaar_document: None,
            aadhaar_skipped: false,
            selfie_document: None,
            is_verified: false,
            completed_at: None,
        }
    }

    pub fn pan_handled(&self) -> bool {
        self.pan_skipped || self.pan_document.as_ref().is_some_and(|d| d.is_present())
    }

    pub fn aadhaar_handled(&self) -> bool {
        self.aadhaar_skipped
            || self.aadhaar_document.as_ref().is_some_and(|d| d.is_present())
    }

    pub fn selfie_present(&self) -> bool {
        self.selfie_document.as_ref().is_some_and(|d| d.is_present())
    }

    /// The next step still missing a document, in the fixed order PAN →
    /// Aadhaar → selfie → done. Idempotent: the record is not mutated, so
    /// two calls on the same record return the same step.
    pub fn next_missing_document(&self) -> KycStep {
        if !self.pan_handled() {
            KycStep::Pan
        } else if !self.aadhaar_handled() {
            KycStep::Aadhaar
        } else if !self.selfie_present() {
            KycStep::Selfie
        } else {
            KycStep::Done
        }
    }
}
