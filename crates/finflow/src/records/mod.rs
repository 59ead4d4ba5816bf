//! Typed schemas for every persisted record.
//!
//! Field names serialize in camelCase and status enums in snake_case so the
//! persisted documents match the store's external key/field schema exactly.

pub mod ewa;
pub mod kyc;
pub mod loan;
pub mod progress;
pub mod user;

pub use ewa::{DrawdownRequest, DrawdownStatus, EwaApplication, EwaStatus};
pub use kyc::{AvailabilityAnswers, DocumentImage, KycAvailability, KycRecord, KycStep};
pub use loan::{
    transition, BankDetails, DocumentCompletion, ESignature, EnachMandate, LoanApplication,
    LoanEvent, LoanStatus, MandateAuthorization,
};
pub use progress::FlowProgress;
pub use user::{AuthMethod, UserRecord};
