use std::path::PathBuf;
use thiserror::Error;

use crate::records::ewa::EwaStatus;
use crate::records::kyc::KycStep;
use crate::records::loan::{LoanEvent, LoanStatus};

#[derive(Error, Debug)]
pub enum FinflowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage quota exceeded writing key '{key}' ({attempted} bytes over a {quota} byte quota)")]
    QuotaExceeded {
        key: String,
        attempted: usize,
        quota: usize,
    },

    #[error("Failed to persist store file '{path}': {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Store lock poisoned - concurrent access failed")]
    LockPoisoned,
}

/// Gating and state-machine errors. Every variant that blocks entry to a
/// screen maps to an upstream redirect via [`crate::flows::redirect_for`].
#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Invalid loan transition: {event:?} is not allowed from status '{from}'")]
    InvalidLoanTransition { from: LoanStatus, event: LoanEvent },

    #[error("No registered user")]
    NotRegistered,

    #[error("Document availability has not been confirmed")]
    AvailabilityNotConfirmed,

    #[error("KYC incomplete, next missing document step: {next:?}")]
    KycIncomplete { next: KycStep },

    #[error("An application outside a terminal status already exists: {id}")]
    ActiveApplicationExists { id: String },

    #[error("Loan application not found: {id}")]
    ApplicationNotFound { id: String },

    #[error("No EWA application exists")]
    NoEwaApplication,

    #[error("EWA application is not active (status: {status:?})")]
    EwaNotActive { status: EwaStatus },

    #[error("An outstanding drawdown request is still in flight: {id}")]
    OutstandingDrawdown { id: String },

    #[error("Drawdown request not found: {id}")]
    DrawdownNotFound { id: String },
}

/// Inline input validation. Rejected synchronously, before any state
/// mutation or simulated-service call, so no partial writes can occur.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid mobile number '{value}': expected exactly 10 digits")]
    InvalidMobile { value: String },

    #[error("Invalid OTP: expected exactly 6 digits")]
    InvalidOtp,

    #[error("Required field missing: {0}")]
    MissingField(&'static str),

    #[error("Consent is required before submitting")]
    ConsentRequired,

    #[error("Mandate authorization checkbox must be ticked")]
    AuthorizationRequired,

    #[error("Loan amount {amount} is outside the permitted range {min}-{max}")]
    AmountOutOfRange { amount: u64, min: u64, max: u64 },

    #[error("Unsupported tenure: {tenure} months")]
    UnsupportedTenure { tenure: u32 },

    #[error("Requested amount {requested} exceeds the available monthly balance {available}")]
    ExceedsAvailableBalance { requested: u64, available: u64 },

    #[error("Captured document payload is empty")]
    EmptyDocument,
}

pub type Result<T> = std::result::Result<T, FinflowError>;
