//! Canonical store keys. Multiple flows read each other's keys, so these
//! names are part of the external interface and must not change.

pub const SELECTED_LANGUAGE: &str = "selectedLanguage";
pub const USER_DATA: &str = "userData";
pub const KYC_AVAILABILITY: &str = "kycAvailability";
pub const KYC_DATA: &str = "kycData";
pub const KYC_CURRENT_STEP: &str = "kycCurrentStep";
pub const LOAN_APPLICATIONS: &str = "loanApplications";
pub const LOAN_APPLICATION: &str = "loanApplication";
pub const LOAN_PROGRESS: &str = "loanProgress";
pub const DOCUMENT_COMPLETION: &str = "documentCompletion";
pub const EWA_APPLICATION: &str = "ewaApplication";
pub const EWA_PROGRESS: &str = "ewaProgress";
pub const EWA_DRAWDOWN_REQUESTS: &str = "ewaDrawdownRequests";
