use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Loan application status. Not strictly linear: `rejected` is an absorbing
/// alternative reachable from the early states, and the manual override
/// escape hatch can place an application anywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    KycDone,
    Pending,
    Approved,
    DocumentCheck,
    MandateCompleted,
    Completed,
    Disbursed,
    Closed,
    Rejected,
}

impl LoanStatus {
    /// Terminal for gating purposes: an application in one of these states
    /// does not block a new submission.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Closed | Self::Disbursed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KycDone => "kyc_done",
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::DocumentCheck => "document_check",
            Self::MandateCompleted => "mandate_completed",
            Self::Completed => "completed",
            Self::Disbursed => "disbursed",
            Self::Closed => "closed",
            Self::Rejected => "rejected",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events that drive the loan state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoanEvent {
    Approve,
    Reject,
    AcceptTerms,
    CompleteMandate,
    CompleteSignature,
    Disburse,
    Close,
}

/// The explicit transition table: current status × event → next status.
/// Everything not listed is an invalid transition.
pub fn transition(from: LoanStatus, event: LoanEvent) -> Result<LoanStatus, FlowError> {
    use LoanEvent::*;
    use LoanStatus::*;

    let next = match (from, event) {
        (KycDone | Pending, Approve) => Approved,
        (KycDone | Pending, Reject) => Rejected,
        (Approved, AcceptTerms) => DocumentCheck,
        (DocumentCheck, CompleteMandate) => MandateCompleted,
        (MandateCompleted, CompleteSignature) => Completed,
        (Completed, Disburse) => Disbursed,
        (Disbursed, Close) => Closed,
        _ => return Err(FlowError::InvalidLoanTransition { from, event }),
    };
    Ok(next)
}

/// Persisted in the `loanApplications` list (and mirrored, for the latest
/// application, under the singular `loanApplication` key).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanApplication {
    pub id: String,
    pub loan_amount: u64,
    /// Tenure in months.
    pub tenure: u32,
    pub status: LoanStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoanApplication {
    pub fn new(loan_amount: u64, tenure: u32, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            loan_amount,
            tenure,
            status: LoanStatus::KycDone,
            created_at: now,
            updated_at: now,
        }
    }
}

/// What the user supplies on the eNACH mandate screen: the authorization
/// checkbox plus fixed metadata. Not a real banking integration.
#[derive(Debug, Clone)]
pub struct MandateAuthorization {
    pub authorized: bool,
    pub authentication_mode: AuthenticationMode,
    pub bank_details: BankDetails,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationMode {
    NetBanking,
    DebitCard,
    Aadhaar,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankDetails {
    pub bank_name: String,
    pub account_number: String,
    pub ifsc: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnachMandate {
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_mode: Option<AuthenticationMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_details: Option<BankDetails>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ESignature {
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub documents_signed: Vec<String>,
}

/// One record per loan application, created when the mandate step starts
/// and updated when the e-signature completes. Persisted as a map keyed by
/// application id under `documentCompletion`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentCompletion {
    pub application_id: String,
    #[serde(default)]
    pub enach_mandate: EnachMandate,
    #[serde(default)]
    pub e_signature: ESignature,
}

impl DocumentCompletion {
    pub fn new(application_id: String) -> Self {
        Self {
            application_id,
            enach_mandate: EnachMandate::default(),
            e_signature: ESignature::default(),
        }
    }
}
