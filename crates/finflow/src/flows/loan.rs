//! Loan origination.
//!
//! Submission creates an application in `kyc_done`; approval is an
//! operator action; accepting terms opens the eNACH mandate, then
//! e-signature, then a timed automatic disbursement. A new application is
//! blocked while any existing one sits outside the terminal set.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::config::ProductConfig;
use crate::emi::{self, EmiQuote, Installment};
use crate::error::{FlowError, Result, ValidationError};
use crate::records::{
    transition, DocumentCompletion, ESignature, EnachMandate, LoanApplication, LoanEvent,
    LoanStatus, MandateAuthorization,
};
use crate::repo::{kyc_repo, loan_repo, user_repo};
use crate::services::Simulator;
use crate::store::KeyValueStore;

/// What the loan form collects.
#[derive(Debug, Clone)]
pub struct LoanRequest {
    pub amount: u64,
    pub tenure: u32,
    pub consent: bool,
}

#[derive(Clone)]
pub struct LoanFlow {
    store: Arc<dyn KeyValueStore>,
    config: Arc<ProductConfig>,
    sim: Simulator,
}

impl LoanFlow {
    pub fn new(store: Arc<dyn KeyValueStore>, config: Arc<ProductConfig>) -> Self {
        let sim = Simulator::from_config(&config);
        Self { store, config, sim }
    }

    pub fn applications(&self) -> Vec<LoanApplication> {
        loan_repo::applications(self.store.as_ref())
    }

    /// The latest-created application, the one gating treats as "the
    /// existing application".
    pub fn current_application(&self) -> Option<LoanApplication> {
        loan_repo::latest(self.store.as_ref())
    }

    pub fn find(&self, id: &str) -> Result<LoanApplication> {
        loan_repo::find(self.store.as_ref(), id).ok_or_else(|| {
            FlowError::ApplicationNotFound { id: id.to_string() }.into()
        })
    }

    pub fn completion_for(&self, id: &str) -> Option<DocumentCompletion> {
        loan_repo::completion_for(self.store.as_ref(), id)
    }

    /// Gate for a new submission: registered user, verified KYC, and every
    /// existing application in a terminal status.
    pub fn can_submit(&self) -> Result<()> {
        match user_repo::get(self.store.as_ref()) {
            Some(user) if user.is_registered => {}
            _ => return Err(FlowError::NotRegistered.into()),
        }

        match kyc_repo::record(self.store.as_ref()) {
            Some(record) if record.is_verified => {}
            Some(record) => {
                return Err(FlowError::KycIncomplete {
                    next: record.next_missing_document(),
                }
                .into())
            }
            None => {
                return Err(FlowError::KycIncomplete {
                    next: crate::records::KycStep::Pan,
                }
                .into())
            }
        }

        if let Some(active) = self
            .applications()
            .into_iter()
            .find(|a| !a.status.is_terminal())
        {
            return Err(FlowError::ActiveApplicationExists { id: active.id }.into());
        }
        Ok(())
    }

    pub fn validate_request(&self, request: &LoanRequest) -> std::result::Result<(), ValidationError> {
        if !request.consent {
            return Err(ValidationError::ConsentRequired);
        }
        let loan = &self.config.loan;
        if request.amount < loan.min_amount || request.amount > loan.max_amount {
            return Err(ValidationError::AmountOutOfRange {
                amount: request.amount,
                min: loan.min_amount,
                max: loan.max_amount,
            });
        }
        if !loan.tenures.contains(&request.tenure) {
            return Err(ValidationError::UnsupportedTenure {
                tenure: request.tenure,
            });
        }
        Ok(())
    }

    /// Submits the loan form. Validation and gating run before the
    /// simulated employment-info fetch, so a rejected submission leaves no
    /// partial state behind.
    pub async fn submit(&self, request: LoanRequest) -> Result<LoanApplication> {
        self.validate_request(&request)?;
        self.can_submit()?;

        let employment = self.sim.fetch_employment_info().await;
        info!(
            employer = %employment.employer,
            amount = request.amount,
            tenure = request.tenure,
            "loan application submitted"
        );

        let application = LoanApplication::new(request.amount, request.tenure, Utc::now());
        loan_repo::upsert(self.store.as_ref(), &application)?;
        Ok(application)
    }

    /// Applies one state-machine event and persists the result.
    fn apply_event(&self, id: &str, event: LoanEvent) -> Result<LoanApplication> {
        let mut application = self.find(id)?;
        application.status = transition(application.status, event)?;
        application.updated_at = Utc::now();
        loan_repo::upsert(self.store.as_ref(), &application)?;
        Ok(application)
    }

    /// Operator/test action.
    pub fn approve(&self, id: &str) -> Result<LoanApplication> {
        self.apply_event(id, LoanEvent::Approve)
    }

    /// Operator/test action.
    pub fn reject(&self, id: &str) -> Result<LoanApplication> {
        self.apply_event(id, LoanEvent::Reject)
    }

    /// Accepting the loan terms opens the mandate step and creates the
    /// document-completion record for this application.
    pub fn accept_terms(&self, id: &str) -> Result<LoanApplication> {
        let application = self.apply_event(id, LoanEvent::AcceptTerms)?;
        let completion = self
            .completion_for(id)
            .unwrap_or_else(|| DocumentCompletion::new(id.to_string()));
        loan_repo::save_completion(self.store.as_ref(), &completion)?;
        Ok(application)
    }

    /// Completes the eNACH mandate: authorization checkbox plus fixed bank
    /// metadata, then the simulated authorization delay.
    pub async fn complete_mandate(
        &self,
        id: &str,
        authorization: MandateAuthorization,
    ) -> Result<LoanApplication> {
        if !authorization.authorized {
            return Err(ValidationError::AuthorizationRequired.into());
        }
        if authorization.bank_details.bank_name.trim().is_empty() {
            return Err(ValidationError::MissingField("bankName").into());
        }
        // Fail fast while still in document_check.
        let current = self.find(id)?;
        transition(current.status, LoanEvent::CompleteMandate)?;

        let receipt = self.sim.authorize_mandate().await;

        let application = self.apply_event(id, LoanEvent::CompleteMandate)?;
        let mut completion = self
            .completion_for(id)
            .unwrap_or_else(|| DocumentCompletion::new(id.to_string()));
        completion.enach_mandate = EnachMandate {
            completed: true,
            completed_at: Some(receipt.authorized_at),
            authentication_mode: Some(authorization.authentication_mode),
            bank_details: Some(authorization.bank_details),
        };
        loan_repo::save_completion(self.store.as_ref(), &completion)?;
        Ok(application)
    }

    /// Completes the e-signature and schedules the automatic disbursement
    /// as a fire-and-forget timer. [`Self::run_disbursement`] can be
    /// awaited directly instead for deterministic callers.
    pub async fn complete_signature(
        &self,
        id: &str,
        documents_signed: Vec<String>,
    ) -> Result<LoanApplication> {
        let current = self.find(id)?;
        transition(current.status, LoanEvent::CompleteSignature)?;

        let receipt = self.sim.sign_contract().await;

        let application = self.apply_event(id, LoanEvent::CompleteSignature)?;
        let mut completion = self
            .completion_for(id)
            .unwrap_or_else(|| DocumentCompletion::new(id.to_string()));
        completion.e_signature = ESignature {
            completed: true,
            completed_at: Some(receipt.signed_at),
            documents_signed,
        };
        loan_repo::save_completion(self.store.as_ref(), &completion)?;

        let flow = self.clone();
        let id = id.to_string();
        tokio::spawn(async move {
            if let Err(e) = flow.run_disbursement(&id).await {
                warn!("scheduled disbursement for {} failed: {}", id, e);
            }
        });

        Ok(application)
    }

    /// Waits out the disbursement delay, then moves `completed` to
    /// `disbursed`. Idempotent: an application that is already disbursed
    /// (the spawned timer and a direct call can both get here) is returned
    /// unchanged.
    pub async fn run_disbursement(&self, id: &str) -> Result<LoanApplication> {
        let current = self.find(id)?;
        if current.status == LoanStatus::Disbursed {
            return Ok(current);
        }
        transition(current.status, LoanEvent::Disburse)?;

        let receipt = self.sim.disburse().await;

        // Fresh read after the delay; the timer may have lost the race.
        let current = self.find(id)?;
        if current.status == LoanStatus::Disbursed {
            return Ok(current);
        }
        info!(utr = %receipt.utr, application = %id, "loan disbursed");
        match self.apply_event(id, LoanEvent::Disburse) {
            Ok(application) => Ok(application),
            Err(e) => {
                let current = self.find(id)?;
                if current.status == LoanStatus::Disbursed {
                    Ok(current)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Full repayment: all EMIs marked paid.
    pub fn close(&self, id: &str) -> Result<LoanApplication> {
        self.apply_event(id, LoanEvent::Close)
    }

    /// Demo/test escape hatch: place an application in an arbitrary status,
    /// bypassing the transition table.
    pub fn override_status(&self, id: &str, status: LoanStatus) -> Result<LoanApplication> {
        let mut application = self.find(id)?;
        warn!(
            application = %id,
            from = %application.status,
            to = %status,
            "manual status override"
        );
        application.status = status;
        application.updated_at = Utc::now();
        loan_repo::upsert(self.store.as_ref(), &application)?;
        Ok(application)
    }

    /// Removes an application after user confirmation. If it was the
    /// blocking application this immediately unblocks new submissions.
    pub fn delete(&self, id: &str) -> Result<bool> {
        Ok(loan_repo::delete(self.store.as_ref(), id)?)
    }

    pub fn emi_quote(&self, amount: u64, tenure: u32) -> Result<EmiQuote> {
        Ok(emi::quote(
            amount,
            self.config.loan.annual_interest_rate,
            tenure,
        )?)
    }

    /// The repayment schedule for an application. The synthetic
    /// disbursement date is the last status change for a disbursed or
    /// closed loan, `today` otherwise (preview).
    pub fn emi_schedule(
        &self,
        application: &LoanApplication,
        today: NaiveDate,
    ) -> Result<Vec<Installment>> {
        let quote = self.emi_quote(application.loan_amount, application.tenure)?;
        let disbursed_on = match application.status {
            LoanStatus::Disbursed | LoanStatus::Closed => application.updated_at.date_naive(),
            _ => today,
        };
        Ok(emi::schedule(
            &quote,
            disbursed_on,
            application.status == LoanStatus::Closed,
            today,
        ))
    }
}
