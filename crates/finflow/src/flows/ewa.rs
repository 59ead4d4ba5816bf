//! Earned-wage-access origination and drawdowns.
//!
//! Setup requires completed KYC; consent creates the application in
//! `mandate_setup`; mandate authorization plus agreement signature make it
//! `active`. Drawdowns are gated by a monthly quota and by every prior
//! request having reached a terminal status.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::info;

use crate::config::ProductConfig;
use crate::emi::day_in_month_after;
use crate::error::{FlowError, Result, ValidationError};
use crate::records::ewa::available_balance;
use crate::records::{
    DrawdownRequest, DrawdownStatus, EnachMandate, EwaApplication, EwaStatus, KycStep,
    MandateAuthorization,
};
use crate::repo::{ewa_repo, kyc_repo, user_repo};
use crate::services::Simulator;
use crate::store::KeyValueStore;

/// Where the setup wizard resumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EwaSetupStep {
    Consent,
    Mandate,
    Agreement,
    Dashboard,
}

/// Presentational figures shown for a disbursed request only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawdownSummary {
    pub processing_fee: Decimal,
    pub repayment_date: NaiveDate,
}

#[derive(Clone)]
pub struct EwaFlow {
    store: Arc<dyn KeyValueStore>,
    config: Arc<ProductConfig>,
    sim: Simulator,
}

impl EwaFlow {
    pub fn new(store: Arc<dyn KeyValueStore>, config: Arc<ProductConfig>) -> Self {
        let sim = Simulator::from_config(&config);
        Self { store, config, sim }
    }

    pub fn application(&self) -> Option<EwaApplication> {
        ewa_repo::application(self.store.as_ref())
    }

    pub fn requests(&self) -> Vec<DrawdownRequest> {
        ewa_repo::requests(self.store.as_ref())
    }

    /// Setup gate: registered user and fully verified KYC. A missing
    /// document redirects to that specific capture step.
    pub fn setup_gate(&self) -> Result<()> {
        match user_repo::get(self.store.as_ref()) {
            Some(user) if user.is_registered => {}
            _ => return Err(FlowError::NotRegistered.into()),
        }
        match kyc_repo::record(self.store.as_ref()) {
            Some(record) if record.is_verified => Ok(()),
            Some(record) => Err(FlowError::KycIncomplete {
                next: record.next_missing_document(),
            }
            .into()),
            None => Err(FlowError::KycIncomplete { next: KycStep::Pan }.into()),
        }
    }

    /// Consent acceptance creates the application with the configured
    /// constants. Idempotent: an existing application is returned as-is.
    pub fn give_consent(&self) -> Result<EwaApplication> {
        self.setup_gate()?;
        if let Some(existing) = self.application() {
            return Ok(existing);
        }
        let application = EwaApplication::new(
            self.config.ewa.max_withdrawal,
            self.config.ewa.monthly_salary,
            Utc::now(),
        );
        ewa_repo::save_application(self.store.as_ref(), &application)?;
        info!(application = %application.id, "ewa consent given");
        Ok(application)
    }

    /// Mandate authorization: checkbox plus fixed bank metadata, then the
    /// simulated authorization delay.
    pub async fn complete_mandate(
        &self,
        authorization: MandateAuthorization,
    ) -> Result<EwaApplication> {
        if !authorization.authorized {
            return Err(ValidationError::AuthorizationRequired.into());
        }
        let mut application = self.application().ok_or(FlowError::NoEwaApplication)?;

        let receipt = self.sim.authorize_mandate().await;
        application.enach_mandate = Some(EnachMandate {
            completed: true,
            completed_at: Some(receipt.authorized_at),
            authentication_mode: Some(authorization.authentication_mode),
            bank_details: Some(authorization.bank_details),
        });
        ewa_repo::save_application(self.store.as_ref(), &application)?;
        Ok(application)
    }

    /// Signing the agreement activates the application. Requires the
    /// mandate to be completed first.
    pub async fn sign_agreement(&self) -> Result<EwaApplication> {
        let mut application = self.application().ok_or(FlowError::NoEwaApplication)?;
        if !application.mandate_completed() {
            return Err(FlowError::EwaNotActive {
                status: application.status,
            }
            .into());
        }

        self.sim.sign_contract().await;
        application.status = EwaStatus::Active;
        ewa_repo::save_application(self.store.as_ref(), &application)?;
        info!(application = %application.id, "ewa application active");
        Ok(application)
    }

    /// Recomputes the resume position from the persisted application.
    pub fn resume(&self) -> EwaSetupStep {
        match self.application() {
            None => EwaSetupStep::Consent,
            Some(app) if app.status == EwaStatus::Active => EwaSetupStep::Dashboard,
            Some(app) if app.mandate_completed() => EwaSetupStep::Agreement,
            Some(_) => EwaSetupStep::Mandate,
        }
    }

    /// The remaining quota for the calendar month of `now`.
    pub fn available_balance(&self, now: DateTime<Utc>) -> Result<u64> {
        let application = self.application().ok_or(FlowError::NoEwaApplication)?;
        Ok(available_balance(
            application.max_drawdown,
            &self.requests(),
            now,
        ))
    }

    /// Creates a drawdown request. Allowed only on an active application,
    /// with every prior request terminal and the amount within the monthly
    /// balance; a violation is a user-facing error, never a silent clamp.
    pub fn request_drawdown(
        &self,
        amount: u64,
        reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<DrawdownRequest> {
        let application = self.application().ok_or(FlowError::NoEwaApplication)?;
        if application.status != EwaStatus::Active {
            return Err(FlowError::EwaNotActive {
                status: application.status,
            }
            .into());
        }

        if let Some(open) = self
            .requests()
            .into_iter()
            .find(|r| !r.status.is_terminal())
        {
            return Err(FlowError::OutstandingDrawdown { id: open.id }.into());
        }

        let available = available_balance(application.max_drawdown, &self.requests(), now);
        if amount == 0 {
            return Err(ValidationError::AmountOutOfRange {
                amount: 0,
                min: 1,
                max: available,
            }
            .into());
        }
        if amount > available {
            return Err(ValidationError::ExceedsAvailableBalance {
                requested: amount,
                available,
            }
            .into());
        }

        let request = DrawdownRequest::new(amount, reason, now);
        ewa_repo::upsert_request(self.store.as_ref(), &request)?;
        info!(request = %request.id, amount, "drawdown requested");
        Ok(request)
    }

    /// Flat, externally driven status change; no timed transitions.
    /// Entering a terminal status stamps `completed_at`.
    pub fn update_request_status(
        &self,
        id: &str,
        status: DrawdownStatus,
    ) -> Result<DrawdownRequest> {
        let mut request = ewa_repo::find_request(self.store.as_ref(), id)
            .ok_or_else(|| FlowError::DrawdownNotFound { id: id.to_string() })?;
        request.status = status;
        if status.is_terminal() && request.completed_at.is_none() {
            request.completed_at = Some(Utc::now());
        }
        ewa_repo::upsert_request(self.store.as_ref(), &request)?;
        Ok(request)
    }

    /// Removes a request after user confirmation.
    pub fn delete_request(&self, id: &str) -> Result<bool> {
        Ok(ewa_repo::delete_request(self.store.as_ref(), id)?)
    }

    /// Fee and repayment date shown for disbursed requests: a flat
    /// percentage of the amount, repaid on the configured day of the
    /// following month. Purely presentational.
    pub fn disbursed_summary(&self, request: &DrawdownRequest) -> Option<DrawdownSummary> {
        if request.status != DrawdownStatus::Disbursed {
            return None;
        }
        let fee_rate = self.config.ewa.processing_fee_percent / Decimal::ONE_HUNDRED;
        let processing_fee = (Decimal::from(request.amount) * fee_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let basis = request.completed_at.unwrap_or(request.requested_at);
        let repayment_date =
            day_in_month_after(basis.date_naive(), 1, self.config.ewa.repayment_day);
        Some(DrawdownSummary {
            processing_fee,
            repayment_date,
        })
    }
}
