//! Headless walkthrough of every flow: registration → KYC → loan to
//! disbursement → EWA drawdowns. Runs against a fresh in-memory store so
//! each invocation starts from a first visit.
//!
//! Simulated-service delays come from an optional config file passed as
//! the first argument; `FINFLOW_FAST=1` zeroes them.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use finflow::flows::{entry_point, services_gate};
use finflow::records::ewa::DrawdownStatus;
use finflow::records::kyc::DocumentImage;
use finflow::records::loan::{AuthenticationMode, BankDetails, MandateAuthorization};
use finflow::records::{AuthMethod, AvailabilityAnswers};
use finflow::repo::user_repo;
use finflow::{
    redirect_for, EwaFlow, FinflowError, KycFlow, LoanFlow, LoanRequest, MemoryStore,
    ProductConfig, RegistrationFlow, SimulationDelays,
};

fn load_product_config() -> ProductConfig {
    let mut config = match std::env::args().nth(1) {
        Some(path) => match finflow::load_config(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("failed to load config '{}': {}, using defaults", path, e);
                ProductConfig::default()
            }
        },
        None => ProductConfig::default(),
    };

    if std::env::var("FINFLOW_FAST").is_ok() {
        config.simulation = SimulationDelays::none();
    }
    config
}

fn sample_capture(name: &str) -> DocumentImage {
    DocumentImage {
        data: "ZmFrZS1pbWFnZS1wYXlsb2Fk".to_string(),
        file_name: Some(format!("{name}.jpg")),
        mime_type: Some("image/jpeg".to_string()),
    }
}

fn mandate_authorization() -> MandateAuthorization {
    MandateAuthorization {
        authorized: true,
        authentication_mode: AuthenticationMode::NetBanking,
        bank_details: BankDetails {
            bank_name: "State Bank".to_string(),
            account_number: "00112233445".to_string(),
            ifsc: "SBIN0000001".to_string(),
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), FinflowError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting finflow demo v{}", env!("CARGO_PKG_VERSION"));

    let config = Arc::new(load_product_config());
    let store: Arc<dyn finflow::KeyValueStore> = Arc::new(MemoryStore::new());

    // ── Entry and registration ──
    info!("first visit lands on {:?}", entry_point(store.as_ref()));
    user_repo::set_selected_language(store.as_ref(), "en")?;

    let registration = RegistrationFlow::new(Arc::clone(&store), &config);
    let profile = registration.lookup_profile("8077319041").await?;
    info!(name = %profile.name, employee_id = %profile.employee_id, "profile found");
    registration.verify_otp("123456").await?;
    let user = registration.register(&profile, AuthMethod::MobileOtp)?;
    info!(mobile = %user.mobile, "registered");

    // ── KYC ──
    let kyc = KycFlow::new(Arc::clone(&store), &config);
    kyc.submit_availability(AvailabilityAnswers {
        has_pan: true,
        has_aadhaar: true,
        has_both_now: true,
    })?;
    services_gate(store.as_ref())?;

    kyc.capture_pan(sample_capture("pan")).await?;
    kyc.skip_aadhaar()?;
    let record = kyc.capture_selfie(sample_capture("selfie")).await?;
    info!(verified = record.is_verified, "kyc complete");

    // ── Loan origination ──
    let loan = LoanFlow::new(Arc::clone(&store), Arc::clone(&config));
    let quote = loan.emi_quote(50_000, 12)?;
    info!(
        emi = %quote.emi,
        total_payable = %quote.total_payable,
        total_interest = %quote.total_interest,
        "loan terms for 50,000 over 12 months"
    );

    let application = loan
        .submit(LoanRequest {
            amount: 50_000,
            tenure: 12,
            consent: true,
        })
        .await?;
    loan.approve(&application.id)?;
    loan.accept_terms(&application.id)?;
    loan.complete_mandate(&application.id, mandate_authorization())
        .await?;
    loan.complete_signature(&application.id, vec!["loan-agreement.pdf".to_string()])
        .await?;
    let disbursed = loan.run_disbursement(&application.id).await?;
    info!(status = %disbursed.status, "loan settled");

    let schedule = loan.emi_schedule(&disbursed, Utc::now().date_naive())?;
    for installment in schedule.iter().take(3) {
        info!(
            seq = installment.sequence,
            due = %installment.due_date,
            amount = %installment.amount,
            status = ?installment.status,
            "installment"
        );
    }
    loan.close(&disbursed.id)?;

    // ── EWA ──
    let ewa = EwaFlow::new(Arc::clone(&store), Arc::clone(&config));
    ewa.give_consent()?;
    ewa.complete_mandate(mandate_authorization()).await?;
    ewa.sign_agreement().await?;

    let now = Utc::now();
    let balance = ewa.available_balance(now)?;
    info!(balance, "monthly balance");
    let request = ewa.request_drawdown(10_000, Some("school fees".to_string()), now)?;
    let request = ewa.update_request_status(&request.id, DrawdownStatus::Disbursed)?;
    if let Some(summary) = ewa.disbursed_summary(&request) {
        info!(
            fee = %summary.processing_fee,
            repayment = %summary.repayment_date,
            "drawdown disbursed"
        );
    }

    // A second request over the remaining balance is rejected inline.
    match ewa.request_drawdown(8_000, None, now) {
        Err(e) => {
            info!("second drawdown rejected as expected: {}", e);
            if let FinflowError::Flow(flow_error) = &e {
                if let Some(route) = redirect_for(flow_error) {
                    info!("would redirect to {:?}", route);
                }
            }
        }
        Ok(_) => warn!("second drawdown unexpectedly allowed"),
    }

    let remaining = ewa.available_balance(now)?;
    info!(balance = remaining, "remaining balance");
    info!("demo complete");
    Ok(())
}
