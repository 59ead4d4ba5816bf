use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Product configuration: loan terms, EWA constants and simulated-service
/// delays. Every field is defaulted so an empty `{"version": "1.0"}` file
/// yields the stock demo behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductConfig {
    pub version: String,
    #[serde(default)]
    pub loan: LoanConfig,
    #[serde(default)]
    pub ewa: EwaConfig,
    #[serde(default)]
    pub simulation: SimulationDelays,
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            loan: LoanConfig::default(),
            ewa: EwaConfig::default(),
            simulation: SimulationDelays::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanConfig {
    /// Annual interest rate in percent, e.g. 12.5.
    #[serde(default = "default_annual_interest_rate")]
    pub annual_interest_rate: Decimal,
    #[serde(default = "default_min_amount")]
    pub min_amount: u64,
    #[serde(default = "default_max_amount")]
    pub max_amount: u64,
    /// Permitted tenures in months.
    #[serde(default = "default_tenures")]
    pub tenures: Vec<u32>,
}

fn default_annual_interest_rate() -> Decimal {
    dec!(12.5)
}

fn default_min_amount() -> u64 {
    10_000
}

fn default_max_amount() -> u64 {
    500_000
}

fn default_tenures() -> Vec<u32> {
    vec![3, 6, 9, 12, 18, 24]
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self {
            annual_interest_rate: default_annual_interest_rate(),
            min_amount: default_min_amount(),
            max_amount: default_max_amount(),
            tenures: default_tenures(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EwaConfig {
    #[serde(default = "default_max_withdrawal")]
    pub max_withdrawal: u64,
    #[serde(default = "default_monthly_salary")]
    pub monthly_salary: u64,
    /// Flat processing fee shown for disbursed drawdowns, in percent.
    #[serde(default = "default_processing_fee_percent")]
    pub processing_fee_percent: Decimal,
    /// Day of the following month on which a drawdown is repaid.
    #[serde(default = "default_repayment_day")]
    pub repayment_day: u32,
}

fn default_max_withdrawal() -> u64 {
    16_000
}

fn default_monthly_salary() -> u64 {
    50_000
}

fn default_processing_fee_percent() -> Decimal {
    dec!(2)
}

fn default_repayment_day() -> u32 {
    25
}

impl Default for EwaConfig {
    fn default() -> Self {
        Self {
            max_withdrawal: default_max_withdrawal(),
            monthly_salary: default_monthly_salary(),
            processing_fee_percent: default_processing_fee_percent(),
            repayment_day: default_repayment_day(),
        }
    }
}

/// Artificial latencies for the simulated external services, in
/// milliseconds. Defaults sit in the 1.5-3s band so loading states are
/// visible; [`SimulationDelays::none`] zeroes everything for tests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationDelays {
    #[serde(default = "default_profile_lookup_ms")]
    pub profile_lookup_ms: u64,
    #[serde(default = "default_otp_verify_ms")]
    pub otp_verify_ms: u64,
    #[serde(default = "default_document_verify_ms")]
    pub document_verify_ms: u64,
    #[serde(default = "default_employment_fetch_ms")]
    pub employment_fetch_ms: u64,
    #[serde(default = "default_signature_ms")]
    pub signature_ms: u64,
    #[serde(default = "default_disbursement_ms")]
    pub disbursement_ms: u64,
}

fn default_profile_lookup_ms() -> u64 {
    2000
}

fn default_otp_verify_ms() -> u64 {
    1500
}

fn default_document_verify_ms() -> u64 {
    2500
}

fn default_employment_fetch_ms() -> u64 {
    2000
}

fn default_signature_ms() -> u64 {
    2000
}

fn default_disbursement_ms() -> u64 {
    3000
}

impl Default for SimulationDelays {
    fn default() -> Self {
        Self {
            profile_lookup_ms: default_profile_lookup_ms(),
            otp_verify_ms: default_otp_verify_ms(),
            document_verify_ms: default_document_verify_ms(),
            employment_fetch_ms: default_employment_fetch_ms(),
            signature_ms: default_signature_ms(),
            disbursement_ms: default_disbursement_ms(),
        }
    }
}

impl SimulationDelays {
    /// All delays zero. Used by tests and the demo's fast mode.
    pub fn none() -> Self {
        Self {
            profile_lookup_ms: 0,
            otp_verify_ms: 0,
            document_verify_ms: 0,
            employment_fetch_ms: 0,
            signature_ms: 0,
            disbursement_ms: 0,
        }
    }
}
