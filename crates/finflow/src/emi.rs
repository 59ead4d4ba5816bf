//! Equated-monthly-installment arithmetic.
//!
//! Standard amortizing-loan formula: `EMI = P*r*(1+r)^n / ((1+r)^n - 1)`
//! with `r` the monthly rate and `n` the tenure in months. All functions
//! here are pure; callers pass "today" in, so the same inputs always
//! produce the same outputs.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::error::ValidationError;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Installments fall due on the 15th of each month.
const DUE_DAY: u32 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiQuote {
    pub principal: Decimal,
    pub monthly_rate: Decimal,
    pub tenure: u32,
    pub emi: Decimal,
    pub total_payable: Decimal,
    pub total_interest: Decimal,
}

/// Decimal exponentiation by repeated multiplication. Tenures are small
/// (months), so this stays exact within Decimal's 28 significant digits.
fn pow(base: Decimal, exp: u32) -> Decimal {
    (0..exp).fold(Decimal::ONE, |acc, _| acc * base)
}

fn to_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes the EMI quote for `principal` at `annual_rate_percent` over
/// `tenure_months`. `total_interest` is `emi * n - principal` by
/// construction, so the round-trip identity holds exactly.
pub fn quote(
    principal: u64,
    annual_rate_percent: Decimal,
    tenure_months: u32,
) -> Result<EmiQuote, ValidationError> {
    if tenure_months == 0 {
        return Err(ValidationError::UnsupportedTenure { tenure: 0 });
    }

    let principal = Decimal::from(principal);
    let n = Decimal::from(tenure_months);
    let monthly_rate = annual_rate_percent / MONTHS_PER_YEAR / HUNDRED;

    let emi = if monthly_rate.is_zero() {
        to_money(principal / n)
    } else {
        let factor = pow(Decimal::ONE + monthly_rate, tenure_months);
        to_money(principal * monthly_rate * factor / (factor - Decimal::ONE))
    };

    let total_payable = emi * n;
    let total_interest = total_payable - principal;

    Ok(EmiQuote {
        principal,
        monthly_rate,
        tenure: tenure_months,
        emi,
        total_payable,
        total_interest,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallmentStatus {
    Paid,
    Overdue,
    Upcoming,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub sequence: u32,
    pub due_date: NaiveDate,
    pub amount: Decimal,
    pub status: InstallmentStatus,
}

/// The calendar (year, month) `months` after `date`'s month.
pub(crate) fn month_after(date: NaiveDate, months: u32) -> (i32, u32) {
    let zero_based = date.year() * 12 + date.month0() as i32 + months as i32;
    (zero_based.div_euclid(12), zero_based.rem_euclid(12) as u32 + 1)
}

/// `day` of the month `months` after `date`'s month. `day` must be <= 28.
pub(crate) fn day_in_month_after(date: NaiveDate, months: u32, day: u32) -> NaiveDate {
    let (year, month) = month_after(date, months);
    NaiveDate::from_ymd_opt(year, month, day).expect("days up to 28 exist in every month")
}

/// The repayment schedule for a disbursed loan: one installment on the
/// 15th of each month, starting one month after `disbursed_on`.
///
/// Status is presentational only: every installment is `paid` once the
/// loan is closed; otherwise a due date before `today` is `overdue` and
/// anything else `upcoming`.
pub fn schedule(
    emi_quote: &EmiQuote,
    disbursed_on: NaiveDate,
    loan_closed: bool,
    today: NaiveDate,
) -> Vec<Installment> {
    (1..=emi_quote.tenure)
        .map(|sequence| {
            let due_date = day_in_month_after(disbursed_on, sequence, DUE_DAY);
            let status = if loan_closed {
                InstallmentStatus::Paid
            } else if due_date < today {
                InstallmentStatus::Overdue
            } else {
                InstallmentStatus::Upcoming
            };
            Installment {
                sequence,
                due_date,
                amount: emi_quote.emi,
                status,
            }
        })
        .collect()
}
