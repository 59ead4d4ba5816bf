use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use super::loan::EnachMandate;

/// EWA application lifecycle: created in `mandate_setup` once consent is
/// given, `active` after mandate and agreement signing both complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EwaStatus {
    MandateSetup,
    Active,
}

/// Persisted under `ewaApplication`. The completed mandate lives on the
/// record itself so the mandate-done/agreement-pending sub-state survives
/// reloads without a separate bookmark.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EwaApplication {
    pub id: String,
    pub status: EwaStatus,
    pub max_drawdown: u64,
    pub salary: u64,
    pub created_at: DateTime<Utc>,
    pub consent_given: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enach_mandate: Option<EnachMandate>,
}

impl EwaApplication {
    pub fn new(max_drawdown: u64, salary: u64, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            status: EwaStatus::MandateSetup,
            max_drawdown,
            salary,
            created_at: now,
            consent_given: true,
            enach_mandate: None,
        }
    }

    pub fn mandate_completed(&self) -> bool {
        self.enach_mandate.as_ref().is_some_and(|m| m.completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawdownStatus {
    Requested,
    Processing,
    Completed,
    Disbursed,
    Rejected,
}

impl DrawdownStatus {
    /// Terminal: a request in one of these states no longer blocks a new one.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed | Self::Disbursed)
    }
}

/// One withdrawal request, persisted in the `ewaDrawdownRequests` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawdownRequest {
    pub id: String,
    pub amount: u64,
    pub status: DrawdownStatus,
    pub requested_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl DrawdownRequest {
    pub fn new(amount: u64, reason: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            amount,
            status: DrawdownStatus::Requested,
            requested_at: now,
            completed_at: None,
            reason,
        }
    }

    fn in_month_of(&self, now: DateTime<Utc>) -> bool {
        self.requested_at.year() == now.year() && self.requested_at.month() == now.month()
    }
}

/// Monthly quota: `max_withdrawal` minus the amounts of all non-rejected
/// requests made in the calendar month of `now`. Pure function of its
/// inputs; the reset at a month boundary falls out of the date comparison.
pub fn available_balance(
    max_withdrawal: u64,
    requests: &[DrawdownRequest],
    now: DateTime<Utc>,
) -> u64 {
    let spent: u64 = requests
        .iter()
        .filter(|r| r.status != DrawdownStatus::Rejected && r.in_month_of(now))
        .map(|r| r.amount)
        .sum();
    max_withdrawal.saturating_sub(spent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn request_at(amount: u64, status: DrawdownStatus, when: DateTime<Utc>) -> DrawdownRequest {
        let mut r = DrawdownRequest::new(amount, None, when);
        r.status = status;
        r
    }

    #[test]
    fn test_full_balance_with_no_requests() {
        assert_eq!(available_balance(16000, &[], at(2024, 3, 10)), 16000);
    }

    #[test]
    fn test_non_rejected_requests_reduce_balance() {
        let requests = vec![
            request_at(10000, DrawdownStatus::Disbursed, at(2024, 3, 2)),
            request_at(2000, DrawdownStatus::Requested, at(2024, 3, 5)),
        ];
        assert_eq!(available_balance(16000, &requests, at(2024, 3, 10)), 4000);
    }

    #[test]
    fn test_rejected_requests_do_not_count() {
        let requests = vec![request_at(10000, DrawdownStatus::Rejected, at(2024, 3, 2))];
        assert_eq!(available_balance(16000, &requests, at(2024, 3, 10)), 16000);
    }

    #[test]
    fn test_balance_resets_on_new_calendar_month() {
        let requests = vec![request_at(10000, DrawdownStatus::Disbursed, at(2024, 3, 28))];
        assert_eq!(available_balance(16000, &requests, at(2024, 3, 30)), 6000);
        assert_eq!(available_balance(16000, &requests, at(2024, 4, 1)), 16000);
    }

    #[test]
    fn test_same_month_different_year_does_not_count() {
        let requests = vec![request_at(10000, DrawdownStatus::Disbursed, at(2023, 3, 10))];
        assert_eq!(available_balance(16000, &requests, at(2024, 3, 10)), 16000);
    }

    #[test]
    fn test_overspend_saturates_to_zero() {
        let requests = vec![
            request_at(10000, DrawdownStatus::Disbursed, at(2024, 3, 2)),
            request_at(10000, DrawdownStatus::Disbursed, at(2024, 3, 3)),
        ];
        assert_eq!(available_balance(16000, &requests, at(2024, 3, 10)), 0);
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(DrawdownStatus::Rejected.is_terminal());
        assert!(DrawdownStatus::Completed.is_terminal());
        assert!(DrawdownStatus::Disbursed.is_terminal());
        assert!(!DrawdownStatus::Requested.is_terminal());
        assert!(!DrawdownStatus::Processing.is_terminal());
    }

    #[test]
    fn test_wire_format() {
        let app = EwaApplication::new(16000, 50000, Utc::now());
        let value = serde_json::to_value(&app).unwrap();
        assert_eq!(value["status"], "mandate_setup");
        assert!(value.get("maxDrawdown").is_some());
        assert!(value.get("consentGiven").is_some());
    }
}
