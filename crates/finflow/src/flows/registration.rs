//! Registration and login.
//!
//! Mobile number → simulated employee lookup → OTP → persisted
//! `UserRecord`. Input validation happens synchronously before any
//! simulated call, so no partial writes can occur.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::config::ProductConfig;
use crate::error::{FlowError, Result, ValidationError};
use crate::records::{AuthMethod, UserRecord};
use crate::repo::user_repo;
use crate::services::{EmployeeProfile, Simulator};
use crate::store::KeyValueStore;

#[derive(Clone)]
pub struct RegistrationFlow {
    store: Arc<dyn KeyValueStore>,
    sim: Simulator,
}

impl RegistrationFlow {
    pub fn new(store: Arc<dyn KeyValueStore>, config: &ProductConfig) -> Self {
        Self {
            store,
            sim: Simulator::from_config(config),
        }
    }

    pub fn user(&self) -> Option<UserRecord> {
        user_repo::get(self.store.as_ref())
    }

    pub fn validate_mobile(mobile: &str) -> std::result::Result<(), ValidationError> {
        if mobile.len() == 10 && mobile.chars().all(|c| c.is_ascii_digit()) {
            Ok(())
        } else {
            Err(ValidationError::InvalidMobile {
                value: mobile.to_string(),
            })
        }
    }

    pub fn validate_otp(code: &str) -> std::result::Result<(), ValidationError> {
        if code.len() == 6 && code.chars().all(|c| c.is_ascii_digit()) {
            Ok(())
        } else {
            Err(ValidationError::InvalidOtp)
        }
    }

    /// Looks up the employee directory entry for a mobile number.
    pub async fn lookup_profile(&self, mobile: &str) -> Result<EmployeeProfile> {
        Self::validate_mobile(mobile)?;
        Ok(self.sim.fetch_employee_profile(mobile).await)
    }

    /// Verifies the entered OTP. Any well-formed 6-digit code passes.
    pub async fn verify_otp(&self, code: &str) -> Result<()> {
        Self::validate_otp(code)?;
        self.sim.verify_otp(code).await;
        Ok(())
    }

    /// Creates the `UserRecord` on first registration. A repeat visit with
    /// an existing record is treated as a login: the record is mutated in
    /// place, never recreated.
    pub fn register(&self, profile: &EmployeeProfile, method: AuthMethod) -> Result<UserRecord> {
        if profile.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }
        Self::validate_mobile(&profile.mobile)?;

        let now = Utc::now();
        let user = match self.user() {
            Some(mut existing) => {
                existing.record_login(method, now);
                existing
            }
            None => {
                info!(mobile = %profile.mobile, "registering new user");
                UserRecord::register(
                    profile.name.clone(),
                    profile.mobile.clone(),
                    Some(profile.employee_id.clone()),
                    method,
                    now,
                )
            }
        };
        user_repo::save(self.store.as_ref(), &user)?;
        Ok(user)
    }

    /// Records a login on the existing record.
    pub fn login(&self, method: AuthMethod) -> Result<UserRecord> {
        let mut user = self.user().ok_or(FlowError::NotRegistered)?;
        user.record_login(method, Utc::now());
        user_repo::save(self.store.as_ref(), &user)?;
        Ok(user)
    }
}
