use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a user authenticated, for both registration and later logins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    MobileOtp,
    Mpin,
}

/// The identity/registration record under `userData`.
///
/// Created exactly once at registration; `is_registered` gates every
/// downstream flow. Login mutates the `last_login_*` fields in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub name: String,
    pub mobile: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,
    pub is_registered: bool,
    pub registration_method: AuthMethod,
    pub registration_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_method: Option<AuthMethod>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_date: Option<DateTime<Utc>>,
}

impl UserRecord {
    pub fn register(
        name: String,
        mobile: String,
        employee_id: Option<String>,
        method: AuthMethod,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            name,
            mobile,
            employee_id,
            is_registered: true,
            registration_method: method,
            registration_date: now,
            last_login_method: None,
            last_login_date: None,
        }
    }

    /// Records a login on an existing record.
    pub fn record_login(&mut self, method: AuthMethod, now: DateTime<Utc>) {
        self.last_login_method = Some(method);
        self.last_login_date = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_sets_flag_and_timestamps() {
        let now = Utc::now();
        let user = UserRecord::register(
            "aseem".to_string(),
            "8077319041".to_string(),
            Some("EMP123".to_string()),
            AuthMethod::MobileOtp,
            now,
        );
        assert!(user.is_registered);
        assert_eq!(user.registration_date, now);
        assert!(user.last_login_date.is_none());
    }

    #[test]
    fn test_login_mutates_in_place() {
        let mut user = UserRecord::register(
            "aseem".to_string(),
            "8077319041".to_string(),
            None,
            AuthMethod::MobileOtp,
            Utc::now(),
        );
        let later = Utc::now();
        user.record_login(AuthMethod::Mpin, later);
        assert_eq!(user.last_login_method, Some(AuthMethod::Mpin));
        assert_eq!(user.last_login_date, Some(later));
        // Registration fields are untouched.
        assert_eq!(user.registration_method, AuthMethod::MobileOtp);
    }

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let user = UserRecord::register(
            "aseem".to_string(),
            "8077319041".to_string(),
            Some("EMP123".to_string()),
            AuthMethod::MobileOtp,
            Utc::now(),
        );
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("isRegistered").is_some());
        assert!(value.get("registrationMethod").is_some());
        assert_eq!(value["registrationMethod"], "mobile_otp");
        assert!(value.get("employeeId").is_some());
    }
}
