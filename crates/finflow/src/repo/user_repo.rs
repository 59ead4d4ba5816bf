//! Owns `userData` and the `selectedLanguage` preference.

use crate::error::StoreError;
use crate::records::UserRecord;
use crate::store::{keys, KeyValueStore};

use super::{read_record, write_record};

pub fn get(store: &dyn KeyValueStore) -> Option<UserRecord> {
    read_record(store, keys::USER_DATA)
}

pub fn save(store: &dyn KeyValueStore, user: &UserRecord) -> Result<(), StoreError> {
    write_record(store, keys::USER_DATA, user)
}

pub fn selected_language(store: &dyn KeyValueStore) -> Option<String> {
    read_record(store, keys::SELECTED_LANGUAGE)
}

pub fn set_selected_language(store: &dyn KeyValueStore, language: &str) -> Result<(), StoreError> {
    write_record(store, keys::SELECTED_LANGUAGE, &language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::AuthMethod;
    use crate::store::MemoryStore;
    use chrono::Utc;

    #[test]
    fn test_user_round_trip() {
        let store = MemoryStore::new();
        assert!(get(&store).is_none());

        let user = UserRecord::register(
            "aseem".to_string(),
            "8077319041".to_string(),
            Some("EMP123".to_string()),
            AuthMethod::MobileOtp,
            Utc::now(),
        );
        save(&store, &user).unwrap();

        let back = get(&store).unwrap();
        assert!(back.is_registered);
        assert_eq!(back.mobile, "8077319041");
    }

    #[test]
    fn test_language_preference() {
        let store = MemoryStore::new();
        assert!(selected_language(&store).is_none());
        set_selected_language(&store, "hi").unwrap();
        assert_eq!(selected_language(&store).as_deref(), Some("hi"));
    }
}
