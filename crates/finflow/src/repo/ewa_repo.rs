//! Owns `ewaApplication`, the `ewaDrawdownRequests` list and the
//! write-mostly `ewaProgress` bookmark.

use chrono::Utc;

use crate::error::StoreError;
use crate::records::{DrawdownRequest, EwaApplication, EwaStatus, FlowProgress};
use crate::store::{keys, KeyValueStore};

use super::{read_record, write_record};

const EWA_STEPS: &[&str] = &["consent", "mandate", "agreement"];

pub fn application(store: &dyn KeyValueStore) -> Option<EwaApplication> {
    read_record(store, keys::EWA_APPLICATION)
}

/// Persists the application and writes the derived progress bookmark.
pub fn save_application(
    store: &dyn KeyValueStore,
    application: &EwaApplication,
) -> Result<(), StoreError> {
    write_record(store, keys::EWA_APPLICATION, application)?;
    write_progress(store, application)
}

pub fn requests(store: &dyn KeyValueStore) -> Vec<DrawdownRequest> {
    read_record(store, keys::EWA_DRAWDOWN_REQUESTS).unwrap_or_default()
}

pub fn find_request(store: &dyn KeyValueStore, id: &str) -> Option<DrawdownRequest> {
    requests(store).into_iter().find(|r| r.id == id)
}

pub fn upsert_request(
    store: &dyn KeyValueStore,
    request: &DrawdownRequest,
) -> Result<(), StoreError> {
    let mut all = requests(store);
    match all.iter_mut().find(|r| r.id == request.id) {
        Some(existing) => *existing = request.clone(),
        None => all.push(request.clone()),
    }
    write_record(store, keys::EWA_DRAWDOWN_REQUESTS, &all)
}

/// Removes a request from the list. Returns whether it existed.
pub fn delete_request(store: &dyn KeyValueStore, id: &str) -> Result<bool, StoreError> {
    let mut all = requests(store);
    let before = all.len();
    all.retain(|r| r.id != id);
    if all.len() == before {
        return Ok(false);
    }
    write_record(store, keys::EWA_DRAWDOWN_REQUESTS, &all)?;
    Ok(true)
}

fn write_progress(
    store: &dyn KeyValueStore,
    application: &EwaApplication,
) -> Result<(), StoreError> {
    let current = match application.status {
        EwaStatus::Active => EWA_STEPS.len(),
        EwaStatus::MandateSetup if application.mandate_completed() => 2,
        EwaStatus::MandateSetup => 1,
    };
    let progress = FlowProgress::at(EWA_STEPS, current, Utc::now());
    write_record(store, keys::EWA_PROGRESS, &progress)
}
