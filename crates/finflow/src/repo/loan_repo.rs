//! Owns the `loanApplications` list, its `loanApplication` mirror, the
//! `documentCompletion` map and the `loanProgress` bookmark.

use std::collections::HashMap;

use chrono::Utc;

use crate::error::StoreError;
use crate::records::{DocumentCompletion, FlowProgress, LoanApplication, LoanStatus};
use crate::store::{keys, KeyValueStore};

use super::{read_record, write_record};

const LOAN_STEPS: &[&str] = &[
    "application",
    "approval",
    "terms",
    "mandate",
    "signature",
    "disbursement",
];

pub fn applications(store: &dyn KeyValueStore) -> Vec<LoanApplication> {
    read_record(store, keys::LOAN_APPLICATIONS).unwrap_or_default()
}

pub fn find(store: &dyn KeyValueStore, id: &str) -> Option<LoanApplication> {
    applications(store).into_iter().find(|a| a.id == id)
}

/// The latest-created application: the one gating treats as "the existing
/// application". All applications stay listed and actionable regardless.
pub fn latest(store: &dyn KeyValueStore) -> Option<LoanApplication> {
    applications(store)
        .into_iter()
        .max_by_key(|a| a.created_at)
}

/// Writes the list and maintains the singular `loanApplication` mirror:
/// always the latest-created element, removed when the list empties.
fn save_applications(
    store: &dyn KeyValueStore,
    applications: &[LoanApplication],
) -> Result<(), StoreError> {
    write_record(store, keys::LOAN_APPLICATIONS, &applications)?;
    match applications.iter().max_by_key(|a| a.created_at) {
        Some(latest) => write_record(store, keys::LOAN_APPLICATION, latest)?,
        None => {
            store.remove(keys::LOAN_APPLICATION);
        }
    }
    Ok(())
}

/// Read-merge-write of one application into the list, plus the derived
/// progress bookmark for it.
pub fn upsert(store: &dyn KeyValueStore, application: &LoanApplication) -> Result<(), StoreError> {
    let mut all = applications(store);
    match all.iter_mut().find(|a| a.id == application.id) {
        Some(existing) => *existing = application.clone(),
        None => all.push(application.clone()),
    }
    save_applications(store, &all)?;
    write_progress(store, application.status)
}

/// Removes an application and its document-completion record. Returns
/// whether anything was removed.
pub fn delete(store: &dyn KeyValueStore, id: &str) -> Result<bool, StoreError> {
    let mut all = applications(store);
    let before = all.len();
    all.retain(|a| a.id != id);
    if all.len() == before {
        return Ok(false);
    }
    save_applications(store, &all)?;

    let mut completions = completions(store);
    if completions.remove(id).is_some() {
        write_record(store, keys::DOCUMENT_COMPLETION, &completions)?;
    }
    Ok(true)
}

pub fn completions(store: &dyn KeyValueStore) -> HashMap<String, DocumentCompletion> {
    read_record(store, keys::DOCUMENT_COMPLETION).unwrap_or_default()
}

pub fn completion_for(store: &dyn KeyValueStore, id: &str) -> Option<DocumentCompletion> {
    completions(store).remove(id)
}

pub fn save_completion(
    store: &dyn KeyValueStore,
    completion: &DocumentCompletion,
) -> Result<(), StoreError> {
    let mut all = completions(store);
    all.insert(completion.application_id.clone(), completion.clone());
    write_record(store, keys::DOCUMENT_COMPLETION, &all)
}

/// `loanProgress` is derived from status on every write; readers of the
/// bookmark always see the position the status implies.
fn write_progress(store: &dyn KeyValueStore, status: LoanStatus) -> Result<(), StoreError> {
    let current = match status {
        LoanStatus::KycDone | LoanStatus::Pending | LoanStatus::Rejected => 1,
        LoanStatus::Approved => 2,
        LoanStatus::DocumentCheck => 3,
        LoanStatus::MandateCompleted => 4,
        LoanStatus::Completed => 5,
        LoanStatus::Disbursed | LoanStatus::Closed => LOAN_STEPS.len(),
    };
    let progress = FlowProgress::at(LOAN_STEPS, current, Utc::now());
    write_record(store, keys::LOAN_PROGRESS, &progress)
}
