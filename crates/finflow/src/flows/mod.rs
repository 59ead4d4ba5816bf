//! Flow controllers: one finite state machine per business flow, reading
//! and writing the session records through the repositories and deciding
//! the next screen.

pub mod ewa;
pub mod kyc;
pub mod loan;
pub mod registration;

pub use ewa::{DrawdownSummary, EwaFlow, EwaSetupStep};
pub use kyc::KycFlow;
pub use loan::{LoanFlow, LoanRequest};
pub use registration::RegistrationFlow;

use crate::error::FlowError;
use crate::records::KycStep;
use crate::repo::{kyc_repo, user_repo};
use crate::store::KeyValueStore;

/// Navigable screens. Each is a deep-linkable entry point; missing
/// prerequisite state redirects to the correct upstream route instead of
/// rendering an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    LanguageSelect,
    Registration,
    Services,
    KycAvailability,
    KycCapture(KycStep),
    LoanDashboard,
    EwaConsent,
    EwaSetup,
    EwaDashboard,
}

/// Root router: where the app lands on a fresh page load.
pub fn entry_point(store: &dyn KeyValueStore) -> Route {
    if user_repo::selected_language(store).is_none() {
        return Route::LanguageSelect;
    }
    match user_repo::get(store) {
        Some(user) if user.is_registered => Route::Services,
        _ => Route::Registration,
    }
}

/// The services screen requires a registered user and confirmed document
/// availability.
pub fn services_gate(store: &dyn KeyValueStore) -> Result<(), FlowError> {
    match user_repo::get(store) {
        Some(user) if user.is_registered => {}
        _ => return Err(FlowError::NotRegistered),
    }
    match kyc_repo::availability(store) {
        Some(availability) if availability.can_proceed => Ok(()),
        _ => Err(FlowError::AvailabilityNotConfirmed),
    }
}

/// Maps a gating error to the upstream route the user is redirected to.
/// `None` means the error is handled inline on the current screen.
pub fn redirect_for(error: &FlowError) -> Option<Route> {
    match error {
        FlowError::NotRegistered => Some(Route::Registration),
        FlowError::AvailabilityNotConfirmed => Some(Route::KycAvailability),
        FlowError::KycIncomplete { next } => Some(Route::KycCapture(*next)),
        FlowError::ActiveApplicationExists { .. } => Some(Route::LoanDashboard),
        FlowError::NoEwaApplication => Some(Route::EwaConsent),
        FlowError::EwaNotActive { .. } => Some(Route::EwaSetup),
        FlowError::InvalidLoanTransition { .. }
        | FlowError::ApplicationNotFound { .. }
        | FlowError::DrawdownNotFound { .. }
        | FlowError::OutstandingDrawdown { .. } => None,
    }
}
