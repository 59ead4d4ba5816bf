use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A per-flow "bookmark" persisted under `loanProgress` / `ewaProgress` /
/// `kycCurrentStep` for compatibility with readers of those keys.
///
/// The bookmark is always derived from the owning record's status and
/// written through; it is never read back for resumption, so it cannot
/// fall out of sync with the status it mirrors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowProgress {
    pub current_step: String,
    pub completed_steps: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl FlowProgress {
    /// Builds a bookmark positioned at `steps[current]`, with everything
    /// before it marked completed. A `current` past the end means the whole
    /// flow is done.
    pub fn at(steps: &[&str], current: usize, now: DateTime<Utc>) -> Self {
        let completed = current.min(steps.len());
        Self {
            current_step: steps
                .get(current)
                .copied()
                .unwrap_or("done")
                .to_string(),
            completed_steps: steps[..completed].iter().map(|s| s.to_string()).collect(),
            last_updated: now,
        }
    }
}
