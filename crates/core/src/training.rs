//! Tune training lifecycle: status vocabularies, synthetic ids and the
//! timer that completes synthetic tunes.
//!
//! Two tables track training and they use different words for the same
//! states. `user_tunes` stores [`LedgerStatus`] (`training`, `complete`,
//! `error`); `models` stores [`ModelStatus`] (`pending` .. `failed`).

use std::fmt;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Interval between status checks of in-flight tunes.
pub const POLL_INTERVAL: Duration = Duration::from_secs(15);

/// Seconds after which a synthetic tune reports `complete`.
pub const SIMULATED_TRAINING_SECS: i64 = 60;

/// Typical wall-clock duration of a real Astria training run.
pub const EXPECTED_TRAINING_SECS: i64 = 25 * 60;

/// Progress ceiling while a tune is still training.
pub const MAX_IN_FLIGHT_PROGRESS: u8 = 95;

static SIMULATED_TUNE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tune-\d+$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Ledger status (user_tunes)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LedgerStatus {
    Training,
    Complete,
    Error,
}

impl LedgerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LedgerStatus::Training => "training",
            LedgerStatus::Complete => "complete",
            LedgerStatus::Error => "error",
        }
    }

    /// Parse a stored or upstream status string.
    ///
    /// Accepts the `models` spellings (`completed`, `failed`, `pending`,
    /// `processing`) as well, since rows written by older clients mix them.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "training" | "pending" | "processing" | "queued" => Ok(LedgerStatus::Training),
            "complete" | "completed" | "trained" => Ok(LedgerStatus::Complete),
            "error" | "failed" => Ok(LedgerStatus::Error),
            other => Err(CoreError::Validation(format!(
                "Unknown training status '{other}'"
            ))),
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, LedgerStatus::Training)
    }
}

impl fmt::Display for LedgerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Model status (models)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelStatus {
    Pending,
    Training,
    Processing,
    Completed,
    Failed,
}

impl ModelStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelStatus::Pending => "pending",
            ModelStatus::Training => "training",
            ModelStatus::Processing => "processing",
            ModelStatus::Completed => "completed",
            ModelStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Result<Self, CoreError> {
        match value {
            "pending" => Ok(ModelStatus::Pending),
            "training" => Ok(ModelStatus::Training),
            "processing" => Ok(ModelStatus::Processing),
            "completed" | "complete" => Ok(ModelStatus::Completed),
            "failed" | "error" => Ok(ModelStatus::Failed),
            other => Err(CoreError::Validation(format!(
                "Unknown model status '{other}'"
            ))),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ModelStatus::Completed | ModelStatus::Failed)
    }

    /// The `user_tunes` word for this state. Every non-terminal state is `training`.
    pub fn ledger_status(self) -> LedgerStatus {
        match self {
            ModelStatus::Pending | ModelStatus::Training | ModelStatus::Processing => {
                LedgerStatus::Training
            }
            ModelStatus::Completed => LedgerStatus::Complete,
            ModelStatus::Failed => LedgerStatus::Error,
        }
    }
}

impl From<LedgerStatus> for ModelStatus {
    fn from(status: LedgerStatus) -> Self {
        match status {
            LedgerStatus::Training => ModelStatus::Training,
            LedgerStatus::Complete => ModelStatus::Completed,
            LedgerStatus::Error => ModelStatus::Failed,
        }
    }
}

impl fmt::Display for ModelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Synthetic ids
// ---------------------------------------------------------------------------

/// Why an image upload had to be simulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadFailure {
    /// Astria answered with a non-2xx status.
    Rejected,
    /// The request never got an answer (network, TLS, decode error).
    Unreachable,
}

/// Placeholder id for an image upload that did not reach Astria.
pub fn simulated_upload_id(failure: UploadFailure, now: Timestamp, index: usize) -> String {
    let millis = now.timestamp_millis();
    match failure {
        UploadFailure::Rejected => format!("mock-{millis}-{index}"),
        UploadFailure::Unreachable => format!("error-mock-{millis}-{index}"),
    }
}

/// Placeholder id for a tune whose creation failed.
pub fn simulated_tune_id(now: Timestamp) -> String {
    format!("tune-{}", now.timestamp_millis())
}

/// `true` for ids produced by [`simulated_tune_id`] or containing `mock`.
pub fn is_simulated_tune_id(tune_id: &str) -> bool {
    SIMULATED_TUNE_ID.is_match(tune_id) || tune_id.contains("mock")
}

/// Status of a synthetic tune at `now`.
///
/// A `training` tune becomes `complete` once at least
/// [`SIMULATED_TRAINING_SECS`] have passed since `created_at`. Any other
/// status is returned unchanged.
pub fn simulated_status(current: LedgerStatus, created_at: Timestamp, now: Timestamp) -> LedgerStatus {
    if current == LedgerStatus::Training
        && (now - created_at).num_seconds() >= SIMULATED_TRAINING_SECS
    {
        LedgerStatus::Complete
    } else {
        current
    }
}

/// Heuristic progress percentage shown while a tune trains.
///
/// Not derived from any upstream signal: elapsed time is scaled against the
/// expected training duration and capped at [`MAX_IN_FLIGHT_PROGRESS`] until
/// the tune completes.
pub fn estimate_progress(status: ModelStatus, elapsed_secs: i64, simulated: bool) -> u8 {
    let expected = if simulated {
        SIMULATED_TRAINING_SECS
    } else {
        EXPECTED_TRAINING_SECS
    };
    match status {
        ModelStatus::Completed => 100,
        ModelStatus::Pending | ModelStatus::Failed => 0,
        ModelStatus::Training | ModelStatus::Processing => {
            let elapsed = elapsed_secs.max(0);
            let pct = 5 + elapsed.saturating_mul(90) / expected;
            pct.min(i64::from(MAX_IN_FLIGHT_PROGRESS)) as u8
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    use super::*;

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn detects_simulated_ids() {
        assert!(is_simulated_tune_id("tune-1714564800000"));
        assert!(is_simulated_tune_id("mock-123-0"));
        assert!(is_simulated_tune_id("error-mock-123-4"));
        assert!(!is_simulated_tune_id("1504944"));
        assert!(!is_simulated_tune_id("tune-abc"));
        assert!(!is_simulated_tune_id("my-tune-12"));
    }

    #[test]
    fn simulated_ids_roundtrip_through_detection() {
        assert!(is_simulated_tune_id(&simulated_tune_id(t0())));
        let upload = simulated_upload_id(UploadFailure::Rejected, t0(), 2);
        assert_eq!(upload, format!("mock-{}-2", t0().timestamp_millis()));
        let upload = simulated_upload_id(UploadFailure::Unreachable, t0(), 0);
        assert!(upload.starts_with("error-mock-"));
    }

    #[test]
    fn simulated_completion_waits_sixty_seconds() {
        let created = t0();
        let at_59 = created + ChronoDuration::seconds(59);
        let at_60 = created + ChronoDuration::seconds(60);

        assert_eq!(
            simulated_status(LedgerStatus::Training, created, at_59),
            LedgerStatus::Training
        );
        assert_eq!(
            simulated_status(LedgerStatus::Training, created, at_60),
            LedgerStatus::Complete
        );
        assert_eq!(
            simulated_status(LedgerStatus::Training, created, created - ChronoDuration::seconds(5)),
            LedgerStatus::Training
        );
    }

    #[test]
    fn simulated_status_keeps_terminal_states() {
        let later = t0() + ChronoDuration::minutes(10);
        assert_eq!(
            simulated_status(LedgerStatus::Error, t0(), later),
            LedgerStatus::Error
        );
    }

    #[test]
    fn status_vocabularies_map() {
        assert_eq!(LedgerStatus::parse("completed").unwrap(), LedgerStatus::Complete);
        assert_eq!(LedgerStatus::parse("failed").unwrap(), LedgerStatus::Error);
        assert!(LedgerStatus::parse("bogus").is_err());
        assert_eq!(ModelStatus::from(LedgerStatus::Complete), ModelStatus::Completed);
        assert_eq!(ModelStatus::from(LedgerStatus::Error), ModelStatus::Failed);
        assert!(ModelStatus::Completed.is_terminal());
        assert!(!ModelStatus::Processing.is_terminal());
        assert_eq!(ModelStatus::Pending.ledger_status(), LedgerStatus::Training);
        assert_eq!(ModelStatus::Failed.ledger_status(), LedgerStatus::Error);
    }

    #[test]
    fn progress_is_capped_until_complete() {
        assert_eq!(estimate_progress(ModelStatus::Training, 0, false), 5);
        assert_eq!(estimate_progress(ModelStatus::Training, 30, true), 50);
        assert_eq!(estimate_progress(ModelStatus::Training, 10_000, false), 95);
        assert_eq!(estimate_progress(ModelStatus::Completed, 1, false), 100);
        assert_eq!(estimate_progress(ModelStatus::Pending, 500, false), 0);
    }
}
