//! Session state machine vocabulary.
//!
//! The phases a play-through moves between, the errors the state machine can
//! reject an action with, and the terminal verdict. The machine itself lives
//! in `whodunit-core`; these types are shared so callers can match on them.

use serde::{Deserialize, Serialize};

use std::fmt;

/// Phase of a single play-through.
///
/// Transitions are strictly forward; only a full reset goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Case briefing shown; waiting for the player's confirmation.
    Introduction,
    /// Free-form questioning while the turn budget lasts.
    Interrogation,
    /// Budget exhausted; only the final deduction remains.
    FinalDeductionPending,
    /// Deduction sent; awaiting the verdict.
    FinalDeductionSubmitted,
    /// Verdict received. Terminal.
    Resolved,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Introduction => write!(f, "introduction"),
            Phase::Interrogation => write!(f, "interrogation"),
            Phase::FinalDeductionPending => write!(f, "final_deduction_pending"),
            Phase::FinalDeductionSubmitted => write!(f, "final_deduction_submitted"),
            Phase::Resolved => write!(f, "resolved"),
        }
    }
}

/// The outcome of a submitted deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub is_correct: bool,
    pub narrative: String,
}

/// Errors from session state machine operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("the interrogation has not started")]
    NotStarted,

    #[error("the interrogation already started")]
    AlreadyStarted,

    #[error("no turns remaining; proceed to the final deduction")]
    TurnsExhausted,

    #[error("unknown character: '{0}'")]
    UnknownCharacter(String),

    #[error("the final deduction is not open yet")]
    DeductionNotOpen,

    #[error("the final deduction was already submitted")]
    DeductionAlreadySubmitted,

    #[error("the case is already resolved")]
    AlreadyResolved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_display() {
        assert_eq!(Phase::Introduction.to_string(), "introduction");
        assert_eq!(
            Phase::FinalDeductionPending.to_string(),
            "final_deduction_pending"
        );
    }

    #[test]
    fn test_phase_serde() {
        let json = serde_json::to_string(&Phase::FinalDeductionSubmitted).unwrap();
        assert_eq!(json, "\"final_deduction_submitted\"");
        let parsed: Phase = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Phase::FinalDeductionSubmitted);
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::UnknownCharacter("richard".to_string());
        assert!(err.to_string().contains("richard"));
    }
}
