//! Session state machine for one play-through.
//!
//! The front end (terminal client or browser) owns one [`GameSession`] and
//! drives every transition through it; the HTTP API stays stateless. Turn
//! budget and histories are append-only until a full [`GameSession::reset`].

use std::collections::HashMap;

use whodunit_types::character::{Cast, Character};
use whodunit_types::chat::{ConversationHistory, Message};
use whodunit_types::session::{Phase, SessionError, Verdict};

/// Total user messages allowed per session, shared across all suspects.
pub const TURN_LIMIT: u32 = 20;

/// Whether a history of the given length belongs to the last allowed
/// exchange.
///
/// The history a chat request carries reflects state *before* the current
/// exchange is appended, so the signal fires on the second-to-last allowed
/// exchange: 19 completed exchanges (38 messages) already recorded.
pub fn final_turn_reached(history_len: usize) -> bool {
    history_len >= 2 * (TURN_LIMIT as usize - 1)
}

/// State machine over one play-through.
///
/// Phases move strictly forward:
/// `Introduction -> Interrogation -> FinalDeductionPending ->
/// FinalDeductionSubmitted -> Resolved`.
pub struct GameSession {
    cast: Cast,
    phase: Phase,
    turns_left: u32,
    active_id: String,
    histories: HashMap<String, ConversationHistory>,
    accused_id: Option<String>,
    verdict: Option<Verdict>,
}

impl GameSession {
    /// Start a fresh session in the Introduction phase.
    pub fn new(cast: Cast) -> Self {
        let active_id = cast.characters()[0].id.clone();
        let histories = cast
            .characters()
            .iter()
            .map(|c| (c.id.clone(), Vec::new()))
            .collect();

        Self {
            cast,
            phase: Phase::Introduction,
            turns_left: TURN_LIMIT,
            active_id,
            histories,
            accused_id: None,
            verdict: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn turns_left(&self) -> u32 {
        self.turns_left
    }

    pub fn cast(&self) -> &Cast {
        &self.cast
    }

    /// The suspect currently being questioned.
    pub fn active_character(&self) -> &Character {
        self.cast
            .get(&self.active_id)
            .expect("active character is always a cast member")
    }

    /// Conversation with one suspect.
    pub fn history(&self, character_id: &str) -> Option<&[Message]> {
        self.histories.get(character_id).map(Vec::as_slice)
    }

    /// Conversation with the active suspect.
    pub fn active_history(&self) -> &[Message] {
        &self.histories[&self.active_id]
    }

    /// All conversations, keyed by character id.
    pub fn histories(&self) -> &HashMap<String, ConversationHistory> {
        &self.histories
    }

    pub fn accused(&self) -> Option<&str> {
        self.accused_id.as_deref()
    }

    pub fn verdict(&self) -> Option<&Verdict> {
        self.verdict.as_ref()
    }

    /// Confirm the case briefing. Irreversible for the session.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Introduction => {
                self.phase = Phase::Interrogation;
                Ok(())
            }
            _ => Err(SessionError::AlreadyStarted),
        }
    }

    /// Switch the suspect being questioned. Free: costs no turn and never
    /// clears any history.
    pub fn select_character(&mut self, character_id: &str) -> Result<(), SessionError> {
        match self.cast.get(character_id) {
            Some(character) => {
                self.active_id = character.id.clone();
                Ok(())
            }
            None => Err(SessionError::UnknownCharacter(character_id.to_string())),
        }
    }

    /// Accept one user message, spending one turn from the shared budget.
    ///
    /// The turn is consumed even if the subsequent request fails; history is
    /// only touched by [`Self::record_exchange`] once a reply arrived.
    pub fn take_turn(&mut self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Introduction => Err(SessionError::NotStarted),
            Phase::Interrogation => {
                if self.turns_left == 0 {
                    return Err(SessionError::TurnsExhausted);
                }
                self.turns_left -= 1;
                Ok(())
            }
            _ => Err(SessionError::TurnsExhausted),
        }
    }

    /// Append a completed exchange to the active suspect's history.
    ///
    /// Appending both messages together keeps every history at even length.
    /// When the budget hit zero, the session moves to FinalDeductionPending.
    pub fn record_exchange(&mut self, message: impl Into<String>, reply: impl Into<String>) {
        let history = self
            .histories
            .get_mut(&self.active_id)
            .expect("active character is always a cast member");
        history.push(Message::user(message));
        history.push(Message::assistant(reply));

        if self.turns_left == 0 && self.phase == Phase::Interrogation {
            self.phase = Phase::FinalDeductionPending;
        }
    }

    /// Note a failed exchange: the turn stays spent and the history stays
    /// untouched, but budget exhaustion still opens the final deduction.
    pub fn abandon_exchange(&mut self) {
        if self.turns_left == 0 && self.phase == Phase::Interrogation {
            self.phase = Phase::FinalDeductionPending;
        }
    }

    /// Name the culprit. Moves FinalDeductionPending -> FinalDeductionSubmitted.
    pub fn submit_deduction(&mut self, accused_id: &str) -> Result<(), SessionError> {
        match self.phase {
            Phase::FinalDeductionPending => {
                if self.cast.get(accused_id).is_none() {
                    return Err(SessionError::UnknownCharacter(accused_id.to_string()));
                }
                self.accused_id = Some(accused_id.to_string());
                self.phase = Phase::FinalDeductionSubmitted;
                Ok(())
            }
            Phase::FinalDeductionSubmitted => Err(SessionError::DeductionAlreadySubmitted),
            Phase::Resolved => Err(SessionError::AlreadyResolved),
            _ => Err(SessionError::DeductionNotOpen),
        }
    }

    /// Record the verdict. Terminal: only [`Self::reset`] leaves Resolved.
    pub fn resolve(&mut self, verdict: Verdict) -> Result<(), SessionError> {
        match self.phase {
            Phase::FinalDeductionSubmitted => {
                self.verdict = Some(verdict);
                self.phase = Phase::Resolved;
                Ok(())
            }
            Phase::Resolved => Err(SessionError::AlreadyResolved),
            _ => Err(SessionError::DeductionNotOpen),
        }
    }

    /// Discard everything and return to the Introduction phase.
    pub fn reset(&mut self) {
        *self = Self::new(self.cast.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_session() -> GameSession {
        let mut session = GameSession::new(Cast::standard());
        session.begin().unwrap();
        session
    }

    /// Run one successful exchange against the active suspect.
    fn exchange(session: &mut GameSession, n: usize) {
        session.take_turn().unwrap();
        session.record_exchange(format!("question {n}"), format!("answer {n}"));
    }

    #[test]
    fn test_new_session_starts_in_introduction() {
        let session = GameSession::new(Cast::standard());
        assert_eq!(session.phase(), Phase::Introduction);
        assert_eq!(session.turns_left(), TURN_LIMIT);
        assert_eq!(session.active_character().id, "emilia");
    }

    #[test]
    fn test_messages_rejected_before_begin() {
        let mut session = GameSession::new(Cast::standard());
        assert_eq!(session.take_turn(), Err(SessionError::NotStarted));
    }

    #[test]
    fn test_begin_is_irreversible() {
        let mut session = started_session();
        assert_eq!(session.begin(), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn test_budget_is_shared_across_characters() {
        let mut session = started_session();
        exchange(&mut session, 1);
        session.select_character("oliver").unwrap();
        exchange(&mut session, 2);
        assert_eq!(session.turns_left(), TURN_LIMIT - 2);
        assert_eq!(session.history("emilia").unwrap().len(), 2);
        assert_eq!(session.history("oliver").unwrap().len(), 2);
    }

    #[test]
    fn test_switching_characters_is_free_and_keeps_history() {
        let mut session = started_session();
        exchange(&mut session, 1);
        session.select_character("lucy").unwrap();
        session.select_character("emilia").unwrap();
        assert_eq!(session.turns_left(), TURN_LIMIT - 1);
        assert_eq!(session.history("emilia").unwrap().len(), 2);
    }

    #[test]
    fn test_unknown_character_selection_fails() {
        let mut session = started_session();
        assert_eq!(
            session.select_character("richard"),
            Err(SessionError::UnknownCharacter("richard".to_string()))
        );
    }

    #[test]
    fn test_exhausting_budget_opens_final_deduction() {
        let mut session = started_session();
        for n in 0..TURN_LIMIT as usize {
            assert_eq!(session.phase(), Phase::Interrogation);
            exchange(&mut session, n);
        }
        assert_eq!(session.turns_left(), 0);
        assert_eq!(session.phase(), Phase::FinalDeductionPending);
        assert_eq!(session.take_turn(), Err(SessionError::TurnsExhausted));
    }

    #[test]
    fn test_failed_request_still_spends_the_turn() {
        let mut session = started_session();
        session.take_turn().unwrap();
        // No record_exchange: the HTTP call failed. The turn stays spent
        // and the history stays even (empty).
        assert_eq!(session.turns_left(), TURN_LIMIT - 1);
        assert_eq!(session.active_history().len(), 0);
    }

    #[test]
    fn test_failed_last_exchange_still_opens_final_deduction() {
        let mut session = started_session();
        for n in 0..(TURN_LIMIT - 1) as usize {
            exchange(&mut session, n);
        }
        session.take_turn().unwrap();
        session.abandon_exchange();
        assert_eq!(session.phase(), Phase::FinalDeductionPending);
    }

    #[test]
    fn test_histories_stay_even_after_each_exchange() {
        let mut session = started_session();
        for n in 0..3 {
            exchange(&mut session, n);
            assert_eq!(session.active_history().len() % 2, 0);
        }
    }

    #[test]
    fn test_deduction_rejected_during_interrogation() {
        let mut session = started_session();
        assert_eq!(
            session.submit_deduction("emilia"),
            Err(SessionError::DeductionNotOpen)
        );
    }

    #[test]
    fn test_full_session_lifecycle() {
        let mut session = started_session();
        for n in 0..TURN_LIMIT as usize {
            exchange(&mut session, n);
        }
        session.submit_deduction("emilia").unwrap();
        assert_eq!(session.phase(), Phase::FinalDeductionSubmitted);
        assert_eq!(
            session.submit_deduction("oliver"),
            Err(SessionError::DeductionAlreadySubmitted)
        );

        session
            .resolve(Verdict {
                is_correct: true,
                narrative: "Case closed.".to_string(),
            })
            .unwrap();
        assert_eq!(session.phase(), Phase::Resolved);
        assert!(session.verdict().unwrap().is_correct);
        assert_eq!(session.accused(), Some("emilia"));
    }

    #[test]
    fn test_reset_discards_everything() {
        let mut session = started_session();
        exchange(&mut session, 1);
        session.reset();
        assert_eq!(session.phase(), Phase::Introduction);
        assert_eq!(session.turns_left(), TURN_LIMIT);
        assert!(session.history("emilia").unwrap().is_empty());
    }

    #[test]
    fn test_final_turn_signal_fires_at_38() {
        assert!(!final_turn_reached(0));
        assert!(!final_turn_reached(36));
        assert!(!final_turn_reached(37));
        assert!(final_turn_reached(38));
        assert!(final_turn_reached(40));
    }
}
