use thiserror::Error;

/// Phases a player's quiz round goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// No question is on screen; the next `/game` visit serves one.
    AwaitingQuestion,
    /// A question is displayed and waits for a guess or a skip.
    QuestionServed,
    /// The round reached its end condition; only the score is left to show.
    Finished,
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizEvent {
    /// A new question was drawn and shown to the player.
    Serve,
    /// The player's guess was recorded.
    AnswerChecked {
        /// True when this answer completed the round.
        round_complete: bool,
    },
    /// The displayed question was pushed to the retry queue.
    Skip,
    /// Start over after a finished round.
    Replay,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: QuizPhase,
    /// The event that cannot be applied from this phase.
    pub event: QuizEvent,
}

/// Per-player state machine driving the serve / check / skip loop.
#[derive(Debug, Clone)]
pub struct QuizStateMachine {
    phase: QuizPhase,
}

impl Default for QuizStateMachine {
    fn default() -> Self {
        Self {
            phase: QuizPhase::AwaitingQuestion,
        }
    }
}

impl QuizStateMachine {
    /// Create a new state machine waiting for its first question.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    /// Validate and apply `event`, returning the new phase.
    pub fn apply(&mut self, event: QuizEvent) -> Result<QuizPhase, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.phase = next;
        Ok(next)
    }

    fn compute_transition(&self, event: QuizEvent) -> Result<QuizPhase, InvalidTransition> {
        let next = match (self.phase, event) {
            (QuizPhase::AwaitingQuestion, QuizEvent::Serve) => QuizPhase::QuestionServed,
            (QuizPhase::QuestionServed, QuizEvent::AnswerChecked { round_complete: false }) => {
                QuizPhase::AwaitingQuestion
            }
            (QuizPhase::QuestionServed, QuizEvent::AnswerChecked { round_complete: true }) => {
                QuizPhase::Finished
            }
            (QuizPhase::QuestionServed, QuizEvent::Skip) => QuizPhase::AwaitingQuestion,
            (QuizPhase::Finished, QuizEvent::Replay) => QuizPhase::AwaitingQuestion,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_awaits_a_question() {
        let sm = QuizStateMachine::new();
        assert_eq!(sm.phase(), QuizPhase::AwaitingQuestion);
    }

    #[test]
    fn full_round_through_finish_and_replay() {
        let mut sm = QuizStateMachine::new();

        assert_eq!(sm.apply(QuizEvent::Serve), Ok(QuizPhase::QuestionServed));
        assert_eq!(sm.apply(QuizEvent::Skip), Ok(QuizPhase::AwaitingQuestion));
        assert_eq!(sm.apply(QuizEvent::Serve), Ok(QuizPhase::QuestionServed));
        assert_eq!(
            sm.apply(QuizEvent::AnswerChecked {
                round_complete: false
            }),
            Ok(QuizPhase::AwaitingQuestion)
        );
        assert_eq!(sm.apply(QuizEvent::Serve), Ok(QuizPhase::QuestionServed));
        assert_eq!(
            sm.apply(QuizEvent::AnswerChecked {
                round_complete: true
            }),
            Ok(QuizPhase::Finished)
        );
        assert_eq!(sm.apply(QuizEvent::Replay), Ok(QuizPhase::AwaitingQuestion));
    }

    #[test]
    fn check_without_question_is_rejected() {
        let mut sm = QuizStateMachine::new();
        let err = sm
            .apply(QuizEvent::AnswerChecked {
                round_complete: false,
            })
            .unwrap_err();
        assert_eq!(err.from, QuizPhase::AwaitingQuestion);
        assert_eq!(sm.phase(), QuizPhase::AwaitingQuestion);
    }

    #[test]
    fn finished_round_only_accepts_replay() {
        let mut sm = QuizStateMachine::new();
        sm.apply(QuizEvent::Serve).unwrap();
        sm.apply(QuizEvent::AnswerChecked {
            round_complete: true,
        })
        .unwrap();

        assert!(sm.apply(QuizEvent::Serve).is_err());
        assert!(sm.apply(QuizEvent::Skip).is_err());
        assert_eq!(sm.phase(), QuizPhase::Finished);
    }
}
