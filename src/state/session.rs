use std::time::{Duration, Instant};

use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::GameRules,
    dao::models::{PhotoId, PhotoRecord, UserId},
    services::selector::{self, InsufficientData, Question},
    state::{
        state_machine::{InvalidTransition, QuizEvent, QuizPhase, QuizStateMachine},
        tracker::{DivisionUndefined, Score, SessionTracker},
    },
};

/// Failures of the per-player quiz flow.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Not enough photos to build a question.
    #[error(transparent)]
    InsufficientData(#[from] InsufficientData),
    /// A guess or skip arrived while no question was displayed.
    #[error("no question is waiting for an answer")]
    NoPendingQuestion,
    /// The requested step is not allowed in the current phase.
    #[error(transparent)]
    InvalidTransition(#[from] InvalidTransition),
    /// The score was requested before any answer.
    #[error(transparent)]
    Score(#[from] DivisionUndefined),
}

/// Result of recording a guess.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CheckOutcome {
    /// More questions are due in this round.
    Continue {
        /// Whether the guess matched the target.
        correct: bool,
    },
    /// The guess completed the round.
    Finished {
        /// Whether the last guess matched the target.
        correct: bool,
        /// Final score of the round.
        score: Score,
    },
}

/// What `/score` should display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoreReport {
    /// Nothing answered yet; the percentage is undefined.
    NotStarted,
    /// Round still running.
    InProgress(Score),
    /// Round finished; the score is final until the next question.
    Final(Score),
}

/// Quiz state owned by a single authenticated player.
#[derive(Debug, Clone)]
pub struct GameSession {
    /// Identifier used to correlate log lines of the same session.
    pub id: Uuid,
    /// Player owning the session.
    pub player: UserId,
    /// 1-based index of the round being played.
    pub round: u32,
    tracker: SessionTracker,
    machine: QuizStateMachine,
    pending: Option<Question>,
    last_seen: Instant,
}

impl GameSession {
    /// Fresh session at round 1 with no question served.
    pub fn new(player: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            player,
            round: 1,
            tracker: SessionTracker::new(),
            machine: QuizStateMachine::new(),
            pending: None,
            last_seen: Instant::now(),
        }
    }

    /// Current phase of the round.
    pub fn phase(&self) -> QuizPhase {
        self.machine.phase()
    }

    /// Counters and retry queue of the current round.
    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    /// Question currently on screen, if any.
    pub fn pending(&self) -> Option<&Question> {
        self.pending.as_ref()
    }

    pub(crate) fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    /// Time elapsed since the player's last request.
    pub fn idle_for(&self) -> Duration {
        self.last_seen.elapsed()
    }

    /// Serve the next question.
    ///
    /// A question that is still pending is returned as is, so reloading the
    /// page neither rerolls the choices nor loses a retried question. A
    /// finished round is reset only once the next question has been drawn.
    pub fn serve<R: Rng + ?Sized>(
        &mut self,
        photos: &[PhotoRecord],
        rules: &GameRules,
        rng: &mut R,
    ) -> Result<Question, SessionError> {
        if let Some(question) = &self.pending {
            return Ok(question.clone());
        }

        // A finished round keeps its score until the next question is ready.
        let replay = self.machine.phase() == QuizPhase::Finished;
        let mut next_round = SessionTracker::new();
        let retry_queue = if replay {
            next_round.retry_queue_mut()
        } else {
            self.tracker.retry_queue_mut()
        };
        let question = selector::next_question(photos, retry_queue, rules.choice_count, rng)?;

        if replay {
            self.machine.apply(QuizEvent::Replay)?;
            self.tracker = next_round;
            self.round += 1;
        }
        self.machine.apply(QuizEvent::Serve)?;
        self.pending = Some(question.clone());
        Ok(question)
    }

    /// Record the player's guess against the pending question.
    ///
    /// Correctness is decided by photo identity, so two people sharing a
    /// label are never confused with each other.
    pub fn check(&mut self, guess: PhotoId, rules: &GameRules) -> Result<CheckOutcome, SessionError> {
        let Some(question) = self.pending.take() else {
            return Err(SessionError::NoPendingQuestion);
        };

        let correct = question.target.id == guess;
        self.tracker.record_answer(correct);

        let round_complete = self.tracker.round_complete(rules.round_length);
        self.machine
            .apply(QuizEvent::AnswerChecked { round_complete })?;

        if round_complete {
            let score = self.tracker.score()?;
            Ok(CheckOutcome::Finished { correct, score })
        } else {
            Ok(CheckOutcome::Continue { correct })
        }
    }

    /// Move the pending question to the back of the retry queue.
    pub fn skip(&mut self) -> Result<PhotoRecord, SessionError> {
        let Some(question) = self.pending.take() else {
            return Err(SessionError::NoPendingQuestion);
        };

        self.machine.apply(QuizEvent::Skip)?;
        self.tracker.skip(question.target.clone());
        Ok(question.target)
    }

    /// Score to display, distinguishing a finished round from one in progress.
    pub fn score_report(&self) -> ScoreReport {
        match self.tracker.score() {
            Err(DivisionUndefined) => ScoreReport::NotStarted,
            Ok(score) if self.machine.phase() == QuizPhase::Finished => ScoreReport::Final(score),
            Ok(score) => ScoreReport::InProgress(score),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    const PLAYER: UserId = UserId(5);

    fn album(labels: &[&str]) -> Vec<PhotoRecord> {
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| PhotoRecord {
                id: index as i64 + 10,
                url: format!("/p/{index}.png"),
                label: (*label).into(),
                owner_id: PLAYER,
            })
            .collect()
    }

    fn wrong_choice(question: &Question) -> PhotoId {
        question
            .choices
            .iter()
            .find(|photo| photo.id != question.target.id)
            .map(|photo| photo.id)
            .unwrap()
    }

    #[test]
    fn perfect_round_finishes_at_one_hundred() {
        let photos = album(&["A", "B", "C", "D"]);
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut session = GameSession::new(PLAYER);

        let mut outcome = None;
        for _ in 0..4 {
            let question = session.serve(&photos, &rules, &mut rng).unwrap();
            outcome = Some(session.check(question.target.id, &rules).unwrap());
        }

        match outcome {
            Some(CheckOutcome::Finished { correct, score }) => {
                assert!(correct);
                assert_eq!(score.formatted(), "100.00");
            }
            other => panic!("expected finished round, got {other:?}"),
        }
        assert_eq!(session.phase(), QuizPhase::Finished);
    }

    #[test]
    fn one_correct_out_of_four_scores_twenty_five() {
        let photos = album(&["A", "B", "C", "D"]);
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(2);
        let mut session = GameSession::new(PLAYER);

        let question = session.serve(&photos, &rules, &mut rng).unwrap();
        session.check(question.target.id, &rules).unwrap();
        for _ in 0..3 {
            let question = session.serve(&photos, &rules, &mut rng).unwrap();
            session.check(wrong_choice(&question), &rules).unwrap();
        }

        assert_eq!(
            session.score_report(),
            ScoreReport::Final(Score {
                correct: 1,
                total: 4,
                percentage: 25.0
            })
        );
    }

    #[test]
    fn refresh_returns_the_pending_question() {
        let photos = album(&["A", "B", "C", "D", "E"]);
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = GameSession::new(PLAYER);

        let first = session.serve(&photos, &rules, &mut rng).unwrap();
        let again = session.serve(&photos, &rules, &mut rng).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn skipped_questions_come_back_first_and_do_not_count() {
        let photos = album(&["A", "B", "C", "D", "E", "F"]);
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(4);
        let mut session = GameSession::new(PLAYER);

        let first = session.serve(&photos, &rules, &mut rng).unwrap();
        session.skip().unwrap();
        assert_eq!(session.tracker().retry_queue().len(), 1);
        assert_eq!(session.tracker().total_asked(), 0);
        assert_eq!(session.tracker().correct_count(), 0);

        let retried = session.serve(&photos, &rules, &mut rng).unwrap();
        assert_eq!(retried.target, first.target);
        assert!(retried.choices.contains(&first.target));
        assert!(session.tracker().retry_queue().is_empty());

        session.skip().unwrap();
        let retried_again = session.serve(&photos, &rules, &mut rng).unwrap();
        assert_eq!(retried_again.target, first.target);
    }

    #[test]
    fn skips_do_not_extend_the_round() {
        let photos = album(&["A", "B", "C", "D"]);
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut session = GameSession::new(PLAYER);

        session.serve(&photos, &rules, &mut rng).unwrap();
        session.skip().unwrap();

        for round_answer in 1..=4 {
            let question = session.serve(&photos, &rules, &mut rng).unwrap();
            let outcome = session.check(question.target.id, &rules).unwrap();
            if round_answer < 4 {
                assert!(matches!(outcome, CheckOutcome::Continue { correct: true }));
            } else {
                assert!(matches!(outcome, CheckOutcome::Finished { correct: true, .. }));
            }
        }
        assert_eq!(session.tracker().total_asked(), 4);
        assert!(session.tracker().retry_queue().is_empty());
    }

    #[test]
    fn check_and_skip_need_a_pending_question() {
        let rules = GameRules::default();
        let mut session = GameSession::new(PLAYER);

        assert!(matches!(
            session.check(10, &rules),
            Err(SessionError::NoPendingQuestion)
        ));
        assert!(matches!(session.skip(), Err(SessionError::NoPendingQuestion)));
        assert_eq!(session.score_report(), ScoreReport::NotStarted);
    }

    #[test]
    fn serving_after_finish_starts_a_new_round() {
        let photos = album(&["A", "B", "C", "D"]);
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(6);
        let mut session = GameSession::new(PLAYER);

        for _ in 0..4 {
            let question = session.serve(&photos, &rules, &mut rng).unwrap();
            session.check(question.target.id, &rules).unwrap();
        }
        assert_eq!(session.phase(), QuizPhase::Finished);

        session.serve(&photos, &rules, &mut rng).unwrap();
        assert_eq!(session.round, 2);
        assert_eq!(session.tracker().total_asked(), 0);
        assert_eq!(session.phase(), QuizPhase::QuestionServed);
    }

    #[test]
    fn finished_score_survives_a_shrunk_album() {
        let photos = album(&["A", "B", "C", "D"]);
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(8);
        let mut session = GameSession::new(PLAYER);

        for _ in 0..4 {
            let question = session.serve(&photos, &rules, &mut rng).unwrap();
            session.check(question.target.id, &rules).unwrap();
        }
        let final_score = session.score_report();
        assert!(matches!(final_score, ScoreReport::Final(_)));

        let err = session.serve(&photos[..3], &rules, &mut rng).unwrap_err();
        assert!(matches!(err, SessionError::InsufficientData(_)));
        assert_eq!(session.score_report(), final_score);
        assert_eq!(session.round, 1);
        assert_eq!(session.phase(), QuizPhase::Finished);

        session.serve(&photos, &rules, &mut rng).unwrap();
        assert_eq!(session.round, 2);
        assert_eq!(session.tracker().total_asked(), 0);
    }

    #[test]
    fn insufficient_photos_keep_the_session_waiting() {
        let photos = album(&["A", "B", "C"]);
        let rules = GameRules::default();
        let mut rng = StdRng::seed_from_u64(7);
        let mut session = GameSession::new(PLAYER);

        let err = session.serve(&photos, &rules, &mut rng).unwrap_err();
        assert!(matches!(err, SessionError::InsufficientData(_)));
        assert_eq!(session.phase(), QuizPhase::AwaitingQuestion);
    }
}
