//! Game controller: glues the photo store, the player's session and the alert sink
//! together for the serve / check / skip / score requests.

use tracing::{debug, info};

use crate::{
    dao::models::{PhotoId, UserId},
    error::ServiceError,
    services::{
        notifier::{self, LowScoreAlert},
        selector::Question,
    },
    state::{
        SharedState,
        session::{CheckOutcome, ScoreReport, SessionError},
    },
};

/// Serve the player's next question, creating their session on first visit.
pub async fn serve_question(state: &SharedState, player: UserId) -> Result<Question, ServiceError> {
    let photos = state.photo_store().list_photos_for_user(player).await?;
    let rules = &state.config().rules;

    let (question, session_id, round) = state.sessions().with_session(player, |session| {
        let mut rng = rand::rng();
        session
            .serve(&photos, rules, &mut rng)
            .map(|question| (question, session.id, session.round))
    })?;

    debug!(
        player = %player,
        session_id = %session_id,
        round,
        target = question.target.id,
        origin = ?question.origin,
        "question served"
    );
    Ok(question)
}

/// Record the player's guess and fire a low-score alert when the round ends badly.
pub async fn check_answer(
    state: &SharedState,
    player: UserId,
    guess: PhotoId,
) -> Result<CheckOutcome, ServiceError> {
    let has_pending = state
        .sessions()
        .peek(player, |session| session.pending().is_some())
        .unwrap_or(false);
    if !has_pending {
        return Err(ServiceError::InvalidState(
            "no question is waiting for an answer".into(),
        ));
    }

    // Photos of other players are reported exactly like missing ones.
    let photo = state
        .photo_store()
        .get_photo_by_id(guess)
        .await?
        .filter(|photo| photo.owner_id == player)
        .ok_or_else(|| ServiceError::NotFound("Photo not found.".into()))?;

    let rules = &state.config().rules;
    let (outcome, session_id) = state.sessions().with_session(player, |session| {
        session
            .check(photo.id, rules)
            .map(|outcome| (outcome, session.id))
    })?;

    match outcome {
        CheckOutcome::Continue { correct } => {
            debug!(player = %player, session_id = %session_id, correct, "answer recorded");
        }
        CheckOutcome::Finished { correct, score } => {
            info!(
                player = %player,
                session_id = %session_id,
                correct,
                score = %score.formatted(),
                "round finished"
            );
            if score.percentage < rules.low_score_threshold {
                let alert = LowScoreAlert::new(&state.config().alert, player, &score);
                notifier::dispatch(state.notifier(), alert);
            }
        }
    }

    Ok(outcome)
}

/// Push the displayed question to the back of the retry queue.
pub async fn skip_question(state: &SharedState, player: UserId) -> Result<(), ServiceError> {
    if state.sessions().peek(player, |_| ()).is_none() {
        return Err(SessionError::NoPendingQuestion.into());
    }

    let (skipped, session_id, queued) = state.sessions().with_session(player, |session| {
        session
            .skip()
            .map(|photo| (photo, session.id, session.tracker().retry_queue().len()))
    })?;

    debug!(
        player = %player,
        session_id = %session_id,
        photo_id = skipped.id,
        queued,
        "question skipped"
    );
    Ok(())
}

/// Current or final score of the player. Never fails: an unstarted round is a report, not an error.
pub fn score(state: &SharedState, player: UserId) -> ScoreReport {
    state
        .sessions()
        .peek(player, |session| session.score_report())
        .unwrap_or(ScoreReport::NotStarted)
}

/// Dispose of the player's session, e.g. on logout.
pub fn end_session(state: &SharedState, player: UserId) {
    if state.sessions().remove(player) {
        info!(player = %player, "game session disposed");
    }
}
