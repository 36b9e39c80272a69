use std::collections::VecDeque;

use thiserror::Error;

use crate::dao::models::PhotoRecord;

/// Returned when a percentage is requested before any answer was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("score is undefined until at least one question has been answered")]
pub struct DivisionUndefined;

/// Score of a session at a given point in time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score {
    /// Answers matching the target.
    pub correct: u32,
    /// Answers recorded.
    pub total: u32,
    /// `correct / total * 100`, rounded to two decimal places.
    pub percentage: f64,
}

impl Score {
    fn compute(correct: u32, total: u32) -> Result<Self, DivisionUndefined> {
        if total == 0 {
            return Err(DivisionUndefined);
        }
        let raw = f64::from(correct) / f64::from(total) * 100.0;
        Ok(Self {
            correct,
            total,
            percentage: (raw * 100.0).round() / 100.0,
        })
    }

    /// Percentage formatted with exactly two decimals, e.g. `"25.00"`.
    pub fn formatted(&self) -> String {
        format!("{:.2}", self.percentage)
    }
}

/// Running tally of a player's round plus the questions they skipped.
#[derive(Debug, Clone, Default)]
pub struct SessionTracker {
    total_asked: u32,
    correct_count: u32,
    retry_queue: VecDeque<PhotoRecord>,
}

impl SessionTracker {
    /// Empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Questions answered so far.
    pub fn total_asked(&self) -> u32 {
        self.total_asked
    }

    /// Correct answers so far.
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    /// Skipped photos waiting to be asked again, oldest first.
    pub fn retry_queue(&self) -> &VecDeque<PhotoRecord> {
        &self.retry_queue
    }

    pub(crate) fn retry_queue_mut(&mut self) -> &mut VecDeque<PhotoRecord> {
        &mut self.retry_queue
    }

    /// Count an answered question.
    pub fn record_answer(&mut self, correct: bool) {
        self.total_asked += 1;
        if correct {
            self.correct_count += 1;
        }
    }

    /// Queue a skipped question behind the ones already waiting.
    pub fn skip(&mut self, question: PhotoRecord) {
        self.retry_queue.push_back(question);
    }

    /// Score of the answers recorded so far.
    pub fn score(&self) -> Result<Score, DivisionUndefined> {
        Score::compute(self.correct_count, self.total_asked)
    }

    /// A round ends once `round_length` answers are in and nothing is left to retry.
    pub fn round_complete(&self, round_length: u32) -> bool {
        self.total_asked >= round_length && self.retry_queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::UserId;

    fn photo(id: i64, label: &str) -> PhotoRecord {
        PhotoRecord {
            id,
            url: format!("/photos/{id}.jpg"),
            label: label.into(),
            owner_id: UserId(1),
        }
    }

    #[test]
    fn record_answer_keeps_correct_below_total() {
        let mut tracker = SessionTracker::new();
        for correct in [true, false, true, true, false] {
            tracker.record_answer(correct);
            assert!(tracker.correct_count() <= tracker.total_asked());
        }
        assert_eq!(tracker.total_asked(), 5);
        assert_eq!(tracker.correct_count(), 3);
    }

    #[test]
    fn skipping_does_not_touch_counters() {
        let mut tracker = SessionTracker::new();
        tracker.record_answer(true);
        tracker.skip(photo(1, "Ann"));
        tracker.skip(photo(2, "Ben"));

        assert_eq!(tracker.total_asked(), 1);
        assert_eq!(tracker.correct_count(), 1);
        assert_eq!(tracker.retry_queue().len(), 2);
    }

    #[test]
    fn retry_queue_is_fifo() {
        let mut tracker = SessionTracker::new();
        tracker.skip(photo(1, "A"));
        tracker.skip(photo(2, "B"));

        let queue = tracker.retry_queue_mut();
        assert_eq!(queue.pop_front().map(|p| p.label), Some("A".to_string()));
        assert_eq!(queue.pop_front().map(|p| p.label), Some("B".to_string()));
    }

    #[test]
    fn score_is_rounded_to_two_decimals() {
        let mut tracker = SessionTracker::new();
        tracker.record_answer(true);
        tracker.record_answer(true);
        tracker.record_answer(false);
        tracker.record_answer(false);
        let score = tracker.score().unwrap();
        assert_eq!(score.percentage, 50.0);
        assert_eq!(score.formatted(), "50.00");

        let third = Score::compute(1, 3).unwrap();
        assert_eq!(third.percentage, 33.33);
        let two_thirds = Score::compute(2, 3).unwrap();
        assert_eq!(two_thirds.formatted(), "66.67");
    }

    #[test]
    fn score_without_answers_is_undefined() {
        let tracker = SessionTracker::new();
        assert_eq!(tracker.score(), Err(DivisionUndefined));
    }

    #[test]
    fn round_needs_length_and_empty_queue() {
        let mut tracker = SessionTracker::new();
        for _ in 0..3 {
            tracker.record_answer(true);
        }
        assert!(!tracker.round_complete(4));

        tracker.record_answer(false);
        assert!(tracker.round_complete(4));

        tracker.skip(photo(3, "Cat"));
        assert!(!tracker.round_complete(4));
    }
}
