//! Question selection: picks the photo to guess and the pictures offered as choices.

use std::collections::VecDeque;

use rand::{Rng, seq::SliceRandom};
use thiserror::Error;
use tracing::debug;

use crate::dao::models::PhotoRecord;

/// Where the target of a question came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionOrigin {
    /// Drawn uniformly from the player's photos.
    Random,
    /// Taken from the front of the retry queue.
    Retry,
}

/// A question as shown to the player: "who is `target.label`?" plus a set of pictures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Photo whose label is asked for.
    pub target: PhotoRecord,
    /// Pictures offered to the player, in display order. Always contains `target`.
    pub choices: Vec<PhotoRecord>,
    /// Whether the target was drawn or retried.
    pub origin: QuestionOrigin,
}

/// The player does not own enough photos to fill a choice set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("at least {required} photos are required to play, found {available}")]
pub struct InsufficientData {
    /// Photos needed for one question.
    pub required: usize,
    /// Photos the player owns.
    pub available: usize,
}

/// Build the next question from `all_photos`, serving skipped questions first.
///
/// The retry queue is only consumed once the photo count check passed. Skipped
/// photos that were deleted from the store in the meantime are dropped.
pub fn next_question<R: Rng + ?Sized>(
    all_photos: &[PhotoRecord],
    retry_queue: &mut VecDeque<PhotoRecord>,
    choice_count: usize,
    rng: &mut R,
) -> Result<Question, InsufficientData> {
    let required = choice_count.max(1);
    if all_photos.len() < required {
        return Err(InsufficientData {
            required,
            available: all_photos.len(),
        });
    }

    let (target, origin) = loop {
        match retry_queue.pop_front() {
            Some(skipped) => match all_photos.iter().find(|photo| photo.id == skipped.id) {
                Some(current) => break (current.clone(), QuestionOrigin::Retry),
                None => debug!(photo_id = skipped.id, "skipped photo no longer stored; dropping"),
            },
            None => {
                let index = rng.random_range(0..all_photos.len());
                break (all_photos[index].clone(), QuestionOrigin::Random);
            }
        }
    };

    let mut distractors: Vec<&PhotoRecord> = all_photos
        .iter()
        .filter(|photo| photo.id != target.id)
        .collect();
    distractors.shuffle(rng);

    let mut choices: Vec<PhotoRecord> = distractors
        .into_iter()
        .take(required - 1)
        .cloned()
        .collect();
    choices.push(target.clone());
    choices.shuffle(rng);

    Ok(Question {
        target,
        choices,
        origin,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::dao::models::UserId;

    fn photos(labels: &[&str]) -> Vec<PhotoRecord> {
        labels
            .iter()
            .enumerate()
            .map(|(index, label)| PhotoRecord {
                id: index as i64 + 1,
                url: format!("/photos/{label}.jpg"),
                label: (*label).into(),
                owner_id: UserId(42),
            })
            .collect()
    }

    #[test]
    fn exactly_four_photos_always_work() {
        let all = photos(&["A", "B", "C", "D"]);
        for seed in 0..200 {
            let mut rng = StdRng::seed_from_u64(seed);
            let question = next_question(&all, &mut VecDeque::new(), 4, &mut rng).unwrap();

            assert_eq!(question.origin, QuestionOrigin::Random);
            assert_eq!(question.choices.len(), 4);
            let ids: HashSet<_> = question.choices.iter().map(|p| p.id).collect();
            assert_eq!(ids.len(), 4, "choices must be distinct");
            assert!(ids.contains(&question.target.id));
        }
    }

    #[test]
    fn three_photos_always_fail() {
        let all = photos(&["A", "B", "C"]);
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let err = next_question(&all, &mut VecDeque::new(), 4, &mut rng).unwrap_err();
            assert_eq!(
                err,
                InsufficientData {
                    required: 4,
                    available: 3
                }
            );
        }
    }

    #[test]
    fn insufficient_data_leaves_retry_queue_untouched() {
        let all = photos(&["A", "B"]);
        let mut queue = VecDeque::from(vec![all[0].clone()]);
        let mut rng = StdRng::seed_from_u64(1);

        assert!(next_question(&all, &mut queue, 4, &mut rng).is_err());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn retry_queue_is_served_in_fifo_order() {
        let all = photos(&["A", "B", "C", "D", "E", "F"]);
        let mut queue = VecDeque::from(vec![all[0].clone(), all[1].clone()]);
        let mut rng = StdRng::seed_from_u64(7);

        let first = next_question(&all, &mut queue, 4, &mut rng).unwrap();
        let second = next_question(&all, &mut queue, 4, &mut rng).unwrap();

        assert_eq!(first.target.label, "A");
        assert_eq!(first.origin, QuestionOrigin::Retry);
        assert_eq!(second.target.label, "B");
        assert_eq!(second.origin, QuestionOrigin::Retry);
        assert!(queue.is_empty());
    }

    #[test]
    fn deleted_skipped_photo_is_dropped() {
        let all = photos(&["A", "B", "C", "D"]);
        let gone = PhotoRecord {
            id: 99,
            url: "/photos/gone.jpg".into(),
            label: "Gone".into(),
            owner_id: UserId(42),
        };
        let mut queue = VecDeque::from(vec![gone, all[2].clone()]);
        let mut rng = StdRng::seed_from_u64(3);

        let question = next_question(&all, &mut queue, 4, &mut rng).unwrap();
        assert_eq!(question.target.label, "C");
        assert!(queue.is_empty());
    }

    #[test]
    fn large_albums_are_truncated_to_choice_count() {
        let all = photos(&["A", "B", "C", "D", "E", "F", "G", "H"]);
        let mut rng = StdRng::seed_from_u64(11);
        let question = next_question(&all, &mut VecDeque::new(), 4, &mut rng).unwrap();
        assert_eq!(question.choices.len(), 4);
        assert!(question.choices.contains(&question.target));
    }
}
