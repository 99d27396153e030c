//! Answer Evaluation
//!
//! Grades the assembled answer against the level's target sentence.
//! Incomplete selections are a distinct verdict, not a failure: the
//! submit path must warn and skip grading, never call this a wrong answer.

use serde::{Serialize, Deserialize};

use crate::game::token::SelectionTracker;

/// Three-way outcome of checking an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// Every position matches the target sentence.
    Correct,
    /// Fully selected, but at least one position differs.
    Wrong,
    /// Not every presented token is selected; the answer was not graded.
    Incomplete,
}

/// Compare the selection's word sequence against the target sentence.
///
/// Comparison is element-wise and case-sensitive. Element-wise rather
/// than join-and-compare: a token whose word contains a space must not
/// alias a different split of the same sentence.
pub fn evaluate(tracker: &SelectionTracker, target_words: &[String]) -> Verdict {
    if !tracker.is_complete() {
        return Verdict::Incomplete;
    }

    let selected = tracker.selected_words();
    if selected.len() != target_words.len() {
        return Verdict::Wrong;
    }

    let all_match = selected
        .iter()
        .zip(target_words.iter())
        .all(|(picked, target)| *picked == target);

    if all_match {
        Verdict::Correct
    } else {
        Verdict::Wrong
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::token::{SelectionTracker, TokenId};

    fn tracker_with(words: &[&str]) -> (SelectionTracker, Vec<TokenId>) {
        let mut next_id = 0;
        let tracker =
            SelectionTracker::deal(words.iter().map(|w| w.to_string()).collect(), &mut next_id);
        let ids = tracker.tokens().iter().map(|t| t.id).collect();
        (tracker, ids)
    }

    fn target(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_correct_order() {
        let (mut tracker, ids) = tracker_with(&["like", "I", "cats"]);
        let target = target(&["I", "like", "cats"]);

        tracker.activate(ids[1]);
        tracker.activate(ids[0]);
        tracker.activate(ids[2]);

        assert_eq!(evaluate(&tracker, &target), Verdict::Correct);
    }

    #[test]
    fn test_wrong_order() {
        let (mut tracker, ids) = tracker_with(&["like", "I", "cats"]);
        let target = target(&["I", "like", "cats"]);

        // "like I cats"
        tracker.activate(ids[0]);
        tracker.activate(ids[1]);
        tracker.activate(ids[2]);

        assert_eq!(evaluate(&tracker, &target), Verdict::Wrong);
    }

    #[test]
    fn test_incomplete_is_not_wrong() {
        let (mut tracker, ids) = tracker_with(&["I", "like"]);
        let target = target(&["I", "like"]);

        tracker.activate(ids[0]);

        assert_eq!(evaluate(&tracker, &target), Verdict::Incomplete);
    }

    #[test]
    fn test_empty_selection_is_incomplete() {
        let (tracker, _) = tracker_with(&["I", "like"]);
        assert_eq!(evaluate(&tracker, &target(&["I", "like"])), Verdict::Incomplete);
    }

    #[test]
    fn test_case_sensitive() {
        let (mut tracker, ids) = tracker_with(&["i", "like", "cats"]);
        let target = target(&["I", "like", "cats"]);

        tracker.activate(ids[0]);
        tracker.activate(ids[1]);
        tracker.activate(ids[2]);

        assert_eq!(evaluate(&tracker, &target), Verdict::Wrong);
    }

    #[test]
    fn test_words_containing_spaces_do_not_alias() {
        // "I like" + "cats" joined with spaces reads the same as
        // "I" + "like cats"; element-wise comparison must not conflate them.
        let (mut tracker, ids) = tracker_with(&["I like", "cats"]);
        let target = target(&["I", "like cats"]);

        tracker.activate(ids[0]);
        tracker.activate(ids[1]);

        assert_eq!(evaluate(&tracker, &target), Verdict::Wrong);
    }

    #[test]
    fn test_revised_selection_grades_final_order() {
        let (mut tracker, ids) = tracker_with(&["cats", "I", "like"]);
        let target = target(&["I", "like", "cats"]);

        // First pass spells "cats I like"; re-clicking "cats" re-queues it
        // to the back, leaving "I like cats".
        tracker.activate(ids[0]);
        tracker.activate(ids[1]);
        tracker.activate(ids[2]);
        tracker.activate(ids[0]);

        assert_eq!(evaluate(&tracker, &target), Verdict::Correct);
    }

    #[test]
    fn test_correct_iff_selection_spells_target() {
        use rand::seq::SliceRandom;
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        let words = ["we", "walk", "to", "the", "park"];
        let target = target(&words);
        let mut driver = StdRng::seed_from_u64(7);

        for _ in 0..200 {
            let (mut tracker, ids) = tracker_with(&words);
            let mut order: Vec<usize> = (0..words.len()).collect();
            order.shuffle(&mut driver);

            for &index in &order {
                tracker.activate(ids[index]);
            }

            let spelled: Vec<&str> = order.iter().map(|&i| words[i]).collect();
            let expected = if spelled == words {
                Verdict::Correct
            } else {
                Verdict::Wrong
            };
            assert_eq!(evaluate(&tracker, &target), expected);
        }
    }
}
