// 🥋 Scoring Engine - trimmed mean over judge scores
//
// Pure functions only. Nothing in here touches storage.

/// Number of judge scores every competitor carries
pub const SCORE_COUNT: usize = 5;

/// Overall score: drop one lowest and one highest score, average the rest.
///
/// Ties do not matter: after sorting, exactly one element is removed from
/// each end. Fewer than 3 scores leaves nothing to average, so the result
/// is `0.0` rather than an error.
pub fn compute_overall_score(scores: &[u32]) -> f64 {
    if scores.len() < 3 {
        return 0.0;
    }

    let mut sorted = scores.to_vec();
    sorted.sort_unstable();

    let interior = &sorted[1..sorted.len() - 1];
    let sum: u64 = interior.iter().map(|&s| u64::from(s)).sum();

    sum as f64 / interior.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_scores() {
        assert_eq!(compute_overall_score(&[10, 20, 30, 40, 50]), 30.0);
    }

    #[test]
    fn test_unsorted_scores() {
        // sorted: 1 3 4 5 9 -> (3 + 4 + 5) / 3
        assert_eq!(compute_overall_score(&[5, 1, 9, 3, 4]), 4.0);
    }

    #[test]
    fn test_all_equal_scores() {
        assert_eq!(compute_overall_score(&[5, 5, 5, 5, 5]), 5.0);
    }

    #[test]
    fn test_duplicate_extremes_drop_only_one_each() {
        // sorted: 1 1 2 9 9 -> (1 + 2 + 9) / 3
        assert_eq!(compute_overall_score(&[9, 1, 2, 9, 1]), 4.0);
    }

    #[test]
    fn test_fractional_result() {
        // sorted: 0 1 1 2 5 -> (1 + 1 + 2) / 3
        let score = compute_overall_score(&[1, 0, 5, 2, 1]);
        assert!((score - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert_eq!(compute_overall_score(&[]), 0.0);
        assert_eq!(compute_overall_score(&[7]), 0.0);
        assert_eq!(compute_overall_score(&[1, 2]), 0.0);
    }

    #[test]
    fn test_three_scores_keeps_median() {
        assert_eq!(compute_overall_score(&[8, 2, 5]), 5.0);
    }

    #[test]
    fn test_does_not_mutate_input() {
        let scores = vec![50, 10, 40, 20, 30];
        compute_overall_score(&scores);
        assert_eq!(scores, vec![50, 10, 40, 20, 30]);
    }

    #[test]
    fn test_large_scores_do_not_overflow() {
        let scores = [u32::MAX; 5];
        assert_eq!(compute_overall_score(&scores), u32::MAX as f64);
    }
}
