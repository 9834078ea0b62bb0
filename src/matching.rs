//! Shared exact-match / near-miss arithmetic used by both the Brain's
//! per-strategy scoring and the Verification Loop, so the two can't drift
//! (spec §4.7 step 4 and §4.9 use the same near-miss definition).

use std::collections::HashSet;

/// Numbers present in both `predicted` and `actual`.
pub fn exact_matches(predicted: &[u8], actual: &[u8]) -> Vec<u8> {
    let actual_set: HashSet<u8> = actual.iter().copied().collect();
    predicted.iter().copied().filter(|p| actual_set.contains(p)).collect()
}

/// Predicted numbers that differ from some actual number by exactly 1,
/// excluding any predicted number that was itself an exact match.
pub fn near_misses(predicted: &[u8], actual: &[u8]) -> Vec<u8> {
    let actual_set: HashSet<u8> = actual.iter().copied().collect();
    predicted
        .iter()
        .copied()
        .filter(|p| !actual_set.contains(p))
        .filter(|p| actual_set.contains(&p.wrapping_sub(1)) || actual_set.contains(&(p + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_and_near_misses_are_disjoint() {
        let predicted = [7, 15, 30, 42, 80];
        let actual = [7, 15, 23, 42, 71];
        let matches = exact_matches(&predicted, &actual);
        let misses = near_misses(&predicted, &actual);
        assert_eq!(matches, vec![7, 15, 42]);
        for m in &misses {
            assert!(!matches.contains(m));
        }
    }

    #[test]
    fn near_miss_requires_no_exact_match_for_that_predicted_value() {
        // predicted 8 differs from actual 7 by 1, but actual also already
        // contains some value equal to 8? not in this case, so 8 counts.
        let predicted = [8];
        let actual = [7];
        assert_eq!(near_misses(&predicted, &actual), vec![8]);
    }
}
