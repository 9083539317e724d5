use crate::models::Methodology;
use std::collections::BTreeSet;

/// Score used when either side declares no methodology
pub const NEUTRAL_METHODOLOGY_SCORE: f64 = 0.5;

const N: usize = Methodology::ALL.len();

/// Compatibility of a subject methodology (row) with an objective methodology (column)
///
/// Order follows `Methodology::ALL`: experimental, computational, theoretical,
/// observational, clinical, survey, qualitative, meta_analysis, mixed_methods.
static COMPATIBILITY: [[f64; N]; N] = [
    // experimental
    [1.0, 0.4, 0.3, 0.6, 0.8, 0.4, 0.3, 0.5, 0.7],
    // computational
    [0.4, 1.0, 0.8, 0.5, 0.3, 0.3, 0.2, 0.6, 0.7],
    // theoretical
    [0.3, 0.8, 1.0, 0.4, 0.2, 0.2, 0.3, 0.6, 0.5],
    // observational
    [0.6, 0.5, 0.4, 1.0, 0.7, 0.8, 0.6, 0.6, 0.7],
    // clinical
    [0.8, 0.3, 0.2, 0.7, 1.0, 0.6, 0.5, 0.6, 0.8],
    // survey
    [0.4, 0.3, 0.2, 0.8, 0.6, 1.0, 0.7, 0.5, 0.8],
    // qualitative
    [0.3, 0.2, 0.3, 0.6, 0.5, 0.7, 1.0, 0.4, 0.9],
    // meta_analysis
    [0.5, 0.6, 0.6, 0.6, 0.6, 0.5, 0.4, 1.0, 0.7],
    // mixed_methods
    [0.7, 0.7, 0.5, 0.7, 0.8, 0.8, 0.9, 0.7, 1.0],
];

/// Table lookup for an ordered methodology pair
#[inline]
pub fn compatibility(subject: Methodology, objective: Methodology) -> f64 {
    COMPATIBILITY[subject.index()][objective.index()]
}

/// Best pairwise compatibility across both tag sets
///
/// A single strongly compatible pair is enough, so this is a maximum and not
/// an average. Missing data on either side is neutral.
pub fn methodology_score(
    subject_methods: &BTreeSet<Methodology>,
    objective_methods: &BTreeSet<Methodology>,
) -> f64 {
    if subject_methods.is_empty() || objective_methods.is_empty() {
        return NEUTRAL_METHODOLOGY_SCORE;
    }

    subject_methods
        .iter()
        .flat_map(|&s| objective_methods.iter().map(move |&o| compatibility(s, o)))
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use Methodology::*;

    fn methods(list: &[Methodology]) -> BTreeSet<Methodology> {
        list.iter().copied().collect()
    }

    #[test]
    fn test_table_is_well_formed() {
        for m in Methodology::ALL {
            assert_eq!(compatibility(m, m), 1.0, "{} self-pair", m);
            for other in Methodology::ALL {
                let value = compatibility(m, other);
                assert!((0.2..=1.0).contains(&value), "{} x {} = {}", m, other, value);
                if m != other {
                    assert!(value <= 0.9);
                }
            }
        }
    }

    #[test]
    fn test_exact_match() {
        assert_eq!(methodology_score(&methods(&[Computational]), &methods(&[Computational])), 1.0);
    }

    #[test]
    fn test_compatible_match() {
        assert_eq!(methodology_score(&methods(&[Computational]), &methods(&[Theoretical])), 0.8);
        assert_eq!(methodology_score(&methods(&[Experimental]), &methods(&[Clinical])), 0.8);
    }

    #[test]
    fn test_incompatible_match_is_not_neutral() {
        let score = methodology_score(&methods(&[Computational]), &methods(&[Qualitative]));
        assert_eq!(score, 0.2);
    }

    #[test]
    fn test_maximum_over_cross_product() {
        let score = methodology_score(
            &methods(&[Theoretical, Qualitative]),
            &methods(&[Survey, MixedMethods]),
        );
        assert_eq!(score, 0.9);
    }

    #[test]
    fn test_empty_sets_are_neutral() {
        assert_eq!(methodology_score(&methods(&[]), &methods(&[Clinical])), 0.5);
        assert_eq!(methodology_score(&methods(&[Clinical]), &methods(&[])), 0.5);
        assert_eq!(methodology_score(&methods(&[]), &methods(&[])), 0.5);
    }
}
