use crate::models::{CareerStage, Subject};

/// Score when the objective publishes no award amount
pub const NEUTRAL_BUDGET_SCORE: f64 = 0.5;
/// Lowest score for awards above the estimated range
const OVERSIZED_FLOOR: f64 = 0.2;

const CITATION_THRESHOLD: u64 = 500;
const CITATION_SCALE: f64 = 1000.0;
const CITATION_MULTIPLIER_CAP: f64 = 2.0;

const H_INDEX_THRESHOLD: u32 = 15;
const H_INDEX_SCALE: f64 = 30.0;
const H_INDEX_MULTIPLIER_CAP: f64 = 1.5;

/// Plausible funding range for a subject
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    #[inline]
    pub fn contains(&self, amount: f64) -> bool {
        amount >= self.min && amount <= self.max
    }
}

/// Base range by career stage before impact multipliers
pub fn base_range(stage: CareerStage) -> BudgetRange {
    let (min, max) = match stage {
        CareerStage::GraduateStudent => (5_000.0, 25_000.0),
        CareerStage::Postdoc => (10_000.0, 50_000.0),
        CareerStage::AssistantProfessor => (25_000.0, 200_000.0),
        CareerStage::AssociateProfessor => (50_000.0, 500_000.0),
        CareerStage::FullProfessor => (100_000.0, 1_000_000.0),
        CareerStage::Emeritus => (10_000.0, 100_000.0),
        CareerStage::ResearchScientist => (25_000.0, 300_000.0),
        CareerStage::Other => (10_000.0, 200_000.0),
    };
    BudgetRange { min, max }
}

/// Estimate a subject's funding range
///
/// The upper bound grows with total citations above 500 (up to 2.0x) and with
/// an h-index above 15 (up to 1.5x). The lower bound never moves.
pub fn estimate_budget_range(subject: &Subject) -> BudgetRange {
    let mut range = base_range(subject.career_stage);

    if let Some(citations) = subject.total_citations.filter(|c| *c > CITATION_THRESHOLD) {
        let multiplier =
            (1.0 + (citations - CITATION_THRESHOLD) as f64 / CITATION_SCALE).min(CITATION_MULTIPLIER_CAP);
        range.max *= multiplier;
    }

    if let Some(h_index) = subject.h_index.filter(|h| *h > H_INDEX_THRESHOLD) {
        let multiplier =
            (1.0 + f64::from(h_index - H_INDEX_THRESHOLD) / H_INDEX_SCALE).min(H_INDEX_MULTIPLIER_CAP);
        range.max *= multiplier;
    }

    range
}

/// Alignment of an award amount with the estimated range
pub fn budget_score_for_range(range: BudgetRange, max_award_amount: Option<f64>) -> f64 {
    let amount = match max_award_amount {
        Some(amount) if amount > 0.0 => amount,
        _ => return NEUTRAL_BUDGET_SCORE,
    };

    if range.contains(amount) {
        1.0
    } else if amount < range.min {
        (amount / range.min).clamp(0.0, 1.0)
    } else {
        (range.max / amount).max(OVERSIZED_FLOOR)
    }
}

/// Budget alignment between a subject and an objective's maximum award
pub fn budget_score(subject: &Subject, max_award_amount: Option<f64>) -> f64 {
    budget_score_for_range(estimate_budget_range(subject), max_award_amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn subject(stage: CareerStage, citations: Option<u64>, h_index: Option<u32>) -> Subject {
        Subject {
            id: "s".to_string(),
            name: None,
            institution: "Test University".to_string(),
            department: None,
            email: None,
            research_interests: vec!["genomics".to_string()],
            methodologies: BTreeSet::new(),
            career_stage: stage,
            publications: vec![],
            h_index,
            total_citations: citations,
        }
    }

    #[test]
    fn test_base_estimation() {
        let range = estimate_budget_range(&subject(CareerStage::AssistantProfessor, None, None));
        assert_eq!(range, BudgetRange { min: 25_000.0, max: 200_000.0 });
    }

    #[test]
    fn test_citation_and_h_index_multipliers() {
        // 1000 citations -> 1.5x, h-index 30 -> 1.5x
        let range = estimate_budget_range(&subject(CareerStage::AssistantProfessor, Some(1_000), Some(30)));
        assert_eq!(range.min, 25_000.0);
        assert!((range.max - 200_000.0 * 1.5 * 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_multipliers_are_capped() {
        let range = estimate_budget_range(&subject(CareerStage::Postdoc, Some(1_000_000), Some(500)));
        assert!((range.max - 50_000.0 * 2.0 * 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_thresholds_are_exclusive() {
        let range = estimate_budget_range(&subject(CareerStage::Postdoc, Some(500), Some(15)));
        assert_eq!(range.max, 50_000.0);
    }

    #[test]
    fn test_budget_score_perfect_match() {
        let s = subject(CareerStage::AssistantProfessor, None, None);
        assert_eq!(budget_score(&s, Some(100_000.0)), 1.0);
        assert_eq!(budget_score(&s, Some(25_000.0)), 1.0);
        assert_eq!(budget_score(&s, Some(200_000.0)), 1.0);
    }

    #[test]
    fn test_budget_score_too_small() {
        let s = subject(CareerStage::AssistantProfessor, None, None);
        assert!((budget_score(&s, Some(12_500.0)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_budget_score_too_large() {
        let s = subject(CareerStage::AssistantProfessor, None, None);
        assert!((budget_score(&s, Some(400_000.0)) - 0.5).abs() < 1e-12);
        assert_eq!(budget_score(&s, Some(10_000_000.0)), 0.2);
    }

    #[test]
    fn test_budget_score_no_amount() {
        let s = subject(CareerStage::FullProfessor, None, None);
        assert_eq!(budget_score(&s, None), 0.5);
        assert_eq!(budget_score(&s, Some(0.0)), 0.5);
    }
}
