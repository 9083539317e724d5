use crate::models::MatchRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

const TOP_MATCHES: usize = 10;

/// Summary of one match in the statistics top list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopMatch {
    pub match_id: String,
    pub subject_id: String,
    pub objective_id: String,
    pub total_score: f64,
    pub research_alignment: f64,
    pub methodology_match: f64,
    pub career_stage_fit: f64,
}

/// Aggregate view over a set of match records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub total_matches: usize,
    pub average_score: f64,
    pub max_score: f64,
    pub min_score: f64,
    /// Bucket label -> count, buckets are half-open except the top one
    pub score_distribution: BTreeMap<String, usize>,
    pub top_matches: Vec<TopMatch>,
    pub unique_subjects: usize,
    pub unique_objectives: usize,
}

const BUCKETS: [(&str, f64, f64); 6] = [
    ("0.9-1.0", 0.9, f64::INFINITY),
    ("0.8-0.9", 0.8, 0.9),
    ("0.7-0.8", 0.7, 0.8),
    ("0.6-0.7", 0.6, 0.7),
    ("0.5-0.6", 0.5, 0.6),
    ("below-0.5", f64::NEG_INFINITY, 0.5),
];

fn bucket_for(score: f64) -> &'static str {
    BUCKETS
        .iter()
        .find(|(_, low, high)| score >= *low && score < *high)
        .map(|(label, _, _)| *label)
        .unwrap_or("below-0.5")
}

impl MatchStatistics {
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a MatchRecord>,
    {
        let records: Vec<&MatchRecord> = records.into_iter().collect();

        let mut score_distribution: BTreeMap<String, usize> =
            BUCKETS.iter().map(|(label, _, _)| (label.to_string(), 0)).collect();

        if records.is_empty() {
            return Self {
                total_matches: 0,
                average_score: 0.0,
                max_score: 0.0,
                min_score: 0.0,
                score_distribution,
                top_matches: Vec::new(),
                unique_subjects: 0,
                unique_objectives: 0,
            };
        }

        let scores: Vec<f64> = records.iter().map(|r| r.score.total_score).collect();
        for score in &scores {
            *score_distribution.entry(bucket_for(*score).to_string()).or_default() += 1;
        }

        let mut ranked = records.clone();
        ranked.sort_by(|a, b| {
            b.score
                .total_score
                .partial_cmp(&a.score.total_score)
                .unwrap_or(Ordering::Equal)
        });

        let top_matches = ranked
            .iter()
            .take(TOP_MATCHES)
            .map(|record| TopMatch {
                match_id: record.match_id.to_string(),
                subject_id: record.subject_id.clone(),
                objective_id: record.objective_id.clone(),
                total_score: record.score.total_score,
                research_alignment: record.score.research_alignment,
                methodology_match: record.score.methodology_match,
                career_stage_fit: record.score.career_stage_fit,
            })
            .collect();

        Self {
            total_matches: records.len(),
            average_score: scores.iter().sum::<f64>() / scores.len() as f64,
            max_score: scores.iter().copied().fold(f64::MIN, f64::max),
            min_score: scores.iter().copied().fold(f64::MAX, f64::min),
            score_distribution,
            top_matches,
            unique_subjects: records.iter().map(|r| r.subject_id.as_str()).collect::<HashSet<_>>().len(),
            unique_objectives: records.iter().map(|r| r.objective_id.as_str()).collect::<HashSet<_>>().len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchScore;
    use chrono::{TimeZone, Utc};

    fn record(subject: &str, objective: &str, total: f64) -> MatchRecord {
        let at = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        MatchRecord::new(
            subject,
            objective,
            MatchScore {
                total_score: total,
                research_alignment: 0.5,
                methodology_match: 0.5,
                career_stage_fit: 0.5,
                deadline_urgency: 0.5,
                budget_alignment: 0.5,
                scoring_algorithm: "test".to_string(),
                calculated_at: at,
            },
            at,
        )
    }

    #[test]
    fn test_statistics_calculation() {
        let records = vec![
            record("s1", "o1", 0.95),
            record("s1", "o2", 0.85),
            record("s2", "o1", 0.75),
            record("s2", "o3", 0.4),
        ];

        let stats = MatchStatistics::from_records(&records);

        assert_eq!(stats.total_matches, 4);
        assert!((stats.average_score - 0.7375).abs() < 1e-12);
        assert_eq!(stats.max_score, 0.95);
        assert_eq!(stats.min_score, 0.4);
        assert_eq!(stats.score_distribution["0.9-1.0"], 1);
        assert_eq!(stats.score_distribution["0.8-0.9"], 1);
        assert_eq!(stats.score_distribution["0.7-0.8"], 1);
        assert_eq!(stats.score_distribution["0.6-0.7"], 0);
        assert_eq!(stats.score_distribution["below-0.5"], 1);
        assert_eq!(stats.unique_subjects, 2);
        assert_eq!(stats.unique_objectives, 3);
        assert_eq!(stats.top_matches[0].objective_id, "o1");
        assert_eq!(stats.top_matches[0].total_score, 0.95);
    }

    #[test]
    fn test_statistics_empty_matches() {
        let stats = MatchStatistics::from_records(&Vec::new());
        assert_eq!(stats.total_matches, 0);
        assert_eq!(stats.average_score, 0.0);
        assert!(stats.top_matches.is_empty());
        assert_eq!(stats.score_distribution.len(), 6);
    }

    #[test]
    fn test_top_matches_capped() {
        let records: Vec<MatchRecord> = (0..25)
            .map(|i| record(&format!("s{}", i), "o1", i as f64 / 25.0))
            .collect();
        let stats = MatchStatistics::from_records(&records);
        assert_eq!(stats.top_matches.len(), 10);
        assert_eq!(stats.top_matches[0].subject_id, "s24");
    }
}
