use crate::models::{Objective, Publication, Subject};
use std::collections::HashSet;

/// Words dropped before overlap is measured
const STOP_WORDS: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is", "are",
    "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "can", "a", "an", "this", "that",
    "these", "those",
];

/// Tokens must be longer than this many characters
const MIN_TOKEN_CHARS: usize = 2;

const KEYWORD_WEIGHT: f64 = 0.7;
const PUBLICATION_WEIGHT: f64 = 0.3;

const RECENCY_DECAY_PER_YEAR: f64 = 0.1;
const RECENCY_FLOOR: f64 = 0.5;
const CITATION_BOOST_PER_CITATION: f64 = 0.01;
const CITATION_BOOST_CAP: f64 = 2.0;

/// Lowercase and drop every character that is not a word character or whitespace
pub fn normalize_text(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect()
}

/// Significant words of a phrase, in order of appearance
pub fn extract_keywords(text: &str) -> Vec<String> {
    normalize_text(text)
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_TOKEN_CHARS && !STOP_WORDS.contains(word))
        .map(str::to_string)
        .collect()
}

/// Union of the keywords of every phrase
pub fn token_set<I, S>(phrases: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    phrases
        .into_iter()
        .flat_map(|phrase| extract_keywords(phrase.as_ref()))
        .collect()
}

/// |A ∩ B| / |A ∪ B|, 0.0 when either side is empty
#[inline]
pub fn jaccard_similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;

    intersection as f64 / union as f64
}

/// Jaccard overlap between two phrase lists after tokenization
pub fn keyword_overlap<A, B>(interests: &[A], areas: &[B]) -> f64
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    jaccard_similarity(&token_set(interests), &token_set(areas))
}

/// Tokens of an objective's research areas and keywords
pub fn objective_token_set(objective: &Objective) -> HashSet<String> {
    token_set(
        objective
            .research_areas
            .iter()
            .chain(objective.keywords.iter()),
    )
}

/// Precomputed tokens for a single publication
#[derive(Debug, Clone)]
pub struct PublicationTokens {
    pub tokens: HashSet<String>,
    pub year: i32,
    pub citations: u64,
}

impl PublicationTokens {
    pub fn from_publication(publication: &Publication) -> Self {
        let mut tokens = token_set(std::iter::once(publication.title.as_str()));
        tokens.extend(token_set(&publication.keywords));

        Self {
            tokens,
            year: publication.year,
            citations: publication.citations(),
        }
    }
}

/// Precomputed tokens for a subject
///
/// Built once per subject per batch so the cross product only pays for set
/// intersections.
#[derive(Debug, Clone)]
pub struct SubjectTokens {
    pub interests: HashSet<String>,
    pub publications: Vec<PublicationTokens>,
}

impl SubjectTokens {
    pub fn from_subject(subject: &Subject) -> Self {
        Self {
            interests: token_set(&subject.research_interests),
            publications: subject
                .publications
                .iter()
                .map(PublicationTokens::from_publication)
                .collect(),
        }
    }
}

/// Linear decay per year of age, floored at 0.5
#[inline]
fn recency_weight(year: i32, current_year: i32) -> f64 {
    let age = (i64::from(current_year) - i64::from(year)) as f64;
    (1.0 - age * RECENCY_DECAY_PER_YEAR).clamp(RECENCY_FLOOR, 1.0)
}

/// Multiplicative citation boost, capped at 2.0
#[inline]
fn citation_weight(citations: u64) -> f64 {
    (1.0 + citations as f64 * CITATION_BOOST_PER_CITATION).min(CITATION_BOOST_CAP)
}

/// Average recency- and citation-weighted overlap of publications with the objective
///
/// Publications that yield no tokens are not counted.
pub fn publication_relevance(
    publications: &[PublicationTokens],
    objective_tokens: &HashSet<String>,
    current_year: i32,
) -> f64 {
    if publications.is_empty() || objective_tokens.is_empty() {
        return 0.0;
    }

    let scores: Vec<f64> = publications
        .iter()
        .filter(|publication| !publication.tokens.is_empty())
        .map(|publication| {
            jaccard_similarity(&publication.tokens, objective_tokens)
                * recency_weight(publication.year, current_year)
                * citation_weight(publication.citations)
        })
        .collect();

    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Research alignment: 0.7 keyword overlap + 0.3 publication relevance, clipped to [0, 1]
pub fn research_alignment(
    subject: &SubjectTokens,
    objective_tokens: &HashSet<String>,
    current_year: i32,
) -> f64 {
    let keyword_score = jaccard_similarity(&subject.interests, objective_tokens);
    let publication_score =
        publication_relevance(&subject.publications, objective_tokens, current_year);

    (keyword_score * KEYWORD_WEIGHT + publication_score * PUBLICATION_WEIGHT).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("Machine Learning!"), "machine learning");
        assert_eq!(normalize_text("AI & ML"), "ai  ml");
        assert_eq!(normalize_text("  Deep-Learning  "), "deeplearning");
    }

    #[test]
    fn test_extract_keywords() {
        let keywords = extract_keywords("Machine learning for healthcare applications");
        assert_eq!(keywords, vec!["machine", "learning", "healthcare", "applications"]);

        // Short words and stop words are dropped
        assert_eq!(extract_keywords("AI in the lab"), vec!["lab"]);
    }

    #[test]
    fn test_jaccard_identical_and_empty() {
        let a = set(&["genomics", "cancer"]);
        assert_eq!(jaccard_similarity(&a, &a), 1.0);
        assert_eq!(jaccard_similarity(&a, &HashSet::new()), 0.0);
        assert_eq!(jaccard_similarity(&HashSet::new(), &HashSet::new()), 0.0);
    }

    #[test]
    fn test_keyword_overlap() {
        let overlap = keyword_overlap(
            &["machine learning", "artificial intelligence", "healthcare"],
            &["machine learning", "medical AI", "healthcare informatics"],
        );
        // {machine, learning, healthcare} of 7 distinct tokens
        assert!((overlap - 3.0 / 7.0).abs() < 1e-12);

        let none = keyword_overlap(
            &["theoretical physics", "quantum mechanics"],
            &["biology", "genetics", "medical research"],
        );
        assert_eq!(none, 0.0);

        let empty: [&str; 0] = [];
        assert_eq!(keyword_overlap(&empty, &["ai", "ml"]), 0.0);
        assert_eq!(keyword_overlap(&["ai"], &["ai"]), 0.0);
    }

    #[test]
    fn test_recency_and_citation_weights() {
        assert_eq!(recency_weight(2024, 2024), 1.0);
        assert!((recency_weight(2022, 2024) - 0.8).abs() < 1e-12);
        assert_eq!(recency_weight(2014, 2024), 0.5);
        assert_eq!(recency_weight(1990, 2024), 0.5);
        assert_eq!(recency_weight(2025, 2024), 1.0);

        // Extreme years stay within the weight range
        assert_eq!(recency_weight(i32::MIN, 2024), 0.5);
        assert_eq!(recency_weight(i32::MAX, 2024), 1.0);
        assert_eq!(recency_weight(2024, i32::MAX), 0.5);

        assert_eq!(citation_weight(0), 1.0);
        assert!((citation_weight(50) - 1.5).abs() < 1e-12);
        assert_eq!(citation_weight(10_000), 2.0);
    }

    #[test]
    fn test_publication_relevance() {
        let publications = vec![
            PublicationTokens::from_publication(&Publication {
                title: "Machine Learning for Medical Diagnosis".to_string(),
                keywords: vec!["machine learning".to_string(), "AI".to_string()],
                year: 2024,
                citation_count: Some(50),
            }),
            PublicationTokens::from_publication(&Publication {
                title: "Quantum Computing Applications".to_string(),
                keywords: vec![],
                year: 2020,
                citation_count: None,
            }),
        ];
        let objective = set(&["machine", "learning", "healthcare"]);

        let relevance = publication_relevance(&publications, &objective, 2024);
        assert!(relevance > 0.0 && relevance <= 1.0);

        // First publication: 2/5 overlap * 1.0 recency * 1.5 citations, second contributes 0
        assert!((relevance - (0.4 * 1.5) / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_publication_without_tokens_is_skipped() {
        let publications = vec![PublicationTokens::from_publication(&Publication {
            title: "On It".to_string(),
            keywords: vec![],
            year: 2024,
            citation_count: None,
        })];
        assert_eq!(publication_relevance(&publications, &set(&["genomics"]), 2024), 0.0);
    }

    #[test]
    fn test_research_alignment_bounds() {
        let subject = SubjectTokens {
            interests: set(&["genomics"]),
            publications: vec![PublicationTokens {
                tokens: set(&["genomics"]),
                year: 2024,
                citations: 1_000,
            }],
        };
        // 0.7 * 1.0 + 0.3 * 2.0 exceeds 1.0 before clipping
        assert_eq!(research_alignment(&subject, &set(&["genomics"]), 2024), 1.0);
        assert_eq!(research_alignment(&subject, &HashSet::new(), 2024), 0.0);
    }
}
