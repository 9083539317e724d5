use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Career stage of a researcher
///
/// Closed enumeration shared by subjects, objectives and the compatibility tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareerStage {
    GraduateStudent,
    Postdoc,
    AssistantProfessor,
    AssociateProfessor,
    FullProfessor,
    Emeritus,
    ResearchScientist,
    Other,
}

impl CareerStage {
    pub const ALL: [CareerStage; 8] = [
        CareerStage::GraduateStudent,
        CareerStage::Postdoc,
        CareerStage::AssistantProfessor,
        CareerStage::AssociateProfessor,
        CareerStage::FullProfessor,
        CareerStage::Emeritus,
        CareerStage::ResearchScientist,
        CareerStage::Other,
    ];

    /// Row/column index into stage-indexed lookup tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CareerStage::GraduateStudent => "graduate_student",
            CareerStage::Postdoc => "postdoc",
            CareerStage::AssistantProfessor => "assistant_professor",
            CareerStage::AssociateProfessor => "associate_professor",
            CareerStage::FullProfessor => "full_professor",
            CareerStage::Emeritus => "emeritus",
            CareerStage::ResearchScientist => "research_scientist",
            CareerStage::Other => "other",
        }
    }
}

impl fmt::Display for CareerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Research methodology tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Methodology {
    Experimental,
    Computational,
    Theoretical,
    Observational,
    Clinical,
    Survey,
    Qualitative,
    MetaAnalysis,
    MixedMethods,
}

impl Methodology {
    pub const ALL: [Methodology; 9] = [
        Methodology::Experimental,
        Methodology::Computational,
        Methodology::Theoretical,
        Methodology::Observational,
        Methodology::Clinical,
        Methodology::Survey,
        Methodology::Qualitative,
        Methodology::MetaAnalysis,
        Methodology::MixedMethods,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Methodology::Experimental => "experimental",
            Methodology::Computational => "computational",
            Methodology::Theoretical => "theoretical",
            Methodology::Observational => "observational",
            Methodology::Clinical => "clinical",
            Methodology::Survey => "survey",
            Methodology::Qualitative => "qualitative",
            Methodology::MetaAnalysis => "meta_analysis",
            Methodology::MixedMethods => "mixed_methods",
        }
    }
}

impl fmt::Display for Methodology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Academic publication attached to a subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Publication {
    pub title: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[validate(range(min = 1000, max = 9999))]
    pub year: i32,
    #[serde(default)]
    pub citation_count: Option<u64>,
}

impl Publication {
    pub fn citations(&self) -> u64 {
        self.citation_count.unwrap_or(0)
    }
}

/// Researcher profile being matched (faculty member)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Subject {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub institution: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[validate(length(min = 1))]
    pub research_interests: Vec<String>,
    #[serde(default)]
    pub methodologies: BTreeSet<Methodology>,
    pub career_stage: CareerStage,
    #[serde(default)]
    #[validate(nested)]
    pub publications: Vec<Publication>,
    #[serde(default)]
    pub h_index: Option<u32>,
    #[serde(default)]
    pub total_citations: Option<u64>,
}

/// Funding opportunity matched against subjects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_award_range"))]
pub struct Objective {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub agency: Option<String>,
    #[validate(length(min = 1))]
    pub research_areas: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub preferred_methodologies: BTreeSet<Methodology>,
    /// Empty means no career stage restriction
    #[serde(default)]
    pub eligible_career_stages: BTreeSet<CareerStage>,
    pub deadline: NaiveDate,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub min_award_amount: Option<f64>,
    #[validate(range(min = 0.0))]
    #[serde(default)]
    pub max_award_amount: Option<f64>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String { "USD".to_string() }

fn validate_award_range(objective: &Objective) -> Result<(), ValidationError> {
    match (objective.min_award_amount, objective.max_award_amount) {
        (Some(min), Some(max)) if min > max => {
            Err(ValidationError::new("min_award_amount_exceeds_max_award_amount"))
        }
        _ => Ok(()),
    }
}

/// Component and total scores for one subject/objective pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub total_score: f64,
    pub research_alignment: f64,
    pub methodology_match: f64,
    pub career_stage_fit: f64,
    pub deadline_urgency: f64,
    pub budget_alignment: f64,
    pub scoring_algorithm: String,
    pub calculated_at: DateTime<Utc>,
}

/// Ranked match emitted by the selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: Uuid,
    pub subject_id: String,
    pub objective_id: String,
    pub score: MatchScore,
}

impl MatchRecord {
    pub fn new(subject_id: &str, objective_id: &str, score: MatchScore, run_at: DateTime<Utc>) -> Self {
        Self {
            match_id: Self::derive_id(subject_id, objective_id, run_at),
            subject_id: subject_id.to_string(),
            objective_id: objective_id.to_string(),
            score,
        }
    }

    /// Name-based UUID over (subject, objective, run timestamp)
    ///
    /// The same triple always yields the same identifier.
    pub fn derive_id(subject_id: &str, objective_id: &str, run_at: DateTime<Utc>) -> Uuid {
        let name = format!(
            "{}\u{1f}{}\u{1f}{}",
            subject_id,
            objective_id,
            run_at.to_rfc3339()
        );
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
    }
}

/// Scoring weights for the five component scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub research_alignment: f64,
    pub methodology_match: f64,
    pub career_stage_fit: f64,
    pub deadline_urgency: f64,
    pub budget_alignment: f64,
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.research_alignment
            + self.methodology_match
            + self.career_stage_fit
            + self.deadline_urgency
            + self.budget_alignment
    }

    pub fn as_array(&self) -> [(&'static str, f64); 5] {
        [
            ("research_alignment", self.research_alignment),
            ("methodology_match", self.methodology_match),
            ("career_stage_fit", self.career_stage_fit),
            ("deadline_urgency", self.deadline_urgency),
            ("budget_alignment", self.budget_alignment),
        ]
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            research_alignment: 0.35,
            methodology_match: 0.25,
            career_stage_fit: 0.20,
            deadline_urgency: 0.15,
            budget_alignment: 0.05,
        }
    }
}
