use crate::models::CareerStage;
use std::collections::BTreeSet;

/// Fit when the subject's stage is eligible, or no restriction applies
pub const DIRECT_FIT: f64 = 1.0;
/// Fit when an eligible stage is adjacent to the subject's stage
pub const ADJACENT_FIT: f64 = 0.7;
/// Fit when nothing lines up
pub const NO_FIT: f64 = 0.0;

const N: usize = CareerStage::ALL.len();

/// Stage adjacency lookup, indexed by (subject stage, eligible stage)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageAdjacency {
    table: [[bool; N]; N],
}

impl StageAdjacency {
    /// Table with no adjacencies at all
    pub fn empty() -> Self {
        Self { table: [[false; N]; N] }
    }

    /// Build a table from (subject stage, compatible stages) rows
    pub fn from_rows<I, J>(rows: I) -> Self
    where
        I: IntoIterator<Item = (CareerStage, J)>,
        J: IntoIterator<Item = CareerStage>,
    {
        let mut adjacency = Self::empty();
        for (stage, compatible) in rows {
            for other in compatible {
                adjacency.table[stage.index()][other.index()] = true;
            }
        }
        adjacency
    }

    #[inline]
    pub fn is_adjacent(&self, subject: CareerStage, eligible: CareerStage) -> bool {
        self.table[subject.index()][eligible.index()]
    }
}

impl Default for StageAdjacency {
    fn default() -> Self {
        use CareerStage::*;

        Self::from_rows([
            (GraduateStudent, vec![GraduateStudent, Postdoc]),
            (Postdoc, vec![Postdoc, AssistantProfessor]),
            (AssistantProfessor, vec![AssistantProfessor, AssociateProfessor]),
            (AssociateProfessor, vec![AssistantProfessor, AssociateProfessor, FullProfessor]),
            (FullProfessor, vec![AssociateProfessor, FullProfessor, Emeritus]),
            (Emeritus, vec![FullProfessor, Emeritus]),
            (ResearchScientist, vec![ResearchScientist, AssistantProfessor, AssociateProfessor]),
            (Other, CareerStage::ALL.to_vec()),
        ])
    }
}

/// Career stage fit between a subject's stage and an objective's eligible stages
pub fn career_stage_score(
    subject_stage: CareerStage,
    eligible_stages: &BTreeSet<CareerStage>,
    adjacency: &StageAdjacency,
) -> f64 {
    if eligible_stages.is_empty() || eligible_stages.contains(&subject_stage) {
        return DIRECT_FIT;
    }

    if eligible_stages
        .iter()
        .any(|eligible| adjacency.is_adjacent(subject_stage, *eligible))
    {
        ADJACENT_FIT
    } else {
        NO_FIT
    }
}
