pub mod criteria;
pub mod engine;
pub mod grade;
pub mod verdict;

pub use criteria::CriterionKind;
pub use engine::{
    combine_final, final_score, score_phase, CriterionContribution, Score, ScoreResult,
    FIRST_PHASE_WEIGHT, SECOND_PHASE_WEIGHT,
};
pub use grade::{GradeError, GradeLevel};
pub use verdict::{Verdict, APPROVAL_THRESHOLD};
