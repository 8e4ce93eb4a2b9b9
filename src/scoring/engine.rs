use serde::Serialize;
use std::fmt;

use super::criteria::CriterionKind;
use super::grade::GradeLevel;
use super::verdict::Verdict;
use crate::session::model::{PhaseAssessment, ThesisEvaluation};

/// Share of the final score taken by the first (preliminary) presentation.
pub const FIRST_PHASE_WEIGHT: f64 = 0.4;
/// Share of the final score taken by the second presentation.
pub const SECOND_PHASE_WEIGHT: f64 = 0.6;

// Integer counterparts of the phase weights, used for exact arithmetic
const FIRST_PHASE_PERCENT: f64 = 40.0;
const SECOND_PHASE_PERCENT: f64 = 60.0;

/// A percentage score in [40.0, 100.0].
///
/// The value is stored unrounded; `Display` renders two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Score(f64);

impl Score {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn verdict(self) -> Verdict {
        Verdict::for_score(self.0)
    }

    pub fn is_approved(self) -> bool {
        self.verdict().is_approved()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriterionContribution {
    pub criterion: CriterionKind,
    pub grade: GradeLevel,
    pub weight: f64,       // e.g. 0.20
    pub contribution: f64, // grade percentage x weight, e.g. 16.0
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    pub score: Score,
    pub breakdown: Vec<CriterionContribution>,
}

/// Score one presentation phase.
///
/// Returns `None` while any criterion is still ungraded: an incomplete phase
/// has no score, which is different from a score of zero.
pub fn score_phase(assessment: &PhaseAssessment) -> Option<ScoreResult> {
    let mut weighted_sum: u32 = 0;
    let mut breakdown = Vec::with_capacity(CriterionKind::ALL.len());

    for criterion in CriterionKind::ALL {
        let grade = assessment.grade(criterion)?;
        let product = grade.percentage() * criterion.weight_percent();
        weighted_sum += product;
        breakdown.push(CriterionContribution {
            criterion,
            grade,
            weight: criterion.weight(),
            contribution: product as f64 / 100.0,
        });
    }

    Some(ScoreResult {
        score: Score(weighted_sum as f64 / 100.0),
        breakdown,
    })
}

/// Blend two phase scores into the final score: 40% first, 60% second.
pub fn combine_final(first: Score, second: Score) -> Score {
    Score((first.0 * FIRST_PHASE_PERCENT + second.0 * SECOND_PHASE_PERCENT) / 100.0)
}

/// Final score of an evaluation, defined only once both phases are complete.
pub fn final_score(evaluation: &ThesisEvaluation) -> Option<Score> {
    let first = score_phase(&evaluation.first)?;
    let second = score_phase(evaluation.second.as_ref()?)?;
    Some(combine_final(first.score, second.score))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::model::Phase;

    const EPSILON: f64 = 1e-9;

    fn assessment(p: GradeLevel, r: GradeLevel, j: GradeLevel) -> PhaseAssessment {
        let mut a = PhaseAssessment::default();
        a.set_grade(CriterionKind::Presentation, p);
        a.set_grade(CriterionKind::Research, r);
        a.set_grade(CriterionKind::Project, j);
        a
    }

    fn all_complete_assessments() -> Vec<PhaseAssessment> {
        let mut out = Vec::new();
        for p in GradeLevel::ALL {
            for r in GradeLevel::ALL {
                for j in GradeLevel::ALL {
                    out.push(assessment(p, r, j));
                }
            }
        }
        out
    }

    fn score_of(a: &PhaseAssessment) -> f64 {
        score_phase(a).expect("complete assessment").score.value()
    }

    #[test]
    fn test_all_insufficient_is_forty() {
        let a = assessment(
            GradeLevel::Insufficient,
            GradeLevel::Insufficient,
            GradeLevel::Insufficient,
        );
        assert!((score_of(&a) - 40.0).abs() < EPSILON);
    }

    #[test]
    fn test_all_excellent_is_hundred() {
        let a = assessment(
            GradeLevel::Excellent,
            GradeLevel::Excellent,
            GradeLevel::Excellent,
        );
        assert!((score_of(&a) - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_mixed_grades() {
        // 80*0.20 + 100*0.30 + 70*0.50 = 16 + 30 + 35
        let a = assessment(GradeLevel::Good, GradeLevel::Excellent, GradeLevel::Sufficient);
        let result = score_phase(&a).unwrap();
        assert!((result.score.value() - 81.0).abs() < EPSILON);
        assert_eq!(result.score.verdict(), Verdict::Approved);

        let contributions: Vec<f64> = result.breakdown.iter().map(|c| c.contribution).collect();
        assert_eq!(contributions, vec![16.0, 30.0, 35.0]);
        assert_eq!(result.breakdown[2].criterion, CriterionKind::Project);
        assert_eq!(result.breakdown[2].grade, GradeLevel::Sufficient);
    }

    #[test]
    fn test_every_complete_assessment_in_range() {
        for a in all_complete_assessments() {
            let s = score_of(&a);
            assert!((40.0..=100.0).contains(&s), "score {} out of range", s);
        }
    }

    #[test]
    fn test_raising_one_grade_never_lowers_score() {
        for a in all_complete_assessments() {
            let base = score_of(&a);
            for criterion in CriterionKind::ALL {
                let mut raised = a.clone();
                let current = a.grade(criterion).unwrap();
                raised.set_grade(criterion, current.raised());
                assert!(score_of(&raised) >= base);
            }
        }
    }

    #[test]
    fn test_score_is_deterministic() {
        let a = assessment(GradeLevel::Good, GradeLevel::Sufficient, GradeLevel::Excellent);
        assert_eq!(score_phase(&a), score_phase(&a));
    }

    #[test]
    fn test_incomplete_assessment_has_no_score() {
        assert!(score_phase(&PhaseAssessment::default()).is_none());

        for missing in CriterionKind::ALL {
            let mut a = assessment(GradeLevel::Excellent, GradeLevel::Excellent, GradeLevel::Excellent);
            a.clear_grade(missing);
            assert!(score_phase(&a).is_none(), "{} missing should be undefined", missing);
        }
    }

    #[test]
    fn test_notes_do_not_affect_completeness() {
        let mut a = assessment(GradeLevel::Good, GradeLevel::Good, GradeLevel::Good);
        a.notes = String::new();
        assert!(score_phase(&a).is_some());
    }

    #[test]
    fn test_combine_final() {
        assert_eq!(combine_final(Score(80.0), Score(80.0)).value(), 80.0);
        assert!((combine_final(Score(40.0), Score(100.0)).value() - 76.0).abs() < EPSILON);
    }

    #[test]
    fn test_combined_eighty_is_approved() {
        let combined = combine_final(Score(80.0), Score(80.0));
        assert_eq!(combined.verdict(), Verdict::Approved);
    }

    #[test]
    fn test_combine_stays_in_range() {
        let scores: Vec<Score> = all_complete_assessments()
            .iter()
            .map(|a| score_phase(a).unwrap().score)
            .collect();
        for first in scores.iter().step_by(7) {
            for second in scores.iter().step_by(5) {
                let v = combine_final(*first, *second).value();
                assert!((40.0 - EPSILON..=100.0 + EPSILON).contains(&v));
            }
        }
    }

    #[test]
    fn test_final_score_uses_blend_not_either_phase() {
        let mut evaluation = ThesisEvaluation::default();
        for criterion in CriterionKind::ALL {
            evaluation.set_grade(Phase::First, criterion, GradeLevel::Sufficient);
            evaluation.set_grade(Phase::Second, criterion, GradeLevel::Good);
        }

        let score = final_score(&evaluation).unwrap();
        assert!((score.value() - 76.0).abs() < EPSILON);
        assert_eq!(score.verdict(), Verdict::NotApproved);
    }

    #[test]
    fn test_final_score_undefined_until_both_phases_complete() {
        let mut evaluation = ThesisEvaluation::default();
        for criterion in CriterionKind::ALL {
            evaluation.set_grade(Phase::First, criterion, GradeLevel::Excellent);
        }
        assert!(final_score(&evaluation).is_none());

        evaluation.set_grade(Phase::Second, CriterionKind::Presentation, GradeLevel::Excellent);
        assert!(final_score(&evaluation).is_none());

        evaluation.set_grade(Phase::Second, CriterionKind::Research, GradeLevel::Excellent);
        evaluation.set_grade(Phase::Second, CriterionKind::Project, GradeLevel::Excellent);
        assert_eq!(final_score(&evaluation).unwrap().value(), 100.0);
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Score(81.0).to_string(), "81.00%");
        assert_eq!(Score(76.5).to_string(), "76.50%");
    }
}
