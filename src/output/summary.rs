use serde::Serialize;

use crate::scoring::{final_score, score_phase, CriterionContribution, Score, Verdict};
use crate::session::{Phase, Professor, ThesisEvaluation};

/// Read-only view of an evaluation with every derived score filled in.
///
/// Built fresh from the evaluation each time it is needed.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationSummary<'a> {
    pub student_name: &'a str,
    pub committee: &'a [Professor],
    pub phases: Vec<PhaseSummary<'a>>,
    pub final_score: Option<Score>,
    pub final_verdict: Option<Verdict>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PhaseSummary<'a> {
    pub phase: Phase,
    pub complete: bool,
    pub score: Option<Score>,
    pub verdict: Option<Verdict>,
    pub breakdown: Vec<CriterionContribution>,
    pub notes: &'a str,
}

impl<'a> PhaseSummary<'a> {
    pub fn from_evaluation(evaluation: &'a ThesisEvaluation, phase: Phase) -> Self {
        let result = evaluation.phase(phase).and_then(score_phase);
        let score = result.as_ref().map(|r| r.score);
        Self {
            phase,
            complete: result.is_some(),
            score,
            verdict: score.map(Score::verdict),
            breakdown: result.map(|r| r.breakdown).unwrap_or_default(),
            notes: evaluation.notes(phase),
        }
    }
}

impl<'a> EvaluationSummary<'a> {
    pub fn from_evaluation(evaluation: &'a ThesisEvaluation) -> Self {
        let final_score = final_score(evaluation);
        Self {
            student_name: evaluation.student_name.trim(),
            committee: &evaluation.committee,
            phases: vec![
                PhaseSummary::from_evaluation(evaluation, Phase::First),
                PhaseSummary::from_evaluation(evaluation, Phase::Second),
            ],
            final_score,
            final_verdict: final_score.map(Score::verdict),
        }
    }

    pub fn phase(&self, phase: Phase) -> &PhaseSummary<'a> {
        match phase {
            Phase::First => &self.phases[0],
            Phase::Second => &self.phases[1],
        }
    }

    /// The score the verdict should be read from: the blended final score
    /// once available, otherwise the first phase alone (a partial result).
    pub fn headline(&self) -> Option<(Score, bool)> {
        match self.final_score {
            Some(score) => Some((score, false)),
            None => self.phase(Phase::First).score.map(|s| (s, true)),
        }
    }
}

pub fn to_json(evaluation: &ThesisEvaluation) -> anyhow::Result<String> {
    let summary = EvaluationSummary::from_evaluation(evaluation);
    Ok(serde_json::to_string_pretty(&summary)?)
}
