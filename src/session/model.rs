use serde::Serialize;
use thiserror::Error;

use crate::scoring::{CriterionKind, GradeError, GradeLevel};

/// Number of committee members on every defense.
pub const COMMITTEE_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    First,
    Second,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::First => "First presentation",
            Phase::Second => "Second presentation",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Phase::First => Phase::Second,
            Phase::Second => Phase::First,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Professor {
    pub name: String,
    pub has_read_thesis: bool,
}

/// Grades for one presentation phase. Any criterion may still be ungraded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PhaseAssessment {
    grades: [Option<GradeLevel>; 3],
    pub notes: String,
}

impl PhaseAssessment {
    pub fn grade(&self, criterion: CriterionKind) -> Option<GradeLevel> {
        self.grades[criterion.index()]
    }

    pub fn set_grade(&mut self, criterion: CriterionKind, grade: GradeLevel) {
        self.grades[criterion.index()] = Some(grade);
    }

    pub fn clear_grade(&mut self, criterion: CriterionKind) {
        self.grades[criterion.index()] = None;
    }

    /// Complete when every criterion has a grade; notes are optional.
    pub fn is_complete(&self) -> bool {
        self.grades.iter().all(Option::is_some)
    }

    pub fn graded_count(&self) -> usize {
        self.grades.iter().filter(|g| g.is_some()).count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GradeListError {
    #[error("expected 3 comma-separated grades (presentation,research,project), got {0}")]
    WrongCount(usize),
    #[error(transparent)]
    Grade(#[from] GradeError),
}

/// Parse grades in criterion order, e.g. "good,excellent,sufficient".
///
/// A blank entry leaves that criterion ungraded ("good,,excellent").
pub fn parse_grade_list(list: &str) -> Result<PhaseAssessment, GradeListError> {
    let parts: Vec<&str> = list.split(',').collect();
    if parts.len() != CriterionKind::ALL.len() {
        return Err(GradeListError::WrongCount(parts.len()));
    }

    let mut assessment = PhaseAssessment::default();
    for (criterion, part) in CriterionKind::ALL.into_iter().zip(parts) {
        if part.trim().is_empty() {
            continue;
        }
        assessment.set_grade(criterion, part.parse()?);
    }
    Ok(assessment)
}

/// Everything the committee enters during one defense.
///
/// Scores are not stored here; they are derived from the grades on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThesisEvaluation {
    pub student_name: String,
    pub committee: [Professor; COMMITTEE_SIZE],
    pub first: PhaseAssessment,
    pub second: Option<PhaseAssessment>,
}

impl ThesisEvaluation {
    pub fn phase(&self, phase: Phase) -> Option<&PhaseAssessment> {
        match phase {
            Phase::First => Some(&self.first),
            Phase::Second => self.second.as_ref(),
        }
    }

    fn phase_mut(&mut self, phase: Phase) -> &mut PhaseAssessment {
        match phase {
            Phase::First => &mut self.first,
            Phase::Second => self.second.get_or_insert_with(PhaseAssessment::default),
        }
    }

    pub fn set_student_name(&mut self, name: impl Into<String>) {
        self.student_name = name.into();
    }

    /// Replace one committee member's name. Out-of-range indices are ignored.
    pub fn set_professor_name(&mut self, index: usize, name: impl Into<String>) {
        if let Some(professor) = self.committee.get_mut(index) {
            professor.name = name.into();
        }
    }

    pub fn set_has_read_thesis(&mut self, index: usize, has_read: bool) {
        if let Some(professor) = self.committee.get_mut(index) {
            professor.has_read_thesis = has_read;
        }
    }

    pub fn set_grade(&mut self, phase: Phase, criterion: CriterionKind, grade: GradeLevel) {
        self.phase_mut(phase).set_grade(criterion, grade);
    }

    pub fn clear_grade(&mut self, phase: Phase, criterion: CriterionKind) {
        // Clearing never needs to create an empty second phase
        match phase {
            Phase::First => self.first.clear_grade(criterion),
            Phase::Second => {
                if let Some(second) = self.second.as_mut() {
                    second.clear_grade(criterion);
                }
            }
        }
    }

    pub fn set_notes(&mut self, phase: Phase, notes: impl Into<String>) {
        self.phase_mut(phase).notes = notes.into();
    }

    pub fn grade(&self, phase: Phase, criterion: CriterionKind) -> Option<GradeLevel> {
        self.phase(phase).and_then(|p| p.grade(criterion))
    }

    pub fn notes(&self, phase: Phase) -> &str {
        self.phase(phase).map(|p| p.notes.as_str()).unwrap_or("")
    }

    pub fn is_phase_complete(&self, phase: Phase) -> bool {
        self.phase(phase).is_some_and(PhaseAssessment::is_complete)
    }
}
