use thiserror::Error;

use super::model::{ThesisEvaluation, COMMITTEE_SIZE};

/// Shared passcode the committee is given before the defense.
///
/// This is a gate against accidental use, not a credential system.
pub const COMMITTEE_PASSCODE: &str = "tesis2024";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    LoggedOut,
    LoggedIn,
}

/// A single reason the login form was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginProblem {
    #[error("student name is required")]
    MissingStudentName,
    #[error("name of committee member {0} is required")]
    MissingProfessorName(usize),
    #[error("committee member {0} has not confirmed reading the thesis")]
    ThesisNotRead(usize),
    #[error("incorrect passcode")]
    WrongPasscode,
}

/// Login refused. Carries every unmet condition, not just the first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", format_problems(.problems))]
pub struct LoginError {
    pub problems: Vec<LoginProblem>,
}

fn format_problems(problems: &[LoginProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check the login form. Returns all problems at once.
pub fn validate_login(evaluation: &ThesisEvaluation, passcode: &str) -> Result<(), LoginError> {
    let mut problems = Vec::new();

    if evaluation.student_name.trim().is_empty() {
        problems.push(LoginProblem::MissingStudentName);
    }

    // Members are numbered from 1 in messages, matching the form
    for (i, professor) in evaluation.committee.iter().enumerate() {
        if professor.name.trim().is_empty() {
            problems.push(LoginProblem::MissingProfessorName(i + 1));
        }
    }
    for (i, professor) in evaluation.committee.iter().enumerate() {
        if !professor.has_read_thesis {
            problems.push(LoginProblem::ThesisNotRead(i + 1));
        }
    }

    if passcode != COMMITTEE_PASSCODE {
        problems.push(LoginProblem::WrongPasscode);
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(LoginError { problems })
    }
}

/// One committee's working session: login gate plus the evaluation being filled in.
#[derive(Debug, Clone)]
pub struct Session {
    state: SessionState,
    pub evaluation: ThesisEvaluation,
    pub passcode: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            state: SessionState::LoggedOut,
            evaluation: ThesisEvaluation::default(),
            passcode: String::new(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_logged_in(&self) -> bool {
        self.state == SessionState::LoggedIn
    }

    /// Attempt the `LoggedOut -> LoggedIn` transition.
    ///
    /// On failure the session stays logged out and the form is left as typed.
    pub fn login(&mut self) -> Result<(), LoginError> {
        if self.is_logged_in() {
            return Ok(());
        }
        validate_login(&self.evaluation, &self.passcode)?;
        self.state = SessionState::LoggedIn;
        tracing::info!(
            student = %self.evaluation.student_name.trim(),
            committee = COMMITTEE_SIZE,
            "committee logged in"
        );
        Ok(())
    }

    /// Start over with an empty form.
    pub fn logout(&mut self) {
        *self = Session::new();
        tracing::info!("session reset");
    }
}
