pub mod gate;
pub mod model;

pub use gate::{validate_login, LoginError, LoginProblem, Session, SessionState, COMMITTEE_PASSCODE};
pub use model::{
    parse_grade_list, GradeListError, Phase, PhaseAssessment, Professor, ThesisEvaluation,
    COMMITTEE_SIZE,
};
