use crate::config::Config;
use crate::output::ReportScope;
use crate::scoring::{CriterionKind, GradeLevel};
use crate::session::{Phase, Session, COMMITTEE_SIZE};
use crate::tui::theme::ThemeColors;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    StudentName,
    ProfessorName(usize),
    Confirmation(usize),
    Passcode,
}

impl LoginField {
    /// Form order: student, then name + confirmation per member, then passcode
    pub const ORDER: [LoginField; 2 + 2 * COMMITTEE_SIZE] = [
        LoginField::StudentName,
        LoginField::ProfessorName(0),
        LoginField::Confirmation(0),
        LoginField::ProfessorName(1),
        LoginField::Confirmation(1),
        LoginField::ProfessorName(2),
        LoginField::Confirmation(2),
        LoginField::Passcode,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    pub fn is_text(self) -> bool {
        !matches!(self, LoginField::Confirmation(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputMode {
    Normal,
    NotesInput,
    Help,
    Summary,
}

pub struct App {
    pub session: Session,
    pub config: Config,
    pub theme: ThemeColors,
    pub login_focus: LoginField,
    pub login_errors: Vec<String>,
    pub current_phase: Phase,
    pub table_state: ratatui::widgets::TableState,
    pub input_mode: InputMode,
    pub notes_input: String,
    pub flash_message: Option<(String, Instant)>,
    pub should_quit: bool,
}

impl App {
    pub fn new(config: Config, theme: ThemeColors) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        table_state.select(Some(0));

        Self {
            session: Session::new(),
            config,
            theme,
            login_focus: LoginField::StudentName,
            login_errors: Vec::new(),
            current_phase: Phase::First,
            table_state,
            input_mode: InputMode::Normal,
            notes_input: String::new(),
            flash_message: None,
            should_quit: false,
        }
    }

    // --- login form ---

    pub fn focus_next(&mut self) {
        self.login_focus = self.login_focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.login_focus = self.login_focus.previous();
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        let evaluation = &mut self.session.evaluation;
        match self.login_focus {
            LoginField::StudentName => Some(&mut evaluation.student_name),
            LoginField::ProfessorName(i) => evaluation.committee.get_mut(i).map(|p| &mut p.name),
            LoginField::Passcode => Some(&mut self.session.passcode),
            LoginField::Confirmation(_) => None,
        }
    }

    /// Type a character into the focused field. Space toggles a confirmation.
    pub fn login_type(&mut self, c: char) {
        if let LoginField::Confirmation(i) = self.login_focus {
            if c == ' ' {
                self.toggle_confirmation(i);
            }
            return;
        }
        if let Some(text) = self.focused_text_mut() {
            text.push(c);
        }
    }

    pub fn login_backspace(&mut self) {
        if let Some(text) = self.focused_text_mut() {
            text.pop();
        }
    }

    pub fn toggle_confirmation(&mut self, index: usize) {
        let current = self
            .session
            .evaluation
            .committee
            .get(index)
            .is_some_and(|p| p.has_read_thesis);
        self.session.evaluation.set_has_read_thesis(index, !current);
    }

    pub fn submit_login(&mut self) {
        match self.session.login() {
            Ok(()) => {
                self.login_errors.clear();
                self.current_phase = Phase::First;
                self.table_state.select(Some(0));
                let student = self.session.evaluation.student_name.trim().to_string();
                self.show_flash(format!("Evaluating: {}", student));
            }
            Err(e) => {
                tracing::debug!(problems = e.problems.len(), "login refused");
                self.login_errors = e.problems.iter().map(ToString::to_string).collect();
                // Never keep a rejected passcode on screen
                self.session.passcode.clear();
            }
        }
    }

    // --- grading ---

    pub fn selected_criterion(&self) -> CriterionKind {
        let i = self.table_state.selected().unwrap_or(0);
        CriterionKind::ALL[i.min(CriterionKind::ALL.len() - 1)]
    }

    pub fn next_row(&mut self) {
        let len = CriterionKind::ALL.len();
        let i = match self.table_state.selected() {
            Some(i) if i < len - 1 => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = CriterionKind::ALL.len();
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn selected_grade(&self) -> Option<GradeLevel> {
        self.session
            .evaluation
            .grade(self.current_phase, self.selected_criterion())
    }

    pub fn set_selected_grade(&mut self, grade: GradeLevel) {
        let criterion = self.selected_criterion();
        self.session
            .evaluation
            .set_grade(self.current_phase, criterion, grade);
        tracing::debug!(phase = ?self.current_phase, %criterion, %grade, "grade set");
    }

    /// Move the selected grade one step up; an ungraded row starts at Insufficient
    pub fn raise_grade(&mut self) {
        let grade = self
            .selected_grade()
            .map(GradeLevel::raised)
            .unwrap_or(GradeLevel::Insufficient);
        self.set_selected_grade(grade);
    }

    /// Move the selected grade one step down; an ungraded row starts at Excellent
    pub fn lower_grade(&mut self) {
        let grade = self
            .selected_grade()
            .map(GradeLevel::lowered)
            .unwrap_or(GradeLevel::Excellent);
        self.set_selected_grade(grade);
    }

    pub fn clear_selected_grade(&mut self) {
        let criterion = self.selected_criterion();
        self.session
            .evaluation
            .clear_grade(self.current_phase, criterion);
    }

    /// Toggle between first and second presentation
    pub fn toggle_phase(&mut self) {
        self.current_phase = self.current_phase.other();
        self.table_state.select(Some(0));
    }

    // --- notes ---

    pub fn start_notes_input(&mut self) {
        self.notes_input = self.session.evaluation.notes(self.current_phase).to_string();
        self.input_mode = InputMode::NotesInput;
    }

    pub fn confirm_notes_input(&mut self) {
        let notes = std::mem::take(&mut self.notes_input);
        self.session.evaluation.set_notes(self.current_phase, notes);
        self.input_mode = InputMode::Normal;
        self.show_flash("Notes saved".to_string());
    }

    pub fn cancel_notes_input(&mut self) {
        self.notes_input.clear();
        self.input_mode = InputMode::Normal;
    }

    // --- overlays ---

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn show_summary(&mut self) {
        self.input_mode = InputMode::Summary;
    }

    pub fn dismiss_summary(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    // --- reports ---

    /// Write a printable report and open it for printing
    pub fn print(&mut self, scope: ReportScope) {
        let dir = self.config.report_dir();
        let result = crate::output::print_report(
            &self.session.evaluation,
            scope,
            self.config.institution.as_deref(),
            &dir,
        );
        match result {
            Ok(path) => self.show_flash(format!("Report opened: {}", path.display())),
            Err(e) => {
                tracing::warn!(error = %e, "report failed");
                self.show_flash(format!("Failed to print report: {}", e));
            }
        }
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.login_focus = LoginField::StudentName;
        self.login_errors.clear();
        self.current_phase = Phase::First;
        self.input_mode = InputMode::Normal;
        self.show_flash("Form cleared".to_string());
    }

    // --- status ---

    pub fn update_flash(&mut self) {
        let lifetime = self.flash_duration();
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed() >= lifetime {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    fn flash_duration(&self) -> Duration {
        self.config.flash_duration()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::COMMITTEE_PASSCODE;

    fn app() -> App {
        App::new(Config::default(), ThemeColors::dark())
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            app.login_type(c);
        }
    }

    fn fill_login(app: &mut App) {
        type_str(app, "Ana Torres");
        for name in ["Dr. Ruiz", "Dra. Paz", "Dr. Soto"] {
            app.focus_next();
            type_str(app, name);
            app.focus_next();
            app.login_type(' ');
        }
        app.focus_next();
        type_str(app, COMMITTEE_PASSCODE);
    }

    #[test]
    fn test_focus_cycles_through_form() {
        let mut app = app();
        for _ in 0..LoginField::ORDER.len() {
            app.focus_next();
        }
        assert_eq!(app.login_focus, LoginField::StudentName);
        app.focus_previous();
        assert_eq!(app.login_focus, LoginField::Passcode);
    }

    #[test]
    fn test_login_through_form() {
        let mut app = app();
        fill_login(&mut app);
        assert_eq!(app.login_focus, LoginField::Passcode);
        app.submit_login();
        assert!(app.session.is_logged_in());
        assert!(app.login_errors.is_empty());
    }

    #[test]
    fn test_failed_login_shows_errors_and_clears_passcode() {
        let mut app = app();
        fill_login(&mut app);
        app.login_backspace();
        app.submit_login();
        assert!(!app.session.is_logged_in());
        assert_eq!(app.login_errors, vec!["incorrect passcode".to_string()]);
        assert!(app.session.passcode.is_empty());
    }

    #[test]
    fn test_space_toggles_confirmation_only() {
        let mut app = app();
        app.focus_next();
        app.focus_next();
        assert_eq!(app.login_focus, LoginField::Confirmation(0));
        app.login_type('x');
        assert!(!app.session.evaluation.committee[0].has_read_thesis);
        app.login_type(' ');
        assert!(app.session.evaluation.committee[0].has_read_thesis);
        app.login_type(' ');
        assert!(!app.session.evaluation.committee[0].has_read_thesis);
    }

    #[test]
    fn test_grade_stepping() {
        let mut app = app();
        assert_eq!(app.selected_grade(), None);
        app.raise_grade();
        assert_eq!(app.selected_grade(), Some(GradeLevel::Insufficient));
        app.raise_grade();
        app.raise_grade();
        app.raise_grade();
        app.raise_grade();
        assert_eq!(app.selected_grade(), Some(GradeLevel::Excellent));
        app.clear_selected_grade();
        assert_eq!(app.selected_grade(), None);
        app.lower_grade();
        assert_eq!(app.selected_grade(), Some(GradeLevel::Excellent));
    }

    #[test]
    fn test_rows_wrap() {
        let mut app = app();
        assert_eq!(app.selected_criterion(), CriterionKind::Presentation);
        app.previous_row();
        assert_eq!(app.selected_criterion(), CriterionKind::Project);
        app.next_row();
        assert_eq!(app.selected_criterion(), CriterionKind::Presentation);
    }

    #[test]
    fn test_phase_toggle_keeps_grades_separate() {
        let mut app = app();
        app.set_selected_grade(GradeLevel::Good);
        app.toggle_phase();
        assert_eq!(app.current_phase, Phase::Second);
        assert_eq!(app.selected_grade(), None);
        app.toggle_phase();
        assert_eq!(app.selected_grade(), Some(GradeLevel::Good));
    }

    #[test]
    fn test_notes_edit_and_cancel() {
        let mut app = app();
        app.start_notes_input();
        app.notes_input.push_str("Good answers");
        app.confirm_notes_input();
        assert_eq!(app.session.evaluation.notes(Phase::First), "Good answers");

        app.start_notes_input();
        assert_eq!(app.notes_input, "Good answers");
        app.notes_input.push_str(" overall");
        app.cancel_notes_input();
        assert_eq!(app.session.evaluation.notes(Phase::First), "Good answers");
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_logout_returns_to_empty_form() {
        let mut app = app();
        fill_login(&mut app);
        app.submit_login();
        app.set_selected_grade(GradeLevel::Good);
        app.logout();
        assert!(!app.session.is_logged_in());
        assert_eq!(app.login_focus, LoginField::StudentName);
        assert_eq!(app.session.evaluation.grade(Phase::First, CriterionKind::Presentation), None);
    }
}
