pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::output::ReportScope;
use crate::scoring::GradeLevel;

pub async fn run_tui(mut app: App) -> anyhow::Result<()> {
    // Buffer log output while TUI is active to prevent it corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(250);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => app.update_flash(),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    // Restore terminal
    ratatui::restore();

    // Flush buffered log lines now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if is_ctrl_c(&key) {
        app.should_quit = true;
        return;
    }

    if !app.session.is_logged_in() {
        handle_login_key(app, key);
        return;
    }

    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                // Quit
                KeyCode::Char('q') => app.should_quit = true,

                // Navigation
                KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                KeyCode::Char('k') | KeyCode::Up => app.previous_row(),

                // Grading
                KeyCode::Char('l') | KeyCode::Right => app.raise_grade(),
                KeyCode::Char('h') | KeyCode::Left => app.lower_grade(),
                KeyCode::Char(c @ '1'..='4') => {
                    let index = c as u8 - b'1';
                    match GradeLevel::try_from(index) {
                        Ok(grade) => app.set_selected_grade(grade),
                        Err(e) => app.show_flash(format!("Error: {}", e)),
                    }
                }
                KeyCode::Backspace | KeyCode::Delete | KeyCode::Char('x') => {
                    app.clear_selected_grade()
                }

                // Phase switching
                KeyCode::Tab | KeyCode::BackTab => app.toggle_phase(),

                KeyCode::Char('n') => app.start_notes_input(),
                KeyCode::Char('s') => app.show_summary(),
                KeyCode::Char('?') => app.show_help(),

                // Printing
                KeyCode::Char('p') => app.print(ReportScope::Phase(app.current_phase)),
                KeyCode::Char('P') => app.print(ReportScope::Full),

                KeyCode::Char('L') => app.logout(),

                _ => {}
            }
        }
        app::InputMode::NotesInput => {
            match key.code {
                KeyCode::Enter => app.confirm_notes_input(),
                KeyCode::Esc => app.cancel_notes_input(),
                KeyCode::Backspace => {
                    app.notes_input.pop();
                }
                KeyCode::Char(c) => app.notes_input.push(c),
                // Ignore all other keys (don't propagate to Normal mode)
                _ => {}
            }
        }
        app::InputMode::Summary => match key.code {
            KeyCode::Esc | KeyCode::Char('s') | KeyCode::Char('q') => app.dismiss_summary(),
            KeyCode::Char('p') => app.print(ReportScope::Full),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

fn handle_login_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab | KeyCode::Down => app.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.focus_previous(),
        KeyCode::Enter => app.submit_login(),
        KeyCode::Backspace => app.login_backspace(),
        KeyCode::Char(c) => app.login_type(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::scoring::CriterionKind;
    use crate::session::{Phase, COMMITTEE_PASSCODE};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key_event(app, key(KeyCode::Char(c)));
        }
    }

    fn logged_in_app() -> App {
        let mut app = App::new(Config::default(), ThemeColors::dark());
        type_text(&mut app, "Ana Torres");
        for name in ["Dr. Ruiz", "Dra. Paz", "Dr. Soto"] {
            handle_key_event(&mut app, key(KeyCode::Tab));
            type_text(&mut app, name);
            handle_key_event(&mut app, key(KeyCode::Tab));
            handle_key_event(&mut app, key(KeyCode::Char(' ')));
        }
        handle_key_event(&mut app, key(KeyCode::Tab));
        type_text(&mut app, COMMITTEE_PASSCODE);
        handle_key_event(&mut app, key(KeyCode::Enter));
        app
    }

    #[test]
    fn test_keyboard_login() {
        let app = logged_in_app();
        assert!(app.session.is_logged_in());
        assert_eq!(app.session.evaluation.committee[2].name, "Dr. Soto");
    }

    #[test]
    fn test_q_is_text_on_login_screen() {
        let mut app = App::new(Config::default(), ThemeColors::dark());
        handle_key_event(&mut app, key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        assert_eq!(app.session.evaluation.student_name, "q");
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn test_login_blocked_without_confirmations() {
        let mut app = App::new(Config::default(), ThemeColors::dark());
        type_text(&mut app, "Ana");
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert!(!app.session.is_logged_in());
        assert!(!app.login_errors.is_empty());
    }

    #[test]
    fn test_number_keys_grade_rows() {
        let mut app = logged_in_app();
        type_text(&mut app, "3");
        handle_key_event(&mut app, key(KeyCode::Down));
        type_text(&mut app, "4");
        handle_key_event(&mut app, key(KeyCode::Down));
        type_text(&mut app, "2");

        let first = app.session.evaluation.phase(Phase::First).unwrap();
        assert_eq!(first.grade(CriterionKind::Presentation), Some(GradeLevel::Good));
        assert_eq!(first.grade(CriterionKind::Research), Some(GradeLevel::Excellent));
        assert_eq!(first.grade(CriterionKind::Project), Some(GradeLevel::Sufficient));
        assert_eq!(
            crate::scoring::score_phase(first).unwrap().score.value(),
            81.0
        );
    }

    #[test]
    fn test_tab_switches_phase() {
        let mut app = logged_in_app();
        handle_key_event(&mut app, key(KeyCode::Tab));
        assert_eq!(app.current_phase, Phase::Second);
        type_text(&mut app, "1");
        assert_eq!(
            app.session.evaluation.grade(Phase::Second, CriterionKind::Presentation),
            Some(GradeLevel::Insufficient)
        );
    }

    #[test]
    fn test_notes_mode_captures_keys() {
        let mut app = logged_in_app();
        handle_key_event(&mut app, key(KeyCode::Char('n')));
        type_text(&mut app, "q4");
        assert!(!app.should_quit);
        handle_key_event(&mut app, key(KeyCode::Enter));
        assert_eq!(app.session.evaluation.notes(Phase::First), "q4");
        assert_eq!(app.session.evaluation.grade(Phase::First, CriterionKind::Presentation), None);
    }

    #[test]
    fn test_help_dismissed_by_any_key() {
        let mut app = logged_in_app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert_eq!(app.input_mode, app::InputMode::Help);
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.input_mode, app::InputMode::Normal);
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let mut app = App::new(Config::default(), ThemeColors::dark());
        handle_key_event(&mut app, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
