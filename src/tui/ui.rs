use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use crate::output::{criterion_label, format_score, grade_header, verdict_narrative, EvaluationSummary};
use crate::scoring::{
    CriterionKind, GradeLevel, Score, APPROVAL_THRESHOLD, FIRST_PHASE_WEIGHT, SECOND_PHASE_WEIGHT,
};
use crate::session::{Phase, COMMITTEE_SIZE};
use crate::tui::app::{App, InputMode, LoginField};
use crate::tui::theme::ThemeColors;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 16 || area.width < 60 {
        let msg = Paragraph::new("Terminal too small")
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    if app.session.is_logged_in() {
        draw_evaluation(frame, area, app);
    } else {
        draw_login(frame, area, app);
    }
}

fn draw_login(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),  // Title bar
        Constraint::Fill(1),    // Form
        Constraint::Length(1),  // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app, "Thesis Evaluation - Committee Access");

    let form_area = centered_rect_fixed(64, 20, chunks[1]);
    let block = Block::bordered()
        .title(" Login ")
        .border_style(Style::default().fg(app.theme.popup_border));
    let inner = block.inner(form_area);
    frame.render_widget(block, form_area);

    let theme = &app.theme;
    let evaluation = &app.session.evaluation;
    let mut lines = Vec::new();

    lines.push(text_field_line(
        theme,
        "Student",
        &evaluation.student_name,
        app.login_focus == LoginField::StudentName,
    ));
    lines.push(Line::from(""));

    for i in 0..COMMITTEE_SIZE {
        let professor = &evaluation.committee[i];
        lines.push(text_field_line(
            theme,
            &format!("Professor {}", i + 1),
            &professor.name,
            app.login_focus == LoginField::ProfessorName(i),
        ));
        let mark = if professor.has_read_thesis { "[x]" } else { "[ ]" };
        let focused = app.login_focus == LoginField::Confirmation(i);
        let style = if focused { theme.field_focused } else { Style::default() };
        lines.push(Line::from(vec![
            Span::raw("              "),
            Span::styled(format!("{} has read the thesis", mark), style),
        ]));
    }
    lines.push(Line::from(""));

    let masked = "*".repeat(app.session.passcode.chars().count());
    lines.push(text_field_line(
        theme,
        "Passcode",
        &masked,
        app.login_focus == LoginField::Passcode,
    ));
    lines.push(Line::from(""));

    for error in &app.login_errors {
        lines.push(Line::from(Span::styled(
            format!("! {}", error),
            Style::default().fg(theme.flash_error),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);

    let hints = [
        ("Tab", ":next field "),
        ("Shift-Tab", ":previous "),
        ("Space", ":confirm reading "),
        ("Enter", ":log in "),
        ("Esc", ":quit"),
    ];
    render_status_bar(frame, chunks[2], app, &hints);
}

fn text_field_line(theme: &ThemeColors, label: &str, value: &str, focused: bool) -> Line<'static> {
    let cursor = if focused { "|" } else { "" };
    let label_style = if focused {
        theme.field_focused
    } else {
        Style::default().fg(theme.muted)
    };
    Line::from(vec![
        Span::styled(format!("{:<13} ", label), label_style),
        Span::raw(format!("{}{}", value, cursor)),
    ])
}

fn draw_evaluation(frame: &mut Frame, area: Rect, app: &mut App) {
    // Layout: Title(1) + Tabs(1) + Grade table(6) + Notes(3) + Results(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(6),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    let title = format!(
        "Thesis Evaluation - {}",
        app.session.evaluation.student_name.trim()
    );
    render_title(frame, chunks[0], app, &title);
    render_tabs(frame, chunks[1], app);
    render_grade_table(frame, chunks[2], app);
    render_notes(frame, chunks[3], app);
    render_results(frame, chunks[4], app);

    let hints = [
        ("j/k", ":row "),
        ("h/l", ":grade "),
        ("1-4", ":set "),
        ("Tab", ":phase "),
        ("n", ":notes "),
        ("s", ":summary "),
        ("p", ":print "),
        ("?", ":help "),
        ("q", ":quit"),
    ];
    render_status_bar(frame, chunks[5], app, &hints);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::NotesInput => render_notes_popup(frame, app),
        InputMode::Help => render_help_popup(frame, app),
        InputMode::Summary => render_summary_popup(frame, app),
        InputMode::Normal => {}
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App, text: &str) {
    let title = Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(app.theme.title_color).bold(),
    ));
    frame.render_widget(Paragraph::new(title), area);
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &App) {
    let evaluation = &app.session.evaluation;
    let titles: Vec<String> = [Phase::First, Phase::Second]
        .iter()
        .map(|phase| {
            let mark = if evaluation.is_phase_complete(*phase) { " ✓" } else { "" };
            format!("{}{}", phase.label(), mark)
        })
        .collect();
    let selected = match app.current_phase {
        Phase::First => 0,
        Phase::Second => 1,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive_style)
        .highlight_style(app.theme.tab_active_style)
        .divider(" | ");

    frame.render_widget(tabs, area);
}

fn render_grade_table(frame: &mut Frame, area: Rect, app: &mut App) {
    let theme = &app.theme;
    let phase = app.current_phase;
    let evaluation = &app.session.evaluation;

    let rows: Vec<Row> = CriterionKind::ALL
        .iter()
        .enumerate()
        .map(|(idx, criterion)| {
            let chosen = evaluation.grade(phase, *criterion);
            let mut cells = vec![Cell::from(criterion_label(*criterion))];
            for grade in GradeLevel::ALL {
                let cell = if chosen == Some(grade) {
                    Cell::from("(•)").style(theme.grade_selected)
                } else {
                    Cell::from("( )").style(Style::default().fg(theme.grade_empty))
                };
                cells.push(cell);
            }

            // Alternating row background (odd rows get subtle background)
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme.row_alt_bg)
            } else {
                Style::default()
            };
            Row::new(cells).style(row_style)
        })
        .collect();

    let mut header = vec!["Criterion".to_string()];
    header.extend(GradeLevel::ALL.iter().map(|g| grade_header(*g)));

    let widths = [
        Constraint::Length(20),
        Constraint::Length(18),
        Constraint::Length(16),
        Constraint::Length(11),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths)
        .header(Row::new(header).style(theme.header_style).bottom_margin(1))
        .row_highlight_style(theme.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_notes(frame: &mut Frame, area: Rect, app: &App) {
    let notes = app.session.evaluation.notes(app.current_phase);
    let text = if notes.is_empty() {
        Span::styled("(no notes - press n to add)", Style::default().fg(app.theme.muted))
    } else {
        Span::raw(notes.to_string())
    };
    let block = Block::bordered().title(" Notes ");
    frame.render_widget(Paragraph::new(Line::from(text)).block(block), area);
}

fn render_results(frame: &mut Frame, area: Rect, app: &App) {
    let evaluation = &app.session.evaluation;
    let summary = EvaluationSummary::from_evaluation(evaluation);
    let theme = &app.theme;
    let phase_summary = summary.phase(app.current_phase);

    let mut lines = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(format!("{} score: ", app.current_phase.label()), Style::default().bold()),
        score_span(theme, phase_summary.score),
    ]));
    if phase_summary.score.is_none() {
        let graded = evaluation
            .phase(app.current_phase)
            .map(|p| p.graded_count())
            .unwrap_or(0);
        lines.push(Line::from(Span::styled(
            format!("{}/{} criteria graded", graded, CriterionKind::ALL.len()),
            Style::default().fg(theme.muted),
        )));
    }

    let other = app.current_phase.other();
    lines.push(Line::from(vec![
        Span::styled(format!("{} score: ", other.label()), Style::default().fg(theme.muted)),
        score_span(theme, summary.phase(other).score),
    ]));
    lines.push(Line::from(vec![
        Span::styled(
            format!(
                "Final score ({:.0}/{:.0}): ",
                FIRST_PHASE_WEIGHT * 100.0,
                SECOND_PHASE_WEIGHT * 100.0
            ),
            Style::default().bold(),
        ),
        score_span(theme, summary.final_score),
    ]));
    lines.push(Line::from(""));

    if let Some((score, partial)) = summary.headline() {
        let bar_width = (area.width as usize).saturating_sub(10).min(50);
        lines.push(Line::from(Span::styled(
            "Progress toward approval",
            Style::default().bold(),
        )));
        lines.push(score_bar(theme, score, bar_width));
        lines.push(Line::from(""));
        let color = if partial {
            theme.not_approved
        } else {
            theme.verdict_color(score.is_approved())
        };
        lines.push(Line::from(Span::styled(
            verdict_narrative(score, partial),
            Style::default().fg(color),
        )));
    }

    let block = Block::bordered().title(" Results ");
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
        area,
    );
}

fn score_span(theme: &ThemeColors, score: Option<Score>) -> Span<'static> {
    match score {
        Some(s) => Span::styled(
            format_score(Some(s)),
            Style::default().fg(theme.verdict_color(s.is_approved())).bold(),
        ),
        None => Span::styled(format_score(None), Style::default().fg(theme.muted)),
    }
}

/// Horizontal bar 0-100% with a marker at the approval threshold
fn score_bar(theme: &ThemeColors, score: Score, width: usize) -> Line<'static> {
    let filled = ((score.value() / 100.0).clamp(0.0, 1.0) * width as f64).round() as usize;
    let marker = ((APPROVAL_THRESHOLD / 100.0) * width as f64).round() as usize;
    let bar_color = theme.verdict_color(score.is_approved());

    let mut spans = Vec::new();
    for i in 0..width {
        let span = if i == marker {
            Span::styled("|", Style::default().fg(theme.threshold_marker).bold())
        } else if i < filled {
            Span::styled("█", Style::default().fg(bar_color))
        } else {
            Span::styled("░", Style::default().fg(theme.bar_empty))
        };
        spans.push(span);
    }
    spans.push(Span::styled(
        format!(" {:.1}%", score.value()),
        Style::default().fg(bar_color).bold(),
    ));

    Line::from(spans)
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App, hints: &[(&str, &str)]) {
    let theme = &app.theme;
    let text = if let Some((ref msg, _)) = app.flash_message {
        // Show flash message with color based on message type
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Error") {
            theme.flash_error
        } else {
            theme.flash_success
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(key.to_string(), Style::default().fg(theme.status_key_color)));
            spans.push(Span::raw(label.to_string()));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme.status_bar_bg)),
        area
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the notes input popup
fn render_notes_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(60, 8, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(format!(" Notes - {} ", app.current_phase.label()))
        .title_style(app.theme.popup_title)
        .border_style(Style::default().fg(app.theme.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([
        Constraint::Fill(1),    // Input text
        Constraint::Length(1),  // Help text
    ])
    .split(inner);

    let input = Paragraph::new(format!("{}|", app.notes_input)).wrap(Wrap { trim: false });
    frame.render_widget(input, chunks[0]);

    let help = Paragraph::new("Enter: save | Esc: cancel")
        .style(Style::default().fg(app.theme.muted));
    frame.render_widget(help, chunks[1]);
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(52, 17, frame.area());

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Keyboard Shortcuts ")
        .title_style(app.theme.popup_title)
        .border_style(Style::default().fg(app.theme.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(app.theme.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Next criterion"),
        ("k / Up        ", "Previous criterion"),
        ("l / Right     ", "Raise grade"),
        ("h / Left      ", "Lower grade"),
        ("1 2 3 4       ", "Insufficient / Sufficient / Good / Excellent"),
        ("Backspace     ", "Clear grade"),
        ("Tab           ", "Switch presentation"),
        ("n             ", "Edit notes"),
        ("s             ", "Show summary"),
        ("p             ", "Print this presentation's report"),
        ("P             ", "Print final report"),
        ("L             ", "Log out and clear the form"),
        ("q / Ctrl-c    ", "Quit"),
    ];
    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

/// Render the printable summary as an overlay
fn render_summary_popup(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let popup_area = centered_rect_fixed(area.width.saturating_sub(8).min(90), area.height.saturating_sub(2), area);

    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(" Summary ")
        .title_style(app.theme.popup_title)
        .border_style(Style::default().fg(app.theme.popup_border));

    let text = crate::output::format_summary(&app.session.evaluation, false);
    let mut lines: Vec<Line> = text.lines().map(|l| Line::from(l.to_string())).collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "p: print | Esc/s: close",
        Style::default().fg(app.theme.muted),
    )));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        popup_area,
    );
}
