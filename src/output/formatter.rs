use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::scoring::{CriterionKind, GradeLevel, Score, APPROVAL_THRESHOLD, FIRST_PHASE_WEIGHT};
use crate::session::{Phase, ThesisEvaluation};

use super::summary::{EvaluationSummary, PhaseSummary};

pub const APPROVED_TEXT: &str =
    "The student has earned the right to proceed to the private thesis presentation.";
pub const NOT_APPROVED_TEXT: &str =
    "The student has not reached the minimum required score (80%) to proceed to the private presentation.";

/// Check whether stdout is a terminal (pipes get plain text)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Format a score for display with two decimals ("81.00%").
/// An undefined score renders as "--", never as zero.
pub fn format_score(score: Option<Score>) -> String {
    match score {
        Some(s) => s.to_string(),
        None => "--".to_string(),
    }
}

/// Narrative shown under a score.
pub fn verdict_narrative(score: Score, partial: bool) -> String {
    if partial {
        format!(
            "This is a partial result. The final grade is calculated after the second presentation, \
             where this first score counts for {:.0}% of the final grade.",
            FIRST_PHASE_WEIGHT * 100.0
        )
    } else if score.is_approved() {
        APPROVED_TEXT.to_string()
    } else {
        NOT_APPROVED_TEXT.to_string()
    }
}

/// Text progress bar toward approval, with a `|` marker at the threshold.
///
/// `width` is the number of cells representing 0-100%.
pub fn progress_bar(score: f64, width: usize) -> String {
    let ratio = (score / 100.0).clamp(0.0, 1.0);
    let filled = (ratio * width as f64).round() as usize;
    let marker = ((APPROVAL_THRESHOLD / 100.0) * width as f64).round() as usize;

    (0..width)
        .map(|i| {
            if i == marker {
                '|'
            } else if i < filled {
                '█'
            } else {
                '░'
            }
        })
        .collect()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
pub fn truncate_text(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Column header for a grade option, e.g. "Good (80%)"
pub fn grade_header(grade: GradeLevel) -> String {
    format!("{} ({}%)", grade.label(), grade.percentage())
}

/// Row label for a criterion, e.g. "Research (30%)"
pub fn criterion_label(criterion: CriterionKind) -> String {
    format!("{} ({}%)", criterion.label(), criterion.weight_percent())
}

/// Per-criterion lines for one phase: grade, weight and contribution.
pub fn format_phase_table(summary: &PhaseSummary, evaluation: &ThesisEvaluation, use_colors: bool) -> String {
    let mut lines = vec![if use_colors {
        summary.phase.label().bold().to_string()
    } else {
        summary.phase.label().to_string()
    }];

    for criterion in CriterionKind::ALL {
        let grade = evaluation.grade(summary.phase, criterion);
        let contribution = summary
            .breakdown
            .iter()
            .find(|c| c.criterion == criterion)
            .map(|c| format!("{:>6.2}", c.contribution))
            .unwrap_or_else(|| format!("{:>6}", "--"));
        let grade_text = grade
            .map(grade_header)
            .unwrap_or_else(|| "(not graded)".to_string());

        lines.push(format!(
            "  {:<20} {:<18} {}",
            criterion_label(criterion),
            grade_text,
            contribution
        ));
    }

    let score_text = format_score(summary.score);
    if use_colors {
        let colored = match summary.score {
            Some(s) if s.is_approved() => score_text.green().bold().to_string(),
            Some(_) => score_text.yellow().bold().to_string(),
            None => score_text.dimmed().to_string(),
        };
        lines.push(format!("  {:<20} {}", "Score", colored));
    } else {
        lines.push(format!("  {:<20} {}", "Score", score_text));
    }

    if !summary.notes.trim().is_empty() {
        let notes = match get_terminal_width() {
            Some(width) if width > 20 => truncate_text(summary.notes.trim(), width - 10),
            _ => summary.notes.trim().to_string(),
        };
        lines.push(format!("  Notes: {}", notes));
    }

    lines.join("\n")
}

/// Full plain-text summary of an evaluation.
pub fn format_summary(evaluation: &ThesisEvaluation, use_colors: bool) -> String {
    let summary = EvaluationSummary::from_evaluation(evaluation);
    let mut sections = Vec::new();

    let student = if summary.student_name.is_empty() {
        "(unnamed)"
    } else {
        summary.student_name
    };
    sections.push(format!("Student: {}", student));

    let roster: Vec<String> = summary
        .committee
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let read = if p.has_read_thesis { "read thesis" } else { "NOT confirmed" };
            format!("  {}. {} ({})", i + 1, p.name.trim(), read)
        })
        .collect();
    sections.push(format!("Committee:\n{}", roster.join("\n")));

    for phase in [Phase::First, Phase::Second] {
        sections.push(format_phase_table(summary.phase(phase), evaluation, use_colors));
    }

    sections.push(format_headline(&summary));

    sections.join("\n\n")
}

/// Headline score (final, or partial after the first phase) with bar and verdict.
pub fn format_headline(summary: &EvaluationSummary) -> String {
    match summary.headline() {
        Some((score, partial)) => {
            let label = if partial { "Partial score" } else { "Final score" };
            format!(
                "{}: {}\n{} {}\n{}",
                label,
                score,
                progress_bar(score.value(), 40),
                score.verdict().label(),
                verdict_narrative(score, partial)
            )
        }
        None => "Final score: -- (grade every criterion to see a score)".to_string(),
    }
}
