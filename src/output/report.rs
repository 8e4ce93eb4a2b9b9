//! Printable report.
//!
//! Renders a self-contained HTML page that opens the viewer's print dialog
//! on load. The page is written atomically and handed to the host's default
//! viewer; printing (or saving as PDF) is left to that viewer.

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::scoring::CriterionKind;
use crate::session::{Phase, ThesisEvaluation};

use super::formatter::{criterion_label, format_score, grade_header, verdict_narrative};
use super::summary::{EvaluationSummary, PhaseSummary};

/// What a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportScope {
    Phase(Phase),
    Full,
}

impl ReportScope {
    fn title(self) -> &'static str {
        match self {
            ReportScope::Phase(Phase::First) => "First Presentation Report",
            ReportScope::Phase(Phase::Second) => "Second Presentation Report",
            ReportScope::Full => "Thesis Defense Evaluation",
        }
    }

    fn slug(self) -> &'static str {
        match self {
            ReportScope::Phase(Phase::First) => "phase1",
            ReportScope::Phase(Phase::Second) => "phase2",
            ReportScope::Full => "final",
        }
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Lowercase ASCII file-name fragment; everything else becomes '-'
fn file_slug(name: &str) -> String {
    let slug: String = name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "student".to_string()
    } else {
        slug
    }
}

const STYLE: &str = "body{font-family:sans-serif;max-width:800px;margin:40px auto;color:#111}\
h1{font-size:1.6em}h2{font-size:1.2em;margin-top:2em}\
table{border-collapse:collapse;width:100%}th,td{border:1px solid #999;padding:6px;text-align:left}\
th{background:#eee}.approved{color:#15803d}.not-approved{color:#b45309}\
.bar{position:relative;height:18px;background:#e5e7eb;border-radius:9px}\
.fill{height:100%;border-radius:9px}.mark{position:absolute;top:0;bottom:0;left:80%;width:2px;background:#dc2626}\
.notes{white-space:pre-wrap;border:1px solid #ccc;padding:8px}";

fn render_phase(out: &mut String, evaluation: &ThesisEvaluation, summary: &PhaseSummary) {
    let _ = writeln!(out, "<h2>{}</h2>", summary.phase.label());
    out.push_str("<table><tr><th>Criterion</th><th>Grade</th><th>Contribution</th></tr>\n");
    for criterion in CriterionKind::ALL {
        let grade = evaluation.grade(summary.phase, criterion);
        let contribution = summary
            .breakdown
            .iter()
            .find(|c| c.criterion == criterion)
            .map(|c| format!("{:.2}", c.contribution))
            .unwrap_or_else(|| "--".to_string());
        let _ = writeln!(
            out,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            criterion_label(criterion),
            grade.map(grade_header).unwrap_or_else(|| "Not graded".to_string()),
            contribution
        );
    }
    out.push_str("</table>\n");
    let _ = writeln!(out, "<p><strong>Score: {}</strong></p>", format_score(summary.score));
    if !summary.notes.trim().is_empty() {
        let _ = writeln!(
            out,
            "<h3>Notes</h3><div class=\"notes\">{}</div>",
            escape_html(summary.notes.trim())
        );
    }
}

/// Render the report page.
pub fn render_html(
    evaluation: &ThesisEvaluation,
    scope: ReportScope,
    institution: Option<&str>,
    generated_at: DateTime<Local>,
) -> String {
    let summary = EvaluationSummary::from_evaluation(evaluation);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head>",
        scope.title(),
        STYLE
    );
    out.push_str("<body onload=\"window.print()\">\n");
    if let Some(name) = institution {
        let _ = writeln!(out, "<p>{}</p>", escape_html(name));
    }
    let _ = writeln!(out, "<h1>{}</h1>", scope.title());
    let _ = writeln!(
        out,
        "<p><strong>Student:</strong> {}</p>",
        escape_html(summary.student_name)
    );

    out.push_str("<h2>Committee</h2><ol>\n");
    for professor in summary.committee {
        let read = if professor.has_read_thesis {
            "has read the thesis"
        } else {
            "reading not confirmed"
        };
        let _ = writeln!(out, "<li>{} ({})</li>", escape_html(professor.name.trim()), read);
    }
    out.push_str("</ol>\n");

    let phases: &[Phase] = match scope {
        ReportScope::Phase(Phase::First) => &[Phase::First],
        ReportScope::Phase(Phase::Second) => &[Phase::Second],
        ReportScope::Full => &[Phase::First, Phase::Second],
    };
    for phase in phases {
        render_phase(&mut out, evaluation, summary.phase(*phase));
    }

    // A first-phase report is always partial; others report the final blend
    let headline = match scope {
        ReportScope::Phase(Phase::First) => summary.phase(Phase::First).score.map(|s| (s, true)),
        _ => summary.final_score.map(|s| (s, false)),
    };
    match headline {
        Some((score, partial)) => {
            let (class, colour) = if score.is_approved() {
                ("approved", "#22c55e")
            } else {
                ("not-approved", "#f59e0b")
            };
            let label = if partial { "Partial score" } else { "Final score" };
            let _ = writeln!(
                out,
                "<h2>{}: <span class=\"{}\">{}</span></h2>",
                label, class, score
            );
            let _ = writeln!(
                out,
                "<div class=\"bar\"><div class=\"fill\" style=\"width:{:.2}%;background:{}\"></div><div class=\"mark\"></div></div>",
                score.value(),
                colour
            );
            let _ = writeln!(out, "<p>{}</p>", verdict_narrative(score, partial));
        }
        None => {
            out.push_str("<h2>Final score: --</h2><p>Not every criterion has been graded yet.</p>\n");
        }
    }

    let _ = writeln!(
        out,
        "<p><small>Generated {}</small></p>\n</body></html>",
        generated_at.format("%Y-%m-%d %H:%M")
    );
    out
}

/// Write the report into `dir` and return its path.
pub fn write_report(
    evaluation: &ThesisEvaluation,
    scope: ReportScope,
    institution: Option<&str>,
    dir: &Path,
) -> Result<PathBuf> {
    let now = Local::now();
    let file_name = format!(
        "thesis-{}-{}-{}.html",
        file_slug(&evaluation.student_name),
        scope.slug(),
        now.format("%Y%m%d-%H%M%S")
    );
    let path = dir.join(file_name);

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create report directory at {}", dir.display()))?;

    let mut file = AtomicWriteFile::open(&path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(render_html(evaluation, scope, institution, now).as_bytes())
        .context("Failed to write report")?;
    file.commit().context("Failed to save report")?;

    tracing::info!(path = %path.display(), "report written");
    Ok(path)
}

/// Write the report and open it in the host's default viewer for printing.
pub fn print_report(
    evaluation: &ThesisEvaluation,
    scope: ReportScope,
    institution: Option<&str>,
    dir: &Path,
) -> Result<PathBuf> {
    let path = write_report(evaluation, scope, institution, dir)?;
    crate::browser::open_path(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::GradeLevel;
    use std::env;

    fn sample_evaluation() -> ThesisEvaluation {
        let mut evaluation = ThesisEvaluation::default();
        evaluation.set_student_name("Ana <Torres>");
        for (i, name) in ["Dr. Ruiz", "Dra. Paz", "Dr. Soto"].iter().enumerate() {
            evaluation.set_professor_name(i, *name);
            evaluation.set_has_read_thesis(i, true);
        }
        for criterion in CriterionKind::ALL {
            evaluation.set_grade(Phase::First, criterion, GradeLevel::Sufficient);
        }
        evaluation.set_notes(Phase::First, "Needs more data & tests");
        evaluation
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a<b>&\"'"), "a&lt;b&gt;&amp;&quot;&#39;");
    }

    #[test]
    fn test_file_slug() {
        assert_eq!(file_slug("  Ana María Torres "), "ana-mar-a-torres");
        assert_eq!(file_slug("***"), "student");
    }

    #[test]
    fn test_first_phase_report_is_partial() {
        let html = render_html(&sample_evaluation(), ReportScope::Phase(Phase::First), None, Local::now());
        assert!(html.contains("window.print()"));
        assert!(html.contains("Ana &lt;Torres&gt;"));
        assert!(html.contains("Partial score"));
        assert!(html.contains("70.00%"));
        assert!(html.contains("Needs more data &amp; tests"));
        assert!(!html.contains("Second presentation"));
    }

    #[test]
    fn test_full_report_without_second_phase() {
        let html = render_html(&sample_evaluation(), ReportScope::Full, Some("Faculty of Engineering"), Local::now());
        assert!(html.contains("Faculty of Engineering"));
        assert!(html.contains("Second presentation"));
        assert!(html.contains("Not graded"));
        assert!(html.contains("Final score: --"));
    }

    #[test]
    fn test_full_report_final_verdict() {
        let mut evaluation = sample_evaluation();
        for criterion in CriterionKind::ALL {
            evaluation.set_grade(Phase::Second, criterion, GradeLevel::Good);
        }
        let html = render_html(&evaluation, ReportScope::Full, None, Local::now());
        assert!(html.contains("Final score: <span class=\"not-approved\">76.00%</span>"));
        assert!(html.contains("minimum required score"));
    }

    #[test]
    fn test_write_report() {
        let dir = env::temp_dir().join("thesis_grader_test_reports");
        let path = write_report(&sample_evaluation(), ReportScope::Full, None, &dir).unwrap();
        assert!(path.starts_with(&dir));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("thesis-ana-torres-final-"));
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("<!DOCTYPE html>"));
        let _ = std::fs::remove_file(&path);
    }
}
