pub mod formatter;
pub mod report;
pub mod summary;

pub use formatter::{
    criterion_label, format_headline, format_phase_table, format_score, format_summary, grade_header,
    progress_bar, should_use_colors, truncate_text, verdict_narrative,
};
pub use report::{print_report, render_html, write_report, ReportScope};
pub use summary::{to_json, EvaluationSummary, PhaseSummary};
