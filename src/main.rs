use clap::{Parser, Subcommand};
use std::path::PathBuf;

use thesis_grader::output::{self, EvaluationSummary};
use thesis_grader::session::{parse_grade_list, GradeListError, Phase, ThesisEvaluation};

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
const EXIT_GRADE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the interactive evaluation session (default if no subcommand)
    Session,
    /// Score grades given on the command line
    Score {
        /// First presentation grades: presentation,research,project
        /// (insufficient|sufficient|good|excellent; blank = not graded)
        #[arg(long)]
        first: String,

        /// Second presentation grades, same format
        #[arg(long)]
        second: Option<String>,

        /// Student name shown in the output
        #[arg(long)]
        student: Option<String>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Parser, Debug)]
#[command(name = "thesis-grader")]
#[command(about = "Thesis defense scoring for examination committees", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/thesis-grader/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    thesis_grader::logging::init(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Session);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match thesis_grader::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = thesis_grader::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    match command {
        Commands::Session => {
            let theme = thesis_grader::tui::resolve_theme(config.theme);
            let app = thesis_grader::tui::App::new(config, theme);
            if let Err(e) = thesis_grader::tui::run_tui(app).await {
                eprintln!("Terminal error: {:#}", e);
                std::process::exit(EXIT_FAILURE);
            }
        }
        Commands::Score {
            first,
            second,
            student,
            json,
        } => {
            let evaluation = match build_evaluation(&first, second.as_deref(), student) {
                Ok(e) => e,
                Err(e) => {
                    eprintln!("Invalid grades: {}", e);
                    std::process::exit(EXIT_GRADE);
                }
            };
            tracing::debug!(
                first_complete = evaluation.is_phase_complete(Phase::First),
                second_complete = evaluation.is_phase_complete(Phase::Second),
                "scoring from command line"
            );

            if json {
                match output::to_json(&evaluation) {
                    Ok(text) => println!("{}", text),
                    Err(e) => {
                        eprintln!("Failed to serialize result: {}", e);
                        std::process::exit(EXIT_FAILURE);
                    }
                }
            } else {
                print_score(&evaluation);
            }
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

fn build_evaluation(
    first: &str,
    second: Option<&str>,
    student: Option<String>,
) -> Result<ThesisEvaluation, GradeListError> {
    let mut evaluation = ThesisEvaluation {
        first: parse_grade_list(first)?,
        ..ThesisEvaluation::default()
    };
    if let Some(list) = second {
        evaluation.second = Some(parse_grade_list(list)?);
    }
    if let Some(name) = student {
        evaluation.set_student_name(name);
    }
    Ok(evaluation)
}

fn print_score(evaluation: &ThesisEvaluation) {
    let use_colors = output::should_use_colors();
    let summary = EvaluationSummary::from_evaluation(evaluation);

    if !summary.student_name.is_empty() {
        println!("Student: {}", summary.student_name);
        println!();
    }

    let mut phases = vec![Phase::First];
    if evaluation.second.is_some() {
        phases.push(Phase::Second);
    }
    for phase in phases {
        println!(
            "{}",
            output::format_phase_table(summary.phase(phase), evaluation, use_colors)
        );
        println!();
    }
    println!("{}", output::format_headline(&summary));
}
