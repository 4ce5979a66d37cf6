use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand};

use pronostico::batch::{self, SubjectStats};
use pronostico::models::{self, ModelCollection};
use pronostico::output;
use pronostico::scoring::{self, ScoreDetail};
use pronostico::students::{self, GradeBand, Subject};

const EXIT_SUCCESS: i32 = 0;
const EXIT_MODELS: i32 = 1;
const EXIT_INPUT: i32 = 2;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a single student across all six subjects
    Score {
        /// Path to a JSON file with the student's features
        #[arg(short, long)]
        input: PathBuf,

        /// Grade band the student is in (14 = grades 8-9, 24 = grades 10-11)
        #[arg(short, long, value_parser = parse_grade_band)]
        grade_band: GradeBand,

        /// Show the per-feature contribution trace for each subject
        #[arg(short, long)]
        detailed: bool,

        /// Write the captured features plus predictions to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Score a roster CSV and print aggregate statistics
    Batch {
        /// Path to the roster CSV (header row plus one row per student)
        #[arg(short, long)]
        roster: PathBuf,

        /// Grade band of the roster (14 = grades 8-9, 24 = grades 10-11)
        #[arg(short, long, value_parser = parse_grade_band)]
        grade_band: GradeBand,

        /// Write the scored roster (original columns + pred_*) to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Parser, Debug)]
#[command(name = "pronostico")]
#[command(about = "Predicts student academic outcomes from precomputed probit models", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding the coefficient sheets (one CSV per model)
    #[arg(short, long, global = true, default_value = "coeficientes")]
    models: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

fn parse_grade_band(raw: &str) -> Result<GradeBand, String> {
    raw.parse::<u32>()
        .ok()
        .and_then(GradeBand::from_code)
        .ok_or_else(|| format!("invalid grade band '{raw}' (expected 14 or 24)"))
}

fn main() {
    let cli = Cli::parse();
    let start_time = Instant::now();

    let collection = match models::load_models(&cli.models) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Model load error: {e}");
            std::process::exit(EXIT_MODELS);
        }
    };

    if cli.verbose {
        eprintln!(
            "Loaded {} models from {} in {:?}",
            collection.len(),
            cli.models.display(),
            start_time.elapsed()
        );
        for name in collection.names() {
            eprintln!("  {name}");
        }
    }

    match cli.command {
        Commands::Score {
            input,
            grade_band,
            detailed,
            output,
        } => run_score(&collection, &input, grade_band, detailed, output, cli.verbose),
        Commands::Batch {
            roster,
            grade_band,
            output,
        } => run_batch(&collection, &roster, grade_band, output, cli.verbose),
    }

    if cli.verbose {
        eprintln!("Done in {:?}", start_time.elapsed());
    }
    std::process::exit(EXIT_SUCCESS);
}

fn run_score(
    collection: &ModelCollection,
    input: &Path,
    band: GradeBand,
    detailed: bool,
    output: Option<PathBuf>,
    verbose: bool,
) {
    let student = match students::read_student_file(input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Input error: {e:#}");
            std::process::exit(EXIT_INPUT);
        }
    };

    if verbose {
        eprintln!(
            "Student {}: {} features supplied",
            student.id,
            student.features.len()
        );
    }

    let mut results: Vec<(Subject, Option<ScoreDetail>)> = Vec::new();
    for subject in Subject::ALL {
        let name = students::model_name(subject, band);
        match collection.get(&name) {
            Some(table) => {
                results.push((subject, Some(scoring::score_with_trace(table, &student.features))));
            }
            None => {
                eprintln!("Warning: no model sheet named {name}");
                results.push((subject, None));
            }
        }
    }

    if results.iter().all(|(_, detail)| detail.is_none()) {
        eprintln!("No subject could be scored; check the coefficient sheets.");
        std::process::exit(EXIT_INPUT);
    }

    let use_colors = output::should_use_colors();
    let predictions: Vec<(Subject, Option<f64>)> = results
        .iter()
        .map(|(subject, detail)| (*subject, detail.as_ref().map(|d| d.probability)))
        .collect();

    println!("Predictions for student {}", student.id);
    println!("{}", output::format_predictions(&predictions, use_colors));

    if detailed {
        for (subject, detail) in &results {
            if let Some(detail) = detail {
                println!();
                println!("{}", output::format_trace(*subject, detail, use_colors));
            }
        }
    }

    if let Some(path) = output {
        if let Err(e) = batch::write_student_export(&path, &student, &predictions) {
            eprintln!("Export error: {e:#}");
            std::process::exit(EXIT_INPUT);
        }
        println!("Wrote {}", path.display());
    }
}

fn run_batch(
    collection: &ModelCollection,
    roster_path: &Path,
    band: GradeBand,
    output: Option<PathBuf>,
    verbose: bool,
) {
    let roster = match students::read_roster(roster_path) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Input error: {e:#}");
            std::process::exit(EXIT_INPUT);
        }
    };

    if verbose {
        eprintln!(
            "Roster: {} students, {} numeric cells failed coercion",
            roster.students.len(),
            roster.coercion_failures
        );
    }

    let show_progress = std::io::stderr().is_terminal();
    let outcome = batch::run_batch(collection, &roster.students, band, show_progress);

    for name in &outcome.missing_models {
        eprintln!("Warning: no model sheet named {name}");
    }
    if outcome.nothing_scored {
        eprintln!("No subject could be scored; check the coefficient sheets.");
        std::process::exit(EXIT_INPUT);
    }

    let stats: Vec<(Subject, Option<SubjectStats>)> = Subject::ALL
        .iter()
        .map(|&subject| {
            let values = batch::subject_values(&outcome.predictions, subject);
            (subject, batch::subject_stats(subject, &values))
        })
        .collect();

    let use_colors = output::should_use_colors();
    println!(
        "Scored {} students (band {})",
        outcome.predictions.len(),
        band.code()
    );
    println!("{}", output::format_stats(&stats, use_colors));

    if let Some(path) = output {
        if let Err(e) = batch::write_scored_roster(&path, &roster, &outcome.predictions) {
            eprintln!("Export error: {e:#}");
            std::process::exit(EXIT_INPUT);
        }
        println!("Wrote {}", path.display());
    }
}
