//! Phoenixx CLI
//!
//! Main entry point for scoring a candidate solution against a problem.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use phoenixx_engine::{
    Clock, EngineConfig, HintTier, Problem, ScoreReport, SessionState, SystemClock,
};
use phoenixx_executor::{BlockingSandbox, Language};
use phoenixx_report::{
    json::JsonGenerator, CaseResult, HintUsage, MarkdownGenerator, ReportSummary, SessionOutcome,
    SessionReport,
};
use tracing_subscriber::EnvFilter;

/// Phoenixx - AI Coding Interview Scorer
///
/// Runs a candidate solution through an interview session: the solution is
/// executed against the problem's test cases in a Docker sandbox, scored
/// with any hint penalties applied, and written out as Markdown and JSON
/// reports.
#[derive(Parser, Debug)]
#[command(name = "phoenixx")]
#[command(version, about, long_about = None)]
struct Args {
    /// Problem to attempt: an id looked up in the problem directory, or a
    /// path to a problem JSON file
    #[arg(value_name = "PROBLEM")]
    problem: String,

    /// Path to the solution source file
    #[arg(value_name = "SOLUTION")]
    solution: String,

    /// Path to configuration file (default: phoenixx.json in current directory)
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Output directory for reports
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Docker image for the sandbox
    #[arg(short, long, value_name = "IMAGE")]
    image: Option<String>,

    /// Solution language (python or javascript)
    #[arg(short, long, default_value = "python")]
    language: String,

    /// Hints to record before scoring, in request order (e.g. nudge,nudge,guide)
    #[arg(long, value_name = "TIERS", value_delimiter = ',')]
    hints: Vec<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing subscriber with appropriate filter
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Phoenixx starting");
    tracing::debug!(config = ?args.config, "Config file");
    tracing::debug!(output_dir = ?args.output_dir, "Output directory");

    match run_session(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(1)
        }
    }
}

/// Runs one scored interview session.
///
/// 1. Load config and problem
/// 2. Check Docker availability
/// 3. Start the session and record any pre-declared hints
/// 4. Submit the solution for scoring
/// 5. Finish the session and generate reports
fn run_session(args: Args) -> anyhow::Result<()> {
    // Load configuration
    let mut config = load_config(args.config.as_deref())?;

    // Apply CLI argument overrides
    if let Some(ref output_dir) = args.output_dir {
        config.output_dir.clone_from(output_dir);
    }
    if let Some(ref image) = args.image {
        config.sandbox_image.clone_from(image);
    }

    // Re-validate after overrides
    config.validate()?;

    let language = parse_language(&args.language)?;
    let hint_tiers = parse_hint_tiers(&args.hints)?;

    print_config(&config, language);

    // Load the problem
    tracing::info!(problem = %args.problem, "Loading problem");
    let problem = load_problem(&config, &args.problem)?;
    print_problem_info(&problem);

    // Load the solution source
    let solution_path = Path::new(&args.solution);
    let code = std::fs::read_to_string(solution_path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read solution file '{}': {e}\n\nSuggestion: Check the path exists and is readable",
            solution_path.display()
        )
    })?;

    // Check Docker availability
    println!();
    println!("Checking Docker availability...");
    let work_dir = PathBuf::from(&config.output_dir).join(".phoenixx/work");
    let mut sandbox = BlockingSandbox::new(&config.sandbox_image, language, work_dir)?;
    sandbox.health_check().map_err(|e| {
        anyhow::anyhow!(
            "Docker health check failed: {e}\n\nSuggestion: Make sure Docker is running and accessible"
        )
    })?;
    println!("Docker is available and healthy");

    // Run the session
    let clock = SystemClock;
    let mut session = SessionState::start(problem, &clock)?;

    for tier in hint_tiers {
        let (next, grant) = session.request_hint(tier, &config, &clock)?;
        println!(
            "Hint recorded: {} tier{}",
            grant.tier,
            if grant.repeated { " (repeat)" } else { "" }
        );
        session = next;
    }

    println!();
    println!("Scoring submission...");
    session = session.submit(code, &mut sandbox, &config, &clock)?;
    let session = session.finish(&clock)?;

    println!();
    print_summary(&session, &clock);

    // Generate reports
    let report_dir = PathBuf::from(&config.output_dir);
    generate_reports(&session, &clock, &config, &report_dir)?;

    Ok(())
}

/// Loads configuration from the specified path or default location.
fn load_config(config_path: Option<&str>) -> anyhow::Result<EngineConfig> {
    match config_path {
        Some(path_str) => {
            let path = Path::new(path_str);
            if !path.exists() {
                anyhow::bail!(
                    "Config file not found: '{}'\n\nSuggestion: Check the path or remove the --config flag to use defaults",
                    path.display()
                );
            }
            EngineConfig::load_from_file(path).map_err(|e| anyhow::anyhow!("{e}"))
        }
        None => EngineConfig::load().map_err(|e| anyhow::anyhow!("{e}")),
    }
}

/// Loads a problem by path when the argument points at a JSON file, or by
/// id from the configured problem directory otherwise.
fn load_problem(config: &EngineConfig, problem_arg: &str) -> anyhow::Result<Problem> {
    let as_path = Path::new(problem_arg);
    let problem = if as_path.extension().is_some_and(|ext| ext == "json") {
        Problem::load(as_path)
    } else {
        Problem::load_by_id(Path::new(&config.problem_dir), problem_arg)
    };

    problem.map_err(|e| anyhow::anyhow!("{e}"))
}

/// Parses the language argument.
fn parse_language(name: &str) -> anyhow::Result<Language> {
    Language::from_name(name).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown language: '{name}'\n\nSuggestion: Use 'python' or 'javascript'"
        )
    })
}

/// Parses the declared hint tiers in request order.
fn parse_hint_tiers(names: &[String]) -> anyhow::Result<Vec<HintTier>> {
    names
        .iter()
        .map(|name| match name.trim().to_lowercase().as_str() {
            "nudge" => Ok(HintTier::Nudge),
            "guide" => Ok(HintTier::Guide),
            "direction" => Ok(HintTier::Direction),
            other => Err(anyhow::anyhow!(
                "Unknown hint tier: '{other}'\n\nSuggestion: Use nudge, guide, or direction"
            )),
        })
        .collect()
}

/// Prints the loaded configuration.
fn print_config(config: &EngineConfig, language: Language) {
    println!("Configuration loaded:");
    println!("  Problem directory: {}", config.problem_dir);
    println!("  Output directory: {}", config.output_dir);
    println!("  Sandbox image: {}", config.sandbox_image);
    println!("  Language: {language}");
    println!("  Case time limit: {}ms", config.case_time_limit_ms);
    println!("  Max grants per tier: {}", config.max_grants_per_tier);
}

/// Prints problem information.
fn print_problem_info(problem: &Problem) {
    println!();
    println!("Problem loaded:");
    println!("  Id: {}", problem.id);
    println!("  Title: {}", problem.title);
    println!("  Difficulty: {}", problem.difficulty);
    println!("  Test cases: {}", problem.test_cases.len());
}

/// Prints a summary of the finished session.
fn print_summary(session: &SessionState, clock: &dyn Clock) {
    println!("=== Session Summary ===");
    println!("Problem: {}", session.problem.id);

    if let Some(report) = &session.latest_report {
        println!("Overall score: {}/100", report.overall_score);
        println!(
            "Tests passed: {}/{}",
            report.passed_count, report.total_count
        );
        println!("Estimated complexity: {}", report.estimated_complexity);
    } else {
        println!("No submissions were scored");
    }

    println!("Hints used: {}", session.hints_used());

    let elapsed = session.elapsed(clock.now());
    println!(
        "Duration: {}m {}s",
        elapsed.num_minutes(),
        elapsed.num_seconds() % 60
    );
}

/// Generates reports from the finished session.
///
/// Creates both Markdown and JSON reports in the output directory.
fn generate_reports(
    session: &SessionState,
    clock: &dyn Clock,
    config: &EngineConfig,
    output_dir: &Path,
) -> anyhow::Result<()> {
    println!();
    println!("Generating reports...");

    let report = create_session_report(session, clock, config)?;

    // Ensure output directory exists
    std::fs::create_dir_all(output_dir)?;

    // Write Markdown report
    let md_generator = MarkdownGenerator::new(&report);
    let markdown = md_generator.generate();
    let md_path = output_dir.join("phoenixx-report.md");
    std::fs::write(&md_path, markdown)?;
    println!("  Markdown report: {}", md_path.display());

    // Write JSON report
    let json_path = output_dir.join("phoenixx-report.json");
    let json_generator = JsonGenerator::new(&report);
    json_generator.write_to_file(&json_path, true)?;
    println!("  JSON report: {}", json_path.display());

    println!();
    if report.all_cases_passed() {
        println!("All test cases passed!");
    } else {
        println!(
            "Tests passed: {}/{}",
            report.summary.passed_cases, report.summary.total_cases
        );
    }

    Ok(())
}

/// Converts a finished session into the report crate's input structure.
fn create_session_report(
    session: &SessionState,
    clock: &dyn Clock,
    config: &EngineConfig,
) -> anyhow::Result<SessionReport> {
    let elapsed = session.elapsed(clock.now());
    let duration_seconds = u64::try_from(elapsed.num_seconds()).unwrap_or(0);

    let outcome = if session.is_terminal() {
        SessionOutcome::Completed
    } else {
        SessionOutcome::InProgress
    };

    let summary = session.latest_report.as_ref().map_or_else(
        || ReportSummary {
            duration_seconds,
            ..Default::default()
        },
        |report| convert_summary(session, report, config, duration_seconds),
    );

    let cases = session
        .latest_report
        .as_ref()
        .map(|report| {
            report
                .test_results
                .iter()
                .map(|result| CaseResult {
                    index: result.test_case_index,
                    passed: result.passed,
                    actual_output: result.actual_output.clone(),
                    error: result.error_message.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    let hints = session
        .hints
        .iter()
        .map(|record| HintUsage::new(record.tier.to_string(), record.requested_at))
        .collect();

    SessionReport::builder()
        .problem_id(&session.problem.id)
        .problem_title(&session.problem.title)
        .difficulty(session.problem.difficulty.to_string())
        .outcome(outcome)
        .summary(summary)
        .cases(cases)
        .hints(hints)
        .build()
        .map_err(|e| anyhow::anyhow!("{e}"))
}

/// Converts the engine's score report into the report summary.
fn convert_summary(
    session: &SessionState,
    report: &ScoreReport,
    config: &EngineConfig,
    duration_seconds: u64,
) -> ReportSummary {
    let penalty = phoenixx_engine::penalty_from_hints(&session.hints, &config.hint_penalties);

    ReportSummary {
        overall_score: report.overall_score,
        quality_score: report.quality_score,
        passed_cases: report.passed_count,
        total_cases: report.total_count,
        estimated_complexity: report.estimated_complexity.to_string(),
        hint_penalty: penalty,
        submissions: session.submissions.len(),
        duration_seconds,
    }
}
