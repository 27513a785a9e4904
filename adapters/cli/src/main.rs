#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that solves or replays a Pacman fear puzzle.

mod report;

use std::{fs, path::PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use pacman_fear_core::{Direction, Problem};
use pacman_fear_system_problem::{PacmanProblem, STANDARD_WORLD};
use pacman_fear_system_search::{depth_first_graph_search, SearchLimits};
use tracing_subscriber::EnvFilter;

use crate::report::Report;

/// Solve a Pacman fear puzzle with depth-first graph search.
#[derive(Debug, Parser)]
#[command(name = "pacman-fear", version)]
struct Cli {
    /// World description file; the built-in standard world when omitted.
    #[arg(long, value_name = "PATH")]
    world: Option<PathBuf>,

    /// Comma-separated action labels (N, S, W, E) to replay instead of searching.
    #[arg(long, value_delimiter = ',', value_name = "LABELS")]
    actions: Option<Vec<String>>,

    /// Stop searching after this many node expansions.
    #[arg(long, value_name = "N")]
    max_expansions: Option<usize>,

    /// Output format for the final report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log level used when RUST_LOG is not set.
    #[arg(long, default_value = "warn", value_name = "LEVEL")]
    log_level: String,

    /// Include the final grid in the report.
    #[arg(long)]
    show_grid: bool,
}

/// Rendering of the final report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Human-readable lines.
    Text,
    /// A single JSON object.
    Json,
}

/// Entry point for the Pacman fear command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let problem = load_problem(cli.world.as_ref())?;
    let conditions = problem.conditions();
    tracing::info!(
        target_steps = conditions.target_steps(),
        initial_fear = conditions.initial_fear(),
        pellet_power = conditions.pellet_power(),
        "world loaded"
    );

    let report = match &cli.actions {
        Some(labels) => {
            let actions = parse_actions(labels)?;
            let execution = problem.execute(problem.initial(), &actions);
            Report::from_replay(&execution, &actions, cli.show_grid)
        }
        None => {
            let limits = cli
                .max_expansions
                .map_or(SearchLimits::unbounded(), SearchLimits::with_max_expansions);
            let outcome = depth_first_graph_search(&problem, limits);
            Report::from_search(&outcome, cli.show_grid)
        }
    };

    match cli.format {
        OutputFormat::Text => print!("{}", report.to_text()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_problem(path: Option<&PathBuf>) -> Result<PacmanProblem> {
    let Some(path) = path else {
        return PacmanProblem::from_description(STANDARD_WORLD)
            .context("built-in standard world is invalid");
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read world description {}", path.display()))?;
    PacmanProblem::from_description(&text)
        .with_context(|| format!("failed to parse world description {}", path.display()))
}

fn parse_actions(labels: &[String]) -> Result<Vec<Direction>> {
    labels
        .iter()
        .map(|label| label.trim())
        .filter(|label| !label.is_empty())
        .map(|label| match Direction::from_label(label) {
            Some(direction) => Ok(direction),
            None => bail!("unknown action label '{label}', expected one of N, S, W, E"),
        })
        .collect()
}
