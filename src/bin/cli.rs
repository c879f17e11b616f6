//! NOTAM Search CLI
//!
//! Local execution entry point for single, batch, and runway searches.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use notam_search::{
    error::Result,
    models::{BatchReport, Config, MatchResult, QueryRow, SingleQuery},
    pipeline,
    services::build_source,
};

/// Template for one notice heading line.
const NOTICE_HEADER: &str = "#{id} | {window}";

/// NOTAM Search - runway and keyword filtering for airports and FIRs
#[derive(Parser, Debug)]
#[command(
    name = "notam-search",
    version,
    about = "Search NOTAMs by runway or keyword"
)]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search one airport or FIR
    Search {
        /// 4-character ICAO code
        location: String,

        /// Runway designator, e.g. 04R
        #[arg(long, conflicts_with = "keyword")]
        runway: Option<String>,

        /// Keyword to look for
        #[arg(long)]
        keyword: Option<String>,

        /// Treat the keyword as a regular expression
        #[arg(long, requires = "keyword")]
        regex: bool,
    },

    /// Run every row of a batch file
    Batch {
        /// TOML file with [[rows]] tables
        rows: PathBuf,

        /// Print matching notices, not just per-row counts
        #[arg(long)]
        expand: bool,
    },

    /// Check each runway of one airport
    Runways {
        /// 4-character ICAO code
        location: String,

        /// Runway designators, e.g. 07R 07L 25R
        #[arg(required = true, num_args = 1..)]
        runways: Vec<String>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag and configured level.
fn init_logging(verbose: bool, level: &str) {
    let level = if verbose { "debug" } else { level };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let (config, load_error) = match Config::load(&cli.config) {
        Ok(config) => (config, None),
        Err(e) => {
            let mut config = Config::default();
            config.source.apply_env();
            (config, Some(e))
        }
    };
    init_logging(cli.verbose, &config.logging.level);

    if let Some(e) = load_error {
        log::warn!(
            "Config load failed from {}: {}. Using defaults.",
            cli.config.display(),
            e
        );
    }

    match cli.command {
        Command::Search {
            location,
            runway,
            keyword,
            regex,
        } => {
            let query = match (runway, keyword) {
                (Some(rwy), _) => SingleQuery::runway(&location, &rwy),
                (None, Some(term)) => SingleQuery::keyword(&location, &term, regex),
                (None, None) => SingleQuery::all(&location),
            };

            let source = build_source(&config)?;
            let result = pipeline::run_single(source.as_ref(), &query).await?;

            println!("Results: {} NOTAMs", result.count());
            if result.is_empty() {
                println!("No active NOTAMs found matching criteria.");
            } else {
                print_matches(&result);
            }
        }

        Command::Batch { rows, expand } => {
            let rows = QueryRow::load_all(&rows)?;
            log::info!("Loaded {} batch row(s)", rows.len());

            let source = build_source(&config)?;
            let report = pipeline::run_batch(source.as_ref(), rows, &config.fetch, |progress| {
                log::info!(
                    "[{:>3.0}%] Fetched {} ({}/{})",
                    progress.fraction() * 100.0,
                    progress.location,
                    progress.completed,
                    progress.total
                );
            })
            .await?;

            print_report(&report, expand);
        }

        Command::Runways { location, runways } => {
            let source = build_source(&config)?;
            let checks = pipeline::run_runway_check(source.as_ref(), &location, &runways).await?;

            for check in &checks {
                println!();
                println!(
                    "{} RUNWAY {} ({} matches) {}",
                    "=".repeat(20),
                    check.runway,
                    check.result.count(),
                    "=".repeat(20)
                );
                if check.result.is_empty() {
                    println!("No specific NOTAMs found for RWY {}.", check.runway);
                } else {
                    print_matches(&check.result);
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (source: {:?})", config.source.kind);
        }
    }

    Ok(())
}

fn print_report(report: &BatchReport, expand: bool) {
    for (index, row) in report.rows.iter().enumerate() {
        let label = row.label(index);
        match report.results.get(&index) {
            None => println!("⚪ {label} (skipped: invalid location)"),
            Some(Err(e)) => println!("⚠️ {label} ({e})"),
            Some(Ok(result)) => {
                let icon = if result.is_empty() { "🟢" } else { "🔴" };
                println!("{icon} {label} ({} found)", result.count());
                if expand {
                    if result.is_empty() {
                        println!("    No matches found.");
                    } else {
                        print_matches(result);
                    }
                }
            }
        }
    }

    for location in &report.failed_locations {
        log::warn!("No data for {} (fetch failed)", location);
    }

    println!();
    println!(
        "{} row(s) with matches, {} failed, {} skipped",
        report.rows_with_matches(),
        report.failed_rows(),
        report.skipped.len()
    );
}

fn print_matches(result: &MatchResult) {
    for record in &result.matches {
        println!("{}", record.format(NOTICE_HEADER));
        println!("{}", record.display_text());
        println!("{}", "-".repeat(30));
    }
}
