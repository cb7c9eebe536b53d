//! SimView Analysis CLI Application
//!
//! This is the command-line interface for the SimView lap comparison.
//! It uses the simview-telemetry library and adds:
//! - Argument parsing and logging setup
//! - Time-diff chart rendering (SVG)
//! - A short console summary

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

mod chart;
mod report;

/// SimView Analysis - Time-diff chart for SimView
#[derive(Parser, Debug)]
#[command(name = "simview-cli")]
#[command(about = "Time-diff chart for SimView lap comparisons", long_about = None)]
#[command(version)]
struct Args {
    /// URL of lap comparison analysis page
    #[arg(short, long, value_name = "URL")]
    url: String,

    /// Data alignment accuracy, also used as the resampling step
    #[arg(short, long, value_name = "EPSILON", default_value_t = simview_telemetry::DEFAULT_EPSILON)]
    epsilon: f64,

    /// Output file for the chart
    #[arg(short, long, value_name = "FILE", default_value = "time_diff.svg")]
    output: PathBuf,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("SimView Analysis CLI v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Using telemetry library v{}", simview_telemetry::VERSION);

    run(&args)
}

/// Resolve, fetch, compare, and render
fn run(args: &Args) -> Result<()> {
    use simview_telemetry::{
        fetch_laps, resolve_comparison_url, AnalysisConfig, HttpTelemetrySource, LapAnalyzer,
    };

    let config = AnalysisConfig::new().with_epsilon(args.epsilon);
    let analyzer = LapAnalyzer::new(config).context("Invalid analysis parameters")?;

    let comparison_url = resolve_comparison_url(&args.url)?;
    log::info!("Comparing {}", comparison_url);

    let source = HttpTelemetrySource::new()?;
    let [lap1, lap2] = fetch_laps(&source, &comparison_url)
        .with_context(|| format!("Failed to fetch telemetry from {}", comparison_url.base_url))?;

    let comparison = analyzer
        .compare(&lap1, &lap2)
        .context("Failed to compare lap telemetry")?;

    chart::render(&comparison, &args.output)
        .with_context(|| format!("Failed to render chart to {:?}", args.output))?;
    log::info!("Chart written to {:?}", args.output);

    if !args.quiet {
        report::print_summary(&comparison_url, &comparison, &args.output);
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from([
            "simview-cli",
            "--url",
            "https://host/analysis/compare/lap1/1/lap2/2",
        ])
        .unwrap();

        assert_eq!(args.epsilon, 0.1);
        assert_eq!(args.output, PathBuf::from("time_diff.svg"));
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_args_overrides() {
        let args = Args::try_parse_from([
            "simview-cli",
            "-u",
            "https://host/analysis/compare/lap1/1/lap2/2",
            "-e",
            "0.25",
            "-o",
            "out.svg",
            "-vv",
        ])
        .unwrap();

        assert_eq!(args.epsilon, 0.25);
        assert_eq!(args.output, PathBuf::from("out.svg"));
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_url_is_required() {
        assert!(Args::try_parse_from(["simview-cli"]).is_err());
    }
}
