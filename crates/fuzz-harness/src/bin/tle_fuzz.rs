//! TLE Forge Fuzz Runner CLI
//!
//! Usage:
//!   tle-fuzz run [--cases N] [--seed S] [--max-shrink-iters N] [--target NAME]
//!                [--output FORMAT]
//!   tle-fuzz list
//!   tle-fuzz report <json-file> [--output FORMAT]
//!
//! Examples:
//!   tle-fuzz run                          # All targets with defaults
//!   tle-fuzz run --cases 100000           # 100k cases per target
//!   tle-fuzz run --output junit           # JUnit XML (for CI)
//!   tle-fuzz run --target belt_layout     # One target only
//!   tle-fuzz report results.json          # Re-generate report from JSON

use clap::{Parser, Subcommand, ValueEnum};
use fuzz_harness::prelude::*;
use fuzz_harness::reports::FuzzReport;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Belt targets forge hundreds of records per case
const BELT_CASE_DIVISOR: u64 = 50;

#[derive(Parser, Debug)]
#[command(name = "tle-fuzz", about = "Property fuzzing for the TLE forge")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run fuzz targets
    Run {
        /// Number of test cases per target
        #[arg(long, default_value_t = 10_000)]
        cases: u64,

        /// Random seed (0 = random)
        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Shrink steps spent on each failing input
        #[arg(long, default_value_t = 1000)]
        max_shrink_iters: u32,

        /// Run only this target
        #[arg(long)]
        target: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
    /// List available fuzz targets
    List,
    /// Generate a report from saved JSON results
    Report {
        json_file: PathBuf,

        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        output: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    Junit,
    #[value(alias = "md")]
    Markdown,
}

struct Target {
    name: &'static str,
    about: &'static str,
    belt: bool,
    run: fn(&mut FuzzRunner),
}

const TARGETS: &[Target] = &[
    Target {
        name: "record_shape",
        about: "Both lines 69 columns with valid checksums",
        belt: false,
        run: |r| {
            r.run_strategy("record_shape", orbital_parameters(), check_forges);
        },
    },
    Target {
        name: "deterministic",
        about: "Same inputs forge identical text",
        belt: false,
        run: |r| {
            r.run_strategy("deterministic", orbital_parameters(), check_deterministic);
        },
    },
    Target {
        name: "strict_agrees",
        about: "Strict validation accepts in-range inputs unchanged",
        belt: false,
        run: |r| {
            r.run_strategy("strict_agrees", orbital_parameters(), check_strict_agrees);
        },
    },
    Target {
        name: "scientific_encoding",
        about: "Scientific tokens are 8 columns and decode within 1e-4",
        belt: false,
        run: |r| {
            r.run_strategy("scientific_encoding", scientific_value(), |v| check_scientific(*v));
        },
    },
    Target {
        name: "drag_terms",
        about: "Representable drag terms forge under strict validation",
        belt: false,
        run: |r| {
            r.run_strategy(
                "drag_terms",
                (orbital_parameters(), drag_terms()),
                |(params, drag)| check_with_drag(params, drag),
            );
        },
    },
    Target {
        name: "belt_layout",
        about: "Belt order, naming and RAAN/anomaly spacing",
        belt: true,
        run: |r| {
            r.run_strategy("belt_layout", belt_spec(), check_belt_layout);
        },
    },
    Target {
        name: "belt_catalog_numbers",
        about: "Sequential identities follow belt order",
        belt: true,
        run: |r| {
            r.run_strategy(
                "belt_catalog_numbers",
                (belt_spec(), 0u32..=90_000),
                |(spec, first)| check_belt_catalog_numbers(spec, *first),
            );
        },
    },
];

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Run {
            cases,
            seed,
            max_shrink_iters,
            target,
            output,
        } => {
            let config = FuzzConfig::new()
                .cases(cases)
                .seed(seed)
                .max_shrink_iters(max_shrink_iters);
            run_fuzz_tests(config, target, output)
        }
        Command::List => list_targets(),
        Command::Report { json_file, output } => generate_report(&json_file, output),
    }
}

fn run_fuzz_tests(config: FuzzConfig, only: Option<String>, output: OutputFormat) -> ExitCode {
    let selected: Vec<&Target> = TARGETS
        .iter()
        .filter(|t| only.as_deref().map_or(true, |name| t.name == name))
        .collect();
    if selected.is_empty() {
        eprintln!("Unknown target: {}", only.unwrap_or_default());
        eprintln!("Run `tle-fuzz list` for the available targets");
        return ExitCode::from(2);
    }

    info!(
        cases = config.cases,
        seed = config.seed,
        targets = selected.len(),
        "starting fuzz run"
    );

    let mut results = Vec::with_capacity(selected.len());
    for target in selected {
        let cases = if target.belt {
            (config.cases / BELT_CASE_DIVISOR).max(1)
        } else {
            config.cases
        };
        let mut runner = FuzzRunner::new(config.clone().cases(cases));
        (target.run)(&mut runner);
        results.extend(runner.into_results());
        info!(target_name = target.name, "target finished");
    }

    let report = FuzzReport::new(results).with_seed(config.seed);
    emit(&report, output);

    if report.all_passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}

fn list_targets() -> ExitCode {
    println!("Available fuzz targets:");
    println!();
    for target in TARGETS {
        let scale = if target.belt { " (cases / 50)" } else { "" };
        println!("  {:<22} {}{}", target.name, target.about, scale);
    }
    println!();
    println!("Run with: tle-fuzz run [--cases N] [--target NAME]");

    ExitCode::SUCCESS
}

fn generate_report(path: &Path, output: OutputFormat) -> ExitCode {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Failed to read {}: {}", path.display(), e);
            return ExitCode::from(1);
        }
    };

    // Accept a full report or a bare list of results
    let report = match FuzzReport::from_json(&json) {
        Ok(report) => report,
        Err(_) => match serde_json::from_str::<Vec<FuzzResult>>(&json) {
            Ok(results) => FuzzReport::new(results),
            Err(e) => {
                eprintln!("Failed to parse JSON: {}", e);
                return ExitCode::from(1);
            }
        },
    };

    emit(&report, output);
    ExitCode::SUCCESS
}

fn emit(report: &FuzzReport, output: OutputFormat) {
    match output {
        OutputFormat::Json => println!("{}", report.to_json()),
        OutputFormat::Junit => println!("{}", report.to_junit_xml()),
        OutputFormat::Markdown => println!("{}", report.to_markdown()),
        OutputFormat::Text => report.print(),
    }
}
