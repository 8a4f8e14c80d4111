//! Secdef Statistics
//!
//! Reads a security definition file and prints instruments per security
//! type, futures per product complex, and the earliest expiring zero-leg
//! futures on the configured asset.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use secdef_stats::observability::{init_tracing, spans, LogConfig};
use secdef_stats::report::{render_json, render_text};
use secdef_stats::{Aggregator, FileSource, QueryResults, SecdefConfig, SecdefError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

const USAGE: &str = "usage: secdef-stats <FEED> [--config <toml>] [--json] [--json-logs]";

struct Args {
    feed: PathBuf,
    config: Option<PathBuf>,
    json: bool,
    json_logs: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut feed = None;
    let mut config = None;
    let mut json = false;
    let mut json_logs = false;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let path = args.next().ok_or("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            "--json" => json = true,
            "--json-logs" => json_logs = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            other if other.starts_with("--") => {
                return Err(format!("unknown option {}", other));
            }
            other => {
                if feed.replace(PathBuf::from(other)).is_some() {
                    return Err("more than one feed given".to_string());
                }
            }
        }
    }

    Ok(Args {
        feed: feed.ok_or("missing feed path")?,
        config,
        json,
        json_logs,
    })
}

fn load_config(path: Option<&PathBuf>) -> Result<SecdefConfig, SecdefError> {
    match path {
        Some(path) => {
            let span = spans::config_span(&path.display().to_string());
            let _enter = span.enter();
            SecdefConfig::load(path)
        }
        None => Ok(SecdefConfig::default()),
    }
}

fn main() -> ExitCode {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{}\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };

    let mut log_config = LogConfig::from_env();
    if args.json_logs {
        log_config = log_config.with_json(true);
    }
    if let Err(e) = init_tracing(&log_config) {
        eprintln!("Failed to initialize tracing: {}", e);
    }

    let config = match load_config(args.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };
    let limit = config.earliest_limit;

    let aggregator = match Aggregator::new(config) {
        Ok(aggregator) => aggregator,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };

    let source = FileSource::new(&args.feed);
    let summary = match aggregator.run(&source) {
        Ok(summary) => summary,
        Err(e) => {
            // No partial answers on a source failure
            error!(error = %e, "Secdef pass aborted");
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let results = QueryResults::derive(&summary.aggregates, limit);
    if args.json {
        match render_json(&results, &summary.stats) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode results: {}", e);
                return ExitCode::from(1);
            }
        }
    } else {
        print!("{}", render_text(&results));
        if summary.stats.issues() > 0 {
            eprintln!(
                "{} record issue(s) found; see log for line numbers",
                summary.stats.issues()
            );
        }
    }

    ExitCode::SUCCESS
}
