use anyhow::Result;
use clap::Parser;
use serde_json::Value;
use tracing::info;

use gamecode_normalizer::logging::init_logging;
use gamecode_normalizer::{normalize_code, normalize_codes, NormalizeOptions, NormalizeResult};

/// Illustrative front-end: normalizes codes and prints the results. All of
/// the actual behavior lives in the library.
#[derive(Parser)]
#[command(name = "gamecode-normalizer")]
#[command(about = "Normalize, validate and classify game redemption codes")]
#[command(version = "0.1.0")]
struct Cli {
    /// Codes to normalize, as typed by users
    codes: Vec<String>,

    /// Read a JSON array of inputs (strings or {code, meta} records) from a file
    #[arg(long)]
    input: Option<String>,

    /// Minimum accepted length of a normalized code
    #[arg(long)]
    min_length: Option<usize>,

    /// Maximum accepted length of a normalized code
    #[arg(long)]
    max_length: Option<usize>,

    /// Extra options as JSON, e.g. '{"keywords":[["XMAS","event_reward"]]}'
    #[arg(long)]
    options: Option<String>,

    /// Print full results as JSON instead of one summary line per code
    #[arg(long)]
    json: bool,
}

fn load_inputs(path: &str) -> gamecode_normalizer::error::Result<Value> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn print_summary(result: &NormalizeResult) {
    println!(
        "{:<20} -> {:<16} [{}] {} {:?}",
        result.raw,
        result.normalized,
        if result.is_valid_format { "valid" } else { "invalid" },
        result.probable_type.as_str(),
        result.hints
    );
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut options = match &cli.options {
        Some(text) => NormalizeOptions::from_json_str(text)?,
        None => NormalizeOptions::default(),
    };
    if cli.min_length.is_some() {
        options.min_length = cli.min_length;
    }
    if cli.max_length.is_some() {
        options.max_length = cli.max_length;
    }

    let results = if let Some(path) = &cli.input {
        let inputs = load_inputs(path)?;
        normalize_codes(&inputs, Some(&options))
    } else {
        cli.codes
            .iter()
            .map(|code| normalize_code(code.as_str(), Some(&options)))
            .collect()
    };

    info!(count = results.len(), "processed codes");

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        for result in &results {
            print_summary(result);
        }
    }

    Ok(())
}
