//! # Rollcut CLI
//!
//! Terminal front end for the roll layout and cost engine.
//!
//! ```text
//! rollcut estimate --input job.json
//! rollcut estimate --input job.json --workbook shop.rcw --save-as "Mugs for Joe"
//! rollcut summary --workbook shop.rcw --period 90d
//! ```

mod cli;
mod config;
mod report;

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use calc_core::analytics::{summarize, Period};
use calc_core::calculations::{calculate, EstimateInput};
use calc_core::file_io::{load_or_create_workbook, load_workbook, save_workbook, FileLock};
use chrono::Utc;
use clap::Parser;
use log::{info, warn};

use crate::cli::{Cli, Command};
use crate::config::CliConfig;

fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    env_logger::Builder::new()
        .filter_level(args.log_level)
        .init();

    let config = match &args.config_file {
        None => {
            warn!("No config file provided, use --config to provide a custom config");
            CliConfig::default()
        }
        Some(path) => CliConfig::from_file(path)?,
    };
    info!("Using config: {config:?}");

    match args.command {
        Command::Estimate {
            input_file,
            json,
            workbook,
            save_as,
        } => run_estimate(&config, &input_file, json, workbook.as_deref(), save_as),
        Command::Summary { workbook, period } => {
            run_summary(&config, &workbook, period.unwrap_or(config.default_period))
        }
    }
}

fn run_estimate(
    config: &CliConfig,
    input_file: &Path,
    json: bool,
    workbook_path: Option<&Path>,
    save_as: Option<String>,
) -> Result<ExitCode> {
    let contents = fs::read_to_string(input_file)
        .with_context(|| format!("could not read input file: {}", input_file.display()))?;

    let outcome = EstimateInput::from_json(&contents)
        .and_then(|input| calculate(&input).map(|result| (input, result)));

    let (input, result) = match outcome {
        Ok(pair) => pair,
        Err(e) => {
            report::print_error(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        report::print_estimate(&input, &result, config.decimals);
    }

    if let (Some(path), Some(name)) = (workbook_path, save_as) {
        let _lock = FileLock::acquire(path, config.user_id.as_str())?;
        let mut workbook = load_or_create_workbook(path, config.owner.as_str(), config.company.as_str())?;
        let id = workbook.save_project(name, config.user_id.as_str(), input)?;
        save_workbook(&workbook, path)?;
        println!();
        println!("Saved project {id} to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn run_summary(config: &CliConfig, workbook_path: &Path, period: Period) -> Result<ExitCode> {
    let workbook = load_workbook(workbook_path)?;
    let report = summarize(workbook.projects.values(), period, Utc::now());
    report::print_summary(&report, config.decimals);
    Ok(ExitCode::SUCCESS)
}
