use std::path::PathBuf;

use calc_core::analytics::Period;
use clap::{Parser, Subcommand};
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Roll layout and cost estimates for print jobs")]
pub struct Cli {
    #[arg(short, long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,
    #[arg(
        short,
        long,
        value_name = "[off, error, warn, info, debug, trace]",
        default_value = "warn",
        global = true
    )]
    pub log_level: LevelFilter,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Calculate an estimate from a JSON request
    Estimate {
        #[arg(short, long = "input", value_name = "FILE")]
        input_file: PathBuf,
        /// Print the raw result as JSON instead of a report
        #[arg(long)]
        json: bool,
        /// Workbook to store the result in
        #[arg(short, long, value_name = "FILE", requires = "save_as")]
        workbook: Option<PathBuf>,
        /// Project name for the stored result
        #[arg(short, long, value_name = "NAME", requires = "workbook")]
        save_as: Option<String>,
    },
    /// Summarize the projects saved in a workbook
    Summary {
        #[arg(short, long, value_name = "FILE")]
        workbook: PathBuf,
        /// One of 7d, 30d, 90d, 1y (defaults to the config value)
        #[arg(short, long)]
        period: Option<Period>,
    },
}
