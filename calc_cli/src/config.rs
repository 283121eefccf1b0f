use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use calc_core::analytics::Period;
use serde::{Deserialize, Serialize};

/// Settings for the command line front end
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Decimals shown for money and lengths; results are never rounded before this
    pub decimals: usize,
    /// Identity written into workbook locks and saved projects
    pub user_id: String,
    /// Owner and company used when a new workbook is created
    pub owner: String,
    pub company: String,
    /// Period used by `summary` when none is given
    pub default_period: Period,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            decimals: 2,
            user_id: std::env::var("USER").unwrap_or_else(|_| "rollcut".to_string()),
            owner: String::new(),
            company: String::new(),
            default_period: Period::Days30,
        }
    }
}

impl CliConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("could not open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader).context("incorrect config file format")
    }
}
