//! # Analytics
//!
//! Aggregates over saved projects: totals for a period, which shapes are
//! cut most, and how project values are distributed.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::analytics::{summarize, Period};
//! use calc_core::workbook::Workbook;
//! use chrono::Utc;
//!
//! let workbook = Workbook::new("Ana", "Print Corner");
//! let report = summarize(workbook.projects.values(), Period::Days30, Utc::now());
//! assert_eq!(report.summary.total_projects, 0);
//! assert_eq!(report.summary.avg_ticket, 0.0);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CalcError;
use crate::materials::{Roll, Shape};
use crate::workbook::SavedProject;

/// Number of entries kept in [`AnalyticsReport::shape_usage`]
pub const TOP_SHAPES: usize = 10;

/// Upper bounds (inclusive) of the value buckets; the last bucket is open.
pub const VALUE_RANGE_BOUNDS: [f64; 4] = [100.0, 500.0, 1000.0, 5000.0];

/// Lower bounds (inclusive) of the shape area buckets after the first, in square catalog units.
pub const SHAPE_AREA_BOUNDS: [f64; 3] = [100.0, 500.0, 1000.0];

/// Lower bounds (inclusive) of the roll width buckets after the first.
pub const ROLL_WIDTH_BOUNDS: [f64; 3] = [21.0, 42.0, 60.0];

/// Look-back window for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "7d")]
    Days7,
    #[default]
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    Days90,
    #[serde(rename = "1y")]
    Year,
}

impl Period {
    pub fn duration(self) -> Duration {
        match self {
            Period::Days7 => Duration::days(7),
            Period::Days30 => Duration::days(30),
            Period::Days90 => Duration::days(90),
            Period::Year => Duration::days(365),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::Days7 => "7d",
            Period::Days30 => "30d",
            Period::Days90 => "90d",
            Period::Year => "1y",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7d" => Ok(Period::Days7),
            "30d" => Ok(Period::Days30),
            "90d" => Ok(Period::Days90),
            "1y" => Ok(Period::Year),
            other => Err(CalcError::invalid_dimension(
                "analytics",
                "period",
                other,
                "Period must be one of 7d, 30d, 90d, 1y",
            )),
        }
    }
}

/// Totals over the projects in the period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_projects: usize,
    /// Sum of total sell prices
    pub total_value: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    pub total_pieces: u64,
    /// Average sell price per project
    pub avg_ticket: f64,
    /// Profit over cost, in percent
    pub avg_profit_margin_percent: f64,
}

/// Pieces cut of one shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeUsage {
    pub name: String,
    pub pieces: u64,
}

/// Number of projects in one value bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// Lower bound (exclusive), `None` for the first bucket
    pub above: Option<f64>,
    /// Upper bound (inclusive), `None` for the last bucket
    pub up_to: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub period: Period,
    pub summary: Summary,
    pub shape_usage: Vec<ShapeUsage>,
    pub value_ranges: Vec<ValueRange>,
    pub generated_at: DateTime<Utc>,
}

/// Build a report over the projects saved within `period` before `now`.
pub fn summarize<'a, I>(projects: I, period: Period, now: DateTime<Utc>) -> AnalyticsReport
where
    I: IntoIterator<Item = &'a SavedProject>,
{
    let since = now - period.duration();
    let in_period: Vec<&SavedProject> = projects
        .into_iter()
        .filter(|p| p.saved_at >= since && p.saved_at <= now)
        .collect();

    AnalyticsReport {
        period,
        summary: summary_of(&in_period),
        shape_usage: shape_usage_of(&in_period),
        value_ranges: value_ranges_of(&in_period),
        generated_at: now,
    }
}

fn summary_of(projects: &[&SavedProject]) -> Summary {
    let mut summary = Summary {
        total_projects: projects.len(),
        ..Summary::default()
    };
    for project in projects {
        let cost = &project.result.cost;
        summary.total_value += cost.total_sell_price;
        summary.total_cost += cost.total_cost;
        summary.total_profit += cost.total_profit;
        summary.total_pieces += project.result.layout.total_pieces;
    }
    if summary.total_projects > 0 {
        summary.avg_ticket = summary.total_value / summary.total_projects as f64;
    }
    if summary.total_cost > 0.0 {
        summary.avg_profit_margin_percent = summary.total_profit / summary.total_cost * 100.0;
    }
    summary
}

fn shape_usage_of(projects: &[&SavedProject]) -> Vec<ShapeUsage> {
    let mut pieces: HashMap<&str, u64> = HashMap::new();
    for project in projects {
        for row in &project.result.layout.per_item {
            *pieces.entry(row.shape_name.as_str()).or_default() += u64::from(row.quantity);
        }
    }

    let mut usage: Vec<ShapeUsage> = pieces
        .into_iter()
        .map(|(name, pieces)| ShapeUsage {
            name: name.to_string(),
            pieces,
        })
        .collect();
    usage.sort_by(|a, b| b.pieces.cmp(&a.pieces).then_with(|| a.name.cmp(&b.name)));
    usage.truncate(TOP_SHAPES);
    usage
}

fn value_ranges_of(projects: &[&SavedProject]) -> Vec<ValueRange> {
    let mut counts = [0usize; VALUE_RANGE_BOUNDS.len() + 1];
    for project in projects {
        let value = project.result.cost.total_sell_price;
        let bucket = VALUE_RANGE_BOUNDS
            .iter()
            .position(|bound| value <= *bound)
            .unwrap_or(VALUE_RANGE_BOUNDS.len());
        counts[bucket] += 1;
    }

    counts
        .iter()
        .enumerate()
        .map(|(i, count)| ValueRange {
            above: i.checked_sub(1).map(|j| VALUE_RANGE_BOUNDS[j]),
            up_to: VALUE_RANGE_BOUNDS.get(i).copied(),
            count: *count,
        })
        .collect()
}

/// Catalog entries with a measure in `[from, below)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasureRange {
    pub from: f64,
    /// `None` for the last, open bucket
    pub below: Option<f64>,
    pub count: usize,
}

/// Overview of one measure (shape area or roll width) across a catalog.
///
/// All figures are 0 for an empty catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub average: f64,
    pub largest: f64,
    pub smallest: f64,
    pub distribution: Vec<MeasureRange>,
}

/// Area statistics of a shape catalog
pub fn shape_stats<'a, I>(shapes: I) -> CatalogStats
where
    I: IntoIterator<Item = &'a Shape>,
{
    catalog_stats(shapes.into_iter().map(Shape::area), &SHAPE_AREA_BOUNDS)
}

/// Width statistics of a roll catalog
pub fn roll_stats<'a, I>(rolls: I) -> CatalogStats
where
    I: IntoIterator<Item = &'a Roll>,
{
    catalog_stats(rolls.into_iter().map(|roll| roll.width), &ROLL_WIDTH_BOUNDS)
}

fn catalog_stats(measures: impl Iterator<Item = f64>, bounds: &[f64]) -> CatalogStats {
    let measures: Vec<f64> = measures.collect();

    let mut distribution: Vec<MeasureRange> = std::iter::once(0.0)
        .chain(bounds.iter().copied())
        .enumerate()
        .map(|(i, from)| MeasureRange {
            from,
            below: bounds.get(i).copied(),
            count: 0,
        })
        .collect();
    for measure in &measures {
        let bucket = bounds.iter().take_while(|bound| *measure >= **bound).count();
        distribution[bucket].count += 1;
    }

    if measures.is_empty() {
        return CatalogStats {
            total: 0,
            average: 0.0,
            largest: 0.0,
            smallest: 0.0,
            distribution,
        };
    }
    CatalogStats {
        total: measures.len(),
        average: measures.iter().sum::<f64>() / measures.len() as f64,
        largest: measures.iter().copied().fold(f64::MIN, f64::max),
        smallest: measures.iter().copied().fold(f64::MAX, f64::min),
        distribution,
    }
}
