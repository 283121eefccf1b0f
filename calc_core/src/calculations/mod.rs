//! # Calculations
//!
//! The layout and cost engine. Each stage follows the same pattern:
//!
//! - plain input types (JSON-serializable)
//! - a `*Result` type (JSON-serializable)
//! - a pure function `fn(&input) -> CalcResult<*Result>`
//!
//! ## Stages
//!
//! - [`layout`] - how many shapes fit across the roll and how much length they use
//! - [`cost`] - material cost, total cost, sell price and profit
//! - [`estimate`] - the full request: validation, unit normalization, layout, cost
//!
//! Nothing here holds state, so every function is safe to call from any
//! number of threads at once.

pub mod cost;
pub mod estimate;
pub mod layout;

// Re-export commonly used types
pub use cost::{evaluate, CommercialParameters, CostResult};
pub use estimate::{calculate, EstimateInput, EstimateResult};
pub use layout::{plan_all, plan_item, LayoutResult, LayoutRow, LineItem};
