//! # calc_core - Roll Layout & Cost Estimation Engine
//!
//! `calc_core` estimates how much of a fixed-width material roll a print job
//! consumes and what the job costs and sells for. All inputs and outputs are
//! JSON-serializable, so the engine sits comfortably behind an HTTP layer,
//! a CLI, or an AI assistant.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **JSON-First**: All types implement Serialize/Deserialize
//! - **Rich Errors**: Tagged error variants with the offending values, not strings
//! - **No silent fixes**: Invalid or non-finite numbers are reported, never clamped
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::calculations::{calculate, CommercialParameters, EstimateInput, LineItem};
//! use calc_core::materials::{Roll, Shape};
//!
//! let input = EstimateInput::new(
//!     Roll::new("Sublimation 100", 100.0, 50.0, 500.0),
//!     vec![LineItem::new(Shape::new("Mug wrap", 25.0, 10.0), 12)],
//!     CommercialParameters::new(30.0, 0.0),
//! );
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.layout.per_item[0].rows_for_item, 3);
//! assert!((result.cost.total_profit - 90.0).abs() < 1e-9);
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Layout planner, cost engine and the full estimate
//! - [`materials`] - Rolls and shapes
//! - [`units`] - Unit conventions and the single conversion point
//! - [`numeric`] - Shared input and output guards
//! - [`errors`] - Structured error types
//! - [`workbook`] - Shop catalog, settings and saved projects
//! - [`analytics`] - Reports over saved projects
//! - [`file_io`] - Workbook files with atomic saves and locking

pub mod analytics;
pub mod calculations;
pub mod errors;
pub mod file_io;
pub mod materials;
pub mod numeric;
pub mod units;
pub mod workbook;

// Re-export commonly used types at crate root for convenience
pub use calculations::{calculate, EstimateInput, EstimateResult};
pub use errors::{CalcError, CalcResult};
pub use file_io::{load_workbook, save_workbook, FileLock};
pub use workbook::{SavedProject, ShopSettings, Workbook};
