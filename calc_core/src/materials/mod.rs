//! # Materials
//!
//! The two physical inputs of an estimate:
//!
//! - [`Roll`] - the stock: a fixed width, a usable length and a price for that length
//! - [`Shape`] - a rectangular cutout ("mold") laid out across the roll
//!
//! Both are immutable value objects. Widths share one linear unit; see
//! [`crate::units`] for how heights relate to roll length.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::materials::{Roll, Shape};
//!
//! let roll = Roll::new("Sublimation paper 100cm", 100.0, 50.0, 500.0);
//! let shape = Shape::new("Mug wrap", 25.0, 10.0);
//!
//! assert!(roll.validate().is_ok());
//! assert_eq!(shape.area(), 250.0);
//! ```

pub mod roll;
pub mod shape;

pub use roll::Roll;
pub use shape::Shape;
