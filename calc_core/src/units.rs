//! # Unit Conventions
//!
//! The engine itself never converts units. Shape and roll widths share one
//! linear unit; the roll length and every derived length share another
//! (possibly the same) unit. Requests declare both with a
//! [`UnitConvention`], and shape heights are converted into the length unit
//! exactly once, before planning.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{LengthUnit, UnitConvention};
//!
//! // Shapes measured in centimetres, roll length sold in metres
//! let units = UnitConvention::new(LengthUnit::Centimeters, LengthUnit::Meters);
//! assert!((units.height_to_length_unit(25.0) - 0.25).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// Linear unit of measure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    #[serde(rename = "mm")]
    Millimeters,
    #[default]
    #[serde(rename = "cm")]
    Centimeters,
    #[serde(rename = "m")]
    Meters,
    #[serde(rename = "in")]
    Inches,
    #[serde(rename = "ft")]
    Feet,
}

impl LengthUnit {
    /// Length of one unit in millimetres
    pub fn millimeters(self) -> f64 {
        match self {
            LengthUnit::Millimeters => 1.0,
            LengthUnit::Centimeters => 10.0,
            LengthUnit::Meters => 1000.0,
            LengthUnit::Inches => 25.4,
            LengthUnit::Feet => 304.8,
        }
    }

    /// Convert `value` expressed in `self` into `to`.
    pub fn convert(self, value: f64, to: LengthUnit) -> f64 {
        if self == to {
            return value;
        }
        value * self.millimeters() / to.millimeters()
    }

    /// Short symbol for display
    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Meters => "m",
            LengthUnit::Inches => "in",
            LengthUnit::Feet => "ft",
        }
    }
}

/// Units used by one estimate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UnitConvention {
    /// Unit of shape width/height and roll width
    pub width_unit: LengthUnit,
    /// Unit of roll length and all consumed lengths
    pub length_unit: LengthUnit,
}

impl UnitConvention {
    pub fn new(width_unit: LengthUnit, length_unit: LengthUnit) -> Self {
        UnitConvention {
            width_unit,
            length_unit,
        }
    }

    /// True when no conversion is needed
    pub fn is_uniform(&self) -> bool {
        self.width_unit == self.length_unit
    }

    /// Shape heights are laid along the roll length, so they move into the length unit.
    pub fn height_to_length_unit(&self, height: f64) -> f64 {
        self.width_unit.convert(height, self.length_unit)
    }
}
