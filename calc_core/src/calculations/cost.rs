//! # Cost Engine
//!
//! Turns a [`LayoutResult`] into cost, price and profit figures.
//!
//! ```text
//! material_cost_per_unit_length = roll.price / roll.length
//! total_material_cost           = total_length_consumed * material_cost_per_unit_length
//! total_cost                    = total_material_cost + additional_cost
//! cost_per_piece                = total_cost / total_pieces
//! sell_price_per_piece          = cost_per_piece * (1 + margin / 100)
//! total_sell_price              = total_cost * (1 + margin / 100)
//! total_profit                  = total_sell_price - total_cost
//! ```
//!
//! No rounding happens here; round for display only.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::cost::{evaluate, CommercialParameters};
//! use calc_core::calculations::layout::{plan_all, LineItem};
//! use calc_core::materials::{Roll, Shape};
//!
//! let roll = Roll::new("Paper", 100.0, 50.0, 500.0);
//! let layout = plan_all(&[LineItem::new(Shape::new("Mug", 25.0, 10.0), 12)], roll.width).unwrap();
//! let cost = evaluate(&layout, &roll, &CommercialParameters::new(30.0, 0.0)).unwrap();
//!
//! assert!((cost.total_cost - 300.0).abs() < 1e-9);
//! assert!((cost.total_profit - 90.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::layout::LayoutResult;
use crate::errors::{CalcError, CalcResult};
use crate::materials::Roll;
use crate::numeric::{ensure_finite_non_negative, require_non_negative};

/// Commercial inputs of an estimate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CommercialParameters {
    /// Markup over cost, in percent (30.0 = 30%)
    #[serde(alias = "profitMarginPercent")]
    pub profit_margin_percent: f64,

    /// Flat cost added to the material cost (labour, ink, shipping...)
    #[serde(alias = "additionalCost")]
    pub additional_cost: f64,
}

impl CommercialParameters {
    pub fn new(profit_margin_percent: f64, additional_cost: f64) -> Self {
        CommercialParameters {
            profit_margin_percent,
            additional_cost,
        }
    }

    /// Both values may be zero but never negative or non-finite.
    pub fn validate(&self) -> CalcResult<()> {
        require_non_negative("commercial parameters", "profit_margin_percent", self.profit_margin_percent)?;
        require_non_negative("commercial parameters", "additional_cost", self.additional_cost)?;
        Ok(())
    }

    /// Price multiplier, `1 + margin / 100`
    pub fn markup(&self) -> f64 {
        1.0 + self.profit_margin_percent / 100.0
    }
}

/// Cost and pricing figures. Every field is finite and non-negative.
///
/// `total_sell_price` is `total_cost * markup`, so `total_profit` is exactly
/// zero at a zero margin. It can differ from `sell_price_per_piece *
/// total_pieces` in the last bits; use `total_sell_price` for totals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostResult {
    pub material_cost_per_unit_length: f64,
    pub total_material_cost: f64,
    pub total_cost: f64,
    pub cost_per_piece: f64,
    pub sell_price_per_piece: f64,
    pub total_sell_price: f64,
    pub total_profit: f64,
}

impl CostResult {
    /// Profit as a percentage of total cost (0 when the cost is 0)
    pub fn profit_over_cost_percent(&self) -> f64 {
        if self.total_cost > 0.0 {
            self.total_profit / self.total_cost * 100.0
        } else {
            0.0
        }
    }
}

/// Price a layout cut from `roll`.
///
/// # Errors
///
/// * `InvalidDimension` - bad roll or commercial parameters
/// * `InsufficientMaterial` - the layout is longer than the roll (equal length is fine)
/// * `NoPiecesToCost` - the layout has no pieces
/// * `CalculationOverflow` - a derived figure is NaN, infinite or negative
pub fn evaluate(
    layout: &LayoutResult,
    roll: &Roll,
    params: &CommercialParameters,
) -> CalcResult<CostResult> {
    roll.validate()?;
    params.validate()?;

    let required = ensure_finite_non_negative("total_length_consumed", layout.total_length_consumed)?;
    if required > roll.length {
        return Err(CalcError::insufficient_material(required, roll.length));
    }

    let material_cost_per_unit_length =
        ensure_finite_non_negative("material_cost_per_unit_length", roll.price / roll.length)?;
    let total_material_cost = ensure_finite_non_negative(
        "total_material_cost",
        required * material_cost_per_unit_length,
    )?;
    let total_cost =
        ensure_finite_non_negative("total_cost", total_material_cost + params.additional_cost)?;

    if layout.total_pieces == 0 {
        return Err(CalcError::NoPiecesToCost);
    }
    let pieces = layout.total_pieces as f64;
    let markup = params.markup();

    let cost_per_piece = ensure_finite_non_negative("cost_per_piece", total_cost / pieces)?;
    let sell_price_per_piece =
        ensure_finite_non_negative("sell_price_per_piece", cost_per_piece * markup)?;
    // Scaling the total directly keeps a zero margin at exactly zero profit;
    // (total / n) * n does not always round-trip.
    let total_sell_price = ensure_finite_non_negative("total_sell_price", total_cost * markup)?;
    let total_profit = ensure_finite_non_negative("total_profit", total_sell_price - total_cost)?;

    Ok(CostResult {
        material_cost_per_unit_length,
        total_material_cost,
        total_cost,
        cost_per_piece,
        sell_price_per_piece,
        total_sell_price,
        total_profit,
    })
}
