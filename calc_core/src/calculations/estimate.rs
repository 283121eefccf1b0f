//! # Estimate
//!
//! The request/response boundary of the engine: validate a full request,
//! normalize units once, plan the layout, price it, and derive the usage
//! figures shown on a quote.
//!
//! ## Example (LLM-friendly)
//!
//! ```rust
//! use calc_core::calculations::estimate::{calculate, EstimateInput};
//!
//! let input = EstimateInput::from_json(r#"{
//!     "roll": { "width": 100, "length": 50, "price": 500 },
//!     "items": [ { "shape": { "name": "Mug", "width": 25, "height": 10 }, "quantity": 12 } ],
//!     "profit_margin_percent": 30,
//!     "additional_cost": 0
//! }"#).unwrap();
//!
//! let result = calculate(&input).unwrap();
//! assert_eq!(result.layout.per_item[0].shapes_across, 4);
//! assert!((result.cost.total_sell_price - 390.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::cost::{evaluate, CommercialParameters, CostResult};
use crate::calculations::layout::{plan_all, LayoutResult, LineItem};
use crate::errors::{CalcError, CalcResult};
use crate::materials::Roll;
use crate::numeric::ensure_finite_non_negative;
use crate::units::UnitConvention;

/// A complete estimate request.
///
/// ## JSON Example
///
/// ```json
/// {
///   "roll": { "name": "Sublimation 100", "width": 100.0, "length": 50.0, "price": 500.0 },
///   "items": [
///     { "shape": { "name": "Mug wrap", "width": 25.0, "height": 10.0 }, "quantity": 12 }
///   ],
///   "profit_margin_percent": 30.0,
///   "additional_cost": 0.0,
///   "units": { "width_unit": "cm", "length_unit": "cm" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateInput {
    pub roll: Roll,

    pub items: Vec<LineItem>,

    #[serde(flatten)]
    pub params: CommercialParameters,

    /// Omitted means widths and lengths share one unit
    #[serde(default)]
    pub units: UnitConvention,
}

impl EstimateInput {
    pub fn new(roll: Roll, items: Vec<LineItem>, params: CommercialParameters) -> Self {
        EstimateInput {
            roll,
            items,
            params,
            units: UnitConvention::default(),
        }
    }

    pub fn with_units(mut self, units: UnitConvention) -> Self {
        self.units = units;
        self
    }

    /// Parse a request from JSON.
    ///
    /// Structurally invalid requests (wrong types, missing fields) fail here
    /// with `SerializationError`; value checks happen in [`calculate`].
    pub fn from_json(json: &str) -> CalcResult<Self> {
        serde_json::from_str(json).map_err(CalcError::serialization)
    }

    /// Line items with heights expressed in the roll's length unit.
    fn normalized_items(&self) -> Vec<LineItem> {
        if self.units.is_uniform() {
            return self.items.clone();
        }
        self.items
            .iter()
            .map(|item| {
                let mut shape = item.shape.clone();
                shape.height = self.units.height_to_length_unit(shape.height);
                LineItem::new(shape, item.quantity)
            })
            .collect()
    }
}

/// Result of a successful estimate. All figures are finite and unrounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateResult {
    pub layout: LayoutResult,

    pub cost: CostResult,

    /// Roll area taken by the layout rows (width unit x length unit)
    pub roll_area_used: f64,

    /// Share of the used roll area covered by pieces, in percent
    pub utilization_percent: f64,

    /// Share of the roll length consumed, in percent
    pub length_usage_percent: f64,

    /// Roll length left after cutting
    pub remaining_length: f64,
}

/// Run a complete estimate.
///
/// # Returns
///
/// * `Ok(EstimateResult)` - layout, costs and usage figures
/// * `Err(CalcError)` - the first problem found; see [`CalcError`] for the kinds
pub fn calculate(input: &EstimateInput) -> CalcResult<EstimateResult> {
    let result = run(input);
    if let Err(e) = &result {
        if e.is_validation() {
            log::debug!("estimate rejected: {e}");
        } else {
            log::error!("estimate failed: {e}");
        }
    }
    result
}

fn run(input: &EstimateInput) -> CalcResult<EstimateResult> {
    input.roll.validate()?;
    input.params.validate()?;

    let items = input.normalized_items();
    let layout = plan_all(&items, input.roll.width)?;
    let cost = evaluate(&layout, &input.roll, &input.params)?;

    let roll_area_used = ensure_finite_non_negative(
        "roll_area_used",
        layout.total_length_consumed * input.roll.width,
    )?;
    let utilization_percent = ensure_finite_non_negative(
        "utilization_percent",
        layout.total_shape_area / roll_area_used * 100.0,
    )?;
    let length_usage_percent = ensure_finite_non_negative(
        "length_usage_percent",
        layout.total_length_consumed / input.roll.length * 100.0,
    )?;
    let remaining_length = ensure_finite_non_negative(
        "remaining_length",
        input.roll.length - layout.total_length_consumed,
    )?;

    Ok(EstimateResult {
        layout,
        cost,
        roll_area_used,
        utilization_percent,
        length_usage_percent,
        remaining_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::Shape;
    use crate::units::LengthUnit;

    fn mug_input(roll_length: f64) -> EstimateInput {
        EstimateInput::new(
            Roll::new("Paper", 100.0, roll_length, 500.0),
            vec![LineItem::new(Shape::new("Mug", 25.0, 10.0), 12)],
            CommercialParameters::new(30.0, 0.0),
        )
    }

    #[test]
    fn test_usage_figures() {
        let result = calculate(&mug_input(50.0)).unwrap();

        assert_eq!(result.roll_area_used, 3000.0);
        assert_eq!(result.utilization_percent, 100.0);
        assert!((result.length_usage_percent - 60.0).abs() < 1e-9);
        assert_eq!(result.remaining_length, 20.0);
    }

    #[test]
    fn test_partial_utilization() {
        // 3 across in 100 wide leaves 10 unused in every row
        let input = EstimateInput::new(
            Roll::new("Paper", 100.0, 50.0, 500.0),
            vec![LineItem::new(Shape::new("Label", 30.0, 20.0), 6)],
            CommercialParameters::default(),
        );
        let result = calculate(&input).unwrap();
        assert!((result.utilization_percent - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_height_normalized_to_length_unit() {
        // 25cm x 10cm shapes on a 100cm wide, 0.5m long roll
        let input = mug_input(0.5)
            .with_units(UnitConvention::new(LengthUnit::Centimeters, LengthUnit::Meters));
        let result = calculate(&input).unwrap();

        assert!((result.layout.total_length_consumed - 0.3).abs() < 1e-12);
        assert!((result.cost.material_cost_per_unit_length - 1000.0).abs() < 1e-9);
        assert!((result.cost.total_cost - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_unit_mismatch_without_convention_is_insufficient() {
        // Same numbers as above but no declared conversion: 30 > 0.5
        assert!(matches!(
            calculate(&mug_input(0.5)),
            Err(CalcError::InsufficientMaterial { .. })
        ));
    }

    #[test]
    fn test_invalid_roll_reported_before_layout() {
        let mut input = mug_input(50.0);
        input.roll.width = -1.0;
        input.items.clear();
        assert!(matches!(
            calculate(&input),
            Err(CalcError::InvalidDimension { ref field, .. }) if field == "width"
        ));
    }

    #[test]
    fn test_from_json_rejects_non_numeric_quantity() {
        let json = r#"{
            "roll": { "width": 100, "length": 50, "price": 500 },
            "items": [ { "shape": { "width": 25, "height": 10 }, "quantity": "twelve" } ],
            "profit_margin_percent": 30,
            "additional_cost": 0
        }"#;
        assert!(matches!(
            EstimateInput::from_json(json),
            Err(CalcError::SerializationError { .. })
        ));
    }

    #[test]
    fn test_from_json_accepts_camel_case_request() {
        let json = r#"{
            "roll": { "width": 100, "length": 50, "price": 500 },
            "items": [ { "shape": {"width": 25, "height": 10, "name": "Mug"}, "quantity": 12 } ],
            "profitMarginPercent": 30,
            "additionalCost": 0
        }"#;
        let input = EstimateInput::from_json(json).unwrap();
        assert_eq!(input.params, CommercialParameters::new(30.0, 0.0));
        assert_eq!(input.items[0].shape.name, "Mug");
        assert_eq!(input.units, UnitConvention::default());

        let result = calculate(&input).unwrap();
        assert!((result.cost.total_sell_price - 390.0).abs() < 1e-9);
    }

    #[test]
    fn test_json_roundtrip_keeps_flattened_params() {
        let input = mug_input(50.0);
        let json = serde_json::to_string(&input).unwrap();
        assert!(json.contains("\"profit_margin_percent\":30.0"));
        let roundtrip = EstimateInput::from_json(&json).unwrap();
        assert_eq!(input, roundtrip);
    }
}
