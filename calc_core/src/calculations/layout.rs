//! # Layout Planner
//!
//! Shelf packing of rectangular shapes across a roll of fixed width.
//!
//! ## Model
//!
//! - Each row holds one shape type only, filled across the roll width
//! - Rows are stacked end-to-end along the roll length
//! - Shapes are never rotated and never share a row with another type
//!
//! For one line item:
//!
//! ```text
//! shapes_across   = floor(roll_width / shape.width)
//! rows_for_item   = ceil(quantity / shapes_across)
//! length_consumed = rows_for_item * shape.height
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::layout::plan_item;
//! use calc_core::materials::Shape;
//!
//! let row = plan_item(&Shape::new("Label", 30.0, 20.0), 7, 100.0).unwrap();
//! assert_eq!(row.shapes_across, 3);
//! assert_eq!(row.rows_for_item, 3);
//! assert_eq!(row.length_consumed, 60.0);
//! ```

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
use crate::materials::Shape;
use crate::numeric::{ensure_finite_non_negative, require_positive};

/// A request to cut `quantity` pieces of `shape`.
///
/// ## JSON Example
///
/// ```json
/// { "shape": { "name": "Mug wrap", "width": 25.0, "height": 10.0 }, "quantity": 12 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub shape: Shape,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(shape: Shape, quantity: u32) -> Self {
        LineItem { shape, quantity }
    }
}

/// Layout of a single line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRow {
    /// Catalog id of the shape, if it came from a catalog
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape_id: Option<Uuid>,

    /// Shape name as requested
    pub shape_name: String,

    /// Pieces requested
    pub quantity: u32,

    /// Copies that fit across the roll width (always >= 1)
    pub shapes_across: u64,

    /// Rows dedicated to this shape (always >= 1)
    pub rows_for_item: u64,

    /// Roll length used by those rows
    pub length_consumed: f64,

    /// Total area of the pieces themselves (width x height x quantity)
    pub shape_area: f64,
}

/// Aggregate layout for all line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutResult {
    /// One row per line item, in request order
    pub per_item: Vec<LayoutRow>,

    /// Sum of quantities
    pub total_pieces: u64,

    /// Sum of per-item consumed lengths
    pub total_length_consumed: f64,

    /// Sum of per-item shape areas
    pub total_shape_area: f64,
}

impl LayoutResult {
    /// Total number of rows across all items
    pub fn total_rows(&self) -> u64 {
        self.per_item.iter().map(|row| row.rows_for_item).sum()
    }
}

/// Plan a single line item against a roll width.
///
/// # Errors
///
/// * `InvalidDimension` - non-positive or non-finite dimension, or zero quantity
/// * `ShapeExceedsRollWidth` - the shape is wider than the roll (no rotation is tried)
/// * `CalculationOverflow` - the layout figures are not representable
pub fn plan_item(shape: &Shape, quantity: u32, roll_width: f64) -> CalcResult<LayoutRow> {
    shape.validate()?;
    require_positive("roll", "width", roll_width)?;
    if quantity == 0 {
        return Err(CalcError::invalid_dimension(
            shape.label(),
            "quantity",
            quantity.to_string(),
            "Quantity must be at least 1",
        ));
    }

    let across = (roll_width / shape.width).floor();
    if across < 1.0 {
        return Err(CalcError::ShapeExceedsRollWidth {
            shape: shape.name.clone(),
            shape_width: shape.width,
            roll_width,
        });
    }
    // `as u64` saturates, so anything at or past the limit is unrepresentable
    if !across.is_finite() || across >= u64::MAX as f64 {
        return Err(CalcError::calculation_overflow("shapes_across", across));
    }
    let shapes_across = across as u64;

    let rows_for_item = u64::from(quantity).div_ceil(shapes_across);
    let length_consumed =
        ensure_finite_non_negative("length_consumed", rows_for_item as f64 * shape.height)?;
    let shape_area = ensure_finite_non_negative("shape_area", shape.area() * f64::from(quantity))?;

    log::debug!(
        "planned {}: {} across, {} rows, length {}",
        shape.label(),
        shapes_across,
        rows_for_item,
        length_consumed
    );

    Ok(LayoutRow {
        shape_id: shape.id,
        shape_name: shape.name.clone(),
        quantity,
        shapes_across,
        rows_for_item,
        length_consumed,
        shape_area,
    })
}

/// Plan every line item and aggregate the totals.
///
/// Rows are never shared between items, so the totals do not depend on
/// item order.
pub fn plan_all(items: &[LineItem], roll_width: f64) -> CalcResult<LayoutResult> {
    if items.is_empty() {
        return Err(CalcError::EmptyLineItems);
    }

    let per_item = items
        .iter()
        .map(|item| plan_item(&item.shape, item.quantity, roll_width))
        .collect::<CalcResult<Vec<_>>>()?;

    let total_pieces = per_item.iter().map(|row| u64::from(row.quantity)).sum();
    let total_length_consumed = ensure_finite_non_negative(
        "total_length_consumed",
        per_item.iter().map(|row| row.length_consumed).sum(),
    )?;
    let total_shape_area = ensure_finite_non_negative(
        "total_shape_area",
        per_item.iter().map(|row| row.shape_area).sum(),
    )?;

    Ok(LayoutResult {
        per_item,
        total_pieces,
        total_length_consumed,
        total_shape_area,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label() -> Shape {
        Shape::new("Label", 30.0, 20.0)
    }

    #[test]
    fn test_packing_exactness() {
        let row = plan_item(&label(), 7, 100.0).unwrap();
        assert_eq!(row.shapes_across, 3);
        assert_eq!(row.rows_for_item, 3);
        assert_eq!(row.length_consumed, 60.0);
        assert_eq!(row.shape_area, 30.0 * 20.0 * 7.0);
    }

    #[test]
    fn test_exact_fit_width() {
        let row = plan_item(&Shape::new("Full", 100.0, 5.0), 4, 100.0).unwrap();
        assert_eq!(row.shapes_across, 1);
        assert_eq!(row.rows_for_item, 4);
    }

    #[test]
    fn test_shape_wider_than_roll() {
        let err = plan_item(&Shape::new("Banner", 120.0, 50.0), 1, 100.0).unwrap_err();
        assert_eq!(
            err,
            CalcError::ShapeExceedsRollWidth {
                shape: "Banner".to_string(),
                shape_width: 120.0,
                roll_width: 100.0,
            }
        );
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let err = plan_item(&label(), 0, 100.0).unwrap_err();
        assert!(matches!(err, CalcError::InvalidDimension { ref field, .. } if field == "quantity"));
    }

    #[test]
    fn test_invalid_roll_width() {
        assert!(plan_item(&label(), 1, 0.0).is_err());
        assert!(plan_item(&label(), 1, f64::NAN).is_err());
    }

    #[test]
    fn test_unrepresentable_across_count() {
        let err = plan_item(&Shape::new("Dust", 1e-300, 1.0), 1, 1e300).unwrap_err();
        assert!(matches!(err, CalcError::CalculationOverflow { .. }));
    }

    #[test]
    fn test_plan_all_totals() {
        let items = vec![
            LineItem::new(label(), 7),
            LineItem::new(Shape::new("Tag", 25.0, 10.0), 12),
        ];
        let layout = plan_all(&items, 100.0).unwrap();

        assert_eq!(layout.per_item.len(), 2);
        assert_eq!(layout.total_pieces, 19);
        assert_eq!(layout.total_length_consumed, 60.0 + 30.0);
        assert_eq!(layout.total_shape_area, 4200.0 + 3000.0);
        assert_eq!(layout.total_rows(), 6);
    }

    #[test]
    fn test_plan_all_order_independent() {
        let a = LineItem::new(label(), 7);
        let b = LineItem::new(Shape::new("Tag", 25.0, 10.0), 12);
        let forward = plan_all(&[a.clone(), b.clone()], 100.0).unwrap();
        let reverse = plan_all(&[b, a], 100.0).unwrap();

        assert_eq!(forward.total_pieces, reverse.total_pieces);
        assert_eq!(forward.total_length_consumed, reverse.total_length_consumed);
        assert_eq!(forward.total_shape_area, reverse.total_shape_area);
    }

    #[test]
    fn test_plan_all_empty() {
        assert_eq!(plan_all(&[], 100.0).unwrap_err(), CalcError::EmptyLineItems);
    }

    #[test]
    fn test_plan_all_propagates_item_error() {
        let items = vec![
            LineItem::new(label(), 1),
            LineItem::new(Shape::new("Banner", 150.0, 10.0), 1),
        ];
        assert!(matches!(
            plan_all(&items, 100.0),
            Err(CalcError::ShapeExceedsRollWidth { .. })
        ));
    }

    #[test]
    fn test_serialization() {
        let row = plan_item(&label(), 7, 100.0).unwrap();
        let json = serde_json::to_string_pretty(&row).unwrap();
        assert!(!json.contains("shape_id"));
        let roundtrip: LayoutRow = serde_json::from_str(&json).unwrap();
        assert_eq!(row, roundtrip);
    }
}
