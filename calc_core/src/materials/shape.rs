//! Rectangular cutout shapes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CalcResult;
use crate::numeric::require_positive;

/// A rectangular shape ("mold") to be cut from a roll.
///
/// ## JSON Example
///
/// ```json
/// { "name": "Mug wrap", "width": 25.0, "height": 10.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Catalog id, absent for ad hoc shapes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Display name (e.g., "Mug wrap", "A4 shirt print")
    #[serde(default)]
    pub name: String,

    /// Extent across the roll, in the roll's width unit
    pub width: f64,

    /// Extent along the roll
    pub height: f64,
}

impl Shape {
    /// Create an ad hoc shape without a catalog id.
    pub fn new(name: impl Into<String>, width: f64, height: f64) -> Self {
        Shape {
            id: None,
            name: name.into(),
            width,
            height,
        }
    }

    /// Name used in error messages
    pub fn label(&self) -> String {
        if self.name.is_empty() {
            "shape".to_string()
        } else {
            format!("shape '{}'", self.name)
        }
    }

    /// Validate that both dimensions are finite and positive.
    pub fn validate(&self) -> CalcResult<()> {
        let label = self.label();
        require_positive(&label, "width", self.width)?;
        require_positive(&label, "height", self.height)?;
        Ok(())
    }

    /// Area of one piece (width x height)
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalcError;

    #[test]
    fn test_validate_rejects_zero_height() {
        let shape = Shape::new("Coaster", 10.0, 0.0);
        match shape.validate() {
            Err(CalcError::InvalidDimension { subject, field, .. }) => {
                assert_eq!(subject, "shape 'Coaster'");
                assert_eq!(field, "height");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_nan_width() {
        assert!(Shape::new("Bad", f64::NAN, 10.0).validate().is_err());
    }

    #[test]
    fn test_deserialize_without_id() {
        let shape: Shape = serde_json::from_str(r#"{"name":"Mug","width":25,"height":10}"#).unwrap();
        assert_eq!(shape.id, None);
        assert_eq!(shape.width, 25.0);
    }
}
