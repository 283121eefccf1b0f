//! Material stock rolls.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CalcResult;
use crate::numeric::require_positive;

/// A roll of material stock.
///
/// ## JSON Example
///
/// ```json
/// { "name": "Sublimation 100", "width": 100.0, "length": 50.0, "price": 500.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roll {
    /// Catalog id, absent for ad hoc rolls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,

    /// Display name
    #[serde(default)]
    pub name: String,

    /// Fixed dimension across which shapes are laid out
    pub width: f64,

    /// Total usable length
    pub length: f64,

    /// Price of one full roll
    pub price: f64,
}

impl Roll {
    /// Create an ad hoc roll without a catalog id.
    pub fn new(name: impl Into<String>, width: f64, length: f64, price: f64) -> Self {
        Roll {
            id: None,
            name: name.into(),
            width,
            length,
            price,
        }
    }

    /// Validate that width, length and price are finite and positive.
    pub fn validate(&self) -> CalcResult<()> {
        require_positive("roll", "width", self.width)?;
        require_positive("roll", "length", self.length)?;
        require_positive("roll", "price", self.price)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CalcError;

    #[test]
    fn test_valid_roll() {
        assert!(Roll::new("R", 100.0, 50.0, 500.0).validate().is_ok());
    }

    #[test]
    fn test_zero_length_rejected() {
        let roll = Roll::new("R", 100.0, 0.0, 500.0);
        assert!(matches!(
            roll.validate(),
            Err(CalcError::InvalidDimension { ref field, .. }) if field == "length"
        ));
    }

    #[test]
    fn test_negative_price_rejected() {
        assert!(Roll::new("R", 100.0, 50.0, -1.0).validate().is_err());
    }
}
