//! # Error Types
//!
//! Structured error types for calc_core. Every failure is a tagged variant
//! carrying the offending values as fields, so callers can build their own
//! messages (or HTTP status codes) without parsing prose.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::errors::{CalcError, CalcResult};
//!
//! fn validate_quantity(quantity: u32) -> CalcResult<()> {
//!     if quantity == 0 {
//!         return Err(CalcError::invalid_dimension(
//!             "line item",
//!             "quantity",
//!             quantity.to_string(),
//!             "Quantity must be at least 1",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for calc_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for estimate and workbook operations.
///
/// Serializes as `{"kind": "<Variant>", "details": {...}}`.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "details")]
pub enum CalcError {
    /// A shape, roll, quantity or commercial value is zero, negative or non-finite
    #[error("Invalid dimension for {subject} '{field}': {value} - {reason}")]
    InvalidDimension {
        subject: String,
        field: String,
        value: String,
        reason: String,
    },

    /// No line items were requested
    #[error("At least one line item is required")]
    EmptyLineItems,

    /// A single shape is wider than the roll.
    ///
    /// Only raised after both widths passed validation, so they are finite.
    #[error("Shape '{shape}' ({shape_width}) is wider than the roll ({roll_width})")]
    ShapeExceedsRollWidth {
        shape: String,
        shape_width: f64,
        roll_width: f64,
    },

    /// The layout needs more roll length than is available.
    ///
    /// `required` passes the finite guard before comparison and `available`
    /// is a validated roll length, so all three figures are finite.
    #[error("Insufficient material: required {required}, available {available} (short by {shortfall})")]
    InsufficientMaterial {
        required: f64,
        available: f64,
        shortfall: f64,
    },

    /// Costing was reached with zero pieces
    #[error("No pieces to cost")]
    NoPiecesToCost,

    /// A derived figure came out NaN, infinite or negative
    #[error("Calculation overflow in '{field}': {value}")]
    CalculationOverflow { field: String, value: String },

    /// A catalog or project entry does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Another catalog entry already uses this name
    #[error("{entity} named '{name}' already exists")]
    DuplicateName { entity: String, name: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl CalcError {
    /// Create an InvalidDimension error
    pub fn invalid_dimension(
        subject: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CalcError::InvalidDimension {
            subject: subject.into(),
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an InsufficientMaterial error; the shortfall is derived.
    pub fn insufficient_material(required: f64, available: f64) -> Self {
        CalcError::InsufficientMaterial {
            required,
            available,
            shortfall: required - available,
        }
    }

    /// Create a CalculationOverflow error
    pub fn calculation_overflow(field: impl Into<String>, value: f64) -> Self {
        CalcError::CalculationOverflow {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        CalcError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Create a DuplicateName error
    pub fn duplicate_name(entity: impl Into<String>, name: impl Into<String>) -> Self {
        CalcError::DuplicateName {
            entity: entity.into(),
            name: name.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CalcError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError
    pub fn serialization(reason: impl ToString) -> Self {
        CalcError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Expected, user-actionable outcome of bad input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidDimension { .. }
                | CalcError::EmptyLineItems
                | CalcError::ShapeExceedsRollWidth { .. }
                | CalcError::InsufficientMaterial { .. }
                | CalcError::DuplicateName { .. }
        )
    }

    /// An invariant broke upstream; report it as a bug, not a user message.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CalcError::CalculationOverflow { .. } | CalcError::NoPiecesToCost
        )
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CalcError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidDimension { .. } => "INVALID_DIMENSION",
            CalcError::EmptyLineItems => "EMPTY_LINE_ITEMS",
            CalcError::ShapeExceedsRollWidth { .. } => "SHAPE_EXCEEDS_ROLL_WIDTH",
            CalcError::InsufficientMaterial { .. } => "INSUFFICIENT_MATERIAL",
            CalcError::NoPiecesToCost => "NO_PIECES_TO_COST",
            CalcError::CalculationOverflow { .. } => "CALCULATION_OVERFLOW",
            CalcError::NotFound { .. } => "NOT_FOUND",
            CalcError::DuplicateName { .. } => "DUPLICATE_NAME",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::FileLocked { .. } => "FILE_LOCKED",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}
