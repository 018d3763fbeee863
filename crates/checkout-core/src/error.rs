//! # Error Types
//!
//! Domain-specific error types for checkout-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  checkout-core errors (this file)                                      │
//! │  ├── CoreError        - Pricing / catalog failures                     │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  checkout-config errors (separate crate)                               │
//! │  └── ConfigError      - File, parse and env failures                   │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ConfigError → price-cart output   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Absent carts and absent offer tables are NOT errors; they are treated
//! as empty before pricing starts.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing and catalog errors.
///
/// Validation failures are raised while normalizing input, before any line
/// is priced. The engine never hands back a partial receipt.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A scanned SKU has no entry in the price list.
    ///
    /// ## User Workflow
    /// ```text
    /// Scan "Z"
    ///      │
    ///      ▼
    /// PriceList lookup: missing
    ///      │
    ///      ▼
    /// SkuNotPriced("Z")
    /// ```
    #[error("SKU not priced: {0}")]
    SkuNotPriced(String),

    /// An offer tier failed validation when added to an offer table.
    #[error("Invalid offer for {sku}: {source}")]
    InvalidOffer {
        sku: String,
        #[source]
        source: ValidationError,
    },

    /// A quantity or amount for `sku` does not fit in 64 bits.
    ///
    /// Only raised when the arithmetic actually overflows; there are no
    /// caps on cart size, quantities or prices.
    #[error("Arithmetic overflow while pricing {sku}")]
    Overflow { sku: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or more.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., two tiers with the same threshold).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::SkuNotPriced("Z".to_string());
        assert_eq!(err.to_string(), "SKU not priced: Z");

        let err = CoreError::Overflow {
            sku: "A".to_string(),
        };
        assert_eq!(err.to_string(), "Arithmetic overflow while pricing A");
    }

    #[test]
    fn test_invalid_offer_message_includes_source() {
        let err = CoreError::InvalidOffer {
            sku: "A".to_string(),
            source: ValidationError::Duplicate {
                field: "threshold_quantity".to_string(),
                value: "3".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "Invalid offer for A: threshold_quantity '3' already exists"
        );
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
