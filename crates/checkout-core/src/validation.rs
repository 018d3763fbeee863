//! # Validation Module
//!
//! Input validation for carts, price lists and offer tables.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Validation Runs                              │
//! │                                                                         │
//! │  OfferTable::insert ──► validate_sku, validate_threshold,              │
//! │                         validate_price                                  │
//! │                                                                         │
//! │  PriceList::insert ───► validate_sku, validate_price                   │
//! │                                                                         │
//! │  Engine normalize ────► per line: validate_line_sku,                   │
//! │                         validate_price, validate_line_quantity          │
//! │                                                                         │
//! │  No caps on cart size, quantity or price: overflow is detected by       │
//! │  checked arithmetic while pricing.                                      │
//! │                                                                         │
//! │  Validation fails fast, before any line is priced.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use checkout_core::validation::{validate_sku, validate_threshold};
//!
//! assert!(validate_sku("COKE-330").is_ok());
//! assert!(validate_threshold(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum SKU length in characters, for price lists and offer tables.
const MAX_SKU_LEN: usize = 50;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU entered into a price list or offer table.
///
/// ## Rules
/// - Must not be empty or blank
/// - At most 50 characters (not bytes)
/// - No leading or trailing whitespace, no control characters
///
/// ```rust
/// use checkout_core::validation::validate_sku;
///
/// assert!(validate_sku("A").is_ok());
/// assert!(validate_sku("Coke 330ml").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku(" A").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    if sku.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.chars().count() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if sku.trim() != sku {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must not start or end with whitespace".to_string(),
        });
    }

    if sku.chars().any(char::is_control) {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must not contain control characters".to_string(),
        });
    }

    Ok(())
}

/// Validates the SKU on a cart line. Any non-empty string is accepted.
pub fn validate_line_sku(sku: &str) -> ValidationResult<()> {
    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the quantity on a cart line.
///
/// ## Rules
/// - Zero is allowed (contributes nothing)
/// - Must not be negative
pub fn validate_line_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::Negative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates an offer tier threshold.
///
/// ## Rules
/// - Must be positive (> 0); a zero threshold would never consume units
pub fn validate_threshold(threshold: i64) -> ValidationResult<()> {
    if threshold <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "threshold_quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a unit or bundle price.
///
/// Must be non-negative; zero is allowed (free items, free bundles).
///
/// ```rust
/// use checkout_core::money::Money;
/// use checkout_core::validation::validate_price;
///
/// assert!(validate_price("unit_price", Money::from_cents(1099)).is_ok());
/// assert!(validate_price("unit_price", Money::zero()).is_ok());
/// assert!(validate_price("unit_price", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
