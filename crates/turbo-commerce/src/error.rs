//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in storefront domain operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Currency code not supported by the storefront.
    #[error("Unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// Locale tag not supported by the storefront.
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// Currency mismatch.
    #[error("Currency mismatch: expected {expected}, got {got}")]
    CurrencyMismatch { expected: String, got: String },

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,
}
