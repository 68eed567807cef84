//! Money type for representing monetary values.
//!
//! Amounts stay in the currency's minor unit (cents) until they are
//! formatted for display.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommerceError;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    BRL,
    USD,
    EUR,
}

impl Currency {
    /// Get the currency code (e.g., "BRL").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::BRL => "BRL",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
        }
    }

    /// Get the currency symbol (e.g., "R$").
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::BRL => "R$",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
        }
    }

    /// Parse a currency code string (case-insensitive).
    pub fn from_code(code: &str) -> Result<Self, CommerceError> {
        match code.trim().to_uppercase().as_str() {
            "BRL" => Ok(Currency::BRL),
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            _ => Err(CommerceError::UnsupportedCurrency(code.to_string())),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Display locale for prices and copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Locale {
    /// Brazilian Portuguese: `R$ 1.234,50`.
    #[default]
    PtBr,
    /// US English: `$1,234.50`.
    EnUs,
}

impl Locale {
    /// Parse a BCP 47 tag (`pt-BR`, `en-US`, case-insensitive, `_` allowed).
    pub fn parse(tag: &str) -> Result<Self, CommerceError> {
        match tag.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "pt-br" => Ok(Locale::PtBr),
            "en-us" => Ok(Locale::EnUs),
            _ => Err(CommerceError::UnsupportedLocale(tag.to_string())),
        }
    }

    /// The BCP 47 tag, as used in `<html lang>`.
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::EnUs => "en-US",
        }
    }

    fn separators(&self) -> (char, char) {
        // (thousands, decimal)
        match self {
            Locale::PtBr => ('.', ','),
            Locale::EnUs => (',', '.'),
        }
    }

    fn symbol_spacing(&self) -> &'static str {
        match self {
            Locale::PtBr => " ",
            Locale::EnUs => "",
        }
    }
}

/// A monetary value with currency.
///
/// Amounts are stored in the smallest unit of the currency (e.g., cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in smallest currency unit (e.g., cents).
    pub amount_minor: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount_minor: i64, currency: Currency) -> Self {
        Self {
            amount_minor,
            currency,
        }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Add another Money value. Fails on currency mismatch or overflow.
    pub fn try_add(&self, other: &Money) -> Result<Money, CommerceError> {
        if self.currency != other.currency {
            return Err(CommerceError::CurrencyMismatch {
                expected: self.currency.code().to_string(),
                got: other.currency.code().to_string(),
            });
        }
        let amount = self
            .amount_minor
            .checked_add(other.amount_minor)
            .ok_or(CommerceError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Multiply by a quantity. Fails on overflow.
    pub fn try_multiply(&self, factor: i64) -> Result<Money, CommerceError> {
        let amount = self
            .amount_minor
            .checked_mul(factor)
            .ok_or(CommerceError::Overflow)?;
        Ok(Money::new(amount, self.currency))
    }

    /// Format for display: the amount divided by 100, grouped and
    /// punctuated per locale, with the currency symbol.
    ///
    /// ```
    /// use turbo_commerce::money::{Currency, Locale, Money};
    /// assert_eq!(Money::new(123450, Currency::BRL).format(Locale::PtBr), "R$ 1.234,50");
    /// assert_eq!(Money::new(123450, Currency::USD).format(Locale::EnUs), "$1,234.50");
    /// ```
    pub fn format(&self, locale: Locale) -> String {
        let (thousands, decimal) = locale.separators();
        let magnitude = self.amount_minor.unsigned_abs();
        let units = group_thousands(magnitude / 100, thousands);
        let cents = magnitude % 100;
        let sign = if self.amount_minor < 0 { "-" } else { "" };

        format!(
            "{}{}{}{}{}{:02}",
            sign,
            self.currency.symbol(),
            locale.symbol_spacing(),
            units,
            decimal,
            cents
        )
    }
}

fn group_thousands(value: u64, separator: char) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(c);
    }
    out
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(Locale::default()))
    }
}
