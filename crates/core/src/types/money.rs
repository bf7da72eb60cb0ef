//! Type-safe money representation using decimal arithmetic.
//!
//! The Storefront API sends amounts as decimal strings (`"45.0"`), so they
//! are parsed straight into [`Decimal`] and never pass through `f64`.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when parsing money from API payloads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
}

/// ISO 4217 currency codes.
///
/// Codes the shop doesn't sell in deserialize to [`CurrencyCode::Other`] and
/// render without a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
    #[serde(other)]
    Other,
}

impl CurrencyCode {
    /// Parse a currency code as returned by the Storefront API.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.to_ascii_uppercase().as_str() {
            "USD" => Self::USD,
            "EUR" => Self::EUR,
            "GBP" => Self::GBP,
            "CAD" => Self::CAD,
            "AUD" => Self::AUD,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
            Self::Other => "",
        }
    }
}

/// A monetary amount with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Zero in the given currency.
    #[must_use]
    pub const fn zero(currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Parse an API `MoneyV2` pair (`amount`, `currencyCode`).
    ///
    /// # Errors
    ///
    /// Returns `MoneyError::InvalidAmount` if `amount` is not a decimal.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, MoneyError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| MoneyError::InvalidAmount(amount.to_string()))?;
        Ok(Self::new(amount, CurrencyCode::from_code(currency_code)))
    }

    /// Unit price multiplied by a quantity.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self::new(self.amount * Decimal::from(quantity), self.currency_code)
    }

    /// Sum of two amounts, keeping the left-hand currency.
    #[must_use]
    pub fn plus(self, other: Self) -> Self {
        Self::new(self.amount + other.amount, self.currency_code)
    }

    /// Format for display with two decimal places (e.g., "$19.90").
    #[must_use]
    pub fn display(&self) -> String {
        format!(
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Whether a sale price sits below its compare-at price.
///
/// Drives the strike-through price on product pages; a missing or equal
/// compare-at price never renders as a sale.
#[must_use]
pub fn compare_price(price: &Money, compare_at: Option<&Money>) -> bool {
    compare_at.is_some_and(|compare_at| {
        compare_at.currency_code == price.currency_code && price.amount < compare_at.amount
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pads_to_two_decimals() {
        let money = Money::parse("45.0", "USD").unwrap();
        assert_eq!(money.display(), "$45.00");

        let money = Money::parse("45.5", "GBP").unwrap();
        assert_eq!(money.display(), "£45.50");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(
            Money::parse("forty", "USD"),
            Err(MoneyError::InvalidAmount("forty".to_string()))
        );
    }

    #[test]
    fn test_unknown_currency_has_no_symbol() {
        let money = Money::parse("10", "JPY").unwrap();
        assert_eq!(money.currency_code, CurrencyCode::Other);
        assert_eq!(money.display(), "10.00");
    }

    #[test]
    fn test_times_multiplies_unit_price() {
        let unit = Money::parse("19.95", "USD").unwrap();
        assert_eq!(unit.times(3).display(), "$59.85");
        assert_eq!(unit.times(0).amount, Decimal::ZERO);
    }

    #[test]
    fn test_compare_price() {
        let price = Money::parse("40.00", "USD").unwrap();
        let higher = Money::parse("55.00", "USD").unwrap();
        let equal = Money::parse("40", "USD").unwrap();

        assert!(compare_price(&price, Some(&higher)));
        assert!(!compare_price(&price, Some(&equal)));
        assert!(!compare_price(&price, None));
    }
}
