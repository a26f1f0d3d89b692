//! Defines the money value type and its currency-checked arithmetic.
//!
//! Amounts are stored as integer minor units (e.g. cents) so that repeated
//! addition and subtraction stay exact. Arithmetic across two different
//! currencies is an error, never an implicit conversion.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::Error;

/// An ISO 4217 currency code, e.g. "USD" or "NZD".
///
/// To create a `Currency` from user input, use [Currency::new] which validates
/// the code. [Currency::new_unchecked] skips validation and is intended for
/// values already known to be valid, such as rows read back from the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency(String);

impl Currency {
    /// Create a currency from a three letter ISO 4217 code.
    ///
    /// The code is upper-cased, so "usd" and "USD" produce the same currency.
    ///
    /// # Errors
    /// Returns an [Error::InvalidCurrency] if `code` is not three ASCII
    /// letters.
    pub fn new(code: &str) -> Result<Self, Error> {
        let code = code.trim();

        if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code.to_ascii_uppercase()))
        } else {
            Err(Error::InvalidCurrency(code.to_owned()))
        }
    }

    /// Create a currency without validating the code.
    pub fn new_unchecked(code: &str) -> Self {
        Self(code.to_owned())
    }

    /// The currency code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// An exact amount of money in a single currency.
///
/// Transaction amounts are always positive, direction is carried by the
/// debtor/creditor roles. Balances reuse this type and may be negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The amount in minor units (e.g. cents).
    pub minor_units: i64,
    /// The currency of the amount.
    pub currency: Currency,
}

impl Money {
    /// Create an amount of `minor_units` in `currency`.
    pub fn new(minor_units: i64, currency: Currency) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    /// The additive identity in `currency`.
    pub fn zero(currency: Currency) -> Self {
        Self {
            minor_units: 0,
            currency,
        }
    }

    /// Whether the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.minor_units > 0
    }

    /// Add `other` to this amount.
    ///
    /// # Errors
    /// Returns an [Error::CurrencyMismatch] if the two amounts are in
    /// different currencies.
    pub fn add(&self, other: &Money) -> Result<Money, Error> {
        self.check_currency(other)?;

        Ok(Money {
            minor_units: self.minor_units + other.minor_units,
            currency: self.currency.clone(),
        })
    }

    /// Subtract `other` from this amount. The result may be negative.
    ///
    /// # Errors
    /// Returns an [Error::CurrencyMismatch] if the two amounts are in
    /// different currencies.
    pub fn subtract(&self, other: &Money) -> Result<Money, Error> {
        self.check_currency(other)?;

        Ok(Money {
            minor_units: self.minor_units - other.minor_units,
            currency: self.currency.clone(),
        })
    }

    fn check_currency(&self, other: &Money) -> Result<(), Error> {
        if self.currency == other.currency {
            Ok(())
        } else {
            Err(Error::CurrencyMismatch {
                expected: self.currency.clone(),
                actual: other.currency.clone(),
            })
        }
    }
}

impl Display for Money {
    /// Render the amount as e.g. "15.00 USD". Assumes a two decimal currency.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.minor_units < 0 { "-" } else { "" };
        let cents = self.minor_units.unsigned_abs();

        write!(
            f,
            "{sign}{}.{:02} {}",
            cents / 100,
            cents % 100,
            self.currency
        )
    }
}


#[cfg(test)]
mod money_tests {
    use crate::Error;

    use super::{Currency, Money};

    fn usd(minor_units: i64) -> Money {
        Money::new(minor_units, Currency::new_unchecked("USD"))
    }

    #[test]
    fn add_sums_minor_units() {
        let total = usd(2000).add(&usd(550)).expect("Could not add amounts");

        assert_eq!(total, usd(2550));
    }

    #[test]
    fn add_fails_across_currencies() {
        let nzd = Money::new(500, Currency::new_unchecked("NZD"));

        let result = usd(2000).add(&nzd);

        assert_eq!(
            result,
            Err(Error::CurrencyMismatch {
                expected: Currency::new_unchecked("USD"),
                actual: Currency::new_unchecked("NZD"),
            })
        );
    }

    #[test]
    fn subtract_can_go_negative() {
        let balance = usd(500)
            .subtract(&usd(2000))
            .expect("Could not subtract amounts");

        assert_eq!(balance, usd(-1500));
        assert!(!balance.is_positive());
    }

    #[test]
    fn zero_has_no_value() {
        let zero = Money::zero(Currency::new_unchecked("USD"));

        assert_eq!(zero, usd(0));
        assert!(!zero.is_positive());
    }

    #[test]
    fn display_pads_minor_units() {
        assert_eq!(usd(1500).to_string(), "15.00 USD");
        assert_eq!(usd(-1500).to_string(), "-15.00 USD");
        assert_eq!(usd(205).to_string(), "2.05 USD");
        assert_eq!(usd(7).to_string(), "0.07 USD");
        assert_eq!(usd(0).to_string(), "0.00 USD");
    }
}
