//! Money value object: an integer amount in the currency's smallest unit,
//! paired with a validated ISO 4217 currency code.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::errors::WalletError;

/// A validated 3-letter ISO 4217 currency code, stored upper-cased.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Currency(String);

impl Currency {
    pub fn new(code: impl Into<String>) -> Result<Self, WalletError> {
        let code = code.into().to_uppercase();
        if code.len() != 3 {
            return Err(WalletError::InvalidInput(format!(
                "currency code must be exactly 3 characters, got {:?}",
                code
            )));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The divisor relating the smallest representable unit to the display
    /// unit (e.g. 100 for USD cents, 1 for currencies with no subdivision).
    pub fn subdivision(&self) -> i64 {
        match self.0.as_str() {
            "TWD" | "JPY" | "KRW" | "VND" => 1,
            "USD" | "EUR" | "GBP" | "CNY" => 100,
            _ => 1,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An amount of money, in the smallest representable unit of its currency.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    /// Construct a non-negative amount of a given currency.
    pub fn new(amount: i64, currency: Currency) -> Result<Self, WalletError> {
        if amount < 0 {
            return Err(WalletError::InvalidInput(format!(
                "amount must be non-negative, got {}",
                amount
            )));
        }
        Ok(Self { amount, currency })
    }

    pub fn zero(currency: Currency) -> Self {
        Self { amount: 0, currency }
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> &Currency {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    fn require_same_currency(&self, other: &Money) -> Result<(), WalletError> {
        if self.currency != other.currency {
            return Err(WalletError::CurrencyMismatch {
                expected: self.currency.as_str().to_string(),
                actual: other.currency.as_str().to_string(),
            });
        }
        Ok(())
    }

    pub fn add(&self, other: &Money) -> Result<Money, WalletError> {
        self.require_same_currency(other)?;
        Ok(Money {
            amount: self.amount + other.amount,
            currency: self.currency.clone(),
        })
    }

    pub fn subtract(&self, other: &Money) -> Result<Money, WalletError> {
        self.require_same_currency(other)?;
        let result = self.amount - other.amount;
        if result < 0 {
            return Err(WalletError::NegativeResult);
        }
        Ok(Money {
            amount: result,
            currency: self.currency.clone(),
        })
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let divisor = self.currency.subdivision();
        if divisor == 1 {
            write!(f, "{} {}", self.amount, self.currency)
        } else {
            write!(
                f,
                "{}.{:02} {}",
                self.amount / divisor,
                self.amount % divisor,
                self.currency
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd(amount: i64) -> Money {
        Money::new(amount, Currency::new("usd").unwrap()).unwrap()
    }

    fn eur(amount: i64) -> Money {
        Money::new(amount, Currency::new("EUR").unwrap()).unwrap()
    }

    #[test]
    fn currency_must_be_three_characters() {
        assert!(Currency::new("US").is_err());
        assert!(Currency::new("USDD").is_err());
        assert!(Currency::new("").is_err());
    }

    #[test]
    fn currency_is_case_normalized() {
        assert_eq!(Currency::new("usd").unwrap().as_str(), "USD");
    }

    #[test]
    fn construction_rejects_negative_amount() {
        assert!(Money::new(-1, Currency::new("USD").unwrap()).is_err());
    }

    #[test]
    fn add_then_subtract_is_identity() {
        let m = usd(10_000);
        let n = usd(2_500);
        assert_eq!(m.add(&n).unwrap().subtract(&n).unwrap(), m);
    }

    #[test]
    fn add_rejects_currency_mismatch() {
        let err = usd(100).add(&eur(100)).unwrap_err();
        assert!(matches!(err, WalletError::CurrencyMismatch { .. }));
    }

    #[test]
    fn subtract_rejects_negative_result() {
        let err = usd(100).subtract(&usd(101)).unwrap_err();
        assert!(matches!(err, WalletError::NegativeResult));
    }

    #[test]
    fn subdivision_table_matches_spec() {
        assert_eq!(Currency::new("TWD").unwrap().subdivision(), 1);
        assert_eq!(Currency::new("JPY").unwrap().subdivision(), 1);
        assert_eq!(Currency::new("KRW").unwrap().subdivision(), 1);
        assert_eq!(Currency::new("VND").unwrap().subdivision(), 1);
        assert_eq!(Currency::new("USD").unwrap().subdivision(), 100);
        assert_eq!(Currency::new("EUR").unwrap().subdivision(), 100);
        assert_eq!(Currency::new("GBP").unwrap().subdivision(), 100);
        assert_eq!(Currency::new("CNY").unwrap().subdivision(), 100);
        assert_eq!(Currency::new("XYZ").unwrap().subdivision(), 1);
    }

    #[test]
    fn display_formats_by_subdivision() {
        assert_eq!(usd(123_45).to_string(), "123.45 USD");
        assert_eq!(
            Money::new(100, Currency::new("JPY").unwrap())
                .unwrap()
                .to_string(),
            "100 JPY"
        );
    }
}
