//! Prices and fees in centavos.
//!
//! Order totals are sums of `unit price x quantity`; integer minor units keep
//! them exact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CommerceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    /// Philippine peso.
    #[default]
    PHP,
    USD,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::PHP => "PHP",
            Currency::USD => "USD",
        }
    }

    fn sign(&self) -> &'static str {
        match self {
            Currency::PHP => "\u{20b1}",
            Currency::USD => "$",
        }
    }

    /// Look up a configured currency code, case-insensitively.
    pub fn from_code(code: &str) -> Option<Self> {
        code.parse().ok()
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("PHP") {
            Ok(Currency::PHP)
        } else if s.eq_ignore_ascii_case("USD") {
            Ok(Currency::USD)
        } else {
            Err(CommerceError::Validation(format!("unsupported currency: {}", s)))
        }
    }
}

/// An amount of one currency, in its minor unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    pub centavos: i64,
    pub currency: Currency,
}

impl Money {
    pub fn new(centavos: i64, currency: Currency) -> Self {
        Self { centavos, currency }
    }

    pub fn php(centavos: i64) -> Self {
        Self::new(centavos, Currency::PHP)
    }

    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    pub fn is_negative(&self) -> bool {
        self.centavos < 0
    }

    /// Sum of two amounts; None when the currencies differ or on overflow.
    pub fn checked_add(&self, other: &Money) -> Option<Money> {
        (self.currency == other.currency)
            .then(|| self.centavos.checked_add(other.centavos))
            .flatten()
            .map(|centavos| Money::new(centavos, self.currency))
    }

    /// Price of `quantity` units at this unit price.
    pub fn times(&self, quantity: u32) -> Money {
        Money::new(self.centavos.saturating_mul(i64::from(quantity)), self.currency)
    }

    /// Total of `amounts`, all of which must be in `currency`.
    pub fn sum<'a>(amounts: impl IntoIterator<Item = &'a Money>, currency: Currency) -> Option<Money> {
        amounts
            .into_iter()
            .try_fold(Money::zero(currency), |total, m| total.checked_add(m))
    }
}

/// `₱1,234.50` style, with a leading minus for negative amounts.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let minus = if self.is_negative() { "-" } else { "" };
        let abs = self.centavos.unsigned_abs();
        let whole = (abs / 100).to_string();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, c) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }
        write!(f, "{}{}{}.{:02}", minus, self.currency.sign(), grouped, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::php(4999).to_string(), "\u{20b1}49.99");
        assert_eq!(Money::php(123_456_700).to_string(), "\u{20b1}1,234,567.00");
        assert_eq!(Money::new(-5, Currency::USD).to_string(), "-$0.05");
    }

    #[test]
    fn test_mixed_currencies_do_not_add() {
        assert!(Money::php(1000).checked_add(&Money::new(1000, Currency::USD)).is_none());
    }

    #[test]
    fn test_sum_of_line_totals() {
        let totals = [Money::php(1000), Money::php(500).times(3)];
        assert_eq!(Money::sum(&totals, Currency::PHP), Some(Money::php(2500)));
        assert_eq!(Money::sum(&[], Currency::PHP), Some(Money::zero(Currency::PHP)));
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(Currency::from_code("php"), Some(Currency::PHP));
        assert_eq!(Currency::from_code("EUR"), None);
        assert!("eur".parse::<Currency>().is_err());
    }
}
