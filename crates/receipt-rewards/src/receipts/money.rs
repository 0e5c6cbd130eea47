//! Fixed-point monetary amounts.
//!
//! Receipt totals and prices arrive as decimal text. They are held as integer cents so that the
//! cross-total check and the round-dollar/quarter predicates are exact.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Non-negative amount in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    #[inline]
    pub const fn from_cents(cents: u64) -> Self {
        Amount(cents)
    }

    #[inline]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// True when the amount carries no cents.
    pub const fn is_round_dollar(&self) -> bool {
        self.0 % 100 == 0
    }

    pub const fn is_multiple_of_quarter(&self) -> bool {
        self.0 % 25 == 0
    }

    /// A fifth of the amount in whole dollars, rounded up only when a remainder is left.
    ///
    /// 0.2 dollars is 20 cents, so the product in dollars is `cents / 500`.
    pub const fn fifth_rounded_up(&self) -> u64 {
        let whole = self.0 / 500;
        if self.0 % 500 == 0 {
            whole
        } else {
            whole + 1
        }
    }

    /// `None` when the sum does not fit in `u64` cents.
    pub const fn checked_add(self, rhs: Amount) -> Option<Amount> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Amount(cents)),
            None => None,
        }
    }

    /// Sum of every amount, or `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |sum, amount| sum.checked_add(amount))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Reasons a decimal string is not an acceptable amount.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,
    #[error("'{0}' is not a non-negative decimal number")]
    Malformed(String),
    #[error("'{0}' has more than two decimal places")]
    TooPrecise(String),
    #[error("'{0}' is too large")]
    Overflow(String),
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value = raw.trim();
        if value.is_empty() {
            return Err(AmountError::Empty);
        }

        let (whole, fraction) = match value.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (value, ""),
        };

        let all_digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
        if whole.is_empty() || !all_digits(whole) || !all_digits(fraction) {
            return Err(AmountError::Malformed(value.to_string()));
        }
        if value.ends_with('.') {
            return Err(AmountError::Malformed(value.to_string()));
        }
        if fraction.len() > 2 {
            return Err(AmountError::TooPrecise(value.to_string()));
        }

        let overflow = || AmountError::Overflow(value.to_string());
        let dollars: u64 = whole.parse().map_err(|_| overflow())?;
        let cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| overflow())? * 10,
            _ => fraction.parse::<u64>().map_err(|_| overflow())?,
        };

        dollars
            .checked_mul(100)
            .and_then(|scaled| scaled.checked_add(cents))
            .map(Amount)
            .ok_or_else(overflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(raw: &str) -> Amount {
        raw.parse().expect("amount parses")
    }

    #[test]
    fn parses_whole_and_fractional_forms() {
        assert_eq!(amount("6.49").cents(), 649);
        assert_eq!(amount("9").cents(), 900);
        assert_eq!(amount("2.5").cents(), 250);
        assert_eq!(amount(" 0.00 ").cents(), 0);
    }

    #[test]
    fn rejects_non_numeric_and_signed_input() {
        assert_eq!("".parse::<Amount>(), Err(AmountError::Empty));
        assert!(matches!("abc".parse::<Amount>(), Err(AmountError::Malformed(_))));
        assert!(matches!("-1.00".parse::<Amount>(), Err(AmountError::Malformed(_))));
        assert!(matches!(".50".parse::<Amount>(), Err(AmountError::Malformed(_))));
        assert!(matches!("5.".parse::<Amount>(), Err(AmountError::Malformed(_))));
        assert!(matches!("1.2.3".parse::<Amount>(), Err(AmountError::Malformed(_))));
    }

    #[test]
    fn rejects_sub_cent_precision() {
        assert_eq!(
            "1.005".parse::<Amount>(),
            Err(AmountError::TooPrecise("1.005".to_string()))
        );
    }

    #[test]
    fn rejects_amounts_beyond_u64_cents() {
        assert!(matches!(
            "184467440737095516.16".parse::<Amount>(),
            Err(AmountError::Overflow(_))
        ));
    }

    #[test]
    fn sums_past_u64_cents_are_reported() {
        let max = Amount::from_cents(u64::MAX);
        assert_eq!(max.checked_add(Amount::from_cents(1)), None);
        assert_eq!(Amount::checked_sum([max, max]), None);
        assert_eq!(Amount::checked_sum([max, Amount::ZERO]), Some(max));
        assert_eq!(Amount::checked_sum(Vec::new()), Some(Amount::ZERO));
    }

    #[test]
    fn total_predicates_are_exact() {
        assert!(amount("9.00").is_round_dollar());
        assert!(amount("9.00").is_multiple_of_quarter());
        assert!(amount("1.75").is_multiple_of_quarter());
        assert!(!amount("1.75").is_round_dollar());
        assert!(!amount("35.35").is_multiple_of_quarter());
    }

    #[test]
    fn fifth_rounds_up_only_with_remainder() {
        assert_eq!(amount("12.25").fifth_rounded_up(), 3);
        assert_eq!(amount("12.00").fifth_rounded_up(), 3);
        assert_eq!(amount("10.00").fifth_rounded_up(), 2);
        assert_eq!(amount("0.00").fifth_rounded_up(), 0);
        assert_eq!(amount("0.01").fifth_rounded_up(), 1);
    }

    #[test]
    fn sums_and_displays_as_decimal_text() {
        let total = Amount::checked_sum([amount("1.25"), amount("2.26"), amount("0.09")])
            .expect("no overflow");
        assert_eq!(total.to_string(), "3.60");
        assert_eq!(
            serde_json::to_value(total).expect("serializes"),
            serde_json::json!("3.60")
        );
    }
}
