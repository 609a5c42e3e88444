//! [`Money`]-related definitions.

use std::{fmt, num::NonZeroUsize, str::FromStr};

use rust_decimal::Decimal;

use crate::define_kind;

/// Number of decimal places of a minor currency unit (cents).
const MINOR_UNIT_SCALE: u32 = 2;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates zero [`Money`] in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Splits this [`Money`] into the provided number of equal `parts`.
    ///
    /// The amount is rounded to cents first. Every part receives the same
    /// whole number of cents and the remaining cents are handed out one by
    /// one to the leading parts, so the parts always sum up to the rounded
    /// amount.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn split(self, parts: NonZeroUsize) -> Vec<Self> {
        let mut total = self.amount.round_dp(MINOR_UNIT_SCALE);
        total.rescale(MINOR_UNIT_SCALE);
        let cents = total.mantissa();

        let parts =
            i128::try_from(parts.get()).expect("`usize` always fits `i128`");
        let base = cents.div_euclid(parts);
        let remainder = cents.rem_euclid(parts);

        (0..parts)
            .map(|i| Self {
                amount: Decimal::from_i128_with_scale(
                    base + i128::from(i < remainder),
                    MINOR_UNIT_SCALE,
                ),
                currency: self.currency,
            })
            .collect()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        write!(f, "{}{currency}", amount.normalize())
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        let amount = Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        let currency =
            Currency::from_str(currency).map_err(|_| "invalid currency")?;

        Ok(Self { amount, currency })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "US Dollar."]
        Usd = "USD",

        #[doc = "Euro."]
        Eur = "EUR",

        #[doc = "Pound Sterling."]
        Gbp = "GBP",
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{major}.{minor}{currency}` format, where:
    /// - `major` is an integer;
    /// - `minor` is an optional integer;
    /// - `currency` is a three-letter currency code.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::{num::NonZeroUsize, str::FromStr as _};

    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn usd(s: &str) -> Money {
        Money {
            amount: s.parse().unwrap(),
            currency: Currency::Usd,
        }
    }

    fn parts(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn sum(parts: &[Money]) -> Decimal {
        parts.iter().map(|m| m.amount).sum()
    }

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("123.45USD").unwrap(), usd("123.45"));
        assert_eq!(
            Money::from_str("99EUR").unwrap(),
            Money {
                amount: Decimal::from(99),
                currency: Currency::Eur,
            },
        );

        assert!(Money::from_str("123.45").is_err());
        assert!(Money::from_str("123.45Us").is_err());
        assert!(Money::from_str("123.45usd").is_err());
        assert!(Money::from_str("123.45JPY").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(usd("123.45").to_string(), "123.45USD");
        assert_eq!(usd("123.00").to_string(), "123USD");
        assert_eq!(usd("123.50").to_string(), "123.5USD");
    }

    #[test]
    fn splits_evenly_divisible_amount() {
        let shares = usd("300").split(parts(3));

        assert_eq!(shares, vec![usd("100"); 3]);
        assert_eq!(sum(&shares), Decimal::from(300));
    }

    #[test]
    fn hands_remainder_cents_to_leading_parts() {
        let shares = usd("100").split(parts(3));

        assert_eq!(shares, vec![usd("33.34"), usd("33.33"), usd("33.33")]);
        assert_eq!(sum(&shares), Decimal::from(100));

        let shares = usd("0.05").split(parts(3));
        assert_eq!(shares, vec![usd("0.02"), usd("0.02"), usd("0.01")]);
    }

    #[test]
    fn single_part_keeps_whole_amount() {
        assert_eq!(usd("250").split(parts(1)), vec![usd("250")]);
    }

    #[test]
    fn rounds_to_cents_before_splitting() {
        let shares = usd("10.005").split(parts(2));

        assert_eq!(shares, vec![usd("5"), usd("5")]);
    }

    #[test]
    fn splits_in_the_same_currency() {
        let eur = Money {
            amount: Decimal::from(10),
            currency: Currency::Eur,
        };

        assert!(eur
            .split(parts(4))
            .iter()
            .all(|m| m.currency == Currency::Eur));
    }
}
