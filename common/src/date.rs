//! Calendar [`Date`] definitions.

use std::str::FromStr;

use derive_more::{Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use time::{macros::format_description, Month};

/// Calendar date without a time of day or a time zone.
///
/// Displayed and parsed in the `YYYY-MM-DD` format.
#[derive(
    Clone,
    Copy,
    Debug,
    Display,
    Eq,
    From,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Date(time::Date);

impl Date {
    /// Creates a new [`Date`] from the provided calendar components.
    ///
    /// [`None`] is returned if the components don't form a valid date.
    #[must_use]
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Option<Self> {
        let month = Month::try_from(month).ok()?;
        time::Date::from_calendar_date(year, month, day).ok().map(Self)
    }

    /// Returns the current [`Date`] in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self(time::OffsetDateTime::now_utc().date())
    }

    /// Returns the first [`Date`] of the month this [`Date`] belongs to.
    #[must_use]
    pub fn first_day_of_month(self) -> Self {
        Self(self.0.replace_day(1).unwrap_or(self.0))
    }

    /// Returns the number of days from this [`Date`] to the `other` one.
    ///
    /// Negative if the `other` [`Date`] is earlier than this one.
    #[must_use]
    pub fn days_until(self, other: Self) -> i64 {
        (other.0 - self.0).whole_days()
    }
}

impl FromStr for Date {
    type Err = time::error::Parse;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        time::Date::parse(s, format_description!("[year]-[month]-[day]"))
            .map(Self)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date in the `YYYY-MM-DD` format.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = super::Date;

    impl Date {
        fn to_output<S: ScalarValue>(d: &Date) -> Value<S> {
            Value::scalar(d.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Date;

    #[test]
    fn from_str() {
        assert_eq!(
            Date::from_str("2024-06-01").unwrap(),
            Date::from_ymd(2024, 6, 1).unwrap(),
        );

        assert!(Date::from_str("2024-6-1").is_err());
        assert!(Date::from_str("2024-02-30").is_err());
        assert!(Date::from_str("01.06.2024").is_err());
    }

    #[test]
    fn to_string() {
        assert_eq!(
            Date::from_ymd(2024, 6, 1).unwrap().to_string(),
            "2024-06-01",
        );
    }

    #[test]
    fn orders_chronologically() {
        let may = Date::from_ymd(2024, 5, 31).unwrap();
        let june = Date::from_ymd(2024, 6, 1).unwrap();

        assert!(may < june);
        assert_eq!(may.days_until(june), 1);
        assert_eq!(june.days_until(may), -1);
    }

    #[test]
    fn first_day_of_month() {
        assert_eq!(
            Date::from_ymd(2024, 2, 29).unwrap().first_day_of_month(),
            Date::from_ymd(2024, 2, 1).unwrap(),
        );
    }
}
