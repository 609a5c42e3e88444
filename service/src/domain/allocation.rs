//! [`RevenueAllocation`] definitions.

use std::num::NonZeroUsize;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{booking, owner, property, Unit};
#[cfg(doc)]
use crate::domain::Booking;

/// Part of a whole-property [`Booking`] revenue attributed to the owner of a
/// single [`Unit`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RevenueAllocation {
    /// ID of this [`RevenueAllocation`].
    pub id: Id,

    /// ID of the [`Booking`] the revenue comes from.
    pub booking_id: booking::Id,

    /// ID of the property the [`Booking`] is made for.
    pub property_id: property::Id,

    /// ID of the [`Unit`] this [`RevenueAllocation`] is made for.
    pub unit_id: crate::domain::unit::Id,

    /// ID of the owner receiving the revenue.
    pub owner_id: owner::Id,

    /// Allocated amount.
    pub amount: Money,

    /// [`DateTime`] when this [`RevenueAllocation`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`RevenueAllocation`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// [`DateTime`] when a [`RevenueAllocation`] was created.
pub type CreationDateTime = DateTimeOf<(RevenueAllocation, unit::Creation)>;

/// Amount due to the owner of a single [`Unit`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Share {
    /// ID of the [`Unit`] this [`Share`] is made for.
    pub unit_id: crate::domain::unit::Id,

    /// ID of the owner of the [`Unit`].
    pub owner_id: owner::Id,

    /// Amount of this [`Share`].
    pub amount: Money,
}

/// Splits the `total` equally between the owned [`Unit`]s.
///
/// [`Unit`]s without an owner don't receive a [`Share`]. The remaining ones
/// are ordered by their name and ID, and the cents left over from the equal
/// split go to the leading ones, so the [`Share`]s always sum up to the
/// `total` rounded to cents.
///
/// Empty if none of the [`Unit`]s is owned.
#[must_use]
pub fn split<'u>(
    total: Money,
    units: impl IntoIterator<Item = &'u Unit>,
) -> Vec<Share> {
    let mut owned = units
        .into_iter()
        .filter_map(|u| u.owner_id.map(|owner_id| (&u.name, u.id, owner_id)))
        .collect::<Vec<_>>();
    owned.sort_unstable_by(|(a_name, a_id, _), (b_name, b_id, _)| {
        a_name.cmp(b_name).then_with(|| a_id.cmp(b_id))
    });

    let Some(parts) = NonZeroUsize::new(owned.len()) else {
        return vec![];
    };

    owned
        .into_iter()
        .zip(total.split(parts))
        .map(|((_, unit_id, owner_id), amount)| Share {
            unit_id,
            owner_id,
            amount,
        })
        .collect()
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Money};
    use rust_decimal::Decimal;

    use super::split;
    use crate::domain::{
        owner, property,
        unit::{self, Name},
        Unit,
    };

    fn usd(amount: &str) -> Money {
        Money {
            amount: amount.parse::<Decimal>().unwrap(),
            currency: Currency::Usd,
        }
    }

    fn new_unit(name: &str, owner_id: Option<owner::Id>) -> Unit {
        Unit {
            id: unit::Id::new(),
            property_id: property::Id::default(),
            name: Name::new(name).unwrap(),
            owner_id,
        }
    }

    #[test]
    fn splits_equally_between_owners() {
        let units = [
            new_unit("A", Some(owner::Id::new())),
            new_unit("B", Some(owner::Id::new())),
            new_unit("C", Some(owner::Id::new())),
        ];

        let shares = split(usd("300"), &units);

        assert_eq!(shares.len(), 3);
        for (share, unit) in shares.iter().zip(&units) {
            assert_eq!(share.unit_id, unit.id);
            assert_eq!(Some(share.owner_id), unit.owner_id);
            assert_eq!(share.amount, usd("100.00"));
        }
    }

    #[test]
    fn hands_remainder_cents_to_leading_units_by_name() {
        let units = [
            new_unit("Cabin C", Some(owner::Id::new())),
            new_unit("Cabin A", Some(owner::Id::new())),
            new_unit("Cabin B", Some(owner::Id::new())),
        ];

        let shares = split(usd("100"), &units);

        assert_eq!(shares[0].unit_id, units[1].id);
        assert_eq!(shares[0].amount, usd("33.34"));
        assert_eq!(shares[1].unit_id, units[2].id);
        assert_eq!(shares[1].amount, usd("33.33"));
        assert_eq!(shares[2].unit_id, units[0].id);
        assert_eq!(shares[2].amount, usd("33.33"));

        let sum = shares.iter().map(|s| s.amount.amount).sum::<Decimal>();
        assert_eq!(sum, usd("100").amount);
    }

    #[test]
    fn skips_units_without_owner() {
        let owner = owner::Id::new();
        let units = [new_unit("A", Some(owner)), new_unit("B", None)];

        let shares = split(usd("250"), &units);

        assert_eq!(shares.len(), 1);
        assert_eq!(shares[0].owner_id, owner);
        assert_eq!(shares[0].amount, usd("250.00"));
    }

    #[test]
    fn is_empty_without_owned_units() {
        assert!(split(usd("250"), &[new_unit("A", None), new_unit("B", None)])
            .is_empty());
        assert!(split(usd("250"), std::iter::empty()).is_empty());
    }
}
