//! [`RevenueAllocation`]-related read definitions.

use common::{Date, Money};

use crate::domain::{booking, owner, property};
#[cfg(doc)]
use crate::domain::{allocation::Share, Booking, RevenueAllocation, Unit};

/// Selector of the [`RevenueAllocation`]s received by an owner.
///
/// [`RevenueAllocation`]s of cancelled [`Booking`]s are left out.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct ByOwner {
    /// ID of the owner receiving the [`RevenueAllocation`]s.
    pub owner_id: owner::Id,

    /// Earliest [`Date`] (inclusive) a [`RevenueAllocation`] was created at.
    pub from: Option<Date>,

    /// Latest [`Date`] (inclusive) a [`RevenueAllocation`] was created at.
    pub to: Option<Date>,
}

impl ByOwner {
    /// Indicates whether a [`RevenueAllocation`] created at the provided
    /// [`Date`] falls into the range of this selector.
    #[must_use]
    pub fn covers(&self, date: Date) -> bool {
        self.from.map_or(true, |from| date >= from)
            && self.to.map_or(true, |to| date <= to)
    }
}

/// Selector of the [`RevenueAllocation`]s whose [`Booking`] is cancelled.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct OfCancelledBookings;

/// Revenue received by an owner from a single property during a month.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MonthlyRevenue {
    /// ID of the owner receiving the revenue.
    pub owner_id: owner::Id,

    /// ID of the property the revenue comes from.
    pub property_id: property::Id,

    /// First [`Date`] of the month.
    pub month: Date,

    /// Sum of the [`RevenueAllocation`]s.
    pub total: Money,

    /// Number of the summed [`RevenueAllocation`]s.
    pub allocations: i32,
}

#[cfg(test)]
mod spec {
    use common::Date;

    use super::ByOwner;
    use crate::domain::owner;

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn covers_inclusive_range() {
        let by = ByOwner {
            owner_id: owner::Id::new(),
            from: Some(date("2024-06-01")),
            to: Some(date("2024-06-30")),
        };

        assert!(by.covers(date("2024-06-01")));
        assert!(by.covers(date("2024-06-15")));
        assert!(by.covers(date("2024-06-30")));

        assert!(!by.covers(date("2024-05-31")));
        assert!(!by.covers(date("2024-07-01")));
    }

    #[test]
    fn open_range_covers_everything() {
        let by = ByOwner {
            owner_id: owner::Id::new(),
            from: None,
            to: None,
        };

        assert!(by.covers(date("1970-01-01")));
        assert!(by.covers(date("2999-12-31")));
    }
}
