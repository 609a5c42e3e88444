//! [`Booking`] definitions.

use common::{define_kind, Date, Money};
use derive_more::{Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{property, unit};
#[cfg(doc)]
use crate::domain::Unit;

/// Reservation of a whole property or of a single [`Unit`] of it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the booked property.
    pub property_id: property::Id,

    /// ID of the booked [`Unit`].
    ///
    /// [`None`] means the whole property is booked.
    pub unit_id: Option<unit::Id>,

    /// [`Stay`] dates of this [`Booking`].
    pub stay: Stay,

    /// Current [`Status`] of this [`Booking`].
    pub status: Status,

    /// Total amount paid for this [`Booking`].
    pub total: Money,
}

impl Booking {
    /// Indicates whether this [`Booking`] occupies the whole property.
    #[must_use]
    pub fn is_whole_property(&self) -> bool {
        self.unit_id.is_none()
    }

    /// Indicates whether this [`Booking`] still occupies its dates.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.status.class().is_terminal()
    }

    /// Indicates whether this [`Booking`] competes for the same space as a
    /// request for the provided [`Unit`] (or for the whole property, if
    /// [`None`]).
    ///
    /// Whole-property requests compete with every [`Booking`], and
    /// whole-property [`Booking`]s compete with every request.
    #[must_use]
    pub fn occupies(&self, unit_id: Option<unit::Id>) -> bool {
        match (unit_id, self.unit_id) {
            (None, _) | (_, None) => true,
            (Some(requested), Some(booked)) => requested == booked,
        }
    }
}

/// ID of a [`Booking`].
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

/// Dates of a stay: the half-open `[check_in, check_out)` range of nights.
///
/// A guest checking out on the same day another one checks in doesn't
/// overlap with them.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[display("{check_in} to {check_out}")]
pub struct Stay {
    /// [`Date`] of the check-in.
    check_in: Date,

    /// [`Date`] of the check-out.
    check_out: Date,
}

impl Stay {
    /// Creates a new [`Stay`] if the `check_out` [`Date`] is strictly after
    /// the `check_in` one.
    #[must_use]
    pub fn new(check_in: Date, check_out: Date) -> Option<Self> {
        (check_out > check_in).then_some(Self {
            check_in,
            check_out,
        })
    }

    /// Creates a new [`Stay`] without checking its dates.
    ///
    /// # Safety
    ///
    /// The `check_out` [`Date`] must be strictly after the `check_in` one.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub const unsafe fn new_unchecked(check_in: Date, check_out: Date) -> Self {
        Self {
            check_in,
            check_out,
        }
    }

    /// Returns the check-in [`Date`] of this [`Stay`].
    #[must_use]
    pub const fn check_in(&self) -> Date {
        self.check_in
    }

    /// Returns the check-out [`Date`] of this [`Stay`].
    #[must_use]
    pub const fn check_out(&self) -> Date {
        self.check_out
    }

    /// Returns the number of nights of this [`Stay`].
    #[must_use]
    pub fn nights(&self) -> i64 {
        self.check_in.days_until(self.check_out)
    }

    /// Indicates whether this [`Stay`] shares at least one night with the
    /// `other` one.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.check_in < other.check_out && self.check_out > other.check_in
    }
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "Guest asked about availability."]
        Inquiry = "inquiry",

        #[doc = "Reservation awaits confirmation."]
        Pending = "pending",

        #[doc = "Reservation is confirmed."]
        Confirmed = "confirmed",

        #[doc = "Guest has arrived."]
        CheckedIn = "checked_in",

        #[doc = "Guest has left."]
        CheckedOut = "checked_out",

        #[doc = "Stay is over and settled."]
        Completed = "completed",

        #[doc = "Reservation was cancelled."]
        Cancelled = "cancelled",

        #[doc = "Dates are blocked by the property management."]
        Blocked = "blocked",
    }
}

impl Status {
    /// Returns the [`Class`] of this [`Status`].
    #[must_use]
    pub const fn class(self) -> Class {
        match self {
            Self::Confirmed | Self::CheckedIn | Self::Blocked => Class::Hard,
            Self::Inquiry | Self::Pending => Class::Soft,
            Self::CheckedOut | Self::Completed | Self::Cancelled => {
                Class::Terminal
            }
        }
    }

    /// Returns all the [`Status`]es of the provided [`Class`].
    #[must_use]
    pub fn of_class(class: Class) -> Vec<Self> {
        Self::ALL
            .iter()
            .copied()
            .filter(|s| s.class() == class)
            .collect()
    }
}

/// Classification of a [`Status`] regarding overlapping [`Booking`]s.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Class {
    /// Occupies its dates and forbids any overlapping [`Booking`].
    Hard,

    /// Occupies its dates tentatively: overlapping [`Booking`]s are allowed,
    /// but should be warned about.
    Soft,

    /// Doesn't occupy its dates anymore.
    Terminal,
}

impl Class {
    /// Indicates whether this [`Class`] is [`Class::Terminal`].
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminal)
    }
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Date, Money};

    use super::{Booking, Class, Id, Stay, Status};
    use crate::domain::{property, unit};

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn stay(check_in: &str, check_out: &str) -> Stay {
        Stay::new(date(check_in), date(check_out)).unwrap()
    }

    fn booking(unit_id: Option<unit::Id>, status: Status) -> Booking {
        Booking {
            id: Id::new(),
            property_id: property::Id::new(),
            unit_id,
            stay: stay("2024-06-01", "2024-06-05"),
            status,
            total: Money::zero(Currency::Usd),
        }
    }

    #[test]
    fn stay_requires_check_out_after_check_in() {
        assert!(Stay::new(date("2024-06-01"), date("2024-06-02")).is_some());

        assert!(Stay::new(date("2024-06-01"), date("2024-06-01")).is_none());
        assert!(Stay::new(date("2024-06-02"), date("2024-06-01")).is_none());
    }

    #[test]
    fn stay_counts_nights() {
        assert_eq!(stay("2024-06-01", "2024-06-05").nights(), 4);
        assert_eq!(stay("2024-02-28", "2024-03-01").nights(), 2);
    }

    #[test]
    fn stays_overlap_as_half_open_ranges() {
        let existing = stay("2024-06-01", "2024-06-05");

        assert!(existing.overlaps(&stay("2024-06-03", "2024-06-07")));
        assert!(existing.overlaps(&stay("2024-05-28", "2024-06-02")));
        assert!(existing.overlaps(&stay("2024-06-02", "2024-06-03")));
        assert!(existing.overlaps(&stay("2024-05-01", "2024-07-01")));
        assert!(existing.overlaps(&existing));
    }

    #[test]
    fn back_to_back_stays_do_not_overlap() {
        let existing = stay("2024-06-01", "2024-06-05");

        assert!(!existing.overlaps(&stay("2024-06-05", "2024-06-07")));
        assert!(!existing.overlaps(&stay("2024-05-28", "2024-06-01")));
        assert!(!existing.overlaps(&stay("2024-07-01", "2024-07-05")));
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = stay("2024-06-01", "2024-06-05");
        let b = stay("2024-06-04", "2024-06-09");

        assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn classifies_statuses() {
        assert_eq!(Status::Confirmed.class(), Class::Hard);
        assert_eq!(Status::CheckedIn.class(), Class::Hard);
        assert_eq!(Status::Blocked.class(), Class::Hard);

        assert_eq!(Status::Pending.class(), Class::Soft);
        assert_eq!(Status::Inquiry.class(), Class::Soft);

        assert_eq!(Status::CheckedOut.class(), Class::Terminal);
        assert_eq!(Status::Completed.class(), Class::Terminal);
        assert_eq!(Status::Cancelled.class(), Class::Terminal);
    }

    #[test]
    fn lists_statuses_of_class() {
        assert_eq!(
            Status::of_class(Class::Terminal),
            vec![Status::CheckedOut, Status::Completed, Status::Cancelled],
        );
        assert_eq!(Status::ALL.len(), 8);
    }

    #[test]
    fn status_uses_snake_case_names() {
        assert_eq!(Status::CheckedIn.to_string(), "checked_in");
        assert_eq!(
            "checked_out".parse::<Status>().unwrap(),
            Status::CheckedOut,
        );
        assert!("CheckedOut".parse::<Status>().is_err());
    }

    #[test]
    fn terminal_bookings_are_inactive() {
        assert!(booking(None, Status::Pending).is_active());
        assert!(booking(None, Status::Blocked).is_active());

        assert!(!booking(None, Status::Cancelled).is_active());
        assert!(!booking(None, Status::Completed).is_active());
    }

    #[test]
    fn whole_property_booking_occupies_every_unit() {
        let whole = booking(None, Status::Confirmed);

        assert!(whole.is_whole_property());
        assert!(whole.occupies(None));
        assert!(whole.occupies(Some(unit::Id::new())));
    }

    #[test]
    fn unit_booking_occupies_its_unit_only() {
        let unit_id = unit::Id::new();
        let booking = booking(Some(unit_id), Status::Confirmed);

        assert!(booking.occupies(Some(unit_id)));
        assert!(booking.occupies(None));
        assert!(!booking.occupies(Some(unit::Id::new())));
    }
}
