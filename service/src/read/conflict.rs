//! [`Report`] of [`Booking`] conflicts.

use std::fmt;

use derive_more::Display;
use itertools::Itertools as _;

use crate::domain::{booking::Class, unit, Booking, Unit};

/// Severity of the conflicts of a requested stay.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Kind {
    /// Nothing conflicts with the requested stay.
    #[display("none")]
    None,

    /// Only tentative [`Booking`]s conflict: the stay may still be booked.
    #[display("soft")]
    Soft,

    /// Firm [`Booking`]s conflict: the stay cannot be booked.
    #[display("hard")]
    Hard,
}

impl Kind {
    /// Returns the [`Kind`] of conflicting with a [`Booking`] of the provided
    /// [`Class`].
    const fn of(class: Class) -> Self {
        match class {
            Class::Hard => Self::Hard,
            Class::Soft => Self::Soft,
            Class::Terminal => Self::None,
        }
    }
}

/// Space occupied by a conflicting [`Booking`].
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Location {
    /// Whole property is occupied.
    EntireProperty,

    /// Single [`Unit`] is occupied.
    Unit(unit::Name),

    /// [`Unit`] that is not registered for the property anymore.
    UnknownUnit(unit::Id),
}

impl Location {
    /// Resolves the [`Location`] occupied by the provided [`Booking`].
    fn of(booking: &Booking, units: &[Unit]) -> Self {
        let Some(unit_id) = booking.unit_id else {
            return Self::EntireProperty;
        };
        units
            .iter()
            .find(|u| u.id == unit_id)
            .map_or(Self::UnknownUnit(unit_id), |u| Self::Unit(u.name.clone()))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EntireProperty => write!(f, "entire property"),
            Self::Unit(name) => write!(f, "{name}"),
            Self::UnknownUnit(id) => write!(f, "Unit {id}"),
        }
    }
}

/// Conflicting [`Booking`] along with the [`Location`] it occupies.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Conflict {
    /// Conflicting [`Booking`].
    pub booking: Booking,

    /// [`Location`] occupied by the [`Booking`].
    pub location: Location,
}

/// Context of the requested [`Unit`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct UnitContext {
    /// Indicator whether a single [`Unit`] is requested rather than the whole
    /// property.
    pub is_unit_booking: bool,

    /// [`unit::Name`] of the requested [`Unit`], if it's known.
    pub unit_name: Option<unit::Name>,

    /// Distinct [`Location`]s occupied by the conflicting [`Booking`]s.
    pub conflicting_locations: Vec<Location>,
}

/// Result of checking a requested stay against the existing [`Booking`]s.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Report {
    /// Severity of the conflicts.
    pub kind: Kind,

    /// [`Conflict`]s of the most severe [`Kind`], ordered by check-in.
    pub conflicts: Vec<Conflict>,

    /// Human-readable description of the conflicts, if there are any.
    pub message: Option<String>,

    /// Indicator whether the stay may be booked.
    pub can_proceed: bool,

    /// [`UnitContext`] of the request.
    pub unit_context: UnitContext,

    /// Indicator whether the existing [`Booking`]s were actually inspected.
    pub is_verified: bool,
}

impl Report {
    /// Creates a [`Report`] without any conflicts.
    #[must_use]
    pub fn clear(unit_id: Option<unit::Id>) -> Self {
        Self {
            kind: Kind::None,
            conflicts: vec![],
            message: None,
            can_proceed: true,
            unit_context: UnitContext {
                is_unit_booking: unit_id.is_some(),
                ..UnitContext::default()
            },
            is_verified: true,
        }
    }

    /// Creates a [`Report`] of a check that couldn't inspect the existing
    /// [`Booking`]s because of the provided `error`.
    ///
    /// Such [`Report`] doesn't prevent the stay from being booked.
    #[must_use]
    pub fn unverified(
        unit_id: Option<unit::Id>,
        error: impl fmt::Display,
    ) -> Self {
        Self {
            message: Some(format!("Conflicts could not be verified: {error}")),
            is_verified: false,
            ..Self::clear(unit_id)
        }
    }

    /// Detects conflicts of a stay requested for the provided [`Unit`] (or
    /// for the whole property, if [`None`]) among the `overlapping`
    /// [`Booking`]s.
    ///
    /// A [`Booking`] of another [`Unit`] doesn't conflict with a [`Unit`]
    /// request, while a whole-property one always does. Hard conflicts take
    /// priority over soft ones, so only the [`Conflict`]s of the most severe
    /// [`Kind`] are reported.
    #[must_use]
    pub fn detect(
        unit_id: Option<unit::Id>,
        overlapping: impl IntoIterator<Item = Booking>,
        units: &[Unit],
    ) -> Self {
        let relevant = overlapping
            .into_iter()
            .filter(|b| b.is_active() && b.occupies(unit_id))
            .collect::<Vec<_>>();

        let kind = relevant
            .iter()
            .map(|b| Kind::of(b.status.class()))
            .fold(Kind::None, |worst, k| match (worst, k) {
                (Kind::Hard, _) | (_, Kind::Hard) => Kind::Hard,
                (Kind::Soft, _) | (_, Kind::Soft) => Kind::Soft,
                (Kind::None, Kind::None) => Kind::None,
            });

        let mut report = Self::clear(unit_id);
        report.unit_context.unit_name = unit_id.and_then(|id| {
            units.iter().find(|u| u.id == id).map(|u| u.name.clone())
        });
        if kind == Kind::None {
            return report;
        }

        let conflicts = relevant
            .into_iter()
            .filter(|b| Kind::of(b.status.class()) == kind)
            .map(|booking| Conflict {
                location: Location::of(&booking, units),
                booking,
            })
            .collect::<Vec<_>>();

        report.kind = kind;
        report.can_proceed = kind != Kind::Hard;
        report.message = Some(message(kind, &conflicts));
        report.unit_context.conflicting_locations = conflicts
            .iter()
            .map(|c| c.location.clone())
            .unique()
            .collect();
        report.conflicts = conflicts;
        report
    }
}

/// Describes the provided [`Conflict`]s of the given [`Kind`].
fn message(kind: Kind, conflicts: &[Conflict]) -> String {
    if let [Conflict { booking, location }] = conflicts {
        let (check_in, check_out) =
            (booking.stay.check_in(), booking.stay.check_out());
        return if kind == Kind::Hard {
            format!(
                "{location} is already booked from {check_in} to {check_out} \
                 ({})",
                booking.status,
            )
        } else {
            format!(
                "{location} has a {} booking from {check_in} to {check_out}",
                booking.status,
            )
        };
    }

    let prefix = if kind == Kind::Hard {
        "Cannot book:"
    } else {
        "Warning:"
    };
    let list = conflicts
        .iter()
        .map(|c| format!("{} ({})", c.location, c.booking.stay))
        .join(", ");
    format!(
        "{prefix} {} bookings conflict with the requested dates: {list}",
        conflicts.len(),
    )
}

#[cfg(test)]
mod spec {
    use common::{money::Currency, Date, Money};

    use super::{Kind, Location, Report};
    use crate::domain::{
        booking::{self, Stay, Status},
        property,
        unit::{self, Name},
        Booking, Unit,
    };

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    fn stay(check_in: &str, check_out: &str) -> Stay {
        Stay::new(date(check_in), date(check_out)).unwrap()
    }

    fn booking(
        unit_id: Option<unit::Id>,
        (check_in, check_out): (&str, &str),
        status: Status,
    ) -> Booking {
        Booking {
            id: booking::Id::new(),
            property_id: property::Id::default(),
            unit_id,
            stay: stay(check_in, check_out),
            status,
            total: Money::zero(Currency::Usd),
        }
    }

    fn new_unit(name: &str) -> Unit {
        Unit {
            id: unit::Id::new(),
            property_id: property::Id::default(),
            name: Name::new(name).unwrap(),
            owner_id: None,
        }
    }

    #[test]
    fn nothing_overlapping_is_clear() {
        let report = Report::detect(None, vec![], &[]);

        assert_eq!(report.kind, Kind::None);
        assert!(report.can_proceed);
        assert!(report.conflicts.is_empty());
        assert!(report.message.is_none());
        assert!(report.is_verified);
    }

    #[test]
    fn whole_property_is_labelled_in_lowercase() {
        assert_eq!(Location::EntireProperty.to_string(), "entire property");
    }

    #[test]
    fn confirmed_whole_property_booking_blocks() {
        let existing =
            booking(None, ("2024-06-01", "2024-06-05"), Status::Confirmed);

        let report = Report::detect(None, vec![existing.clone()], &[]);

        assert_eq!(report.kind, Kind::Hard);
        assert!(!report.can_proceed);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].booking, existing);
        assert_eq!(report.conflicts[0].location, Location::EntireProperty);
        assert_eq!(
            report.message.as_deref(),
            Some(
                "entire property is already booked from 2024-06-01 to \
                 2024-06-05 (confirmed)",
            ),
        );
    }

    #[test]
    fn whole_property_booking_blocks_any_unit() {
        let cabin = new_unit("Cabin A");
        let existing =
            booking(None, ("2024-06-01", "2024-06-05"), Status::CheckedIn);

        let report = Report::detect(
            Some(cabin.id),
            vec![existing],
            &[cabin.clone()],
        );

        assert_eq!(report.kind, Kind::Hard);
        assert!(!report.can_proceed);
        assert!(report.unit_context.is_unit_booking);
        assert_eq!(report.unit_context.unit_name, Some(cabin.name));
        assert_eq!(
            report.unit_context.conflicting_locations,
            vec![Location::EntireProperty],
        );
    }

    #[test]
    fn pending_booking_only_warns() {
        let cabin = new_unit("Cabin A");
        let existing = booking(
            Some(cabin.id),
            ("2024-06-01", "2024-06-05"),
            Status::Pending,
        );

        let report =
            Report::detect(Some(cabin.id), vec![existing], &[cabin.clone()]);

        assert_eq!(report.kind, Kind::Soft);
        assert!(report.can_proceed);
        assert_eq!(
            report.message.as_deref(),
            Some("Cabin A has a pending booking from 2024-06-01 to 2024-06-05"),
        );
    }

    #[test]
    fn other_unit_booking_does_not_conflict() {
        let (u1, u2) = (new_unit("Cabin 1"), new_unit("Cabin 2"));
        let existing = booking(
            Some(u2.id),
            ("2024-06-01", "2024-06-05"),
            Status::Confirmed,
        );

        let report = Report::detect(Some(u1.id), vec![existing], &[u1, u2]);

        assert_eq!(report.kind, Kind::None);
        assert!(report.can_proceed);
        assert!(report.unit_context.is_unit_booking);
    }

    #[test]
    fn unit_booking_conflicts_with_whole_property_request() {
        let cabin = new_unit("Cabin A");
        let existing = booking(
            Some(cabin.id),
            ("2024-06-01", "2024-06-05"),
            Status::Blocked,
        );

        let report = Report::detect(None, vec![existing], &[cabin.clone()]);

        assert_eq!(report.kind, Kind::Hard);
        assert!(!report.unit_context.is_unit_booking);
        assert_eq!(
            report.unit_context.conflicting_locations,
            vec![Location::Unit(cabin.name)],
        );
    }

    #[test]
    fn hard_conflicts_take_priority_over_soft_ones() {
        let pending =
            booking(None, ("2024-06-01", "2024-06-03"), Status::Pending);
        let confirmed =
            booking(None, ("2024-06-03", "2024-06-05"), Status::Confirmed);

        let report =
            Report::detect(None, vec![pending, confirmed.clone()], &[]);

        assert_eq!(report.kind, Kind::Hard);
        assert!(!report.can_proceed);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].booking, confirmed);
    }

    #[test]
    fn terminal_bookings_never_conflict() {
        let bookings = [Status::Cancelled, Status::CheckedOut]
            .into_iter()
            .chain([Status::Completed])
            .map(|s| booking(None, ("2024-06-01", "2024-06-05"), s))
            .collect::<Vec<_>>();

        let report = Report::detect(None, bookings, &[]);

        assert_eq!(report.kind, Kind::None);
        assert!(report.can_proceed);
    }

    #[test]
    fn lists_several_conflicts() {
        let (a, b) = (new_unit("Cabin A"), new_unit("Cabin B"));
        let bookings = vec![
            booking(Some(a.id), ("2024-06-01", "2024-06-04"), Status::Blocked),
            booking(Some(b.id), ("2024-06-02", "2024-06-06"), Status::Blocked),
            booking(Some(a.id), ("2024-06-04", "2024-06-08"), Status::Blocked),
        ];

        let report = Report::detect(None, bookings, &[a.clone(), b.clone()]);

        assert_eq!(report.kind, Kind::Hard);
        assert_eq!(report.conflicts.len(), 3);
        assert_eq!(
            report.message.as_deref(),
            Some(
                "Cannot book: 3 bookings conflict with the requested dates: \
                 Cabin A (2024-06-01 to 2024-06-04), \
                 Cabin B (2024-06-02 to 2024-06-06), \
                 Cabin A (2024-06-04 to 2024-06-08)",
            ),
        );
        assert_eq!(
            report.unit_context.conflicting_locations,
            vec![Location::Unit(a.name), Location::Unit(b.name)],
        );
    }

    #[test]
    fn several_soft_conflicts_warn() {
        let bookings = vec![
            booking(None, ("2024-06-01", "2024-06-04"), Status::Inquiry),
            booking(None, ("2024-06-02", "2024-06-06"), Status::Pending),
        ];

        let report = Report::detect(None, bookings, &[]);

        assert_eq!(report.kind, Kind::Soft);
        assert!(report.can_proceed);
        assert!(report
            .message
            .as_deref()
            .unwrap()
            .starts_with("Warning: 2 bookings conflict"));
    }

    #[test]
    fn unregistered_unit_is_named_by_id() {
        let unit_id = unit::Id::new();
        let existing = booking(
            Some(unit_id),
            ("2024-06-01", "2024-06-05"),
            Status::Confirmed,
        );

        let report = Report::detect(None, vec![existing], &[]);

        assert_eq!(
            report.conflicts[0].location,
            Location::UnknownUnit(unit_id),
        );
        assert_eq!(
            report.message.as_deref(),
            Some(
                format!(
                    "Unit {unit_id} is already booked from 2024-06-01 to \
                     2024-06-05 (confirmed)",
                )
                .as_str(),
            ),
        );
    }

    #[test]
    fn unverified_report_lets_proceed() {
        let report = Report::unverified(None, "connection refused");

        assert_eq!(report.kind, Kind::None);
        assert!(report.can_proceed);
        assert!(!report.is_verified);
        assert_eq!(
            report.message.as_deref(),
            Some("Conflicts could not be verified: connection refused"),
        );
    }
}
