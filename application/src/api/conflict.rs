//! Booking conflicts-related definitions.

use juniper::{graphql_object, GraphQLEnum};
use service::read;

use crate::{api, Context};

/// Result of checking a requested stay against the existing `Booking`s of a
/// property.
#[derive(Clone, Debug)]
pub struct Report(read::conflict::Report);

impl From<read::conflict::Report> for Report {
    fn from(report: read::conflict::Report) -> Self {
        Self(report)
    }
}

/// Result of checking a requested stay against the existing `Booking`s of a
/// property.
#[graphql_object(name = "ConflictReport", context = Context)]
impl Report {
    /// Severity of the found conflicts.
    #[graphql(name = "type")]
    pub fn kind(&self) -> Kind {
        self.0.kind.into()
    }

    /// Conflicts of the most severe type, ordered by their check-in.
    pub fn conflicts(&self) -> Vec<Conflict> {
        self.0.conflicts.iter().cloned().map(Conflict).collect()
    }

    /// Human-readable description of the conflicts, if there are any.
    pub fn message(&self) -> Option<String> {
        self.0.message.clone()
    }

    /// Indicator whether the requested stay may be booked.
    pub fn can_proceed(&self) -> bool {
        self.0.can_proceed
    }

    /// Context of the requested `Unit`.
    pub fn unit_context(&self) -> UnitContext {
        UnitContext(self.0.unit_context.clone())
    }

    /// Indicator whether the existing `Booking`s were actually inspected.
    ///
    /// `false` means the check failed and the stay is allowed to be booked
    /// without any guarantees.
    pub fn is_verified(&self) -> bool {
        self.0.is_verified
    }
}

/// Existing `Booking` conflicting with a requested stay.
#[derive(Clone, Debug)]
pub struct Conflict(read::conflict::Conflict);

#[graphql_object(name = "BookingConflict", context = Context)]
impl Conflict {
    /// Conflicting `Booking`.
    pub fn booking(&self) -> api::Booking {
        self.0.booking.clone().into()
    }

    /// Human-readable location occupied by the conflicting `Booking`: either
    /// "entire property" or a `UnitName`.
    pub fn location(&self) -> String {
        self.0.location.to_string()
    }
}

/// Context of the `Unit` requested to be booked.
#[derive(Clone, Debug)]
pub struct UnitContext(read::conflict::UnitContext);

#[graphql_object(context = Context)]
impl UnitContext {
    /// Indicator whether a single `Unit` is requested rather than the whole
    /// property.
    pub fn is_unit_booking(&self) -> bool {
        self.0.is_unit_booking
    }

    /// Name of the requested `Unit`, if it's known.
    pub fn unit_name(&self) -> Option<api::unit::Name> {
        self.0.unit_name.clone().map(Into::into)
    }

    /// Distinct human-readable locations occupied by the conflicting
    /// `Booking`s.
    pub fn conflicting_locations(&self) -> Vec<String> {
        self.0
            .conflicting_locations
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}

/// Severity of the conflicts of a requested stay.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "ConflictType")]
pub enum Kind {
    /// Nothing conflicts.
    None,

    /// Only tentative `Booking`s conflict, so the stay may still be booked.
    Soft,

    /// Firm `Booking`s conflict, so the stay cannot be booked.
    Hard,
}

impl From<read::conflict::Kind> for Kind {
    fn from(kind: read::conflict::Kind) -> Self {
        use read::conflict::Kind as K;

        match kind {
            K::None => Self::None,
            K::Soft => Self::Soft,
            K::Hard => Self::Hard,
        }
    }
}
