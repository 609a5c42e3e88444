//! [`Booking`]-related definitions.

use common::{Date, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::domain;
use uuid::Uuid;

use crate::{api, Context};

/// A booking of a whole property or a single unit of it.
#[derive(Clone, Debug, From)]
pub struct Booking(domain::Booking);

/// A booking of a whole property or a single unit of it.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the booked property.
    pub fn property_id(&self) -> api::property::Id {
        self.0.property_id.into()
    }

    /// ID of the booked `Unit`.
    ///
    /// `null` means the whole property is booked.
    pub fn unit_id(&self) -> Option<api::unit::Id> {
        self.0.unit_id.map(Into::into)
    }

    /// Date of the first night of this `Booking`.
    pub fn check_in(&self) -> Date {
        self.0.stay.check_in()
    }

    /// Date of leaving, not being a booked night itself.
    pub fn check_out(&self) -> Date {
        self.0.stay.check_out()
    }

    /// Number of booked nights.
    pub fn nights(&self) -> i32 {
        i32::try_from(self.0.stay.nights()).unwrap_or(i32::MAX)
    }

    /// Current status of this `Booking`.
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// Total revenue of this `Booking`.
    pub fn total(&self) -> Money {
        self.0.total
    }
}

/// Unique identifier of a `Booking`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Status of a `Booking`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// Guest asked about availability.
    Inquiry,

    /// Reservation awaits confirmation.
    Pending,

    /// Reservation is confirmed.
    Confirmed,

    /// Guest has arrived.
    CheckedIn,

    /// Guest has left.
    CheckedOut,

    /// Stay is over and settled.
    Completed,

    /// Reservation was cancelled.
    Cancelled,

    /// Dates are blocked by the property management.
    Blocked,
}

impl From<domain::booking::Status> for Status {
    fn from(status: domain::booking::Status) -> Self {
        use domain::booking::Status as S;

        match status {
            S::Inquiry => Self::Inquiry,
            S::Pending => Self::Pending,
            S::Confirmed => Self::Confirmed,
            S::CheckedIn => Self::CheckedIn,
            S::CheckedOut => Self::CheckedOut,
            S::Completed => Self::Completed,
            S::Cancelled => Self::Cancelled,
            S::Blocked => Self::Blocked,
        }
    }
}

#[cfg(test)]
mod spec {
    use service::domain::booking;

    use super::Status;

    #[test]
    fn every_status_is_exposed() {
        let exposed = booking::Status::ALL
            .iter()
            .map(|s| Status::from(*s))
            .collect::<Vec<_>>();

        assert_eq!(exposed.len(), 8);
        assert_eq!(
            Status::from(booking::Status::CheckedIn),
            Status::CheckedIn,
        );
        assert_eq!(
            Status::from(booking::Status::Cancelled),
            Status::Cancelled,
        );
    }
}
