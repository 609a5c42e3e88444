//! [`Booking`]-related read definitions.

use crate::domain::{
    booking::{self, Stay},
    property,
};
#[cfg(doc)]
use crate::domain::{booking::Status, Booking};

/// Selector of the non-terminal [`Booking`]s of a property sharing at least
/// one night with the provided [`Stay`], ordered by their check-in.
///
/// [`Booking`]s of a terminal [`Status`] never overlap anything.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Overlapping {
    /// ID of the property to look the [`Booking`]s up for.
    pub property_id: property::Id,

    /// [`Stay`] the [`Booking`]s should overlap with.
    pub stay: Stay,

    /// ID of the [`Booking`] to leave out, if any.
    pub exclude: Option<booking::Id>,
}
