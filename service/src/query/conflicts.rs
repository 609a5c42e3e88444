//! [`CheckConflicts`] [`Query`].

use std::convert::Infallible;

use common::{
    operations::{By, Select},
    Date,
};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        booking::{self, Stay},
        property, unit, Booking, Unit,
    },
    infra::{database, Database},
    read::{self, conflict::Report},
    Service,
};

use super::Query;

/// [`Query`] checking whether a stay may be booked without overlapping the
/// existing [`Booking`]s of a property.
///
/// Never fails: if the existing [`Booking`]s cannot be inspected, an
/// unverified [`Report`] allowing to proceed is returned.
///
/// Always reads the current [`Booking`]s: reports are never cached.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CheckConflicts {
    /// ID of the property to be booked.
    pub property_id: property::Id,

    /// Requested check-in [`Date`].
    pub check_in: Date,

    /// Requested check-out [`Date`].
    pub check_out: Date,

    /// ID of the [`Unit`] to be booked.
    ///
    /// [`None`] means the whole property.
    pub unit_id: Option<unit::Id>,

    /// ID of the [`Booking`] being edited, which shouldn't conflict with
    /// itself.
    pub exclude_booking_id: Option<booking::Id>,
}

impl<Db> Query<CheckConflicts> for Service<Db>
where
    Db: Database<
            Select<By<Vec<Booking>, read::booking::Overlapping>>,
            Ok = Vec<Booking>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Unit>, property::Id>>,
            Ok = Vec<Unit>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Report;
    type Err = Infallible;

    async fn execute(
        &self,
        query: CheckConflicts,
    ) -> Result<Self::Ok, Self::Err> {
        let CheckConflicts {
            property_id,
            check_in,
            check_out,
            unit_id,
            exclude_booking_id,
        } = query;

        // Invalid ranges are rejected by the caller's own validation.
        let Some(stay) = Stay::new(check_in, check_out) else {
            return Ok(Report::clear(unit_id));
        };

        let overlapping = self
            .database()
            .execute(Select(By::new(read::booking::Overlapping {
                property_id,
                stay,
                exclude: exclude_booking_id,
            })))
            .await;
        let report = match overlapping {
            Ok(bookings) if bookings.is_empty() && unit_id.is_none() => {
                Ok(Report::clear(None))
            }
            Ok(bookings) => self
                .database()
                .execute(Select(By::<Vec<Unit>, _>::new(property_id)))
                .await
                .map(|units| Report::detect(unit_id, bookings, &units)),
            Err(e) => Err(e),
        };

        Ok(report.unwrap_or_else(|e| {
            log::warn!(
                "failed to check conflicts of `Property(id: {property_id})` \
                 for {stay}: {e}",
            );
            Report::unverified(unit_id, e)
        }))
    }
}
