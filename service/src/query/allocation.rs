//! [`Query`] collection related to [`RevenueAllocation`]s.

use std::convert::Infallible;

use common::operations::{By, Select};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, owner, property, unit, RevenueAllocation},
    infra::{database, Database},
    read::{self, allocation::MonthlyRevenue},
    Service,
};
#[cfg(doc)]
use crate::domain::{Booking, Unit};

use super::{DatabaseQuery, Query};

/// [`Query`] deciding whether the revenue of a [`Booking`] should be split
/// into [`RevenueAllocation`]s.
///
/// Only whole-property [`Booking`]s of properties having registered
/// [`Unit`]s are split.
#[derive(Clone, Copy, Debug)]
pub struct ShouldCreate {
    /// ID of the booked property.
    pub property_id: property::Id,

    /// ID of the booked [`Unit`], if any.
    pub unit_id: Option<unit::Id>,
}

impl<Db> Query<ShouldCreate> for Service<Db>
where
    Db: Database<
        Select<By<read::unit::Count, property::Id>>,
        Ok = read::unit::Count,
        Err = Traced<database::Error>,
    >,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ShouldCreate {
            property_id,
            unit_id,
        }: ShouldCreate,
    ) -> Result<Self::Ok, Self::Err> {
        if unit_id.is_some() {
            return Ok(false);
        }

        self.database()
            .execute(Select(By::<read::unit::Count, _>::new(property_id)))
            .await
            .map(|count| !count.is_zero())
            .map_err(tracerr::wrap!())
    }
}

/// [`Query`] of the [`RevenueAllocation`]s of a [`Booking`].
#[derive(Clone, Copy, Debug)]
pub struct ByBooking {
    /// ID of the [`Booking`] the revenue comes from.
    pub booking_id: booking::Id,
}

impl<Db> Query<ByBooking> for Service<Db>
where
    Db: Database<
        Select<By<Vec<RevenueAllocation>, booking::Id>>,
        Ok = Vec<RevenueAllocation>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<RevenueAllocation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        ByBooking { booking_id }: ByBooking,
    ) -> Result<Self::Ok, Self::Err> {
        if let Some(allocations) = self.cache().allocations(booking_id).await {
            return Ok(allocations);
        }

        let allocations = self
            .database()
            .execute(Select(By::new(booking_id)))
            .await
            .map_err(tracerr::wrap!())?;
        self.cache()
            .put_allocations(booking_id, allocations.clone())
            .await;

        Ok(allocations)
    }
}

/// Queries the [`RevenueAllocation`]s of an owner.
pub type ByOwner =
    DatabaseQuery<By<Vec<RevenueAllocation>, read::allocation::ByOwner>>;

/// [`Query`] of the monthly revenue of an owner, per property, latest months
/// first.
///
/// Never fails: if the revenue cannot be summarized, nothing is returned.
#[derive(Clone, Copy, Debug)]
pub struct OwnerSummary {
    /// ID of the owner receiving the revenue.
    pub owner_id: owner::Id,
}

impl<Db> Query<OwnerSummary> for Service<Db>
where
    Db: Database<
        Select<By<Vec<MonthlyRevenue>, owner::Id>>,
        Ok = Vec<MonthlyRevenue>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Vec<MonthlyRevenue>;
    type Err = Infallible;

    async fn execute(
        &self,
        OwnerSummary { owner_id }: OwnerSummary,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self
            .database()
            .execute(Select(By::new(owner_id)))
            .await
            .unwrap_or_else(|e| {
                log::warn!(
                    "failed to summarize `Owner(id: {owner_id})` revenue: {e}",
                );
                vec![]
            }))
    }
}
