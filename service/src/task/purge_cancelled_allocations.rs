//! [`PurgeCancelledAllocations`] [`Task`].

use std::{convert::Infallible, error::Error, time};

use common::operations::{By, Delete, Perform, Start};
use smart_default::SmartDefault;
use tokio::time::interval;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::RevenueAllocation,
    infra::{database, Database},
    read::allocation::OfCancelledBookings,
    Service,
};
#[cfg(doc)]
use crate::domain::Booking;

use super::Task;

/// Configuration for [`PurgeCancelledAllocations`] [`Task`].
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Interval between purges.
    #[default(time::Duration::from_secs(60 * 60))]
    pub interval: time::Duration,
}

/// [`Task`] for removing the [`RevenueAllocation`]s left behind by
/// [`Booking`]s cancelled elsewhere.
#[derive(Clone, Copy, Debug)]
pub struct PurgeCancelledAllocations<S> {
    /// [`Service`] instance.
    service: S,
}

impl<Db> Task<Start<By<PurgeCancelledAllocations<Self>, Config>>>
    for Service<Db>
where
    PurgeCancelledAllocations<Service<Db>>:
        Task<Perform<()>, Ok = u64, Err: Error> + 'static,
    Self: Clone,
{
    type Ok = ();
    type Err = Infallible;

    async fn execute(
        &self,
        Start(by): Start<By<PurgeCancelledAllocations<Self>, Config>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Config { interval: period } = by.into_inner();
        let task = PurgeCancelledAllocations {
            service: self.clone(),
        };

        let mut interval = interval(period);
        loop {
            _ = interval.tick().await;
            match task.execute(Perform(())).await {
                Ok(0) => {}
                Ok(purged) => log::info!(
                    "`task::PurgeCancelledAllocations` removed {purged} \
                     allocations of cancelled bookings",
                ),
                Err(e) => log::error!(
                    "`task::PurgeCancelledAllocations` failed: {e}",
                ),
            }
        }
    }
}

impl<Db> Task<Perform<()>> for PurgeCancelledAllocations<Service<Db>>
where
    Db: Database<
        Delete<By<Vec<RevenueAllocation>, OfCancelledBookings>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    type Ok = u64;
    type Err = ExecutionError;

    async fn execute(&self, _: Perform<()>) -> Result<Self::Ok, Self::Err> {
        let purged = self
            .service
            .database()
            .execute(Delete(By::new(OfCancelledBookings)))
            .await
            .map_err(tracerr::wrap!())?;

        // Purged rows are not tracked individually.
        if purged > 0 {
            self.service.cache().invalidate_all_allocations();
        }

        Ok(purged)
    }
}

/// Error of [`PurgeCancelledAllocations`] execution.
pub type ExecutionError = Traced<database::Error>;

#[cfg(test)]
mod spec {
    use common::{money::Currency, operations::Perform, DateTime, Money};

    use super::PurgeCancelledAllocations;
    use crate::{
        domain::{
            allocation,
            booking::{self, Stay, Status},
            owner, property, unit, Booking, RevenueAllocation,
        },
        infra::database::memory::Memory,
        query::allocation::ByBooking,
        task::Task as _,
        Config, Query as _, Service,
    };

    fn booking(status: Status) -> Booking {
        Booking {
            id: booking::Id::new(),
            property_id: property::Id::default(),
            unit_id: None,
            stay: Stay::new(
                "2024-06-01".parse().unwrap(),
                "2024-06-05".parse().unwrap(),
            )
            .unwrap(),
            status,
            total: Money::zero(Currency::Usd),
        }
    }

    fn allocation(booking_id: booking::Id) -> RevenueAllocation {
        RevenueAllocation {
            id: allocation::Id::new(),
            booking_id,
            property_id: property::Id::default(),
            unit_id: unit::Id::new(),
            owner_id: owner::Id::new(),
            amount: Money::zero(Currency::Usd),
            created_at: DateTime::now().coerce(),
        }
    }

    #[tokio::test]
    async fn removes_allocations_of_cancelled_bookings_only() {
        let db = Memory::default();
        let svc = Service::new(Config::default(), db.clone()).0;
        let (cancelled, confirmed) =
            (booking(Status::Cancelled), booking(Status::Confirmed));
        db.insert_booking(cancelled.clone());
        db.insert_booking(confirmed.clone());
        db.insert_allocation(allocation(cancelled.id));
        db.insert_allocation(allocation(cancelled.id));
        db.insert_allocation(allocation(confirmed.id));

        let purged = PurgeCancelledAllocations { service: svc }
            .execute(Perform(()))
            .await
            .unwrap();

        assert_eq!(purged, 2);
        let left = db.allocations();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].booking_id, confirmed.id);
    }

    #[tokio::test]
    async fn drops_cached_allocations_of_purged_bookings() {
        let db = Memory::default();
        let svc = Service::new(Config::default(), db.clone()).0;
        let cancelled = booking(Status::Cancelled);
        db.insert_booking(cancelled.clone());
        db.insert_allocation(allocation(cancelled.id));
        let by_booking = ByBooking {
            booking_id: cancelled.id,
        };
        assert_eq!(svc.execute(by_booking).await.unwrap().len(), 1);

        _ = PurgeCancelledAllocations {
            service: svc.clone(),
        }
        .execute(Perform(()))
        .await
        .unwrap();

        assert!(svc.execute(by_booking).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn fails_when_database_is_unavailable() {
        let db = Memory::default();
        let svc = Service::new(Config::default(), db.clone()).0;
        db.set_unavailable(true);

        let res = PurgeCancelledAllocations { service: svc }
            .execute(Perform(()))
            .await;

        assert!(res.is_err());
    }
}
