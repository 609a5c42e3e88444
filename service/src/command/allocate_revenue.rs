//! [`Command`] for allocating the revenue of a [`Booking`].

use common::{
    operations::{By, Commit, Insert, Lock, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use rust_decimal::Decimal;
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{allocation, booking, property, unit, RevenueAllocation, Unit},
    infra::{database, Database},
    query::allocation::ShouldCreate,
    Query, Service,
};
#[cfg(doc)]
use crate::domain::Booking;

use super::Command;

/// [`Command`] for splitting the revenue of a whole-property [`Booking`]
/// between the owners of the property [`Unit`]s.
///
/// Nothing is allocated for [`Unit`] [`Booking`]s and for properties without
/// [`Unit`]s. Allocating the same [`Booking`] twice returns the already
/// existing [`RevenueAllocation`]s.
///
/// The split itself follows [`allocation::split()`].
#[derive(Clone, Copy, Debug)]
pub struct AllocateRevenue {
    /// ID of the [`Booking`] the revenue comes from.
    pub booking_id: booking::Id,

    /// ID of the booked property.
    pub property_id: property::Id,

    /// ID of the booked [`Unit`], if any.
    pub unit_id: Option<unit::Id>,

    /// Total revenue of the [`Booking`].
    pub total: Money,
}

impl<Db> Command<AllocateRevenue> for Service<Db>
where
    Self: Query<ShouldCreate, Ok = bool, Err = Traced<database::Error>>,
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Vec<RevenueAllocation>, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<RevenueAllocation>, booking::Id>>,
            Ok = Vec<RevenueAllocation>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Vec<Unit>, property::Id>>,
            Ok = Vec<Unit>,
            Err = Traced<database::Error>,
        > + Database<
            Insert<Vec<RevenueAllocation>>,
            Err = Traced<database::Error>,
        > + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Vec<RevenueAllocation>;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AllocateRevenue,
    ) -> Result<Self::Ok, Self::Err> {
        let AllocateRevenue {
            booking_id,
            property_id,
            unit_id,
            total,
        } = cmd;

        if total.amount < Decimal::ZERO {
            return Err(tracerr::new!(ExecutionError::NegativeTotal(total)));
        }

        let allocations = async {
            let should_create = self
                .execute(ShouldCreate {
                    property_id,
                    unit_id,
                })
                .await
                .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
            if !should_create {
                return Ok(vec![]);
            }

            let tx = self
                .database()
                .execute(Transact)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;

            // Avoid concurrent allocation of the same `Booking`.
            tx.execute(Lock(By::new(booking_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
                .map(drop)?;

            let existing = tx
                .execute(Select(By::<Vec<RevenueAllocation>, _>::new(
                    booking_id,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
            if !existing.is_empty() {
                return Ok(existing);
            }

            let units = tx
                .execute(Select(By::<Vec<Unit>, _>::new(property_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))?;
            let created_at = DateTime::now().coerce();
            let created = allocation::split(total, &units)
                .into_iter()
                .map(|share| RevenueAllocation {
                    id: allocation::Id::new(),
                    booking_id,
                    property_id,
                    unit_id: share.unit_id,
                    owner_id: share.owner_id,
                    amount: share.amount,
                    created_at,
                })
                .collect::<Vec<_>>();
            if created.is_empty() {
                return Ok(created);
            }

            tx.execute(Insert(created.clone()))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
                .map(drop)?;

            tx.execute(Commit)
                .await
                .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
                .map(drop)?;

            Ok::<_, Traced<ExecutionError>>(created)
        }
        .await
        .inspect_err(|e| {
            log::error!(
                "failed to allocate `Booking(id: {booking_id})` revenue: {e}",
            );
        })?;

        self.cache().invalidate_allocations(booking_id).await;

        Ok(allocations)
    }
}

/// Error of [`AllocateRevenue`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Total revenue of the [`Booking`] is negative.
    #[display("total revenue `{_0}` is negative")]
    NegativeTotal(#[error(not(source))] Money),
}
