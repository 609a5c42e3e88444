//! [`Command`] for removing the [`RevenueAllocation`]s of a [`Booking`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{booking, RevenueAllocation},
    infra::{database, Database},
    Service,
};
#[cfg(doc)]
use crate::domain::Booking;

use super::Command;

/// [`Command`] for removing all the [`RevenueAllocation`]s of a [`Booking`].
///
/// Returns the number of removed [`RevenueAllocation`]s.
#[derive(Clone, Copy, Debug)]
pub struct RemoveRevenueAllocations {
    /// ID of the [`Booking`] to remove the [`RevenueAllocation`]s of.
    pub booking_id: booking::Id,
}

impl<Db> Command<RemoveRevenueAllocations> for Service<Db>
where
    Db: Database<
        Delete<By<Vec<RevenueAllocation>, booking::Id>>,
        Ok = u64,
        Err = Traced<database::Error>,
    >,
{
    type Ok = u64;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        RemoveRevenueAllocations { booking_id }: RemoveRevenueAllocations,
    ) -> Result<Self::Ok, Self::Err> {
        let removed = self
            .database()
            .execute(Delete(By::<Vec<RevenueAllocation>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
            .inspect_err(|e| {
                log::error!(
                    "failed to remove `Booking(id: {booking_id})` revenue \
                     allocations: {e}",
                );
            })?;

        self.cache().invalidate_allocations(booking_id).await;

        Ok(removed)
    }
}

/// Error of [`RemoveRevenueAllocations`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),
}
