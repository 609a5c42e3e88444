//! [`RevenueAllocation`]-related [`Database`] implementations.

use common::{
    operations::{By, Delete, Insert, Lock, Select},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{booking, owner, RevenueAllocation},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::allocation::{ByOwner, MonthlyRevenue, OfCancelledBookings},
};
#[cfg(doc)]
use crate::domain::Booking;

/// Takes an advisory lock on a [`Booking`] ID, held until the end of the
/// current transaction.
const LOCK_BOOKING: &str = "\
    SELECT pg_advisory_xact_lock(hashtextextended($1::UUID::TEXT, 0))";

/// Builds a [`RevenueAllocation`] out of the provided
/// `revenue_allocations` table row.
fn from_row(row: &Row) -> RevenueAllocation {
    RevenueAllocation {
        id: row.get("id"),
        booking_id: row.get("booking_id"),
        property_id: row.get("property_id"),
        unit_id: row.get("unit_id"),
        owner_id: row.get("owner_id"),
        amount: Money {
            amount: row.get("amount"),
            currency: row.get("currency"),
        },
        created_at: row.get("created_at"),
    }
}

impl<C> Database<Select<By<Vec<RevenueAllocation>, booking::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<RevenueAllocation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<RevenueAllocation>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let booking_id: booking::Id = by.into_inner();

        // Same order the `Unit`s receive their shares in.
        const SQL: &str = "\
            SELECT a.id, a.booking_id, a.property_id, a.unit_id, \
                   a.owner_id, a.amount, a.currency, a.created_at \
            FROM revenue_allocations AS a \
            LEFT JOIN units AS u ON u.id = a.unit_id \
            WHERE a.booking_id = $1::UUID \
            ORDER BY u.name COLLATE \"C\", a.unit_id";
        Ok(self
            .query(SQL, &[&booking_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<RevenueAllocation>, ByOwner>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<RevenueAllocation>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<RevenueAllocation>, ByOwner>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ByOwner { owner_id, from, to } = by.into_inner();

        const SQL: &str = "\
            SELECT a.id, a.booking_id, a.property_id, a.unit_id, \
                   a.owner_id, a.amount, a.currency, a.created_at \
            FROM revenue_allocations AS a \
            WHERE a.owner_id = $1::UUID \
              AND ($2::DATE IS NULL \
                   OR (a.created_at AT TIME ZONE 'UTC')::DATE >= $2::DATE) \
              AND ($3::DATE IS NULL \
                   OR (a.created_at AT TIME ZONE 'UTC')::DATE <= $3::DATE) \
              AND NOT EXISTS ( \
                  SELECT 1 \
                  FROM bookings AS b \
                  WHERE b.id = a.booking_id \
                    AND b.status = 'cancelled' \
              ) \
            ORDER BY a.created_at DESC, a.id";
        Ok(self
            .query(SQL, &[&owner_id, &from, &to])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<MonthlyRevenue>, owner::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<MonthlyRevenue>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<MonthlyRevenue>, owner::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let owner_id: owner::Id = by.into_inner();

        const SQL: &str = "\
            SELECT owner_id, property_id, month, currency, \
                   total, allocations \
            FROM owner_revenue_summary \
            WHERE owner_id = $1::UUID \
            ORDER BY month DESC, property_id, currency";
        Ok(self
            .query(SQL, &[&owner_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| MonthlyRevenue {
                owner_id: row.get("owner_id"),
                property_id: row.get("property_id"),
                month: row.get("month"),
                total: Money {
                    amount: row.get("total"),
                    currency: row.get("currency"),
                },
                allocations: row.get("allocations"),
            })
            .collect())
    }
}

impl<C> Database<Lock<By<Vec<RevenueAllocation>, booking::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Vec<RevenueAllocation>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let booking_id: booking::Id = by.into_inner();

        self.exec(LOCK_BOOKING, &[&booking_id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Insert<Vec<RevenueAllocation>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(allocations): Insert<Vec<RevenueAllocation>>,
    ) -> Result<Self::Ok, Self::Err> {
        if allocations.is_empty() {
            return Ok(());
        }

        let ids = allocations.iter().map(|a| a.id).collect::<Vec<_>>();
        let booking_ids =
            allocations.iter().map(|a| a.booking_id).collect::<Vec<_>>();
        let property_ids =
            allocations.iter().map(|a| a.property_id).collect::<Vec<_>>();
        let unit_ids =
            allocations.iter().map(|a| a.unit_id).collect::<Vec<_>>();
        let owner_ids =
            allocations.iter().map(|a| a.owner_id).collect::<Vec<_>>();
        let amounts =
            allocations.iter().map(|a| a.amount.amount).collect::<Vec<_>>();
        let currencies = allocations
            .iter()
            .map(|a| a.amount.currency)
            .collect::<Vec<_>>();
        let created_at =
            allocations.iter().map(|a| a.created_at).collect::<Vec<_>>();

        const SQL: &str = "\
            INSERT INTO revenue_allocations (id, booking_id, property_id, \
                                             unit_id, owner_id, amount, \
                                             currency, created_at) \
            SELECT * \
            FROM UNNEST($1::UUID[], $2::UUID[], $3::UUID[], $4::UUID[], \
                        $5::UUID[], $6::NUMERIC[], $7::TEXT[], \
                        $8::TIMESTAMPTZ[])";
        self.exec(
            SQL,
            &[
                &ids,
                &booking_ids,
                &property_ids,
                &unit_ids,
                &owner_ids,
                &amounts,
                &currencies,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Delete<By<Vec<RevenueAllocation>, booking::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<RevenueAllocation>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let booking_id: booking::Id = by.into_inner();

        const SQL: &str = "\
            DELETE FROM revenue_allocations \
            WHERE booking_id = $1::UUID";
        self.exec(SQL, &[&booking_id])
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<C> Database<Delete<By<Vec<RevenueAllocation>, OfCancelledBookings>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = u64;
    type Err = Traced<database::Error>;

    /// Removes the [`RevenueAllocation`]s of the cancelled [`Booking`]s,
    /// leaving the ones of [`Booking`]s unknown to the database untouched.
    async fn execute(
        &self,
        _: Delete<By<Vec<RevenueAllocation>, OfCancelledBookings>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            DELETE FROM revenue_allocations AS a \
            USING bookings AS b \
            WHERE b.id = a.booking_id \
              AND b.status = 'cancelled'";
        self.exec(SQL, &[]).await.map_err(tracerr::wrap!())
    }
}
