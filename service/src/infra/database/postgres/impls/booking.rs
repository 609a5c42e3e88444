//! [`Booking`]-related [`Database`] implementations.

use common::{
    operations::{By, Insert, Lock, Select},
    Money,
};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, Stay, Status},
        Booking,
    },
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read::booking::Overlapping,
};

/// Columns of the `bookings` table.
const COLUMNS: &str = "\
    id, property_id, unit_id, check_in, check_out, status, \
    total_amount, currency";

/// Builds a [`Booking`] out of the provided `bookings` table row.
fn from_row(row: &Row) -> Booking {
    Booking {
        id: row.get("id"),
        property_id: row.get("property_id"),
        unit_id: row.get("unit_id"),
        #[allow(unsafe_code, reason = "checked by `bookings` constraint")]
        stay: unsafe {
            Stay::new_unchecked(row.get("check_in"), row.get("check_out"))
        },
        status: row.get("status"),
        total: Money {
            amount: row.get("total_amount"),
            currency: row.get("currency"),
        },
    }
}

impl<C> Database<Select<By<Option<Booking>, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: booking::Id = by.into_inner();

        let sql = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1::UUID");
        Ok(self
            .query_opt(sql.as_str(), &[&id])
            .await
            .map_err(tracerr::wrap!())?
            .as_ref()
            .map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Booking>, Overlapping>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, Overlapping>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Overlapping {
            property_id,
            stay,
            exclude,
        } = by.into_inner();
        let active = Status::ALL
            .iter()
            .copied()
            .filter(|s| !s.class().is_terminal())
            .collect::<Vec<_>>();

        // Half-open ranges: back-to-back stays don't overlap.
        let sql = format!(
            "SELECT {COLUMNS} \
             FROM bookings \
             WHERE property_id = $1::UUID \
               AND status = ANY($2::TEXT[]) \
               AND check_in < $4::DATE \
               AND check_out > $3::DATE \
               AND ($5::UUID IS NULL OR id <> $5::UUID) \
             ORDER BY check_in, id",
        );
        Ok(self
            .query(
                sql.as_str(),
                &[
                    &property_id,
                    &active,
                    &stay.check_in(),
                    &stay.check_out(),
                    &exclude,
                ],
            )
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            INSERT INTO bookings (id, property_id, unit_id, \
                                  check_in, check_out, status, \
                                  total_amount, currency) \
            VALUES ($1::UUID, $2::UUID, $3::UUID, \
                    $4::DATE, $5::DATE, $6::TEXT, \
                    $7::NUMERIC, $8::TEXT) \
            ON CONFLICT (id) DO UPDATE \
            SET property_id = EXCLUDED.property_id, \
                unit_id = EXCLUDED.unit_id, \
                check_in = EXCLUDED.check_in, \
                check_out = EXCLUDED.check_out, \
                status = EXCLUDED.status, \
                total_amount = EXCLUDED.total_amount, \
                currency = EXCLUDED.currency";
        self.exec(
            SQL,
            &[
                &booking.id,
                &booking.property_id,
                &booking.unit_id,
                &booking.stay.check_in(),
                &booking.stay.check_out(),
                &booking.status,
                &booking.total.amount,
                &booking.total.currency,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Booking, booking::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id: booking::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id \
            FROM bookings \
            WHERE id = $1::UUID \
            FOR UPDATE";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}
