//! [`Unit`]-related [`Database`] implementations.

use common::operations::{By, Select};
use tracerr::Traced;

use crate::{
    domain::{property, Unit},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Select<By<read::unit::Count, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = read::unit::Count;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::unit::Count, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT COUNT(*)::INT4 AS count \
            FROM units \
            WHERE property_id = $1::UUID";
        Ok(self
            .query_opt(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .map_or(0, |row| row.get::<_, i32>("count"))
            .into())
    }
}

impl<C> Database<Select<By<Vec<Unit>, property::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Unit>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Unit>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_id: property::Id = by.into_inner();

        const SQL: &str = "\
            SELECT id, property_id, name, owner_id \
            FROM units \
            WHERE property_id = $1::UUID \
            ORDER BY name COLLATE \"C\", id";
        Ok(self
            .query(SQL, &[&property_id])
            .await
            .map_err(tracerr::wrap!())?
            .into_iter()
            .map(|row| Unit {
                id: row.get("id"),
                property_id: row.get("property_id"),
                name: row.get("name"),
                owner_id: row.get("owner_id"),
            })
            .collect())
    }
}
