//! [`RevenueAllocation`]-related definitions.

use common::{Date, DateTime, Handler as _, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, query, read};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::{api, AsError, Context, Error};

/// Part of a whole-property `Booking` revenue attributed to the owner of a
/// single `Unit`.
#[derive(Clone, Debug)]
pub struct RevenueAllocation {
    /// Underlying [`domain::RevenueAllocation`].
    allocation: domain::RevenueAllocation,

    /// Lazily loaded [`domain::Booking`] the revenue comes from.
    booking: OnceCell<Option<domain::Booking>>,
}

impl From<domain::RevenueAllocation> for RevenueAllocation {
    fn from(allocation: domain::RevenueAllocation) -> Self {
        Self {
            allocation,
            booking: OnceCell::new(),
        }
    }
}

/// Part of a whole-property `Booking` revenue attributed to the owner of a
/// single `Unit`.
#[graphql_object(context = Context)]
impl RevenueAllocation {
    /// Unique identifier of this `RevenueAllocation`.
    pub fn id(&self) -> Id {
        self.allocation.id.into()
    }

    /// ID of the `Booking` the revenue comes from.
    pub fn booking_id(&self) -> api::booking::Id {
        self.allocation.booking_id.into()
    }

    /// `Booking` the revenue comes from.
    ///
    /// `null` if the `Booking` is not known to this service.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %self.allocation.booking_id,
            gql.name = "RevenueAllocation.booking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        &self,
        ctx: &Context,
    ) -> Result<Option<api::Booking>, Error> {
        let id = self.allocation.booking_id;
        self.booking
            .get_or_try_init(|| async {
                ctx.service()
                    .execute(query::booking::ById::by(id))
                    .await
                    .map_err(AsError::into_error)
                    .map_err(ctx.error())
            })
            .await
            .map(|b| b.clone().map(Into::into))
    }

    /// ID of the booked property.
    pub fn property_id(&self) -> api::property::Id {
        self.allocation.property_id.into()
    }

    /// ID of the `Unit` this `RevenueAllocation` is made for.
    pub fn unit_id(&self) -> api::unit::Id {
        self.allocation.unit_id.into()
    }

    /// ID of the owner receiving the revenue.
    pub fn owner_id(&self) -> api::owner::Id {
        self.allocation.owner_id.into()
    }

    /// Allocated amount.
    pub fn amount(&self) -> Money {
        self.allocation.amount
    }

    /// `DateTime` when this `RevenueAllocation` was created.
    pub fn created_at(&self) -> DateTime {
        self.allocation.created_at.coerce()
    }
}

/// Unique identifier of a `RevenueAllocation`.
#[derive(Clone, Copy, Debug, Display, Into, From, GraphQLScalar)]
#[from(domain::allocation::Id)]
#[into(domain::allocation::Id)]
#[graphql(name = "RevenueAllocationId", transparent)]
pub struct Id(Uuid);

/// Revenue received by an owner from a single property during a month.
#[derive(Clone, Debug, From)]
pub struct MonthlyRevenue(read::allocation::MonthlyRevenue);

#[graphql_object(context = Context)]
impl MonthlyRevenue {
    /// ID of the owner receiving the revenue.
    pub fn owner_id(&self) -> api::owner::Id {
        self.0.owner_id.into()
    }

    /// ID of the property the revenue comes from.
    pub fn property_id(&self) -> api::property::Id {
        self.0.property_id.into()
    }

    /// First day of the month.
    pub fn month(&self) -> Date {
        self.0.month
    }

    /// Sum of the `RevenueAllocation`s made during the month.
    pub fn total(&self) -> Money {
        self.0.total
    }

    /// Number of the summed `RevenueAllocation`s.
    pub fn allocations(&self) -> i32 {
        self.0.allocations
    }
}
