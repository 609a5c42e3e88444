//! GraphQL [`Query`]s definitions.

use common::Date;
use juniper::graphql_object;
use service::{query, read, Query as _};

use crate::{api, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Checks whether the provided stay may be booked without overlapping
    /// the existing `Booking`s of the property.
    ///
    /// Never fails: if the existing `Booking`s cannot be inspected, an
    /// unverified `ConflictReport` allowing to proceed is returned.
    #[tracing::instrument(
        skip_all,
        fields(
            check_in = %check_in,
            check_out = %check_out,
            exclude_booking_id = ?exclude_booking_id,
            gql.name = "bookingConflicts",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
            unit_id = ?unit_id,
        ),
    )]
    pub async fn booking_conflicts(
        property_id: api::property::Id,
        check_in: Date,
        check_out: Date,
        unit_id: Option<api::unit::Id>,
        exclude_booking_id: Option<api::booking::Id>,
        ctx: &Context,
    ) -> Result<api::conflict::Report, Error> {
        ctx.service()
            .execute(query::CheckConflicts {
                property_id: property_id.into(),
                check_in,
                check_out,
                unit_id: unit_id.map(Into::into),
                exclude_booking_id: exclude_booking_id.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Indicates whether the revenue of the described `Booking` would be
    /// split between the owners of the property `Unit`s.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "shouldAllocateRevenue",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
            unit_id = ?unit_id,
        ),
    )]
    pub async fn should_allocate_revenue(
        property_id: api::property::Id,
        unit_id: Option<api::unit::Id>,
        ctx: &Context,
    ) -> Result<bool, Error> {
        ctx.service()
            .execute(query::allocation::ShouldCreate {
                property_id: property_id.into(),
                unit_id: unit_id.map(Into::into),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Returns the `RevenueAllocation`s of the `Booking` with the specified
    /// ID.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "revenueAllocations",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn revenue_allocations(
        booking_id: api::booking::Id,
        ctx: &Context,
    ) -> Result<Vec<api::RevenueAllocation>, Error> {
        ctx.service()
            .execute(query::allocation::ByBooking {
                booking_id: booking_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|a| a.into_iter().map(Into::into).collect())
    }

    /// Returns the `RevenueAllocation`s of the owner with the specified ID,
    /// the latest first.
    ///
    /// `from` and `to` dates are inclusive, and `RevenueAllocation`s of
    /// cancelled `Booking`s are omitted.
    #[tracing::instrument(
        skip_all,
        fields(
            from = ?from,
            gql.name = "ownerRevenueAllocations",
            otel.name = Self::SPAN_NAME,
            owner_id = %owner_id,
            to = ?to,
        ),
    )]
    pub async fn owner_revenue_allocations(
        owner_id: api::owner::Id,
        from: Option<Date>,
        to: Option<Date>,
        ctx: &Context,
    ) -> Result<Vec<api::RevenueAllocation>, Error> {
        ctx.service()
            .execute(query::allocation::ByOwner::by(
                read::allocation::ByOwner {
                    owner_id: owner_id.into(),
                    from,
                    to,
                },
            ))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|a| a.into_iter().map(Into::into).collect())
    }

    /// Returns the monthly revenue of the owner with the specified ID, per
    /// property, the latest months first.
    ///
    /// Never fails: if the revenue cannot be summarized, an empty list is
    /// returned.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "ownerRevenueSummary",
            otel.name = Self::SPAN_NAME,
            owner_id = %owner_id,
        ),
    )]
    pub async fn owner_revenue_summary(
        owner_id: api::owner::Id,
        ctx: &Context,
    ) -> Result<Vec<api::MonthlyRevenue>, Error> {
        ctx.service()
            .execute(query::allocation::OwnerSummary {
                owner_id: owner_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|s| s.into_iter().map(Into::into).collect())
    }

    /// Returns the `Booking` with the specified ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "booking",
            id = %id,
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn booking(
        id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(query::booking::ById::by(id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| api::BookingError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }
}
