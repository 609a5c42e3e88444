//! GraphQL [`Mutation`]s definitions.

use common::Money;
use juniper::graphql_object;
use service::{command, Command as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Splits the revenue of a whole-property `Booking` equally between the
    /// owners of the property `Unit`s.
    ///
    /// Returns nothing for `Unit` `Booking`s and for properties without
    /// owned `Unit`s. Allocating the same `Booking` twice returns the
    /// already existing `RevenueAllocation`s.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "allocateRevenue",
            otel.name = Self::SPAN_NAME,
            property_id = %property_id,
            total = %total,
            unit_id = ?unit_id,
        ),
    )]
    pub async fn allocate_revenue(
        booking_id: api::booking::Id,
        property_id: api::property::Id,
        unit_id: Option<api::unit::Id>,
        total: Money,
        ctx: &Context,
    ) -> Result<Vec<api::RevenueAllocation>, Error> {
        ctx.service()
            .execute(command::AllocateRevenue {
                booking_id: booking_id.into(),
                property_id: property_id.into(),
                unit_id: unit_id.map(Into::into),
                total,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|a| a.into_iter().map(Into::into).collect())
    }

    /// Removes all the `RevenueAllocation`s of the `Booking` with the
    /// specified ID.
    ///
    /// Returns the number of removed `RevenueAllocation`s.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "removeRevenueAllocations",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn remove_revenue_allocations(
        booking_id: api::booking::Id,
        ctx: &Context,
    ) -> Result<i32, Error> {
        let removed = ctx
            .service()
            .execute(command::RemoveRevenueAllocations {
                booking_id: booking_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        i32::try_from(removed)
            .map_err(AsError::into_error)
            .map_err(ctx.error())
    }

    /// Cancels the `Booking` with the specified ID and removes its
    /// `RevenueAllocation`s.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `BOOKING_NOT_EXISTS` - the `Booking` with the specified ID does not
    ///                          exist;
    /// - `BOOKING_ALREADY_CANCELLED` - the `Booking` is cancelled already.
    #[tracing::instrument(
        skip_all,
        fields(
            booking_id = %booking_id,
            gql.name = "cancelBooking",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn cancel_booking(
        booking_id: api::booking::Id,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        ctx.service()
            .execute(command::CancelBooking {
                booking_id: booking_id.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for command::allocate_revenue::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "NEGATIVE_TOTAL"]
                #[status = BAD_REQUEST]
                #[message = "`Booking` total must not be negative"]
                NegativeTotal,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NegativeTotal(_) => Some(Error::NegativeTotal.into()),
        }
    }
}

impl AsError for command::remove_revenue_allocations::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

impl AsError for command::cancel_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "BOOKING_ALREADY_CANCELLED"]
                #[status = CONFLICT]
                #[message = "`Booking` is cancelled already"]
                AlreadyCancelled,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::BookingAlreadyCancelled(_) => {
                Some(Error::AlreadyCancelled.into())
            }
            Self::BookingNotExists(_) => {
                Some(api::BookingError::NotExists.into())
            }
        }
    }
}
