//! GraphQL API definitions.

pub mod allocation;
pub mod booking;
pub mod conflict;
mod mutation;
pub mod owner;
pub mod property;
mod query;
pub mod unit;

use juniper::EmptySubscription;

use crate::{define_error, Context};

pub use self::{
    allocation::{MonthlyRevenue, RevenueAllocation},
    booking::Booking,
    mutation::Mutation,
    query::Query,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

define_error! {
    enum BookingError {
        #[code = "BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`Booking` with the specified ID does not exist"]
        NotExists,
    }
}
