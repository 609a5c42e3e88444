//! [`Command`] definition.

pub mod allocate_revenue;
pub mod cancel_booking;
pub mod remove_revenue_allocations;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    allocate_revenue::AllocateRevenue, cancel_booking::CancelBooking,
    remove_revenue_allocations::RemoveRevenueAllocations,
};
