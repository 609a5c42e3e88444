//! Domain definitions.

pub mod allocation;
pub mod booking;
pub mod owner;
pub mod property;
pub mod unit;

pub use self::{allocation::RevenueAllocation, booking::Booking, unit::Unit};
