//! Read entities definitions.

pub mod allocation;
pub mod booking;
pub mod conflict;
pub mod unit;
