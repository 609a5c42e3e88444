//! Background [`Task`]s definitions.

mod background;
pub mod purge_cancelled_allocations;

pub use common::Handler as Task;

pub use self::{
    background::Background,
    purge_cancelled_allocations::PurgeCancelledAllocations,
};
