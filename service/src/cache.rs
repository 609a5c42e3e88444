//! In-process [`Cache`] of [`Query`] results.

use std::time;

use derive_more::Debug;
use moka::future::Cache as Storage;
use smart_default::SmartDefault;

use crate::domain::{booking, RevenueAllocation};
#[cfg(doc)]
use crate::{domain::Booking, Query};

/// [`Cache`] configuration.
#[derive(Clone, Copy, Debug, SmartDefault)]
pub struct Config {
    /// Maximum number of entries kept per cached [`Query`].
    #[default(10_000)]
    pub capacity: u64,

    /// Time after which a cached entry expires.
    #[default(time::Duration::from_secs(30))]
    pub ttl: time::Duration,
}

/// Content-addressed [`Cache`] of [`Query`] results, keyed by the [`Query`]
/// parameters.
///
/// Cloned [`Cache`]s share their entries.
#[derive(Clone, Debug)]
pub struct Cache {
    /// [`RevenueAllocation`]s keyed by their [`Booking`].
    #[debug(skip)]
    allocations: Storage<booking::Id, Vec<RevenueAllocation>>,
}

impl Cache {
    /// Creates a new empty [`Cache`] with the provided [`Config`].
    #[must_use]
    pub fn new(config: Config) -> Self {
        let Config { capacity, ttl } = config;
        Self {
            allocations: Storage::builder()
                .max_capacity(capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Returns the cached [`RevenueAllocation`]s of the provided [`Booking`],
    /// if any.
    pub async fn allocations(
        &self,
        booking_id: booking::Id,
    ) -> Option<Vec<RevenueAllocation>> {
        self.allocations.get(&booking_id).await
    }

    /// Caches the [`RevenueAllocation`]s of the provided [`Booking`].
    pub async fn put_allocations(
        &self,
        booking_id: booking::Id,
        allocations: Vec<RevenueAllocation>,
    ) {
        self.allocations.insert(booking_id, allocations).await;
    }

    /// Drops the cached [`RevenueAllocation`]s of the provided [`Booking`].
    pub async fn invalidate_allocations(&self, booking_id: booking::Id) {
        self.allocations.invalidate(&booking_id).await;
    }

    /// Drops all the cached [`RevenueAllocation`]s.
    pub fn invalidate_all_allocations(&self) {
        self.allocations.invalidate_all();
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
