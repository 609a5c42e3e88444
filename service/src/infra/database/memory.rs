//! In-memory [`Database`] implementation for tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use common::{
    operations::{By, Commit, Delete, Insert, Lock, Select, Transact},
    Money,
};
use derive_more::{Display, Error as StdError};
use tracerr::Traced;

use crate::{
    domain::{booking, owner, property, Booking, RevenueAllocation, Unit},
    read::{
        self,
        allocation::{MonthlyRevenue, OfCancelledBookings},
        booking::Overlapping,
    },
};

use super::{Database, Error as DatabaseError};

/// Error of a [`Memory`] operation.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// [`Memory`] is switched to be unavailable.
    #[display("database is unavailable")]
    Unavailable,
}

/// Stored rows of a [`Memory`].
#[derive(Debug, Default)]
struct State {
    /// Whether every operation fails.
    unavailable: bool,

    /// Number of performed [`Select`]s.
    reads: usize,

    /// Stored [`Booking`]s.
    bookings: Vec<Booking>,

    /// Stored [`Unit`]s.
    units: Vec<Unit>,

    /// Stored [`RevenueAllocation`]s, in creation order.
    allocations: Vec<RevenueAllocation>,
}

impl State {
    /// Indicates whether the [`Booking`] with the provided ID is cancelled.
    fn is_cancelled(&self, id: booking::Id) -> bool {
        self.bookings
            .iter()
            .any(|b| b.id == id && b.status == booking::Status::Cancelled)
    }
}

/// [`Database`] keeping everything in memory.
///
/// [`Transact`]ions share the same state and are never rolled back.
#[derive(Clone, Debug, Default)]
pub struct Memory(Arc<Mutex<State>>);

impl Memory {
    /// Stores the provided [`Booking`], replacing the one with the same ID.
    pub fn insert_booking(&self, booking: Booking) {
        let mut state = self.lock();
        state.bookings.retain(|b| b.id != booking.id);
        state.bookings.push(booking);
    }

    /// Stores the provided [`Unit`].
    pub fn insert_unit(&self, unit: Unit) {
        self.lock().units.push(unit);
    }

    /// Stores the provided [`RevenueAllocation`].
    pub fn insert_allocation(&self, allocation: RevenueAllocation) {
        self.lock().allocations.push(allocation);
    }

    /// Makes every following operation fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Returns the number of [`Select`]s performed so far.
    pub fn reads(&self) -> usize {
        self.lock().reads
    }

    /// Returns all the stored [`RevenueAllocation`]s.
    pub fn allocations(&self) -> Vec<RevenueAllocation> {
        self.lock().allocations.clone()
    }

    /// Returns the stored [`Booking`] with the provided ID.
    pub fn booking(&self, id: booking::Id) -> Option<Booking> {
        self.lock().bookings.iter().find(|b| b.id == id).cloned()
    }

    /// Locks the [`State`] of this [`Memory`].
    fn lock(&self) -> MutexGuard<'_, State> {
        self.0.lock().unwrap()
    }

    /// Locks the [`State`] of this [`Memory`] for an operation, failing if
    /// it's unavailable.
    fn state(&self) -> Result<MutexGuard<'_, State>, Traced<DatabaseError>> {
        let state = self.lock();
        if state.unavailable {
            return Err(tracerr::new!(DatabaseError::from(Error::Unavailable)));
        }
        Ok(state)
    }

    /// Same as [`Memory::state()`], but counts the operation as a read.
    fn read(&self) -> Result<MutexGuard<'_, State>, Traced<DatabaseError>> {
        let mut state = self.state()?;
        state.reads += 1;
        Ok(state)
    }
}

impl Database<Transact> for Memory {
    type Ok = Self;
    type Err = Traced<DatabaseError>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        self.state().map(drop)?;
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory {
    type Ok = ();
    type Err = Traced<DatabaseError>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.state().map(drop)
    }
}

impl<T> Database<Lock<By<T, booking::Id>>> for Memory {
    type Ok = ();
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        _: Lock<By<T, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state().map(drop)
    }
}

impl Database<Select<By<Option<Booking>, booking::Id>>> for Memory {
    type Ok = Option<Booking>;
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        Ok(self.read()?.bookings.iter().find(|b| b.id == id).cloned())
    }
}

impl Database<Select<By<Vec<Booking>, Overlapping>>> for Memory {
    type Ok = Vec<Booking>;
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Booking>, Overlapping>>,
    ) -> Result<Self::Ok, Self::Err> {
        let Overlapping {
            property_id,
            stay,
            exclude,
        } = by.into_inner();

        let mut found = self
            .read()?
            .bookings
            .iter()
            .filter(|b| {
                b.property_id == property_id
                    && b.is_active()
                    && b.stay.overlaps(&stay)
                    && Some(b.id) != exclude
            })
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by_key(|b| b.stay.check_in());
        Ok(found)
    }
}

impl Database<Insert<Booking>> for Memory {
    type Ok = ();
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state()?;
        state.bookings.retain(|b| b.id != booking.id);
        state.bookings.push(booking);
        Ok(())
    }
}

impl Database<Select<By<read::unit::Count, property::Id>>> for Memory {
    type Ok = read::unit::Count;
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        Select(by): Select<By<read::unit::Count, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_id = by.into_inner();
        let count = self
            .read()?
            .units
            .iter()
            .filter(|u| u.property_id == property_id)
            .count();
        Ok(read::unit::Count(i32::try_from(count).unwrap()))
    }
}

impl Database<Select<By<Vec<Unit>, property::Id>>> for Memory {
    type Ok = Vec<Unit>;
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Unit>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let property_id = by.into_inner();
        Ok(self
            .read()?
            .units
            .iter()
            .filter(|u| u.property_id == property_id)
            .cloned()
            .collect())
    }
}

impl Database<Select<By<Vec<RevenueAllocation>, booking::Id>>> for Memory {
    type Ok = Vec<RevenueAllocation>;
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<RevenueAllocation>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let booking_id = by.into_inner();
        Ok(self
            .read()?
            .allocations
            .iter()
            .filter(|a| a.booking_id == booking_id)
            .cloned()
            .collect())
    }
}

impl Database<Select<By<Vec<RevenueAllocation>, read::allocation::ByOwner>>>
    for Memory
{
    type Ok = Vec<RevenueAllocation>;
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<RevenueAllocation>, read::allocation::ByOwner>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let by = by.into_inner();
        let state = self.read()?;

        let mut found = state
            .allocations
            .iter()
            .filter(|a| {
                a.owner_id == by.owner_id
                    && by.covers(a.created_at.date())
                    && !state.is_cancelled(a.booking_id)
            })
            .cloned()
            .collect::<Vec<_>>();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

impl Database<Select<By<Vec<MonthlyRevenue>, owner::Id>>> for Memory {
    type Ok = Vec<MonthlyRevenue>;
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<MonthlyRevenue>, owner::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let owner_id = by.into_inner();
        let state = self.read()?;

        let mut months = HashMap::<_, MonthlyRevenue>::new();
        for a in state.allocations.iter().filter(|a| {
            a.owner_id == owner_id && !state.is_cancelled(a.booking_id)
        }) {
            let month = a.created_at.date().first_day_of_month();
            let key = (a.property_id, month, a.amount.currency);
            let entry = months.entry(key).or_insert_with(|| MonthlyRevenue {
                owner_id,
                property_id: a.property_id,
                month,
                total: Money::zero(a.amount.currency),
                allocations: 0,
            });
            entry.total.amount += a.amount.amount;
            entry.allocations += 1;
        }

        let mut summary = months.into_values().collect::<Vec<_>>();
        summary.sort_by(|a, b| b.month.cmp(&a.month));
        Ok(summary)
    }
}

impl Database<Delete<By<Vec<RevenueAllocation>, booking::Id>>> for Memory {
    type Ok = u64;
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Vec<RevenueAllocation>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let booking_id = by.into_inner();
        let mut state = self.state()?;

        let before = state.allocations.len();
        state.allocations.retain(|a| a.booking_id != booking_id);
        Ok((before - state.allocations.len()) as u64)
    }
}

impl Database<Delete<By<Vec<RevenueAllocation>, OfCancelledBookings>>>
    for Memory
{
    type Ok = u64;
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        _: Delete<By<Vec<RevenueAllocation>, OfCancelledBookings>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut state = self.state()?;

        let cancelled = state
            .allocations
            .iter()
            .filter(|a| state.is_cancelled(a.booking_id))
            .map(|a| a.id)
            .collect::<Vec<_>>();
        state.allocations.retain(|a| !cancelled.contains(&a.id));
        Ok(cancelled.len() as u64)
    }
}

impl Database<Insert<Vec<RevenueAllocation>>> for Memory {
    type Ok = ();
    type Err = Traced<DatabaseError>;

    async fn execute(
        &self,
        Insert(allocations): Insert<Vec<RevenueAllocation>>,
    ) -> Result<Self::Ok, Self::Err> {
        self.state()?.allocations.extend(allocations);
        Ok(())
    }
}
