//! [`Database`]-related implementations.

#[cfg(test)]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "postgres")]
    /// [`Postgres`] error.
    Postgres(postgres::Error),

    #[cfg(test)]
    /// [`memory::Memory`] error.
    Memory(memory::Error),
}

impl Error {
    /// Indicates whether this [`Error`] is caused by the database being
    /// unreachable at the moment, so the operation may succeed if retried
    /// later.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match *self {
            #[cfg(feature = "postgres")]
            Self::Postgres(ref e) => e.is_unavailable(),

            #[cfg(test)]
            Self::Memory(memory::Error::Unavailable) => true,
        }
    }
}
