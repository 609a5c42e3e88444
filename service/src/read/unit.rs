//! [`Unit`]-related read definitions.

use derive_more::{Deref, From, Into};

#[cfg(doc)]
use crate::domain::Unit;

/// Number of [`Unit`]s registered for a property.
#[derive(Clone, Copy, Debug, Deref, Eq, From, Hash, Into, PartialEq)]
pub struct Count(pub i32);

impl Count {
    /// Indicates whether there are no [`Unit`]s at all.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}
