//! Rate event storage.
//!
//! [`RateStore`] is the boundary to persistence: append an event, and fetch the values of one
//! rateable kind grouped by id under an exact scope. Two backends ship with the crate:
//!
//! - [`MemoryRateStore`] keeps events in process behind a read-write lock
//! - [`SqliteRateStore`] persists them in a SQLite table

pub mod backend;
pub mod error;
pub mod memory;
mod model;
pub mod sqlite;


pub use backend::{GroupedValues, RateStore};
pub use error::{RefRole, StoreError, StoreResult};
pub use memory::MemoryRateStore;
pub use model::RateEvent;
pub use sqlite::SqliteRateStore;
