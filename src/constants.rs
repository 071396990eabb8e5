//! Cross-cutting, shared constants.
//!
//! Prefer these over repeating literals; config and query defaults both read from here.

/// Default prior weight `m` for the estimate metric, in "votes' worth" of the global mean.
pub const DEFAULT_PRIOR_WEIGHT: f64 = 2.0;

/// Default maximum number of cached rankings.
pub const DEFAULT_CACHE_CAPACITY: u64 = 1024;

/// Separator between the kind tag and the id in the textual `kind:id` form.
pub const REF_SEPARATOR: char = ':';

/// Table holding rating events in the SQLite store.
pub const RATE_EVENTS_TABLE: &str = "rate_events";
