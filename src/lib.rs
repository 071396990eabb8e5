//! Rating library crate (used by the CLI and integration tests).
//!
//! Any identifiable entity can rate any other, optionally within a named scope, and entity
//! kinds can be ranked by an aggregate of the ratings they received.
//!
//! # Public API Surface
//!
//! ## Capabilities
//! - [`Entity`] - supplies a stable `(kind, id)` [`EntityRef`]
//! - [`Rater`] - `rate(...)` with the implementor as the rater
//! - [`Rankable`] - `order_by_rating(...)` over a type, hydrated through a [`Resolver`]
//!
//! ## Engine
//! - [`RatingEngine`] - records events and answers [`RankQuery`]s
//! - [`Ranker`], [`RankingCache`] - the pure ordering step and its optional cache
//!
//! ## Metrics
//! - [`Metric`], [`AggregateScore`], [`PriorWeight`] - sum, count, average and estimate
//!
//! ## Storage
//! - [`RateStore`] - the persistence boundary
//! - [`MemoryRateStore`], [`SqliteRateStore`] - bundled backends
//!
//! ## Configuration
//! - [`Config`], [`ConfigError`] - `RATING_*` environment settings

pub mod capability;
pub mod config;
pub mod constants;
pub mod metrics;
pub mod ranking;
pub mod reference;
pub mod store;

pub use capability::{Entity, Rankable, Rater, Resolver};
pub use config::{Config, ConfigError};
pub use constants::{DEFAULT_CACHE_CAPACITY, DEFAULT_PRIOR_WEIGHT};
pub use metrics::{AggregateScore, Metric, MetricError, Population, PriorWeight};
pub use ranking::{
    Direction, RankQuery, Ranker, RankingCache, RankingError, RankingResult, RatingEngine,
};
pub use reference::{EntityId, EntityRef, ReferenceError};
pub use store::{
    GroupedValues, MemoryRateStore, RateEvent, RateStore, RefRole, SqliteRateStore, StoreError,
    StoreResult,
};
