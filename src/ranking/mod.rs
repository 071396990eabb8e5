//! Ranking queries over rate events.
//!
//! A query fetches the values of one rateable kind under an exact scope, drops rateables with
//! no matching events, reduces each group with the [metric calculator](crate::metrics) and
//! sorts by the requested metric. Ties are broken by ascending [`EntityId`](crate::EntityId)
//! so repeated queries over the same data return the same order.

pub mod cache;
pub mod engine;
pub mod error;
pub mod ranker;
pub mod types;


pub use cache::RankingCache;
pub use engine::RatingEngine;
pub use error::{RankingError, RankingResult};
pub use ranker::Ranker;
pub use types::{Direction, RankQuery};
