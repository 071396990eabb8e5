//! Cache of scored rating groups.
//!
//! Entries are keyed by `(rateable kind, scope)` and stamped with the store generation they
//! were computed at. A lookup with any other generation is a miss, so a write the store can
//! observe invalidates every cached ranking it could affect.

use std::sync::Arc;

use moka::sync::Cache;

use crate::metrics::AggregateScore;
use crate::reference::EntityRef;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScoreKey {
    kind: String,
    scope: Option<EntityRef>,
}

#[derive(Debug, Clone)]
struct CachedScores {
    generation: u64,
    scores: Arc<Vec<AggregateScore>>,
}

/// Bounded cache of unordered scores per `(kind, scope)`.
pub struct RankingCache {
    entries: Cache<ScoreKey, CachedScores>,
}

impl std::fmt::Debug for RankingCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RankingCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}

impl RankingCache {
    /// Creates a cache holding at most `capacity` `(kind, scope)` entries.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(capacity).build(),
        }
    }

    /// Returns the cached scores if they were computed at `generation`.
    pub fn get(
        &self,
        kind: &str,
        scope: Option<&EntityRef>,
        generation: u64,
    ) -> Option<Arc<Vec<AggregateScore>>> {
        let key = ScoreKey {
            kind: kind.to_string(),
            scope: scope.cloned(),
        };
        self.entries
            .get(&key)
            .filter(|cached| cached.generation == generation)
            .map(|cached| cached.scores)
    }

    /// Stores `scores` computed at `generation`, replacing any older entry.
    pub fn insert(
        &self,
        kind: &str,
        scope: Option<&EntityRef>,
        generation: u64,
        scores: Arc<Vec<AggregateScore>>,
    ) {
        let key = ScoreKey {
            kind: kind.to_string(),
            scope: scope.cloned(),
        };
        self.entries.insert(key, CachedScores { generation, scores });
    }

    /// Drops every entry.
    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }

    /// Returns the approximate number of entries.
    pub fn len(&self) -> u64 {
        self.entries.run_pending_tasks();
        self.entries.entry_count()
    }

    /// Returns `true` if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
