use std::sync::Arc;

use tracing::{debug, instrument};

use super::cache::RankingCache;
use super::error::RankingResult;
use super::ranker::Ranker;
use super::types::RankQuery;
use crate::config::Config;
use crate::metrics::{AggregateScore, PriorWeight};
use crate::reference::{EntityId, EntityRef};
use crate::store::{RateEvent, RateStore};

/// Rating facade: records events into a [`RateStore`] and answers ranking queries over it.
///
/// Holds no mutable state of its own beyond the optional [`RankingCache`], so it can be shared
/// across threads (wrap it in an `Arc`) whenever the store can.
pub struct RatingEngine<S: RateStore> {
    store: S,
    ranker: Ranker,
    defaults: RankQuery,
    cache: Option<RankingCache>,
}

impl<S: RateStore> std::fmt::Debug for RatingEngine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RatingEngine")
            .field("ranker", &self.ranker)
            .field("defaults", &self.defaults)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<S: RateStore> RatingEngine<S> {
    /// Creates an engine with default prior weight, default query and no cache.
    pub fn new(store: S) -> Self {
        Self {
            store,
            ranker: Ranker::default(),
            defaults: RankQuery::default(),
            cache: None,
        }
    }

    /// Creates an engine from a loaded [`Config`].
    pub fn from_config(store: S, config: &Config) -> Self {
        let engine = Self::new(store)
            .with_prior_weight(config.prior_weight)
            .with_defaults(
                RankQuery::new()
                    .metric(config.default_metric)
                    .direction(config.default_direction),
            );
        match config.cache_capacity {
            0 => engine,
            capacity => engine.with_cache(capacity),
        }
    }

    pub fn with_prior_weight(mut self, prior: PriorWeight) -> Self {
        self.ranker = Ranker::new(prior);
        self
    }

    /// Sets the query [`default_query`](Self::default_query) returns.
    pub fn with_defaults(mut self, defaults: RankQuery) -> Self {
        self.defaults = defaults;
        self
    }

    /// Enables caching of scored groups for up to `capacity` `(kind, scope)` pairs.
    pub fn with_cache(mut self, capacity: u64) -> Self {
        self.cache = Some(RankingCache::with_capacity(capacity));
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn ranker(&self) -> &Ranker {
        &self.ranker
    }

    pub fn cache(&self) -> Option<&RankingCache> {
        self.cache.as_ref()
    }

    /// Returns the configured default query (metric and direction), unscoped.
    pub fn default_query(&self) -> RankQuery {
        self.defaults.clone()
    }

    /// Appends a rate event.
    pub fn record(
        &self,
        rater: EntityRef,
        rateable: EntityRef,
        scope: Option<EntityRef>,
        value: f64,
    ) -> RankingResult<RateEvent> {
        Ok(self.store.record(rater, rateable, scope, value)?)
    }

    /// Returns the ids of `kind` ordered by `query`.
    ///
    /// Rateables with no events under the query's scope are left out.
    pub fn rank(&self, kind: &str, query: &RankQuery) -> RankingResult<Vec<EntityId>> {
        Ok(self
            .rank_scored(kind, query)?
            .into_iter()
            .map(|score| score.rateable_id)
            .collect())
    }

    /// Like [`rank`](Self::rank), but keeps every aggregate next to its id.
    #[instrument(
        skip(self, query),
        fields(metric = %query.metric, direction = %query.direction, scope = ?query.scope)
    )]
    pub fn rank_scored(&self, kind: &str, query: &RankQuery) -> RankingResult<Vec<AggregateScore>> {
        let mut scores = Vec::clone(&*self.scores(kind, query.scope.as_ref())?);
        Ranker::order(&mut scores, query.metric, query.direction);

        debug!(ranked = scores.len(), "Ranking complete");
        Ok(scores)
    }

    /// Returns the aggregate of a single rateable under `scope`, or `None` if it has no events
    /// there. The estimate uses the population of the rateable's whole kind.
    #[instrument(skip(self, rateable), fields(rateable = %rateable))]
    pub fn aggregate(
        &self,
        rateable: &EntityRef,
        scope: Option<&EntityRef>,
    ) -> RankingResult<Option<AggregateScore>> {
        let scores = self.scores(&rateable.kind, scope)?;
        Ok(scores
            .binary_search_by(|score| score.rateable_id.cmp(&rateable.id))
            .ok()
            .map(|i| scores[i].clone()))
    }

    /// Returns the events `rater` recorded for `rateable` under exactly `scope`, oldest first.
    pub fn rates_by(
        &self,
        rater: &EntityRef,
        rateable: &EntityRef,
        scope: Option<&EntityRef>,
    ) -> RankingResult<Vec<RateEvent>> {
        Ok(self.store.events_for(rater, rateable, scope)?)
    }

    /// Scores for every rateable of `kind` under `scope`, in id order.
    fn scores(
        &self,
        kind: &str,
        scope: Option<&EntityRef>,
    ) -> RankingResult<Arc<Vec<AggregateScore>>> {
        let Some(cache) = &self.cache else {
            let groups = self.store.fetch_grouped_values(kind, scope)?;
            return Ok(Arc::new(self.ranker.score(&groups)?));
        };

        // Read before fetching: a write racing the fetch then lands under a stale key, never
        // the other way round.
        let generation = self.store.generation()?;
        if let Some(scores) = cache.get(kind, scope, generation) {
            debug!(kind, generation, "Ranking cache hit");
            return Ok(scores);
        }

        let groups = self.store.fetch_grouped_values(kind, scope)?;
        let scores = Arc::new(self.ranker.score(&groups)?);
        cache.insert(kind, scope, generation, Arc::clone(&scores));
        debug!(kind, generation, groups = groups.len(), "Ranking cache filled");
        Ok(scores)
    }
}
