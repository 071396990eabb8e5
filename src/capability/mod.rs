//! Capabilities any entity type can opt into.
//!
//! An entity only needs to supply its `(kind, id)` reference ([`Entity`]). On top of that:
//!
//! - [`Rater`] gives instances `rate(...)`, recording events with themselves as the rater
//! - [`Rankable`] gives the type `order_by_rating(...)`, ranking its instances and hydrating
//!   them through a [`Resolver`]
//!
//! The two are independent; a type may be either, both or neither. Nothing here stores
//! entities: hydration goes through whatever arena or repository the host passes in.

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::metrics::AggregateScore;
use crate::ranking::{RankQuery, RankingResult, RatingEngine};
use crate::reference::{EntityId, EntityRef};
use crate::store::{RateEvent, RateStore};

/// Anything addressable by a stable `(kind, id)` reference.
pub trait Entity {
    fn entity_ref(&self) -> EntityRef;
}

impl Entity for EntityRef {
    fn entity_ref(&self) -> EntityRef {
        self.clone()
    }
}

impl<T: Entity + ?Sized> Entity for &T {
    fn entity_ref(&self) -> EntityRef {
        (**self).entity_ref()
    }
}

/// Looks up a live instance from its id.
pub trait Resolver<T> {
    fn resolve(&self, id: &EntityId) -> Option<T>;
}

impl<T, F> Resolver<T> for F
where
    F: Fn(&EntityId) -> Option<T>,
{
    fn resolve(&self, id: &EntityId) -> Option<T> {
        self(id)
    }
}

impl<T: Clone> Resolver<T> for HashMap<EntityId, T> {
    fn resolve(&self, id: &EntityId) -> Option<T> {
        self.get(id).cloned()
    }
}

impl<T: Clone> Resolver<T> for BTreeMap<EntityId, T> {
    fn resolve(&self, id: &EntityId) -> Option<T> {
        self.get(id).cloned()
    }
}

/// An entity that can rate others.
pub trait Rater: Entity {
    /// Records `value` for `rateable`, optionally under `scope`, with `self` as the rater.
    fn rate<S: RateStore>(
        &self,
        engine: &RatingEngine<S>,
        rateable: &dyn Entity,
        value: f64,
        scope: Option<EntityRef>,
    ) -> RankingResult<RateEvent> {
        engine.record(self.entity_ref(), rateable.entity_ref(), scope, value)
    }

    /// Returns the latest event `self` recorded for `rateable` under exactly `scope`.
    fn rate_for<S: RateStore>(
        &self,
        engine: &RatingEngine<S>,
        rateable: &dyn Entity,
        scope: Option<&EntityRef>,
    ) -> RankingResult<Option<RateEvent>> {
        let mut events = engine.rates_by(&self.entity_ref(), &rateable.entity_ref(), scope)?;
        Ok(events.pop())
    }

    /// Returns `true` if `self` has rated `rateable` under exactly `scope`.
    fn has_rated<S: RateStore>(
        &self,
        engine: &RatingEngine<S>,
        rateable: &dyn Entity,
        scope: Option<&EntityRef>,
    ) -> RankingResult<bool> {
        Ok(self.rate_for(engine, rateable, scope)?.is_some())
    }
}

/// An entity type whose instances can be ranked by their ratings.
pub trait Rankable: Entity + Sized {
    /// Kind tag shared by every instance's [`EntityRef`]. Rankings and [`rating`](Self::rating)
    /// both look instances up under this kind.
    const KIND: &'static str;

    /// Returns instances of this type ordered by `query`.
    ///
    /// Instances without matching events are left out. Ids the resolver cannot find are
    /// skipped and logged.
    fn order_by_rating<S, R>(
        engine: &RatingEngine<S>,
        resolver: &R,
        query: &RankQuery,
    ) -> RankingResult<Vec<Self>>
    where
        S: RateStore,
        R: Resolver<Self>,
    {
        let ids = engine.rank(Self::KIND, query)?;
        Ok(hydrate(Self::KIND, ids, resolver))
    }

    /// Ranks with the engine's default metric and direction, unscoped.
    fn order_by_default_rating<S, R>(
        engine: &RatingEngine<S>,
        resolver: &R,
    ) -> RankingResult<Vec<Self>>
    where
        S: RateStore,
        R: Resolver<Self>,
    {
        Self::order_by_rating(engine, resolver, &engine.default_query())
    }

    /// Returns this instance's aggregate under `scope`, or `None` if it has no events there.
    fn rating<S: RateStore>(
        &self,
        engine: &RatingEngine<S>,
        scope: Option<&EntityRef>,
    ) -> RankingResult<Option<AggregateScore>> {
        let reference = EntityRef::new(Self::KIND, self.entity_ref().id);
        engine.aggregate(&reference, scope)
    }
}

fn hydrate<T, R: Resolver<T>>(kind: &str, ids: Vec<EntityId>, resolver: &R) -> Vec<T> {
    ids.into_iter()
        .filter_map(|id| {
            let found = resolver.resolve(&id);
            if found.is_none() {
                warn!(kind, id = %id, "Ranked entity could not be resolved, skipping");
            }
            found
        })
        .collect()
}
