//! In-process rate event store.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tracing::debug;

use super::backend::{GroupedValues, RateStore};
use super::error::StoreResult;
use super::model::RateEvent;
use crate::reference::EntityRef;

/// Append-only event log held in memory.
#[derive(Debug, Default)]
pub struct MemoryRateStore {
    events: RwLock<Vec<RateEvent>>,
    generation: AtomicU64,
}

impl MemoryRateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    /// Returns a copy of every event in recording order.
    pub fn snapshot(&self) -> Vec<RateEvent> {
        self.events.read().clone()
    }
}

impl RateStore for MemoryRateStore {
    fn record(
        &self,
        rater: EntityRef,
        rateable: EntityRef,
        scope: Option<EntityRef>,
        value: f64,
    ) -> StoreResult<RateEvent> {
        let event = RateEvent::new(rater, rateable, scope, value)?;

        let mut events = self.events.write();
        events.push(event.clone());
        // Bumped under the write lock so a reader never pairs new contents with an old token.
        self.generation.fetch_add(1, Ordering::Release);
        drop(events);

        debug!(
            event_id = %event.id,
            rater = %event.rater,
            rateable = %event.rateable,
            scope = ?event.scope.as_ref().map(ToString::to_string),
            value = event.value,
            "Recorded rate event"
        );
        Ok(event)
    }

    fn fetch_grouped_values(
        &self,
        rateable_kind: &str,
        scope: Option<&EntityRef>,
    ) -> StoreResult<GroupedValues> {
        let events = self.events.read();
        let mut groups = GroupedValues::new();

        for event in events
            .iter()
            .filter(|e| e.rateable.is_kind(rateable_kind) && e.in_scope(scope))
        {
            groups
                .entry(event.rateable.id.clone())
                .or_default()
                .push(event.value);
        }

        Ok(groups)
    }

    fn events_for(
        &self,
        rater: &EntityRef,
        rateable: &EntityRef,
        scope: Option<&EntityRef>,
    ) -> StoreResult<Vec<RateEvent>> {
        Ok(self
            .events
            .read()
            .iter()
            .filter(|e| &e.rater == rater && &e.rateable == rateable && e.in_scope(scope))
            .cloned()
            .collect())
    }

    fn generation(&self) -> StoreResult<u64> {
        Ok(self.generation.load(Ordering::Acquire))
    }
}
