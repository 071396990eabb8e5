use std::collections::BTreeMap;
use std::sync::Arc;

use super::error::StoreResult;
use super::model::RateEvent;
use crate::reference::{EntityId, EntityRef};

/// Values recorded against each rateable id, in recording order.
pub type GroupedValues = BTreeMap<EntityId, Vec<f64>>;

/// Durable, append-only home of rate events.
///
/// Implementations must be safe to share across threads: writes are single appends and reads
/// see every append that completed before they started.
pub trait RateStore: Send + Sync {
    /// Appends a new event. Never overwrites an earlier one.
    fn record(
        &self,
        rater: EntityRef,
        rateable: EntityRef,
        scope: Option<EntityRef>,
        value: f64,
    ) -> StoreResult<RateEvent>;

    /// Returns every value recorded against `rateable_kind`, partitioned by rateable id.
    ///
    /// Only events whose scope equals `scope` exactly are included; `None` selects unscoped
    /// events only. Rateables without matching events are absent from the map.
    fn fetch_grouped_values(
        &self,
        rateable_kind: &str,
        scope: Option<&EntityRef>,
    ) -> StoreResult<GroupedValues>;

    /// Returns the events `rater` recorded for `rateable` under exactly `scope`, oldest first.
    fn events_for(
        &self,
        rater: &EntityRef,
        rateable: &EntityRef,
        scope: Option<&EntityRef>,
    ) -> StoreResult<Vec<RateEvent>>;

    /// Opaque token that changes whenever the store's contents change.
    ///
    /// Used to key cached rankings; two equal values mean no observable write happened in
    /// between.
    fn generation(&self) -> StoreResult<u64>;
}

impl<S: RateStore + ?Sized> RateStore for Arc<S> {
    fn record(
        &self,
        rater: EntityRef,
        rateable: EntityRef,
        scope: Option<EntityRef>,
        value: f64,
    ) -> StoreResult<RateEvent> {
        (**self).record(rater, rateable, scope, value)
    }

    fn fetch_grouped_values(
        &self,
        rateable_kind: &str,
        scope: Option<&EntityRef>,
    ) -> StoreResult<GroupedValues> {
        (**self).fetch_grouped_values(rateable_kind, scope)
    }

    fn events_for(
        &self,
        rater: &EntityRef,
        rateable: &EntityRef,
        scope: Option<&EntityRef>,
    ) -> StoreResult<Vec<RateEvent>> {
        (**self).events_for(rater, rateable, scope)
    }

    fn generation(&self) -> StoreResult<u64> {
        (**self).generation()
    }
}
