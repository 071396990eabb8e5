use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::{RefRole, StoreError, StoreResult};
use crate::reference::EntityRef;

/// One immutable rating: `rater` gave `rateable` a `value`, optionally under `scope`.
///
/// There is no update path. Re-rating appends another event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEvent {
    pub id: Uuid,
    pub rater: EntityRef,
    pub rateable: EntityRef,
    /// `None` is the global, unscoped dimension.
    pub scope: Option<EntityRef>,
    pub value: f64,
    pub created_at: DateTime<Utc>,
}

impl RateEvent {
    /// Validates the inputs and stamps a fresh id and creation time.
    pub fn new(
        rater: EntityRef,
        rateable: EntityRef,
        scope: Option<EntityRef>,
        value: f64,
    ) -> StoreResult<Self> {
        validate_ref(&rater, RefRole::Rater)?;
        validate_ref(&rateable, RefRole::Rateable)?;
        if let Some(scope) = &scope {
            validate_ref(scope, RefRole::Scope)?;
        }
        if !value.is_finite() {
            return Err(StoreError::InvalidValue { value });
        }

        Ok(Self {
            id: Uuid::new_v4(),
            rater,
            rateable,
            scope,
            value,
            created_at: Utc::now(),
        })
    }

    /// Returns `true` if this event was recorded under exactly `scope`.
    ///
    /// `None` matches only unscoped events.
    #[inline]
    pub fn in_scope(&self, scope: Option<&EntityRef>) -> bool {
        self.scope.as_ref() == scope
    }
}

fn validate_ref(reference: &EntityRef, role: RefRole) -> StoreResult<()> {
    reference
        .validate()
        .map_err(|source| StoreError::InvalidReference { role, source })
}
