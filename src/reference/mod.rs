//! Polymorphic `(kind, id)` references.
//!
//! Raters, rateables and scopes are all addressed the same way: a kind tag naming the entity
//! type plus an id unique within that kind. Resolution from a reference back to a live entity
//! stays with the host (see [`crate::capability::Resolver`]).

pub mod error;


pub use error::ReferenceError;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::REF_SEPARATOR;

/// Identifier of an entity within its kind.
///
/// Ordering is the tie-break order used by rankings: numeric ids first (numerically), then
/// text ids (lexicographically).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Num(u64),
    Text(String),
}

impl EntityId {
    /// Returns `true` for an empty text id (numeric ids are always valid).
    pub fn is_empty(&self) -> bool {
        matches!(self, EntityId::Text(s) if s.is_empty())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Num(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl FromStr for EntityId {
    type Err = std::convert::Infallible;

    /// Canonical decimal digits parse as [`EntityId::Num`]; anything else, including `007`
    /// or `+7`, is kept as text so it displays back unchanged.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.bytes().all(|b| b.is_ascii_digit());
        let canonical = s == "0" || (digits && !s.starts_with('0'));
        match s.parse::<u64>() {
            Ok(n) if canonical => Ok(EntityId::Num(n)),
            _ => Ok(EntityId::Text(s.to_string())),
        }
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        EntityId::Num(id)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        EntityId::Num(u64::from(id))
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::Text(id.to_string())
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        EntityId::Text(id)
    }
}

impl From<Uuid> for EntityId {
    fn from(id: Uuid) -> Self {
        EntityId::Text(id.hyphenated().to_string())
    }
}

/// A `(kind, id)` pair naming any entity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: String,
    pub id: EntityId,
}

impl EntityRef {
    /// Builds a reference without validating it; stores validate on write.
    pub fn new(kind: impl Into<String>, id: impl Into<EntityId>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Checks that both halves of the reference are present.
    pub fn validate(&self) -> Result<(), ReferenceError> {
        if self.kind.trim().is_empty() {
            return Err(ReferenceError::EmptyKind);
        }
        if self.id.is_empty() {
            return Err(ReferenceError::EmptyId);
        }
        Ok(())
    }

    /// Returns `true` if this reference belongs to `kind`.
    #[inline]
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind, REF_SEPARATOR, self.id)
    }
}

impl FromStr for EntityRef {
    type Err = ReferenceError;

    /// Parses `kind:id`. Only the first separator splits, so text ids may contain `:`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(REF_SEPARATOR)
            .ok_or_else(|| ReferenceError::MissingSeparator {
                input: s.to_string(),
            })?;

        let Ok(id) = id.parse::<EntityId>();
        let reference = EntityRef::new(kind.trim(), id);
        reference.validate()?;
        Ok(reference)
    }
}
