use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{RankingError, RankingResult};
use crate::metrics::Metric;
use crate::reference::EntityRef;

/// Sort order of a ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[serde(alias = "asc")]
    Ascending,
    /// Best first.
    #[default]
    #[serde(alias = "desc")]
    Descending,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        }
    }

    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            Direction::Ascending => Direction::Descending,
            Direction::Descending => Direction::Ascending,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = RankingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Direction::Ascending),
            "desc" | "descending" => Ok(Direction::Descending),
            _ => Err(RankingError::UnknownDirection {
                name: s.to_string(),
            }),
        }
    }
}

/// Parameters of one ranking request.
///
/// Defaults to estimate, descending, unscoped: "best first" across all unscoped ratings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RankQuery {
    pub metric: Metric,
    pub direction: Direction,
    pub scope: Option<EntityRef>,
}

impl RankQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn ascending(self) -> Self {
        self.direction(Direction::Ascending)
    }

    pub fn descending(self) -> Self {
        self.direction(Direction::Descending)
    }

    /// Restricts the ranking to events recorded under exactly `scope`.
    pub fn scope(mut self, scope: EntityRef) -> Self {
        self.scope = Some(scope);
        self
    }

    pub fn unscoped(mut self) -> Self {
        self.scope = None;
        self
    }

    /// Sets the metric by name (`average`, `sum`, `count`/`total`, `estimate`).
    pub fn try_metric(self, name: &str) -> RankingResult<Self> {
        Ok(self.metric(name.parse()?))
    }

    /// Sets the direction by name (`asc`/`ascending`, `desc`/`descending`).
    pub fn try_direction(self, name: &str) -> RankingResult<Self> {
        Ok(self.direction(name.parse()?))
    }
}
