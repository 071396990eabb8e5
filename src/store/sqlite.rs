//! SQLite-backed rate event store.
//!
//! Events live in a single append-only table. Scope matching uses SQL's null-safe `IS`, so an
//! unscoped query matches unscoped rows only.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::{Connection, Row, params};
use tracing::{debug, info};
use uuid::Uuid;

use super::backend::{GroupedValues, RateStore};
use super::error::{StoreError, StoreResult};
use super::model::RateEvent;
use crate::constants::RATE_EVENTS_TABLE;
use crate::reference::{EntityId, EntityRef};

/// Rate event store over a single SQLite connection.
pub struct SqliteRateStore {
    conn: Mutex<Connection>,
    writes: AtomicU64,
}

impl std::fmt::Debug for SqliteRateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRateStore")
            .field("writes", &self.writes.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl SqliteRateStore {
    /// Opens (creating if needed) the database at `path` and ensures the schema exists.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let store = Self::from_connection(Connection::open(path)?)?;
        info!(path = %path.display(), "Opened SQLite rate store");
        Ok(store)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            writes: AtomicU64::new(0),
        })
    }

    /// Returns the number of stored events.
    pub fn len(&self) -> StoreResult<usize> {
        let conn = self.conn.lock();
        let n: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {RATE_EVENTS_TABLE}"),
            [],
            |row| row.get(0),
        )?;
        Ok(n as usize)
    }

    /// Returns `true` if no events are stored.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

fn init_schema(conn: &Connection) -> StoreResult<()> {
    // Id columns are untyped so numeric ids stay INTEGER and text ids stay TEXT.
    conn.execute_batch(&format!(
        "BEGIN;
        CREATE TABLE IF NOT EXISTS {RATE_EVENTS_TABLE} (
            id BLOB PRIMARY KEY NOT NULL,
            rater_kind TEXT NOT NULL,
            rater_id NOT NULL,
            rateable_kind TEXT NOT NULL,
            rateable_id NOT NULL,
            scope_kind TEXT,
            scope_id,
            value REAL NOT NULL,
            created_at TEXT NOT NULL,
            CHECK ((scope_kind IS NULL) = (scope_id IS NULL))
        );
        CREATE INDEX IF NOT EXISTS idx_{RATE_EVENTS_TABLE}_rateable
            ON {RATE_EVENTS_TABLE} (rateable_kind, scope_kind, scope_id, rateable_id);
        CREATE INDEX IF NOT EXISTS idx_{RATE_EVENTS_TABLE}_rater
            ON {RATE_EVENTS_TABLE} (rater_kind, rater_id, rateable_kind, rateable_id);
        COMMIT;"
    ))?;
    Ok(())
}

impl ToSql for EntityId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            EntityId::Num(n) => i64::try_from(*n)
                .map(|n| ToSqlOutput::Owned(Value::Integer(n)))
                .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e))),
            EntityId::Text(s) => Ok(ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes()))),
        }
    }
}

impl FromSql for EntityId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(n) => u64::try_from(n)
                .map(EntityId::Num)
                .map_err(|_| FromSqlError::OutOfRange(n)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|s| EntityId::Text(s.to_string()))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

/// Column values of one row, before the scope pair is checked.
struct EventRow {
    id: Uuid,
    rater: EntityRef,
    rateable: EntityRef,
    scope_kind: Option<String>,
    scope_id: Option<EntityId>,
    value: f64,
    created_at: DateTime<Utc>,
}

impl EventRow {
    const COLUMNS: &'static str = "id, rater_kind, rater_id, rateable_kind, rateable_id, \
                                   scope_kind, scope_id, value, created_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            rater: EntityRef::new(row.get::<_, String>(1)?, row.get::<_, EntityId>(2)?),
            rateable: EntityRef::new(row.get::<_, String>(3)?, row.get::<_, EntityId>(4)?),
            scope_kind: row.get(5)?,
            scope_id: row.get(6)?,
            value: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_event(self) -> StoreResult<RateEvent> {
        let scope = match (self.scope_kind, self.scope_id) {
            (Some(kind), Some(id)) => Some(EntityRef::new(kind, id)),
            (None, None) => None,
            _ => {
                return Err(StoreError::CorruptRow {
                    reason: format!("event {} has a partial scope reference", self.id),
                });
            }
        };

        Ok(RateEvent {
            id: self.id,
            rater: self.rater,
            rateable: self.rateable,
            scope,
            value: self.value,
            created_at: self.created_at,
        })
    }
}

/// Numeric ids above `i64::MAX` can never be stored, so reads filtering on one match nothing.
fn storable(id: &EntityId) -> bool {
    !matches!(id, EntityId::Num(n) if i64::try_from(*n).is_err())
}

fn scope_params(scope: Option<&EntityRef>) -> (Option<&str>, Option<&EntityId>) {
    (scope.map(|s| s.kind.as_str()), scope.map(|s| &s.id))
}

impl RateStore for SqliteRateStore {
    fn record(
        &self,
        rater: EntityRef,
        rateable: EntityRef,
        scope: Option<EntityRef>,
        value: f64,
    ) -> StoreResult<RateEvent> {
        let event = RateEvent::new(rater, rateable, scope, value)?;
        let (scope_kind, scope_id) = scope_params(event.scope.as_ref());

        let conn = self.conn.lock();
        conn.execute(
            &format!(
                "INSERT INTO {RATE_EVENTS_TABLE} ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                EventRow::COLUMNS
            ),
            params![
                event.id,
                event.rater.kind,
                event.rater.id,
                event.rateable.kind,
                event.rateable.id,
                scope_kind,
                scope_id,
                event.value,
                event.created_at,
            ],
        )?;
        self.writes.fetch_add(1, Ordering::Release);
        drop(conn);

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
        if scope.is_some_and(|s| !storable(&s.id)) {
            return Ok(GroupedValues::new());
        }
        let (scope_kind, scope_id) = scope_params(scope);

        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT rateable_id, value FROM {RATE_EVENTS_TABLE}
             WHERE rateable_kind = ?1 AND scope_kind IS ?2 AND scope_id IS ?3
             ORDER BY rowid"
        ))?;
        let rows = stmt.query_map(params![rateable_kind, scope_kind, scope_id], |row| {
            Ok((row.get::<_, EntityId>(0)?, row.get::<_, f64>(1)?))
        })?;

        let mut groups = GroupedValues::new();
        for row in rows {
            let (id, value) = row?;
            groups.entry(id).or_default().push(value);
        }
        Ok(groups)
    }

    fn events_for(
        &self,
        rater: &EntityRef,
        rateable: &EntityRef,
        scope: Option<&EntityRef>,
    ) -> StoreResult<Vec<RateEvent>> {
        let ids = [Some(rater), Some(rateable), scope];
        if ids.into_iter().flatten().any(|r| !storable(&r.id)) {
            return Ok(Vec::new());
        }
        let (scope_kind, scope_id) = scope_params(scope);

        let conn = self.conn.lock();
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT {} FROM {RATE_EVENTS_TABLE}
             WHERE rater_kind = ?1 AND rater_id = ?2
               AND rateable_kind = ?3 AND rateable_id = ?4
               AND scope_kind IS ?5 AND scope_id IS ?6
             ORDER BY rowid",
            EventRow::COLUMNS
        ))?;
        let rows = stmt.query_map(
            params![
                rater.kind,
                rater.id,
                rateable.kind,
                rateable.id,
                scope_kind,
                scope_id
            ],
            EventRow::from_row,
        )?;

        rows.map(|row| row?.into_event()).collect()
    }

    /// Local write count plus `PRAGMA data_version`, which moves when other connections commit.
    fn generation(&self) -> StoreResult<u64> {
        let conn = self.conn.lock();
        let data_version: i64 = conn.query_row("PRAGMA data_version", [], |row| row.get(0))?;
        Ok(self
            .writes
            .load(Ordering::Acquire)
            .wrapping_add(data_version as u64))
    }
}
