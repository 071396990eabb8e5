use std::fmt;

use thiserror::Error;

use crate::reference::ReferenceError;

/// Which side of a rate event a reference was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefRole {
    Rater,
    Rateable,
    Scope,
}

impl fmt::Display for RefRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RefRole::Rater => "rater",
            RefRole::Rateable => "rateable",
            RefRole::Scope => "scope",
        })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid {role} reference: {source}")]
    InvalidReference {
        role: RefRole,
        #[source]
        source: ReferenceError,
    },

    #[error("invalid rating value {value}: must be finite")]
    InvalidValue { value: f64 },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("corrupt rate event row: {reason}")]
    CorruptRow { reason: String },
}

impl StoreError {
    /// Returns `true` for the caller-facing "bad reference" failure.
    pub fn is_invalid_reference(&self) -> bool {
        matches!(self, StoreError::InvalidReference { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
