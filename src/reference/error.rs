use thiserror::Error;

/// Reasons an [`EntityRef`](super::EntityRef) is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("reference kind is empty")]
    EmptyKind,

    #[error("reference id is empty")]
    EmptyId,

    #[error("expected `kind:id`, got '{input}'")]
    MissingSeparator { input: String },
}
