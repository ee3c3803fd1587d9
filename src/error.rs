//! Error types for the engine

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Unknown table, duplicate table, unknown column, unsupported type token.
    #[error("schema error: {0}")]
    Schema(String),

    /// Null in a non-nullable column, duplicate primary/unique key value,
    /// missing required column on insert.
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// Value failed coercion to its declared type.
    #[error("type error: {0}")]
    Type(String),

    /// Positional insert value count does not match the target column count.
    #[error("table '{table}' has {expected} columns but {found} values were supplied")]
    Arity {
        table: String,
        expected: usize,
        found: usize,
    },

    /// Statement text the translation stage cannot understand.
    #[error("parse error: {0}")]
    Parse(String),

    /// Snapshot read/write failure. In-memory and on-disk state may have
    /// diverged; there is no automatic rollback.
    #[error("storage I/O error: {0}")]
    StorageIo(String),
}
