//! The structured command contract
//!
//! A [`Command`] is what the translation stage hands the engine: one
//! already-parsed statement with clause text replaced by typed trees.
//! INSERT values arrive as a column-name to literal mapping; positional
//! statements are resolved against the schema before a command is built.

use super::expression::{Condition, JoinStep, OrderBy, Projection};
use super::value::Value;

/// One column of a CREATE TABLE statement, before type-token
/// normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    /// Raw declared type token, e.g. `INT` or `VARCHAR(50)`.
    pub type_token: String,
    /// Whether the column carried a NOT NULL marker.
    pub not_null: bool,
}

/// A structured command consumed by the execution facade.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateTable {
        table: String,
        columns: Vec<ColumnSpec>,
        primary_key: Option<String>,
        unique_keys: Vec<String>,
    },
    Insert {
        table: String,
        /// Column-name to literal mapping, in statement order.
        values: Vec<(String, Value)>,
    },
    Select {
        table: String,
        projection: Projection,
        filter: Option<Condition>,
        joins: Vec<JoinStep>,
        order_by: Option<OrderBy>,
        /// Kept textual: an integer-parsing limit truncates, anything else
        /// is silently ignored by the engine.
        limit: Option<String>,
    },
    Update {
        table: String,
        set_values: Vec<(String, Value)>,
        filter: Option<Condition>,
    },
    Delete {
        table: String,
        filter: Option<Condition>,
    },
    CreateIndex {
        table: String,
        column: String,
    },
}
