//! Query execution: the select pipeline, condition evaluation, the join
//! engine, and the aggregate engine.

pub mod aggregate;
pub mod expression;
pub mod join;
pub mod select;

use crate::types::schema::Label;
use crate::types::value::{Row, RowId};

/// A labeled set of result rows.
///
/// Base-table scans carry unqualified labels in schema order; join output
/// carries a mix of the working set's labels and `table.column` qualified
/// labels for the joined-in columns. Row-ids are never part of a result
/// set: `select` returns declared columns only, and merged join rows never
/// carry the internal row-id field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultSet {
    pub columns: Vec<Label>,
    pub rows: Vec<Row>,
}

impl ResultSet {
    pub fn new(columns: Vec<Label>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Resolves a requested column token: exact label match first (bare
    /// name or `table.column`); when that fails and the token is
    /// qualified, falls back to the first label whose suffix is the
    /// token's unqualified name.
    pub fn resolve(&self, token: &str) -> Option<usize> {
        if let Some(pos) = self.columns.iter().position(|label| label.matches(token)) {
            return Some(pos);
        }
        let (_, name) = token.rsplit_once('.')?;
        self.columns
            .iter()
            .position(|label| matches!(label, Label::Qualified(_, column) if column == name))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// The outcome of one executed command.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    TableCreated,
    Inserted(RowId),
    Rows(ResultSet),
    Updated(usize),
    Deleted(usize),
    IndexCreated,
}
