//! Parsed statements

use crate::types::command::Command;
use crate::types::value::Value;

/// A parsed SQL statement.
///
/// Almost every statement parses straight into a [`Command`]. Positional
/// inserts are the exception: mapping their values onto column names
/// needs the table's schema, so the execution facade resolves them (and
/// enforces arity) before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Command(Command),
    PositionalInsert { table: String, values: Vec<Value> },
}
