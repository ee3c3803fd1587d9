//! Table schemas and columns
//!
//! Tables are immutable after creation: there is no ALTER TABLE and no
//! DROP TABLE, only CREATE TABLE and CREATE INDEX over existing rows.

use super::data_type::DataType;
use super::value::Value;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A table schema: the ordered column definitions and their constraints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Unique table name. Can't be empty.
    pub name: String,
    /// The table's columns, in declared order. Must have at least one.
    pub columns: Vec<Column>,
}

impl Table {
    /// Creates a new table schema.
    pub fn new(name: String, columns: Vec<Column>) -> Result<Self> {
        if name.is_empty() {
            return Err(Error::Schema("table name cannot be empty".into()));
        }
        if columns.is_empty() {
            return Err(Error::Schema(format!("table '{name}' has no columns")));
        }
        for (i, column) in columns.iter().enumerate() {
            if columns[..i].iter().any(|c| c.name == column.name) {
                return Err(Error::Schema(format!(
                    "duplicate column '{}' in table '{name}'",
                    column.name
                )));
            }
        }
        if columns.iter().filter(|c| c.primary_key).count() > 1 {
            return Err(Error::Schema(format!(
                "table '{name}' declares more than one primary key"
            )));
        }
        Ok(Table { name, columns })
    }

    /// Returns the position and definition of the named column.
    pub fn column(&self, name: &str) -> Option<(usize, &Column)> {
        self.columns
            .iter()
            .enumerate()
            .find(|(_, c)| c.name == name)
    }

    /// The primary-key column, if one is declared.
    pub fn primary_key(&self) -> Option<&Column> {
        self.columns.iter().find(|c| c.primary_key)
    }
}

/// A table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name. Can't be empty.
    pub name: String,
    /// Declared datatype.
    pub datatype: DataType,
    /// Maximum text length, VARCHAR only.
    pub max_length: Option<usize>,
    /// Whether the column allows nulls. Defaults to true; PRIMARY KEY and
    /// NOT NULL both force it to false.
    pub nullable: bool,
    /// Whether this is the primary-key column.
    pub primary_key: bool,
    /// Whether the column only allows unique non-null values.
    pub unique: bool,
    /// Whether the column is recorded as indexed in the schema. Every
    /// column gains an index lazily at first insert regardless; this flag
    /// tracks explicit CREATE INDEX.
    pub indexed: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, datatype: DataType) -> Self {
        Column {
            name: name.into(),
            datatype,
            max_length: None,
            nullable: true,
            primary_key: false,
            unique: false,
            indexed: false,
        }
    }

    /// Sets the VARCHAR length bound.
    pub fn with_max_length(mut self, max_length: Option<usize>) -> Self {
        self.max_length = max_length;
        self
    }

    /// Sets whether the column is nullable. Ignored for primary keys.
    pub fn nullable(mut self, nullable: bool) -> Self {
        if self.primary_key && nullable {
            return self;
        }
        self.nullable = nullable;
        self
    }

    /// Marks this column as the primary key, forcing it non-nullable.
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Marks this column as a unique key.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Validates and coerces a raw value against this column's declared
    /// type. Nullability is enforced by the caller, not here: a null input
    /// always validates to null.
    ///
    /// # Errors
    /// `Error::Type` when the value cannot be coerced.
    pub fn validate(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            return Ok(Value::Null);
        }
        match self.datatype {
            DataType::Int => match value {
                Value::Int(_) => Ok(value),
                Value::Float(v) => Ok(Value::Int(v as i64)),
                Value::Str(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| Error::Type(format!("invalid INT value: {s}"))),
                other => Err(Error::Type(format!(
                    "invalid INT value: {}",
                    other.as_text()
                ))),
            },
            DataType::Float => match value {
                Value::Float(_) => Ok(value),
                Value::Int(i) => Ok(Value::Float(i as f64)),
                Value::Str(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| Error::Type(format!("invalid FLOAT value: {s}"))),
                other => Err(Error::Type(format!(
                    "invalid FLOAT value: {}",
                    other.as_text()
                ))),
            },
            DataType::Varchar => {
                let text = value.as_text();
                if let Some(max) = self.max_length {
                    if text.chars().count() > max {
                        return Err(Error::Type(format!(
                            "value for column '{}' exceeds VARCHAR({max})",
                            self.name
                        )));
                    }
                }
                Ok(Value::Str(text))
            }
            DataType::Text => Ok(Value::Str(value.as_text())),
            DataType::Bool => match value {
                Value::Bool(_) => Ok(value),
                other => match other.as_text().to_ascii_lowercase().as_str() {
                    "true" | "1" | "t" | "yes" => Ok(Value::Bool(true)),
                    "false" | "0" | "f" | "no" => Ok(Value::Bool(false)),
                    text => Err(Error::Type(format!("invalid BOOL value: {text}"))),
                },
            },
            DataType::Date => match value {
                Value::Str(s) if s.chars().count() == 10 => Ok(Value::Str(s)),
                other => Err(Error::Type(format!(
                    "invalid DATE format: {}",
                    other.as_text()
                ))),
            },
        }
    }
}

/// Label for a column in query results.
///
/// Base-table scans produce unqualified labels; the join engine qualifies
/// appended columns with their originating table's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Label {
    /// A bare column name.
    Unqualified(String),
    /// A `table.column` name produced by a join.
    Qualified(String, String),
}

impl Label {
    /// The column-name part of the label.
    pub fn column(&self) -> &str {
        match self {
            Label::Unqualified(name) => name,
            Label::Qualified(_, column) => column,
        }
    }

    /// True when `token` spells this label exactly: the bare name for
    /// unqualified labels, `table.column` for qualified ones.
    pub fn matches(&self, token: &str) -> bool {
        match self {
            Label::Unqualified(name) => name == token,
            Label::Qualified(table, column) => token
                .split_once('.')
                .is_some_and(|(t, c)| t == table && c == column),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Unqualified(name) => write!(f, "{name}"),
            Label::Qualified(table, column) => write!(f, "{table}.{column}"),
        }
    }
}
