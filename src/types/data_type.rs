//! Declared column types

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared type of a column.
///
/// `VARCHAR(n)` is normalized at table creation into `Varchar` plus the
/// column's `max_length`; the length is not part of the type itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Int,
    Varchar,
    Text,
    Date,
    Float,
    Bool,
}

impl DataType {
    /// Parses a declared type token from a column definition, normalizing
    /// `VARCHAR(n)` into `(Varchar, Some(n))`.
    ///
    /// # Errors
    /// `Error::Schema` on an unrecognized token or a malformed VARCHAR
    /// length.
    pub fn parse_token(token: &str) -> Result<(DataType, Option<usize>)> {
        let upper = token.trim().to_ascii_uppercase();
        if let Some(rest) = upper.strip_prefix("VARCHAR") {
            let rest = rest.trim();
            if rest.is_empty() {
                return Ok((DataType::Varchar, None));
            }
            let inner = rest
                .strip_prefix('(')
                .and_then(|r| r.strip_suffix(')'))
                .ok_or_else(|| Error::Schema(format!("invalid VARCHAR length in '{token}'")))?;
            let max_length = inner
                .trim()
                .parse::<usize>()
                .map_err(|_| Error::Schema(format!("invalid VARCHAR length in '{token}'")))?;
            return Ok((DataType::Varchar, Some(max_length)));
        }
        match upper.as_str() {
            "INT" => Ok((DataType::Int, None)),
            "TEXT" => Ok((DataType::Text, None)),
            "DATE" => Ok((DataType::Date, None)),
            "FLOAT" => Ok((DataType::Float, None)),
            "BOOL" => Ok((DataType::Bool, None)),
            _ => Err(Error::Schema(format!("unsupported data type: {token}"))),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Int => write!(f, "INT"),
            DataType::Varchar => write!(f, "VARCHAR"),
            DataType::Text => write!(f, "TEXT"),
            DataType::Date => write!(f, "DATE"),
            DataType::Float => write!(f, "FLOAT"),
            DataType::Bool => write!(f, "BOOL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_tokens() {
        assert_eq!(DataType::parse_token("INT").unwrap(), (DataType::Int, None));
        assert_eq!(
            DataType::parse_token("text").unwrap(),
            (DataType::Text, None)
        );
        assert_eq!(
            DataType::parse_token(" Bool ").unwrap(),
            (DataType::Bool, None)
        );
    }

    #[test]
    fn normalizes_varchar_length() {
        assert_eq!(
            DataType::parse_token("VARCHAR(50)").unwrap(),
            (DataType::Varchar, Some(50))
        );
        assert_eq!(
            DataType::parse_token("varchar").unwrap(),
            (DataType::Varchar, None)
        );
    }

    #[test]
    fn rejects_bad_tokens() {
        assert!(DataType::parse_token("BLOB").is_err());
        assert!(DataType::parse_token("VARCHAR(ten)").is_err());
        assert!(DataType::parse_token("VARCHAR(50").is_err());
    }
}
