//! Typed clause trees
//!
//! WHERE, JOIN, ORDER BY, and projection text is parsed once by the
//! translation stage ([`crate::parsing`]) into these trees; the engine
//! consumes them as data and never re-parses clause strings.

use std::fmt;

/// Comparison operators supported in conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Gt,
    Lt,
}

/// A boolean condition over one row.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// All sub-conditions must hold.
    And(Vec<Condition>),
    /// Any sub-condition must hold.
    Or(Vec<Condition>),
    /// A single column/literal comparison. Equality compares canonical
    /// text forms; `>`/`<` compare numeric coercions and are false when
    /// either side fails to coerce.
    Compare {
        column: String,
        op: CompareOp,
        literal: String,
    },
    /// Always true. Clause text the translation stage cannot recognize
    /// parses to this variant: the engine fails open rather than raising.
    Always,
}

/// One step of an equi-inner-join chain:
/// `JOIN <table> ON <left_table>.<left_column> = <right_table>.<right_column>`.
///
/// The right-hand table qualifier of the ON clause is not retained; the
/// joined rows come from `table` and are hashed by `right_column`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinStep {
    /// The table whose rows this step brings in.
    pub table: String,
    /// Table qualifier of the ON clause's left side.
    pub left_table: String,
    /// Column of the ON clause's left side, resolved against the working
    /// row set (qualified label first, bare name second).
    pub left_column: String,
    /// Column of the ON clause's right side, resolved against `table`.
    pub right_column: String,
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// A single-column ORDER BY clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

/// An aggregate function token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateFunc::Count => write!(f, "COUNT"),
            AggregateFunc::Sum => write!(f, "SUM"),
            AggregateFunc::Avg => write!(f, "AVG"),
            AggregateFunc::Min => write!(f, "MIN"),
            AggregateFunc::Max => write!(f, "MAX"),
        }
    }
}

/// The argument of an aggregate function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AggregateArg {
    /// `COUNT(*)`.
    Star,
    /// A column token, resolved like a projection token.
    Column(String),
}

/// One aggregate in a projection list, e.g. `AVG(score) AS mean`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSpec {
    pub func: AggregateFunc,
    pub arg: AggregateArg,
    pub alias: Option<String>,
}

impl AggregateSpec {
    /// The output column label: the alias when given, else the literal
    /// `FUNC(col)` spelling.
    pub fn label(&self) -> String {
        if let Some(alias) = &self.alias {
            return alias.clone();
        }
        match &self.arg {
            AggregateArg::Star => format!("{}(*)", self.func),
            AggregateArg::Column(column) => format!("{}({column})", self.func),
        }
    }
}

/// The requested output columns of a SELECT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `*`: every column of the working row set.
    All,
    /// Named column tokens, projected with exact-then-suffix matching.
    Columns(Vec<String>),
    /// Aggregates: short-circuits projection, ordering, and limiting.
    Aggregates(Vec<AggregateSpec>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aggregate_labels() {
        let spec = AggregateSpec {
            func: AggregateFunc::Count,
            arg: AggregateArg::Star,
            alias: None,
        };
        assert_eq!(spec.label(), "COUNT(*)");

        let spec = AggregateSpec {
            func: AggregateFunc::Avg,
            arg: AggregateArg::Column("score".into()),
            alias: None,
        };
        assert_eq!(spec.label(), "AVG(score)");

        let spec = AggregateSpec {
            func: AggregateFunc::Sum,
            arg: AggregateArg::Column("score".into()),
            alias: Some("total".into()),
        };
        assert_eq!(spec.label(), "total");
    }
}
