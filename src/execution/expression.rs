//! Condition evaluation
//!
//! Walks a [`Condition`] tree against one labeled row. Evaluation never
//! fails: a column that does not resolve never matches, and a numeric
//! comparison whose sides won't coerce is false. `Condition::Always` is
//! the preserved fail-open case for clause text the translation stage
//! could not recognize.

use crate::types::expression::{CompareOp, Condition};
use crate::types::schema::Label;
use crate::types::value::Value;

/// Evaluates `condition` against a row with the given column labels.
pub fn evaluate(condition: &Condition, columns: &[Label], row: &[Value]) -> bool {
    match condition {
        Condition::And(parts) => parts.iter().all(|part| evaluate(part, columns, row)),
        Condition::Or(parts) => parts.iter().any(|part| evaluate(part, columns, row)),
        Condition::Compare {
            column,
            op,
            literal,
        } => {
            let Some(pos) = columns.iter().position(|label| label.matches(column)) else {
                return false;
            };
            compare(&row[pos], *op, literal)
        }
        Condition::Always => true,
    }
}

fn compare(value: &Value, op: CompareOp, literal: &str) -> bool {
    match op {
        // equality is a comparison of canonical text forms
        CompareOp::Eq => value.as_text() == literal,
        CompareOp::Gt => match (value.to_f64(), literal.trim().parse::<f64>()) {
            (Some(left), Ok(right)) => left > right,
            _ => false,
        },
        CompareOp::Lt => match (value.to_f64(), literal.trim().parse::<f64>()) {
            (Some(left), Ok(right)) => left < right,
            _ => false,
        },
    }
}
