//! The join engine
//!
//! Resolves a chain of equality joins against the row store. Each step
//! builds a hash index of the joined table's rows keyed by its join
//! column, then probes it with every working row, so a step costs
//! O(left + right) rather than quadratic time. Inner join only: a
//! working row with no match contributes nothing.

use super::ResultSet;
use crate::error::Result;
use crate::storage::Storage;
use crate::types::expression::JoinStep;
use crate::types::schema::Label;
use crate::types::value::{Row, Value};
use std::collections::HashMap;
use tracing::warn;

/// Applies every step of a join chain, left to right, to the working set.
///
/// A step naming an unknown table or join column leaves the working set
/// unchanged (preserved fail-open behavior); a warning is logged.
pub fn apply(storage: &Storage, working: ResultSet, steps: &[JoinStep]) -> Result<ResultSet> {
    let mut working = working;
    for step in steps {
        working = apply_step(storage, working, step);
    }
    Ok(working)
}

fn apply_step(storage: &Storage, working: ResultSet, step: &JoinStep) -> ResultSet {
    let Some(table) = storage.table(&step.table) else {
        warn!(table = %step.table, "join against unknown table, skipping step");
        return working;
    };
    let Some((right_pos, _)) = table.schema().column(&step.right_column) else {
        warn!(
            table = %step.table,
            column = %step.right_column,
            "join column does not exist, skipping step"
        );
        return working;
    };

    // hash the joined table's rows by their join-column value; rows whose
    // key is null never match
    let mut by_key: HashMap<&Value, Vec<&Row>> = HashMap::new();
    for row in table.rows() {
        let key = &row.values[right_pos];
        if !key.is_null() {
            by_key.entry(key).or_default().push(&row.values);
        }
    }

    // the working row's join value: fully-qualified label first, then the
    // bare column name
    let qualified = format!("{}.{}", step.left_table, step.left_column);
    let left_pos = working
        .columns
        .iter()
        .position(|label| label.matches(&qualified))
        .or_else(|| {
            working
                .columns
                .iter()
                .position(|label| label.matches(&step.left_column))
        });
    let Some(left_pos) = left_pos else {
        warn!(column = %qualified, "join key not present in working rows, skipping step");
        return working;
    };

    // existing labels are copied unchanged; joined-in columns are
    // qualified with their originating table's name
    let mut columns = working.columns;
    for column in &table.schema().columns {
        columns.push(Label::Qualified(step.table.clone(), column.name.clone()));
    }

    let mut rows = Vec::new();
    for row in working.rows {
        let key = &row[left_pos];
        if key.is_null() {
            continue;
        }
        if let Some(matches) = by_key.get(key) {
            for right in matches {
                let mut merged = row.clone();
                merged.extend(right.iter().cloned());
                rows.push(merged);
            }
        }
        // no match: the row is dropped, never null-padded
    }

    ResultSet::new(columns, rows)
}
