//! The row-selection pipeline
//!
//! `select` runs the strictly ordered stages of a query: scan, filter,
//! join, then either aggregation (which short-circuits the rest) or
//! projection, ordering, and limiting. Update and delete share the first
//! two stages through [`matching_row_ids`].

use super::{aggregate, expression, join, ResultSet};
use crate::error::Result;
use crate::storage::{Storage, TableStore};
use crate::types::expression::{Condition, JoinStep, OrderBy, Projection, SortDirection};
use crate::types::schema::Label;
use crate::types::value::{RowId, Value};
use std::cmp::Ordering;
use tracing::warn;

/// Executes a select against the storage.
pub fn select(
    storage: &Storage,
    table: &str,
    projection: &Projection,
    filter: Option<&Condition>,
    joins: &[JoinStep],
    order_by: Option<&OrderBy>,
    limit: Option<&str>,
) -> Result<ResultSet> {
    let table = storage.require(table)?;

    let mut working = scan(table);
    if let Some(condition) = filter {
        let columns = &working.columns;
        working
            .rows
            .retain(|row| expression::evaluate(condition, columns, row));
    }
    working = join::apply(storage, working, joins)?;

    // aggregates short-circuit projection, ordering, and limiting
    if let Projection::Aggregates(specs) = projection {
        return Ok(aggregate::compute(specs, &working));
    }

    if let Projection::Columns(tokens) = projection {
        working = project(&working, tokens);
    }
    if let Some(order_by) = order_by {
        order(&mut working, order_by);
    }
    if let Some(limit) = limit {
        apply_limit(&mut working, limit);
    }
    Ok(working)
}

/// Materializes a table's rows as a labeled result set: unqualified
/// labels in schema order, values cloned out of the store. Row-ids are
/// not part of the output contract.
pub(crate) fn scan(table: &TableStore) -> ResultSet {
    let columns = table
        .schema()
        .columns
        .iter()
        .map(|column| Label::Unqualified(column.name.clone()))
        .collect();
    let rows = table.rows().iter().map(|row| row.values.clone()).collect();
    ResultSet::new(columns, rows)
}

/// The ids of the rows matching `filter`: the scan+filter prefix of the
/// pipeline, shared by update and delete.
pub(crate) fn matching_row_ids(table: &TableStore, filter: Option<&Condition>) -> Vec<RowId> {
    let columns: Vec<Label> = table
        .schema()
        .columns
        .iter()
        .map(|column| Label::Unqualified(column.name.clone()))
        .collect();
    table
        .rows()
        .iter()
        .filter(|row| match filter {
            Some(condition) => expression::evaluate(condition, &columns, &row.values),
            None => true,
        })
        .map(|row| row.id)
        .collect()
}

/// Projects the requested column tokens. A token that resolves against
/// nothing is silently omitted; the remaining tokens keep their request
/// order.
fn project(working: &ResultSet, tokens: &[String]) -> ResultSet {
    let mut positions = Vec::with_capacity(tokens.len());
    let mut columns = Vec::with_capacity(tokens.len());
    for token in tokens {
        if let Some(pos) = working.resolve(token) {
            positions.push(pos);
            columns.push(working.columns[pos].clone());
        }
    }
    let rows = working
        .rows
        .iter()
        .map(|row| positions.iter().map(|pos| row[*pos].clone()).collect())
        .collect();
    ResultSet::new(columns, rows)
}

/// Sorts in place by one column's raw values. Rows missing the column
/// sort under the empty string. A key set that is not homogeneously
/// comparable (all numeric or all text) leaves the rows unsorted rather
/// than failing.
fn order(working: &mut ResultSet, order_by: &OrderBy) {
    let pos = working.resolve(&order_by.column);
    let keys: Vec<Value> = working
        .rows
        .iter()
        .map(|row| match pos {
            Some(pos) => row[pos].clone(),
            None => Value::Str(String::new()),
        })
        .collect();

    let all_numeric = keys
        .iter()
        .all(|key| matches!(key, Value::Int(_) | Value::Float(_)));
    let all_text = keys.iter().all(|key| matches!(key, Value::Str(_)));
    if !all_numeric && !all_text {
        warn!(column = %order_by.column, "order by over mixed value types, leaving rows unsorted");
        return;
    }

    let mut paired: Vec<(Value, crate::types::value::Row)> =
        keys.into_iter().zip(std::mem::take(&mut working.rows)).collect();
    paired.sort_by(|(a, _), (b, _)| {
        let ordering = if all_numeric {
            a.to_f64()
                .partial_cmp(&b.to_f64())
                .unwrap_or(Ordering::Equal)
        } else {
            a.as_text().cmp(&b.as_text())
        };
        match order_by.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    working.rows = paired.into_iter().map(|(_, row)| row).collect();
}

/// Truncates to an integer-parsing limit; anything else is ignored.
fn apply_limit(working: &mut ResultSet, limit: &str) {
    match limit.trim().parse::<usize>() {
        Ok(n) => working.rows.truncate(n),
        Err(_) => warn!(limit, "ignoring non-numeric LIMIT"),
    }
}
