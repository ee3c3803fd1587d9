//! Secondary value indexes
//!
//! An index maps each value of one column to the set of row-ids currently
//! holding that value. Indexes never own rows; they hold row-ids only.
//! Mutation happens exclusively through the row store's insert/update/
//! delete paths, so the consistency invariant (a row-id appears in the
//! bucket for (column, value) iff the row currently holds that value) is
//! enforced by construction.

use crate::types::value::{RowId, Value};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The index of one column: value to row-id bucket map.
///
/// A bucket whose last row-id is removed is dropped, so bucket presence
/// means "at least one live row holds this value", which is exactly the
/// probe uniqueness checks need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnIndex {
    buckets: HashMap<Value, Vec<RowId>>,
}

impl ColumnIndex {
    /// Adds a row-id to the bucket for `value`, creating the bucket if
    /// absent. Idempotent: a row-id already present is not duplicated.
    pub fn add(&mut self, value: Value, row_id: RowId) {
        let bucket = self.buckets.entry(value).or_default();
        if !bucket.contains(&row_id) {
            bucket.push(row_id);
        }
    }

    /// Removes a row-id from the bucket for `value`, dropping the bucket
    /// when it empties. Missing buckets and absent row-ids are no-ops.
    pub fn remove(&mut self, value: &Value, row_id: RowId) {
        if let Some(bucket) = self.buckets.get_mut(value) {
            bucket.retain(|id| *id != row_id);
            if bucket.is_empty() {
                self.buckets.remove(value);
            }
        }
    }

    /// True when some live row holds `value` in this column.
    pub fn contains_value(&self, value: &Value) -> bool {
        self.buckets.contains_key(value)
    }

    /// The row-ids currently holding `value`.
    pub fn row_ids(&self, value: &Value) -> Option<&[RowId]> {
        self.buckets.get(value).map(Vec::as_slice)
    }

    /// Iterates all (value, bucket) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Vec<RowId>)> {
        self.buckets.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// All indexes of one table, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableIndexes {
    columns: HashMap<String, ColumnIndex>,
}

impl TableIndexes {
    /// The index for `column`, if any rows have been indexed under it.
    pub fn column(&self, column: &str) -> Option<&ColumnIndex> {
        self.columns.get(column)
    }

    /// The index for `column`, created empty if absent.
    pub fn column_mut(&mut self, column: &str) -> &mut ColumnIndex {
        self.columns.entry(column.to_string()).or_default()
    }

    /// Iterates all (column, index) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ColumnIndex)> {
        self.columns.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_idempotent() {
        let mut index = ColumnIndex::default();
        index.add(Value::Int(1), 0);
        index.add(Value::Int(1), 0);
        index.add(Value::Int(1), 3);
        assert_eq!(index.row_ids(&Value::Int(1)), Some(&[0, 3][..]));
    }

    #[test]
    fn empty_buckets_are_dropped() {
        let mut index = ColumnIndex::default();
        index.add(Value::Str("x".into()), 7);
        assert!(index.contains_value(&Value::Str("x".into())));

        index.remove(&Value::Str("x".into()), 7);
        assert!(!index.contains_value(&Value::Str("x".into())));
        assert!(index.is_empty());
    }

    #[test]
    fn null_values_are_indexable() {
        let mut index = ColumnIndex::default();
        index.add(Value::Null, 1);
        index.add(Value::Null, 2);
        assert_eq!(index.row_ids(&Value::Null), Some(&[1, 2][..]));
    }
}
