//! Row store and index maintainer
//!
//! [`Storage`] is the single owned aggregate holding every table: schema,
//! row collection, per-column indexes, and the row-id counter. All engine
//! state lives here and is reached only through `&mut` access; there is
//! no ambient or static state. Index mutation happens exclusively inside
//! the insert/update/delete paths of [`TableStore`], which keeps the
//! index-consistency invariant true after every committed mutation.

pub mod index;
pub mod snapshot;


use crate::error::{Error, Result};
use crate::types::schema::Table;
use crate::types::value::{Row, RowId, Value};
use index::TableIndexes;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A stored row: the engine-assigned id plus the values in declared
/// column order. Rows are owned exclusively by their table's collection;
/// indexes refer to them by id only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRow {
    pub id: RowId,
    pub values: Row,
}

/// One table's authoritative state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableStore {
    schema: Table,
    rows: Vec<StoredRow>,
    indexes: TableIndexes,
    next_row_id: RowId,
}

impl TableStore {
    fn new(schema: Table) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            indexes: TableIndexes::default(),
            next_row_id: 0,
        }
    }

    pub fn schema(&self) -> &Table {
        &self.schema
    }

    pub fn rows(&self) -> &[StoredRow] {
        &self.rows
    }

    pub fn indexes(&self) -> &TableIndexes {
        &self.indexes
    }

    /// The next row-id this table will assign.
    pub fn next_row_id(&self) -> RowId {
        self.next_row_id
    }

    /// Inserts a row supplied as a column-name to value mapping.
    ///
    /// Every declared column takes its supplied value or null; values are
    /// validated and coerced against the declared types, nullability is
    /// enforced, and primary/unique keys are probed against the indexes
    /// before anything is mutated. Names not in the schema are ignored.
    ///
    /// # Errors
    /// `Error::Type` on a failed coercion, `Error::Constraint` on a null
    /// in a non-nullable column or a duplicate key value. A failed insert
    /// leaves the table untouched.
    pub fn insert(&mut self, values_by_column: &[(String, Value)]) -> Result<RowId> {
        let mut row: Row = Vec::with_capacity(self.schema.columns.len());
        for column in &self.schema.columns {
            let supplied = values_by_column
                .iter()
                .find(|(name, _)| name == &column.name);
            let value = match supplied {
                Some((_, raw)) => column.validate(raw.clone())?,
                None => Value::Null,
            };
            if value.is_null() && !column.nullable {
                return Err(Error::Constraint(if supplied.is_some() {
                    format!("column '{}' cannot be NULL", column.name)
                } else {
                    format!("missing required column: {}", column.name)
                }));
            }
            row.push(value);
        }

        for (pos, column) in self.schema.columns.iter().enumerate() {
            if !column.primary_key && !column.unique {
                continue;
            }
            let value = &row[pos];
            if value.is_null() {
                // unique columns ignore nulls; primary keys can't be null
                continue;
            }
            if let Some(index) = self.indexes.column(&column.name) {
                if index.contains_value(value) {
                    return Err(Error::Constraint(if column.primary_key {
                        format!("duplicate primary key value: {}", value.as_text())
                    } else {
                        format!(
                            "duplicate unique value for '{}': {}",
                            column.name,
                            value.as_text()
                        )
                    }));
                }
            }
        }

        let row_id = self.next_row_id;
        self.next_row_id += 1;
        for (pos, column) in self.schema.columns.iter().enumerate() {
            self.indexes
                .column_mut(&column.name)
                .add(row[pos].clone(), row_id);
        }
        self.rows.push(StoredRow { id: row_id, values: row });
        debug!(table = %self.schema.name, row_id, "inserted row");
        Ok(row_id)
    }

    /// Overwrites `set_values` on every row in `ids`, re-synchronizing the
    /// affected index buckets. The new values are stored as supplied; no
    /// re-validation against the declared types happens here.
    ///
    /// # Errors
    /// `Error::Schema` if a SET column does not exist; checked before any
    /// row is touched.
    pub fn update_rows(&mut self, ids: &[RowId], set_values: &[(String, Value)]) -> Result<usize> {
        let mut positions = Vec::with_capacity(set_values.len());
        for (name, _) in set_values {
            let (pos, _) = self.schema.column(name).ok_or_else(|| {
                Error::Schema(format!(
                    "column '{name}' does not exist in table '{}'",
                    self.schema.name
                ))
            })?;
            positions.push(pos);
        }

        let mut updated = 0;
        for row in &mut self.rows {
            if !ids.contains(&row.id) {
                continue;
            }
            for ((name, new), pos) in set_values.iter().zip(&positions) {
                let old = std::mem::replace(&mut row.values[*pos], new.clone());
                let index = self.indexes.column_mut(name);
                index.remove(&old, row.id);
                index.add(new.clone(), row.id);
            }
            updated += 1;
        }
        debug!(table = %self.schema.name, updated, "updated rows");
        Ok(updated)
    }

    /// Removes every row in `ids`, dropping all of their index entries.
    pub fn delete_rows(&mut self, ids: &[RowId]) -> usize {
        for row in &self.rows {
            if !ids.contains(&row.id) {
                continue;
            }
            for (column, value) in self.schema.columns.iter().zip(&row.values) {
                self.indexes.column_mut(&column.name).remove(value, row.id);
            }
        }
        let before = self.rows.len();
        self.rows.retain(|row| !ids.contains(&row.id));
        let deleted = before - self.rows.len();
        debug!(table = %self.schema.name, deleted, "deleted rows");
        deleted
    }

    /// Builds (or extends) the index for `column` by one scan over the
    /// current rows, and records the column as indexed in the schema.
    /// Idempotent: row-ids already present in a bucket are not duplicated.
    ///
    /// # Errors
    /// `Error::Schema` if the column does not exist.
    pub fn create_index(&mut self, column: &str) -> Result<()> {
        let (pos, _) = self.schema.column(column).ok_or_else(|| {
            Error::Schema(format!(
                "column '{column}' does not exist in table '{}'",
                self.schema.name
            ))
        })?;
        let index = self.indexes.column_mut(column);
        for row in &self.rows {
            index.add(row.values[pos].clone(), row.id);
        }
        self.schema.columns[pos].indexed = true;
        debug!(table = %self.schema.name, column, "created index");
        Ok(())
    }
}

/// The table registry: every table's state, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Storage {
    tables: BTreeMap<String, TableStore>,
}

impl Storage {
    /// Registers a new table.
    ///
    /// # Errors
    /// `Error::Schema` if the name is already registered. Tables cannot
    /// be redefined once created.
    pub fn create_table(&mut self, schema: Table) -> Result<()> {
        if self.tables.contains_key(&schema.name) {
            return Err(Error::Schema(format!(
                "table '{}' already exists",
                schema.name
            )));
        }
        self.tables.insert(schema.name.clone(), TableStore::new(schema));
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&TableStore> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut TableStore> {
        self.tables.get_mut(name)
    }

    /// The named table, or `Error::Schema` when unknown.
    pub fn require(&self, name: &str) -> Result<&TableStore> {
        self.table(name)
            .ok_or_else(|| Error::Schema(format!("table '{name}' does not exist")))
    }

    /// Mutable variant of [`Storage::require`].
    pub fn require_mut(&mut self, name: &str) -> Result<&mut TableStore> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| Error::Schema(format!("table '{name}' does not exist")))
    }

    /// All table names, in sorted order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(String::as_str).collect()
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}
