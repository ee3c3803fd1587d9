//! The execution facade
//!
//! [`Engine`] owns the whole database state and is the only entry point:
//! it dispatches structured commands to the storage and execution layers
//! and rewrites the snapshot after every successful mutating operation,
//! synchronously, before the caller is unblocked.
//!
//! The engine performs no sanitization of literals embedded in clause
//! text. Consumers composing SQL or clause strings from untrusted input
//! are responsible for escaping.

use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::execution::{select, ExecutionResult, ResultSet};
use crate::parsing::{self, Statement};
use crate::storage::snapshot::Snapshot;
use crate::storage::Storage;
use crate::types::command::{ColumnSpec, Command};
use crate::types::data_type::DataType;
use crate::types::expression::{Condition, JoinStep, OrderBy, Projection};
use crate::types::schema::{Column, Table};
use crate::types::value::{RowId, Value};
use tracing::info;

/// The embedded database engine. Single-threaded and synchronous: every
/// operation runs to completion against exclusively owned state before
/// the next is accepted.
pub struct Engine {
    storage: Storage,
    snapshot: Snapshot,
}

impl Engine {
    /// Opens an engine over the configured snapshot file, loading the
    /// persisted state if the file exists.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let snapshot = Snapshot::new(config.snapshot_path);
        let storage = snapshot.load()?;
        info!(tables = storage.table_count(), "engine ready");
        Ok(Self { storage, snapshot })
    }

    /// Dispatches one structured command.
    pub fn execute(&mut self, command: Command) -> Result<ExecutionResult> {
        match command {
            Command::CreateTable {
                table,
                columns,
                primary_key,
                unique_keys,
            } => {
                self.create_table(&table, &columns, primary_key.as_deref(), &unique_keys)?;
                Ok(ExecutionResult::TableCreated)
            }
            Command::Insert { table, values } => {
                Ok(ExecutionResult::Inserted(self.insert(&table, &values)?))
            }
            Command::Select {
                table,
                projection,
                filter,
                joins,
                order_by,
                limit,
            } => Ok(ExecutionResult::Rows(self.select(
                &table,
                &projection,
                filter.as_ref(),
                &joins,
                order_by.as_ref(),
                limit.as_deref(),
            )?)),
            Command::Update {
                table,
                set_values,
                filter,
            } => Ok(ExecutionResult::Updated(self.update(
                &table,
                &set_values,
                filter.as_ref(),
            )?)),
            Command::Delete { table, filter } => {
                Ok(ExecutionResult::Deleted(self.delete(&table, filter.as_ref())?))
            }
            Command::CreateIndex { table, column } => {
                self.create_index(&table, &column)?;
                Ok(ExecutionResult::IndexCreated)
            }
        }
    }

    /// Parses one SQL statement and executes it. This is the bundled
    /// translation stage; external callers may also build [`Command`]
    /// values directly.
    pub fn execute_sql(&mut self, sql: &str) -> Result<ExecutionResult> {
        let statement = parsing::parse_statement(sql)?;
        let command = self.resolve_statement(statement)?;
        self.execute(command)
    }

    /// Registers a new table and persists.
    pub fn create_table(
        &mut self,
        table: &str,
        columns: &[ColumnSpec],
        primary_key: Option<&str>,
        unique_keys: &[String],
    ) -> Result<()> {
        let schema = build_table(table, columns, primary_key, unique_keys)?;
        self.storage.create_table(schema)?;
        self.persist()
    }

    /// Inserts a row supplied as a column-name to literal mapping and
    /// persists. Returns the assigned row-id.
    pub fn insert(&mut self, table: &str, values: &[(String, Value)]) -> Result<RowId> {
        let row_id = self.storage.require_mut(table)?.insert(values)?;
        self.persist()?;
        Ok(row_id)
    }

    /// Runs a query. Read-only: no snapshot write.
    pub fn select(
        &self,
        table: &str,
        projection: &Projection,
        filter: Option<&Condition>,
        joins: &[JoinStep],
        order_by: Option<&OrderBy>,
        limit: Option<&str>,
    ) -> Result<ResultSet> {
        select::select(
            &self.storage,
            table,
            projection,
            filter,
            joins,
            order_by,
            limit,
        )
    }

    /// Updates every row matching `filter` and persists if any row
    /// changed. The supplied values are stored as-is: update does not
    /// re-validate against the declared column types.
    pub fn update(
        &mut self,
        table: &str,
        set_values: &[(String, Value)],
        filter: Option<&Condition>,
    ) -> Result<usize> {
        let store = self.storage.require_mut(table)?;
        let ids = select::matching_row_ids(store, filter);
        let updated = store.update_rows(&ids, set_values)?;
        if updated > 0 {
            self.persist()?;
        }
        Ok(updated)
    }

    /// Deletes every row matching `filter` and persists if any row was
    /// removed.
    pub fn delete(&mut self, table: &str, filter: Option<&Condition>) -> Result<usize> {
        let store = self.storage.require_mut(table)?;
        let ids = select::matching_row_ids(store, filter);
        let deleted = store.delete_rows(&ids);
        if deleted > 0 {
            self.persist()?;
        }
        Ok(deleted)
    }

    /// Builds an index over existing rows and persists.
    pub fn create_index(&mut self, table: &str, column: &str) -> Result<()> {
        self.storage.require_mut(table)?.create_index(column)?;
        self.persist()
    }

    /// Read access to the underlying state, for consumers rendering
    /// catalogs (the shell's table listing).
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    fn persist(&self) -> Result<()> {
        self.snapshot.persist(&self.storage)
    }

    /// Turns a parsed statement into a structured command, resolving
    /// positional insert values against the schema's column order.
    fn resolve_statement(&self, statement: Statement) -> Result<Command> {
        match statement {
            Statement::Command(command) => Ok(command),
            Statement::PositionalInsert { table, values } => {
                let store = self.storage.require(&table)?;
                let columns = &store.schema().columns;
                if values.len() != columns.len() {
                    return Err(Error::Arity {
                        table,
                        expected: columns.len(),
                        found: values.len(),
                    });
                }
                let values = columns
                    .iter()
                    .map(|column| column.name.clone())
                    .zip(values)
                    .collect();
                Ok(Command::Insert { table, values })
            }
        }
    }
}

/// Normalizes column specs into a table schema: type tokens parsed,
/// VARCHAR lengths extracted, nullability derived from NOT NULL markers,
/// primary/unique key columns flagged.
fn build_table(
    name: &str,
    columns: &[ColumnSpec],
    primary_key: Option<&str>,
    unique_keys: &[String],
) -> Result<Table> {
    let mut built = Vec::with_capacity(columns.len());
    for spec in columns {
        let (datatype, max_length) = DataType::parse_token(&spec.type_token)?;
        let mut column = Column::new(spec.name.clone(), datatype)
            .with_max_length(max_length)
            .nullable(!spec.not_null);
        if primary_key == Some(spec.name.as_str()) {
            column = column.primary_key();
        }
        if unique_keys.iter().any(|key| key == &spec.name) {
            column = column.unique();
        }
        built.push(column);
    }
    if let Some(key) = primary_key {
        if !built.iter().any(|column| column.primary_key) {
            return Err(Error::Schema(format!(
                "primary key column '{key}' is not declared in table '{name}'"
            )));
        }
    }
    for key in unique_keys {
        if !columns.iter().any(|spec| &spec.name == key) {
            return Err(Error::Schema(format!(
                "unique key column '{key}' is not declared in table '{name}'"
            )));
        }
    }
    Table::new(name.to_string(), built)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::expression::CompareOp;
    use tempfile::TempDir;

    fn engine(dir: &TempDir) -> Engine {
        Engine::open(EngineConfig::new(dir.path().join("test.db"))).unwrap()
    }

    fn spec(name: &str, type_token: &str, not_null: bool) -> ColumnSpec {
        ColumnSpec {
            name: name.into(),
            type_token: type_token.into(),
            not_null,
        }
    }

    fn create_people(engine: &mut Engine) {
        engine
            .create_table(
                "t",
                &[spec("id", "INT", false), spec("name", "VARCHAR(10)", false)],
                Some("id"),
                &[],
            )
            .unwrap();
    }

    #[test]
    fn create_insert_select_scenario() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine(&dir);
        create_people(&mut engine);

        let id = engine
            .insert(
                "t",
                &[
                    ("id".into(), Value::Str("1".into())),
                    ("name".into(), Value::Str("Al".into())),
                ],
            )
            .unwrap();
        assert_eq!(id, 0);

        // duplicate primary key fails and leaves the table unchanged
        let err = engine
            .insert(
                "t",
                &[
                    ("id".into(), Value::Str("1".into())),
                    ("name".into(), Value::Str("Bo".into())),
                ],
            )
            .unwrap_err();
        assert!(matches!(err, Error::Constraint(_)));

        let result = engine
            .select("t", &Projection::All, None, &[], None, None)
            .unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(
            result.rows[0],
            vec![Value::Int(1), Value::Str("Al".into())]
        );
    }

    #[test]
    fn update_and_delete_report_counts() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine(&dir);
        create_people(&mut engine);
        for i in 1..=3 {
            engine
                .insert(
                    "t",
                    &[
                        ("id".into(), Value::Int(i)),
                        ("name".into(), Value::Str("P".into())),
                    ],
                )
                .unwrap();
        }

        let everyone = Condition::Compare {
            column: "id".into(),
            op: CompareOp::Gt,
            literal: "0".into(),
        };
        let updated = engine
            .update(
                "t",
                &[("name".into(), Value::Str("Q".into()))],
                Some(&everyone),
            )
            .unwrap();
        assert_eq!(updated, 3);

        let result = engine
            .select("t", &Projection::All, None, &[], None, None)
            .unwrap();
        assert!(result.rows.iter().all(|row| row[1] == Value::Str("Q".into())));

        let deleted = engine.delete("t", Some(&everyone)).unwrap();
        assert_eq!(deleted, 3);
        let result = engine
            .select("t", &Projection::All, None, &[], None, None)
            .unwrap();
        assert!(result.rows.is_empty());
    }

    #[test]
    fn state_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let mut engine = engine(&dir);
            create_people(&mut engine);
            engine
                .insert(
                    "t",
                    &[
                        ("id".into(), Value::Int(7)),
                        ("name".into(), Value::Str("Al".into())),
                    ],
                )
                .unwrap();
        }

        let mut engine = engine(&dir);
        let result = engine
            .select("t", &Projection::All, None, &[], None, None)
            .unwrap();
        assert_eq!(result.rows, vec![vec![Value::Int(7), Value::Str("Al".into())]]);

        // counters survive too: the next insert continues the sequence
        let id = engine
            .insert(
                "t",
                &[
                    ("id".into(), Value::Int(8)),
                    ("name".into(), Value::Str("Bo".into())),
                ],
            )
            .unwrap();
        assert_eq!(id, 1);
    }

    #[test]
    fn positional_insert_arity_is_checked() {
        let dir = TempDir::new().unwrap();
        let mut engine = engine(&dir);
        create_people(&mut engine);

        let err = engine
            .execute_sql("INSERT INTO t VALUES (1, 'Al', 'extra')")
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Arity {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn build_table_flags_keys() {
        let table = build_table(
            "users",
            &[
                spec("id", "INT", false),
                spec("email", "VARCHAR(100)", true),
            ],
            Some("id"),
            &["email".to_string()],
        )
        .unwrap();
        let id = &table.columns[0];
        assert!(id.primary_key && !id.nullable);
        let email = &table.columns[1];
        assert!(email.unique && !email.nullable && email.max_length == Some(100));
    }

    #[test]
    fn build_table_rejects_unknown_key_columns() {
        assert!(build_table("t", &[spec("a", "INT", false)], Some("b"), &[]).is_err());
        assert!(build_table("t", &[spec("a", "INT", false)], None, &["b".to_string()]).is_err());
    }
}
