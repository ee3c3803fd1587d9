//! A small embedded relational database.
//!
//! `reldb` stores typed tabular data in memory, maintains per-column
//! value indexes that stay consistent across every mutation, and answers
//! structured queries (projection, filtering, chained equi-joins, ordering,
//! limiting, aggregation). The full engine state is persisted as a single
//! snapshot file after every successful mutating operation and reloaded at
//! startup.
//!
//! The engine consumes already-structured [`Command`] values; the bundled
//! [`parsing`] module is the textual-SQL translation stage that produces
//! them. Clause text (WHERE / JOIN / ORDER BY) is parsed once there into
//! typed trees, which the engine evaluates as data.
//!
//! ```no_run
//! use reldb::{Engine, EngineConfig};
//!
//! let mut engine = Engine::open(EngineConfig::new("school.db"))?;
//! engine.execute_sql("CREATE TABLE students (id INT PRIMARY KEY, name VARCHAR(50))")?;
//! engine.execute_sql("INSERT INTO students VALUES (1, 'Ada')")?;
//! let result = engine.execute_sql("SELECT name FROM students WHERE id = 1")?;
//! # Ok::<(), reldb::Error>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod execution;
pub mod parsing;
pub mod storage;
pub mod types;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{Error, Result};
pub use execution::{ExecutionResult, ResultSet};
pub use types::command::Command;
pub use types::value::{Row, Value};
