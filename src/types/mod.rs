//! Core type definitions: declared types, runtime values, schemas,
//! clause trees, and the structured command contract.

pub mod command;
pub mod data_type;
pub mod expression;
pub mod schema;
pub mod value;

pub use data_type::DataType;
pub use schema::{Column, Label, Table};
pub use value::{Row, RowId, Value};
