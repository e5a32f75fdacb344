//! Persistence of tables needs the following components
//! - Schema (ordered column names and their datatypes, `ID` always first)
//! - Metadata (every table's schema, keyed by table name)
//! - Record (one row, column name to typed value)
//! - Engine (insert, select, update and delete over a table's records)
//! - Storage (JSON documents on disk, one for the catalog and one per table)
//!

//  All modules of this lib
mod cache;
mod database;
mod engine;
mod error;
mod record;
mod schema;
mod storage;
mod value;

//  External API
pub use cache::QueryCache;
pub use database::{Metadata, TableDescription};
pub use engine::{RecordEngine, SelectResult};
pub use error::{DbError, Result};
pub use record::{Predicate, Record};
pub use schema::{Column, DataType, ID_COLUMN, TableSchema};
pub use storage::{DATA_DIR_NAME, FileStorage, METADATA_FILE_NAME, Storage};
pub use value::{Value, strip_quotes};
