use std::fmt::Display;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::persistence::error::{DbError, Result};
use crate::persistence::record::Record;
use crate::persistence::schema::{Column, TableSchema};

/// The catalog of all table definitions, keyed by table name.
///
/// [`Metadata`] is the only owner of the [`TableSchema`]s. It is based on an
/// [`IndexMap`] so tables are always listed in the order they were created,
/// and it (de)serializes straight into the `db_meta.json` document.
///
/// Every mutation is all-or-nothing: the column specs are validated in full
/// before the map is touched, so a failed call leaves the catalog as it was.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    tables: IndexMap<String, TableSchema>,
}

/// Everything needed to render the `info` report of one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableDescription {
    pub name: String,
    pub columns: Vec<Column>,
    pub record_count: usize,
}

impl Metadata {
    pub fn new() -> Metadata {
        Metadata {
            tables: IndexMap::new(),
        }
    }

    pub fn create_table(&mut self, name: &str, column_specs: &[String]) -> Result<&TableSchema> {
        //! Register a table built from `<name>:<type>` column specs.
        //!
        //! Fails if the table already exists, if a spec is malformed or uses an
        //! unknown type, if a user column is called `ID`, or if two user
        //! columns share a name.
        //!
        //! Returns the stored schema, `ID` column first.

        if self.tables.contains_key(name) {
            return Err(DbError::DuplicateTable(name.to_string()));
        }

        let mut columns: Vec<Column> = Vec::with_capacity(column_specs.len());
        for spec in column_specs {
            let column = Column::parse(spec)?;
            if columns.iter().any(|col| col.name == column.name) {
                return Err(DbError::InvalidSpec(spec.clone()));
            }
            columns.push(column);
        }

        log::debug!("creating table '{}' with {} column(s)", name, columns.len());

        let schema = self
            .tables
            .entry(name.to_string())
            .or_insert(TableSchema::new(columns));
        Ok(&*schema)
    }

    pub fn drop_table(&mut self, name: &str) -> Result<TableSchema> {
        //! Remove a table definition and hand back its schema.
        //!
        //! The table's record file is left alone; that belongs to the storage.

        self.tables
            .shift_remove(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    pub fn list_tables(&self) -> Vec<String> {
        self.tables.keys().cloned().collect()
    }

    pub fn describe(&self, name: &str, table_data: &[Record]) -> Result<TableDescription> {
        let schema = self.schema(name)?;

        Ok(TableDescription {
            name: name.to_string(),
            columns: schema.columns().to_vec(),
            record_count: table_data.len(),
        })
    }

    pub fn schema(&self, name: &str) -> Result<&TableSchema> {
        self.tables
            .get(name)
            .ok_or_else(|| DbError::TableNotFound(name.to_string()))
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl Display for TableDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let columns: Vec<String> = self.columns.iter().map(|col| col.to_string()).collect();

        writeln!(f, "Table: {}", self.name)?;
        writeln!(f, "Columns: {}", columns.join(", "))?;
        write!(f, "Records: {}", self.record_count)
    }
}
