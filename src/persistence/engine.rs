use std::sync::Arc;

use indexmap::IndexMap;

use super::cache::QueryCache;
use super::database::Metadata;
use super::error::{DbError, Result};
use super::record::{Predicate, Record};
use super::schema::{ID_COLUMN, TableSchema};
use super::value::Value;

/// Cached select results are shared, so repeated hits hand out the same list.
pub type SelectResult = Arc<Vec<Record>>;

/// Runs insert, select, update and delete over a table's records.
///
/// The engine never owns table data. The caller loads the records, lends them
/// to one operation and persists them afterwards. The only state kept between
/// calls is the select [`QueryCache`].
///
/// # Issues
/// - The cache is keyed by the predicate alone. Neither the table name nor
/// any mutation is part of the key, so a select can return rows of another
/// table or rows that were changed since. Call [`RecordEngine::cache_mut`] to
/// invalidate by hand.
pub struct RecordEngine {
    cache: QueryCache<SelectResult>,
}

impl RecordEngine {
    pub fn new() -> RecordEngine {
        RecordEngine::with_cache(QueryCache::new())
    }

    pub fn with_cache(cache: QueryCache<SelectResult>) -> RecordEngine {
        RecordEngine { cache }
    }

    pub fn cache(&self) -> &QueryCache<SelectResult> {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut QueryCache<SelectResult> {
        &mut self.cache
    }

    pub fn insert(
        &self,
        metadata: &Metadata,
        table_name: &str,
        raw_values: &[String],
        table_data: &mut Vec<Record>,
    ) -> Result<i64> {
        //! Coerce one raw value per user column and append the new record.
        //!
        //! Every value is converted before the table is touched, so a bad value
        //! leaves `table_data` as it was. The `ID` is one past the largest `ID`
        //! in the table and never reuses ids of deleted records. Once the largest
        //! `ID` is `i64::MAX` every insert fails with [`DbError::IdExhausted`].
        //!
        //! Returns the id of the inserted record.

        let schema = metadata.schema(table_name)?;
        let columns = schema.user_columns();

        if raw_values.len() != columns.len() {
            return Err(DbError::ColumnCountMismatch {
                expected: columns.len(),
                actual: raw_values.len(),
            });
        }

        let mut values = Vec::with_capacity(columns.len());
        for (column, raw) in columns.iter().zip(raw_values) {
            values.push((column.name.as_str(), Value::coerce(column.datatype, raw)?));
        }

        let id = next_id(table_data).ok_or_else(|| DbError::IdExhausted(table_name.to_string()))?;
        log::debug!("assigning ID {} in table '{}'", id, table_name);

        let mut record = Record::new();
        record.insert(ID_COLUMN, id);
        for (column, value) in values {
            record.insert(column, value);
        }

        table_data.push(record);
        Ok(id)
    }

    pub fn select(&mut self, table_data: &[Record], predicate: Option<&Predicate>) -> SelectResult {
        //! Return the records matching `predicate`, or all of them when there
        //! is none, in table order.
        //!
        //! Goes through the cache first. A predicate seen before returns the
        //! earlier result without looking at `table_data` at all.

        let key = Predicate::cache_key(predicate);

        self.cache.get(&key, || {
            let records: Vec<Record> = match predicate {
                Some(predicate) => table_data
                    .iter()
                    .filter(|record| predicate.matches(record))
                    .cloned()
                    .collect(),
                None => table_data.to_vec(),
            };
            Arc::new(records)
        })
    }

    pub fn update(
        &self,
        table_data: &mut [Record],
        set_clause: &IndexMap<String, String>,
        predicate: &Predicate,
        schema: Option<&TableSchema>,
    ) -> Result<usize> {
        //! Assign every `column -> value` pair of `set_clause` on each record
        //! matching `predicate`.
        //!
        //! With a schema the values are coerced to the column types, without
        //! one they are stored as plain strings.
        //!
        //! Each record is validated before it is modified, but this is not
        //! atomic across records: when a later record fails, the ones updated
        //! before it stay updated.
        //!
        //! Returns the number of updated records.

        let mut n_updated = 0;

        for record in table_data.iter_mut().filter(|record| predicate.matches(record)) {
            let mut assignments = Vec::with_capacity(set_clause.len());

            for (column, raw) in set_clause {
                if !record.contains_column(column) {
                    return Err(DbError::ColumnNotFound(column.clone()));
                }

                let value = match schema.and_then(|schema| schema.datatype_of(column)) {
                    Some(datatype) => Value::coerce(datatype, raw)?,
                    None => Value::from(raw.as_str()),
                };
                assignments.push((column, value));
            }

            for (column, value) in assignments {
                record.insert(column.as_str(), value);
            }
            n_updated += 1;
        }

        Ok(n_updated)
    }

    pub fn delete(&self, table_data: &mut Vec<Record>, predicate: &Predicate) -> usize {
        //! Remove every record matching `predicate`, keeping the order of the
        //! rest.
        //!
        //! Returns the number of removed records.

        let n_before = table_data.len();
        table_data.retain(|record| !predicate.matches(record));
        n_before - table_data.len()
    }
}

impl Default for RecordEngine {
    fn default() -> Self {
        RecordEngine::new()
    }
}

fn next_id(table_data: &[Record]) -> Option<i64> {
    table_data
        .iter()
        .filter_map(Record::id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
}
