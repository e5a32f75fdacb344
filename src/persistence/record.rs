use std::fmt::Display;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::persistence::schema::ID_COLUMN;
use crate::persistence::value::Value;

/// One row of a table: column name to value, in column order.
///
/// Serializes to the flat JSON object stored in the table's data file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(IndexMap<String, Value>);

/// A single `column = value` equality filter.
///
/// Matching is done on string forms, see [`Predicate::matches`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Predicate {
    pub column: String,
    pub value: String,
}

impl Record {
    pub fn new() -> Record {
        Record(IndexMap::new())
    }

    pub fn id(&self) -> Option<i64> {
        self.0.get(ID_COLUMN).and_then(Value::as_int)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(column.into(), value.into())
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Record(
            iter.into_iter()
                .map(|(column, value)| (column.into(), value.into()))
                .collect(),
        )
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let record: Vec<String> = self.0.values().map(|value| value.to_string()).collect();
        write!(f, "{}", record.join(" | "))
    }
}

impl Predicate {
    pub fn new(column: impl Into<String>, value: impl ToString) -> Predicate {
        Predicate {
            column: column.into(),
            value: value.to_string(),
        }
    }

    pub fn from_clause(clause: &IndexMap<String, String>) -> Option<Predicate> {
        //! Build a predicate out of a `column -> value` mapping.
        //!
        //! Only the first pair is honored, any further pairs are ignored.
        //! An empty mapping means no filter at all.

        clause
            .first()
            .map(|(column, value)| Predicate::new(column.as_str(), value))
    }

    pub fn matches(&self, record: &Record) -> bool {
        //! True when the record's value in [`Predicate::column`] renders to the
        //! same text as [`Predicate::value`].
        //!
        //! A record lacking the column never matches.

        record
            .get(&self.column)
            .is_some_and(|value| value.to_string() == self.value)
    }

    pub fn cache_key(predicate: Option<&Predicate>) -> String {
        //! Canonical text of an optional predicate, used to key cached selects.

        match predicate {
            Some(predicate) => predicate.to_string(),
            None => "*".to_string(),
        }
    }
}

impl Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{{:?}: {:?}}}", self.column, self.value)
    }
}
