//! Typed cell values and the coercion of raw command line tokens into them.
//!
//! Coercion rules per column type:
//! - `int`: a base-10 integer, surrounding whitespace ignored.
//! - `bool`: `true` in any casing is true, every other token is false.
//! - `str`: one layer of surrounding double quotes is stripped.
//!
//! Filters never compare typed values. Both sides are turned into their string
//! form with [`Display`] and compared as text, so the integer `1` matches the
//! token `"1"`.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::persistence::error::DbError;
use crate::persistence::schema::DataType;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Value {
    pub fn coerce(datatype: DataType, raw: &str) -> Result<Value, DbError> {
        //! Convert an external token to a value of the declared column type.
        //!
        //! Only `int` can fail. Booleans are lenient on purpose: a malformed
        //! token such as `yes` silently becomes `false`.

        match datatype {
            DataType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| DbError::InvalidValue {
                    value: raw.to_string(),
                    datatype: datatype.to_string(),
                }),
            DataType::Bool => Ok(Value::Bool(raw.eq_ignore_ascii_case("true"))),
            DataType::Str => Ok(Value::Str(strip_quotes(raw).to_string())),
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(value) => Some(*value),
            _ => None,
        }
    }
}

/// Strip a single pair of double quotes wrapping `raw`, if there is one.
pub fn strip_quotes(raw: &str) -> &str {
    raw.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(raw)
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Bool(value) => write!(f, "{}", value),
            Value::Int(value) => write!(f, "{}", value),
            Value::Str(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}
