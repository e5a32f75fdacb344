use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::persistence::error::DbError;

/// Name of the column every table gets for free.
pub const ID_COLUMN: &str = "ID";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Int,
    Str,
    Bool,
}

impl Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let datatype = match self {
            DataType::Int => "int",
            DataType::Str => "str",
            DataType::Bool => "bool",
        };
        write!(f, "{}", datatype)
    }
}

impl FromStr for DataType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "int" => Ok(DataType::Int),
            "str" => Ok(DataType::Str),
            "bool" => Ok(DataType::Bool),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub datatype: DataType,
}

impl Column {
    pub fn new(name: &str, datatype: DataType) -> Column {
        Column {
            name: name.to_string(),
            datatype,
        }
    }

    pub fn id() -> Column {
        Column::new(ID_COLUMN, DataType::Int)
    }

    pub fn parse(spec: &str) -> Result<Column, DbError> {
        //! Parse the textual `<name>:<type>` form of a user column.
        //!
        //! Both sides are trimmed. The name `ID` is refused in any casing since
        //! that column is synthesized for every table.

        let (name, datatype) = spec
            .split_once(':')
            .ok_or_else(|| DbError::InvalidSpec(spec.to_string()))?;
        let (name, datatype) = (name.trim(), datatype.trim());

        if name.is_empty() || datatype.is_empty() {
            return Err(DbError::InvalidSpec(spec.to_string()));
        }

        if name.eq_ignore_ascii_case(ID_COLUMN) {
            return Err(DbError::ReservedName(name.to_string()));
        }

        let datatype =
            DataType::from_str(datatype).map_err(|_| DbError::InvalidSpec(spec.to_string()))?;

        Ok(Column::new(name, datatype))
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.datatype)
    }
}

/// The ordered column definitions of one table, always `ID` first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(user_columns: Vec<Column>) -> TableSchema {
        //! Build a schema out of user columns, prepending the `ID` column.

        let mut columns = Vec::with_capacity(user_columns.len() + 1);
        columns.push(Column::id());
        columns.extend(user_columns);

        TableSchema { columns }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn user_columns(&self) -> &[Column] {
        //! Every column except the synthesized `ID`.

        self.columns.get(1..).unwrap_or_default()
    }

    pub fn datatype_of(&self, column_name: &str) -> Option<DataType> {
        self.columns
            .iter()
            .find(|col| col.name == column_name)
            .map(|col| col.datatype)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl Display for TableSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let schema: Vec<String> = self.columns.iter().map(|col| col.to_string()).collect();
        write!(f, "{}", schema.join(", "))
    }
}
