//! The only point of truth for everything related to the current command
//! line session: the storage the tables live in, the record engine with its
//! select cache, the runtime config and the command history.
//!
//! Every table operation follows the same cycle:
//! - load the catalog and/or the table records from storage
//! - run the engine operation on them
//! - save whatever was mutated
//!
//! Nothing is saved when the operation fails. A crash in between loses the
//! pending change and the next command simply reloads the last saved state.

use std::{fmt::Display, time::SystemTime};

use chrono::{DateTime, Local};
use indexmap::IndexMap;

use crate::config::Config;
use crate::persistence::{
    FileStorage, Predicate, RecordEngine, Result, SelectResult, Storage, TableDescription,
    TableSchema,
};

struct CommandHistory {
    command: String,
    command_time: SystemTime,
}

impl CommandHistory {
    pub fn command_time_string(&self) -> String {
        let datetime: DateTime<Local> = self.command_time.into();
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl Display for CommandHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.command_time_string(), self.command)
    }
}

pub struct Session {
    command_history: Vec<CommandHistory>,
    start_time: SystemTime,
    config: Config,
    storage: Box<dyn Storage>,
    engine: RecordEngine,
}

impl Session {
    pub fn client(config: Config) -> Session {
        //! Returns a new client session backed by JSON files in the configured
        //! data directory.

        let storage = Box::new(FileStorage::new(config.data_dir.clone()));
        Session::with_storage(config, storage, RecordEngine::new())
    }

    pub fn with_storage(config: Config, storage: Box<dyn Storage>, engine: RecordEngine) -> Session {
        Session {
            command_history: vec![],
            start_time: SystemTime::now(),
            config,
            storage,
            engine,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &RecordEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut RecordEngine {
        &mut self.engine
    }

    pub fn create_table(&mut self, name: &str, column_specs: &[String]) -> Result<TableSchema> {
        let mut metadata = self.storage.load_metadata()?;
        let schema = metadata.create_table(name, column_specs)?.clone();
        self.storage.save_metadata(&metadata)?;

        log::info!("created table '{}' ({})", name, schema);
        Ok(schema)
    }

    pub fn drop_table(&mut self, name: &str) -> Result<()> {
        //! Drop the table definition first, then its record file.
        //!
        //! The record file is only removed once the catalog without the table
        //! has been saved.

        let mut metadata = self.storage.load_metadata()?;
        metadata.drop_table(name)?;
        self.storage.save_metadata(&metadata)?;
        self.storage.delete_table_file(name)?;

        log::info!("dropped table '{}'", name);
        Ok(())
    }

    pub fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.storage.load_metadata()?.list_tables())
    }

    pub fn insert(&mut self, table_name: &str, raw_values: &[String]) -> Result<i64> {
        //! Insert one record and persist the table.
        //!
        //! Returns the id of the new record.

        let metadata = self.storage.load_metadata()?;
        let mut table_data = self.storage.load_table_data(table_name)?;

        let id = self
            .engine
            .insert(&metadata, table_name, raw_values, &mut table_data)?;
        self.storage.save_table_data(table_name, &table_data)?;

        Ok(id)
    }

    pub fn select(&mut self, table_name: &str, predicate: Option<&Predicate>) -> Result<SelectResult> {
        let table_data = self.storage.load_table_data(table_name)?;
        Ok(self.engine.select(&table_data, predicate))
    }

    pub fn update(
        &mut self,
        table_name: &str,
        set_clause: &IndexMap<String, String>,
        predicate: &Predicate,
    ) -> Result<usize> {
        //! Update the matching records, coercing values with the table's schema
        //! when the table is known.

        let metadata = self.storage.load_metadata()?;
        let mut table_data = self.storage.load_table_data(table_name)?;

        let n_updated = self.engine.update(
            &mut table_data,
            set_clause,
            predicate,
            metadata.schema(table_name).ok(),
        )?;
        self.storage.save_table_data(table_name, &table_data)?;

        Ok(n_updated)
    }

    pub fn delete(&mut self, table_name: &str, predicate: &Predicate) -> Result<usize> {
        let mut table_data = self.storage.load_table_data(table_name)?;

        let n_deleted = self.engine.delete(&mut table_data, predicate);
        self.storage.save_table_data(table_name, &table_data)?;

        Ok(n_deleted)
    }

    pub fn describe(&self, table_name: &str) -> Result<TableDescription> {
        let metadata = self.storage.load_metadata()?;
        let table_data = self.storage.load_table_data(table_name)?;

        metadata.describe(table_name, &table_data)
    }

    pub fn add_to_command_history(&mut self, command: &str) {
        self.command_history.push(CommandHistory {
            command: command.to_string(),
            command_time: SystemTime::now(),
        });
    }

    pub fn start_time_string(&self) -> String {
        //! Convert the [`SystemTime`] object into a string representation
        //! to be more readable.

        let datetime: DateTime<Local> = self.start_time.into();
        datetime.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn command_history_lines(&self, n_prev: Option<usize>) -> Vec<String> {
        //! The previously invoked commands, most recent first.
        //! Use `n_prev` to limit the number of commands you see.

        let limit = n_prev.unwrap_or(self.command_history.len());

        self.command_history
            .iter()
            .rev()
            .take(limit)
            .enumerate()
            .map(|(index, command)| format!("{:3} | {}", index, command))
            .collect()
    }

    pub fn get_last_command(&self, nth_back: usize) -> Option<&str> {
        //! Gets the `nth_back`th last command from the history.

        if nth_back == 0 {
            return None;
        }

        self.command_history
            .iter()
            .nth_back(nth_back - 1)
            .map(|cmd| cmd.command.as_str())
    }
}
