//! JSON persistence of the catalog and the table records.
//!
//! Layout under the data directory:
//! - `db_meta.json`: table name to `{"columns": [...]}`
//! - `data/<table>.json`: array of flat record objects
//!
//! Missing files read as empty; every other failure is reported.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::PrettyFormatter;

use crate::persistence::database::Metadata;
use crate::persistence::error::Result;
use crate::persistence::record::Record;

pub const METADATA_FILE_NAME: &str = "db_meta.json";
pub const DATA_DIR_NAME: &str = "data";

/// What the command loop needs from a persistence backend.
pub trait Storage {
    fn load_metadata(&self) -> Result<Metadata>;

    fn save_metadata(&self, metadata: &Metadata) -> Result<()>;

    fn load_table_data(&self, table_name: &str) -> Result<Vec<Record>>;

    fn save_table_data(&self, table_name: &str, table_data: &[Record]) -> Result<()>;

    fn delete_table_file(&self, table_name: &str) -> Result<()>;
}

/// A [`Storage`] that keeps one pretty-printed JSON document per file.
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> FileStorage {
        FileStorage { root: root.into() }
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.root.join(METADATA_FILE_NAME)
    }

    pub fn table_path(&self, table_name: &str) -> PathBuf {
        self.root.join(DATA_DIR_NAME).join(format!("{}.json", table_name))
    }
}

impl Storage for FileStorage {
    fn load_metadata(&self) -> Result<Metadata> {
        Ok(read_json(&self.metadata_path())?.unwrap_or_default())
    }

    fn save_metadata(&self, metadata: &Metadata) -> Result<()> {
        write_json(&self.metadata_path(), metadata)
    }

    fn load_table_data(&self, table_name: &str) -> Result<Vec<Record>> {
        Ok(read_json(&self.table_path(table_name))?.unwrap_or_default())
    }

    fn save_table_data(&self, table_name: &str, table_data: &[Record]) -> Result<()> {
        write_json(&self.table_path(table_name), table_data)
    }

    fn delete_table_file(&self, table_name: &str) -> Result<()> {
        let path = self.table_path(table_name);
        log::debug!("removing {}", path.display());

        match fs::remove_file(&path) {
            Err(error) if error.kind() != ErrorKind::NotFound => Err(error.into()),
            _ => Ok(()),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    log::debug!("reading {}", path.display());

    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    Ok(Some(serde_json::from_str(&contents)?))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    log::debug!("writing {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    fs::write(path, buffer)?;
    Ok(())
}
