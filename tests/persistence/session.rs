use std::fs;

use indexmap::IndexMap;
use primitive_db::config::Config;
use primitive_db::persistence::{
    DbError, FileStorage, Metadata, Predicate, Record, RecordEngine, Result, Storage, Value,
};
use primitive_db::sessions::session::Session;
use tempfile::{TempDir, tempdir};

fn _prepare_session() -> (TempDir, Session) {
    let dir = tempdir().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        assume_yes: true,
        ..Config::default()
    };
    (dir, Session::client(config))
}

fn _strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn session_persists_metadata_and_records() {
    let (dir, mut session) = _prepare_session();

    session
        .create_table("users", &_strings(&["name:str", "age:int"]))
        .unwrap();
    session
        .insert("users", &_strings(&["\"Alice\"", "30"]))
        .unwrap();

    let metadata: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("db_meta.json")).unwrap())
            .unwrap();
    assert_eq!(
        metadata,
        serde_json::json!({
            "users": {"columns": [
                {"name": "ID", "type": "int"},
                {"name": "name", "type": "str"},
                {"name": "age", "type": "int"},
            ]}
        })
    );

    let records: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("data").join("users.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(
        records,
        serde_json::json!([{"ID": 1, "name": "Alice", "age": 30}])
    );
}

#[test]
fn session_state_is_reloaded_from_disk() {
    let (dir, mut session) = _prepare_session();
    session.create_table("users", &_strings(&["name:str"])).unwrap();
    session.insert("users", &_strings(&["Bob"])).unwrap();

    let storage = FileStorage::new(dir.path());
    let mut reopened = Session::with_storage(
        session.config().clone(),
        Box::new(storage),
        RecordEngine::new(),
    );

    assert_eq!(reopened.list_tables().unwrap(), vec!["users"]);
    assert_eq!(reopened.insert("users", &_strings(&["Carol"])).unwrap(), 2);
    assert_eq!(reopened.describe("users").unwrap().record_count, 2);
}

#[test]
fn session_update_uses_the_schema() {
    let (_dir, mut session) = _prepare_session();
    session
        .create_table("users", &_strings(&["name:str", "age:int"]))
        .unwrap();
    session.insert("users", &_strings(&["Alice", "30"])).unwrap();

    let set_clause = IndexMap::from([("age".to_string(), "31".to_string())]);
    session
        .update("users", &set_clause, &Predicate::new("name", "Alice"))
        .unwrap();

    let records = session.select("users", None).unwrap();
    assert_eq!(records[0].get("age"), Some(&Value::Int(31)));
}

#[test]
fn session_failed_update_is_not_saved() {
    let (dir, mut session) = _prepare_session();
    session.create_table("users", &_strings(&["age:int"])).unwrap();
    session.insert("users", &_strings(&["30"])).unwrap();

    let set_clause = IndexMap::from([("age".to_string(), "old".to_string())]);
    let result = session.update("users", &set_clause, &Predicate::new("ID", "1"));
    assert!(matches!(result, Err(DbError::InvalidValue { .. })));

    let stored = FileStorage::new(dir.path()).load_table_data("users").unwrap();
    assert_eq!(stored[0].get("age"), Some(&Value::Int(30)));
}

#[test]
fn session_drop_table_removes_the_data_file() {
    let (dir, mut session) = _prepare_session();
    session.create_table("users", &_strings(&["name:str"])).unwrap();
    session.insert("users", &_strings(&["Alice"])).unwrap();

    let data_file = dir.path().join("data").join("users.json");
    assert!(data_file.exists());

    session.drop_table("users").unwrap();

    assert!(!data_file.exists());
    assert!(session.list_tables().unwrap().is_empty());
    assert!(matches!(
        session.drop_table("users"),
        Err(DbError::TableNotFound(_))
    ));
}

/// Reads and writes records like [`FileStorage`] but refuses to save the catalog.
struct ReadOnlyCatalog(FileStorage);

impl Storage for ReadOnlyCatalog {
    fn load_metadata(&self) -> Result<Metadata> {
        self.0.load_metadata()
    }

    fn save_metadata(&self, _metadata: &Metadata) -> Result<()> {
        Err(DbError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "catalog is read-only",
        )))
    }

    fn load_table_data(&self, table_name: &str) -> Result<Vec<Record>> {
        self.0.load_table_data(table_name)
    }

    fn save_table_data(&self, table_name: &str, table_data: &[Record]) -> Result<()> {
        self.0.save_table_data(table_name, table_data)
    }

    fn delete_table_file(&self, table_name: &str) -> Result<()> {
        self.0.delete_table_file(table_name)
    }
}

#[test]
fn session_drop_keeps_data_when_catalog_save_fails() {
    let (dir, mut session) = _prepare_session();
    session.create_table("users", &_strings(&["name:str"])).unwrap();
    session.insert("users", &_strings(&["Alice"])).unwrap();

    let mut read_only = Session::with_storage(
        session.config().clone(),
        Box::new(ReadOnlyCatalog(FileStorage::new(dir.path()))),
        RecordEngine::new(),
    );

    assert!(matches!(read_only.drop_table("users"), Err(DbError::Io(_))));
    assert!(dir.path().join("data").join("users.json").exists());
    assert_eq!(session.list_tables().unwrap(), vec!["users"]);
    assert_eq!(session.describe("users").unwrap().record_count, 1);
}

#[test]
fn session_update_strips_one_layer_of_quotes_like_insert() {
    let (_dir, mut session) = _prepare_session();
    session.create_table("users", &_strings(&["name:str"])).unwrap();
    session.insert("users", &_strings(&["\"\"Bob\"\""])).unwrap();
    session.insert("users", &_strings(&["Al"])).unwrap();

    let set_clause = IndexMap::from([("name".to_string(), "\"\"Bob\"\"".to_string())]);
    session
        .update("users", &set_clause, &Predicate::new("ID", 2))
        .unwrap();

    let records = session.select("users", None).unwrap();
    assert_eq!(records[0].get("name"), records[1].get("name"));
    assert_eq!(records[1].get("name"), Some(&Value::from("\"Bob\"")));
}

#[test]
fn session_delete_persists_remaining_records() {
    let (dir, mut session) = _prepare_session();
    session.create_table("users", &_strings(&["name:str"])).unwrap();
    for name in ["a", "b", "a"] {
        session.insert("users", &_strings(&[name])).unwrap();
    }

    let n_deleted = session.delete("users", &Predicate::new("name", "a")).unwrap();
    assert_eq!(n_deleted, 2);

    let stored = FileStorage::new(dir.path()).load_table_data("users").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id(), Some(2));
}

#[test]
fn session_keeps_command_history() {
    let (_dir, mut session) = _prepare_session();
    session.add_to_command_history("list_tables");
    session.add_to_command_history("info users");

    assert_eq!(session.get_last_command(1), Some("info users"));
    assert_eq!(session.get_last_command(2), Some("list_tables"));
    assert_eq!(session.get_last_command(3), None);
    assert_eq!(session.get_last_command(0), None);

    let lines = session.command_history_lines(Some(1));
    assert_eq!(lines.len(), 1);
    assert!(lines[0].ends_with("info users"));
}
