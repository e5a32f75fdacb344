use std::sync::Arc;

use indexmap::IndexMap;
use primitive_db::persistence::{
    DbError, Metadata, Predicate, QueryCache, Record, RecordEngine, Value,
};

fn _prepare_metadata() -> Metadata {
    let mut metadata = Metadata::new();
    metadata
        .create_table(
            "users",
            &["name:str".to_string(), "age:int".to_string(), "admin:bool".to_string()],
        )
        .unwrap();
    metadata
}

fn _insert_many(
    engine: &RecordEngine,
    metadata: &Metadata,
    rows: &[(&str, &str, &str)],
) -> Vec<Record> {
    let mut data = vec![];
    for (name, age, admin) in rows {
        engine
            .insert(
                metadata,
                "users",
                &[name.to_string(), age.to_string(), admin.to_string()],
                &mut data,
            )
            .unwrap();
    }
    data
}

fn _ids(records: &[Record]) -> Vec<i64> {
    records.iter().filter_map(Record::id).collect()
}

fn _clause(column: &str, value: &str) -> IndexMap<String, String> {
    IndexMap::from([(column.to_string(), value.to_string())])
}

#[test]
fn engine_insert_assigns_increasing_ids() {
    let engine = RecordEngine::new();
    let data = _insert_many(
        &engine,
        &_prepare_metadata(),
        &[("a", "1", "true"), ("b", "2", "false"), ("c", "3", "no")],
    );

    assert_eq!(_ids(&data), vec![1, 2, 3]);
    assert_eq!(data[2].get("admin"), Some(&Value::Bool(false)));
}

#[test]
fn engine_insert_never_reuses_deleted_ids() {
    let engine = RecordEngine::new();
    let metadata = _prepare_metadata();
    let mut data = _insert_many(
        &engine,
        &metadata,
        &[("a", "1", "true"), ("b", "2", "true"), ("c", "3", "true")],
    );

    engine.delete(&mut data, &Predicate::new("ID", 2));
    let id = engine
        .insert(
            &metadata,
            "users",
            &["d".to_string(), "4".to_string(), "true".to_string()],
            &mut data,
        )
        .unwrap();

    assert_eq!(id, 4);
    assert_eq!(_ids(&data), vec![1, 3, 4]);
}

#[test]
fn engine_select_all_in_insertion_order() {
    let mut engine = RecordEngine::new();
    let data = _insert_many(
        &engine,
        &_prepare_metadata(),
        &[("b", "1", "true"), ("a", "2", "true")],
    );

    let selected = engine.select(&data, None);

    assert_eq!(selected.as_slice(), data.as_slice());
}

#[test]
fn engine_select_compares_string_forms() {
    let mut engine = RecordEngine::new();
    let data = _insert_many(
        &engine,
        &_prepare_metadata(),
        &[("a", "30", "true"), ("b", "31", "false"), ("c", "30", "TRUE")],
    );

    let by_age = engine.select(&data, Some(&Predicate::new("age", "30")));
    assert_eq!(_ids(&by_age), vec![1, 3]);

    let by_admin = engine.select(&data, Some(&Predicate::new("admin", "true")));
    assert_eq!(_ids(&by_admin), vec![1, 3]);

    let capitalised = engine.select(&data, Some(&Predicate::new("admin", "True")));
    assert!(capitalised.is_empty());

    let missing = engine.select(&data, Some(&Predicate::new("email", "a")));
    assert!(missing.is_empty());
}

#[test]
fn engine_select_returns_stale_cached_result() {
    let mut engine = RecordEngine::new();
    let metadata = _prepare_metadata();
    let mut data = _insert_many(&engine, &metadata, &[("a", "1", "true")]);
    let predicate = Predicate::new("name", "a");

    let first = engine.select(&data, Some(&predicate));

    engine
        .insert(
            &metadata,
            "users",
            &["a".to_string(), "2".to_string(), "true".to_string()],
            &mut data,
        )
        .unwrap();
    let second = engine.select(&data, Some(&predicate));

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.len(), 1);

    let key = Predicate::cache_key(Some(&predicate));
    engine.cache_mut().invalidate(&key);
    let third = engine.select(&data, Some(&predicate));

    assert!(!Arc::ptr_eq(&first, &third));
    assert_eq!(third.len(), 2);
}

#[test]
fn engine_caches_are_isolated_per_instance() {
    let metadata = _prepare_metadata();
    let mut warm = RecordEngine::with_cache(QueryCache::new());
    let mut cold = RecordEngine::new();

    let data = _insert_many(&warm, &metadata, &[("a", "1", "true")]);
    warm.select(&data, None);

    assert_eq!(warm.cache().len(), 1);
    assert!(cold.cache().is_empty());
    assert_eq!(cold.select(&[], None).len(), 0);
}

#[test]
fn engine_update_coerces_with_schema() {
    let engine = RecordEngine::new();
    let metadata = _prepare_metadata();
    let mut data = _insert_many(
        &engine,
        &metadata,
        &[("a", "1", "false"), ("b", "1", "false"), ("c", "2", "false")],
    );

    let mut set_clause = _clause("admin", "TRUE");
    set_clause.insert("name".to_string(), "\"z\"".to_string());

    let n_updated = engine
        .update(
            &mut data,
            &set_clause,
            &Predicate::new("age", "1"),
            metadata.schema("users").ok(),
        )
        .unwrap();

    assert_eq!(n_updated, 2);
    assert_eq!(data[0].get("admin"), Some(&Value::Bool(true)));
    assert_eq!(data[1].get("name"), Some(&Value::from("z")));
    assert_eq!(data[2].get("admin"), Some(&Value::Bool(false)));
}

#[test]
fn engine_update_is_not_atomic_across_records() {
    let engine = RecordEngine::new();
    let metadata = _prepare_metadata();
    let mut data = _insert_many(&engine, &metadata, &[("a", "1", "true"), ("b", "1", "true")]);

    // only the second record lacks the column, so the first gets updated
    data[1] = Record::from_iter([("ID", Value::Int(2)), ("age", Value::Int(1))]);

    let mut set_clause = _clause("age", "9");
    set_clause.insert("name".to_string(), "x".to_string());

    let result = engine.update(
        &mut data,
        &set_clause,
        &Predicate::new("age", "1"),
        metadata.schema("users").ok(),
    );

    assert!(matches!(result, Err(DbError::ColumnNotFound(column)) if column == "name"));
    assert_eq!(data[0].get("age"), Some(&Value::Int(9)));
    assert_eq!(data[0].get("name"), Some(&Value::from("x")));
    assert_eq!(data[1].get("age"), Some(&Value::Int(1)));
}

#[test]
fn engine_update_with_unknown_column_fails() {
    let engine = RecordEngine::new();
    let metadata = _prepare_metadata();
    let mut data = _insert_many(&engine, &metadata, &[("a", "1", "true")]);

    let result = engine.update(
        &mut data,
        &_clause("email", "a@b.c"),
        &Predicate::new("ID", "1"),
        None,
    );

    assert!(matches!(result, Err(DbError::ColumnNotFound(_))));
}

#[test]
fn engine_delete_keeps_order_of_the_rest() {
    let engine = RecordEngine::new();
    let mut data = _insert_many(
        &engine,
        &_prepare_metadata(),
        &[("a", "1", "t"), ("b", "2", "t"), ("a", "3", "t"), ("c", "4", "t")],
    );

    let n_deleted = engine.delete(&mut data, &Predicate::new("name", "a"));

    assert_eq!(n_deleted, 2);
    assert_eq!(_ids(&data), vec![2, 4]);
}

#[test]
fn engine_delete_without_matches_changes_nothing() {
    let engine = RecordEngine::new();
    let mut data = _insert_many(&engine, &_prepare_metadata(), &[("a", "1", "t")]);
    let before = data.clone();

    assert_eq!(engine.delete(&mut data, &Predicate::new("name", "zz")), 0);
    assert_eq!(engine.delete(&mut data, &Predicate::new("email", "a")), 0);
    assert_eq!(data, before);
}
