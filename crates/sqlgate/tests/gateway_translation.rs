mod common;

use common::row;
use sqlgate::{Db, TranslationGateway, Value};
use std_util::prelude::*;

use pretty_assertions::assert_eq;

fn translations(db: &Db) -> TranslationGateway {
    assert_ok!(db.translation_gateway("t_tr"))
}

fn labels(rows: &[sqlgate::Row]) -> Vec<&str> {
    rows.iter()
        .filter_map(|row| row.get("label").and_then(Value::as_str))
        .collect()
}

#[tokio::test]
async fn reads_link_columns_from_metadata() {
    let db = common::db();
    let gateway = translations(&db);

    assert_eq!(gateway.translatable_id_column(), "t_id");
    assert_eq!(gateway.language_id_column(), "language_id");
    assert_eq!(gateway.table().table_name(), "t_tr");

    // Only translation tables get a translation gateway.
    let err = assert_err!(db.translation_gateway("t"));
    assert!(err.is_runtime_mapping());
}

#[tokio::test]
async fn insert_and_find() {
    let db = common::db();
    let gateway = translations(&db);

    assert_ok!(gateway.insert(1, 1, row([("label", Value::from("hello"))])).await);
    assert_ok!(gateway.insert(1, 2, row([("label", Value::from("hallo"))])).await);
    assert_ok!(gateway.insert(2, 1, row([("label", Value::from("bye"))])).await);

    let rows = assert_ok!(gateway.find_by_translatable_id(1).await);
    assert_eq!(labels(&rows), ["hello", "hallo"]);
    assert_eq!(rows[1]["language_id"], Value::I64(2));

    let rows = assert_ok!(gateway.find_by_translatable_ids(&[1, 2]).await);
    assert_eq!(rows.len(), 3);

    assert_eq!(assert_ok!(gateway.count_by_translatable_id(1).await), 2);
    assert_eq!(assert_ok!(gateway.count_by_translatable_id(3).await), 0);
}

#[tokio::test]
async fn explicit_link_values_win_on_insert() {
    let db = common::db();
    let gateway = translations(&db);

    assert_ok!(
        gateway
            .insert(
                1,
                1,
                row([("label", Value::from("hei")), ("language_id", Value::from(7))])
            )
            .await
    );

    assert!(assert_ok!(gateway.exists(1, 7).await));
    assert!(!assert_ok!(gateway.exists(1, 1).await));
}

#[tokio::test]
async fn save_updates_or_inserts() {
    let db = common::db();
    let gateway = translations(&db);

    assert_ok!(gateway.save(1, 1, row([("label", Value::from("first"))])).await);
    assert_ok!(gateway.save(1, 1, row([("label", Value::from("second"))])).await);

    let rows = assert_ok!(gateway.find_by_translatable_id(1).await);
    assert_eq!(labels(&rows), ["second"]);

    let changed = assert_ok!(gateway.update(1, 2, row([("label", Value::from("x"))])).await);
    assert_eq!(changed, 0);
}

#[tokio::test]
async fn delete_one_language() {
    let db = common::db();
    let gateway = translations(&db);

    assert_ok!(gateway.insert(1, 1, row([("label", Value::from("hello"))])).await);
    assert_ok!(gateway.insert(1, 2, row([("label", Value::from("hallo"))])).await);

    assert_eq!(assert_ok!(gateway.delete(1, 2).await), 1);
    assert_eq!(assert_ok!(gateway.delete(1, 2).await), 0);
    assert_eq!(assert_ok!(gateway.count_by_translatable_id(1).await), 1);
}

#[tokio::test]
async fn copy_duplicates_every_language() {
    let db = common::db();
    let gateway = translations(&db);

    assert_ok!(gateway.insert(1, 1, row([("label", Value::from("hello"))])).await);
    assert_ok!(gateway.insert(1, 2, row([("label", Value::from("hallo"))])).await);

    assert_ok!(gateway.copy(1, 5).await);

    let copies = assert_ok!(gateway.find_by_translatable_id(5).await);
    assert_eq!(labels(&copies), ["hello", "hallo"]);
    assert_eq!(copies[0]["id"], Value::I64(3));
    assert_eq!(copies[1]["language_id"], Value::I64(2));

    // The source rows are untouched.
    assert_eq!(assert_ok!(gateway.count_by_translatable_id(1).await), 2);
}
