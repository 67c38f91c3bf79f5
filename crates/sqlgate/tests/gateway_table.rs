mod common;

use common::row;
use sqlgate::{stmt::Statement, Criteria, Db, Direction, Expression, TableGateway, Value};
use sqlgate_sql::{Bindings, Serializer};
use std_util::prelude::*;

use pretty_assertions::assert_eq;

async fn things(db: &Db) -> TableGateway {
    let gateway = assert_ok!(db.gateway("t"));

    for (foo, count, name) in [("x", 1, "alice"), ("x", 2, "al_ice"), ("x", 3, "bob"), ("y", 4, "carol")] {
        assert_ok!(
            gateway
                .insert(row([
                    ("foo", Value::from(foo)),
                    ("count", Value::from(count)),
                    ("name", Value::from(name)),
                ]))
                .await
        );
    }

    gateway
}

fn names(rows: &[sqlgate::Row]) -> Vec<&str> {
    rows.iter()
        .filter_map(|row| row.get("name").and_then(Value::as_str))
        .collect()
}

#[tokio::test]
async fn insert_then_find_by_id() {
    let db = common::db();
    let gateway = assert_ok!(db.gateway("t"));

    let id = assert_ok!(
        gateway
            .insert(row([("foo", Value::from("bar")), ("count", Value::from(3))]))
            .await
    );
    assert_eq!(id, 1);

    let found = assert_ok!(gateway.find_by_id(id).await).unwrap();
    assert_eq!(
        found,
        row([
            ("id", Value::I64(1)),
            ("foo", Value::from("bar")),
            ("count", Value::I64(3)),
            ("name", Value::Null),
        ])
    );

    assert!(assert_ok!(gateway.find_by_id(99).await).is_none());
}

#[tokio::test]
async fn find_by_orders_and_pages() {
    let db = common::db();
    let gateway = things(&db).await;

    let rows = assert_ok!(
        gateway
            .find_by(&Criteria::by("foo", "x"), &[("count", Direction::Desc)], Some(2), 1)
            .await
    );
    assert_eq!(names(&rows), ["al_ice", "alice"]);

    let rows = assert_ok!(gateway.find_all(None, 3).await);
    assert_eq!(names(&rows), ["carol"]);

    let first = assert_ok!(
        gateway
            .find_one_by(&Criteria::by("foo", "x"), &[("name", Direction::Asc)])
            .await
    );
    assert_eq!(first.unwrap()["name"], Value::from("al_ice"));
}

#[tokio::test]
async fn find_query_renders_clauses_in_order() {
    let db = common::db();
    let gateway = assert_ok!(db.gateway_with_alias("t", "x"));

    let (query, params) = assert_ok!(gateway.find_query(
        &Criteria::by("foo", "bar"),
        &[("count", Direction::Desc)],
        Some(2),
        1
    ));
    let sql = assert_ok!(
        Serializer::named().serialize(&Statement::from(query), &mut Bindings::new(&params))
    );

    assert_eq!(
        sql,
        "SELECT x.id, x.foo, x.count, x.name FROM t x WHERE x.foo = :foo_0 \
         ORDER BY x.count DESC LIMIT 2 OFFSET 1;"
    );
}

#[tokio::test]
async fn unknown_order_column_is_rejected() {
    let db = common::db();
    let gateway = assert_ok!(db.gateway("t"));

    let err = assert_err!(
        gateway
            .find_by(&Criteria::all(), &[("missing", Direction::Asc)], None, 0)
            .await
    );
    assert!(err.is_invalid_statement());
    assert_eq!(
        err.to_string(),
        "invalid statement: \"missing\" does not exist in \"t\", or is not available for \
         ordering. Available columns are: \"id\", \"foo\", \"count\", \"name\""
    );
}

#[tokio::test]
async fn pattern_search_matches_literally() {
    let db = common::db();
    let gateway = things(&db).await;

    let rows = assert_ok!(
        gateway
            .find_by(&Expression::contains("name", "al_ice").into(), &[], None, 0)
            .await
    );
    assert_eq!(names(&rows), ["al_ice"]);

    let rows = assert_ok!(
        gateway
            .find_by(
                &Expression::starts_with("name", "al").into(),
                &[("count", Direction::Asc)],
                None,
                0
            )
            .await
    );
    assert_eq!(names(&rows), ["alice", "al_ice"]);
}

#[tokio::test]
async fn counting() {
    let db = common::db();
    let gateway = things(&db).await;

    assert_eq!(assert_ok!(gateway.count_all().await), 4);
    assert_eq!(assert_ok!(gateway.count_by(&Criteria::by("foo", "x")).await), 3);
    assert_eq!(
        assert_ok!(gateway.count_by(&Criteria::by("count", vec![1, 4, 9])).await),
        2
    );
    assert_eq!(
        assert_ok!(gateway.count_by(&Criteria::by("name", Value::Null)).await),
        0
    );
}

#[tokio::test]
async fn update_and_delete_report_affected_rows() {
    let db = common::db();
    let gateway = things(&db).await;

    let changed = assert_ok!(
        gateway
            .update(
                row([("foo", Value::from("x"))]),
                row([("foo", Value::from("z")), ("count", Value::from(0))])
            )
            .await
    );
    assert_eq!(changed, 3);
    assert_eq!(assert_ok!(gateway.count_by(&Criteria::by("foo", "z")).await), 3);

    let removed = assert_ok!(
        gateway
            .delete(row([("name", Value::from(vec!["bob", "carol"]))]))
            .await
    );
    assert_eq!(removed, 2);
    assert_eq!(assert_ok!(gateway.count_all().await), 2);

    let removed = assert_ok!(gateway.delete(row([("name", Value::Null)])).await);
    assert_eq!(removed, 0);
}

#[tokio::test]
async fn relationships_filter_rows() {
    let db = common::db();
    let cities = assert_ok!(db.gateway("city"));
    let companies = assert_ok!(db.gateway("company"));
    let people = assert_ok!(db.gateway("person"));
    let roots = assert_ok!(db.gateway("root"));

    let oslo = assert_ok!(cities.insert(row([("name", Value::from("Oslo"))])).await);
    let acme = assert_ok!(companies.insert(row([("name", Value::from("Acme"))])).await);
    let ann = assert_ok!(
        people
            .insert(row([
                ("name", Value::from("ann")),
                ("country", Value::from("NO")),
                ("city_fk", Value::from(oslo)),
                ("employer_fk", Value::from(acme)),
            ]))
            .await
    );
    let bo = assert_ok!(
        people
            .insert(row([("name", Value::from("bo")), ("country", Value::from("SE"))]))
            .await
    );

    assert_ok!(
        roots
            .insert(row([
                ("title", Value::from("first")),
                ("author_fk", Value::from(ann)),
                ("editor_fk", Value::from(bo)),
            ]))
            .await
    );
    assert_ok!(
        roots
            .insert(row([
                ("title", Value::from("second")),
                ("author_fk", Value::from(bo)),
                ("editor_fk", Value::from(ann)),
            ]))
            .await
    );

    let titles = |rows: Vec<sqlgate::Row>| -> Vec<Value> {
        rows.into_iter().map(|mut row| row.shift_remove("title").unwrap()).collect()
    };

    let rows = assert_ok!(
        roots
            .find_by(&Expression::eq("author.city.name", "Oslo").into(), &[], None, 0)
            .await
    );
    assert_eq!(titles(rows), [Value::from("first")]);

    let rows = assert_ok!(
        roots
            .find_by(&Expression::eq("editor.employer.name", "Acme").into(), &[], None, 0)
            .await
    );
    assert_eq!(titles(rows), [Value::from("second")]);

    let rows = assert_ok!(
        roots
            .find_by(&Expression::eq("author.employer.name", "Acme").into(), &[], None, 0)
            .await
    );
    assert_eq!(titles(rows), [Value::from("first")]);

    let criteria = Criteria::from(Expression::or([
        Expression::eq("editor.country", "NO"),
        Expression::eq("editor.country", "SE"),
    ]));
    assert_eq!(assert_ok!(roots.count_by(&criteria).await), 2);
}

#[tokio::test]
async fn translated_columns_filter_rows() {
    let db = common::db();
    let gateway = things(&db).await;
    let translations = assert_ok!(db.translation_gateway("t_tr"));

    assert_ok!(
        translations
            .insert(3, 1, row([("label", Value::from("hello"))]))
            .await
    );

    let rows = assert_ok!(gateway.find_by(&Criteria::by("label", "hello"), &[], None, 0).await);
    assert_eq!(names(&rows), ["bob"]);
    assert_eq!(assert_ok!(gateway.count_by(&Criteria::by("label", "bye")).await), 0);
}

#[tokio::test]
async fn joined_inheritance_projects_subclass_columns() {
    let db = common::db();
    let contents = assert_ok!(db.gateway("content"));
    let blogs = assert_ok!(db.gateway("blog_content"));
    let created = jiff::civil::date(2024, 1, 2).at(3, 4, 5, 0);

    let post = assert_ok!(
        contents
            .insert(row([("name", Value::from("post")), ("created", Value::from(created))]))
            .await
    );
    assert_ok!(
        contents
            .insert(row([("name", Value::from("page")), ("created", Value::from(created))]))
            .await
    );
    assert_ok!(
        blogs
            .insert(row([
                ("id", Value::from(post)),
                ("url", Value::from("https://example.com/post")),
                ("published", Value::from(true)),
            ]))
            .await
    );

    let rows = assert_ok!(contents.find_all(None, 0).await);
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0],
        row([
            ("id", Value::I64(post)),
            ("name", Value::from("post")),
            ("created", Value::DateTime(created)),
            ("blog_id", Value::I64(post)),
            ("blog_url", Value::from("https://example.com/post")),
            ("blog_published", Value::Bool(true)),
        ])
    );
    assert_eq!(rows[1]["blog_url"], Value::Null);

    let rows = assert_ok!(
        contents
            .find_by(
                &Criteria::by("url", "https://example.com/post"),
                &[("url", Direction::Asc)],
                None,
                0
            )
            .await
    );
    assert_eq!(rows.len(), 1);
    assert_eq!(assert_ok!(contents.count_by(&Criteria::by("blog_published", true)).await), 1);
}

#[tokio::test]
async fn pattern_search_on_non_text_columns() {
    let db = common::db();
    let contents = assert_ok!(db.gateway("content"));

    for (name, year) in [("post", 2024), ("page", 2023)] {
        let created = jiff::civil::date(year, 5, 1).at(10, 0, 0, 0);
        assert_ok!(
            contents
                .insert(row([("name", Value::from(name)), ("created", Value::from(created))]))
                .await
        );
    }

    let rows = assert_ok!(
        contents
            .find_by(&Expression::starts_with("created", "2024").into(), &[], None, 0)
            .await
    );
    assert_eq!(names(&rows), ["post"]);
}

#[tokio::test]
async fn count_query_joins_subclasses_without_projecting() {
    let db = common::db();
    let contents = assert_ok!(db.gateway("content"));

    let (query, params) = assert_ok!(contents.count_query(&Criteria::all()));
    let sql = assert_ok!(
        Serializer::named().serialize(&Statement::from(query), &mut Bindings::new(&params))
    );

    assert_eq!(
        sql,
        "SELECT COUNT(DISTINCT content.id) FROM content \
         LEFT JOIN blog_content ON content.id = blog_content.id;"
    );
}

#[tokio::test]
async fn unknown_tables_and_columns_are_rejected() {
    let db = common::db();

    let err = assert_err!(db.gateway("missing"));
    assert!(err.is_invalid_configuration());

    let gateway = assert_ok!(db.gateway("t"));
    let err = assert_err!(gateway.insert(row([("missing", Value::from(1))])).await);
    assert!(err.is_runtime_mapping());

    let err = assert_err!(gateway.find_by(&Criteria::by("missing", 1), &[], None, 0).await);
    assert!(err.is_runtime_mapping());
}
