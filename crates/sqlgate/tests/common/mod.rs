#![allow(dead_code)]

use sqlgate::{
    schema::{JoinType, Registry, RegistryBuilder, Relationship, SchemaMetadata, Type},
    Db, Row, Sqlite, Value,
};
use std_util::prelude::*;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every table the tests use.
pub fn tables() -> Vec<SchemaMetadata> {
    vec![
        assert_ok!(SchemaMetadata::builder("t")
            .entity("Thing")
            .column("id", Type::Integer)
            .column("foo", Type::String)
            .column("count", Type::Integer)
            .column("name", Type::String)
            .identifier("id")
            .translation("t_tr")
            .build()),
        assert_ok!(SchemaMetadata::builder("t_tr")
            .column("id", Type::Integer)
            .column("t_id", Type::Integer)
            .column("language_id", Type::Integer)
            .column("label", Type::String)
            .identifier("id")
            .translation_of("t_id", "language_id")
            .build()),
        assert_ok!(SchemaMetadata::builder("root")
            .entity("Root")
            .column("id", Type::Integer)
            .column("title", Type::String)
            .column("author_fk", Type::Integer)
            .column("editor_fk", Type::Integer)
            .identifier("id")
            .relationship(assert_ok!(Relationship::new("Person", "author", "author_fk", "id")
                .with_join_type(JoinType::SubSelect)))
            .relationship(Relationship::new("Person", "editor", "editor_fk", "id"))
            .relationship(Relationship::one_to_many("Note", "notes", "root_id"))
            .build()),
        assert_ok!(SchemaMetadata::builder("person")
            .entity("Person")
            .column("id", Type::Integer)
            .column("name", Type::String)
            .column("country", Type::String)
            .column("city_fk", Type::Integer)
            .column("employer_fk", Type::Integer)
            .identifier("id")
            .relationship(Relationship::new("City", "city", "city_fk", "id"))
            .relationship(assert_ok!(Relationship::new(
                "Company",
                "employer",
                "employer_fk",
                "id"
            )
            .with_join_type(JoinType::SubSelect)))
            .build()),
        assert_ok!(SchemaMetadata::builder("city")
            .entity("City")
            .column("id", Type::Integer)
            .column("name", Type::String)
            .identifier("id")
            .build()),
        assert_ok!(SchemaMetadata::builder("company")
            .entity("Company")
            .column("id", Type::Integer)
            .column("name", Type::String)
            .identifier("id")
            .build()),
        assert_ok!(SchemaMetadata::builder("note")
            .entity("Note")
            .column("id", Type::Integer)
            .column("root_id", Type::Integer)
            .column("body", Type::Text)
            .identifier("id")
            .build()),
        assert_ok!(SchemaMetadata::builder("content")
            .entity("Content")
            .column("id", Type::Integer)
            .column("name", Type::String)
            .column("created", Type::DateTime)
            .identifier("id")
            .subclass("blog", "blog_content")
            .build()),
        assert_ok!(SchemaMetadata::builder("blog_content")
            .column("id", Type::Integer)
            .column("url", Type::String)
            .column("published", Type::Boolean)
            .identifier("id")
            .build()),
    ]
}

pub fn registry_builder() -> RegistryBuilder {
    let mut builder = Registry::builder();
    for table in tables() {
        builder.register(table);
    }
    builder
}

pub fn registry() -> Registry {
    assert_ok!(registry_builder().build())
}

const DDL: &str = "
    CREATE TABLE t (id INTEGER PRIMARY KEY AUTOINCREMENT, foo TEXT, count INTEGER, name TEXT);
    CREATE TABLE t_tr (id INTEGER PRIMARY KEY AUTOINCREMENT, t_id INTEGER NOT NULL,
                       language_id INTEGER NOT NULL, label TEXT);
    CREATE TABLE root (id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT, author_fk INTEGER,
                       editor_fk INTEGER);
    CREATE TABLE person (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, country TEXT,
                         city_fk INTEGER, employer_fk INTEGER);
    CREATE TABLE city (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT);
    CREATE TABLE company (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT);
    CREATE TABLE note (id INTEGER PRIMARY KEY AUTOINCREMENT, root_id INTEGER, body TEXT);
    CREATE TABLE content (id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT, created TEXT);
    CREATE TABLE blog_content (id INTEGER PRIMARY KEY, url TEXT, published INTEGER);
";

/// A database over a fresh in-memory SQLite schema.
pub fn db() -> Db {
    init_logging();

    let driver = assert_ok!(Sqlite::in_memory());
    assert_ok!(driver.execute_batch(DDL));

    let mut builder = Db::builder();
    for table in tables() {
        builder.register(table);
    }
    assert_ok!(builder.build(driver))
}

pub fn row<const N: usize>(entries: [(&str, Value); N]) -> Row {
    entries
        .into_iter()
        .map(|(column, value)| (column.to_string(), value))
        .collect()
}
