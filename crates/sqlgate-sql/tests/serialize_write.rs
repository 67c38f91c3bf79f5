use pretty_assertions::assert_eq;
use sqlgate_core::{
    schema::Type,
    stmt::{Delete, Expr, Insert, Parameter, Statement, Update, Value},
};
use sqlgate_sql::{Bindings, Serializer};
use std_util::prelude::*;

#[test]
fn insert() {
    let mut insert = Insert::new("users");
    insert
        .value("name", Expr::placeholder("name"))
        .value("age", Expr::placeholder("age"));

    let params = [
        Parameter::new("name", "alice", Type::String),
        Parameter::new("age", 32, Type::Integer),
    ];

    let mut bindings = Bindings::new(&params);
    let sql = assert_ok!(Serializer::sqlite().serialize(&Statement::from(insert), &mut bindings));
    assert_eq!(sql, "INSERT INTO users (name, age) VALUES (?1, ?2);");
    assert_eq!(bindings.values()[1].value, Value::from(32));
}

#[test]
fn update_scoped_by_identifier() {
    let mut update = Update::new("users");
    update
        .set("name", Expr::placeholder("name"))
        .and_where(Expr::eq(Expr::bare_column("id"), Expr::placeholder("id")));

    let params = [
        Parameter::new("id", 7, Type::Integer),
        Parameter::new("name", "bob", Type::String),
    ];

    let sql = assert_ok!(
        Serializer::postgresql().serialize(&update.into(), &mut Bindings::new(&params))
    );
    assert_eq!(sql, "UPDATE users SET name = $1 WHERE id = $2;");
}

#[test]
fn delete() {
    let mut delete = Delete::new("users");
    delete
        .and_where(Expr::eq(Expr::bare_column("id"), Expr::placeholder("id")))
        .and_where(Expr::eq(Expr::bare_column("lang"), Expr::placeholder("lang")));

    let params = [
        Parameter::new("id", 7, Type::Integer),
        Parameter::new("lang", "en", Type::String),
    ];

    let sql = assert_ok!(Serializer::mysql().serialize(&delete.into(), &mut Bindings::new(&params)));
    assert_eq!(sql, "DELETE FROM users WHERE (id = ?) AND (lang = ?);");
}
