use sqlgate_core::{
    schema::{
        ColumnOrigin, LazyRegistry, ParameterType, Registry, RegistryBuilder, SchemaMetadata, Type,
    },
    stmt::{Row, Value},
};
use std_util::prelude::*;

use std::sync::Arc;

fn content() -> SchemaMetadata {
    assert_ok!(SchemaMetadata::builder("content")
        .entity("Content")
        .column("id", Type::Integer)
        .column("name", Type::String)
        .identifier("id")
        .subclass("blog", "blog_content")
        .translation("content_tr")
        .build())
}

fn blog_content() -> SchemaMetadata {
    assert_ok!(SchemaMetadata::builder("blog_content")
        .column("id", Type::Integer)
        .column("url", Type::String)
        .column("published", Type::Boolean)
        .identifier("id")
        .build())
}

fn content_tr() -> SchemaMetadata {
    assert_ok!(SchemaMetadata::builder("content_tr")
        .entity("Content")
        .column("id", Type::Integer)
        .column("content_id", Type::Integer)
        .column("language_id", Type::Integer)
        .column("title", Type::String)
        .column("name", Type::String)
        .identifier("id")
        .translation_of("content_id", "language_id")
        .build())
}

fn registry() -> Registry {
    assert_ok!(Registry::builder()
        .with(content())
        .with(blog_content())
        .with(content_tr())
        .build())
}

#[test]
fn lookups_by_table_and_entity() {
    let registry = registry();
    assert_eq!(registry.len(), 3);

    let metadata = assert_ok!(registry.metadata_for_table("content"));
    assert_eq!(metadata.table_name(), "content");

    let metadata = assert_ok!(registry.metadata("Content"));
    assert_eq!(metadata.table_name(), "content");

    // Same entity, separate namespace.
    let metadata = assert_ok!(registry.translation_metadata("Content"));
    assert_eq!(metadata.table_name(), "content_tr");

    let tables: Vec<_> = registry
        .available_metadata()
        .map(|metadata| metadata.table_name().to_string())
        .collect();
    assert_eq!(tables, ["content", "blog_content", "content_tr"]);
}

#[test]
fn unknown_lookups_are_configuration_errors() {
    let registry = registry();

    let err = assert_err!(registry.metadata_for_table("missing"));
    assert!(err.is_invalid_configuration());
    assert_contains!(err.to_string(), "Failed to find metadata for table \"missing\"");

    let err = assert_err!(registry.metadata("Missing"));
    assert_contains!(err.to_string(), "Did you forget to register");
}

#[test]
fn duplicate_registrations_fail() {
    let err = assert_err!(Registry::builder().with(blog_content()).with(blog_content()).build());
    assert!(err.is_invalid_configuration());
    assert_contains!(err.to_string(), "\"blog_content\" table");

    let other = assert_ok!(SchemaMetadata::builder("content_copy")
        .entity("Content")
        .column("id", Type::Integer)
        .identifier("id")
        .build());
    let err = assert_err!(Registry::builder()
        .with(content())
        .with(blog_content())
        .with(content_tr())
        .with(other)
        .build());
    assert_contains!(err.to_string(), "\"Content\" class");
}

#[test]
fn dangling_links_fail() {
    let err = assert_err!(Registry::builder().with(content()).with(content_tr()).build());
    assert!(err.is_invalid_configuration());
    assert_eq!(
        err.to_string(),
        "invalid configuration: subclass table \"blog_content\" of \"content\" is not registered"
    );
}

#[test]
fn columns_resolve_direct_then_translation_then_inheritance() {
    let registry = registry();
    let metadata = assert_ok!(registry.metadata_for_table("content"));

    // `name` exists directly and on the translation table.
    let name = assert_ok!(metadata.resolve_column("name"));
    assert_eq!(name.origin, ColumnOrigin::Direct);

    let title = assert_ok!(metadata.resolve_column("title"));
    assert!(matches!(title.origin, ColumnOrigin::Translation(_)));
    assert!(metadata.is_translated_column("title"));

    let url = assert_ok!(metadata.resolve_column("url"));
    assert!(matches!(url.origin, ColumnOrigin::Inherited(_)));
    assert!(metadata.is_inherited_column("url"));

    let prefixed = assert_ok!(metadata.resolve_column("blog_published"));
    assert_eq!(prefixed.ty, Type::Boolean);

    let child = metadata.inheritance_metadata_with_column("url").unwrap();
    assert_eq!(child.table_name(), "blog_content");
    assert_eq!(child.parent().unwrap().table_name(), "content");
}

#[test]
fn unresolvable_column_lists_every_source() {
    let registry = registry();
    let metadata = assert_ok!(registry.metadata_for_table("content"));

    let err = assert_err!(metadata.resolve_column("missing"));
    assert!(err.is_runtime_mapping());
    assert_contains!(
        err.to_string(),
        "Column \"missing\" does not exist in \"content\" table"
    );
    assert_contains!(err.to_string(), "\"blog_url(inheritance)\"");
    assert_contains!(err.to_string(), "\"title(translation)\"");
}

#[test]
fn subclass_lookup_by_discriminator() {
    let registry = registry();
    let metadata = assert_ok!(registry.metadata_for_table("content"));

    let blog = assert_ok!(metadata.subclass_by_discriminator("blog"));
    assert_eq!(blog.table_name(), "blog_content");

    let err = assert_err!(metadata.subclass_by_discriminator("news"));
    assert_contains!(err.to_string(), "Available discriminators: \"blog\"");

    let err = assert_err!(blog.subclass_by_discriminator("news"));
    assert_contains!(err.to_string(), "There are no registered subclasses");
}

#[test]
fn missing_translation_is_reported() {
    let registry = registry();
    let blog = assert_ok!(registry.metadata_for_table("blog_content"));

    assert!(!blog.has_translation());
    let err = assert_err!(blog.translation());
    assert!(err.is_runtime_mapping());
}

#[test]
fn values_convert_through_column_types() {
    let registry = registry();
    let blog = assert_ok!(registry.metadata_for_table("blog_content"));

    let mut row = Row::new();
    row.insert("id".to_string(), Value::from("7"));
    row.insert("published".to_string(), Value::from(true));

    let types = assert_ok!(blog.binding_types_for_data(&row));
    assert_eq!(types["id"], ParameterType::Integer);
    assert_eq!(types["published"], ParameterType::Boolean);

    let stored = assert_ok!(blog.convert_to_database_values(row));
    assert_eq!(stored["id"], Value::I64(7));

    let mut fetched = Row::new();
    fetched.insert("published".to_string(), Value::I64(1));
    let app = assert_ok!(blog.convert_to_app_values(fetched));
    assert_eq!(app["published"], Value::Bool(true));
}

#[test]
fn lazy_registry_builds_once() {
    let builder = RegistryBuilder::new()
        .with(content())
        .with(blog_content())
        .with(content_tr());
    let lazy = Arc::new(LazyRegistry::new(builder));
    assert!(!lazy.is_initialized());

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let lazy = lazy.clone();
            std::thread::spawn(move || lazy.get().map(|registry| registry.len()).unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 3);
    }
    assert!(lazy.is_initialized());
    assert_ok!(lazy.metadata("Content"));
}

#[test]
fn lazy_registry_shares_build_failure() {
    let lazy = LazyRegistry::new(RegistryBuilder::new().with(content()));

    let first = assert_err!(lazy.get());
    let second = assert_err!(lazy.metadata_for_table("content"));
    assert_eq!(first.to_string(), second.to_string());
}
