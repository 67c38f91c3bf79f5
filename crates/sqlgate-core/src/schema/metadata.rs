use super::{Relationship, Type};
use crate::{Error, Result};

use indexmap::IndexMap;

/// Schema description of one mapped table.
///
/// Metadata is standalone: links to subclass and translation tables are
/// stored by table name and resolved once the metadata is registered in a
/// [`Registry`](super::Registry).
#[derive(Debug, Clone)]
pub struct SchemaMetadata {
    table: String,

    /// Entity identifier. `None` for internal storage tables that have no
    /// dedicated application type.
    entity: Option<String>,

    columns: IndexMap<String, Type>,

    identifier: Vec<String>,

    /// Discriminator -> subclass table (joined-table inheritance).
    subclasses: IndexMap<String, String>,

    translation: Option<String>,

    /// Set when this table *is* a translation table.
    translation_columns: Option<TranslationColumns>,

    relationships: Vec<Relationship>,
    by_property: IndexMap<String, usize>,
    by_foreign_key: IndexMap<String, usize>,
}

/// Columns that make a table a per-language companion of another table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationColumns {
    pub language_id_column: String,

    /// Foreign key back to the owning (translatable) row.
    pub translatable_id_column: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InheritanceType {
    None,
    Joined,
}

impl SchemaMetadata {
    pub fn new(
        table: impl Into<String>,
        columns: IndexMap<String, Type>,
        identifier: Vec<String>,
    ) -> SchemaMetadata {
        SchemaMetadata {
            table: table.into(),
            entity: None,
            columns,
            identifier,
            subclasses: IndexMap::new(),
            translation: None,
            translation_columns: None,
            relationships: vec![],
            by_property: IndexMap::new(),
            by_foreign_key: IndexMap::new(),
        }
    }

    pub fn builder(table: impl Into<String>) -> Builder {
        Builder {
            metadata: SchemaMetadata::new(table, IndexMap::new(), vec![]),
            error: None,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// Name used in diagnostics: the entity identifier when present.
    pub fn display_name(&self) -> &str {
        self.entity.as_deref().unwrap_or(&self.table)
    }

    pub fn columns(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    pub fn column_types(&self) -> &IndexMap<String, Type> {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    /// Type of a column declared directly on this table.
    pub fn column(&self, column: &str) -> Option<Type> {
        self.columns.get(column).copied()
    }

    pub fn identifier_columns(&self) -> &[String] {
        &self.identifier
    }

    /// The single identifier column.
    pub fn identifier_column(&self) -> Result<&str> {
        match &self.identifier[..] {
            [column] => Ok(column),
            [] => Err(Error::mapping(format!(
                "No ID column defined for schema \"{}\"",
                self.table
            ))),
            _ => Err(Error::mapping(format!(
                "Attempted to get single ID column on composite primary key schema \"{}\"",
                self.table
            ))),
        }
    }

    pub fn inheritance_type(&self) -> InheritanceType {
        if self.subclasses.is_empty() {
            InheritanceType::None
        } else {
            InheritanceType::Joined
        }
    }

    pub fn is_inheritance_type_joined(&self) -> bool {
        self.inheritance_type() == InheritanceType::Joined
    }

    /// Discriminator -> subclass table name.
    pub fn subclass_tables(&self) -> &IndexMap<String, String> {
        &self.subclasses
    }

    pub fn add_subclass(
        &mut self,
        discriminator: impl Into<String>,
        table: impl Into<String>,
    ) -> Result<()> {
        let discriminator = discriminator.into();
        if self.subclasses.contains_key(&discriminator) {
            return Err(Error::mapping(format!(
                "\"{discriminator}\" is already added as a discriminator for a subtype."
            )));
        }
        self.subclasses.insert(discriminator, table.into());
        Ok(())
    }

    pub fn translation_table(&self) -> Option<&str> {
        self.translation.as_deref()
    }

    pub fn set_translation_table(&mut self, table: impl Into<String>) {
        self.translation = Some(table.into());
    }

    pub fn translation_columns(&self) -> Option<&TranslationColumns> {
        self.translation_columns.as_ref()
    }

    pub fn is_translation(&self) -> bool {
        self.translation_columns.is_some()
    }

    pub fn language_id_column(&self) -> Result<&str> {
        self.require_translation_columns()
            .map(|columns| columns.language_id_column.as_str())
    }

    pub fn translatable_id_column(&self) -> Result<&str> {
        self.require_translation_columns()
            .map(|columns| columns.translatable_id_column.as_str())
    }

    fn require_translation_columns(&self) -> Result<&TranslationColumns> {
        self.translation_columns.as_ref().ok_or_else(|| {
            Error::runtime_mapping(format!(
                "\"{}\" is not a translation table",
                self.table
            ))
        })
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    pub fn add_relationship(&mut self, relationship: Relationship) -> Result<()> {
        let property = relationship.foreign_property();
        if self.by_property.contains_key(property) {
            return Err(Error::mapping(format!(
                "\"{property}\" is already added as foreign property."
            )));
        }

        let column = relationship.foreign_key_column();
        let index_column = !relationship.is_one_to_many()
            && !self.identifier.iter().any(|id| id == column);

        if index_column && self.by_foreign_key.contains_key(column) {
            return Err(Error::mapping(format!(
                "\"{column}\" is already added as foreign column."
            )));
        }

        let index = self.relationships.len();
        self.by_property.insert(property.to_string(), index);
        if index_column {
            self.by_foreign_key.insert(column.to_string(), index);
        }
        self.relationships.push(relationship);
        Ok(())
    }

    pub fn relationship_by_foreign_property(&self, property: &str) -> Result<&Relationship> {
        match self.by_property.get(property) {
            Some(index) => Ok(&self.relationships[*index]),
            None => Err(Error::runtime_mapping(format!(
                "\"{property}\" does not exist as a relationship for \"{}\" class metadata. \
                 Available relationship property: \"{}\"",
                self.display_name(),
                join(self.by_property.keys()),
            ))),
        }
    }

    pub fn relationship_by_foreign_key_column(&self, column: &str) -> Result<&Relationship> {
        match self.by_foreign_key.get(column) {
            Some(index) => Ok(&self.relationships[*index]),
            None => Err(Error::runtime_mapping(format!(
                "\"{column}\" does not exist as a relationship for \"{}\" class metadata. \
                 Available relationship columns: \"{}\"",
                self.display_name(),
                join(self.by_foreign_key.keys()),
            ))),
        }
    }
}

pub(crate) fn join<'a>(names: impl IntoIterator<Item = &'a String>) -> String {
    names
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join("\", \"")
}

/// Fluent construction of [`SchemaMetadata`].
///
/// Configuration errors are deferred until [`Builder::build`].
#[derive(Debug)]
pub struct Builder {
    metadata: SchemaMetadata,
    error: Option<Error>,
}

impl Builder {
    pub fn entity(mut self, entity: impl Into<String>) -> Builder {
        self.metadata.entity = Some(entity.into());
        self
    }

    pub fn column(mut self, name: impl Into<String>, ty: Type) -> Builder {
        self.metadata.columns.insert(name.into(), ty);
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Builder
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        for (name, ty) in columns {
            self.metadata.columns.insert(name.into(), ty);
        }
        self
    }

    pub fn identifier(mut self, column: impl Into<String>) -> Builder {
        self.metadata.identifier.push(column.into());
        self
    }

    pub fn subclass(mut self, discriminator: impl Into<String>, table: impl Into<String>) -> Builder {
        if self.error.is_none() {
            if let Err(err) = self.metadata.add_subclass(discriminator, table) {
                self.error = Some(err);
            }
        }
        self
    }

    pub fn translation(mut self, table: impl Into<String>) -> Builder {
        self.metadata.set_translation_table(table);
        self
    }

    /// Marks the table as the translation companion of another table.
    pub fn translation_of(
        mut self,
        translatable_id_column: impl Into<String>,
        language_id_column: impl Into<String>,
    ) -> Builder {
        self.metadata.translation_columns = Some(TranslationColumns {
            language_id_column: language_id_column.into(),
            translatable_id_column: translatable_id_column.into(),
        });
        self
    }

    pub fn relationship(mut self, relationship: Relationship) -> Builder {
        if self.error.is_none() {
            if let Err(err) = self.metadata.add_relationship(relationship) {
                self.error = Some(err);
            }
        }
        self
    }

    pub fn build(self) -> Result<SchemaMetadata> {
        let metadata = self.metadata;

        if let Some(err) = self.error {
            return Err(err);
        }

        if metadata.table.is_empty() {
            return Err(Error::mapping("table name must not be empty"));
        }

        for column in &metadata.identifier {
            if !metadata.has_column(column) {
                return Err(Error::mapping(format!(
                    "identifier column \"{column}\" is not a column of \"{}\"",
                    metadata.table
                )));
            }
        }

        if let Some(columns) = &metadata.translation_columns {
            for column in [&columns.language_id_column, &columns.translatable_id_column] {
                if !metadata.has_column(column) {
                    return Err(Error::mapping(format!(
                        "translation column \"{column}\" is not a column of \"{}\"",
                        metadata.table
                    )));
                }
            }
        }

        Ok(metadata)
    }
}
