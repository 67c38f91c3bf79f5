use super::{JoinType, Relationship, RelationshipKind, SchemaMetadata, SchemaProvider, Type};
use crate::{Error, Result};

use indexmap::IndexMap;
use serde::Deserialize;

/// Table metadata described as data.
///
/// ```json
/// {
///   "table": "article",
///   "entity": "Article",
///   "columns": { "id": "integer", "title": "string", "author_fk": "integer" },
///   "identifier": ["id"],
///   "relationships": [
///     { "target": "Person", "property": "author", "foreign_key": "author_fk",
///       "related_id": "id", "join": "sub_select" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableDefinition {
    pub table: String,

    #[serde(default)]
    pub entity: Option<String>,

    pub columns: IndexMap<String, Type>,

    #[serde(default)]
    pub identifier: Vec<String>,

    /// Discriminator -> subclass table.
    #[serde(default)]
    pub subclasses: IndexMap<String, String>,

    /// Translation table of this table.
    #[serde(default)]
    pub translation: Option<String>,

    /// Present when this table is itself a translation table.
    #[serde(default)]
    pub translation_of: Option<TranslationDefinition>,

    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TranslationDefinition {
    pub translatable_id: String,
    pub language_id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipDefinition {
    pub target: String,
    pub property: String,

    #[serde(default)]
    pub foreign_key: Option<String>,

    pub related_id: String,

    #[serde(default)]
    pub join: JoinType,

    #[serde(default)]
    pub kind: RelationshipKind,
}

impl TableDefinition {
    pub fn from_json(json: &str) -> Result<TableDefinition> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a JSON array of table definitions.
    pub fn list_from_json(json: &str) -> Result<Vec<TableDefinition>> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_metadata(&self) -> Result<SchemaMetadata> {
        let mut builder = SchemaMetadata::builder(&self.table).columns(
            self.columns
                .iter()
                .map(|(name, ty)| (name.as_str(), *ty)),
        );

        if let Some(entity) = &self.entity {
            builder = builder.entity(entity);
        }

        for column in &self.identifier {
            builder = builder.identifier(column);
        }

        for (discriminator, table) in &self.subclasses {
            builder = builder.subclass(discriminator, table);
        }

        if let Some(table) = &self.translation {
            builder = builder.translation(table);
        }

        if let Some(translation) = &self.translation_of {
            builder = builder.translation_of(&translation.translatable_id, &translation.language_id);
        }

        for relationship in &self.relationships {
            builder = builder.relationship(relationship.to_relationship()?);
        }

        builder.build()
    }
}

impl RelationshipDefinition {
    fn to_relationship(&self) -> Result<Relationship> {
        match self.kind {
            RelationshipKind::OneToMany => {
                if self.foreign_key.is_some() {
                    return Err(Error::mapping(format!(
                        "one-to-many relationship \"{}\" cannot declare a foreign key",
                        self.property
                    )));
                }
                Relationship::one_to_many(&self.target, &self.property, &self.related_id)
                    .with_join_type(self.join)
            }
            RelationshipKind::ManyToOne => {
                let Some(foreign_key) = &self.foreign_key else {
                    return Err(Error::mapping(format!(
                        "relationship \"{}\" requires a foreign key column",
                        self.property
                    )));
                };
                Relationship::new(&self.target, &self.property, foreign_key, &self.related_id)
                    .with_join_type(self.join)
            }
        }
    }
}

impl SchemaProvider for TableDefinition {
    fn metadata(&self) -> Result<SchemaMetadata> {
        self.to_metadata()
    }
}
