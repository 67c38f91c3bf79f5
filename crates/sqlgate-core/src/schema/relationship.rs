use crate::{Error, Result};

use serde::Deserialize;

/// How a relationship traversal is realized in SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    /// `LEFT JOIN` the target table into the outer query.
    #[default]
    Joined,

    /// Correlate through `fk IN (SELECT ...)`.
    SubSelect,
}

impl JoinType {
    pub const ALL: [JoinType; 2] = [JoinType::Joined, JoinType::SubSelect];

    pub fn index(self) -> usize {
        match self {
            JoinType::Joined => 0,
            JoinType::SubSelect => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    /// The owning table holds a foreign key pointing at the target.
    #[default]
    ManyToOne,

    /// The target table points back at the owning table; there is no
    /// foreign key column on the owning side.
    OneToMany,
}

/// A navigable link from one mapped table to another entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    target: String,
    foreign_property: String,
    foreign_key_column: String,
    related_id_column: String,
    join_type: JoinType,
    kind: RelationshipKind,
}

impl Relationship {
    /// A relationship whose foreign key lives on the owning table.
    pub fn new(
        target: impl Into<String>,
        foreign_property: impl Into<String>,
        foreign_key_column: impl Into<String>,
        related_id_column: impl Into<String>,
    ) -> Relationship {
        Relationship {
            target: target.into(),
            foreign_property: foreign_property.into(),
            foreign_key_column: foreign_key_column.into(),
            related_id_column: related_id_column.into(),
            join_type: JoinType::Joined,
            kind: RelationshipKind::ManyToOne,
        }
    }

    /// A relationship to rows of `target` whose `related_id_column` points
    /// back at the owning row. Always joined.
    pub fn one_to_many(
        target: impl Into<String>,
        foreign_property: impl Into<String>,
        related_id_column: impl Into<String>,
    ) -> Relationship {
        Relationship {
            target: target.into(),
            foreign_property: foreign_property.into(),
            foreign_key_column: String::new(),
            related_id_column: related_id_column.into(),
            join_type: JoinType::Joined,
            kind: RelationshipKind::OneToMany,
        }
    }

    pub fn with_join_type(mut self, join_type: JoinType) -> Result<Relationship> {
        if self.kind == RelationshipKind::OneToMany && join_type != JoinType::Joined {
            return Err(Error::mapping(format!(
                "join type of one-to-many relationship \"{}\" cannot be changed",
                self.foreign_property
            )));
        }
        self.join_type = join_type;
        Ok(self)
    }

    /// Entity identifier of the related metadata.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn foreign_property(&self) -> &str {
        &self.foreign_property
    }

    /// Empty for one-to-many relationships.
    pub fn foreign_key_column(&self) -> &str {
        &self.foreign_key_column
    }

    pub fn related_id_column(&self) -> &str {
        &self.related_id_column
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }

    pub fn kind(&self) -> RelationshipKind {
        self.kind
    }

    pub fn is_one_to_many(&self) -> bool {
        self.kind == RelationshipKind::OneToMany
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_to_many_has_no_foreign_key() {
        let rel = Relationship::one_to_many("Comment", "comments", "post_id");
        assert_eq!("", rel.foreign_key_column());
        assert_eq!(JoinType::Joined, rel.join_type());
    }

    #[test]
    fn one_to_many_join_type_is_fixed() {
        let rel = Relationship::one_to_many("Comment", "comments", "post_id");
        assert!(rel.clone().with_join_type(JoinType::Joined).is_ok());

        let err = rel.with_join_type(JoinType::SubSelect).unwrap_err();
        assert!(err.is_mapping());
    }

    #[test]
    fn many_to_one_join_type_changes() {
        let rel = Relationship::new("Person", "author", "author_fk", "id")
            .with_join_type(JoinType::SubSelect)
            .unwrap();
        assert_eq!(JoinType::SubSelect, rel.join_type());
    }
}
