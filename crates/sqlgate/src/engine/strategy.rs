use sqlgate_core::{
    schema::{JoinType, Relationship},
    stmt::{Expr, Select},
    Error, Result,
};

use std::mem;

/// One step of a relationship path, from the table holding the relationship
/// to the table it targets.
#[derive(Debug, Clone, Copy)]
pub struct Hop<'a> {
    pub relationship: &'a Relationship,

    /// Alias the current query level correlates from. For the outer query
    /// this is the root alias; inside a sub-select it is the table the
    /// sub-select started from.
    pub root: &'a str,

    pub from: &'a str,
    pub to: &'a str,

    /// Column of `from` holding the link: the foreign key for many-to-one
    /// relationships, the identifier for one-to-many ones.
    pub from_column: &'a str,
}

/// How a relationship traversal is realized in SQL.
pub trait RelationshipStrategy: Sync {
    /// Makes `hop.to` reachable from `query`.
    fn apply_join(&self, query: &mut Select, hop: &Hop<'_>);

    /// Turns the predicate on the terminal table into a condition on the
    /// query level that `hop` opened.
    fn compile(&self, query: &mut Select, hop: &Hop<'_>, predicate: Expr) -> Result<Expr>;
}

/// `LEFT JOIN`, shared by every criterion reaching the same table.
///
/// Joins are keyed by the target table name, so two joined relationships
/// pointing at the same table (say `editor` and `reviewer`, both to
/// `person`) share the first join and filter through its rows.
#[derive(Debug)]
pub struct Joined;

/// Correlated `IN (SELECT ...)`.
#[derive(Debug)]
pub struct SubSelect;

static STRATEGIES: [&dyn RelationshipStrategy; 2] = [&Joined, &SubSelect];

/// Strategy realizing relationships of the given join type.
pub fn strategy_for(join_type: JoinType) -> &'static dyn RelationshipStrategy {
    STRATEGIES[join_type.index()]
}

impl RelationshipStrategy for Joined {
    fn apply_join(&self, query: &mut Select, hop: &Hop<'_>) {
        if query.is_table_joined(hop.to) {
            log::trace!("{} already joined; skipping", hop.to);
            return;
        }

        log::trace!("LEFT JOIN {} from {}", hop.to, hop.from);
        query.left_join(
            hop.to,
            hop.to,
            Expr::eq(
                Expr::column(hop.from, hop.from_column),
                Expr::column(hop.to, hop.relationship.related_id_column()),
            ),
        );
    }

    fn compile(&self, _query: &mut Select, _hop: &Hop<'_>, predicate: Expr) -> Result<Expr> {
        Ok(predicate)
    }
}

impl RelationshipStrategy for SubSelect {
    fn apply_join(&self, query: &mut Select, hop: &Hop<'_>) {
        if !query.has_select() {
            log::trace!("starting sub-select on {}", hop.to);
            query
                .select([Expr::column(hop.to, hop.relationship.related_id_column())])
                .from(hop.to, hop.to);
        }

        if hop.from != hop.root && !query.is_table_joined(hop.to) {
            log::trace!("INNER JOIN {} from {}", hop.to, hop.from);
            query.inner_join(
                hop.to,
                hop.to,
                Expr::eq(
                    Expr::column(hop.from, hop.from_column),
                    Expr::column(hop.to, hop.relationship.related_id_column()),
                ),
            );
        }
    }

    fn compile(&self, query: &mut Select, hop: &Hop<'_>, predicate: Expr) -> Result<Expr> {
        if !query.has_select() {
            return Err(Error::runtime_mapping("Query is not initialized."));
        }

        query.and_where(predicate);

        Ok(Expr::in_subquery(
            Expr::column(hop.root, hop.relationship.foreign_key_column()),
            mem::take(query),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlgate_core::stmt::{JoinKind, Parameter};
    use sqlgate_core::schema::Type;
    use sqlgate_sql::{Bindings, Serializer};

    fn relationship(join_type: JoinType) -> Relationship {
        Relationship::new("Person", "author", "author_fk", "id")
            .with_join_type(join_type)
            .unwrap()
    }

    fn hop<'a>(relationship: &'a Relationship, from: &'a str) -> Hop<'a> {
        Hop {
            relationship,
            root: "root",
            from,
            to: "person",
            from_column: relationship.foreign_key_column(),
        }
    }

    #[test]
    fn table_is_indexed_by_join_type() {
        let rel = relationship(JoinType::Joined);
        let mut query = Select::new();
        strategy_for(JoinType::Joined).apply_join(&mut query, &hop(&rel, "root"));
        assert_eq!(query.joins.len(), 1);
        assert_eq!(query.joins[0].kind, JoinKind::Left);

        let rel = relationship(JoinType::SubSelect);
        let mut query = Select::new();
        strategy_for(JoinType::SubSelect).apply_join(&mut query, &hop(&rel, "root"));
        assert!(query.has_select());
        assert!(query.joins.is_empty());
    }

    #[test]
    fn joined_is_idempotent() {
        let rel = relationship(JoinType::Joined);
        let mut query = Select::new();
        Joined.apply_join(&mut query, &hop(&rel, "root"));
        Joined.apply_join(&mut query, &hop(&rel, "root"));
        assert_eq!(query.joins.len(), 1);
    }

    #[test]
    fn sub_select_joins_back_when_not_starting_at_root() {
        let rel = relationship(JoinType::SubSelect);
        let mut query = Select::new();
        SubSelect.apply_join(&mut query, &hop(&rel, "article"));

        let sql = Serializer::named()
            .serialize(&query.into(), &mut Bindings::new(&[]))
            .unwrap();
        assert_eq!(
            sql,
            "SELECT person.id FROM person INNER JOIN person ON article.author_fk = person.id;"
        );
    }

    #[test]
    fn sub_select_compile_requires_initialized_query() {
        let rel = relationship(JoinType::SubSelect);
        let predicate = Expr::eq(Expr::column("person", "country"), Expr::placeholder("country_0"));

        let err = SubSelect
            .compile(&mut Select::new(), &hop(&rel, "root"), predicate.clone())
            .unwrap_err();
        assert!(err.is_runtime_mapping());
        assert_eq!(err.to_string(), "mapping failed: Query is not initialized.");

        let mut query = Select::new();
        SubSelect.apply_join(&mut query, &hop(&rel, "root"));
        let expr = SubSelect
            .compile(&mut query, &hop(&rel, "root"), predicate)
            .unwrap();

        let params = [Parameter::new("country_0", "NO", Type::String)];
        let sql = Serializer::named()
            .serialize_expr(&expr, &mut Bindings::new(&params))
            .unwrap();
        assert_eq!(
            sql,
            "root.author_fk IN (SELECT person.id FROM person WHERE person.country = :country_0)"
        );
    }
}
