use super::strategy::{strategy_for, Hop};

use sqlgate_core::{
    criteria::{
        Comparison, Composite, CompositeKind, Criteria, Criterion, Expression, Operator,
        RELATIONSHIP_DELIMITER,
    },
    schema::{
        ColumnOrigin, JoinType, MetadataRef, Registry, Relationship, Type, DISCRIMINATOR_SEPARATOR,
    },
    stmt::{BinaryOp, Expr, Parameter, Select, Value},
    Error, Result,
};

/// Alias of the translation table inside translation sub-selects.
pub const TRANSLATION_TABLE_ALIAS: &str = "translation";

const LIKE_ESCAPE: char = '\\';

/// Compiles criteria against one table into a SQL condition and the
/// parameters it binds.
///
/// Relationship joins are added to the query passed to each `walk_*` call;
/// sub-selects are built fresh and embedded into the returned condition.
/// Placeholders are named `<column>_<n>`, where `n` counts the parameters
/// bound so far, including those bound by the visitor this one is nested
/// in.
#[derive(Debug)]
pub struct ExpressionVisitor<'a> {
    registry: &'a Registry,
    metadata: MetadataRef<'a>,
    alias: String,

    /// Parameters bound before this visitor started.
    offset: usize,

    params: Vec<Parameter>,
}

/// A resolved relationship path segment.
struct Step<'a> {
    relationship: &'a Relationship,
    from: String,
    from_column: String,
    to: MetadataRef<'a>,
}

impl<'a> ExpressionVisitor<'a> {
    pub fn new(
        registry: &'a Registry,
        table: &str,
        alias: impl Into<String>,
    ) -> Result<ExpressionVisitor<'a>> {
        Ok(ExpressionVisitor::scoped(
            registry.metadata_for_table(table)?,
            alias.into(),
            0,
        ))
    }

    fn scoped(metadata: MetadataRef<'a>, alias: String, offset: usize) -> ExpressionVisitor<'a> {
        ExpressionVisitor {
            registry: metadata.registry(),
            metadata,
            alias,
            offset,
            params: vec![],
        }
    }

    pub fn metadata(&self) -> MetadataRef<'a> {
        self.metadata
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    pub fn into_parameters(self) -> Vec<Parameter> {
        self.params
    }

    /// Compiles either form of criteria. An empty field map compiles to no
    /// condition at all.
    pub fn walk(&mut self, query: &mut Select, criteria: &Criteria) -> Result<Option<Expr>> {
        let fields = match criteria {
            Criteria::Expression(expression) => {
                return self.walk_expression(query, expression).map(Some)
            }
            Criteria::Fields(fields) if fields.is_empty() => return Ok(None),
            Criteria::Fields(fields) => fields,
        };

        let mut operands = Vec::with_capacity(fields.len());
        for (column, criterion) in fields {
            let operand = match criterion {
                Criterion::Value(value) => self.walk_comparison(
                    query,
                    &Comparison {
                        field: column.clone(),
                        op: Operator::Eq,
                        value: value.clone(),
                    },
                )?,
                Criterion::Expression(expression) => self.walk_expression(query, expression)?,
            };
            operands.push(operand);
        }

        Ok(Some(Expr::and(operands)))
    }

    pub fn walk_expression(&mut self, query: &mut Select, expression: &Expression) -> Result<Expr> {
        match expression {
            Expression::Comparison(comparison) => self.walk_comparison(query, comparison),
            Expression::Composite(composite) => self.walk_composite(query, composite),
        }
    }

    pub fn walk_composite(&mut self, query: &mut Select, composite: &Composite) -> Result<Expr> {
        let arity = composite.expressions.len();
        match composite.kind {
            CompositeKind::And | CompositeKind::Or if arity == 0 => {
                return Err(Error::invalid_statement(format!(
                    "{} expression requires at least one operand",
                    composite.kind.name()
                )))
            }
            CompositeKind::Not if arity != 1 => {
                return Err(Error::invalid_statement(format!(
                    "NOT expression requires exactly one operand, got {arity}"
                )))
            }
            _ => {}
        }

        let mut operands = composite
            .expressions
            .iter()
            .map(|expression| self.walk_expression(query, expression))
            .collect::<Result<Vec<_>>>()?;

        Ok(match composite.kind {
            CompositeKind::And => Expr::And(operands),
            CompositeKind::Or => Expr::Or(operands),
            CompositeKind::Not => Expr::not(operands.remove(0)),
        })
    }

    pub fn walk_comparison(&mut self, query: &mut Select, comparison: &Comparison) -> Result<Expr> {
        if comparison.is_relationship_path() {
            return self.walk_relationship(query, comparison);
        }

        let column = comparison.field.as_str();
        let resolved = self.metadata.resolve_column(column)?;

        let lhs = match resolved.origin {
            ColumnOrigin::Direct => Expr::column(&self.alias, column),
            ColumnOrigin::Translation(_) => return self.walk_translation(comparison),
            ColumnOrigin::Inherited(id) => {
                let (discriminator, child) = self
                    .metadata
                    .subclasses()
                    .find(|(_, child)| child.id() == id)
                    .ok_or_else(|| {
                        Error::internal(format!("no subclass table declares \"{column}\""))
                    })?;

                let name = if child.has_column(column) {
                    column
                } else {
                    column
                        .strip_prefix(discriminator)
                        .and_then(|rest| rest.strip_prefix(DISCRIMINATOR_SEPARATOR))
                        .unwrap_or(column)
                };

                Expr::column(child.metadata().table_name(), name)
            }
        };

        self.compare(lhs, column, comparison.op, &comparison.value, resolved.ty)
    }

    /// `alias.id IN (SELECT translation.fk FROM tr translation
    /// WHERE translation.fk = alias.id AND <comparison>)`
    fn walk_translation(&mut self, comparison: &Comparison) -> Result<Expr> {
        let translation = self.metadata.translation()?;
        let translatable_id = translation.metadata().translatable_id_column()?;
        let identifier = self.metadata.metadata().identifier_column()?;

        let mut subquery = Select::new();
        subquery
            .select([Expr::column(TRANSLATION_TABLE_ALIAS, translatable_id)])
            .from(translation.metadata().table_name(), TRANSLATION_TABLE_ALIAS)
            .and_where(Expr::eq(
                Expr::column(TRANSLATION_TABLE_ALIAS, translatable_id),
                Expr::column(&self.alias, identifier),
            ));

        let mut nested = ExpressionVisitor::scoped(
            translation,
            TRANSLATION_TABLE_ALIAS.to_string(),
            self.offset + self.params.len(),
        );
        let condition = nested.walk_comparison(&mut subquery, comparison)?;
        subquery.and_where(condition);
        self.params.extend(nested.into_parameters());

        Ok(Expr::in_subquery(Expr::column(&self.alias, identifier), subquery))
    }

    /// Walks `a.b.field`: one registry lookup per segment, a strategy join
    /// per hop, then the comparison against `field` on the last table.
    ///
    /// Hops are joined into the outer query until the first sub-select
    /// relationship. From there on every hop is applied to a sub-select
    /// correlated with the table that relationship starts from.
    fn walk_relationship(&mut self, query: &mut Select, comparison: &Comparison) -> Result<Expr> {
        let (properties, field) = comparison
            .field
            .rsplit_once(RELATIONSHIP_DELIMITER)
            .unwrap_or(("", comparison.field.as_str()));

        let mut steps: Vec<Step<'a>> = vec![];
        let mut current = self.metadata;
        let mut from = self.alias.clone();

        for property in properties.split(RELATIONSHIP_DELIMITER) {
            let relationship = current.metadata().relationship_by_foreign_property(property)?;
            let to = self.registry.metadata(relationship.target())?;

            let from_column = if relationship.is_one_to_many() {
                current.metadata().identifier_column()?
            } else {
                relationship.foreign_key_column()
            };

            log::trace!(
                "{}.{property} -> {}",
                current.metadata().table_name(),
                to.metadata().table_name()
            );

            steps.push(Step {
                relationship,
                from: std::mem::replace(&mut from, to.metadata().table_name().to_string()),
                from_column: from_column.to_string(),
                to,
            });
            current = to;
        }

        if !current.has_column(field) {
            let columns: Vec<&str> = current.columns().collect();
            let relationships: Vec<&str> = current
                .relationships()
                .iter()
                .map(Relationship::foreign_property)
                .collect();

            return Err(Error::runtime_mapping(format!(
                "\"{field}\" does not exist as available column on \"{}\" schema metadata. \
                 Available columns: \"{}\". Available relationships: \"{}\"",
                current.display_name(),
                columns.join("\", \""),
                relationships.join("\", \""),
            )));
        }

        let sub_start = steps
            .iter()
            .position(|step| step.relationship.join_type() == JoinType::SubSelect);
        let mut subquery = Select::new();

        for (index, step) in steps.iter().enumerate() {
            let (level, root) = match sub_start {
                Some(start) if index >= start => (&mut subquery, steps[start].from.as_str()),
                _ => (&mut *query, self.alias.as_str()),
            };

            strategy_for(step.relationship.join_type()).apply_join(level, &step.hop(root));
        }

        let ty = current.column_type(field)?;
        let predicate = self.compare(
            Expr::column(current.metadata().table_name(), field),
            field,
            comparison.op,
            &comparison.value,
            ty,
        )?;

        let (level, step) = match sub_start {
            Some(start) => (&mut subquery, &steps[start]),
            None => (&mut *query, &steps[steps.len() - 1]),
        };

        strategy_for(step.relationship.join_type()).compile(level, &step.hop(&step.from), predicate)
    }

    /// Renders `column OP :placeholder`, binding the value as a parameter
    /// unless the comparison degrades to a null test.
    fn compare(
        &mut self,
        column: Expr,
        field: &str,
        op: Operator,
        value: &Value,
        ty: Type,
    ) -> Result<Expr> {
        let name = format!("{field}_{}", self.offset + self.params.len());
        let placeholder = Expr::placeholder(&name);

        let expr = match op {
            Operator::Eq | Operator::Is if value.is_null() => return Ok(Expr::is_null(column)),
            Operator::Neq if value.is_null() => return Ok(Expr::is_not_null(column)),

            Operator::In => Expr::in_list(column, placeholder),
            Operator::Nin => Expr::not_in_list(column, placeholder),
            Operator::Eq | Operator::Is if value.is_list() => Expr::in_list(column, placeholder),
            Operator::Neq if value.is_list() => Expr::not_in_list(column, placeholder),

            Operator::Eq | Operator::Is => Expr::eq(column, placeholder),
            Operator::Neq => Expr::binary_op(column, BinaryOp::Ne, placeholder),
            Operator::Gt => Expr::binary_op(column, BinaryOp::Gt, placeholder),
            Operator::Gte => Expr::binary_op(column, BinaryOp::Ge, placeholder),
            Operator::Lt => Expr::binary_op(column, BinaryOp::Lt, placeholder),
            Operator::Lte => Expr::binary_op(column, BinaryOp::Le, placeholder),

            Operator::Contains | Operator::StartsWith | Operator::EndsWith => {
                let Some(text) = value.as_str() else {
                    return Err(Error::invalid_statement(format!(
                        "{op} requires a string value for \"{field}\", got {}",
                        value.kind_name()
                    )));
                };

                let escaped = escape_like(text);
                let pattern = match op {
                    Operator::Contains => format!("%{escaped}%"),
                    Operator::StartsWith => format!("{escaped}%"),
                    _ => format!("%{escaped}"),
                };

                // Patterns bind as text whatever the column type.
                let mut param = Parameter::new(name, value.clone(), Type::String);
                param.set_value(pattern);
                self.params.push(param);

                return Ok(Expr::like(column, placeholder));
            }
        };

        self.params.push(Parameter::new(name, value.clone(), ty));
        Ok(expr)
    }
}

impl Step<'_> {
    fn hop<'s>(&'s self, root: &'s str) -> Hop<'s> {
        Hop {
            relationship: self.relationship,
            root,
            from: &self.from,
            to: self.to.metadata().table_name(),
            from_column: &self.from_column,
        }
    }
}

/// Escapes LIKE metacharacters so `text` only matches itself.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }

    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(escape_like("al_ice"), "al\\_ice");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }
}
