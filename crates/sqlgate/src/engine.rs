mod strategy;
pub use strategy::{strategy_for, Hop, Joined, RelationshipStrategy, SubSelect};

mod visitor;
pub use visitor::{ExpressionVisitor, TRANSLATION_TABLE_ALIAS};

use sqlgate_core::{
    schema::Registry,
    stmt::{Expr, Join, Parameter, Select},
    Criteria, Result,
};
use sqlgate_sql::{Bindings, Serializer};

/// Criteria compiled against one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// `None` when the criteria match every row.
    pub expr: Option<Expr>,

    pub params: Vec<Parameter>,

    /// Relationship joins the condition depends on.
    pub joins: Vec<Join>,
}

impl Condition {
    /// Renders the condition with `:name` placeholders. Empty when there is
    /// no condition.
    pub fn to_sql(&self) -> Result<String> {
        match &self.expr {
            Some(expr) => {
                Serializer::named().serialize_expr(expr, &mut Bindings::new(&self.params))
            }
            None => Ok(String::new()),
        }
    }

    /// Adds the joins and the condition to `query`, returning the bound
    /// parameters.
    pub fn apply(self, query: &mut Select) -> Vec<Parameter> {
        for join in self.joins {
            if !query.is_table_joined(&join.table.alias) {
                query.joins.push(join);
            }
        }

        if let Some(expr) = self.expr {
            query.and_where(expr);
        }

        self.params
    }
}

/// Compiles `criteria` against `table`, referenced in the outer query as
/// `alias`.
pub fn compile(
    registry: &Registry,
    table: &str,
    alias: &str,
    criteria: &Criteria,
) -> Result<Condition> {
    let mut visitor = ExpressionVisitor::new(registry, table, alias)?;
    let mut scratch = Select::new();

    let expr = visitor.walk(&mut scratch, criteria)?;
    let params = visitor.into_parameters();

    log::debug!(
        "compiled criteria on {table} with {} parameter(s) and {} join(s)",
        params.len(),
        scratch.joins.len()
    );

    Ok(Condition {
        expr,
        params,
        joins: scratch.joins,
    })
}
