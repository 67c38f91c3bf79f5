use super::{CompositeKind, Operator};
use crate::stmt::Value;

/// A boolean criteria tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Comparison(Comparison),
    Composite(Composite),
}

/// `field OP value`. `field` may be a `.`-delimited relationship path.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub field: String,
    pub op: Operator,
    pub value: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Composite {
    pub kind: CompositeKind,
    pub expressions: Vec<Expression>,
}

/// Separator of relationship path segments in comparison fields.
pub const RELATIONSHIP_DELIMITER: char = '.';

impl Expression {
    pub fn comparison(field: impl Into<String>, op: Operator, value: impl Into<Value>) -> Expression {
        Expression::Comparison(Comparison {
            field: field.into(),
            op,
            value: value.into(),
        })
    }

    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Expression {
        Expression::comparison(field, Operator::Eq, value)
    }

    pub fn neq(field: impl Into<String>, value: impl Into<Value>) -> Expression {
        Expression::comparison(field, Operator::Neq, value)
    }

    pub fn null(field: impl Into<String>) -> Expression {
        Expression::comparison(field, Operator::Is, Value::Null)
    }

    pub fn in_list(field: impl Into<String>, values: impl Into<Value>) -> Expression {
        Expression::comparison(field, Operator::In, values)
    }

    pub fn not_in_list(field: impl Into<String>, values: impl Into<Value>) -> Expression {
        Expression::comparison(field, Operator::Nin, values)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<Value>) -> Expression {
        Expression::comparison(field, Operator::Gt, value)
    }

    pub fn gte(field: impl Into<String>, value: impl Into<Value>) -> Expression {
        Expression::comparison(field, Operator::Gte, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<Value>) -> Expression {
        Expression::comparison(field, Operator::Lt, value)
    }

    pub fn lte(field: impl Into<String>, value: impl Into<Value>) -> Expression {
        Expression::comparison(field, Operator::Lte, value)
    }

    pub fn contains(field: impl Into<String>, value: impl Into<Value>) -> Expression {
        Expression::comparison(field, Operator::Contains, value)
    }

    pub fn starts_with(field: impl Into<String>, value: impl Into<Value>) -> Expression {
        Expression::comparison(field, Operator::StartsWith, value)
    }

    pub fn ends_with(field: impl Into<String>, value: impl Into<Value>) -> Expression {
        Expression::comparison(field, Operator::EndsWith, value)
    }

    pub fn and(expressions: impl IntoIterator<Item = Expression>) -> Expression {
        Expression::composite(CompositeKind::And, expressions)
    }

    pub fn or(expressions: impl IntoIterator<Item = Expression>) -> Expression {
        Expression::composite(CompositeKind::Or, expressions)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expression: Expression) -> Expression {
        Expression::composite(CompositeKind::Not, [expression])
    }

    pub fn composite(
        kind: CompositeKind,
        expressions: impl IntoIterator<Item = Expression>,
    ) -> Expression {
        Expression::Composite(Composite {
            kind,
            expressions: expressions.into_iter().collect(),
        })
    }

    /// Number of comparisons in the tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Expression::Comparison(_) => 1,
            Expression::Composite(composite) => composite
                .expressions
                .iter()
                .map(Expression::leaf_count)
                .sum(),
        }
    }
}

impl Comparison {
    pub fn is_relationship_path(&self) -> bool {
        self.field.contains(RELATIONSHIP_DELIMITER)
    }
}

impl From<Comparison> for Expression {
    fn from(value: Comparison) -> Self {
        Expression::Comparison(value)
    }
}

impl From<Composite> for Expression {
    fn from(value: Composite) -> Self {
        Expression::Composite(value)
    }
}
