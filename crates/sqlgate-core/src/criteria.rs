mod expression;
pub use expression::{Comparison, Composite, Expression, RELATIONSHIP_DELIMITER};

mod operator;
pub use operator::{CompositeKind, Operator};

use crate::stmt::Value;

use indexmap::IndexMap;

/// Selection criteria accepted by the compiler and gateways.
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria {
    /// Column -> value entries, implicitly AND-ed. A null value tests
    /// `IS NULL`, a list value tests `IN (...)`.
    Fields(IndexMap<String, Criterion>),

    Expression(Expression),
}

/// One entry of a [`Criteria::Fields`] map.
#[derive(Debug, Clone, PartialEq)]
pub enum Criterion {
    Value(Value),
    Expression(Expression),
}

impl Criteria {
    /// Criteria matching every row.
    pub fn all() -> Criteria {
        Criteria::Fields(IndexMap::new())
    }

    pub fn by(column: impl Into<String>, value: impl Into<Value>) -> Criteria {
        Criteria::all().and(column, value)
    }

    /// Adds a `column = value` entry. Turns an expression into the first
    /// entry of a fields map.
    pub fn and(self, column: impl Into<String>, value: impl Into<Value>) -> Criteria {
        let mut fields = self.into_fields();
        fields.insert(column.into(), Criterion::Value(value.into()));
        Criteria::Fields(fields)
    }

    /// Adds an expression entry under `key`. The key is only used to keep
    /// entries apart; it does not name a column.
    pub fn and_expression(self, key: impl Into<String>, expression: Expression) -> Criteria {
        let mut fields = self.into_fields();
        fields.insert(key.into(), Criterion::Expression(expression));
        Criteria::Fields(fields)
    }

    fn into_fields(self) -> IndexMap<String, Criterion> {
        match self {
            Criteria::Fields(fields) => fields,
            Criteria::Expression(expression) => {
                let mut fields = IndexMap::new();
                fields.insert("0".to_string(), Criterion::Expression(expression));
                fields
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Criteria::Fields(fields) if fields.is_empty())
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Criteria::all()
    }
}

impl From<Expression> for Criteria {
    fn from(value: Expression) -> Self {
        Criteria::Expression(value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Criteria {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Criteria::Fields(
            iter.into_iter()
                .map(|(column, value)| (column.into(), Criterion::Value(value.into())))
                .collect(),
        )
    }
}

impl From<crate::stmt::Row> for Criteria {
    fn from(row: crate::stmt::Row) -> Self {
        row.into_iter().collect()
    }
}
