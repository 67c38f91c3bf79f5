use super::Operation;

use crate::stmt;

#[derive(Debug, Clone)]
pub struct QuerySql {
    /// The SQL statement to execute
    pub stmt: stmt::Statement,

    /// Values for every placeholder the statement references, already in
    /// their stored form.
    pub params: Vec<stmt::Parameter>,
}

impl QuerySql {
    pub fn new(stmt: impl Into<stmt::Statement>, params: Vec<stmt::Parameter>) -> QuerySql {
        QuerySql {
            stmt: stmt.into(),
            params,
        }
    }
}

impl From<QuerySql> for Operation {
    fn from(value: QuerySql) -> Self {
        Self::QuerySql(value)
    }
}
