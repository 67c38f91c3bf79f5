mod query_sql;
pub use query_sql::QuerySql;

#[derive(Debug)]
pub enum Operation {
    /// Execute a SQL statement with its bound parameters
    QuerySql(QuerySql),
}

impl Operation {
    pub fn as_query_sql(&self) -> Option<&QuerySql> {
        match self {
            Operation::QuerySql(op) => Some(op),
        }
    }
}
