use super::Expr;

/// `UPDATE table SET column = value, ... WHERE filter`.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub table: String,
    pub assignments: Vec<Assignment>,

    /// Predicates AND-ed together. Empty updates every row.
    pub filter: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub column: String,
    pub value: Expr,
}

impl Update {
    pub fn new(table: impl Into<String>) -> Update {
        Update {
            table: table.into(),
            assignments: vec![],
            filter: vec![],
        }
    }

    pub fn set(&mut self, column: impl Into<String>, value: Expr) -> &mut Self {
        self.assignments.push(Assignment {
            column: column.into(),
            value,
        });
        self
    }

    pub fn and_where(&mut self, expr: Expr) -> &mut Self {
        self.filter.push(expr);
        self
    }
}
