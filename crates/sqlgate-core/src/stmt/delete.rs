use super::Expr;

/// `DELETE FROM table WHERE filter`.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub table: String,
    pub filter: Vec<Expr>,
}

impl Delete {
    pub fn new(table: impl Into<String>) -> Delete {
        Delete {
            table: table.into(),
            filter: vec![],
        }
    }

    pub fn and_where(&mut self, expr: Expr) -> &mut Self {
        self.filter.push(expr);
        self
    }
}
