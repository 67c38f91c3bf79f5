use super::{Delete, Insert, Select, Update};

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Query(Select),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
}

impl Statement {
    pub fn is_query(&self) -> bool {
        matches!(self, Statement::Query(_))
    }

    /// Placeholder names referenced by the statement, in render order.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = vec![];
        match self {
            Statement::Query(stmt) => stmt.collect_placeholders(&mut names),
            Statement::Insert(stmt) => {
                for value in &stmt.values {
                    value.collect_placeholders(&mut names);
                }
            }
            Statement::Update(stmt) => {
                for assignment in &stmt.assignments {
                    assignment.value.collect_placeholders(&mut names);
                }
                for expr in &stmt.filter {
                    expr.collect_placeholders(&mut names);
                }
            }
            Statement::Delete(stmt) => {
                for expr in &stmt.filter {
                    expr.collect_placeholders(&mut names);
                }
            }
        }
        names
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Statement::Query(value)
    }
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Statement::Insert(value)
    }
}

impl From<Update> for Statement {
    fn from(value: Update) -> Self {
        Statement::Update(value)
    }
}

impl From<Delete> for Statement {
    fn from(value: Delete) -> Self {
        Statement::Delete(value)
    }
}
