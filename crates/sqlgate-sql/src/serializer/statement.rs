use super::{Comma, Operands, Params, ToSql};

use sqlgate_core::stmt;

impl ToSql for &stmt::Statement {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            stmt::Statement::Query(stmt) => stmt.to_sql(f),
            stmt::Statement::Insert(stmt) => stmt.to_sql(f),
            stmt::Statement::Update(stmt) => stmt.to_sql(f),
            stmt::Statement::Delete(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::Select {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "SELECT ");

        if self.columns.is_empty() {
            fmt!(f, "*");
        } else {
            fmt!(f, Comma(&self.columns));
        }

        if let Some(from) = &self.from {
            fmt!(f, " FROM " from);
        }

        for join in &self.joins {
            fmt!(f, join);
        }

        fmt!(f, Filter(&self.filter));

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY " Comma(&self.order_by));
        }

        match (self.limit, self.offset) {
            (Some(limit), _) => fmt!(f, " LIMIT " limit),
            // SQLite and MySQL only accept OFFSET after a LIMIT.
            (None, Some(_)) if f.serializer.is_sqlite() => fmt!(f, " LIMIT -1"),
            (None, Some(_)) if f.serializer.is_mysql() => fmt!(f, " LIMIT " u64::MAX),
            (None, _) => {}
        }

        if let Some(offset) = self.offset {
            fmt!(f, " OFFSET " offset);
        }
    }
}

impl ToSql for &stmt::SelectItem {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, &self.expr);

        if let Some(alias) = &self.alias {
            fmt!(f, " AS " alias);
        }
    }
}

impl ToSql for &stmt::TableRef {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let alias = &self.alias;
        fmt!(f, &self.table);

        if self.alias != self.table {
            fmt!(f, " " alias);
        }
    }
}

impl ToSql for &stmt::Join {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let kind = match self.kind {
            stmt::JoinKind::Inner => " INNER JOIN ",
            stmt::JoinKind::Left => " LEFT JOIN ",
        };

        let table = &self.table;
        let on = &self.on;
        fmt!(f, kind table " ON " on);
    }
}

impl ToSql for &stmt::OrderBy {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, &self.expr " " self.direction.as_str());
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let table = &self.table;
        let columns = Comma(&self.columns);
        let values = Comma(&self.values);
        fmt!(f, "INSERT INTO " table " (" columns ") VALUES (" values ")");
    }
}

impl ToSql for &stmt::Update {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let table = &self.table;
        let assignments = Comma(&self.assignments);
        fmt!(f, "UPDATE " table " SET " assignments Filter(&self.filter));
    }
}

impl ToSql for &stmt::Assignment {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let value = &self.value;
        fmt!(f, &self.column " = " value);
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let table = &self.table;
        fmt!(f, "DELETE FROM " table Filter(&self.filter));
    }
}

/// ` WHERE` clause over AND-ed predicates; nothing when there are none.
struct Filter<'a>(&'a [stmt::Expr]);

impl ToSql for Filter<'_> {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        if !self.0.is_empty() {
            fmt!(f, " WHERE " Operands(self.0, " AND "));
        }
    }
}
