use super::{params::Bound, Operands, Params, ToSql};

use sqlgate_core::stmt;

impl ToSql for &stmt::Expr {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        use stmt::Expr::*;

        match self {
            And(operands) => fmt!(f, Operands(operands, " AND ")),
            Or(operands) => fmt!(f, Operands(operands, " OR ")),
            Not(expr) => {
                let expr = &**expr;
                fmt!(f, "NOT(" expr ")");
            }
            BinaryOp(expr) => {
                let rhs = &*expr.rhs;
                fmt!(f, &*expr.lhs " " expr.op.as_str() " " rhs);
            }
            Column(column) => {
                let name = column.name.as_str();
                match &column.table {
                    Some(table) => fmt!(f, table "." name),
                    None => fmt!(f, name),
                }
            }
            Placeholder(name) => match f.params.bind(name) {
                Ok(positions) => fmt!(f, Bound { name, positions }),
                Err(err) => f.fail(err),
            },
            InList(expr) => {
                let list = &*expr.list;
                let op = if expr.negate { " NOT IN (" } else { " IN (" };
                fmt!(f, &*expr.expr op list ")");
            }
            InSubquery(expr) => {
                let query = &*expr.query;
                fmt!(f, &*expr.expr " IN (" query ")");
            }
            IsNull(expr) => {
                if expr.negate {
                    fmt!(f, &*expr.expr " IS NOT NULL");
                } else {
                    fmt!(f, &*expr.expr " IS NULL");
                }
            }
            Like(expr) => {
                let pattern = &*expr.pattern;
                fmt!(f, &*expr.expr " LIKE " pattern);

                // SQLite has no default escape character for LIKE.
                if f.serializer.is_sqlite() {
                    fmt!(f, " ESCAPE '\\'");
                }
            }
            Count(count) => match (count.arg.as_deref(), count.distinct) {
                (None, _) => fmt!(f, "COUNT(*)"),
                (Some(arg), true) => fmt!(f, "COUNT(DISTINCT " arg ")"),
                (Some(arg), false) => fmt!(f, "COUNT(" arg ")"),
            },
        }
    }
}
