use super::{Formatter, Params, ToSql};

use sqlgate_core::{stmt::Expr, Error};

/// Comma delimited
pub(super) struct Comma<L>(pub(super) L);

/// Boolean operands joined by a keyword. A single operand is written bare,
/// several are each wrapped in parentheses: `(a) AND (b)`.
pub(super) struct Operands<'a>(pub(super) &'a [Expr], pub(super) &'static str);

impl<L> ToSql for Comma<L>
where
    L: IntoIterator,
    L::Item: ToSql,
{
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let mut s = "";
        for i in self.0 {
            fmt!(f, s i);
            s = ", ";
        }
    }
}

impl ToSql for Operands<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        let Operands(operands, keyword) = self;

        match operands {
            [] => f.fail(Error::invalid_statement(format!(
                "cannot serialize an empty{keyword}expression"
            ))),
            [operand] => fmt!(f, operand),
            _ => {
                let mut s = "";
                for operand in operands {
                    fmt!(f, s "(" operand ")");
                    s = keyword;
                }
            }
        }
    }
}
