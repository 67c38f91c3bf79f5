#[macro_use]
mod fmt;
use fmt::ToSql;

mod delim;
use delim::{Comma, Operands};

mod flavor;
use flavor::Flavor;

mod params;
pub use params::{Bindings, Params, Placeholder, TypedValue};

// Fragment serializers
mod expr;
mod statement;

use sqlgate_core::{
    stmt::{Expr, Statement},
    Error, Result,
};

/// Serialize a statement to a SQL string
#[derive(Debug, Clone, Copy)]
pub struct Serializer {
    /// The database flavor handles the differences between SQL dialects and
    /// supported features.
    flavor: Flavor,
}

struct Formatter<'a, T> {
    /// Handle to the serializer
    serializer: &'a Serializer,

    /// Where to write the serialized SQL
    dst: &'a mut String,

    /// Where to bind parameters
    params: &'a mut T,

    /// First error hit while writing. Serialization keeps going so the
    /// fragment writers stay infallible; the error is reported at the end.
    error: Option<Error>,
}

impl Serializer {
    /// Serializes a full statement, terminated with `;`.
    pub fn serialize(&self, stmt: &Statement, params: &mut impl Params) -> Result<String> {
        let mut ret = self.write(params, |f| stmt.to_sql(f))?;
        ret.push(';');
        Ok(ret)
    }

    /// Serializes a bare expression, such as a compiled condition.
    pub fn serialize_expr(&self, expr: &Expr, params: &mut impl Params) -> Result<String> {
        self.write(params, |f| expr.to_sql(f))
    }

    fn write<P: Params>(
        &self,
        params: &mut P,
        body: impl FnOnce(&mut Formatter<'_, P>),
    ) -> Result<String> {
        let mut ret = String::new();

        let mut fmt = Formatter {
            serializer: self,
            dst: &mut ret,
            params,
            error: None,
        };

        body(&mut fmt);

        match fmt.error {
            Some(err) => Err(err),
            None => Ok(ret),
        }
    }
}

impl<T> Formatter<'_, T> {
    fn fail(&mut self, err: Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}
