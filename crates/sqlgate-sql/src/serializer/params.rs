use super::{Comma, Formatter, ToSql};

use sqlgate_core::{
    schema::Type,
    stmt::{self, Parameter},
    Error, Result,
};

pub trait Params {
    /// Binds the named parameter and returns the positions it occupies.
    ///
    /// A scalar occupies one position. A list occupies one position per
    /// element, so an empty list occupies none.
    fn bind(&mut self, name: &str) -> Result<Vec<Placeholder>>;
}

/// 1-based position of a bound value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder(pub usize);

/// A bound value along with the stored type of the column it targets.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    pub value: stmt::Value,
    pub ty: Type,
}

/// Binds placeholders against compiled parameters, in the order the
/// serializer encounters them.
#[derive(Debug)]
pub struct Bindings<'a> {
    params: &'a [Parameter],
    values: Vec<TypedValue>,
}

impl<'a> Bindings<'a> {
    pub fn new(params: &'a [Parameter]) -> Bindings<'a> {
        Bindings {
            params,
            values: vec![],
        }
    }

    pub fn values(&self) -> &[TypedValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<TypedValue> {
        self.values
    }

    fn push(&mut self, value: stmt::Value, ty: Type) -> Placeholder {
        self.values.push(TypedValue { value, ty });
        Placeholder(self.values.len())
    }
}

impl Params for Bindings<'_> {
    fn bind(&mut self, name: &str) -> Result<Vec<Placeholder>> {
        let Some(param) = self.params.iter().find(|param| param.name() == name) else {
            return Err(Error::invalid_statement(format!(
                "no value is bound to placeholder \":{name}\""
            )));
        };

        let ty = param.ty();
        match param.value() {
            stmt::Value::List(items) => Ok(items
                .iter()
                .map(|item| self.push(item.clone(), ty))
                .collect()),
            value => Ok(vec![self.push(value.clone(), ty)]),
        }
    }
}

/// A bound placeholder as it appears in the output.
pub(super) struct Bound<'a> {
    pub(super) name: &'a str,
    pub(super) positions: Vec<Placeholder>,
}

impl ToSql for Bound<'_> {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        if f.serializer.is_named() {
            fmt!(f, ":" self.name);
        } else if self.positions.is_empty() {
            // `x IN ()` is not valid SQL; an empty list matches nothing.
            fmt!(f, "NULL");
        } else {
            fmt!(f, Comma(self.positions));
        }
    }
}

impl ToSql for Placeholder {
    fn to_sql<P: Params>(self, f: &mut Formatter<'_, P>) {
        use super::Flavor;

        match f.serializer.flavor {
            Flavor::Mysql => fmt!(f, "?"),
            Flavor::Postgresql => fmt!(f, "$" self.0),
            Flavor::Sqlite => fmt!(f, "?" self.0),
            Flavor::Named => {
                f.fail(Error::internal("positional placeholder in named serialization"))
            }
        }
    }
}
