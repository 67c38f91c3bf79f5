use super::Value;
use crate::schema::{BindingType, Type};

/// A named bind value produced while compiling criteria.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    value: Value,
    ty: Type,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<Value>, ty: Type) -> Parameter {
        Parameter {
            name: name.into(),
            value: value.into(),
            ty,
        }
    }

    /// Placeholder name, without the leading `:`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replaces the bound value. Used to decorate LIKE patterns.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    pub fn ty(&self) -> Type {
        self.ty
    }

    /// Scalar binding type of the column, or its array variant when the
    /// value is a list.
    pub fn binding_type(&self) -> BindingType {
        self.ty.binding_type_for(&self.value)
    }

    pub fn into_value(self) -> Value {
        self.value
    }
}
