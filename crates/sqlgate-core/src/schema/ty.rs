use crate::{stmt::Value, Error, Result};

use jiff::civil;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Stored type tag of a column.
///
/// Determines how parameters bound against the column are typed and how
/// values are converted between their application and stored forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    Boolean,
    SmallInt,
    Integer,
    BigInt,
    Decimal,
    Float,
    String,
    Text,
    #[serde(rename = "ascii_string")]
    Ascii,
    Guid,
    Binary,
    Blob,
    Date,
    DateTime,
    DateTimeTz,
    Time,
    Json,
}

/// Scalar binding type of a bound parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterType {
    Null,
    Integer,
    String,
    LargeObject,
    Boolean,
    Binary,
    Ascii,
}

/// Binding type of a parameter: a scalar, or the array variant of a scalar
/// when the bound value is a list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingType {
    Scalar(ParameterType),
    Array(ParameterType),
}

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const TIME_FORMAT: &str = "%H:%M:%S";

impl Type {
    pub const ALL: &'static [Type] = &[
        Type::Boolean,
        Type::SmallInt,
        Type::Integer,
        Type::BigInt,
        Type::Decimal,
        Type::Float,
        Type::String,
        Type::Text,
        Type::Ascii,
        Type::Guid,
        Type::Binary,
        Type::Blob,
        Type::Date,
        Type::DateTime,
        Type::DateTimeTz,
        Type::Time,
        Type::Json,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Type::Boolean => "boolean",
            Type::SmallInt => "smallint",
            Type::Integer => "integer",
            Type::BigInt => "bigint",
            Type::Decimal => "decimal",
            Type::Float => "float",
            Type::String => "string",
            Type::Text => "text",
            Type::Ascii => "ascii_string",
            Type::Guid => "guid",
            Type::Binary => "binary",
            Type::Blob => "blob",
            Type::Date => "date",
            Type::DateTime => "datetime",
            Type::DateTimeTz => "datetimetz",
            Type::Time => "time",
            Type::Json => "json",
        }
    }

    /// The scalar binding type used when a parameter of this type is bound.
    pub fn parameter_type(self) -> ParameterType {
        match self {
            Type::Boolean => ParameterType::Boolean,
            Type::SmallInt | Type::Integer | Type::BigInt => ParameterType::Integer,
            Type::Ascii => ParameterType::Ascii,
            Type::Binary => ParameterType::Binary,
            Type::Blob => ParameterType::LargeObject,
            _ => ParameterType::String,
        }
    }

    /// Binding type for `value`: the array variant when `value` is a list.
    pub fn binding_type_for(self, value: &Value) -> BindingType {
        let scalar = self.parameter_type();
        if value.is_list() {
            BindingType::Array(scalar)
        } else {
            BindingType::Scalar(scalar)
        }
    }

    /// Converts an application value into the form it is stored in.
    ///
    /// Lists are converted element by element; `Null` always stays `Null`.
    pub fn to_database_value(self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::List(items) => items
                .into_iter()
                .map(|item| self.to_database_value(item))
                .collect::<Result<_>>()
                .map(Value::List),
            value => self.scalar_to_database(value),
        }
    }

    /// Converts a stored value into its application form.
    pub fn to_app_value(self, value: Value) -> Result<Value> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::List(items) => items
                .into_iter()
                .map(|item| self.to_app_value(item))
                .collect::<Result<_>>()
                .map(Value::List),
            value => self.scalar_to_app(value),
        }
    }

    fn scalar_to_database(self, value: Value) -> Result<Value> {
        let converted = match (self, value) {
            (Type::Boolean, Value::Bool(v)) => Value::Bool(v),
            (Type::Boolean, Value::I64(v)) => Value::Bool(v != 0),
            (Type::SmallInt | Type::Integer | Type::BigInt, value) => Value::I64(to_i64(self, value)?),
            (Type::Decimal, Value::I64(v)) => Value::String(v.to_string()),
            (Type::Decimal, Value::F64(v)) => Value::String(v.to_string()),
            (Type::Decimal, Value::String(v)) => {
                if v.trim().parse::<f64>().is_err() {
                    return Err(Error::type_conversion(Value::String(v), self));
                }
                Value::String(v)
            }
            (Type::Float, value) => Value::F64(to_f64(self, value)?),
            (Type::String | Type::Text | Type::Ascii, Value::String(v)) => Value::String(v),
            (Type::String | Type::Text | Type::Ascii, Value::I64(v)) => Value::String(v.to_string()),
            (Type::String | Type::Text | Type::Ascii, Value::F64(v)) => Value::String(v.to_string()),
            (Type::String | Type::Text | Type::Ascii, Value::Uuid(v)) => Value::String(v.to_string()),
            (Type::Guid, Value::Uuid(v)) => Value::String(v.hyphenated().to_string()),
            (Type::Guid, Value::String(v)) => {
                let uuid = uuid::Uuid::parse_str(&v)?;
                Value::String(uuid.hyphenated().to_string())
            }
            (Type::Binary | Type::Blob, Value::Bytes(v)) => Value::Bytes(v),
            (Type::Binary | Type::Blob, Value::String(v)) => Value::Bytes(v.into_bytes()),
            (Type::Date, Value::Date(v)) => Value::String(v.to_string()),
            (Type::Date, Value::DateTime(v)) => Value::String(v.date().to_string()),
            (Type::Date, Value::String(v)) => Value::String(v.parse::<civil::Date>()?.to_string()),
            (Type::DateTime, Value::DateTime(v)) => {
                Value::String(v.strftime(DATETIME_FORMAT).to_string())
            }
            (Type::DateTime, Value::Timestamp(v)) => Value::String(
                v.to_zoned(jiff::tz::TimeZone::UTC)
                    .datetime()
                    .strftime(DATETIME_FORMAT)
                    .to_string(),
            ),
            (Type::DateTime, Value::String(v)) => {
                Value::String(parse_datetime(&v)?.strftime(DATETIME_FORMAT).to_string())
            }
            (Type::DateTimeTz, Value::Timestamp(v)) => Value::String(v.to_string()),
            (Type::DateTimeTz, Value::String(v)) => {
                Value::String(v.parse::<jiff::Timestamp>()?.to_string())
            }
            (Type::Time, Value::Time(v)) => Value::String(v.strftime(TIME_FORMAT).to_string()),
            (Type::Time, Value::String(v)) => {
                Value::String(parse_time(&v)?.strftime(TIME_FORMAT).to_string())
            }
            (Type::Json, value) => Value::String(serde_json::to_string(&value.to_json())?),
            (_, value) => return Err(Error::type_conversion(value, self)),
        };

        Ok(converted)
    }

    fn scalar_to_app(self, value: Value) -> Result<Value> {
        let converted = match (self, value) {
            (Type::Boolean, Value::Bool(v)) => Value::Bool(v),
            (Type::Boolean, Value::I64(v)) => Value::Bool(v != 0),
            (Type::Boolean, Value::String(v)) => match v.as_str() {
                "1" | "true" | "t" => Value::Bool(true),
                "0" | "false" | "f" => Value::Bool(false),
                _ => return Err(Error::type_conversion(Value::String(v), self)),
            },
            (Type::SmallInt | Type::Integer | Type::BigInt, value) => Value::I64(to_i64(self, value)?),
            (Type::Decimal, Value::String(v)) => Value::String(v),
            (Type::Decimal, Value::I64(v)) => Value::String(v.to_string()),
            (Type::Decimal, Value::F64(v)) => Value::String(v.to_string()),
            (Type::Float, value) => Value::F64(to_f64(self, value)?),
            (Type::String | Type::Text | Type::Ascii, Value::String(v)) => Value::String(v),
            (Type::String | Type::Text | Type::Ascii, Value::Bytes(v)) => {
                match String::from_utf8(v) {
                    Ok(v) => Value::String(v),
                    Err(err) => return Err(Error::type_conversion(Value::Bytes(err.into_bytes()), self)),
                }
            }
            (Type::String | Type::Text | Type::Ascii, Value::I64(v)) => Value::String(v.to_string()),
            (Type::Guid, Value::String(v)) => Value::Uuid(uuid::Uuid::parse_str(&v)?),
            (Type::Guid, Value::Uuid(v)) => Value::Uuid(v),
            (Type::Binary | Type::Blob, Value::Bytes(v)) => Value::Bytes(v),
            (Type::Binary | Type::Blob, Value::String(v)) => Value::Bytes(v.into_bytes()),
            (Type::Date, Value::String(v)) => Value::Date(v.parse()?),
            (Type::Date, Value::Date(v)) => Value::Date(v),
            (Type::DateTime, Value::String(v)) => Value::DateTime(parse_datetime(&v)?),
            (Type::DateTime, Value::DateTime(v)) => Value::DateTime(v),
            (Type::DateTimeTz, Value::String(v)) => Value::Timestamp(v.parse()?),
            (Type::DateTimeTz, Value::Timestamp(v)) => Value::Timestamp(v),
            (Type::Time, Value::String(v)) => Value::Time(parse_time(&v)?),
            (Type::Time, Value::Time(v)) => Value::Time(v),
            (Type::Json, Value::String(v)) => Value::Json(serde_json::from_str(&v)?),
            (Type::Json, Value::Json(v)) => Value::Json(v),
            (_, value) => return Err(Error::type_conversion(value, self)),
        };

        Ok(converted)
    }
}

fn to_i64(ty: Type, value: Value) -> Result<i64> {
    match value {
        Value::I64(v) => Ok(v),
        Value::Bool(v) => Ok(v as i64),
        Value::F64(v) if v.fract() == 0.0 => Ok(v as i64),
        Value::String(v) => match v.trim().parse() {
            Ok(v) => Ok(v),
            Err(_) => Err(Error::type_conversion(Value::String(v), ty)),
        },
        value => Err(Error::type_conversion(value, ty)),
    }
}

fn to_f64(ty: Type, value: Value) -> Result<f64> {
    match value {
        Value::F64(v) => Ok(v),
        Value::I64(v) => Ok(v as f64),
        Value::String(v) => match v.trim().parse() {
            Ok(v) => Ok(v),
            Err(_) => Err(Error::type_conversion(Value::String(v), ty)),
        },
        value => Err(Error::type_conversion(value, ty)),
    }
}

fn parse_datetime(s: &str) -> Result<civil::DateTime> {
    match civil::DateTime::strptime(DATETIME_FORMAT, s) {
        Ok(dt) => Ok(dt),
        Err(_) => Ok(s.parse()?),
    }
}

fn parse_time(s: &str) -> Result<civil::Time> {
    match civil::Time::strptime(TIME_FORMAT, s) {
        Ok(t) => Ok(t),
        Err(_) => Ok(s.parse()?),
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Type {
    type Err = Error;

    fn from_str(s: &str) -> Result<Type> {
        Type::ALL
            .iter()
            .copied()
            .find(|ty| ty.name() == s)
            .ok_or_else(|| {
                Error::mapping(format!(
                    "unknown column type \"{s}\". Known types: \"{}\"",
                    Type::ALL.iter().map(|ty| ty.name()).collect::<Vec<_>>().join("\", \"")
                ))
            })
    }
}

impl ParameterType {
    /// Numeric code of the binding type, compatible with the codes DBAL
    /// style database layers use.
    pub fn code(self) -> u16 {
        match self {
            ParameterType::Null => 0,
            ParameterType::Integer => 1,
            ParameterType::String => 2,
            ParameterType::LargeObject => 3,
            ParameterType::Boolean => 5,
            ParameterType::Binary => 16,
            ParameterType::Ascii => 17,
        }
    }
}

impl BindingType {
    /// Offset added to a scalar code to obtain its array variant.
    pub const ARRAY_OFFSET: u16 = 100;

    pub fn code(self) -> u16 {
        match self {
            BindingType::Scalar(ty) => ty.code(),
            BindingType::Array(ty) => ty.code() + Self::ARRAY_OFFSET,
        }
    }

    pub fn is_array(self) -> bool {
        matches!(self, BindingType::Array(_))
    }

    pub fn scalar(self) -> ParameterType {
        match self {
            BindingType::Scalar(ty) | BindingType::Array(ty) => ty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_type_names() {
        for ty in Type::ALL {
            assert_eq!(*ty, ty.name().parse::<Type>().unwrap());
        }
        assert!("varchar".parse::<Type>().unwrap_err().is_mapping());
    }

    #[test]
    fn array_binding_code() {
        let ty = Type::Integer;
        assert_eq!(1, ty.binding_type_for(&Value::I64(1)).code());
        assert_eq!(
            101,
            ty.binding_type_for(&Value::List(vec![Value::I64(1)])).code()
        );
    }

    #[test]
    fn datetime_round_trip_format() {
        let stored = Type::DateTime
            .to_database_value(Value::String("2024-06-01T12:30:00".into()))
            .unwrap();
        assert_eq!(stored, Value::String("2024-06-01 12:30:00".into()));

        let app = Type::DateTime.to_app_value(stored).unwrap();
        assert_eq!(
            app,
            Value::DateTime(civil::date(2024, 6, 1).at(12, 30, 0, 0))
        );
    }
}
