use crate::{Error, Result};

use std::{fmt, str::FromStr};

/// Comparison operator of an atomic criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Neq,
    In,
    Nin,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
    StartsWith,
    EndsWith,

    /// Same as [`Operator::Eq`]; reads better against `null`.
    Is,
}

impl Operator {
    pub fn name(self) -> &'static str {
        match self {
            Operator::Eq => "EQ",
            Operator::Neq => "NEQ",
            Operator::In => "IN",
            Operator::Nin => "NIN",
            Operator::Gt => "GT",
            Operator::Gte => "GTE",
            Operator::Lt => "LT",
            Operator::Lte => "LTE",
            Operator::Contains => "CONTAINS",
            Operator::StartsWith => "STARTS_WITH",
            Operator::EndsWith => "ENDS_WITH",
            Operator::Is => "IS",
        }
    }

    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            Operator::Contains | Operator::StartsWith | Operator::EndsWith
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operator {
    type Err = Error;

    /// Accepts both the operator names (`"NEQ"`) and their symbols (`"<>"`).
    fn from_str(s: &str) -> Result<Operator> {
        Ok(match s {
            "EQ" | "=" => Operator::Eq,
            "NEQ" | "<>" | "!=" => Operator::Neq,
            "IN" => Operator::In,
            "NIN" => Operator::Nin,
            "GT" | ">" => Operator::Gt,
            "GTE" | ">=" => Operator::Gte,
            "LT" | "<" => Operator::Lt,
            "LTE" | "<=" => Operator::Lte,
            "CONTAINS" => Operator::Contains,
            "STARTS_WITH" => Operator::StartsWith,
            "ENDS_WITH" => Operator::EndsWith,
            "IS" => Operator::Is,
            _ => return Err(Error::internal(format!("Unknown comparison operator: {s}"))),
        })
    }
}

/// Boolean combinator of a composite criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositeKind {
    And,
    Or,
    Not,
}

impl CompositeKind {
    pub fn name(self) -> &'static str {
        match self {
            CompositeKind::And => "AND",
            CompositeKind::Or => "OR",
            CompositeKind::Not => "NOT",
        }
    }
}

impl FromStr for CompositeKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<CompositeKind> {
        match s {
            "AND" => Ok(CompositeKind::And),
            "OR" => Ok(CompositeKind::Or),
            "NOT" => Ok(CompositeKind::Not),
            _ => Err(Error::internal(format!("Unknown composite {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_symbols_and_names() {
        assert_eq!(Operator::Neq, "<>".parse().unwrap());
        assert_eq!(Operator::Neq, "NEQ".parse().unwrap());
        assert_eq!(Operator::StartsWith, "STARTS_WITH".parse().unwrap());
        assert_eq!(CompositeKind::Not, "NOT".parse().unwrap());
    }

    #[test]
    fn unknown_operator_is_internal() {
        let err = "MEMBER_OF".parse::<Operator>().unwrap_err();
        assert!(err.is_internal());
        assert_eq!(
            "internal error: Unknown comparison operator: MEMBER_OF",
            err.to_string()
        );

        assert!("XOR".parse::<CompositeKind>().unwrap_err().is_internal());
    }
}
