use super::Select;

/// SQL expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Conjunction. A single operand renders bare, several render as
    /// `(a) AND (b)`.
    And(Vec<Expr>),

    Or(Vec<Expr>),

    Not(Box<Expr>),

    BinaryOp(ExprBinaryOp),

    Column(ExprColumn),

    /// Named bind marker; rendered per dialect.
    Placeholder(String),

    InList(ExprInList),

    InSubquery(ExprInSubquery),

    IsNull(ExprIsNull),

    Like(ExprLike),

    Count(ExprCount),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprBinaryOp {
    pub lhs: Box<Expr>,
    pub op: BinaryOp,
    pub rhs: Box<Expr>,
}

/// Column reference, optionally qualified by a table name or alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprColumn {
    pub table: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInList {
    pub expr: Box<Expr>,

    /// Usually a placeholder bound to a list value.
    pub list: Box<Expr>,

    pub negate: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprInSubquery {
    pub expr: Box<Expr>,
    pub query: Box<Select>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprIsNull {
    pub expr: Box<Expr>,
    pub negate: bool,
}

/// `expr LIKE pattern`. Patterns escape metacharacters with `\`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprLike {
    pub expr: Box<Expr>,
    pub pattern: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprCount {
    pub distinct: bool,

    /// `None` counts rows (`COUNT(*)`).
    pub arg: Option<Box<Expr>>,
}

impl Expr {
    pub fn column(table: impl Into<String>, name: impl Into<String>) -> Expr {
        Expr::Column(ExprColumn {
            table: Some(table.into()),
            name: name.into(),
        })
    }

    pub fn bare_column(name: impl Into<String>) -> Expr {
        Expr::Column(ExprColumn {
            table: None,
            name: name.into(),
        })
    }

    pub fn placeholder(name: impl Into<String>) -> Expr {
        Expr::Placeholder(name.into())
    }

    pub fn binary_op(lhs: Expr, op: BinaryOp, rhs: Expr) -> Expr {
        Expr::BinaryOp(ExprBinaryOp {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
        })
    }

    pub fn eq(lhs: Expr, rhs: Expr) -> Expr {
        Expr::binary_op(lhs, BinaryOp::Eq, rhs)
    }

    pub fn in_list(expr: Expr, list: Expr) -> Expr {
        Expr::InList(ExprInList {
            expr: Box::new(expr),
            list: Box::new(list),
            negate: false,
        })
    }

    pub fn not_in_list(expr: Expr, list: Expr) -> Expr {
        Expr::InList(ExprInList {
            expr: Box::new(expr),
            list: Box::new(list),
            negate: true,
        })
    }

    pub fn in_subquery(expr: Expr, query: Select) -> Expr {
        Expr::InSubquery(ExprInSubquery {
            expr: Box::new(expr),
            query: Box::new(query),
        })
    }

    pub fn is_null(expr: Expr) -> Expr {
        Expr::IsNull(ExprIsNull {
            expr: Box::new(expr),
            negate: false,
        })
    }

    pub fn is_not_null(expr: Expr) -> Expr {
        Expr::IsNull(ExprIsNull {
            expr: Box::new(expr),
            negate: true,
        })
    }

    pub fn like(expr: Expr, pattern: Expr) -> Expr {
        Expr::Like(ExprLike {
            expr: Box::new(expr),
            pattern: Box::new(pattern),
        })
    }

    pub fn and(operands: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::And(operands.into_iter().collect())
    }

    pub fn or(operands: impl IntoIterator<Item = Expr>) -> Expr {
        Expr::Or(operands.into_iter().collect())
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(expr: Expr) -> Expr {
        Expr::Not(Box::new(expr))
    }

    pub fn count_distinct(expr: Expr) -> Expr {
        Expr::Count(ExprCount {
            distinct: true,
            arg: Some(Box::new(expr)),
        })
    }

    pub fn count_star() -> Expr {
        Expr::Count(ExprCount {
            distinct: false,
            arg: None,
        })
    }

    /// Placeholder names referenced by this expression, in render order.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names = vec![];
        self.collect_placeholders(&mut names);
        names
    }

    pub(crate) fn collect_placeholders<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Expr::And(operands) | Expr::Or(operands) => {
                for operand in operands {
                    operand.collect_placeholders(names);
                }
            }
            Expr::Not(expr) => expr.collect_placeholders(names),
            Expr::BinaryOp(expr) => {
                expr.lhs.collect_placeholders(names);
                expr.rhs.collect_placeholders(names);
            }
            Expr::Column(_) => {}
            Expr::Placeholder(name) => names.push(name),
            Expr::InList(expr) => {
                expr.expr.collect_placeholders(names);
                expr.list.collect_placeholders(names);
            }
            Expr::InSubquery(expr) => {
                expr.expr.collect_placeholders(names);
                expr.query.collect_placeholders(names);
            }
            Expr::IsNull(expr) => expr.expr.collect_placeholders(names),
            Expr::Like(expr) => {
                expr.expr.collect_placeholders(names);
                expr.pattern.collect_placeholders(names);
            }
            Expr::Count(expr) => {
                if let Some(arg) = &expr.arg {
                    arg.collect_placeholders(names);
                }
            }
        }
    }
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Ne => "<>",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
        }
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Expr::Column(value)
    }
}
