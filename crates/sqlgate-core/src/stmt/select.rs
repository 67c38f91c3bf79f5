use super::Expr;

/// A `SELECT` query under construction.
///
/// Mirrors the operations a query builder offers: set the projection and
/// source, add joins, AND further predicates onto the filter, order and
/// paginate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Select {
    pub columns: Vec<SelectItem>,
    pub from: Option<TableRef>,
    pub joins: Vec<Join>,

    /// Predicates AND-ed together.
    pub filter: Vec<Expr>,

    pub order_by: Vec<OrderBy>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectItem {
    pub expr: Expr,
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRef {
    pub table: String,
    pub alias: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,
    pub table: TableRef,
    pub on: Expr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    pub expr: Expr,
    pub direction: Direction,
}

impl Select {
    pub fn new() -> Select {
        Select::default()
    }

    /// Replaces the projection.
    pub fn select(&mut self, columns: impl IntoIterator<Item = Expr>) -> &mut Self {
        self.columns = columns.into_iter().map(SelectItem::from).collect();
        self
    }

    pub fn add_select(&mut self, expr: Expr, alias: Option<String>) -> &mut Self {
        self.columns.push(SelectItem { expr, alias });
        self
    }

    pub fn has_select(&self) -> bool {
        !self.columns.is_empty()
    }

    pub fn from(&mut self, table: impl Into<String>, alias: impl Into<String>) -> &mut Self {
        self.from = Some(TableRef {
            table: table.into(),
            alias: alias.into(),
        });
        self
    }

    pub fn join(
        &mut self,
        kind: JoinKind,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: Expr,
    ) -> &mut Self {
        self.joins.push(Join {
            kind,
            table: TableRef {
                table: table.into(),
                alias: alias.into(),
            },
            on,
        });
        self
    }

    pub fn left_join(&mut self, table: impl Into<String>, alias: impl Into<String>, on: Expr) -> &mut Self {
        self.join(JoinKind::Left, table, alias, on)
    }

    pub fn inner_join(&mut self, table: impl Into<String>, alias: impl Into<String>, on: Expr) -> &mut Self {
        self.join(JoinKind::Inner, table, alias, on)
    }

    /// `true` if a join already exposes `alias`.
    pub fn is_table_joined(&self, alias: &str) -> bool {
        self.joins.iter().any(|join| join.table.alias == alias)
    }

    pub fn and_where(&mut self, expr: Expr) -> &mut Self {
        self.filter.push(expr);
        self
    }

    pub fn add_order_by(&mut self, expr: Expr, direction: Direction) -> &mut Self {
        self.order_by.push(OrderBy { expr, direction });
        self
    }

    pub fn set_limit(&mut self, limit: Option<u64>) -> &mut Self {
        self.limit = limit;
        self
    }

    pub fn set_offset(&mut self, offset: Option<u64>) -> &mut Self {
        self.offset = offset;
        self
    }

    pub(crate) fn collect_placeholders<'a>(&'a self, names: &mut Vec<&'a str>) {
        for item in &self.columns {
            item.expr.collect_placeholders(names);
        }
        for join in &self.joins {
            join.on.collect_placeholders(names);
        }
        for expr in &self.filter {
            expr.collect_placeholders(names);
        }
        for order_by in &self.order_by {
            order_by.expr.collect_placeholders(names);
        }
    }
}

impl From<Expr> for SelectItem {
    fn from(expr: Expr) -> Self {
        SelectItem { expr, alias: None }
    }
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Direction> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Direction::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Direction::Desc)
        } else {
            Err(crate::Error::invalid_statement(format!(
                "\"{s}\" is not a valid ordering direction. Expected \"ASC\" or \"DESC\""
            )))
        }
    }
}
