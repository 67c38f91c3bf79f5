mod delete;
pub use delete::Delete;

mod expr;
pub use expr::{
    BinaryOp, Expr, ExprBinaryOp, ExprColumn, ExprCount, ExprInList, ExprInSubquery, ExprIsNull,
    ExprLike,
};

mod insert;
pub use insert::Insert;

mod parameter;
pub use parameter::Parameter;

mod select;
pub use select::{Direction, Join, JoinKind, OrderBy, Select, SelectItem, TableRef};

mod statement;
pub use statement::Statement;

mod update;
pub use update::{Assignment, Update};

mod value;
pub use value::Value;

/// A fetched or to-be-written row: column name -> value, in column order.
pub type Row = indexmap::IndexMap<String, Value>;
