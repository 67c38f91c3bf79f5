mod table;
pub use table::TableGateway;

mod translation;
pub use translation::TranslationGateway;

use sqlgate_core::stmt::Direction;

/// Requested row order: column name and direction, applied in sequence.
pub type OrderBy<'a> = &'a [(&'a str, Direction)];
