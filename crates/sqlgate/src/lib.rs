pub mod db;
pub use db::Db;

pub mod engine;
pub use engine::{compile, Condition};

pub mod gateway;
pub use gateway::{TableGateway, TranslationGateway};

pub use sqlgate_core::{
    criteria::{self, Expression, Operator},
    schema::{self, Registry, SchemaMetadata, Type},
    stmt::{self, Direction, Row, Value},
    Criteria, Driver, Error, Result,
};

#[cfg(feature = "sqlite")]
pub use sqlgate_driver_sqlite::Sqlite;
