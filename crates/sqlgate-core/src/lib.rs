pub mod criteria;
pub use criteria::Criteria;

pub mod driver;
pub use driver::Driver;

mod error;
pub use error::Error;

pub mod schema;
pub use schema::{Registry, SchemaMetadata};

pub mod stmt;

/// A Result type alias that uses sqlgate's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
