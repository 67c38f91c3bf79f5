mod capability;
pub use capability::Capability;

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::async_trait;

use std::fmt::Debug;

#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Describes what the database supports, which informs query assembly.
    fn capability(&self) -> &'static Capability;

    /// Execute a database operation
    async fn exec(&self, op: Operation) -> crate::Result<Response>;
}
