mod builder;
pub use builder::Builder;

use crate::{
    gateway::{TableGateway, TranslationGateway},
    Result,
};

use sqlgate_core::{
    driver::{operation::QuerySql, Driver, Response},
    stmt::{Parameter, Statement},
    Registry,
};
use sqlgate_sql::{Bindings, Serializer};

use std::sync::Arc;

/// Handle to a schema registry and the driver statements run on.
///
/// Cloning is cheap; clones share the registry and the driver.
#[derive(Debug, Clone)]
pub struct Db {
    registry: Arc<Registry>,
    driver: Arc<dyn Driver>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.driver
    }

    /// Gateway over `table`, aliased by its own name.
    pub fn gateway(&self, table: &str) -> Result<TableGateway> {
        TableGateway::new(self.clone(), table, table)
    }

    pub fn gateway_with_alias(&self, table: &str, alias: &str) -> Result<TableGateway> {
        TableGateway::new(self.clone(), table, alias)
    }

    /// Gateway over the translation table `table`.
    pub fn translation_gateway(&self, table: &str) -> Result<TranslationGateway> {
        TranslationGateway::new(self.gateway(table)?)
    }

    /// Runs `stmt` with `params` bound. Parameter values must already be in
    /// their stored form.
    pub async fn exec(
        &self,
        stmt: impl Into<Statement>,
        params: Vec<Parameter>,
    ) -> Result<Response> {
        let stmt = stmt.into();

        if log::log_enabled!(log::Level::Debug) {
            match Serializer::named().serialize(&stmt, &mut Bindings::new(&params)) {
                Ok(sql) => log::debug!("exec: {sql}; params={}", params.len()),
                Err(err) => log::debug!("exec: <unrenderable statement: {err}>"),
            }
        }

        self.driver.exec(QuerySql::new(stmt, params).into()).await
    }
}
