use super::Db;
use crate::Result;

use sqlgate_core::{
    schema::{RegistryBuilder, SchemaProvider},
    Driver, Error,
};

use std::sync::Arc;

#[derive(Debug, Default)]
pub struct Builder {
    registry: RegistryBuilder,
}

impl Builder {
    /// Registers the metadata of one mapped table.
    pub fn register(&mut self, provider: impl SchemaProvider + 'static) -> &mut Self {
        self.registry.register(provider);
        self
    }

    /// Builds the registry and connects to the database at `url`.
    ///
    /// Supported schemes: `sqlite:` (`sqlite::memory:` for an in-memory
    /// database).
    pub fn connect(&mut self, url: &str) -> Result<Db> {
        let parsed = url::Url::parse(url).map_err(|err| {
            Error::invalid_configuration(format!("invalid database url \"{url}\": {err}"))
        })?;

        match parsed.scheme() {
            #[cfg(feature = "sqlite")]
            "sqlite" => self.build(sqlgate_driver_sqlite::Sqlite::new(url)?),
            scheme => Err(Error::invalid_configuration(format!(
                "unsupported database; scheme={scheme}; url={url}"
            ))),
        }
    }

    /// Builds the registry from every registered provider. Registration
    /// errors surface here.
    pub fn build(&mut self, driver: impl Driver) -> Result<Db> {
        if !driver.capability().sql {
            return Err(Error::invalid_configuration(format!(
                "driver does not execute SQL; driver={driver:?}"
            )));
        }

        let registry = std::mem::take(&mut self.registry).build()?;

        log::debug!(
            "registry built with {} table(s); driver={driver:?}",
            registry.len()
        );

        Ok(Db {
            registry: Arc::new(registry),
            driver: Arc::new(driver),
        })
    }
}
