mod value;
pub(crate) use value::Value;

use rusqlite::Connection;
use sqlgate_core::{
    async_trait,
    driver::{operation::Operation, Capability, Driver, Response},
    stmt::{Row, Statement},
    Error, Result,
};
use sqlgate_sql::{Bindings, Serializer};
use std::{path::Path, sync::Mutex};
use url::Url;

/// SQLite driver over a single rusqlite connection.
#[derive(Debug)]
pub struct Sqlite {
    connection: Mutex<Connection>,
}

impl Sqlite {
    /// Opens the database named by a `sqlite:` URL. `sqlite::memory:` opens
    /// a fresh in-memory database.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(|err| {
            Error::invalid_configuration(format!("invalid sqlite url \"{url_str}\": {err}"))
        })?;

        if url.scheme() != "sqlite" {
            return Err(Error::invalid_configuration(format!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Self::in_memory()
        } else {
            Self::open(url.path())
        }
    }

    pub fn in_memory() -> Result<Self> {
        let connection = Connection::open_in_memory().map_err(Error::driver)?;
        Ok(Self::from_connection(connection))
    }

    /// Opens, or creates, the database file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path).map_err(Error::driver)?;
        Ok(Self::from_connection(connection))
    }

    fn from_connection(connection: Connection) -> Self {
        Self {
            connection: Mutex::new(connection),
        }
    }

    /// Runs semicolon-separated SQL without parameters, such as schema
    /// setup.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.lock()?.execute_batch(sql).map_err(Error::driver)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| Error::internal("sqlite connection lock poisoned"))
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let Operation::QuerySql(op) = op;

        let mut bindings = Bindings::new(&op.params);
        let sql = Serializer::sqlite().serialize(&op.stmt, &mut bindings)?;
        let params: Vec<Value> = bindings
            .into_values()
            .into_iter()
            .map(|typed| Value::from(typed.value))
            .collect();

        log::trace!("sqlite: {sql}");

        let connection = self.lock()?;
        let mut stmt = connection.prepare_cached(&sql).map_err(Error::driver)?;

        if op.stmt.is_query() {
            let columns: Vec<String> = stmt
                .column_names()
                .into_iter()
                .map(str::to_string)
                .collect();

            let mut rows = stmt
                .query(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::driver)?;

            let mut ret = vec![];
            while let Some(row) = rows.next().map_err(Error::driver)? {
                let mut record = Row::with_capacity(columns.len());
                for (index, column) in columns.iter().enumerate() {
                    record.insert(column.clone(), Value::from_sql(row, index)?.into_inner());
                }
                ret.push(record);
            }

            return Ok(Response::values(ret));
        }

        let count = stmt
            .execute(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver)?;
        let response = Response::count(count as u64);

        Ok(match op.stmt {
            Statement::Insert(_) => response.with_last_insert_id(connection.last_insert_rowid()),
            _ => response,
        })
    }
}
