use super::OrderBy;
use crate::{engine, Db, Result};

use sqlgate_core::{
    schema::{MetadataRef, DISCRIMINATOR_SEPARATOR},
    stmt::{Delete, Expr, Insert, Parameter, Row, Select, Update, Value},
    Criteria, Error,
};

/// Reads and writes the rows of one mapped table.
///
/// Criteria are compiled against the table's metadata, so every column a
/// caller names is checked against the schema before any SQL is built.
#[derive(Debug, Clone)]
pub struct TableGateway {
    db: Db,
    table: String,
    alias: String,
}

impl TableGateway {
    pub(crate) fn new(db: Db, table: &str, alias: &str) -> Result<TableGateway> {
        db.registry().metadata_for_table(table)?;

        Ok(TableGateway {
            db,
            table: table.to_string(),
            alias: alias.to_string(),
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    pub fn metadata(&self) -> Result<MetadataRef<'_>> {
        self.db.registry().metadata_for_table(&self.table)
    }

    /// Base row query: every column of the table, plus every subclass column
    /// aliased `<discriminator>_<column>` when the table uses joined
    /// inheritance.
    pub fn select_query(&self) -> Result<Select> {
        let metadata = self.metadata()?;

        let mut query = Select::new();
        query
            .select(
                metadata
                    .columns()
                    .map(|column| Expr::column(&self.alias, column)),
            )
            .from(&self.table, &self.alias);

        self.apply_inheritance(&mut query, metadata, true)?;
        Ok(query)
    }

    /// Row query for `criteria`, along with its parameters in stored form.
    pub fn find_query(
        &self,
        criteria: &Criteria,
        order_by: OrderBy<'_>,
        limit: Option<u64>,
        offset: u64,
    ) -> Result<(Select, Vec<Parameter>)> {
        let mut query = self.select_query()?;

        self.apply_order_by(&mut query, order_by)?;
        let params = self.apply_criteria(&mut query, criteria)?;

        query.set_limit(limit);
        if offset > 0 {
            query.set_offset(Some(offset));
        }

        Ok((query, params))
    }

    /// `SELECT COUNT(DISTINCT alias.id)` query for `criteria`.
    pub fn count_query(&self, criteria: &Criteria) -> Result<(Select, Vec<Parameter>)> {
        let metadata = self.metadata()?;
        let identifier = metadata.metadata().identifier_column()?;

        let mut query = Select::new();
        query
            .add_select(
                Expr::count_distinct(Expr::column(&self.alias, identifier)),
                None,
            )
            .from(&self.table, &self.alias);

        self.apply_inheritance(&mut query, metadata, false)?;
        let params = self.apply_criteria(&mut query, criteria)?;

        Ok((query, params))
    }

    pub async fn find_by(
        &self,
        criteria: &Criteria,
        order_by: OrderBy<'_>,
        limit: Option<u64>,
        offset: u64,
    ) -> Result<Vec<Row>> {
        let (query, params) = self.find_query(criteria, order_by, limit, offset)?;
        let rows = self.db.exec(query, params).await?.rows.into_values()?;

        let metadata = self.metadata()?;
        rows.into_iter()
            .map(|row| to_app_values(metadata, row))
            .collect()
    }

    pub async fn find_one_by(&self, criteria: &Criteria, order_by: OrderBy<'_>) -> Result<Option<Row>> {
        let rows = self.find_by(criteria, order_by, Some(1), 0).await?;
        Ok(rows.into_iter().next())
    }

    pub async fn find_by_id(&self, id: impl Into<Value>) -> Result<Option<Row>> {
        let identifier = self.metadata()?.metadata().identifier_column()?.to_string();
        self.find_one_by(&Criteria::by(identifier, id), &[]).await
    }

    pub async fn find_all(&self, limit: Option<u64>, offset: u64) -> Result<Vec<Row>> {
        self.find_by(&Criteria::all(), &[], limit, offset).await
    }

    pub async fn count_by(&self, criteria: &Criteria) -> Result<u64> {
        let (query, params) = self.count_query(criteria)?;
        let rows = self.db.exec(query, params).await?.rows.into_values()?;

        let count = rows
            .first()
            .and_then(|row| row.values().next())
            .and_then(Value::as_i64)
            .ok_or_else(|| Error::internal("count query returned no count"))?;

        Ok(count.max(0) as u64)
    }

    pub async fn count_all(&self) -> Result<u64> {
        self.count_by(&Criteria::all()).await
    }

    /// Inserts one row and returns the identifier the database generated.
    pub async fn insert(&self, data: Row) -> Result<i64> {
        if !self.db.driver().capability().last_insert_id {
            return Err(Error::invalid_configuration(
                "driver cannot report generated row ids",
            ));
        }

        let metadata = self.metadata()?;
        let data = metadata.convert_to_database_values(data)?;

        let mut stmt = Insert::new(&self.table);
        let mut params = Vec::with_capacity(data.len());
        for (column, value) in data {
            let ty = metadata.column_type(&column)?;
            stmt.value(&column, Expr::placeholder(&column));
            params.push(Parameter::new(column, value, ty));
        }

        let response = self.db.exec(stmt, params).await?;
        response
            .last_insert_id
            .ok_or_else(|| Error::internal("driver did not report the inserted row id"))
    }

    /// Sets `data` on every row matching `criteria`, returning the number of
    /// rows changed.
    pub async fn update(&self, criteria: Row, data: Row) -> Result<u64> {
        let metadata = self.metadata()?;
        let data = metadata.convert_to_database_values(data)?;

        let mut stmt = Update::new(&self.table);
        let mut params = Vec::with_capacity(data.len() + criteria.len());
        for (column, value) in data {
            let ty = metadata.column_type(&column)?;
            stmt.set(&column, Expr::placeholder(&column));
            params.push(Parameter::new(column, value, ty));
        }

        for filter in self.scope(metadata, criteria, &mut params)? {
            stmt.and_where(filter);
        }

        self.db.exec(stmt, params).await?.rows.into_count()
    }

    /// Deletes every row matching `criteria`, returning the number of rows
    /// removed.
    pub async fn delete(&self, criteria: Row) -> Result<u64> {
        let metadata = self.metadata()?;

        let mut stmt = Delete::new(&self.table);
        let mut params = Vec::with_capacity(criteria.len());
        for filter in self.scope(metadata, criteria, &mut params)? {
            stmt.and_where(filter);
        }

        self.db.exec(stmt, params).await?.rows.into_count()
    }

    /// Filters of a write statement: one per criteria column, on unqualified
    /// column names. Placeholders are prefixed so they never collide with
    /// the assigned values.
    fn scope(
        &self,
        metadata: MetadataRef<'_>,
        criteria: Row,
        params: &mut Vec<Parameter>,
    ) -> Result<Vec<Expr>> {
        let criteria = metadata.convert_to_database_values(criteria)?;

        let mut filters = Vec::with_capacity(criteria.len());
        for (column, value) in criteria {
            let ty = metadata.column_type(&column)?;
            let name = format!("where_{column}");
            let lhs = Expr::bare_column(&column);

            let filter = if value.is_null() {
                Expr::is_null(lhs)
            } else if value.is_list() {
                Expr::in_list(lhs, Expr::placeholder(&name))
            } else {
                Expr::eq(lhs, Expr::placeholder(&name))
            };

            if !value.is_null() {
                params.push(Parameter::new(name, value, ty));
            }
            filters.push(filter);
        }

        Ok(filters)
    }

    /// Adds the subclass joins of joined inheritance, and with `project`, the
    /// subclass columns.
    fn apply_inheritance(
        &self,
        query: &mut Select,
        metadata: MetadataRef<'_>,
        project: bool,
    ) -> Result<()> {
        if !metadata.is_inheritance_type_joined() {
            return Ok(());
        }

        let identifier = metadata.metadata().identifier_column()?;
        for (discriminator, child) in metadata.subclasses() {
            let table = child.metadata().table_name();

            if project {
                for column in child.metadata().columns() {
                    query.add_select(
                        Expr::column(table, column),
                        Some(format!("{discriminator}{DISCRIMINATOR_SEPARATOR}{column}")),
                    );
                }
            }

            if query.is_table_joined(table) {
                continue;
            }

            query.left_join(
                table,
                table,
                Expr::eq(
                    Expr::column(&self.alias, identifier),
                    Expr::column(table, child.metadata().identifier_column()?),
                ),
            );
        }

        Ok(())
    }

    fn apply_order_by(&self, query: &mut Select, order_by: OrderBy<'_>) -> Result<()> {
        let metadata = self.metadata()?;

        for &(column, direction) in order_by {
            let expr = if metadata.has_column(column) {
                Expr::column(&self.alias, column)
            } else if let Some(child) = metadata.inheritance_metadata_with_column(column) {
                Expr::column(child.metadata().table_name(), column)
            } else {
                let mut available: Vec<&str> = metadata.columns().collect();
                for (_, child) in metadata.subclasses() {
                    available.extend(child.metadata().columns());
                }

                return Err(Error::invalid_statement(format!(
                    "\"{column}\" does not exist in \"{}\", or is not available for ordering. \
                     Available columns are: \"{}\"",
                    self.table,
                    available.join("\", \""),
                )));
            };

            query.add_order_by(expr, direction);
        }

        Ok(())
    }

    /// Compiles `criteria` onto `query` and returns the parameters in their
    /// stored form.
    fn apply_criteria(&self, query: &mut Select, criteria: &Criteria) -> Result<Vec<Parameter>> {
        let condition = engine::compile(self.db.registry(), &self.table, &self.alias, criteria)?;

        condition
            .apply(query)
            .into_iter()
            .map(|param| {
                let ty = param.ty();
                let name = param.name().to_string();
                Ok(Parameter::new(name, ty.to_database_value(param.into_value())?, ty))
            })
            .collect()
    }
}

/// Keeps the columns the table can resolve and converts them to application
/// values.
fn to_app_values(metadata: MetadataRef<'_>, row: Row) -> Result<Row> {
    let narrowed: Row = row
        .into_iter()
        .filter(|(column, _)| metadata.resolve_column(column).is_ok())
        .collect();

    metadata.convert_to_app_values(narrowed)
}
