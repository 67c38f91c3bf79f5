use super::TableGateway;
use crate::Result;

use sqlgate_core::{
    stmt::{Row, Value},
    Criteria,
};

/// Per-language rows of a translation table, addressed by the id of the row
/// they translate and a language id.
#[derive(Debug, Clone)]
pub struct TranslationGateway {
    table: TableGateway,
    translatable_id: String,
    language_id: String,
}

impl TranslationGateway {
    pub(crate) fn new(table: TableGateway) -> Result<TranslationGateway> {
        let metadata = table.metadata()?;
        let translatable_id = metadata.metadata().translatable_id_column()?.to_string();
        let language_id = metadata.metadata().language_id_column()?.to_string();

        Ok(TranslationGateway {
            table,
            translatable_id,
            language_id,
        })
    }

    /// The underlying table gateway, for queries beyond the translation
    /// operations.
    pub fn table(&self) -> &TableGateway {
        &self.table
    }

    pub fn translatable_id_column(&self) -> &str {
        &self.translatable_id
    }

    pub fn language_id_column(&self) -> &str {
        &self.language_id
    }

    pub async fn find_by_translatable_id(&self, id: i64) -> Result<Vec<Row>> {
        self.table
            .find_by(&Criteria::by(&self.translatable_id, id), &[], None, 0)
            .await
    }

    pub async fn find_by_translatable_ids(&self, ids: &[i64]) -> Result<Vec<Row>> {
        self.table
            .find_by(&Criteria::by(&self.translatable_id, ids.to_vec()), &[], None, 0)
            .await
    }

    pub async fn count_by_translatable_id(&self, id: i64) -> Result<u64> {
        self.table
            .count_by(&Criteria::by(&self.translatable_id, id))
            .await
    }

    /// Inserts a translation. `data` may carry its own translatable or
    /// language id; those take precedence over `id` and `language_id`.
    pub async fn insert(&self, id: i64, language_id: i64, mut data: Row) -> Result<i64> {
        data.entry(self.translatable_id.clone())
            .or_insert(Value::from(id));
        data.entry(self.language_id.clone())
            .or_insert(Value::from(language_id));

        self.table.insert(data).await
    }

    pub async fn update(&self, id: i64, language_id: i64, data: Row) -> Result<u64> {
        self.table.update(self.key(id, language_id), data).await
    }

    pub async fn exists(&self, id: i64, language_id: i64) -> Result<bool> {
        let row = self
            .table
            .find_one_by(&Criteria::from(self.key(id, language_id)), &[])
            .await?;

        Ok(row.is_some())
    }

    /// Updates the translation when it exists, inserts it otherwise.
    pub async fn save(&self, id: i64, language_id: i64, data: Row) -> Result<()> {
        if self.exists(id, language_id).await? {
            self.update(id, language_id, data).await?;
        } else {
            self.insert(id, language_id, data).await?;
        }

        Ok(())
    }

    pub async fn delete(&self, id: i64, language_id: i64) -> Result<u64> {
        self.table.delete(self.key(id, language_id)).await
    }

    /// Duplicates every translation of `from_id` onto `to_id`.
    pub async fn copy(&self, from_id: i64, to_id: i64) -> Result<()> {
        let identifiers = self.table.metadata()?.metadata().identifier_columns().to_vec();

        for mut translation in self.find_by_translatable_id(from_id).await? {
            for column in &identifiers {
                translation.shift_remove(column);
            }
            translation.insert(self.translatable_id.clone(), Value::from(to_id));

            self.table.insert(translation).await?;
        }

        Ok(())
    }

    fn key(&self, id: i64, language_id: i64) -> Row {
        let mut key = Row::new();
        key.insert(self.translatable_id.clone(), Value::from(id));
        key.insert(self.language_id.clone(), Value::from(language_id));
        key
    }
}
