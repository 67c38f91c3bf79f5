use super::{metadata::join, ParameterType, SchemaMetadata, Type};
use crate::{stmt::Row, Error, Result};

use indexmap::IndexMap;
use std::{
    ops::Deref,
    sync::{Mutex, OnceLock},
};

/// Index of a table's metadata within a [`Registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(pub usize);

/// Supplies the metadata of one mapped table.
pub trait SchemaProvider: Send + Sync {
    fn metadata(&self) -> Result<SchemaMetadata>;
}

impl SchemaProvider for SchemaMetadata {
    fn metadata(&self) -> Result<SchemaMetadata> {
        Ok(self.clone())
    }
}

/// Where a resolvable column physically lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnOrigin {
    Direct,
    Translation(TableId),

    /// Column of a joined-inheritance subclass table, either by its bare
    /// name or its `<discriminator>_<column>` alias.
    Inherited(TableId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub ty: Type,
    pub origin: ColumnOrigin,
}

/// Separator between a discriminator and a subclass column name.
pub const DISCRIMINATOR_SEPARATOR: char = '_';

/// Collects schema providers before the registry is built.
#[derive(Default)]
pub struct RegistryBuilder {
    providers: Vec<Box<dyn SchemaProvider>>,
}

/// Immutable set of all registered table metadata.
#[derive(Debug)]
pub struct Registry {
    tables: Vec<Entry>,
    by_table: IndexMap<String, TableId>,
    by_entity: IndexMap<String, TableId>,
    by_translation_entity: IndexMap<String, TableId>,
}

#[derive(Debug)]
struct Entry {
    metadata: SchemaMetadata,
    parent: Option<TableId>,
    subclasses: IndexMap<String, TableId>,
    translation: Option<TableId>,

    /// Every column name resolvable through this table, computed once when
    /// the registry is built.
    resolved: IndexMap<String, ResolvedColumn>,
}

/// Metadata of one table, viewed through the registry that owns it.
#[derive(Debug, Clone, Copy)]
pub struct MetadataRef<'a> {
    registry: &'a Registry,
    id: TableId,
}

impl RegistryBuilder {
    pub fn new() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    pub fn register(&mut self, provider: impl SchemaProvider + 'static) -> &mut Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn with(mut self, provider: impl SchemaProvider + 'static) -> Self {
        self.register(provider);
        self
    }

    pub fn build(self) -> Result<Registry> {
        let mut registry = Registry {
            tables: Vec::with_capacity(self.providers.len()),
            by_table: IndexMap::new(),
            by_entity: IndexMap::new(),
            by_translation_entity: IndexMap::new(),
        };

        for provider in &self.providers {
            registry.insert(provider.metadata()?)?;
        }

        registry.link()?;
        registry.resolve_columns();

        log::debug!(
            "schema registry built; tables={:?}",
            registry.by_table.keys().collect::<Vec<_>>()
        );

        Ok(registry)
    }
}

impl core::fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegistryBuilder")
            .field("providers", &self.providers.len())
            .finish()
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    fn insert(&mut self, metadata: SchemaMetadata) -> Result<()> {
        let id = TableId(self.tables.len());
        let table = metadata.table_name();

        if self.by_table.contains_key(table) {
            return Err(Error::invalid_configuration(format!(
                "Unable to register table schema metadata for \"{table}\" table. \
                 Schema metadata is already registered."
            )));
        }

        if let Some(entity) = metadata.entity() {
            let (index, namespace) = if metadata.is_translation() {
                (&mut self.by_translation_entity, "translation schema metadata")
            } else {
                (&mut self.by_entity, "schema metadata")
            };

            if index.contains_key(entity) {
                return Err(Error::invalid_configuration(format!(
                    "Unable to register {namespace} for \"{entity}\" class. \
                     Schema metadata is already registered."
                )));
            }
            index.insert(entity.to_string(), id);
        }

        self.by_table.insert(table.to_string(), id);
        self.tables.push(Entry {
            metadata,
            parent: None,
            subclasses: IndexMap::new(),
            translation: None,
            resolved: IndexMap::new(),
        });
        Ok(())
    }

    fn link(&mut self) -> Result<()> {
        for index in 0..self.tables.len() {
            let id = TableId(index);
            let table = self.tables[index].metadata.table_name().to_string();

            let mut subclasses = IndexMap::new();
            for (discriminator, child_table) in self.tables[index].metadata.subclass_tables() {
                let child = self.lookup_link(&table, child_table, "subclass")?;
                subclasses.insert(discriminator.clone(), child);
            }

            for child in subclasses.values() {
                match self.tables[child.0].parent {
                    Some(parent) if parent != id => {
                        return Err(Error::invalid_configuration(format!(
                            "\"{}\" is registered as a subclass of both \"{}\" and \"{table}\"",
                            self.tables[child.0].metadata.table_name(),
                            self.tables[parent.0].metadata.table_name(),
                        )))
                    }
                    _ => self.tables[child.0].parent = Some(id),
                }
            }
            self.tables[index].subclasses = subclasses;

            let translation_table = self.tables[index]
                .metadata
                .translation_table()
                .map(str::to_string);

            if let Some(translation_table) = translation_table {
                let translation = self.lookup_link(&table, &translation_table, "translation")?;
                if !self.tables[translation.0].metadata.is_translation() {
                    return Err(Error::invalid_configuration(format!(
                        "\"{translation_table}\" is linked as translation of \"{table}\" \
                         but is not configured as a translation table"
                    )));
                }
                self.tables[index].translation = Some(translation);
            }
        }

        // Parent chains must terminate.
        for index in 0..self.tables.len() {
            let mut current = self.tables[index].parent;
            let mut steps = 0;
            while let Some(parent) = current {
                if parent.0 == index || steps > self.tables.len() {
                    return Err(Error::invalid_configuration(format!(
                        "inheritance cycle detected at \"{}\"",
                        self.tables[index].metadata.table_name()
                    )));
                }
                current = self.tables[parent.0].parent;
                steps += 1;
            }
        }

        Ok(())
    }

    fn lookup_link(&self, from: &str, to: &str, link: &str) -> Result<TableId> {
        self.by_table.get(to).copied().ok_or_else(|| {
            Error::invalid_configuration(format!(
                "{link} table \"{to}\" of \"{from}\" is not registered"
            ))
        })
    }

    fn resolve_columns(&mut self) {
        for index in 0..self.tables.len() {
            let entry = &self.tables[index];
            let mut resolved = IndexMap::new();

            for (column, ty) in entry.metadata.column_types() {
                resolved.insert(
                    column.clone(),
                    ResolvedColumn {
                        ty: *ty,
                        origin: ColumnOrigin::Direct,
                    },
                );
            }

            if let Some(translation) = entry.translation {
                for (column, ty) in self.tables[translation.0].metadata.column_types() {
                    resolved.entry(column.clone()).or_insert(ResolvedColumn {
                        ty: *ty,
                        origin: ColumnOrigin::Translation(translation),
                    });
                }
            }

            for (discriminator, child) in &entry.subclasses {
                let columns = self.tables[child.0].metadata.column_types();
                let origin = ColumnOrigin::Inherited(*child);

                for (column, ty) in columns {
                    resolved
                        .entry(column.clone())
                        .or_insert(ResolvedColumn { ty: *ty, origin });
                }
                for (column, ty) in columns {
                    resolved
                        .entry(format!("{discriminator}{DISCRIMINATOR_SEPARATOR}{column}"))
                        .or_insert(ResolvedColumn { ty: *ty, origin });
                }
            }

            self.tables[index].resolved = resolved;
        }
    }

    pub fn table(&self, id: TableId) -> MetadataRef<'_> {
        MetadataRef { registry: self, id }
    }

    pub fn metadata_for_table(&self, table: &str) -> Result<MetadataRef<'_>> {
        log::trace!("registry lookup; table={table}");

        match self.by_table.get(table) {
            Some(id) => Ok(self.table(*id)),
            None => Err(Error::invalid_configuration(format!(
                "Failed to find metadata for table \"{table}\". \
                 Did you forget to register a schema provider for it?"
            ))),
        }
    }

    /// Metadata of an entity, in the primary namespace.
    pub fn metadata(&self, entity: &str) -> Result<MetadataRef<'_>> {
        log::trace!("registry lookup; entity={entity}");

        match self.by_entity.get(entity) {
            Some(id) => Ok(self.table(*id)),
            None => Err(Error::invalid_configuration(format!(
                "Failed to find metadata for \"{entity}\" class. \
                 Did you forget to register a schema provider for it?"
            ))),
        }
    }

    pub fn translation_metadata(&self, entity: &str) -> Result<MetadataRef<'_>> {
        match self.by_translation_entity.get(entity) {
            Some(id) => Ok(self.table(*id)),
            None => Err(Error::invalid_configuration(format!(
                "Failed to find translation metadata for \"{entity}\" class. \
                 Did you forget to register a translation schema provider for it?"
            ))),
        }
    }

    pub fn available_metadata(&self) -> impl ExactSizeIterator<Item = MetadataRef<'_>> {
        (0..self.tables.len()).map(|index| self.table(TableId(index)))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl<'a> MetadataRef<'a> {
    pub fn id(&self) -> TableId {
        self.id
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn metadata(&self) -> &'a SchemaMetadata {
        &self.entry().metadata
    }

    fn entry(&self) -> &'a Entry {
        &self.registry.tables[self.id.0]
    }

    /// Resolves a column declared directly, on the translation table or on
    /// one of the inheritance subclasses.
    pub fn resolve_column(&self, column: &str) -> Result<ResolvedColumn> {
        if let Some(resolved) = self.entry().resolved.get(column) {
            return Ok(*resolved);
        }

        let mut available: Vec<String> = self.metadata().columns().map(str::to_string).collect();
        for (discriminator, child) in self.subclasses() {
            available.extend(child.columns().map(|column| {
                format!("{discriminator}{DISCRIMINATOR_SEPARATOR}{column}(inheritance)")
            }));
        }
        if let Some(translation) = self.translation_opt() {
            available.extend(translation.columns().map(|column| format!("{column}(translation)")));
        }

        Err(Error::runtime_mapping(format!(
            "Column \"{column}\" does not exist in \"{}\" table. Available columns: \"{}\"",
            self.table_name(),
            join(&available),
        )))
    }

    pub fn column_type(&self, column: &str) -> Result<Type> {
        self.resolve_column(column).map(|resolved| resolved.ty)
    }

    pub fn binding_type_for_column(&self, column: &str) -> Result<ParameterType> {
        self.column_type(column).map(Type::parameter_type)
    }

    pub fn binding_types_for_data(&self, data: &Row) -> Result<IndexMap<String, ParameterType>> {
        data.keys()
            .map(|column| Ok((column.clone(), self.binding_type_for_column(column)?)))
            .collect()
    }

    pub fn convert_to_database_values(&self, data: Row) -> Result<Row> {
        data.into_iter()
            .map(|(column, value)| {
                let value = self.column_type(&column)?.to_database_value(value)?;
                Ok((column, value))
            })
            .collect()
    }

    pub fn convert_to_app_values(&self, data: Row) -> Result<Row> {
        data.into_iter()
            .map(|(column, value)| {
                let value = self.column_type(&column)?.to_app_value(value)?;
                Ok((column, value))
            })
            .collect()
    }

    /// `true` when `column` is only reachable through the translation table.
    pub fn is_translated_column(&self, column: &str) -> bool {
        matches!(
            self.entry().resolved.get(column),
            Some(ResolvedColumn {
                origin: ColumnOrigin::Translation(_),
                ..
            })
        )
    }

    /// `true` when `column` is a bare column of a subclass table and not a
    /// column of this table.
    pub fn is_inherited_column(&self, column: &str) -> bool {
        !self.has_column(column) && self.inheritance_metadata_with_column(column).is_some()
    }

    /// First subclass, in discriminator order, declaring `column`.
    pub fn inheritance_metadata_with_column(&self, column: &str) -> Option<MetadataRef<'a>> {
        self.subclasses()
            .map(|(_, child)| child)
            .find(|child| child.has_column(column))
    }

    pub fn subclasses(&self) -> impl Iterator<Item = (&'a str, MetadataRef<'a>)> + 'a {
        let registry = self.registry;
        self.entry()
            .subclasses
            .iter()
            .map(move |(discriminator, id)| (discriminator.as_str(), registry.table(*id)))
    }

    pub fn subclass_by_discriminator(&self, discriminator: &str) -> Result<MetadataRef<'a>> {
        let subclasses = &self.entry().subclasses;

        if subclasses.is_empty() {
            return Err(Error::runtime_mapping(format!(
                "\"{discriminator}\" is not registered as a subclass for table \"{}\". \
                 There are no registered subclasses",
                self.table_name()
            )));
        }

        match subclasses.get(discriminator) {
            Some(id) => Ok(self.registry.table(*id)),
            None => Err(Error::runtime_mapping(format!(
                "\"{discriminator}\" is not registered as a subclass for table \"{}\". \
                 Available discriminators: \"{}\"",
                self.table_name(),
                join(subclasses.keys()),
            ))),
        }
    }

    pub fn parent(&self) -> Option<MetadataRef<'a>> {
        self.entry().parent.map(|id| self.registry.table(id))
    }

    pub fn has_translation(&self) -> bool {
        self.entry().translation.is_some()
    }

    fn translation_opt(&self) -> Option<MetadataRef<'a>> {
        self.entry().translation.map(|id| self.registry.table(id))
    }

    pub fn translation(&self) -> Result<MetadataRef<'a>> {
        self.translation_opt().ok_or_else(|| {
            Error::runtime_mapping(format!(
                "\"{}\" does not contain translation metadata. \
                 Ensure that a translation table has been configured.",
                self.table_name()
            ))
        })
    }
}

impl Deref for MetadataRef<'_> {
    type Target = SchemaMetadata;

    fn deref(&self) -> &SchemaMetadata {
        self.metadata()
    }
}

/// A registry built on first use.
///
/// Concurrent first lookups block until one of them finishes building;
/// the outcome, success or failure, is shared by every caller afterwards.
pub struct LazyRegistry {
    builder: Mutex<Option<RegistryBuilder>>,
    registry: OnceLock<Result<Registry>>,
}

impl LazyRegistry {
    pub fn new(builder: RegistryBuilder) -> LazyRegistry {
        LazyRegistry {
            builder: Mutex::new(Some(builder)),
            registry: OnceLock::new(),
        }
    }

    pub fn get(&self) -> Result<&Registry> {
        let registry = self.registry.get_or_init(|| {
            let builder = self
                .builder
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();

            match builder {
                Some(builder) => builder.build(),
                None => Err(Error::internal("registry builder already consumed")),
            }
        });

        registry.as_ref().map_err(Clone::clone)
    }

    pub fn is_initialized(&self) -> bool {
        self.registry.get().is_some()
    }

    pub fn metadata_for_table(&self, table: &str) -> Result<MetadataRef<'_>> {
        self.get()?.metadata_for_table(table)
    }

    pub fn metadata(&self, entity: &str) -> Result<MetadataRef<'_>> {
        self.get()?.metadata(entity)
    }

    pub fn translation_metadata(&self, entity: &str) -> Result<MetadataRef<'_>> {
        self.get()?.translation_metadata(entity)
    }
}

impl core::fmt::Debug for LazyRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LazyRegistry")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
