mod definition;
pub use definition::{RelationshipDefinition, TableDefinition, TranslationDefinition};

mod metadata;
pub use metadata::{Builder, InheritanceType, SchemaMetadata, TranslationColumns};

mod registry;
pub use registry::{
    ColumnOrigin, LazyRegistry, MetadataRef, Registry, RegistryBuilder, ResolvedColumn,
    SchemaProvider, TableId, DISCRIMINATOR_SEPARATOR,
};

mod relationship;
pub use relationship::{JoinType, Relationship, RelationshipKind};

mod ty;
pub use ty::{BindingType, ParameterType, Type};
