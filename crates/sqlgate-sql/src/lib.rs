pub mod serializer;
pub use serializer::{Bindings, Params, Placeholder, Serializer, TypedValue};
