//! Domain-model primitives: fragments, entries, attribute values and the
//! per-kind schemas used to validate them.
//!
//! Nothing here knows about graph stores or statement syntax; the module only
//! describes what a loaded domain model looks like and how it is read from
//! configuration files.

pub mod entities;
pub mod loader;
pub mod schema;
pub mod value_objects;

pub use entities::{Entry, ModelFragment, Section};
pub use loader::{check_root, FragmentLoader, LoadError};
pub use schema::{EntryDefect, EntryKind, EntrySchema, ValidatedEntry};
pub use value_objects::{AttributeValue, Attributes};
