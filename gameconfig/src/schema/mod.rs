//! Record schemas and their members.
//!
//! A schema is a JSON Schema object document. Each property whose type maps
//! onto one of the supported [`MemberKind`]s becomes a [`MemberDescriptor`];
//! other properties are ignored.
//!
//! - [`member`] - Member kinds, typed values and descriptors
//! - [`registry`] - Schema ids and the registry that resolves them

/// Member kinds, typed values and descriptors.
pub mod member;

/// Schema ids and the registry that resolves them.
pub mod registry;

pub use member::{MemberDescriptor, MemberKind, MemberValue};
pub use registry::{SchemaRef, SchemaRegistry};
