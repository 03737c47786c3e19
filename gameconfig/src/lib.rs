//! # gameconfig
//!
//! A schema-driven authoring model for hierarchical game configuration data.
//!
//! A [`ConfigDocument`] holds packages, each package holds named tables, and
//! every table stores either a list or a key-value map of serialized records.
//! The shape of a record comes from a JSON Schema registered in a
//! [`SchemaRegistry`], usually generated at compile time with `schemars`.
//!
//! ## Features
//!
//! - Schema registry fed by `schemars::JsonSchema` types or schema files
//! - Member classification into six primitive kinds (i32, i64, string, f32, f64, bool)
//! - Dynamic record forms with replaceable two-way bindings
//! - TOML and JSON document persistence with atomic saves
//! - Editor session state (selection, refresh, save) for front-ends
//!
//! ## Quick Start
//!
//! ```rust
//! use gameconfig::{SchemaRegistry, TableContent, data::Table};
//! use schemars::JsonSchema;
//!
//! #[derive(JsonSchema)]
//! #[allow(dead_code)]
//! struct Weapon {
//!     id: i32,
//!     name: String,
//!     score: f32,
//! }
//!
//! let mut registry = SchemaRegistry::new();
//! let schema = registry.register::<Weapon>().unwrap();
//!
//! let mut table = Table::list("Weapons");
//! table.schema = Some(schema);
//! table.list.push(r#"{"id":1,"name":"Sword","score":3.5}"#.to_string());
//!
//! let mut content = TableContent::open(&table, &registry).unwrap();
//! let mut form = content.form(0).unwrap();
//! form.edit_text("score", "4.0").unwrap();
//! content.commit(&mut table).unwrap();
//! assert_eq!(table.list[0], r#"{"id":1,"name":"Sword","score":4.0}"#);
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Document model and record instances
//! - [`schema`] - Member kinds, descriptors and the schema registry
//! - [`form`] - Input fields and dynamic record forms
//! - [`content`] - Table content controller
//! - [`store`] - Document persistence
//! - [`session`] - Editor session state

#[macro_use]
extern crate log;

/// Table content controller.
pub mod content;

/// Document model and record instances.
pub mod data;

/// Error types and result definitions.
pub mod error;

/// Input fields and dynamic record forms.
///
/// A form holds one typed field per schema member and keeps a bound record
/// instance in sync with edits made through those fields.
pub mod form;

/// Member kinds, descriptors and the schema registry.
pub mod schema;

/// Editor session state shared by front-ends.
pub mod session;

/// Document persistence.
pub mod store;

pub use content::TableContent;
pub use data::{ConfigDocument, Package, Record, RecordHandle, Table, TableKind};
pub use error::{GameConfigError, Result};
pub use form::{Field, RecordForm};
pub use schema::{MemberDescriptor, MemberKind, MemberValue, SchemaRef, SchemaRegistry};
pub use session::EditorSession;
pub use store::{DocumentStore, FileDocumentStore, MemoryDocumentStore};
