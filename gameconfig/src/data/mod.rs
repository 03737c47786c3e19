//! Configuration document model and record instances.
//!
//! - [`document`] - Documents, packages and tables
//! - [`record`] - Live record instances decoded from table storage

/// Documents, packages and tables.
pub mod document;

/// Live record instances decoded from table storage.
pub mod record;

pub use document::{ConfigDocument, MapEntry, Package, Table, TableKind};
pub use record::{Record, RecordHandle};
