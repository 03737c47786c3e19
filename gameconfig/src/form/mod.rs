//! Input fields and dynamic record forms.
//!
//! - [`field`] - Typed input field with a single replaceable change callback
//! - [`record_form`] - Form built from a schema's members and bound to a record

/// Typed input field with a single replaceable change callback.
pub mod field;

/// Form built from a schema's members and bound to a record.
pub mod record_form;

pub use field::{ChangeCallback, Field};
pub use record_form::RecordForm;
