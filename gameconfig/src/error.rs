//! Error types for configuration authoring.

use std::path::PathBuf;

use thiserror::Error;

use crate::schema::MemberKind;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, GameConfigError>;

/// Errors raised while introspecting schemas, binding records or persisting documents.
#[derive(Debug, Error)]
pub enum GameConfigError {
    /// The schema id is not known to the registry.
    #[error("schema `{schema}` cannot be resolved")]
    SchemaUnresolvable { schema: String },

    /// The table has no schema bound, so its content cannot be shown.
    #[error("table `{table}` has no schema bound")]
    NoSchema { table: String },

    /// A schema document could not be turned into member descriptors.
    #[error("invalid schema `{schema}`: {reason}")]
    InvalidSchema { schema: String, reason: String },

    /// A stored or entered value does not fit the member's declared kind.
    #[error("member `{member}` expects {expected}, found {actual}")]
    MemberTypeMismatch {
        member: String,
        expected: MemberKind,
        actual: String,
    },

    /// The form has no field for the named member.
    #[error("no editable member named `{member}`")]
    UnknownMember { member: String },

    /// An edit was attempted through a disabled field.
    #[error("field `{member}` is disabled")]
    FieldDisabled { member: String },

    /// A serialized record could not be decoded.
    #[error("table `{table}`, record {record}: {reason}")]
    ParseError {
        table: String,
        record: String,
        reason: String,
    },

    /// More than one document was found under the search root.
    #[error("found {} documents, using {}", .paths.len(), .chosen.display())]
    MultipleDocumentsFound { paths: Vec<PathBuf>, chosen: PathBuf },

    /// An index did not address an existing element.
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// The document file extension is not a supported format.
    #[error("unsupported document format: {0:?}")]
    UnsupportedFormat(String),

    /// An operation needs a selected package or table.
    #[error("no {what} selected")]
    NothingSelected { what: &'static str },

    /// The selected table's content could not be opened.
    #[error("content of table `{table}` is disabled: {reason}")]
    ContentDisabled { table: String, reason: String },

    /// A map table record needs a key.
    #[error("map table `{table}` needs a key for new records")]
    MissingKey { table: String },

    /// Exporting to runtime files is not available.
    #[error("export to `{target}` is not implemented")]
    ExportUnsupported { target: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    Walk(#[from] walkdir::Error),
}

impl GameConfigError {
    pub(crate) fn out_of_range(what: &'static str, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { what, index, len }
    }
}
