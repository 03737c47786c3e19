use std::{cell::RefCell, rc::Rc};

use serde_json::{Map, Value};

use crate::schema::{MemberDescriptor, MemberValue};

/// Shared handle to a live record.
///
/// Every form bound to the same row holds a clone of the same handle.
pub type RecordHandle = Rc<RefCell<Record>>;

/// A live record instance: an ordered JSON object.
///
/// Properties without a supported member kind are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Map<String, Value>,
}

/// Why a serialized record could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DecodeError {
    Malformed(String),
    NotAnObject(&'static str),
    Mismatch {
        member: String,
        expected: String,
        actual: String,
    },
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "malformed JSON: {e}"),
            Self::NotAnObject(found) => write!(f, "expected an object, found {found}"),
            Self::Mismatch {
                member,
                expected,
                actual,
            } => write!(f, "member `{member}` expects {expected}, found {actual}"),
        }
    }
}

impl Record {
    /// Default-constructed record for a schema.
    pub fn with_defaults(members: &[MemberDescriptor]) -> Self {
        let mut record = Self::default();
        for member in members {
            record.insert(&member.name, member.kind.default_value().to_json());
        }
        record
    }

    /// Decode a serialized record against a schema.
    ///
    /// `null` decodes to an empty slot. Missing members are filled with
    /// their defaults.
    pub(crate) fn decode(
        text: &str,
        members: &[MemberDescriptor],
    ) -> Result<Option<Self>, DecodeError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| DecodeError::Malformed(e.to_string()))?;
        let mut fields = match value {
            Value::Object(fields) => fields,
            Value::Null => return Ok(None),
            Value::Bool(_) => return Err(DecodeError::NotAnObject("a boolean")),
            Value::Number(_) => return Err(DecodeError::NotAnObject("a number")),
            Value::String(_) => return Err(DecodeError::NotAnObject("a string")),
            Value::Array(_) => return Err(DecodeError::NotAnObject("an array")),
        };

        for member in members {
            match fields.get(&member.name) {
                Some(value) => {
                    if MemberValue::from_json(member.kind, value).is_none() {
                        return Err(DecodeError::Mismatch {
                            member: member.name.clone(),
                            expected: member.kind.to_string(),
                            actual: value.to_string(),
                        });
                    }
                }
                None => {
                    fields.insert(member.name.clone(), member.kind.default_value().to_json());
                }
            }
        }
        Ok(Some(Self { fields }))
    }

    /// Serialize to compact JSON.
    pub fn to_json_string(&self) -> String {
        Value::Object(self.fields.clone()).to_string()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a raw property, keeping its position if it already exists.
    pub fn insert(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.fields.shift_remove(name)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Wrap into a shared handle.
    pub fn into_handle(self) -> RecordHandle {
        Rc::new(RefCell::new(self))
    }
}
