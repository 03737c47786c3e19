use std::fmt;

use serde_json::{Number, Value};

use crate::{
    data::Record,
    error::{GameConfigError, Result},
};

/// Primitive kinds a record member may have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// UTF-8 string.
    String,
    /// Single-precision float.
    Float32,
    /// Double-precision float.
    Float64,
    /// Boolean toggle.
    Bool,
}

impl MemberKind {
    /// Classify a JSON Schema property by its `type` and `format` keywords.
    ///
    /// Returns `None` for anything outside the six supported kinds, including
    /// nullable type arrays, references, enums and read-only or write-only members.
    pub fn from_schema(property: &Value) -> Option<Self> {
        let obj = property.as_object()?;
        let flagged = |key: &str| obj.get(key).and_then(Value::as_bool).unwrap_or(false);
        if flagged("readOnly") || flagged("writeOnly") {
            return None;
        }
        if obj.contains_key("enum") || obj.contains_key("const") {
            return None;
        }

        let ty = obj.get("type")?.as_str()?;
        let format = obj.get("format").and_then(Value::as_str);
        match (ty, format) {
            ("integer", Some("int32")) => Some(Self::Int32),
            ("integer", Some("int64") | None) => Some(Self::Int64),
            ("number", Some("float")) => Some(Self::Float32),
            ("number", Some("double") | None) => Some(Self::Float64),
            ("string", None) => Some(Self::String),
            ("boolean", _) => Some(Self::Bool),
            _ => None,
        }
    }

    /// Value a default-constructed record holds for this kind.
    pub fn default_value(self) -> MemberValue {
        match self {
            Self::Int32 => MemberValue::Int32(0),
            Self::Int64 => MemberValue::Int64(0),
            Self::String => MemberValue::String(String::new()),
            Self::Float32 => MemberValue::Float32(0.0),
            Self::Float64 => MemberValue::Float64(0.0),
            Self::Bool => MemberValue::Bool(false),
        }
    }

    /// Name of the input widget used for this kind.
    pub fn widget_name(self) -> &'static str {
        match self {
            Self::Int32 => "IntegerField",
            Self::Int64 => "LongField",
            Self::String => "TextField",
            Self::Float32 => "FloatField",
            Self::Float64 => "DoubleField",
            Self::Bool => "Toggle",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::String => "string",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Bool => "bool",
        };
        f.write_str(name)
    }
}

/// A typed member value, as shown in a field or stored in a record.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberValue {
    Int32(i32),
    Int64(i64),
    String(String),
    Float32(f32),
    Float64(f64),
    Bool(bool),
}

impl MemberValue {
    /// Kind of this value.
    pub fn kind(&self) -> MemberKind {
        match self {
            Self::Int32(_) => MemberKind::Int32,
            Self::Int64(_) => MemberKind::Int64,
            Self::String(_) => MemberKind::String,
            Self::Float32(_) => MemberKind::Float32,
            Self::Float64(_) => MemberKind::Float64,
            Self::Bool(_) => MemberKind::Bool,
        }
    }

    /// Read a JSON value as the given kind.
    ///
    /// Integers must fit the target width. Float kinds also accept integer
    /// literals but must stay finite at the target width. Returns `None` when
    /// the value does not fit.
    pub fn from_json(kind: MemberKind, value: &Value) -> Option<Self> {
        match kind {
            MemberKind::Int32 => value
                .as_i64()
                .and_then(|i| i32::try_from(i).ok())
                .map(Self::Int32),
            MemberKind::Int64 => value.as_i64().map(Self::Int64),
            MemberKind::String => value.as_str().map(|s| Self::String(s.to_string())),
            MemberKind::Float32 => value
                .as_f64()
                .map(|f| f as f32)
                .filter(|f| f.is_finite())
                .map(Self::Float32),
            MemberKind::Float64 => value.as_f64().filter(|f| f.is_finite()).map(Self::Float64),
            MemberKind::Bool => value.as_bool().map(Self::Bool),
        }
    }

    /// Whether this value can be stored in a record.
    ///
    /// JSON has no representation for infinities or NaN.
    pub fn is_storable(&self) -> bool {
        match self {
            Self::Float32(v) => v.is_finite(),
            Self::Float64(v) => v.is_finite(),
            _ => true,
        }
    }

    /// Convert into a JSON value.
    ///
    /// `f32` values go through their shortest decimal form so that `0.1f32`
    /// is written as `0.1`. Non-finite floats become `null`; descriptors
    /// refuse them before they reach a record.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Int32(v) => Value::from(*v),
            Self::Int64(v) => Value::from(*v),
            Self::String(v) => Value::String(v.clone()),
            Self::Float32(v) => {
                let shortest = v.to_string().parse::<f64>().unwrap_or(f64::from(*v));
                float_json(shortest)
            }
            Self::Float64(v) => float_json(*v),
            Self::Bool(v) => Value::Bool(*v),
        }
    }

    /// Parse user-entered text as the given kind.
    ///
    /// Float text must yield a finite value at the target width, so `inf`,
    /// `NaN` and `1e39` for a float32 are rejected.
    pub fn parse(kind: MemberKind, text: &str) -> Option<Self> {
        let trimmed = text.trim();
        let value = match kind {
            MemberKind::Int32 => trimmed.parse().ok().map(Self::Int32),
            MemberKind::Int64 => trimmed.parse().ok().map(Self::Int64),
            MemberKind::String => Some(Self::String(text.to_string())),
            MemberKind::Float32 => trimmed.parse().ok().map(Self::Float32),
            MemberKind::Float64 => trimmed.parse().ok().map(Self::Float64),
            MemberKind::Bool => trimmed.parse().ok().map(Self::Bool),
        };
        value.filter(Self::is_storable)
    }
}

fn float_json(v: f64) -> Value {
    Number::from_f64(v).map(Value::Number).unwrap_or(Value::Null)
}

impl fmt::Display for MemberValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v:?}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// One editable member of a schema: its name and primitive kind.
///
/// Descriptors are derived from a registered schema and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberDescriptor {
    /// Member name as it appears in serialized records.
    pub name: String,
    /// Declared primitive kind.
    pub kind: MemberKind,
}

impl MemberDescriptor {
    pub fn new(name: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Read this member from a record.
    ///
    /// A missing member reads as the kind's default value.
    pub fn read(&self, record: &Record) -> Result<MemberValue> {
        match record.get(&self.name) {
            None => Ok(self.kind.default_value()),
            Some(value) => MemberValue::from_json(self.kind, value).ok_or_else(|| {
                GameConfigError::MemberTypeMismatch {
                    member: self.name.clone(),
                    expected: self.kind,
                    actual: value.to_string(),
                }
            }),
        }
    }

    /// Write a value of this member's kind into a record.
    pub fn write(&self, record: &mut Record, value: &MemberValue) -> Result<()> {
        self.check(value)?;
        record.insert(&self.name, value.to_json());
        Ok(())
    }

    /// Parse entered text as this member's kind.
    pub fn parse_value(&self, text: &str) -> Result<MemberValue> {
        MemberValue::parse(self.kind, text).ok_or_else(|| GameConfigError::MemberTypeMismatch {
            member: self.name.clone(),
            expected: self.kind,
            actual: format!("{text:?}"),
        })
    }

    pub(crate) fn check(&self, value: &MemberValue) -> Result<()> {
        if value.kind() != self.kind {
            return Err(GameConfigError::MemberTypeMismatch {
                member: self.name.clone(),
                expected: self.kind,
                actual: value.kind().to_string(),
            });
        }
        if !value.is_storable() {
            return Err(GameConfigError::MemberTypeMismatch {
                member: self.name.clone(),
                expected: self.kind,
                actual: value.to_string(),
            });
        }
        Ok(())
    }
}
