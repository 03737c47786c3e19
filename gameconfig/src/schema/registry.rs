use std::{
    collections::BTreeMap,
    fmt, fs,
    path::Path,
};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use walkdir::WalkDir;

use crate::{
    error::{GameConfigError, Result},
    schema::{MemberDescriptor, MemberKind},
};

/// File suffix of schema documents picked up by [`SchemaRegistry::load_dir`].
pub const SCHEMA_FILE_SUFFIX: &str = ".schema.json";

/// Identifier of a registered record schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRef(String);

impl SchemaRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SchemaRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Maps schema ids to the member descriptors of their record type.
///
/// Descriptors are extracted once when a schema is registered; later lookups
/// only clone the cached list.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<SchemaRef, Vec<MemberDescriptor>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a Rust type under its schema name.
    pub fn register<T: JsonSchema>(&mut self) -> Result<SchemaRef> {
        let id = T::schema_name().into_owned();
        self.register_as::<T>(id)
    }

    /// Register a Rust type under an explicit id.
    pub fn register_as<T: JsonSchema>(&mut self, id: impl Into<String>) -> Result<SchemaRef> {
        let schema = schemars::schema_for!(T);
        let schema_json = serde_json::to_value(&schema)?;
        self.register_json(id, &schema_json)
    }

    /// Register a JSON Schema document.
    ///
    /// Registering an id again replaces the previous descriptors.
    pub fn register_json(&mut self, id: impl Into<String>, schema: &Value) -> Result<SchemaRef> {
        let id = SchemaRef::new(id);
        let members = members_of(&id, schema)?;
        debug!("schema `{id}` registered with {} members", members.len());
        self.schemas.insert(id.clone(), members);
        Ok(id)
    }

    /// Register every `<id>.schema.json` file directly inside `dir`.
    ///
    /// Returns the number of schemas loaded. A missing directory loads nothing.
    pub fn load_dir(&mut self, dir: impl AsRef<Path>) -> Result<usize> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            debug!("schema directory {} not found", dir.display());
            return Ok(0);
        }

        let mut loaded = 0;
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
            let entry = entry?;
            let file_name = entry.file_name().to_string_lossy();
            let Some(id) = file_name.strip_suffix(SCHEMA_FILE_SUFFIX) else {
                continue;
            };
            if id.is_empty() || !entry.file_type().is_file() {
                continue;
            }
            let id = id.to_string();

            let content = fs::read_to_string(entry.path())?;
            let schema_json: Value = serde_json::from_str(&content)?;
            self.register_json(id, &schema_json)?;
            loaded += 1;
        }
        info!("loaded {loaded} schemas from {}", dir.display());
        Ok(loaded)
    }

    /// Members of a registered schema, in declaration order.
    pub fn introspect(&self, schema: &SchemaRef) -> Result<Vec<MemberDescriptor>> {
        self.schemas
            .get(schema)
            .cloned()
            .ok_or_else(|| GameConfigError::SchemaUnresolvable {
                schema: schema.to_string(),
            })
    }

    pub fn contains(&self, schema: &SchemaRef) -> bool {
        self.schemas.contains_key(schema)
    }

    /// Registered schema ids, sorted.
    pub fn ids(&self) -> impl Iterator<Item = &SchemaRef> {
        self.schemas.keys()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn members_of(id: &SchemaRef, schema: &Value) -> Result<Vec<MemberDescriptor>> {
    let invalid = |reason: &str| GameConfigError::InvalidSchema {
        schema: id.to_string(),
        reason: reason.to_string(),
    };

    let root = schema.as_object().ok_or_else(|| invalid("root is not an object"))?;
    let is_object = match root.get("type") {
        Some(Value::String(ty)) => ty == "object",
        Some(_) => false,
        None => root.contains_key("properties"),
    };
    if !is_object {
        return Err(invalid("root is not an object schema"));
    }

    let Some(properties) = root.get("properties") else {
        return Ok(Vec::new());
    };
    let properties = properties
        .as_object()
        .ok_or_else(|| invalid("`properties` is not an object"))?;

    let mut members = Vec::with_capacity(properties.len());
    for (name, property) in properties {
        match MemberKind::from_schema(property) {
            Some(kind) => members.push(MemberDescriptor::new(name.clone(), kind)),
            None => debug!("schema `{id}`: member `{name}` has no supported kind, skipped"),
        }
    }
    Ok(members)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[allow(dead_code)]
    #[derive(JsonSchema)]
    struct Item {
        id: i32,
        name: String,
        score: f32,
        weight: f64,
        stamp: i64,
        enabled: bool,
        tags: Vec<String>,
        count: u32,
        note: Option<String>,
    }

    #[test]
    fn test_register_type_keeps_declaration_order() {
        let mut registry = SchemaRegistry::new();
        let id = registry.register::<Item>().unwrap();
        assert_eq!(id.as_str(), "Item");

        let members = registry.introspect(&id).unwrap();
        let expected = vec![
            MemberDescriptor::new("id", MemberKind::Int32),
            MemberDescriptor::new("name", MemberKind::String),
            MemberDescriptor::new("score", MemberKind::Float32),
            MemberDescriptor::new("weight", MemberKind::Float64),
            MemberDescriptor::new("stamp", MemberKind::Int64),
            MemberDescriptor::new("enabled", MemberKind::Bool),
        ];
        assert_eq!(members, expected);
    }

    #[test]
    fn test_introspect_is_idempotent() {
        let mut registry = SchemaRegistry::new();
        let id = registry.register_as::<Item>("items").unwrap();
        let first = registry.introspect(&id).unwrap();
        let second = registry.introspect(&id).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_schema() {
        let registry = SchemaRegistry::new();
        let err = registry.introspect(&SchemaRef::new("Missing")).unwrap_err();
        assert!(matches!(err, GameConfigError::SchemaUnresolvable { ref schema } if schema == "Missing"));
    }

    #[test]
    fn test_register_json_rejects_non_object() {
        let mut registry = SchemaRegistry::new();
        let err = registry
            .register_json("Scalar", &json!({"type": "integer"}))
            .unwrap_err();
        assert!(matches!(err, GameConfigError::InvalidSchema { .. }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("Monster.schema.json"),
            json!({
                "type": "object",
                "properties": {
                    "Hp": {"type": "integer", "format": "int32"},
                    "Name": {"type": "string"}
                }
            })
            .to_string(),
        )
        .unwrap();
        fs::write(dir.path().join("readme.txt"), "not a schema").unwrap();

        let mut registry = SchemaRegistry::new();
        assert_eq!(registry.load_dir(dir.path()).unwrap(), 1);

        let members = registry.introspect(&"Monster".into()).unwrap();
        assert_eq!(members[0], MemberDescriptor::new("Hp", MemberKind::Int32));
        assert_eq!(members[1], MemberDescriptor::new("Name", MemberKind::String));
    }
}
