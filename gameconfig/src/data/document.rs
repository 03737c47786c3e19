use serde::{Deserialize, Serialize};

use crate::{
    error::{GameConfigError, Result},
    schema::SchemaRef,
};

/// Name given to packages created without one.
pub const DEFAULT_PACKAGE_NAME: &str = "DefaultPackage";

/// Name given to tables created without one.
pub const DEFAULT_TABLE_NAME: &str = "DefaultTable";

/// Root of the configuration tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Output directory for exported data.
    #[serde(default)]
    pub target_path: String,
    /// Packages in display order.
    #[serde(default)]
    pub packages: Vec<Package>,
}

/// Named group of tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// How a table indexes its records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableKind {
    /// Records addressed by string keys.
    #[default]
    Map,
    /// Records addressed by position.
    List,
}

/// A key and its serialized record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: String,
    pub value: String,
}

/// One configuration dataset.
///
/// Both storages are kept regardless of `kind`; switching the kind only
/// changes which one is read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub kind: TableKind,
    /// Record schema; content cannot be shown without it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaRef>,
    /// Serialized records of a list table.
    #[serde(default)]
    pub list: Vec<String>,
    /// Serialized records of a map table. Keys are not checked for uniqueness.
    #[serde(default)]
    pub map: Vec<MapEntry>,
}

impl Table {
    pub fn new(name: impl Into<String>, kind: TableKind) -> Self {
        Self {
            name: name.into(),
            kind,
            schema: None,
            list: Vec::new(),
            map: Vec::new(),
        }
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, TableKind::List)
    }

    pub fn map(name: impl Into<String>) -> Self {
        Self::new(name, TableKind::Map)
    }

    /// Serialized record stored under `key`.
    ///
    /// With duplicate keys the last entry wins.
    pub fn map_get(&self, key: &str) -> Option<&str> {
        self.map
            .iter()
            .rev()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }

    /// Number of records of the active kind.
    pub fn len(&self) -> usize {
        match self.kind {
            TableKind::List => self.list.len(),
            TableKind::Map => self.map.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Package {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tables: Vec::new(),
        }
    }

    pub fn table(&self, index: usize) -> Result<&Table> {
        let len = self.tables.len();
        self.tables
            .get(index)
            .ok_or(GameConfigError::out_of_range("table", index, len))
    }

    pub fn table_mut(&mut self, index: usize) -> Result<&mut Table> {
        let len = self.tables.len();
        self.tables
            .get_mut(index)
            .ok_or(GameConfigError::out_of_range("table", index, len))
    }

    /// Append a table and return its index.
    pub fn add_table(&mut self, name: Option<&str>) -> usize {
        self.tables
            .push(Table::map(name.unwrap_or(DEFAULT_TABLE_NAME)));
        self.tables.len() - 1
    }

    pub fn rename_table(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.table_mut(index)?.name = name.into();
        Ok(())
    }

    pub fn remove_table(&mut self, index: usize) -> Result<Table> {
        self.table(index)?;
        Ok(self.tables.remove(index))
    }

    /// Change which storage the table reads. Stored records are not converted.
    pub fn set_table_kind(&mut self, index: usize, kind: TableKind) -> Result<()> {
        self.table_mut(index)?.kind = kind;
        Ok(())
    }

    pub fn set_table_schema(&mut self, index: usize, schema: Option<SchemaRef>) -> Result<()> {
        self.table_mut(index)?.schema = schema;
        Ok(())
    }
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(&self, index: usize) -> Result<&Package> {
        let len = self.packages.len();
        self.packages
            .get(index)
            .ok_or(GameConfigError::out_of_range("package", index, len))
    }

    pub fn package_mut(&mut self, index: usize) -> Result<&mut Package> {
        let len = self.packages.len();
        self.packages
            .get_mut(index)
            .ok_or(GameConfigError::out_of_range("package", index, len))
    }

    /// Append a package and return its index. Names are not checked for uniqueness.
    pub fn add_package(&mut self, name: Option<&str>) -> usize {
        self.packages
            .push(Package::new(name.unwrap_or(DEFAULT_PACKAGE_NAME)));
        self.packages.len() - 1
    }

    pub fn rename_package(&mut self, index: usize, name: impl Into<String>) -> Result<()> {
        self.package_mut(index)?.name = name.into();
        Ok(())
    }

    pub fn remove_package(&mut self, index: usize) -> Result<Package> {
        self.package(index)?;
        Ok(self.packages.remove(index))
    }

    pub fn table(&self, package: usize, table: usize) -> Result<&Table> {
        self.package(package)?.table(table)
    }

    pub fn table_mut(&mut self, package: usize, table: usize) -> Result<&mut Table> {
        self.package_mut(package)?.table_mut(table)
    }
}
