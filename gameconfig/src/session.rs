//! Editor session state.
//!
//! [`EditorSession`] is what a front-end drives: it owns the document handle,
//! the store it came from, the schema registry and the current package/table
//! selection. Selecting a table opens its content; when that fails the error
//! is kept and the content view stays disabled, the rest of the session keeps
//! working.

use crate::{
    content::TableContent,
    data::{ConfigDocument, Package, Table, TableKind},
    error::{GameConfigError, Result},
    form::RecordForm,
    schema::{SchemaRef, SchemaRegistry},
    store::DocumentStore,
};

/// Editing state over one document.
pub struct EditorSession {
    document: ConfigDocument,
    store: Box<dyn DocumentStore>,
    registry: SchemaRegistry,
    selected_package: Option<usize>,
    selected_table: Option<usize>,
    content: Option<TableContent>,
    content_error: Option<GameConfigError>,
}

impl EditorSession {
    /// Load (or create) the document from `store` and select its first package.
    pub fn open(mut store: Box<dyn DocumentStore>, registry: SchemaRegistry) -> Result<Self> {
        let document = store.load_or_create()?;
        info!(
            "editing {} ({} packages, {} schemas)",
            store.location(),
            document.packages.len(),
            registry.len()
        );
        let mut session = Self {
            document,
            store,
            registry,
            selected_package: None,
            selected_table: None,
            content: None,
            content_error: None,
        };
        session.reselect_defaults();
        Ok(session)
    }

    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn selected_package(&self) -> Option<usize> {
        self.selected_package
    }

    pub fn selected_table(&self) -> Option<usize> {
        self.selected_table
    }

    /// Open content of the selected table, if it could be opened.
    pub fn content(&self) -> Option<&TableContent> {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> Option<&mut TableContent> {
        self.content.as_mut()
    }

    /// Why the content view is disabled, when a table is selected but not shown.
    pub fn content_error(&self) -> Option<&GameConfigError> {
        self.content_error.as_ref()
    }

    /// Write pending edits back, re-check the selection and reopen the content.
    ///
    /// Picks up schemas registered since the table was opened.
    pub fn refresh(&mut self) -> Result<()> {
        self.commit_content()?;
        self.revalidate_selection();
        Ok(())
    }

    /// Reload the document from the store, discarding unsaved edits.
    ///
    /// When loading fails the current document and content are kept.
    pub fn reload(&mut self) -> Result<()> {
        let document = self.store.load_or_create()?;
        self.content = None;
        self.document = document;
        self.revalidate_selection();
        Ok(())
    }

    /// Replace the schema registry and reopen the content.
    pub fn set_registry(&mut self, registry: SchemaRegistry) -> Result<()> {
        self.commit_content()?;
        self.registry = registry;
        self.reload_content();
        Ok(())
    }

    pub fn select_package(&mut self, index: usize) -> Result<()> {
        self.commit_content()?;
        self.document.package(index)?;
        self.selected_package = Some(index);
        self.select_first_table();
        Ok(())
    }

    pub fn select_table(&mut self, index: usize) -> Result<()> {
        self.commit_content()?;
        self.current_package()?.table(index)?;
        self.selected_table = Some(index);
        self.reload_content();
        Ok(())
    }

    /// Add a package and select it.
    pub fn add_package(&mut self, name: Option<&str>) -> Result<usize> {
        let index = self.document.add_package(name);
        self.select_package(index)?;
        Ok(index)
    }

    pub fn rename_package(&mut self, index: usize, name: &str) -> Result<()> {
        self.document.rename_package(index, name)
    }

    /// Remove a package and clear the selection.
    pub fn remove_package(&mut self, index: usize) -> Result<Package> {
        self.commit_content()?;
        let removed = self.document.remove_package(index)?;
        self.clear_selection();
        Ok(removed)
    }

    /// Add a table to the selected package and select it.
    pub fn add_table(&mut self, name: Option<&str>) -> Result<usize> {
        let index = self.current_package_mut()?.add_table(name);
        self.select_table(index)?;
        Ok(index)
    }

    pub fn rename_table(&mut self, index: usize, name: &str) -> Result<()> {
        self.commit_content()?;
        self.current_package_mut()?.rename_table(index, name)?;
        if self.selected_table == Some(index) {
            self.reload_content();
        }
        Ok(())
    }

    /// Remove a table from the selected package and clear the table selection.
    pub fn remove_table(&mut self, index: usize) -> Result<Table> {
        self.commit_content()?;
        let removed = self.current_package_mut()?.remove_table(index)?;
        self.selected_table = None;
        self.reload_content();
        Ok(removed)
    }

    /// Switch the selected table's kind.
    ///
    /// Pending edits are written to the storage of the old kind first. Neither
    /// storage is converted.
    pub fn set_table_kind(&mut self, kind: TableKind) -> Result<()> {
        self.commit_content()?;
        self.current_table_mut()?.kind = kind;
        self.reload_content();
        Ok(())
    }

    /// Bind a schema to the selected table, or unbind it with `None`.
    pub fn set_table_schema(&mut self, schema: Option<SchemaRef>) -> Result<()> {
        self.commit_content()?;
        self.current_table_mut()?.schema = schema;
        self.reload_content();
        Ok(())
    }

    /// Append a default record to the open content.
    ///
    /// Map tables need a key; list tables ignore it.
    pub fn add_record(&mut self, key: Option<&str>) -> Result<usize> {
        let content = self.open_content_mut()?;
        let index = match (content.kind(), key) {
            (TableKind::List, _) => content.append_default(),
            (TableKind::Map, Some(key)) => content.append_entry(key),
            (TableKind::Map, None) => {
                return Err(GameConfigError::MissingKey {
                    table: content.table_name().to_string(),
                });
            }
        };
        Ok(index)
    }

    pub fn remove_record(&mut self, index: usize) -> Result<()> {
        self.open_content_mut()?.remove(index)?;
        Ok(())
    }

    /// Form bound to a record of the open content.
    pub fn form(&mut self, index: usize) -> Result<RecordForm> {
        self.open_content_mut()?.form(index)
    }

    pub fn set_target_path(&mut self, path: impl Into<String>) {
        self.document.target_path = path.into();
    }

    /// Write open content back into the document and save the whole document.
    pub fn save(&mut self) -> Result<()> {
        self.commit_content()?;
        self.store.save(&self.document)?;
        info!("GameConfig saved to {}", self.store.location());
        Ok(())
    }

    /// Export to runtime files. Not implemented.
    pub fn export(&self) -> Result<()> {
        let err = GameConfigError::ExportUnsupported {
            target: self.document.target_path.clone(),
        };
        warn!("{err}");
        Err(err)
    }

    fn commit_content(&mut self) -> Result<()> {
        let (Some(p), Some(t)) = (self.selected_package, self.selected_table) else {
            return Ok(());
        };
        if let Some(content) = &self.content {
            let table = self.document.table_mut(p, t)?;
            content.commit(table)?;
        }
        Ok(())
    }

    fn reload_content(&mut self) {
        self.content = None;
        self.content_error = None;
        let (Some(p), Some(t)) = (self.selected_package, self.selected_table) else {
            return;
        };
        let opened = self
            .document
            .table(p, t)
            .and_then(|table| TableContent::open(table, &self.registry));
        match opened {
            Ok(content) => self.content = Some(content),
            Err(e) => {
                warn!("table content disabled: {e}");
                self.content_error = Some(e);
            }
        }
    }

    fn revalidate_selection(&mut self) {
        let package = self
            .selected_package
            .filter(|&p| p < self.document.packages.len());
        let Some(p) = package else {
            self.reselect_defaults();
            return;
        };
        self.selected_package = Some(p);
        let tables = self.document.packages[p].tables.len();
        match self.selected_table.filter(|&t| t < tables) {
            Some(t) => {
                self.selected_table = Some(t);
                self.reload_content();
            }
            None => self.select_first_table(),
        }
    }

    fn reselect_defaults(&mut self) {
        self.selected_package = (!self.document.packages.is_empty()).then_some(0);
        self.select_first_table();
    }

    fn select_first_table(&mut self) {
        self.selected_table = self
            .selected_package
            .and_then(|p| self.document.packages.get(p))
            .filter(|package| !package.tables.is_empty())
            .map(|_| 0);
        self.reload_content();
    }

    fn clear_selection(&mut self) {
        self.selected_package = None;
        self.selected_table = None;
        self.content = None;
        self.content_error = None;
    }

    fn current_package(&self) -> Result<&Package> {
        let index = self
            .selected_package
            .ok_or(GameConfigError::NothingSelected { what: "package" })?;
        self.document.package(index)
    }

    fn current_package_mut(&mut self) -> Result<&mut Package> {
        let index = self
            .selected_package
            .ok_or(GameConfigError::NothingSelected { what: "package" })?;
        self.document.package_mut(index)
    }

    fn current_table_mut(&mut self) -> Result<&mut Table> {
        let index = self
            .selected_table
            .ok_or(GameConfigError::NothingSelected { what: "table" })?;
        self.current_package_mut()?.table_mut(index)
    }

    fn open_content_mut(&mut self) -> Result<&mut TableContent> {
        if let Some(e) = &self.content_error {
            let table = self
                .selected_package
                .zip(self.selected_table)
                .and_then(|(p, t)| self.document.table(p, t).ok())
                .map(|table| table.name.clone())
                .unwrap_or_default();
            return Err(GameConfigError::ContentDisabled {
                table,
                reason: e.to_string(),
            });
        }
        self.content
            .as_mut()
            .ok_or(GameConfigError::NothingSelected { what: "table" })
    }
}
