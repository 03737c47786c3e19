//! Document persistence.
//!
//! The editor works on a single [`ConfigDocument`]. A [`DocumentStore`]
//! decides where it lives: [`FileDocumentStore`] searches a project directory
//! for the document file and creates one when none exists.

use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use walkdir::WalkDir;

use crate::{
    data::ConfigDocument,
    error::{GameConfigError, Result},
};

/// File stem of document files.
pub const DOCUMENT_FILE_STEM: &str = "GameConfigData";

/// Where a new document is created, relative to the search root.
pub const DEFAULT_DOCUMENT_DIR: &str = "Settings";

/// Directories never searched for documents, besides hidden ones.
const SKIPPED_DIRS: &[&str] = &["target"];

/// Load and save access to the single configuration document.
pub trait DocumentStore {
    /// Load the document, creating and persisting an empty one if none exists.
    fn load_or_create(&mut self) -> Result<ConfigDocument>;

    /// Replace the stored document with `doc`.
    fn save(&self, doc: &ConfigDocument) -> Result<()>;

    /// Human-readable location of the document.
    fn location(&self) -> String;
}

/// Document stored as a TOML or JSON file under a project directory.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    path: PathBuf,
}

impl FileDocumentStore {
    /// Use an explicit document path. The format follows its extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Find the document under `root`.
    ///
    /// With no document the store points at `<root>/Settings/GameConfigData.toml`.
    /// With several, the first path in sorted order is used and a warning lists
    /// all of them. Hidden directories and `target` are not searched, and
    /// unreadable entries are skipped.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let mut found = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("skipping unreadable entry: {e}");
                    continue;
                }
            };
            if entry.file_type().is_file() && is_document_file(entry.path()) {
                found.push(entry.into_path());
            }
        }
        found.sort();

        let path = match found.len() {
            0 => root
                .join(DEFAULT_DOCUMENT_DIR)
                .join(format!("{DOCUMENT_FILE_STEM}.toml")),
            1 => found.remove(0),
            _ => {
                let chosen = found[0].clone();
                let listing = found
                    .iter()
                    .map(|p| format!("\n\t{}", p.display()))
                    .collect::<String>();
                let err = GameConfigError::MultipleDocumentsFound {
                    paths: found,
                    chosen: chosen.clone(),
                };
                warn!("{err} at{listing}");
                chosen
            }
        };
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn extension(&self) -> &str {
        self.path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }

    fn read(&self) -> Result<ConfigDocument> {
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ConfigDocument::default());
        }
        let doc = match self.extension() {
            "toml" => toml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            ext => return Err(GameConfigError::UnsupportedFormat(ext.to_string())),
        };
        Ok(doc)
    }

    fn render(&self, doc: &ConfigDocument) -> Result<String> {
        let s = match self.extension() {
            "toml" => toml::to_string_pretty(doc)?,
            "json" => serde_json::to_string_pretty(doc)?,
            ext => return Err(GameConfigError::UnsupportedFormat(ext.to_string())),
        };
        Ok(s)
    }
}

fn is_skipped_dir(entry: &walkdir::DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&&*name)
}

fn is_document_file(path: &Path) -> bool {
    let stem = path.file_stem().and_then(|s| s.to_str());
    let ext = path.extension().and_then(|s| s.to_str());
    stem == Some(DOCUMENT_FILE_STEM) && matches!(ext, Some("toml" | "json"))
}

impl DocumentStore for FileDocumentStore {
    fn load_or_create(&mut self) -> Result<ConfigDocument> {
        if self.path.exists() {
            let doc = self.read()?;
            info!(
                "loaded {} packages from {}",
                doc.packages.len(),
                self.path.display()
            );
            return Ok(doc);
        }

        let doc = ConfigDocument::default();
        self.save(&doc)?;
        info!("created {}", self.path.display());
        Ok(doc)
    }

    /// Write the whole document to a sibling temp file, then rename it over
    /// the document so readers never see a partial file.
    fn save(&self, doc: &ConfigDocument) -> Result<()> {
        let content = self.render(doc)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension(format!("{}.tmp", self.extension()));
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        info!("saved {}", self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory store, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    saved: RefCell<Option<ConfigDocument>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: ConfigDocument) -> Self {
        Self {
            saved: RefCell::new(Some(doc)),
        }
    }

    /// Last saved document.
    pub fn saved(&self) -> Option<ConfigDocument> {
        self.saved.borrow().clone()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn load_or_create(&mut self) -> Result<ConfigDocument> {
        let doc = self.saved.get_mut().get_or_insert_with(ConfigDocument::default);
        Ok(doc.clone())
    }

    fn save(&self, doc: &ConfigDocument) -> Result<()> {
        *self.saved.borrow_mut() = Some(doc.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "<memory>".to_string()
    }
}
