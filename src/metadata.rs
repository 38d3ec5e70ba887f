//! Pack metadata sidecars
//!
//! The pack index directory holds one `*.pw.toml` file per archive:
//!
//! ```toml
//! name = "Create"
//! filename = "create-1.20.1-0.5.1.jar"
//! side = "both"
//!
//! [update.curseforge]
//! project-id = 328085
//! ```
//!
//! They provide the display-name fallback, the external link and the side hint.

use crate::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct IndexEntry {
    pub name: String,
    pub filename: String,

    #[serde(default)]
    pub side: Option<String>,

    #[serde(default)]
    pub update: Option<UpdateSources>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSources {
    #[serde(default)]
    pub curseforge: Option<CurseForgeSource>,

    #[serde(default)]
    pub modrinth: Option<ModrinthSource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurseForgeSource {
    #[serde(rename = "project-id")]
    pub project_id: Option<toml::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModrinthSource {
    #[serde(rename = "mod-id")]
    pub mod_id: Option<toml::Value>,
}

fn value_text(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) if !s.is_empty() => Some(s.clone()),
        toml::Value::Integer(i) => Some(i.to_string()),
        _ => None,
    }
}

impl IndexEntry {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// External page for the package, CurseForge first
    pub fn link(&self) -> Option<String> {
        let update = self.update.as_ref()?;

        if let Some(id) = update
            .curseforge
            .as_ref()
            .and_then(|c| c.project_id.as_ref())
            .and_then(value_text)
        {
            return Some(format!("https://www.curseforge.com/projects/{}", id));
        }

        update
            .modrinth
            .as_ref()
            .and_then(|m| m.mod_id.as_ref())
            .and_then(value_text)
            .map(|id| format!("https://modrinth.com/mod/{}", id))
    }
}

/// All sidecars of a pack
#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    entries: Vec<IndexEntry>,
}

impl MetadataIndex {
    /// Load every file in `dir`. A missing directory yields an empty index;
    /// unparseable files are skipped with a warning.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "no metadata index directory");
            return Ok(Self::default());
        }

        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect();
        paths.sort();

        let mut entries = Vec::new();
        for path in paths {
            let content = fs::read_to_string(&path)?;
            match IndexEntry::parse(&content) {
                Ok(entry) => entries.push(entry),
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "skipping metadata file")
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn from_entries(entries: Vec<IndexEntry>) -> Self {
        Self { entries }
    }

    /// Entry for an archive file name (with or without the `.disabled` suffix)
    pub fn find(&self, file_name: &str) -> Option<&IndexEntry> {
        let clean = file_name.strip_suffix(".disabled").unwrap_or(file_name);
        self.entries.iter().find(|e| e.filename == clean)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
