//! Ignore list for optional dependencies
//!
//! A plain text file with one identifier per line. Optional dependencies on
//! these identifiers are dropped while building the graph, so they never show
//! up as unsatisfied in the report or in the `optional` listing.

use crate::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    path: Option<PathBuf>,
    entries: Vec<String>,
}

impl IgnoreList {
    /// Load the list, or an empty one if the file doesn't exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let entries = if path.exists() {
            fs::read_to_string(path)?
                .lines()
                .map(|l| l.to_string())
                .collect()
        } else {
            Vec::new()
        };

        let mut list = Self::from_entries(entries);
        list.path = Some(path.to_path_buf());
        Ok(list)
    }

    /// In-memory list (trimmed, blank lines dropped, sorted, deduplicated)
    pub fn from_entries(entries: Vec<String>) -> Self {
        let mut entries: Vec<String> = entries
            .into_iter()
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty())
            .collect();
        entries.sort();
        entries.dedup();
        Self {
            path: None,
            entries,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.binary_search_by(|e| e.as_str().cmp(id)).is_ok()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add an identifier and persist the list. Returns false if it was
    /// already ignored.
    pub fn add(&mut self, id: &str) -> Result<bool> {
        let id = id.trim();
        match self.entries.binary_search_by(|e| e.as_str().cmp(id)) {
            Ok(_) => Ok(false),
            Err(pos) => {
                self.entries.insert(pos, id.to_string());
                self.save()?;
                Ok(true)
            }
        }
    }

    /// Write the list back to the file it was loaded from
    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.path {
            fs::write(path, self.entries.join("\n"))?;
        }
        Ok(())
    }
}
