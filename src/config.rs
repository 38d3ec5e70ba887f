//! Pack configuration
//!
//! Configuration is stored in TOML format at `<pack root>/modgraph.toml`.
//! Every field has a default, so a pack without the file works out of the box.
//!
//! # Examples
//!
//! ```no_run
//! use modgraph::Config;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load(".")?;
//!
//! println!("Mods directory: {}", config.mods_dir().display());
//! println!("Report: {}", config.report_path().display());
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// The configuration filename looked up in the pack root
pub const CONFIG_FILE_NAME: &str = "modgraph.toml";

/// Pack configuration file (`modgraph.toml`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Heading written at the top of the report
    #[serde(default = "default_title")]
    pub title: String,

    /// File and directory locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Dependency filtering and equivalence settings
    #[serde(default)]
    pub dependencies: DependenciesConfig,

    /// Category inference substrings
    #[serde(default)]
    pub heuristics: HeuristicsConfig,

    /// Pack root every relative path is resolved against (not serialized)
    #[serde(skip)]
    pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding `*.jar` / `*.jar.disabled` archives
    #[serde(default = "default_mods_dir")]
    pub mods_dir: String,

    /// Directory holding `*.pw.toml` metadata sidecars
    #[serde(default = "default_index_dir")]
    pub index_dir: String,

    /// Markdown report, read by the reconciler and rewritten on every run
    #[serde(default = "default_report")]
    pub report: String,

    /// One identifier per line; optional dependencies on these are suppressed
    #[serde(default = "default_ignore_list")]
    pub ignore_list: String,
}

fn default_title() -> String {
    "Modpack".to_string()
}

fn default_mods_dir() -> String {
    "minecraft/mods".to_string()
}

fn default_index_dir() -> String {
    "minecraft/mods/.index".to_string()
}

fn default_report() -> String {
    "mods.md".to_string()
}

fn default_ignore_list() -> String {
    "ignoredOptDeps.txt".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            mods_dir: default_mods_dir(),
            index_dir: default_index_dir(),
            report: default_report(),
            ignore_list: default_ignore_list(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependenciesConfig {
    /// Core platform identifiers never recorded as dependencies
    #[serde(default = "default_ignored_dependencies")]
    pub ignored: Vec<String>,

    /// Extra equivalence groups appended to the built-in table
    #[serde(default)]
    pub extra_equivalents: Vec<Vec<String>>,
}

fn default_ignored_dependencies() -> Vec<String> {
    ["java", "minecraft", "forge", "neoforge"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for DependenciesConfig {
    fn default() -> Self {
        Self {
            ignored: default_ignored_dependencies(),
            extra_equivalents: Vec::new(),
        }
    }
}

/// Substrings driving category inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeuristicsConfig {
    /// Matched against identifier and name
    #[serde(default = "default_library_markers")]
    pub library: Vec<String>,

    /// Matched against the name
    #[serde(default = "default_fix_markers")]
    pub fix: Vec<String>,

    /// Matched against the name
    #[serde(default = "default_compat_markers")]
    pub compat: Vec<String>,
}

fn default_library_markers() -> Vec<String> {
    vec!["api".to_string(), "lib".to_string()]
}

fn default_fix_markers() -> Vec<String> {
    vec!["fix".to_string()]
}

fn default_compat_markers() -> Vec<String> {
    vec!["compat".to_string()]
}

impl Default for HeuristicsConfig {
    fn default() -> Self {
        Self {
            library: default_library_markers(),
            fix: default_fix_markers(),
            compat: default_compat_markers(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: default_title(),
            paths: PathsConfig::default(),
            dependencies: DependenciesConfig::default(),
            heuristics: HeuristicsConfig::default(),
            root: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Config file path for a pack root
    ///
    /// Uses MODGRAPH_CONFIG if set, otherwise `<root>/modgraph.toml`
    pub fn path_for<P: AsRef<Path>>(root: P) -> PathBuf {
        if let Ok(path) = std::env::var("MODGRAPH_CONFIG") {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        root.as_ref().join(CONFIG_FILE_NAME)
    }

    /// Load config for the given pack root, or defaults if the file doesn't exist
    pub fn load<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref();
        let path = Self::path_for(root);

        let mut config = if !path.exists() {
            Self::default()
        } else {
            let content = fs::read_to_string(&path)?;
            Self::from_toml(&content)?
        };

        config.root = root.to_path_buf();
        Ok(config)
    }

    /// Parse config text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            Error::Other(format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
        })
    }

    /// Resolve a configured path: `~` and `$VAR` are expanded, relative paths
    /// are joined onto the pack root.
    pub fn resolve(&self, raw: &str) -> PathBuf {
        let expanded = shellexpand::full(raw)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| raw.to_string());
        let path = PathBuf::from(expanded);
        if path.is_absolute() {
            path
        } else {
            self.root.join(path)
        }
    }

    pub fn mods_dir(&self) -> PathBuf {
        self.resolve(&self.paths.mods_dir)
    }

    pub fn index_dir(&self) -> PathBuf {
        self.resolve(&self.paths.index_dir)
    }

    pub fn report_path(&self) -> PathBuf {
        self.resolve(&self.paths.report)
    }

    pub fn ignore_list_path(&self) -> PathBuf {
        self.resolve(&self.paths.ignore_list)
    }
}
