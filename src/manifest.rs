//! Embedded archive manifests
//!
//! An archive carries one of two manifest formats:
//!
//! - `META-INF/mods.toml` ([`ModsToml`]): TOML, may declare several packages
//! - `fabric.mod.json` ([`FabricModJson`]): JSON, declares exactly one package
//!   and may list bundled archives
//!
//! Archives with neither are described by an [`InferredManifest`] built from
//! the filename. All three are parsed into the [`Manifest`] variant at the
//! archive boundary; nothing downstream looks at raw manifest text.
//!
//! # Examples
//!
//! ```
//! use modgraph::manifest::ModsToml;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let toml = r#"
//! [[mods]]
//! modId = "examplemod"
//! displayName = "Example Mod"
//!
//! [[dependencies.examplemod]]
//! modId = "geckolib"
//! mandatory = true
//! "#;
//!
//! let manifest = ModsToml::parse(toml)?;
//! assert_eq!(manifest.mods[0].mod_id, "examplemod");
//! # Ok(())
//! # }
//! ```

use crate::graph::{EdgeKind, Loaders};
use crate::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Location of the TOML manifest inside an archive
pub const MODS_TOML_PATH: &str = "META-INF/mods.toml";

/// Location of the JSON manifest inside an archive
pub const FABRIC_MOD_JSON_PATH: &str = "fabric.mod.json";

/// Keys under this prefix are written with literal dots by some packages,
/// which collides with TOML's dotted-key syntax
const DOTTED_KEY_PREFIX: &str = "mixin.";

/// `META-INF/mods.toml`
#[derive(Debug, Clone, Deserialize)]
pub struct ModsToml {
    #[serde(default)]
    pub mods: Vec<ModsTomlEntry>,

    /// Dependency lists keyed by the declaring package's identifier
    #[serde(default)]
    pub dependencies: HashMap<String, Vec<ModsTomlDependency>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModsTomlEntry {
    #[serde(rename = "modId")]
    pub mod_id: String,

    #[serde(rename = "displayName", default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModsTomlDependency {
    #[serde(rename = "modId")]
    pub mod_id: String,

    /// Legacy flag
    #[serde(default)]
    pub mandatory: Option<bool>,

    /// `required`, `optional`, `incompatible` or `discouraged`
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

impl ModsTomlDependency {
    /// Edge kind for this entry, or `None` for entries that are not
    /// dependencies at all (incompatibilities)
    pub fn edge_kind(&self) -> Option<EdgeKind> {
        if let Some(mandatory) = self.mandatory {
            return Some(if mandatory {
                EdgeKind::Mandatory
            } else {
                EdgeKind::Optional
            });
        }
        match self.kind.as_deref().map(|k| k.to_ascii_lowercase()) {
            Some(k) if k == "required" => Some(EdgeKind::Mandatory),
            Some(k) if k == "optional" => Some(EdgeKind::Optional),
            Some(_) => None,
            None => Some(EdgeKind::Optional),
        }
    }
}

impl ModsToml {
    /// Normalize and parse manifest text
    pub fn parse(text: &str) -> Result<Self> {
        let normalized = normalize_dotted_keys(text);
        toml::from_str(&normalized).map_err(|e| Error::InvalidManifest(e.to_string()))
    }
}

/// Replace dots with underscores in keys that start with the `mixin.` prefix.
///
/// Only the key part of a line is touched (everything before `=`, or the whole
/// line for table headers); values keep their dots.
pub fn normalize_dotted_keys(text: &str) -> String {
    text.split('\n')
        .map(|line| {
            if !line.contains(DOTTED_KEY_PREFIX) {
                return line.to_string();
            }
            if line.trim_start().starts_with('[') {
                return line.replace('.', "_");
            }
            match line.find('=') {
                Some(eq) => {
                    let (key, rest) = line.split_at(eq);
                    if key.contains(DOTTED_KEY_PREFIX) {
                        format!("{}{}", key.replace('.', "_"), rest)
                    } else {
                        line.to_string()
                    }
                }
                None => line.to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `fabric.mod.json`
#[derive(Debug, Clone, Deserialize)]
pub struct FabricModJson {
    pub id: String,

    #[serde(default)]
    pub name: Option<String>,

    /// Presence of a key means mandatory; the version value is not used.
    /// Keys keep their declaration order.
    #[serde(default)]
    pub depends: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    pub recommends: serde_json::Map<String, serde_json::Value>,

    #[serde(default)]
    pub suggests: serde_json::Map<String, serde_json::Value>,

    /// Archives bundled inside this one
    #[serde(default)]
    pub jars: Vec<BundledJar>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BundledJar {
    /// Path of the bundled archive inside the container
    pub file: String,
}

impl FabricModJson {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::InvalidManifest(e.to_string()))
    }
}

/// Package description derived from the archive's filename
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferredManifest {
    pub id: String,
    pub loaders: Loaders,
}

impl InferredManifest {
    pub fn from_file_name(file_name: &str) -> Self {
        Self {
            id: infer_id(file_name),
            loaders: loaders_from_file_name(file_name),
        }
    }
}

/// Identifier guess: the part of the filename before the first `-`, lowercased
pub fn infer_id(file_name: &str) -> String {
    let stem = strip_archive_suffix(file_name);
    stem.split('-').next().unwrap_or(stem).to_lowercase()
}

/// `name.jar.disabled` / `name.jar` -> `name`
pub fn strip_archive_suffix(file_name: &str) -> &str {
    let name = file_name.strip_suffix(".disabled").unwrap_or(file_name);
    name.strip_suffix(".jar").unwrap_or(name)
}

/// Loader families mentioned in a filename
pub fn loaders_from_file_name(file_name: &str) -> Loaders {
    let lower = file_name.to_lowercase();
    Loaders {
        forge: lower.contains("forge"),
        fabric: lower.contains("fabric"),
    }
}

/// Display name with surrounding whitespace removed, `None` when blank
fn trimmed_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

/// A dependency as written in a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDependency {
    pub id: String,
    pub kind: EdgeKind,
}

/// A package as declared by a manifest, before graph-level processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredPackage {
    pub id: String,
    pub name: Option<String>,
    pub dependencies: Vec<RawDependency>,
}

/// The manifest an archive was described by
#[derive(Debug, Clone)]
pub enum Manifest {
    Forge(ModsToml),
    Fabric(FabricModJson),
    Inferred(InferredManifest),
}

impl Manifest {
    /// Packages declared by this manifest, in declaration order
    pub fn packages(&self) -> Vec<DeclaredPackage> {
        match self {
            Manifest::Forge(toml) => toml
                .mods
                .iter()
                .map(|m| {
                    let dependencies = toml
                        .dependencies
                        .get(&m.mod_id)
                        .map(|deps| {
                            deps.iter()
                                .filter_map(|d| {
                                    d.edge_kind().map(|kind| RawDependency {
                                        id: d.mod_id.clone(),
                                        kind,
                                    })
                                })
                                .collect()
                        })
                        .unwrap_or_default();
                    DeclaredPackage {
                        id: m.mod_id.clone(),
                        name: trimmed_name(m.display_name.as_deref()),
                        dependencies,
                    }
                })
                .collect(),
            Manifest::Fabric(json) => {
                let mandatory = json.depends.keys().map(|id| RawDependency {
                    id: id.clone(),
                    kind: EdgeKind::Mandatory,
                });
                let optional = json
                    .recommends
                    .keys()
                    .chain(json.suggests.keys())
                    .map(|id| RawDependency {
                        id: id.clone(),
                        kind: EdgeKind::Optional,
                    });
                vec![DeclaredPackage {
                    id: json.id.clone(),
                    name: trimmed_name(json.name.as_deref()),
                    dependencies: mandatory.chain(optional).collect(),
                }]
            }
            Manifest::Inferred(inferred) => vec![DeclaredPackage {
                id: inferred.id.clone(),
                name: None,
                dependencies: Vec::new(),
            }],
        }
    }

    /// Archives bundled inside this one
    pub fn bundled(&self) -> &[BundledJar] {
        match self {
            Manifest::Fabric(json) => &json.jars,
            _ => &[],
        }
    }
}
