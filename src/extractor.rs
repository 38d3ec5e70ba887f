//! Archive metadata extraction
//!
//! Opens each archive, picks its manifest, and turns the declared packages
//! into [`PackageRecord`]s. Archives bundled inside a `fabric.mod.json`
//! container are copied into a scratch directory and scanned recursively.
//! Each archive yields an [`ArchiveScan`] whose `children` hold the scans of
//! its bundled archives; [`merge_scans`] flattens the tree afterwards.
//!
//! # Examples
//!
//! ```no_run
//! use modgraph::{merge_scans, Canonicalizer, Extractor, MetadataIndex};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let canon = Canonicalizer::default();
//! let ignored = vec!["minecraft".to_string()];
//! let metadata = MetadataIndex::load("minecraft/mods/.index")?;
//!
//! let extractor = Extractor::new(&canon, &ignored, &metadata)?;
//! let scans = extractor.scan_dir("minecraft/mods", None)?;
//! let (records, diagnostics) = merge_scans(scans);
//! println!("{} packages, {} diagnostics", records.len(), diagnostics.len());
//! # Ok(())
//! # }
//! ```

use crate::canonical::Canonicalizer;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::graph::{EdgeKind, Loaders};
use crate::manifest::{
    loaders_from_file_name, FabricModJson, InferredManifest, Manifest, ModsToml, RawDependency,
    FABRIC_MOD_JSON_PATH, MODS_TOML_PATH,
};
use crate::metadata::MetadataIndex;
use crate::{Error, Result};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use walkdir::WalkDir;
use zip::result::ZipError;
use zip::ZipArchive;

/// Suffix marking an archive as disabled
pub const DISABLED_SUFFIX: &str = ".disabled";

/// Progress callback for scanning
///
/// Called with:
/// - `message`: Description of current operation (e.g., "Reading create.jar")
/// - `current`: Archives processed so far
/// - `total`: Archives to process
pub type ProgressCallback = Arc<dyn Fn(&str, u64, u64) + Send + Sync>;

/// A dependency after ignore filtering and canonicalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredDependency {
    /// Canonical identifier
    pub id: String,
    pub kind: EdgeKind,
    /// Identifier as written in the manifest, when it differs from `id`
    pub canonicalized_from: Option<String>,
}

/// One package declared by one archive, before merging into the graph
#[derive(Debug, Clone)]
pub struct PackageRecord {
    pub id: String,
    pub name: String,
    /// Top-level archive file; bundled packages carry their container's file
    pub archive: String,
    pub active: bool,
    pub loaders: Loaders,
    pub link: Option<String>,
    pub side_hint: Option<String>,
    pub parent: Option<String>,
    pub dependencies: Vec<DeclaredDependency>,
}

/// Result of scanning one archive
#[derive(Debug, Default)]
pub struct ArchiveScan {
    /// File name of this archive (the inner name for bundled archives)
    pub file_name: String,
    pub records: Vec<PackageRecord>,
    /// Scans of bundled archives, in declaration order
    pub children: Vec<ArchiveScan>,
    pub diagnostics: Diagnostics,
}

impl ArchiveScan {
    fn empty(file_name: &str, diagnostics: Diagnostics) -> Self {
        Self {
            file_name: file_name.to_string(),
            records: Vec::new(),
            children: Vec::new(),
            diagnostics,
        }
    }

    /// Records of this archive and every bundled archive
    pub fn package_count(&self) -> usize {
        self.records.len()
            + self
                .children
                .iter()
                .map(ArchiveScan::package_count)
                .sum::<usize>()
    }

    fn flatten_into(self, records: &mut Vec<PackageRecord>, diagnostics: &mut Diagnostics) {
        records.extend(self.records);
        diagnostics.extend(self.diagnostics);
        for child in self.children {
            child.flatten_into(records, diagnostics);
        }
    }
}

/// Flatten scan trees into one record list: each archive's own records come
/// before those of its bundled archives, archives in the given order.
pub fn merge_scans(scans: Vec<ArchiveScan>) -> (Vec<PackageRecord>, Diagnostics) {
    let mut records = Vec::new();
    let mut diagnostics = Diagnostics::new();
    for scan in scans {
        scan.flatten_into(&mut records, &mut diagnostics);
    }
    (records, diagnostics)
}

/// Drop ignored identifiers, canonicalize, and deduplicate. A target declared
/// both ways is kept once as mandatory.
pub fn collect_dependencies(
    raw: &[RawDependency],
    ignored: &[String],
    canon: &Canonicalizer,
) -> Vec<DeclaredDependency> {
    let mut out: Vec<DeclaredDependency> = Vec::new();

    for dep in raw {
        if ignored.iter().any(|i| i == &dep.id) {
            continue;
        }

        let canonical = canon.canonicalize(&dep.id);
        match out.iter_mut().find(|d| d.id == canonical) {
            Some(existing) => {
                if dep.kind == EdgeKind::Mandatory {
                    existing.kind = EdgeKind::Mandatory;
                }
            }
            None => out.push(DeclaredDependency {
                id: canonical.to_string(),
                kind: dep.kind,
                canonicalized_from: (canonical != dep.id).then(|| dep.id.clone()),
            }),
        }
    }

    out
}

/// Archive files (`*.jar`, `*.jar.disabled`) directly inside `dir`, sorted by
/// file name so discovery order does not depend on the platform.
pub fn discover_archives<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();

    for entry in WalkDir::new(dir.as_ref())
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".jar") || name.ends_with(".jar.disabled") {
            archives.push(entry.into_path());
        }
    }

    Ok(archives)
}

/// Where an archive sits in the scan
#[derive(Debug, Clone)]
struct ArchiveContext {
    /// Top-level archive file name
    archive: String,
    active: bool,
    parent: Option<String>,
    depth: usize,
}

/// Scans archives into records
///
/// Owns the scratch directory bundled archives are copied into; it is removed
/// when the extractor is dropped, whatever the outcome of the scan.
pub struct Extractor<'a> {
    canon: &'a Canonicalizer,
    ignored: &'a [String],
    metadata: &'a MetadataIndex,
    scratch: TempDir,
}

impl<'a> Extractor<'a> {
    pub fn new(
        canon: &'a Canonicalizer,
        ignored: &'a [String],
        metadata: &'a MetadataIndex,
    ) -> Result<Self> {
        let scratch = tempfile::Builder::new()
            .prefix("modgraph-scratch-")
            .tempdir()?;
        Ok(Self {
            canon,
            ignored,
            metadata,
            scratch,
        })
    }

    /// Scan every archive in `dir`, in discovery order
    pub fn scan_dir<P: AsRef<Path>>(
        &self,
        dir: P,
        progress: Option<ProgressCallback>,
    ) -> Result<Vec<ArchiveScan>> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::ModsDirNotFound(dir.display().to_string()));
        }

        let archives = discover_archives(dir)?;
        let total = archives.len() as u64;
        tracing::debug!(count = total, dir = %dir.display(), "discovered archives");

        let mut scans = Vec::with_capacity(archives.len());
        for (i, path) in archives.iter().enumerate() {
            if let Some(ref cb) = progress {
                let name = path.file_name().unwrap_or_default().to_string_lossy();
                cb(&format!("Reading {}", name), i as u64, total);
            }
            scans.push(self.extract_archive(path)?);
        }

        if let Some(ref cb) = progress {
            cb(&format!("Read {} archives", total), total, total);
        }

        Ok(scans)
    }

    /// Scan one top-level archive
    pub fn extract_archive<P: AsRef<Path>>(&self, path: P) -> Result<ArchiveScan> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| Error::Other(format!("Not an archive file: {}", path.display())))?;

        let ctx = ArchiveContext {
            archive: file_name.clone(),
            active: !file_name.ends_with(DISABLED_SUFFIX),
            parent: None,
            depth: 0,
        };
        self.extract(path, &file_name, &ctx)
    }

    fn extract(&self, path: &Path, file_name: &str, ctx: &ArchiveContext) -> Result<ArchiveScan> {
        let mut diagnostics = Diagnostics::new();
        let top_level = ctx.parent.is_none();
        tracing::debug!(archive = file_name, depth = ctx.depth, "scanning archive");

        let metadata = if top_level {
            self.metadata.find(file_name)
        } else {
            None
        };
        if top_level {
            match metadata {
                None => diagnostics.push(Diagnostic::MissingMetadata {
                    archive: file_name.to_string(),
                    detail: "No metadata found".to_string(),
                }),
                Some(entry) if entry.link().is_none() => {
                    diagnostics.push(Diagnostic::MissingMetadata {
                        archive: file_name.to_string(),
                        detail: format!("No link found for {}", entry.name.trim()),
                    })
                }
                Some(_) => {}
            }
        }

        let fallback_name = metadata
            .map(|m| m.name.trim().to_string())
            .unwrap_or_else(|| file_name.to_string());
        let link = metadata.and_then(|m| m.link());
        let side_hint = metadata.and_then(|m| m.side.clone());

        let mut zip = match open_archive(path) {
            Ok(zip) => zip,
            Err(Error::Zip(e)) if top_level && !matches!(e, ZipError::Io(_)) => {
                diagnostics.push(Diagnostic::MalformedManifest {
                    archive: file_name.to_string(),
                    reason: format!("not a readable archive: {}", e),
                });
                return Ok(ArchiveScan::empty(file_name, diagnostics));
            }
            Err(e) => return Err(e),
        };

        let has_mods_toml = zip.file_names().any(|n| n == MODS_TOML_PATH);
        let has_fabric_json = zip.file_names().any(|n| n == FABRIC_MOD_JSON_PATH);

        let from_name = loaders_from_file_name(file_name);
        let loaders = Loaders {
            forge: from_name.forge || has_mods_toml,
            fabric: from_name.fabric || has_fabric_json,
        };
        check_loader_hints(
            file_name,
            from_name,
            has_mods_toml,
            has_fabric_json,
            &mut diagnostics,
        );

        let manifest = if has_mods_toml {
            let text = read_entry_text(&mut zip, MODS_TOML_PATH)?;
            match ModsToml::parse(&text) {
                Ok(toml) => Manifest::Forge(toml),
                Err(e) => {
                    diagnostics.push(Diagnostic::MalformedManifest {
                        archive: file_name.to_string(),
                        reason: format!("{}: {}", MODS_TOML_PATH, e),
                    });
                    return Ok(ArchiveScan::empty(file_name, diagnostics));
                }
            }
        } else if has_fabric_json {
            let text = read_entry_text(&mut zip, FABRIC_MOD_JSON_PATH)?;
            match FabricModJson::parse(&text) {
                Ok(json) => Manifest::Fabric(json),
                Err(e) => {
                    diagnostics.push(Diagnostic::MalformedManifest {
                        archive: file_name.to_string(),
                        reason: format!("{}: {}", FABRIC_MOD_JSON_PATH, e),
                    });
                    return Ok(ArchiveScan::empty(file_name, diagnostics));
                }
            }
        } else {
            let inferred = InferredManifest::from_file_name(file_name);
            diagnostics.push(Diagnostic::MissingManifest {
                archive: file_name.to_string(),
                inferred_id: inferred.id.clone(),
                inferred_loader: (inferred.loaders.forge || inferred.loaders.fabric)
                    .then(|| inferred.loaders.label()),
            });
            Manifest::Inferred(inferred)
        };

        let records: Vec<PackageRecord> = manifest
            .packages()
            .into_iter()
            .map(|pkg| PackageRecord {
                name: pkg.name.unwrap_or_else(|| fallback_name.clone()),
                dependencies: collect_dependencies(&pkg.dependencies, self.ignored, self.canon),
                id: pkg.id,
                archive: ctx.archive.clone(),
                active: ctx.active,
                loaders,
                link: link.clone(),
                side_hint: side_hint.clone(),
                parent: ctx.parent.clone(),
            })
            .collect();

        let mut children = Vec::new();
        if let Manifest::Fabric(json) = &manifest {
            for jar in manifest.bundled() {
                children.push(self.extract_bundled(&mut zip, &json.id, file_name, &jar.file, ctx)?);
            }
        }

        Ok(ArchiveScan {
            file_name: file_name.to_string(),
            records,
            children,
            diagnostics,
        })
    }

    /// Copy a bundled archive to scratch space, scan it, and remove the copy.
    /// Any failure is fatal for this branch.
    fn extract_bundled(
        &self,
        zip: &mut ZipArchive<File>,
        container_id: &str,
        container_file: &str,
        inner: &str,
        ctx: &ArchiveContext,
    ) -> Result<ArchiveScan> {
        let nested_error = |reason: String| Error::NestedExtraction {
            container: container_file.to_string(),
            inner: inner.to_string(),
            reason,
        };

        let base = inner.rsplit('/').next().unwrap_or(inner);
        let scratch_path = self
            .scratch
            .path()
            .join(format!("{}___{}", container_id, base));

        let bytes = read_entry_bytes(zip, inner).map_err(|e| nested_error(e.to_string()))?;
        fs::write(&scratch_path, &bytes).map_err(|e| nested_error(e.to_string()))?;

        let child_ctx = ArchiveContext {
            archive: ctx.archive.clone(),
            active: ctx.active,
            parent: Some(container_id.to_string()),
            depth: ctx.depth + 1,
        };
        let result = self.extract(&scratch_path, base, &child_ctx);
        if let Err(e) = fs::remove_file(&scratch_path) {
            tracing::debug!(path = %scratch_path.display(), error = %e, "scratch copy not removed");
        }

        match result {
            Ok(scan) => Ok(scan),
            Err(e @ Error::NestedExtraction { .. }) => Err(e),
            Err(e) => Err(nested_error(e.to_string())),
        }
    }
}

fn open_archive(path: &Path) -> Result<ZipArchive<File>> {
    let file = File::open(path)?;
    Ok(ZipArchive::new(file)?)
}

fn read_entry_bytes(zip: &mut ZipArchive<File>, name: &str) -> Result<Vec<u8>> {
    let mut entry = zip.by_name(name)?;
    let mut bytes = Vec::new();
    entry.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn read_entry_text(zip: &mut ZipArchive<File>, name: &str) -> Result<String> {
    let bytes = read_entry_bytes(zip, name)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(text.trim_start_matches('\u{feff}').to_string())
}

/// Warn when the filename and the manifests disagree about the loader family
fn check_loader_hints(
    file_name: &str,
    from_name: Loaders,
    has_mods_toml: bool,
    has_fabric_json: bool,
    diagnostics: &mut Diagnostics,
) {
    let mut mismatch = |detail: &str| {
        diagnostics.push(Diagnostic::LoaderMismatch {
            archive: file_name.to_string(),
            detail: detail.to_string(),
        })
    };

    if has_mods_toml && has_fabric_json {
        mismatch("Has both mods.toml and fabric.mod.json; using mods.toml.");
    } else if from_name.forge && !from_name.fabric && !has_mods_toml && has_fabric_json {
        mismatch("Forge mod does not have mods.toml. But (weirdly) has fabric.mod.json.");
    } else if from_name.fabric && !from_name.forge && !has_fabric_json && has_mods_toml {
        mismatch("Fabric mod does not have fabric.mod.json. But (weirdly) has mods.toml.");
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    pub(crate) fn jar_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, content) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn write_jar(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, jar_bytes(entries)).unwrap();
        path
    }

    fn setup() -> (Canonicalizer, Vec<String>, MetadataIndex) {
        (
            Canonicalizer::default(),
            vec!["minecraft".to_string(), "forge".to_string(), "java".to_string()],
            MetadataIndex::default(),
        )
    }

    const TWO_MODS_TOML: &str = r#"
[[mods]]
modId = "alpha"
displayName = "Alpha"

[[mods]]
modId = "beta"
displayName = "Beta"

[[dependencies.alpha]]
modId = "minecraft"
mandatory = true

[[dependencies.alpha]]
modId = "flywheel"
mandatory = true

[[dependencies.alpha]]
modId = "create"
mandatory = false

[[dependencies.beta]]
modId = "jei"
mandatory = false
"#;

    #[test]
    fn test_fan_out_shares_file_attributes() {
        let temp_dir = TempDir::new().unwrap();
        let (canon, ignored, metadata) = setup();
        let path = write_jar(
            temp_dir.path(),
            "alphabeta-1.0.jar.disabled",
            &[(MODS_TOML_PATH, TWO_MODS_TOML.as_bytes())],
        );

        let extractor = Extractor::new(&canon, &ignored, &metadata).unwrap();
        let scan = extractor.extract_archive(&path).unwrap();

        assert_eq!(scan.records.len(), 2);
        for record in &scan.records {
            assert_eq!(record.archive, "alphabeta-1.0.jar.disabled");
            assert!(!record.active);
            assert!(record.loaders.forge);
            assert!(record.parent.is_none());
        }

        let alpha = &scan.records[0];
        // minecraft ignored, flywheel canonicalized, create merged as mandatory
        assert_eq!(
            alpha.dependencies,
            vec![DeclaredDependency {
                id: "create".to_string(),
                kind: EdgeKind::Mandatory,
                canonicalized_from: Some("flywheel".to_string()),
            }]
        );
    }

    #[test]
    fn test_missing_manifest_infers_from_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let (canon, ignored, metadata) = setup();
        let path = write_jar(
            temp_dir.path(),
            "Shaders-fabric-2.1.jar",
            &[("assets/readme.txt", b"hello".as_slice())],
        );

        let extractor = Extractor::new(&canon, &ignored, &metadata).unwrap();
        let scan = extractor.extract_archive(&path).unwrap();

        assert_eq!(scan.records.len(), 1);
        assert_eq!(scan.records[0].id, "shaders");
        assert!(scan.records[0].loaders.fabric);
        assert!(scan.diagnostics.iter().any(|d| matches!(
            d,
            Diagnostic::MissingManifest { inferred_loader: Some(l), .. } if l == "Fabric"
        )));
    }

    #[test]
    fn test_malformed_manifest_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let (canon, ignored, metadata) = setup();
        let path = write_jar(
            temp_dir.path(),
            "broken.jar",
            &[(MODS_TOML_PATH, b"[[mods]\nmodId = ".as_slice())],
        );

        let extractor = Extractor::new(&canon, &ignored, &metadata).unwrap();
        let scan = extractor.extract_archive(&path).unwrap();
        assert!(scan.records.is_empty());
        assert!(scan
            .diagnostics
            .iter()
            .any(|d| matches!(d, Diagnostic::MalformedManifest { .. })));
    }

    #[test]
    fn test_corrupt_top_level_archive_skipped() {
        let temp_dir = TempDir::new().unwrap();
        let (canon, ignored, metadata) = setup();
        let path = temp_dir.path().join("garbage.jar");
        fs::write(&path, b"definitely not a zip").unwrap();

        let extractor = Extractor::new(&canon, &ignored, &metadata).unwrap();
        let scan = extractor.extract_archive(&path).unwrap();
        assert!(scan.records.is_empty());
        assert!(!scan.diagnostics.is_empty());
    }

    #[test]
    fn test_bundled_archives_recursed() {
        let temp_dir = TempDir::new().unwrap();
        let (canon, ignored, metadata) = setup();

        let inner = jar_bytes(&[(
            FABRIC_MOD_JSON_PATH,
            br#"{ "id": "innerlib", "name": "Inner Lib", "depends": { "fabricloader": "*" } }"#
                .as_slice(),
        )]);
        let outer_json = br#"{
            "id": "outer",
            "name": "Outer",
            "depends": { "innerlib": "*", "minecraft": "1.20.1" },
            "jars": [ { "file": "META-INF/jars/innerlib-1.0.jar" } ]
        }"#;
        let path = write_jar(
            temp_dir.path(),
            "outer-fabric.jar",
            &[
                (FABRIC_MOD_JSON_PATH, outer_json.as_slice()),
                ("META-INF/jars/innerlib-1.0.jar", inner.as_slice()),
            ],
        );

        let extractor = Extractor::new(&canon, &ignored, &metadata).unwrap();
        let scan = extractor.extract_archive(&path).unwrap();

        assert_eq!(scan.package_count(), 2);
        assert_eq!(scan.children.len(), 1);
        let child = &scan.children[0].records[0];
        assert_eq!(child.id, "innerlib");
        assert_eq!(child.parent.as_deref(), Some("outer"));
        assert_eq!(child.archive, "outer-fabric.jar");
        // fabricloader canonicalizes to fabric
        assert_eq!(child.dependencies[0].id, "fabric");

        // scratch copies are removed once consumed
        let leftovers = fs::read_dir(extractor.scratch.path()).unwrap().count();
        assert_eq!(leftovers, 0);

        let (records, _) = merge_scans(vec![scan]);
        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["outer", "innerlib"]);
    }

    #[test]
    fn test_missing_bundled_archive_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let (canon, ignored, metadata) = setup();
        let path = write_jar(
            temp_dir.path(),
            "outer.jar",
            &[(
                FABRIC_MOD_JSON_PATH,
                br#"{ "id": "outer", "jars": [ { "file": "META-INF/jars/gone.jar" } ] }"#
                    .as_slice(),
            )],
        );

        let extractor = Extractor::new(&canon, &ignored, &metadata).unwrap();
        let result = extractor.extract_archive(&path);
        match result {
            Err(Error::NestedExtraction {
                container, inner, ..
            }) => {
                assert_eq!(container, "outer.jar");
                assert_eq!(inner, "META-INF/jars/gone.jar");
            }
            other => panic!("expected nested extraction failure, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_dir_sorted_and_filtered() {
        let temp_dir = TempDir::new().unwrap();
        let (canon, ignored, metadata) = setup();
        let json = |id: &str| format!(r#"{{ "id": "{}" }}"#, id);
        write_jar(temp_dir.path(), "b.jar", &[(FABRIC_MOD_JSON_PATH, json("b").as_bytes())]);
        write_jar(temp_dir.path(), "a.jar.disabled", &[(FABRIC_MOD_JSON_PATH, json("a").as_bytes())]);
        fs::write(temp_dir.path().join("notes.txt"), "skip me").unwrap();
        fs::create_dir(temp_dir.path().join("c.jar")).unwrap();

        let extractor = Extractor::new(&canon, &ignored, &metadata).unwrap();
        let scans = extractor.scan_dir(temp_dir.path(), None).unwrap();
        let names: Vec<_> = scans.iter().map(|s| s.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.jar.disabled", "b.jar"]);
    }

    #[test]
    fn test_scan_dir_missing() {
        let (canon, ignored, metadata) = setup();
        let extractor = Extractor::new(&canon, &ignored, &metadata).unwrap();
        let result = extractor.scan_dir("/nonexistent/mods", None);
        assert!(matches!(result, Err(Error::ModsDirNotFound(_))));
    }

    #[test]
    fn test_collect_dependencies_dedup() {
        let canon = Canonicalizer::default();
        let raw = vec![
            RawDependency {
                id: "ponder".to_string(),
                kind: EdgeKind::Optional,
            },
            RawDependency {
                id: "java".to_string(),
                kind: EdgeKind::Mandatory,
            },
            RawDependency {
                id: "create".to_string(),
                kind: EdgeKind::Optional,
            },
        ];
        let deps = collect_dependencies(&raw, &["java".to_string()], &canon);
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].id, "create");
        assert_eq!(deps[0].kind, EdgeKind::Optional);
        assert_eq!(deps[0].canonicalized_from.as_deref(), Some("ponder"));
    }
}
