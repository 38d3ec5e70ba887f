//! modgraph - dependency graph tooling for modpacks
//!
//! modgraph reads every mod archive in a pack and builds one dependency graph
//! across them. It provides a simple CLI for curating the pack, with features like:
//!
//! - Metadata extraction from `mods.toml` and `fabric.mod.json`, including bundled archives
//! - Canonicalization of known-equivalent mod identifiers
//! - A markdown report whose curated categories and sides survive regeneration
//! - Provisional category inference for new mods
//! - Cascading enable/disable that keeps mandatory dependencies consistent
//!
//! # Examples
//!
//! ```no_run
//! use modgraph::{analysis, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load pack configuration
//! let config = Config::load(".")?;
//!
//! // Scan, reconcile with the previous report, and infer categories
//! let result = analysis::analyze(&config, None)?;
//! println!("{} mods, {} diagnostics", result.graph.len(), result.diagnostics.len());
//!
//! // Rewrite the report
//! analysis::write_report(&config, &result)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`manifest`] - Parse `mods.toml`, `fabric.mod.json` and filename fallbacks
//! - [`metadata`] - Pack index sidecars (`*.pw.toml`)
//! - [`extractor`] - Scan archives and their bundled archives
//! - [`canonical`] - Identifier equivalence groups
//! - [`graph`] - Package nodes, dependency edges and the graph builder
//! - [`reconcile`] - Recover curated data from the previous report
//! - [`inference`] - Provisional categories and sides
//! - [`toggle`] - Cascading enable/disable
//! - [`report`] - Markdown report rendering
//! - [`analysis`] - The scan-to-report pipeline
//! - [`config`] - Pack configuration
//! - [`error`] - Error types and result handling

pub mod analysis;
pub mod canonical;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod extractor;
pub mod graph;
pub mod ignore;
pub mod inference;
pub mod manifest;
pub mod metadata;
pub mod reconcile;
pub mod report;
pub mod toggle;

pub use analysis::Analysis;
pub use canonical::{canonicalize, Canonicalizer};
pub use config::Config;
pub use diagnostics::{Diagnostic, Diagnostics, NoOpReason, Severity};
pub use error::{Error, Result};
pub use extractor::{
    discover_archives, merge_scans, ArchiveScan, DeclaredDependency, Extractor, PackageRecord,
    ProgressCallback,
};
pub use graph::{Category, DependencyEdge, EdgeKind, Loaders, ModGraph, PackageNode, Side};
pub use ignore::IgnoreList;
pub use inference::{infer_categories, infer_sides, InferenceSummary};
pub use manifest::Manifest;
pub use metadata::MetadataIndex;
pub use reconcile::{parse_report, reconcile, ReconcileSummary, ReportRow};
pub use report::{render, ReportContext};
pub use toggle::{set_active, ArchiveRenamer, DryRunRenamer, FsRenamer, ToggleOutcome};
