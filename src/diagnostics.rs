//! Diagnostics accumulated while scanning, building and toggling
//!
//! Nothing in here aborts a run. Each stage returns the diagnostics it raised
//! and the caller decides how to surface them.

use std::fmt;

/// How loudly a diagnostic should be surfaced
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn symbol(&self) -> &'static str {
        match self {
            Severity::Info => "•",
            Severity::Warning => "⚠",
            Severity::Error => "✗",
        }
    }
}

/// Why a toggle request did not change anything
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoOpReason {
    NotFound,
    AlreadyInState,
    Gone,
    /// Bundled nodes follow their container archive
    Bundled { parent: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Manifest present but unparseable; the archive was skipped
    MalformedManifest { archive: String, reason: String },

    /// No manifest; loader family and identifier were inferred from the filename
    MissingManifest {
        archive: String,
        inferred_id: String,
        inferred_loader: Option<String>,
    },

    /// No sidecar metadata or no external link for a top-level archive
    MissingMetadata { archive: String, detail: String },

    /// Filename suggests one loader but the archive only carries the other manifest
    LoaderMismatch { archive: String, detail: String },

    /// A later record had the same canonical identifier as an earlier node
    DuplicatePackage {
        id: String,
        kept_archive: String,
        dropped_archive: String,
    },

    /// Several nodes shared a display name and were disambiguated
    DuplicateName { name: String, ids: Vec<String> },

    /// An active node requires a package absent from the graph
    UnresolvedMandatoryDependency { node: String, dependency: String },

    /// An active node requires a package that exists but is inactive
    DisabledMandatoryDependency { node: String, dependency: String },

    /// A toggle request that left the graph untouched
    ToggleNoOp { id: String, reason: NoOpReason },

    /// An optional dependent left active while disabling its dependency
    OptionalDependentKept { node: String, dependent: String },

    /// A cascade walked back into a node that was still being processed
    CycleDetected { path: Vec<String> },

    /// A row of the previous report could not be interpreted
    ReportRowSkipped { line: usize, reason: String },
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self {
            Diagnostic::MalformedManifest { .. }
            | Diagnostic::UnresolvedMandatoryDependency { .. }
            | Diagnostic::DisabledMandatoryDependency { .. } => Severity::Error,
            Diagnostic::ToggleNoOp { .. } => Severity::Info,
            _ => Severity::Warning,
        }
    }

    /// Forward to `tracing` at the matching level.
    pub fn emit(&self) {
        match self.severity() {
            Severity::Info => tracing::info!(diagnostic = %self),
            Severity::Warning => tracing::warn!(diagnostic = %self),
            Severity::Error => tracing::error!(diagnostic = %self),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedManifest { archive, reason } => {
                write!(f, "\"{}\": error parsing manifest, skipped ({})", archive, reason)
            }
            Diagnostic::MissingManifest {
                archive,
                inferred_id,
                inferred_loader,
            } => {
                write!(f, "\"{}\": no mods.toml or fabric.mod.json.", archive)?;
                match inferred_loader {
                    Some(loader) => write!(f, " Assuming {} from filename.", loader)?,
                    None => write!(f, " Could not infer modloader from filename.")?,
                }
                write!(f, " Assuming mod id \"{}\" from filename.", inferred_id)
            }
            Diagnostic::MissingMetadata { archive, detail } => {
                write!(f, "\"{}\": {}", archive, detail)
            }
            Diagnostic::LoaderMismatch { archive, detail } => {
                write!(f, "\"{}\": {}", archive, detail)
            }
            Diagnostic::DuplicatePackage {
                id,
                kept_archive,
                dropped_archive,
            } => write!(
                f,
                "Mod \"{}\" from \"{}\" already provided by \"{}\" (first archive wins)",
                id, dropped_archive, kept_archive
            ),
            Diagnostic::DuplicateName { name, ids } => write!(
                f,
                "Mods with duplicate name \"{}\": {}",
                name,
                ids.join(", ")
            ),
            Diagnostic::UnresolvedMandatoryDependency { node, dependency } => write!(
                f,
                "Mod {} depends on {} but it is not present.",
                node, dependency
            ),
            Diagnostic::DisabledMandatoryDependency { node, dependency } => write!(
                f,
                "Mod {} depends on {} but it is disabled.",
                node, dependency
            ),
            Diagnostic::ToggleNoOp { id, reason } => match reason {
                NoOpReason::NotFound => write!(f, "Mod \"{}\" not found.", id),
                NoOpReason::AlreadyInState => write!(f, "Mod \"{}\" is already in that state.", id),
                NoOpReason::Gone => write!(f, "Mod \"{}\" is gone.", id),
                NoOpReason::Bundled { parent } => write!(
                    f,
                    "Mod \"{}\" is bundled inside \"{}\"; toggle the container instead.",
                    id, parent
                ),
            },
            Diagnostic::OptionalDependentKept { node, dependent } => write!(
                f,
                "Optional dependent {} of {} not disabled.",
                dependent, node
            ),
            Diagnostic::CycleDetected { path } => {
                write!(f, "Dependency cycle detected: {}", path.join(" → "))
            }
            Diagnostic::ReportRowSkipped { line, reason } => {
                write!(f, "Previous report line {} skipped: {}", line, reason)
            }
        }
    }
}

/// Ordered list of diagnostics raised by one stage
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic and forward it to `tracing`.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        diagnostic.emit();
        self.items.push(diagnostic);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Identifiers named as disabled mandatory dependencies, deduplicated in order.
    pub fn disabled_dependencies(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for d in &self.items {
            if let Diagnostic::DisabledMandatoryDependency { dependency, .. } = d {
                if !out.contains(dependency) {
                    out.push(dependency.clone());
                }
            }
        }
        out
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
