//! Package graph: nodes, dependency edges and the builder that merges
//! extracted records into one graph
//!
//! Nodes are keyed by canonical identifier. Dependents are derived from the
//! forward edges by [`ModGraph::rebuild_dependents`] and never edited directly.
//!
//! # Examples
//!
//! ```no_run
//! use modgraph::{Canonicalizer, IgnoreList, ModGraph};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let records = Vec::new();
//! let ignore = IgnoreList::load("ignoredOptDeps.txt")?;
//! let (graph, diagnostics) = ModGraph::build(records, Canonicalizer::default(), &ignore);
//!
//! for node in graph.nodes() {
//!     println!("{} ({} dependents)", node.id, node.dependents.len());
//! }
//! println!("{} diagnostics", diagnostics.len());
//! # Ok(())
//! # }
//! ```

use crate::canonical::Canonicalizer;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::extractor::PackageRecord;
use crate::ignore::IgnoreList;
use crate::{Error, Result};
use std::collections::HashMap;
use std::fmt;

/// Marker suffix for uncertain sides and provisional categories
pub const UNCERTAIN_MARKER: char = '?';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Mandatory,
    Optional,
}

/// "A requires/recommends B"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    /// Canonical identifier of the target
    pub target: String,
    pub kind: EdgeKind,
    /// Identifier as declared, when canonicalization changed it
    pub canonicalized_from: Option<String>,
}

impl DependencyEdge {
    pub fn is_mandatory(&self) -> bool {
        self.kind == EdgeKind::Mandatory
    }
}

/// Reverse edge: `id` depends on the node holding this entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependent {
    pub id: String,
    pub kind: EdgeKind,
}

impl fmt::Display for Dependent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            EdgeKind::Mandatory => write!(f, "{}", self.id),
            EdgeKind::Optional => write!(f, "{}{}", self.id, UNCERTAIN_MARKER),
        }
    }
}

/// Runtime-loader families a package supports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Loaders {
    pub forge: bool,
    pub fabric: bool,
}

impl Loaders {
    /// Parse a report label such as `Forge/Fabric`
    pub fn from_label(label: &str) -> Self {
        Self {
            forge: label.contains("Forge"),
            fabric: label.contains("Fabric"),
        }
    }

    pub fn label(&self) -> String {
        match (self.forge, self.fabric) {
            (true, true) => "Forge/Fabric".to_string(),
            (true, false) => "Forge".to_string(),
            (false, true) => "Fabric".to_string(),
            (false, false) => "N/A".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideKind {
    Client,
    Server,
    Both,
    Unknown,
}

/// Where a package is needed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Side {
    pub kind: SideKind,
    pub uncertain: bool,
}

impl Side {
    /// Parse `client`, `server`, `both` or `unknown`, optionally followed by `?`.
    /// Blank and `N/A` cells carry no side.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let (body, uncertain) = match text.strip_suffix(UNCERTAIN_MARKER) {
            Some(body) => (body, true),
            None => (text, false),
        };
        let kind = match body.to_ascii_lowercase().as_str() {
            "client" => SideKind::Client,
            "server" => SideKind::Server,
            "both" => SideKind::Both,
            "unknown" => SideKind::Unknown,
            _ => return None,
        };
        Some(Self { kind, uncertain })
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = match self.kind {
            SideKind::Client => "client",
            SideKind::Server => "server",
            SideKind::Both => "both",
            SideKind::Unknown => "unknown",
        };
        if self.uncertain {
            write!(f, "{}{}", body, UNCERTAIN_MARKER)
        } else {
            f.write_str(body)
        }
    }
}

/// Free-form category label; provisional ones were inferred, not curated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub label: String,
    pub provisional: bool,
}

impl Category {
    pub fn confirmed(label: &str) -> Self {
        Self {
            label: label.to_string(),
            provisional: false,
        }
    }

    pub fn provisional(label: &str) -> Self {
        Self {
            label: label.to_string(),
            provisional: true,
        }
    }

    /// Blank text carries no category
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        match text.strip_suffix(UNCERTAIN_MARKER) {
            Some(label) => Some(Self::provisional(label.trim_end())),
            None => Some(Self::confirmed(text)),
        }
    }

    pub fn is_library(&self) -> bool {
        self.label == "Library"
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.provisional {
            write!(f, "{}{}", self.label, UNCERTAIN_MARKER)
        } else {
            f.write_str(&self.label)
        }
    }
}

/// Rendered report columns kept verbatim for packages that are no longer present
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoneRecord {
    pub raw_dependents: String,
    pub raw_dependencies: String,
    pub raw_optional: String,
}

#[derive(Debug, Clone)]
pub struct PackageNode {
    /// Identifier as declared by the manifest
    pub id: String,
    pub name: String,
    /// Top-level archive file the package lives in; `None` for gone nodes
    pub archive: Option<String>,
    pub active: bool,
    pub loaders: Loaders,
    pub link: Option<String>,
    pub side: Option<Side>,
    /// Side declared by the pack metadata, used to infer `side`
    pub side_hint: Option<String>,
    pub category: Option<Category>,
    /// Container package for bundled archives
    pub parent: Option<String>,
    pub dependencies: Vec<DependencyEdge>,
    pub dependents: Vec<Dependent>,
    /// Set for packages only known from a previous report
    pub gone: Option<GoneRecord>,
}

impl PackageNode {
    pub fn from_record(record: PackageRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            archive: Some(record.archive),
            active: record.active,
            loaders: record.loaders,
            link: record.link,
            side: None,
            side_hint: record.side_hint,
            category: None,
            parent: record.parent,
            dependencies: record
                .dependencies
                .into_iter()
                .map(|d| DependencyEdge {
                    target: d.id,
                    kind: d.kind,
                    canonicalized_from: d.canonicalized_from,
                })
                .collect(),
            dependents: Vec::new(),
            gone: None,
        }
    }

    pub fn is_present(&self) -> bool {
        self.gone.is_none()
    }

    pub fn is_gone(&self) -> bool {
        self.gone.is_some()
    }

    pub fn is_bundled(&self) -> bool {
        self.parent.is_some()
    }

    pub fn mandatory_dependencies(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.dependencies.iter().filter(|d| d.is_mandatory())
    }

    pub fn optional_dependencies(&self) -> impl Iterator<Item = &DependencyEdge> {
        self.dependencies.iter().filter(|d| !d.is_mandatory())
    }

    /// Identifier qualified by its container, e.g. `parent > id`
    pub fn qualified_id(&self) -> String {
        match &self.parent {
            Some(parent) => format!("{} > {}", parent, self.id),
            None => self.id.clone(),
        }
    }
}

/// The dependency graph for one run
#[derive(Debug, Clone, Default)]
pub struct ModGraph {
    nodes: Vec<PackageNode>,
    /// Canonical identifier -> position, present nodes only
    index: HashMap<String, usize>,
    canon: Canonicalizer,
}

impl ModGraph {
    pub fn new(canon: Canonicalizer) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            canon,
        }
    }

    /// Merge records (in discovery order) into a graph.
    ///
    /// The first record for a canonical identifier wins; later ones are
    /// dropped with a diagnostic. Optional edges to ignored identifiers are
    /// removed, dependents are derived, and mandatory edges of active nodes
    /// are checked.
    pub fn build(
        records: Vec<PackageRecord>,
        canon: Canonicalizer,
        ignore: &IgnoreList,
    ) -> (Self, Diagnostics) {
        let mut graph = Self::new(canon);
        let mut diagnostics = Diagnostics::new();

        for record in records {
            let key = graph.canon.canonicalize(&record.id).to_string();

            if let Some(&existing) = graph.index.get(&key) {
                diagnostics.push(Diagnostic::DuplicatePackage {
                    id: record.id.clone(),
                    kept_archive: graph.nodes[existing].archive.clone().unwrap_or_default(),
                    dropped_archive: record.archive.clone(),
                });
                continue;
            }

            let mut node = PackageNode::from_record(record);
            let canon = &graph.canon;
            node.dependencies.retain(|edge| {
                if canon.canonicalize(&edge.target) == key {
                    return false;
                }
                if edge.kind == EdgeKind::Optional {
                    let declared = edge.canonicalized_from.as_deref().unwrap_or(&edge.target);
                    return !ignore.contains(&edge.target) && !ignore.contains(declared);
                }
                true
            });

            graph.index.insert(key, graph.nodes.len());
            graph.nodes.push(node);
        }

        graph.disambiguate_names(&mut diagnostics);
        graph.rebuild_dependents();
        diagnostics.extend(graph.check_dependencies());

        (graph, diagnostics)
    }

    pub fn canonicalizer(&self) -> &Canonicalizer {
        &self.canon
    }

    pub fn nodes(&self) -> &[PackageNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Position of the present node an identifier (or any equivalent) resolves to
    pub fn resolve(&self, id: &str) -> Option<usize> {
        self.index.get(self.canon.canonicalize(id)).copied()
    }

    /// Like [`resolve`](Self::resolve), falling back to gone nodes by exact id
    pub fn position(&self, id: &str) -> Option<usize> {
        self.resolve(id)
            .or_else(|| self.nodes.iter().position(|n| n.is_gone() && n.id == id))
    }

    pub fn get(&self, id: &str) -> Option<&PackageNode> {
        self.position(id).map(|i| &self.nodes[i])
    }

    /// Like [`get`](Self::get), failing with [`Error::PackageNotFound`]
    pub fn require(&self, id: &str) -> Result<&PackageNode> {
        self.get(id)
            .ok_or_else(|| Error::PackageNotFound(id.to_string()))
    }

    pub fn node_at(&self, index: usize) -> &PackageNode {
        &self.nodes[index]
    }

    pub(crate) fn node_at_mut(&mut self, index: usize) -> &mut PackageNode {
        &mut self.nodes[index]
    }

    pub fn find_by_name(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    pub fn set_category(&mut self, index: usize, category: Option<Category>) {
        self.nodes[index].category = category;
    }

    pub fn set_side(&mut self, index: usize, side: Option<Side>) {
        self.nodes[index].side = side;
    }

    /// Add a node for a package that only exists in a previous report.
    /// Gone nodes are never indexed, so edges never resolve to them.
    pub fn push_gone(&mut self, mut node: PackageNode) {
        if node.gone.is_none() {
            node.gone = Some(GoneRecord::default());
        }
        node.active = false;
        node.dependencies.clear();
        node.dependents.clear();
        self.nodes.push(node);
    }

    /// Recompute every dependents list from the forward edges
    pub fn rebuild_dependents(&mut self) {
        for node in &mut self.nodes {
            node.dependents.clear();
        }

        let mut reverse: Vec<(usize, Dependent)> = Vec::new();
        for node in &self.nodes {
            if node.is_gone() {
                continue;
            }
            for edge in &node.dependencies {
                if let Some(target) = self.resolve(&edge.target) {
                    reverse.push((
                        target,
                        Dependent {
                            id: node.id.clone(),
                            kind: edge.kind,
                        },
                    ));
                }
            }
        }

        for (target, dependent) in reverse {
            self.nodes[target].dependents.push(dependent);
        }
    }

    /// Unresolved and disabled mandatory dependencies of active nodes
    pub fn check_dependencies(&self) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();

        for node in self.nodes.iter().filter(|n| n.is_present() && n.active) {
            for edge in node.mandatory_dependencies() {
                match self.resolve(&edge.target) {
                    None => diagnostics.push(Diagnostic::UnresolvedMandatoryDependency {
                        node: format!("{} ({})", node.name, node.id),
                        dependency: edge.target.clone(),
                    }),
                    Some(target) if !self.nodes[target].active => {
                        diagnostics.push(Diagnostic::DisabledMandatoryDependency {
                            node: format!("{} ({})", node.name, node.id),
                            dependency: edge.target.clone(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }

        diagnostics
    }

    /// Optional edges of a node with no matching present package
    pub fn unsatisfied_optional<'a>(&'a self, node: &'a PackageNode) -> Vec<&'a DependencyEdge> {
        node.optional_dependencies()
            .filter(|edge| self.resolve(&edge.target).is_none())
            .collect()
    }

    /// Every unsatisfied optional target across the graph, sorted and deduplicated
    pub fn unsatisfied_optional_targets(&self) -> Vec<String> {
        let mut targets: Vec<String> = self
            .nodes
            .iter()
            .filter(|n| n.is_present())
            .flat_map(|n| self.unsatisfied_optional(n))
            .map(|edge| edge.target.clone())
            .collect();
        targets.sort();
        targets.dedup();
        targets
    }

    /// Distinct category labels as rendered, in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for category in self.nodes.iter().filter_map(|n| n.category.as_ref()) {
            let label = category.to_string();
            if !out.contains(&label) {
                out.push(label);
            }
        }
        out
    }

    /// Give nodes sharing a display name unique names, `name (id)`
    fn disambiguate_names(&mut self, diagnostics: &mut Diagnostics) {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        let mut order: Vec<String> = Vec::new();
        for (i, node) in self.nodes.iter().enumerate() {
            let entry = by_name.entry(node.name.clone()).or_default();
            if entry.is_empty() {
                order.push(node.name.clone());
            }
            entry.push(i);
        }

        for name in order {
            let positions = &by_name[&name];
            if positions.len() < 2 {
                continue;
            }
            let ids = positions.iter().map(|&i| self.nodes[i].id.clone()).collect();
            diagnostics.push(Diagnostic::DuplicateName {
                name: name.clone(),
                ids,
            });
            for &i in positions {
                let node = &mut self.nodes[i];
                node.name = format!("{} ({})", node.name, node.id);
            }
        }
    }
}
