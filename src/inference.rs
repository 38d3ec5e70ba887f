//! Category and side inference for packages without curated data
//!
//! Categories are assigned by the first matching rule:
//!
//! 1. dependents but no mandatory dependencies, or a library marker in the
//!    identifier or name: `Library?`
//! 2. a fix marker in the name: `Fix?`
//! 3. bundled inside another package: `Library?`
//! 4. mandatory dependencies but no dependents: one distinct non-library
//!    dependency category gives `Addon?`, two give `Integration?`
//! 5. a compat marker in the name: `Integration?`
//!
//! Everything inferred here is provisional, so a curated value recovered
//! from the previous report always takes precedence.

use crate::config::HeuristicsConfig;
use crate::graph::{Category, ModGraph, PackageNode, Side};

pub const LIBRARY: &str = "Library";
pub const FIX: &str = "Fix";
pub const ADDON: &str = "Addon";
pub const INTEGRATION: &str = "Integration";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InferenceSummary {
    /// Nodes that received a provisional category
    pub inferred: usize,
    /// Nodes still without a category
    pub missing: usize,
}

fn contains_any(haystack: &str, markers: &[String]) -> bool {
    let haystack = haystack.to_lowercase();
    markers
        .iter()
        .filter(|m| !m.is_empty())
        .any(|m| haystack.contains(&m.to_lowercase()))
}

/// Category for one node under the given heuristics, if any rule applies
pub fn infer_category(
    graph: &ModGraph,
    node: &PackageNode,
    heuristics: &HeuristicsConfig,
) -> Option<Category> {
    let mandatory = node.mandatory_dependencies().count();
    let identity = format!("{} {}", node.id, node.name);

    if (!node.dependents.is_empty() && mandatory == 0) || contains_any(&identity, &heuristics.library)
    {
        return Some(Category::provisional(LIBRARY));
    }
    if contains_any(&node.name, &heuristics.fix) {
        return Some(Category::provisional(FIX));
    }
    if node.is_bundled() {
        return Some(Category::provisional(LIBRARY));
    }
    if mandatory > 0 && node.dependents.is_empty() {
        // Unresolved and uncategorized dependencies count as one shared value.
        // Only confirmed libraries are left out.
        let mut labels: Vec<Option<&str>> = Vec::new();
        for edge in node.mandatory_dependencies() {
            let category = graph
                .resolve(&edge.target)
                .and_then(|target| graph.node_at(target).category.as_ref());
            if category.is_some_and(|c| !c.provisional && c.is_library()) {
                continue;
            }
            let label = category.map(|c| c.label.as_str());
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        match labels.len() {
            1 => return Some(Category::provisional(ADDON)),
            2 => return Some(Category::provisional(INTEGRATION)),
            _ => {}
        }
    }
    if contains_any(&node.name, &heuristics.compat) {
        return Some(Category::provisional(INTEGRATION));
    }
    None
}

/// Assign provisional categories to present nodes that have none.
///
/// Nodes are visited in graph order and see the categories assigned to
/// earlier nodes in the same pass.
pub fn infer_categories(graph: &mut ModGraph, heuristics: &HeuristicsConfig) -> InferenceSummary {
    let mut summary = InferenceSummary::default();

    for index in 0..graph.len() {
        let node = graph.node_at(index);
        if node.is_gone() || node.category.is_some() {
            continue;
        }
        if let Some(category) = infer_category(graph, node, heuristics) {
            tracing::debug!(id = %node.id, category = %category, "inferred category");
            graph.set_category(index, Some(category));
            summary.inferred += 1;
        }
    }

    summary.missing = graph.nodes().iter().filter(|n| n.category.is_none()).count();
    summary
}

/// Fill in uncertain sides from the pack metadata hint. Bundled nodes never
/// carry a side. Returns how many present top-level nodes still have none.
pub fn infer_sides(graph: &mut ModGraph) -> usize {
    for index in 0..graph.len() {
        let node = graph.node_at(index);
        if node.is_gone() || node.side.is_some() {
            continue;
        }
        if node.is_bundled() {
            graph.set_side(index, None);
            continue;
        }
        let side = node.side_hint.as_deref().and_then(Side::parse).map(|mut side| {
            side.uncertain = true;
            side
        });
        if side.is_some() {
            graph.set_side(index, side);
        }
    }

    graph
        .nodes()
        .iter()
        .filter(|n| n.is_present() && !n.is_bundled() && n.side.is_none())
        .count()
}
