//! Markdown report rendering
//!
//! The report is a header followed by one table row per package:
//!
//! ```text
//! | | Modloader | Mod ID | Name | Side | Category | Dependents | Deps (no libs) | Opt. Deps (unsatisfied) |
//! ```
//!
//! Column widths follow the widest cell of each run. The column order and
//! cell syntax are read back by [`crate::reconcile::parse_report`], so the
//! two must change together.

use crate::graph::{ModGraph, PackageNode};
use crate::reconcile::escape_cell;
use chrono::{DateTime, Local};
use std::cmp::Ordering;

/// Dependents cells longer than this collapse to a count
pub const DEPENDENTS_CELL_LIMIT: usize = 30;

/// Dependencies cells longer than this collapse to a count
pub const DEPENDENCIES_CELL_LIMIT: usize = 20;

/// Unsatisfied optional dependencies listed before eliding the rest
pub const UNSATISFIED_LISTED: usize = 10;

const COLUMN_TITLES: [&str; 9] = [
    "",
    "Modloader",
    "Mod ID",
    "Name",
    "Side",
    "Category",
    "Dependents",
    "Deps (no libs)",
    "Opt. Deps (unsatisfied)",
];

/// Run-level values shown in the report header
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub title: String,
    pub generated_at: DateTime<Local>,
    /// Nodes that received a provisional category this run
    pub auto_categorized: usize,
}

impl ReportContext {
    pub fn new(title: &str, auto_categorized: usize) -> Self {
        Self {
            title: title.to_string(),
            generated_at: Local::now(),
            auto_categorized,
        }
    }
}

fn quoted(id: &str) -> String {
    format!("`{}`", id)
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn sort_name(node: &PackageNode) -> String {
    match &node.parent {
        Some(parent) => format!("{} > {}", parent, node.name),
        None => node.name.clone(),
    }
}

/// Present before gone, uncategorized or provisional before confirmed, then
/// by category and name.
pub fn compare_nodes(a: &PackageNode, b: &PackageNode) -> Ordering {
    let confirmed = |n: &PackageNode| n.category.as_ref().is_some_and(|c| !c.provisional);

    a.is_gone()
        .cmp(&b.is_gone())
        .then_with(|| confirmed(a).cmp(&confirmed(b)))
        .then_with(|| match (&a.category, &b.category) {
            (Some(x), Some(y)) => compare_text(&x.to_string(), &y.to_string())
                .then_with(|| compare_text(&a.name, &b.name)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => compare_text(&sort_name(a), &sort_name(b)),
        })
}

fn status_cell(node: &PackageNode) -> String {
    if node.is_gone() {
        "❓".to_string()
    } else if node.active {
        "✅".to_string()
    } else {
        "❌".to_string()
    }
}

fn name_cell(node: &PackageNode) -> String {
    match &node.link {
        Some(link) => format!("[{}]({})", escape_cell(&node.name), link),
        None => escape_cell(&node.name),
    }
}

fn side_cell(node: &PackageNode) -> String {
    if node.is_bundled() && node.is_present() {
        return "N/A".to_string();
    }
    node.side.map(|s| s.to_string()).unwrap_or_default()
}

fn dependents_cell(node: &PackageNode) -> String {
    if let Some(gone) = &node.gone {
        return gone.raw_dependents.clone();
    }
    let text = node
        .dependents
        .iter()
        .map(|d| quoted(&d.to_string()))
        .collect::<Vec<_>>()
        .join(", ");
    if text.chars().count() <= DEPENDENTS_CELL_LIMIT {
        text
    } else {
        format!("{} dependents", node.dependents.len())
    }
}

fn dependencies_cell(graph: &ModGraph, node: &PackageNode) -> String {
    if let Some(gone) = &node.gone {
        return gone.raw_dependencies.clone();
    }
    let text = node
        .mandatory_dependencies()
        .filter(|edge| {
            graph.resolve(&edge.target).is_some_and(|i| {
                graph
                    .node_at(i)
                    .category
                    .as_ref()
                    .map_or(true, |c| c.provisional || !c.is_library())
            })
        })
        .map(|edge| quoted(&edge.target))
        .collect::<Vec<_>>()
        .join(", ");
    if text.chars().count() <= DEPENDENCIES_CELL_LIMIT {
        text
    } else {
        format!("{} dependencies", node.mandatory_dependencies().count())
    }
}

fn optional_cell(graph: &ModGraph, node: &PackageNode) -> String {
    if let Some(gone) = &node.gone {
        return gone.raw_optional.clone();
    }
    let total = node.optional_dependencies().count();
    if total == 0 {
        return String::new();
    }

    let unsatisfied = graph.unsatisfied_optional(node);
    if unsatisfied.is_empty() {
        return format!("{} satisfied", quoted(&total.to_string()));
    }

    let listed = unsatisfied
        .iter()
        .take(UNSATISFIED_LISTED)
        .map(|edge| quoted(&edge.target))
        .collect::<Vec<_>>()
        .join(", ");
    let more = if unsatisfied.len() > UNSATISFIED_LISTED {
        "..."
    } else {
        ""
    };
    format!(
        "{} ({} uns.: {}{})",
        quoted(&total.to_string()),
        quoted(&unsatisfied.len().to_string()),
        listed,
        more
    )
}

fn row_cells(graph: &ModGraph, node: &PackageNode) -> [String; 9] {
    [
        status_cell(node),
        node.loaders.label(),
        node.qualified_id(),
        name_cell(node),
        side_cell(node),
        node.category.as_ref().map(|c| c.to_string()).unwrap_or_default(),
        dependents_cell(node),
        dependencies_cell(graph, node),
        optional_cell(graph, node),
    ]
}

fn pad(cell: &str, width: usize) -> String {
    let mut out = format!(" {}", cell);
    let len = out.chars().count();
    if len < width {
        out.push_str(&" ".repeat(width - len));
    }
    out
}

/// Header lines, blank-line separated
fn header(graph: &ModGraph, ctx: &ReportContext) -> String {
    let nodes = graph.nodes();
    let disabled = nodes.iter().filter(|n| n.is_present() && !n.active).count();
    let gone = nodes.iter().filter(|n| n.is_gone()).count();
    let uncategorized = nodes.iter().filter(|n| n.category.is_none()).count();

    let mut lines = vec![
        format!("# {}", ctx.title),
        format!(
            "> Auto-generated at {}",
            ctx.generated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        format!(
            "`{}` mods (`{}` disabled, `{}` gone)",
            nodes.len(),
            disabled,
            gone
        ),
    ];
    if uncategorized > 0 {
        lines.push(format!(
            "`{}` mods have no category (`{}` were auto-categorized)",
            uncategorized, ctx.auto_categorized
        ));
    }
    lines.push(String::new());
    lines.join("\n\n")
}

/// Render the whole report
pub fn render(graph: &ModGraph, ctx: &ReportContext) -> String {
    let mut nodes: Vec<&PackageNode> = graph.nodes().iter().collect();
    nodes.sort_by(|a, b| compare_nodes(a, b));

    let rows: Vec<[String; 9]> = nodes.iter().map(|n| row_cells(graph, n)).collect();

    let widths: Vec<usize> = COLUMN_TITLES
        .iter()
        .enumerate()
        .map(|(i, title)| {
            rows.iter()
                .map(|row| row[i].chars().count() + 2)
                .fold(title.chars().count() + 2, usize::max)
        })
        .collect();

    let mut out = header(graph, ctx);

    let titles: Vec<String> = COLUMN_TITLES
        .iter()
        .zip(&widths)
        .map(|(title, &w)| pad(title, w))
        .collect();
    out.push_str(&format!("|{}|\n", titles.join("|")));

    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    out.push_str(&format!("|{}|\n", rule.join("|")));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| pad(cell, w))
            .collect();
        out.push_str(&format!("|{}|\n", cells.join("|")));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{build, record};
    use crate::graph::{Category, EdgeKind::Mandatory, EdgeKind::Optional, GoneRecord};
    use crate::reconcile::{parse_report, reconcile};
    use chrono::TimeZone;

    fn context() -> ReportContext {
        ReportContext {
            title: "Test Pack".to_string(),
            generated_at: Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
            auto_categorized: 1,
        }
    }

    #[test]
    fn test_header_lines() {
        let mut off = record("off", &[]);
        off.active = false;
        let (graph, _) = build(vec![record("on", &[]), off]);

        let text = render(&graph, &context());
        assert!(text.starts_with(
            "# Test Pack\n\n> Auto-generated at 2024-05-01 12:30:00\n\n`2` mods (`1` disabled, `0` gone)\n\n"
        ));
        assert!(text.contains("`2` mods have no category (`1` were auto-categorized)"));
    }

    #[test]
    fn test_row_cells() {
        let mut linked = record("linked", &[("base", Mandatory), ("lib", Mandatory), ("absent", Optional), ("base2", Optional)]);
        linked.name = "Pipe | Name".to_string();
        linked.link = Some("https://modrinth.com/mod/linked".to_string());
        let (mut graph, _) = build(vec![
            linked,
            record("base", &[]),
            record("lib", &[]),
            record("base2", &[]),
        ]);
        let lib = graph.resolve("lib").unwrap();
        graph.set_category(lib, Some(Category::confirmed("Library")));

        let node = graph.get("linked").unwrap();
        let cells = row_cells(&graph, node);
        assert_eq!(cells[0], "✅");
        assert_eq!(cells[1], "Forge");
        assert_eq!(cells[3], "[Pipe \\| Name](https://modrinth.com/mod/linked)");
        assert_eq!(cells[7], "`base`");
        assert_eq!(cells[8], "`2` (`1` uns.: `absent`)");

        let base = graph.get("base").unwrap();
        assert_eq!(row_cells(&graph, base)[6], "`linked`");
        let base2 = graph.get("base2").unwrap();
        assert_eq!(row_cells(&graph, base2)[6], "`linked?`");
    }

    #[test]
    fn test_long_cells_collapse() {
        let ids = ["alpha", "bravo", "charlie", "delta", "echo"];
        let mut records: Vec<_> = ids.iter().map(|id| record(id, &[("hub", Mandatory)])).collect();
        records.push(record("hub", &[]));
        let deps: Vec<(&str, _)> = ids.iter().map(|id| (*id, Mandatory)).collect();
        records.push(record("big", &deps));
        let (graph, _) = build(records);

        let hub = graph.get("hub").unwrap();
        assert_eq!(row_cells(&graph, hub)[6], "5 dependents");
        let big = graph.get("big").unwrap();
        assert_eq!(row_cells(&graph, big)[7], "5 dependencies");
    }

    #[test]
    fn test_gone_columns_verbatim() {
        let (mut graph, _) = build(vec![record("a", &[])]);
        let mut gone = crate::graph::PackageNode::from_record(record("old", &[("a", Optional)]));
        gone.gone = Some(GoneRecord {
            raw_dependents: "`x`".to_string(),
            raw_dependencies: "3 dependencies".to_string(),
            raw_optional: "`4` (`2` uns.: `p`, `q`)".to_string(),
        });
        graph.push_gone(gone);

        let node = graph.get("old").unwrap();
        let cells = row_cells(&graph, node);
        assert_eq!(cells[0], "❓");
        assert_eq!(cells[6], "`x`");
        assert_eq!(cells[7], "3 dependencies");
        assert_eq!(cells[8], "`4` (`2` uns.: `p`, `q`)");
    }

    #[test]
    fn test_sort_order() {
        let (mut graph, _) = build(vec![
            record("zeta", &[]),
            record("beta", &[]),
            record("gamma", &[]),
            record("alpha", &[]),
        ]);
        let set = |g: &mut ModGraph, id: &str, c: Category| {
            let i = g.resolve(id).unwrap();
            g.set_category(i, Some(c));
        };
        set(&mut graph, "zeta", Category::confirmed("Tech"));
        set(&mut graph, "beta", Category::confirmed("Magic"));
        set(&mut graph, "gamma", Category::provisional("Library"));

        let mut nodes: Vec<_> = graph.nodes().iter().collect();
        nodes.sort_by(|a, b| compare_nodes(a, b));
        let order: Vec<_> = nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(order, vec!["gamma", "alpha", "beta", "zeta"]);
    }

    #[test]
    fn test_table_widths_consistent() {
        let (graph, _) = build(vec![record("a", &[]), record("longer-identifier", &[])]);
        let text = render(&graph, &context());
        let widths: Vec<usize> = text
            .lines()
            .filter(|l| l.starts_with('|'))
            .map(|l| l.chars().count())
            .collect();
        assert_eq!(widths.len(), 4);
        assert!(widths.iter().all(|w| *w == widths[0]));
    }

    #[test]
    fn test_round_trip_through_reconciler() {
        let mut bundled = record("inner", &[]);
        bundled.parent = Some("a".to_string());
        bundled.archive = "a.jar".to_string();
        let (mut graph, _) = build(vec![record("a", &[]), record("b", &[]), bundled]);
        let a = graph.resolve("a").unwrap();
        graph.set_category(a, Some(Category::provisional("Library")));
        graph.set_side(a, crate::graph::Side::parse("client?"));
        let b = graph.resolve("b").unwrap();
        graph.set_category(b, Some(Category::confirmed("Tech")));
        graph.set_side(b, crate::graph::Side::parse("both"));

        let text = render(&graph, &context());
        let (fresh, _) = build(vec![record("a", &[]), record("b", &[])]);
        let mut fresh = fresh;
        let (rows, diags) = parse_report(&text);
        assert!(diags.is_empty());
        let summary = reconcile(&mut fresh, rows);

        assert_eq!(summary.recovered, 2);
        assert_eq!(summary.gone, vec!["INNER".to_string()]);
        for id in ["a", "b"] {
            let before = graph.get(id).unwrap();
            let after = fresh.get(id).unwrap();
            assert_eq!(before.category, after.category);
            assert_eq!(before.side, after.side);
        }
        let inner = fresh.get("inner").unwrap();
        assert_eq!(inner.parent.as_deref(), Some("a"));
    }
}
