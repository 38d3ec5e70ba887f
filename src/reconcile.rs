//! State reconciliation against the previous report
//!
//! The report written by the previous run carries curated data (category and
//! side) that cannot be derived from the archives. Rows are matched to the
//! freshly built graph by display name; rows with no matching package become
//! gone nodes that keep their rendered dependency columns verbatim.

use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::graph::{Category, GoneRecord, Loaders, ModGraph, PackageNode, Side};
use regex::Regex;

/// Number of columns in a report row
pub const REPORT_COLUMNS: usize = 9;

/// One table row of a previous report, cells trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    /// 1-based line number in the report
    pub line: usize,
    pub status: String,
    pub loaders: String,
    pub id: String,
    pub parent: Option<String>,
    pub name: String,
    pub link: Option<String>,
    pub side: String,
    pub category: String,
    pub raw_dependents: String,
    pub raw_dependencies: String,
    pub raw_optional: String,
}

/// Outcome of [`reconcile`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    /// Rows matched to a present package
    pub recovered: usize,
    /// Names of the gone nodes that were injected
    pub gone: Vec<String>,
}

/// Escape `|` so a value can sit inside a table cell
pub fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn unescape_cell(text: &str) -> String {
    text.replace("\\|", "|")
}

/// Split a table line into trimmed cells, honouring `\|` escapes
fn split_cells(line: &str) -> Vec<String> {
    let body = line.trim();
    let body = body.strip_prefix('|').unwrap_or(body);
    let body = body.strip_suffix('|').unwrap_or(body);

    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('\\');
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current).trim().to_string()),
            _ => current.push(c),
        }
    }
    cells.push(current.trim().to_string());
    cells
}

/// Parse the table rows of a previous report.
///
/// Lines starting with `|` form the table; the first two (header and
/// separator) are skipped. Rows with too few cells are reported and ignored.
pub fn parse_report(text: &str) -> (Vec<ReportRow>, Diagnostics) {
    let mut rows = Vec::new();
    let mut diagnostics = Diagnostics::new();
    let link_pattern = Regex::new(r"^\[(.*)\]\(([^()]*)\)$").ok();

    let table = text
        .lines()
        .enumerate()
        .filter(|(_, line)| line.starts_with('|'))
        .skip(2);

    for (i, line) in table {
        let cells = split_cells(line);
        if cells.len() < REPORT_COLUMNS {
            diagnostics.push(Diagnostic::ReportRowSkipped {
                line: i + 1,
                reason: format!("expected {} cells, found {}", REPORT_COLUMNS, cells.len()),
            });
            continue;
        }

        let (parent, id) = match cells[2].split_once(" > ") {
            Some((parent, id)) => (Some(parent.trim().to_string()), id.trim().to_string()),
            None => (None, cells[2].clone()),
        };

        let (name, link) = match link_pattern.as_ref().and_then(|re| re.captures(&cells[3])) {
            Some(caps) => (unescape_cell(&caps[1]), Some(caps[2].to_string())),
            None => (unescape_cell(&cells[3]), None),
        };

        if name.is_empty() {
            diagnostics.push(Diagnostic::ReportRowSkipped {
                line: i + 1,
                reason: "empty name".to_string(),
            });
            continue;
        }

        rows.push(ReportRow {
            line: i + 1,
            status: cells[0].clone(),
            loaders: cells[1].clone(),
            id,
            parent,
            name,
            link,
            side: cells[4].clone(),
            category: cells[5].clone(),
            raw_dependents: cells[6].clone(),
            raw_dependencies: cells[7].clone(),
            raw_optional: cells[8].clone(),
        });
    }

    (rows, diagnostics)
}

impl ReportRow {
    fn into_gone_node(self) -> PackageNode {
        PackageNode {
            id: self.id,
            name: self.name,
            archive: None,
            active: false,
            loaders: Loaders::from_label(&self.loaders),
            link: self.link,
            side: Side::parse(&self.side),
            side_hint: None,
            category: Category::parse(&self.category),
            parent: self.parent,
            dependencies: Vec::new(),
            dependents: Vec::new(),
            gone: Some(GoneRecord {
                raw_dependents: self.raw_dependents,
                raw_dependencies: self.raw_dependencies,
                raw_optional: self.raw_optional,
            }),
        }
    }
}

/// Copy curated category and side onto matching present nodes, and inject a
/// gone node for every row whose name matches nothing.
pub fn reconcile(graph: &mut ModGraph, rows: Vec<ReportRow>) -> ReconcileSummary {
    let mut summary = ReconcileSummary::default();

    for row in rows {
        let matched = graph
            .nodes()
            .iter()
            .position(|n| n.is_present() && n.name == row.name);

        match matched {
            Some(index) => {
                graph.set_category(index, Category::parse(&row.category));
                graph.set_side(index, Side::parse(&row.side));
                summary.recovered += 1;
            }
            None => {
                tracing::debug!(name = %row.name, line = row.line, "marking as gone");
                summary.gone.push(row.name.clone());
                graph.push_gone(row.into_gone_node());
            }
        }
    }

    tracing::info!(
        recovered = summary.recovered,
        gone = summary.gone.len(),
        "reconciled previous report"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::{build, record};
    use crate::graph::SideKind;

    const PREVIOUS: &str = "# Pack

> Auto-generated at 2024-01-01 00:00:00

| | Modloader | Mod ID | Name | Side | Category | Dependents | Deps (no libs) | Opt. Deps (unsatisfied) |
|---|---|---|---|---|---|---|---|---|
| ✅ | Forge | a | [A](https://modrinth.com/mod/a) | client? | Library? | `b` | | `0` satisfied |
| ✅ | Forge | b | B | both | Tech | | `a` | |
| ❌ | Fabric | old | [Old \\| Legacy](https://www.curseforge.com/projects/1) | server | Utility | `x`, `y?` | `z` | `2` (`1` uns.: `q`) |
| broken |
";

    #[test]
    fn test_parse_report_rows() {
        let (rows, diags) = parse_report(PREVIOUS);
        assert_eq!(rows.len(), 3);
        assert_eq!(diags.len(), 1);

        assert_eq!(rows[0].name, "A");
        assert_eq!(rows[0].link.as_deref(), Some("https://modrinth.com/mod/a"));
        assert_eq!(rows[0].category, "Library?");

        assert_eq!(rows[2].name, "Old | Legacy");
        assert_eq!(rows[2].raw_dependents, "`x`, `y?`");
        assert_eq!(rows[2].raw_optional, "`2` (`1` uns.: `q`)");
    }

    #[test]
    fn test_parse_qualified_id() {
        let text = "| h |\n|---|\n| ✅ | Fabric | outer > inner | Inner | N/A | Library? | | | |\n";
        let (rows, _) = parse_report(text);
        assert_eq!(rows[0].id, "inner");
        assert_eq!(rows[0].parent.as_deref(), Some("outer"));
    }

    #[test]
    fn test_reconcile_recovers_and_marks_gone() {
        let (mut graph, _) = build(vec![record("a", &[]), record("b", &[])]);
        let (rows, _) = parse_report(PREVIOUS);

        let summary = reconcile(&mut graph, rows);
        assert_eq!(summary.recovered, 2);
        assert_eq!(summary.gone, vec!["Old | Legacy".to_string()]);

        let a = graph.get("a").unwrap();
        assert_eq!(a.category.as_ref().unwrap().to_string(), "Library?");
        let side = a.side.unwrap();
        assert_eq!(side.kind, SideKind::Client);
        assert!(side.uncertain);

        let old = graph.get("old").unwrap();
        assert!(old.is_gone());
        assert!(!old.active);
        assert!(old.loaders.fabric);
        assert_eq!(old.gone.as_ref().unwrap().raw_dependencies, "`z`");
        assert!(old.dependencies.is_empty());
        // gone nodes never satisfy edges
        assert!(graph.resolve("old").is_none());
    }

    #[test]
    fn test_split_cells_keeps_escapes() {
        let cells = split_cells("| a \\| b | c |");
        assert_eq!(cells, vec!["a \\| b".to_string(), "c".to_string()]);
    }
}
