use crate::ListKind;
use anyhow::Result;
use modgraph::{analysis, Config, EdgeKind, ModGraph};
use std::path::Path;

pub fn run(root: &Path, kind: ListKind, id: String) -> Result<()> {
    let config = Config::load(root)?;
    let (graph, _) = analysis::scan(&config, None)?;

    let node = match graph.require(&id) {
        Ok(node) => node,
        Err(e) => {
            println!("✗ {}", e);
            return Ok(());
        }
    };

    match kind {
        ListKind::Dependents => {
            if node.dependents.is_empty() {
                println!("Mod {} has no dependents.", node.name);
                return Ok(());
            }
            println!("Mod {} has {} dependents:", node.name, node.dependents.len());
            for dependent in &node.dependents {
                let suffix = match dependent.kind {
                    EdgeKind::Mandatory => "",
                    EdgeKind::Optional => " (optional)",
                };
                println!("  {}{}", dependent.id, suffix);
            }
        }
        ListKind::Dependencies => {
            let deps: Vec<_> = node.mandatory_dependencies().collect();
            if deps.is_empty() {
                println!("Mod {} has no dependencies.", node.name);
                return Ok(());
            }
            println!("Mod {} has {} dependencies:", node.name, deps.len());
            for edge in deps {
                println!("  {} {}", status_mark(&graph, &edge.target), edge.target);
            }
        }
        ListKind::Optional => {
            let deps: Vec<_> = node.optional_dependencies().collect();
            if deps.is_empty() {
                println!("Mod {} has no optional dependencies.", node.name);
                return Ok(());
            }
            println!(
                "Mod {} has {} optional dependencies:",
                node.name,
                deps.len()
            );
            for edge in deps {
                println!("  {} {}", status_mark(&graph, &edge.target), edge.target);
            }
        }
    }

    Ok(())
}

/// ✓ present and enabled, ⚠ present but disabled, ✗ missing
fn status_mark(graph: &ModGraph, id: &str) -> &'static str {
    match graph.resolve(id).map(|i| graph.node_at(i).active) {
        Some(true) => "✓",
        Some(false) => "⚠",
        None => "✗",
    }
}
