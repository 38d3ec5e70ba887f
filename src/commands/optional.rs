use anyhow::Result;
use modgraph::{analysis, Config};
use std::path::Path;

pub fn run(root: &Path) -> Result<()> {
    let config = Config::load(root)?;
    let (graph, _) = analysis::scan(&config, None)?;

    let targets = graph.unsatisfied_optional_targets();
    if targets.is_empty() {
        println!("✓ All optional dependencies are satisfied");
        return Ok(());
    }

    println!("{} unsatisfied optional dependencies:", targets.len());
    for target in &targets {
        let wanted_by: Vec<&str> = graph
            .nodes()
            .iter()
            .filter(|n| {
                n.is_present()
                    && graph
                        .unsatisfied_optional(n)
                        .iter()
                        .any(|edge| &edge.target == target)
            })
            .map(|n| n.id.as_str())
            .collect();
        println!("  {} (wanted by {})", target, wanted_by.join(", "));
    }
    println!();
    println!("Use 'modgraph ignore <id>' to hide one from now on.");

    Ok(())
}
