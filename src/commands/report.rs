use super::{create_spinner_callback, print_diagnostics, print_toggle_outcome};
use anyhow::Result;
use modgraph::{analysis, set_active, Config, FsRenamer, Severity};
use std::path::Path;

pub fn run(root: &Path, enable_missing: bool) -> Result<()> {
    let config = Config::load(root)?;

    println!("Scanning {}...", config.mods_dir().display());
    let mut result = analysis::analyze(&config, Some(create_spinner_callback()))?;

    let present = result.graph.nodes().iter().filter(|n| n.is_present()).count();
    println!("✓ Found {} mods", present);
    println!(
        "Recovered {} categories from previous report.",
        result.reconcile.recovered
    );
    if !result.reconcile.gone.is_empty() {
        println!(
            "Found {} mods in previous report that aren't on the current mod list. (Marking as gone)",
            result.reconcile.gone.len()
        );
    }

    let inference = result.inference;
    if inference.inferred > 0 || inference.missing > 0 {
        println!("New mods found!");
        println!("  - {} auto-categorized.", inference.inferred);
        println!("  - {} missing category.", inference.missing);
    }
    if result.missing_sides > 0 {
        println!("⚠ There are {} mods with no side set.", result.missing_sides);
    }

    print_diagnostics(&result.diagnostics, Severity::Warning);

    let disabled = result.diagnostics.disabled_dependencies();
    if !disabled.is_empty() {
        println!();
        if enable_missing {
            println!("Enabling {} required mods...", disabled.len());
            let mut renamer = FsRenamer::new(config.mods_dir());
            for id in &disabled {
                let outcome = set_active(&mut result.graph, &mut renamer, id, true)?;
                print_toggle_outcome(&outcome, true);
            }
        } else {
            println!(
                "⚠ {} disabled mods are required by enabled mods: {}",
                disabled.len(),
                disabled.join(", ")
            );
            println!("  Run 'modgraph report --enable-missing' to enable them.");
        }
    }

    let path = analysis::write_report(&config, &result)?;
    println!();
    println!("✓ Report written to {}", path.display());

    Ok(())
}
