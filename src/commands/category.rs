use super::print_toggle_outcome;
use crate::CategoryAction;
use anyhow::Result;
use modgraph::{analysis, set_active, Config, FsRenamer};
use std::path::Path;

pub fn run(root: &Path, name: String, action: CategoryAction) -> Result<()> {
    let config = Config::load(root)?;
    let mut result = analysis::analyze(&config, None)?;

    let categories = result.graph.categories();
    if !categories.contains(&name) {
        println!("⚠ Category \"{}\" not found.", name);
        if !categories.is_empty() {
            println!();
            println!("Available categories:");
            for category in &categories {
                println!("  {}", category);
            }
        }
        return Ok(());
    }

    let members: Vec<(String, String, bool)> = result
        .graph
        .nodes()
        .iter()
        .filter(|n| n.category.as_ref().is_some_and(|c| c.to_string() == name))
        .map(|n| (n.id.clone(), n.name.clone(), n.active))
        .collect();

    match action {
        CategoryAction::List => {
            println!("Category \"{}\" has {} mods:", name, members.len());
            for (id, display, active) in &members {
                let mark = if *active { "✓" } else { "✗" };
                println!("  {} {} ({})", mark, display, id);
            }
        }
        CategoryAction::Enable | CategoryAction::Disable => {
            let enabled = matches!(action, CategoryAction::Enable);
            println!(
                "{} category \"{}\"...",
                if enabled { "Enabling" } else { "Disabling" },
                name
            );

            let mut renamer = FsRenamer::new(config.mods_dir());
            for (id, _, _) in &members {
                let outcome = set_active(&mut result.graph, &mut renamer, id, enabled)?;
                print_toggle_outcome(&outcome, enabled);
            }
        }
    }

    Ok(())
}
