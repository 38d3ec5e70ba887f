use super::print_toggle_outcome;
use anyhow::Result;
use modgraph::{analysis, set_active, Config, DryRunRenamer, FsRenamer};
use std::path::Path;

pub fn run(root: &Path, id: String, enabled: bool, dry_run: bool) -> Result<()> {
    let config = Config::load(root)?;
    let (mut graph, _) = analysis::scan(&config, None)?;

    let verb = if enabled { "Enabling" } else { "Disabling" };
    if dry_run {
        println!("{} {} (dry run)...", verb, id);
    } else {
        println!("{} {}...", verb, id);
    }

    if dry_run {
        let mut renamer = DryRunRenamer::default();
        let outcome = set_active(&mut graph, &mut renamer, &id, enabled)?;
        print_toggle_outcome(&outcome, enabled);
        for (from, to) in &renamer.renames {
            println!("  would rename {} -> {}", from, to);
        }
        return Ok(());
    }

    let mut renamer = FsRenamer::new(config.mods_dir());
    let outcome = set_active(&mut graph, &mut renamer, &id, enabled)?;
    print_toggle_outcome(&outcome, enabled);

    if !outcome.is_no_op() {
        println!();
        println!(
            "✓ {} mod{} changed",
            outcome.changed.len(),
            if outcome.changed.len() == 1 { "" } else { "s" }
        );
        println!("  Run 'modgraph report' to refresh the report.");
    }

    Ok(())
}
