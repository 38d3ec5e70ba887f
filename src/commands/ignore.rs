use anyhow::Result;
use modgraph::{Config, IgnoreList};
use std::path::Path;

pub fn run(root: &Path, id: String) -> Result<()> {
    let config = Config::load(root)?;
    let path = config.ignore_list_path();
    let mut list = IgnoreList::load(&path)?;

    if list.add(&id)? {
        println!("✓ Added {} to {}", id, path.display());
    } else {
        println!("{} is already ignored", id);
    }

    Ok(())
}
