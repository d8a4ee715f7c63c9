use std::path::Path;

use anyhow::{bail, Result};

use crate::registry::{build_registry, check_prerequisites, check_rank_order};

pub fn run(path: &str) -> Result<()> {
    let root = Path::new(path);
    if !root.exists() {
        bail!("Directory does not exist: {}", path);
    }
    if !root.is_dir() {
        bail!("Not a directory: {}", path);
    }

    let registry = build_registry(root)?;
    if registry.is_empty() {
        bail!("No skills found in {}", path);
    }

    let missing = check_prerequisites(&registry);
    let inversions = check_rank_order(&registry);

    if !missing.is_empty() {
        println!("⚠️  Missing prerequisites detected:");
        for issue in &missing {
            println!(
                "  {} requires {} (not found)",
                issue.dependent, issue.prerequisite
            );
        }
        println!();
    }

    if !inversions.is_empty() {
        println!("⚠️  Rank order violations (prerequisite should come earlier in the chain):");
        for inv in &inversions {
            println!(
                "  {} [{:02}] requires {} [{:02}]",
                inv.dependent, inv.dependent_rank, inv.prerequisite, inv.prerequisite_rank
            );
        }
        println!();
    }

    if !registry.skipped().is_empty() {
        println!("ℹ️  Excluded from the registry (no usable manifest):");
        for dir in registry.skipped() {
            println!("  - {}", dir);
        }
        println!();
    }

    if missing.is_empty() {
        println!(
            "✓ All prerequisites resolve across {} skill(s)",
            registry.len()
        );
    } else {
        bail!("{} unresolved prerequisite(s) found", missing.len());
    }

    Ok(())
}
