use std::path::Path;

use anyhow::{bail, Result};

use crate::registry::{build_registry, install_order, SkillRegistry};

pub fn run(path: &str, order_only: bool) -> Result<()> {
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

    let order = install_order(&registry);

    if order_only {
        println!("Installation order:");
        for (i, id) in order.iter().enumerate() {
            println!("{}. {}", i + 1, id);
        }
        return Ok(());
    }

    print_dependency_tree(&registry, &order);
    print_install_instructions(&registry, &order);
    Ok(())
}

fn print_dependency_tree(registry: &SkillRegistry, order: &[String]) {
    println!("\n{}", "=".repeat(70));
    println!("SKILL CHAIN DEPENDENCY ANALYSIS");
    println!("{}\n", "=".repeat(70));

    for (i, id) in order.iter().enumerate() {
        let Some(skill) = registry.get(id) else {
            continue;
        };

        let marker = if skill.is_foundation {
            "🔷 FOUNDATION"
        } else {
            "◆"
        };
        println!("{} [{:02}] {}", marker, skill.rank, skill.id);
        println!("    Name: {}", skill.name);

        if skill.prerequisites.is_empty() {
            println!("    Prerequisites: None");
        } else {
            println!("    Prerequisites: {}", skill.prerequisites.join(", "));
        }

        if !skill.description.is_empty() {
            println!("    Description: {}", truncate(&skill.description, 100));
        }

        if i < order.len() - 1 {
            println!("    ↓");
        }
        println!();
    }
}

fn print_install_instructions(registry: &SkillRegistry, order: &[String]) {
    println!("{}", "=".repeat(70));
    println!("RECOMMENDED INSTALLATION ORDER");
    println!("{}\n", "=".repeat(70));
    println!("Install skills in this order to satisfy dependencies:\n");

    for (i, id) in order.iter().enumerate() {
        let status = match registry.get(id) {
            Some(skill) if skill.is_foundation => "REQUIRED",
            _ => "OPTIONAL",
        };
        println!("{}. install {}.skill  # {}", i + 1, id, status);
    }

    if !registry.skipped().is_empty() {
        println!("\nExcluded from the registry (no usable manifest):");
        for dir in registry.skipped() {
            println!("  - {}", dir);
        }
    }

    println!("\n{}", "-".repeat(70));
    println!("NOTE: Foundation skills (00_*) are required by dependent skills.");
    println!("You can skip optional skills if you don't need their functionality.");
    println!("{}\n", "-".repeat(70));
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_skill(root: &Path, dir: &str, name: &str, prereqs: &str) {
        let skill = root.join(dir);
        fs::create_dir_all(&skill).unwrap();
        let body = if prereqs.is_empty() {
            String::from("## Overview\n\nA foundation skill.\n")
        } else {
            format!("## Prerequisites\n\n{}\n\n## Overview\n\nBuilds on earlier skills.\n", prereqs)
        };
        fs::write(
            skill.join("SKILL.md"),
            format!("---\nname: {}\ndescription: test skill\n---\n\n{}", name, body),
        )
        .unwrap();
    }

    #[test]
    fn test_run_missing_directory() {
        let result = run("/tmp/nonexistent-skillchain-order-dir", false);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("does not exist"));
    }

    #[test]
    fn test_run_empty_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = run(dir.path().to_str().unwrap(), false);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("No skills found"));
    }

    #[test]
    fn test_run_prints_order() {
        let dir = tempfile::TempDir::new().unwrap();
        write_skill(dir.path(), "00_foundation", "foundation", "");
        write_skill(dir.path(), "01_advanced", "advanced", "- 00_foundation");

        assert!(run(dir.path().to_str().unwrap(), false).is_ok());
        assert!(run(dir.path().to_str().unwrap(), true).is_ok());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("0123456789abc", 10), "0123456789...");
    }
}
