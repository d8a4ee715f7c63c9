//! Integration tests for registry building, ordering, and consistency
//! checking over on-disk skill trees.

use std::fs;
use std::path::Path;

use skillchain::registry::{
    build_registry, check_prerequisites, check_rank_order, install_order,
};

fn write_skill(root: &Path, dir: &str, name: &str, body: &str) {
    let skill = root.join(dir);
    fs::create_dir_all(&skill).unwrap();
    fs::write(
        skill.join("SKILL.md"),
        format!(
            "---\nname: {}\ndescription: A test skill for registry building\n---\n\n{}",
            name, body
        ),
    )
    .unwrap();
}

#[test]
fn test_two_skill_chain_orders_and_resolves() {
    let dir = tempfile::TempDir::new().unwrap();
    write_skill(
        dir.path(),
        "00-foundation",
        "foundation",
        "## Overview\n\nA foundation skill with no prerequisites.\n",
    );
    write_skill(
        dir.path(),
        "01-advanced",
        "advanced",
        "## Prerequisites\n\nRequires **00-foundation** first.\n\n## Overview\n\nText.\n",
    );

    let registry = build_registry(dir.path()).unwrap();
    assert_eq!(registry.len(), 2);

    assert_eq!(install_order(&registry), vec!["00-foundation", "01-advanced"]);
    assert!(check_prerequisites(&registry).is_empty());

    let advanced = registry.get("01-advanced").unwrap();
    assert_eq!(advanced.prerequisites, vec!["00-foundation"]);
    assert!(!advanced.is_foundation);
    assert!(registry.get("00-foundation").unwrap().is_foundation);
}

#[test]
fn test_unresolved_prerequisite_reported_once() {
    let dir = tempfile::TempDir::new().unwrap();
    write_skill(
        dir.path(),
        "00-foundation",
        "foundation",
        "## Overview\n\nBase.\n",
    );
    // The dangling reference appears twice; extraction dedups upstream.
    write_skill(
        dir.path(),
        "01-advanced",
        "advanced",
        "## Prerequisites\n\n- 00-missing for parsing\n- 00-missing again\n\n## Overview\n\nText.\n",
    );

    let registry = build_registry(dir.path()).unwrap();
    let missing = check_prerequisites(&registry);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].dependent, "01-advanced");
    assert_eq!(missing[0].prerequisite, "00-missing");
}

#[test]
fn test_directory_without_manifest_is_excluded() {
    let dir = tempfile::TempDir::new().unwrap();
    write_skill(dir.path(), "00_base", "base", "## Overview\n\nText.\n");
    fs::create_dir_all(dir.path().join("01_empty")).unwrap();

    let registry = build_registry(dir.path()).unwrap();
    assert_eq!(registry.len(), 1);
    assert!(!registry.contains("01_empty"));
    assert_eq!(registry.skipped(), ["01_empty".to_string()]);
}

#[test]
fn test_bad_skill_does_not_abort_the_walk() {
    let dir = tempfile::TempDir::new().unwrap();
    write_skill(dir.path(), "00_base", "base", "## Overview\n\nText.\n");

    // Unterminated frontmatter.
    let broken = dir.path().join("01_broken");
    fs::create_dir_all(&broken).unwrap();
    fs::write(broken.join("SKILL.md"), "---\nname: broken\nno closing\n").unwrap();

    // Header parses but has no name.
    let nameless = dir.path().join("02_nameless");
    fs::create_dir_all(&nameless).unwrap();
    fs::write(
        nameless.join("SKILL.md"),
        "---\ndescription: lacks a name\n---\n\n## Overview\n",
    )
    .unwrap();

    write_skill(dir.path(), "03_later", "later", "## Overview\n\nText.\n");

    let registry = build_registry(dir.path()).unwrap();
    assert_eq!(registry.len(), 2);
    assert!(registry.contains("00_base"));
    assert!(registry.contains("03_later"));
    assert_eq!(
        registry.skipped(),
        ["01_broken".to_string(), "02_nameless".to_string()]
    );
}

#[test]
fn test_non_skill_directories_ignored() {
    let dir = tempfile::TempDir::new().unwrap();
    write_skill(dir.path(), "00_base", "base", "## Overview\n\nText.\n");
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::create_dir_all(dir.path().join("7_bad_prefix")).unwrap();
    fs::write(dir.path().join("README.md"), "not a directory").unwrap();

    let registry = build_registry(dir.path()).unwrap();
    assert_eq!(registry.len(), 1);
    // Non-matching names are not even candidates, so they are not "skipped".
    assert!(registry.skipped().is_empty());
}

#[test]
fn test_order_is_rank_monotone_permutation_of_keys() {
    let dir = tempfile::TempDir::new().unwrap();
    for (d, n) in [
        ("03_three", "three"),
        ("00_zero", "zero"),
        ("02_two", "two"),
        ("01_one", "one"),
    ] {
        write_skill(dir.path(), d, n, "## Overview\n\nText.\n");
    }

    let registry = build_registry(dir.path()).unwrap();
    let order = install_order(&registry);

    assert_eq!(order.len(), registry.len());
    for id in registry.ids() {
        assert!(order.iter().any(|o| o == id));
    }
    let ranks: Vec<u32> = order
        .iter()
        .map(|id| registry.get(id).unwrap().rank)
        .collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_registry_build_is_idempotent() {
    let dir = tempfile::TempDir::new().unwrap();
    write_skill(dir.path(), "00_base", "base", "## Overview\n\nText.\n");
    write_skill(
        dir.path(),
        "01_next",
        "next",
        "## Prerequisites\n\n- 00_base\n\n## Overview\n\nText.\n",
    );

    let first = build_registry(dir.path()).unwrap();
    let second = build_registry(dir.path()).unwrap();

    let a: Vec<_> = first.iter().collect();
    let b: Vec<_> = second.iter().collect();
    assert_eq!(a, b);
    assert_eq!(first.skipped(), second.skipped());
}

#[test]
fn test_foundation_phrase_fallback() {
    let dir = tempfile::TempDir::new().unwrap();
    // Rank 3, but the body declares "no prerequisites" explicitly.
    write_skill(
        dir.path(),
        "03_standalone",
        "standalone",
        "## Overview\n\nThis one has no prerequisites at all.\n",
    );

    let registry = build_registry(dir.path()).unwrap();
    assert!(registry.get("03_standalone").unwrap().is_foundation);
}

#[test]
fn test_rank_inversion_detected_on_disk() {
    let dir = tempfile::TempDir::new().unwrap();
    write_skill(
        dir.path(),
        "01_early",
        "early",
        "## Prerequisites\n\n- 02_late\n\n## Overview\n\nText.\n",
    );
    write_skill(dir.path(), "02_late", "late", "## Overview\n\nText.\n");

    let registry = build_registry(dir.path()).unwrap();
    let inversions = check_rank_order(&registry);
    assert_eq!(inversions.len(), 1);
    assert_eq!(inversions[0].dependent, "01_early");
    assert_eq!(inversions[0].prerequisite, "02_late");
    assert_eq!(inversions[0].dependent_rank, 1);
    assert_eq!(inversions[0].prerequisite_rank, 2);
}
