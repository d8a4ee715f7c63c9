use std::path::Path;

use anyhow::{bail, Result};

use crate::validate::{Outcome, SkillValidator, ValidationReport};

pub fn run(path: &str, strict: bool, quiet: bool) -> Result<()> {
    let skill_path = Path::new(path);

    println!("Validating skill: {}", path);
    println!("{}\n", "=".repeat(60));

    let report = SkillValidator::new(skill_path).validate_all();
    print_report(&report, quiet);

    println!("{}", "=".repeat(60));
    match report.outcome(strict) {
        Outcome::Failed if report.error_count() > 0 => {
            bail!(
                "Validation FAILED: {} error(s), {} warning(s)",
                report.error_count(),
                report.warning_count()
            );
        }
        Outcome::Failed => {
            bail!(
                "Validation FAILED (strict mode): {} warning(s)",
                report.warning_count()
            );
        }
        Outcome::PassedWithWarnings => {
            println!(
                "⚠️  Validation passed with warnings: {} warning(s)",
                report.warning_count()
            );
        }
        Outcome::Passed => {
            println!("✓ Validation PASSED");
        }
    }

    Ok(())
}

fn print_report(report: &ValidationReport, quiet: bool) {
    if report.error_count() > 0 {
        println!("❌ ERRORS:");
        for finding in report.errors() {
            println!("  • {}", finding.message);
        }
        println!();
    }

    if report.warning_count() > 0 {
        println!("⚠️  WARNINGS:");
        for finding in report.warnings() {
            println!("  • {}", finding.message);
        }
        println!();
    }

    if !quiet {
        let info: Vec<_> = report.info().collect();
        if !info.is_empty() {
            println!("ℹ️  INFO:");
            for finding in info {
                println!("  ✓ {}", finding.message);
            }
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const VALID_MANIFEST: &str = "---\nname: data-extraction\ndescription: Extract structured data from semi-structured documents. Use when parsing logs, scraping tables, or normalizing exports.\n---\n\n## Overview\n\nText.\n\n## When to Use This Skill\n\nText.\n\n## Core Workflows\n\nText.\n\n## Prerequisites\n\nNone - foundation skill.\n";

    fn write_full_skill(root: &Path) -> std::path::PathBuf {
        let skill = root.join("00_data-extraction");
        for sub in ["scripts", "references", "assets"] {
            fs::create_dir_all(skill.join(sub)).unwrap();
        }
        fs::write(skill.join("SKILL.md"), VALID_MANIFEST).unwrap();
        skill
    }

    #[test]
    fn test_run_valid_skill_passes() {
        let dir = tempfile::TempDir::new().unwrap();
        let skill = write_full_skill(dir.path());
        let result = run(skill.to_str().unwrap(), false, false);
        assert!(result.is_ok(), "expected pass, got {:?}", result);
    }

    #[test]
    fn test_run_missing_manifest_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let skill = dir.path().join("00_empty");
        fs::create_dir_all(&skill).unwrap();

        let result = run(skill.to_str().unwrap(), false, true);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("FAILED"));
    }

    #[test]
    fn test_run_strict_mode_fails_on_warnings() {
        let dir = tempfile::TempDir::new().unwrap();
        let skill = dir.path().join("00_sparse");
        fs::create_dir_all(&skill).unwrap();
        // Valid manifest but no scripts/references/assets directories.
        fs::write(skill.join("SKILL.md"), VALID_MANIFEST).unwrap();

        assert!(run(skill.to_str().unwrap(), false, true).is_ok());
        let strict = run(skill.to_str().unwrap(), true, true);
        assert!(strict.is_err());
        assert!(strict.unwrap_err().to_string().contains("strict mode"));
    }
}
