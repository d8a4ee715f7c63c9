//! Structural and content validation of a single skill folder.
//!
//! Checks run in a fixed sequence (structure, manifest, sections,
//! cross-references, scripts, reference files, naming) and append to one
//! discovery-ordered finding list, so related findings stay grouped. Checks
//! do not short-circuit each other except where a precondition is absent:
//! no manifest means no manifest-content checks, but file-presence and
//! naming checks still run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::manifest::{split_manifest, Frontmatter, MANIFEST_FILE};
use crate::prereq::PREREQUISITES_HEADING;

/// Minimum recommended description length; shorter is advisory only.
const MIN_DESCRIPTION_CHARS: usize = 75;
/// Manifests longer than this should push detail into `references/`.
const MAX_MANIFEST_LINES: usize = 500;

const REQUIRED_SECTIONS: &[&str] = &["## Overview", "## When to Use This Skill"];
const RECOMMENDED_SECTIONS: &[&str] = &["## Core Workflows", PREREQUISITES_HEADING];
/// Wording that describes any skill equally well describes none.
const GENERIC_PHRASES: &[&str] = &["this skill", "helps with", "allows you to"];
/// Housekeeping files under references/ that need no mention in the body.
const REFERENCE_IGNORE: &[&str] = &[".gitkeep"];

/// `references/<file>` tokens in the manifest body.
static REFERENCE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"references/([A-Za-z0-9_\-.]+)").expect("valid regex"));
static SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid regex"));
static RANK_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}[_-]").expect("valid regex"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    /// Blocks packaging.
    #[default]
    Error,
    /// Advisory; blocks only in strict mode.
    Warning,
    /// Successful-check confirmation.
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub message: String,
}

/// Overall classification of one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    PassedWithWarnings,
    Failed,
}

/// The findings of one validation run, in discovery order. This is the
/// boolean-plus-findings result a packager gates on before archiving.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.of_severity(Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.of_severity(Severity::Warning)
    }

    pub fn info(&self) -> impl Iterator<Item = &Finding> {
        self.of_severity(Severity::Info)
    }

    fn of_severity(&self, severity: Severity) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.severity == severity)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings().count()
    }

    pub fn outcome(&self, strict: bool) -> Outcome {
        if self.error_count() > 0 {
            Outcome::Failed
        } else if self.warning_count() > 0 {
            if strict {
                Outcome::Failed
            } else {
                Outcome::PassedWithWarnings
            }
        } else {
            Outcome::Passed
        }
    }

    pub fn is_passing(&self, strict: bool) -> bool {
        self.outcome(strict) != Outcome::Failed
    }
}

/// Validates one skill folder, independent of any registry.
pub struct SkillValidator {
    skill_path: PathBuf,
    findings: Vec<Finding>,
}

impl SkillValidator {
    pub fn new(skill_path: impl Into<PathBuf>) -> Self {
        Self {
            skill_path: skill_path.into(),
            findings: Vec::new(),
        }
    }

    /// Run all checks in sequence and return the report.
    pub fn validate_all(mut self) -> ValidationReport {
        self.check_structure();

        let manifest = fs::read_to_string(self.skill_path.join(MANIFEST_FILE)).ok();
        if let Some(content) = manifest.as_deref() {
            self.check_manifest(content);
        }
        self.check_scripts(manifest.as_deref());
        self.check_references(manifest.as_deref());
        self.check_naming();

        ValidationReport {
            findings: self.findings,
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.push(Severity::Error, message);
    }

    fn warning(&mut self, message: impl Into<String>) {
        self.push(Severity::Warning, message);
    }

    fn info(&mut self, message: impl Into<String>) {
        self.push(Severity::Info, message);
    }

    fn push(&mut self, severity: Severity, message: impl Into<String>) {
        self.findings.push(Finding {
            severity,
            message: message.into(),
        });
    }

    fn check_structure(&mut self) {
        if !self.skill_path.exists() {
            self.error(format!(
                "Skill directory does not exist: {}",
                self.skill_path.display()
            ));
            return;
        }
        if !self.skill_path.is_dir() {
            self.error(format!("Not a directory: {}", self.skill_path.display()));
            return;
        }

        if !self.skill_path.join(MANIFEST_FILE).is_file() {
            self.error("Missing SKILL.md file");
        }

        for dir_name in ["scripts", "references", "assets"] {
            if self.skill_path.join(dir_name).is_dir() {
                self.info(format!("Has {}/ directory", dir_name));
            } else {
                self.warning(format!(
                    "Missing {}/ directory (optional but recommended)",
                    dir_name
                ));
            }
        }
    }

    fn check_manifest(&mut self, content: &str) {
        let line_count = content.lines().count();
        if line_count > MAX_MANIFEST_LINES {
            self.warning(format!(
                "SKILL.md is long ({} lines). Consider moving details to references/",
                line_count
            ));
        } else {
            self.info(format!("SKILL.md length is good ({} lines)", line_count));
        }

        // An absent or unterminated delimiter pair is terminal for this
        // manifest: there is no trustworthy body to inspect.
        let Ok((header_text, body)) = split_manifest(content) else {
            self.error("SKILL.md has missing or malformed frontmatter (must open and close with '---')");
            return;
        };

        match Frontmatter::parse(header_text) {
            Ok(header) => self.check_header_fields(&header),
            // Delimiters are balanced, so the body is still meaningful:
            // record the header error and keep going with body-level checks.
            Err(err) => self.error(err.to_string()),
        }

        self.check_sections(body);
        self.check_cross_references(body);
    }

    fn check_header_fields(&mut self, header: &Frontmatter) {
        match header.get("name") {
            None => self.error("Missing 'name' in frontmatter"),
            Some(value) => match value.as_str() {
                None => self.error("'name' field must be a string"),
                Some(name) if name.trim().is_empty() => self.error("'name' field is empty"),
                Some(name) => {
                    if !SLUG.is_match(name) {
                        self.warning(format!(
                            "Skill name '{}' should be lowercase with hyphens only",
                            name
                        ));
                    }
                    self.info(format!("Skill name: {}", name));
                }
            },
        }

        match header.get("description") {
            None => self.error("Missing 'description' in frontmatter"),
            Some(value) => match value.as_str() {
                None => self.error("'description' field must be a string"),
                Some(desc) if desc.trim().is_empty() => self.error("'description' field is empty"),
                Some(desc) => {
                    let len = desc.chars().count();
                    if len < MIN_DESCRIPTION_CHARS {
                        self.warning(format!(
                            "Description is short ({} chars). Aim for {}+ chars for better discoverability",
                            len, MIN_DESCRIPTION_CHARS
                        ));
                    } else {
                        self.info(format!("Description length: {} chars", len));
                    }

                    let lower = desc.to_lowercase();
                    if GENERIC_PHRASES.iter().any(|p| lower.contains(p)) {
                        self.warning(
                            "Description may be too generic. Be specific about triggers and use cases",
                        );
                    }
                }
            },
        }
    }

    fn check_sections(&mut self, body: &str) {
        for section in REQUIRED_SECTIONS {
            if body_has_heading(body, section) {
                self.info(format!("Has {}", section));
            } else {
                self.error(format!("Missing required section: {}", section));
            }
        }
        for section in RECOMMENDED_SECTIONS {
            if body_has_heading(body, section) {
                self.info(format!("Has {}", section));
            } else {
                self.warning(format!("Missing recommended section: {}", section));
            }
        }
    }

    fn check_cross_references(&mut self, body: &str) {
        let mut seen: Vec<&str> = Vec::new();
        for cap in REFERENCE_TOKEN.captures_iter(body) {
            let Some(file) = cap.get(1).map(|m| m.as_str()) else {
                continue;
            };
            if seen.contains(&file) {
                continue;
            }
            seen.push(file);

            if self.skill_path.join("references").join(file).is_file() {
                self.info(format!("Referenced file exists: references/{}", file));
            } else {
                self.error(format!(
                    "Referenced file does not exist: references/{}",
                    file
                ));
            }
        }
    }

    fn check_scripts(&mut self, manifest: Option<&str>) {
        let scripts_dir = self.skill_path.join("scripts");
        if !scripts_dir.is_dir() {
            return;
        }

        let scripts = list_files_with_extensions(&scripts_dir, &["py", "sh"]);
        if scripts.is_empty() {
            self.info("scripts/ directory is empty");
            return;
        }

        for script in scripts {
            let Some(file_name) = script.file_name().and_then(|n| n.to_str()).map(String::from)
            else {
                continue;
            };

            if file_name.ends_with(".sh") && !is_executable(&script) {
                self.warning(format!("Script {} is not executable", file_name));
            }

            if let Some(content) = manifest {
                if !content.contains(&file_name) {
                    self.warning(format!("Script {} is not mentioned in SKILL.md", file_name));
                }
            }

            self.info(format!("Found script: {}", file_name));
        }
    }

    fn check_references(&mut self, manifest: Option<&str>) {
        let refs_dir = self.skill_path.join("references");
        if !refs_dir.is_dir() {
            return;
        }

        let ref_files = list_files_with_extensions(&refs_dir, &["md"]);
        if ref_files.is_empty() {
            self.warning("references/ directory exists but has no .md files");
            return;
        }

        let Some(content) = manifest else {
            return;
        };
        for ref_file in ref_files {
            let Some(file_name) = ref_file.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if REFERENCE_IGNORE.contains(&file_name) {
                continue;
            }
            if content.contains(&format!("references/{}", file_name)) {
                self.info(format!("Reference {} is mentioned in SKILL.md", file_name));
            } else {
                self.warning(format!(
                    "Reference file {} is not mentioned in SKILL.md",
                    file_name
                ));
            }
        }
    }

    fn check_naming(&mut self) {
        let Some(dir_name) = self
            .skill_path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_owned)
        else {
            return;
        };
        let dir_name = dir_name.as_str();

        let slug = match RANK_PREFIX.find(dir_name) {
            Some(prefix) => &dir_name[prefix.end()..],
            None => {
                self.warning(format!(
                    "Directory name '{}' should start with a two-digit number (e.g., '00_', '01_')",
                    dir_name
                ));
                dir_name
            }
        };
        if !SLUG.is_match(slug) {
            self.warning(format!(
                "Skill name '{}' should be lowercase with hyphens only",
                slug
            ));
        }
    }
}

/// A `##` heading counts only at the start of a line, so prose mentioning a
/// section title does not satisfy the check.
fn body_has_heading(body: &str, heading: &str) -> bool {
    body.lines().any(|line| line.trim_end() == heading)
}

fn list_files_with_extensions(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| extensions.contains(&e))
        })
        .collect();
    files.sort();
    files
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

// No execute-permission concept on this platform; the check is a no-op.
#[cfg(not(unix))]
fn is_executable(_path: &Path) -> bool {
    true
}
