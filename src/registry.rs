//! Skill registry: discovery, ordering, and prerequisite consistency.
//!
//! A registry is an immutable snapshot of one directory scan. It is rebuilt
//! wholesale on each scan rather than mutated, so a half-parsed batch can
//! never leak partial state into ordering or consistency checks.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::manifest::{load_manifest, ManifestError};
use crate::prereq::extract_prerequisites;

/// Directory names that are candidate skills: the full name must be a skill
/// identifier (`00_foundation`, `03-error-handling`, ...).
static SKILL_DIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})[_-][a-z0-9][a-z0-9_-]*$").expect("valid regex"));

/// Read-only view of one discovered skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillDescriptor {
    /// Directory name; unique within one registry.
    pub id: String,
    /// Two-digit prefix of the directory name.
    pub rank: u32,
    /// Declared `name` from the frontmatter.
    pub name: String,
    /// Declared `description`; empty if absent.
    pub description: String,
    /// Raw prerequisite references, first-occurrence order, not yet resolved.
    pub prerequisites: Vec<String>,
    /// Rank 0, or the body carries a literal "no prerequisites" declaration
    /// (legacy phrase heuristic kept for existing manifests).
    pub is_foundation: bool,
}

/// All successfully parsed skills from one directory scan, in lexicographic
/// directory order.
#[derive(Debug, Clone, Default)]
pub struct SkillRegistry {
    skills: Vec<SkillDescriptor>,
    skipped: Vec<String>,
}

impl SkillRegistry {
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.skills.iter().any(|s| s.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&SkillDescriptor> {
        self.skills.iter().find(|s| s.id == id)
    }

    /// Descriptors in insertion (directory listing) order.
    pub fn iter(&self) -> impl Iterator<Item = &SkillDescriptor> {
        self.skills.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.skills.iter().map(|s| s.id.as_str())
    }

    /// Candidate directories excluded during the build (no manifest, bad
    /// header, or missing name). Useful for reporting; never consumed by
    /// ordering or consistency checks.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }
}

/// An unresolved prerequisite: `dependent` references `prerequisite`, which
/// is not a key in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPrerequisite {
    pub dependent: String,
    pub prerequisite: String,
}

/// A resolvable prerequisite whose rank is not strictly below its
/// dependent's rank. The rank convention is what makes numeric install
/// order safe; an inversion means the convention is being violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankInversion {
    pub dependent: String,
    pub dependent_rank: u32,
    pub prerequisite: String,
    pub prerequisite_rank: u32,
}

/// Whether a directory name has the skill-identifier shape; returns the
/// parsed rank when it does.
pub fn parse_skill_dir_name(name: &str) -> Option<u32> {
    SKILL_DIR
        .captures(name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Walk `root`'s immediate subdirectories and build the registry. One bad
/// skill never aborts the walk: directories without a manifest are silently
/// excluded, and manifests without a usable header are excluded with a
/// warning. The walk itself failing (root unreadable) is an error.
pub fn build_registry(root: &Path) -> Result<SkillRegistry> {
    let entries = fs::read_dir(root)
        .with_context(|| format!("Failed to read skills directory: {}", root.display()))?;

    let mut candidates: Vec<(String, u32)> = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", root.display()))?;
        if !entry.path().is_dir() {
            continue;
        }
        let Some(dir_name) = entry.file_name().to_str().map(String::from) else {
            continue;
        };
        match parse_skill_dir_name(&dir_name) {
            Some(rank) => candidates.push((dir_name, rank)),
            None => debug!(dir = %dir_name, "not a skill directory, ignoring"),
        }
    }
    candidates.sort();

    let mut registry = SkillRegistry::default();
    for (dir_name, rank) in candidates {
        let (header, body) = match load_manifest(&root.join(&dir_name)) {
            Ok(loaded) => loaded,
            Err(ManifestError::MissingManifest) => {
                debug!(dir = %dir_name, "no SKILL.md, excluding from registry");
                registry.skipped.push(dir_name);
                continue;
            }
            Err(err) => {
                warn!(dir = %dir_name, %err, "unusable manifest, excluding from registry");
                registry.skipped.push(dir_name);
                continue;
            }
        };
        let Some(name) = header.name().filter(|n| !n.trim().is_empty()) else {
            warn!(dir = %dir_name, "manifest has no 'name', excluding from registry");
            registry.skipped.push(dir_name);
            continue;
        };

        let prerequisites = extract_prerequisites(&body);
        let is_foundation = rank == 0 || body.to_lowercase().contains("no prerequisites");
        registry.skills.push(SkillDescriptor {
            id: dir_name,
            rank,
            name: name.to_string(),
            description: header.description().unwrap_or_default().to_string(),
            prerequisites,
            is_foundation,
        });
    }

    debug!(
        skills = registry.len(),
        skipped = registry.skipped.len(),
        "registry built"
    );
    Ok(registry)
}

/// Installation/presentation order: ascending rank, ties broken by
/// identifier string order. This is safe because the naming convention puts
/// prerequisites at lower ranks; reference correctness is checked
/// separately by [`check_prerequisites`].
pub fn install_order(registry: &SkillRegistry) -> Vec<String> {
    let mut ids: Vec<(u32, &str)> = registry.iter().map(|s| (s.rank, s.id.as_str())).collect();
    ids.sort();
    ids.into_iter().map(|(_, id)| id.to_string()).collect()
}

/// Report every prerequisite reference that does not resolve to a registry
/// key. Empty result means the registry is internally consistent. Purely
/// referential: cycles and rank inversions are [`check_rank_order`]'s job.
pub fn check_prerequisites(registry: &SkillRegistry) -> Vec<MissingPrerequisite> {
    let mut missing = Vec::new();
    for skill in registry.iter() {
        for prereq in &skill.prerequisites {
            if !registry.contains(prereq) {
                missing.push(MissingPrerequisite {
                    dependent: skill.id.clone(),
                    prerequisite: prereq.clone(),
                });
            }
        }
    }
    missing
}

/// Report every resolvable prerequisite whose rank is not strictly below
/// its dependent's rank (covers self-references and inverted chains).
pub fn check_rank_order(registry: &SkillRegistry) -> Vec<RankInversion> {
    let mut inversions = Vec::new();
    for skill in registry.iter() {
        for prereq in &skill.prerequisites {
            if let Some(dep) = registry.get(prereq) {
                if dep.rank >= skill.rank {
                    inversions.push(RankInversion {
                        dependent: skill.id.clone(),
                        dependent_rank: skill.rank,
                        prerequisite: dep.id.clone(),
                        prerequisite_rank: dep.rank,
                    });
                }
            }
        }
    }
    inversions
}
