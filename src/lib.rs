//! skillchain - validate skill packages and order them for installation
//!
//! A skill is a self-contained folder of instructional content: a SKILL.md
//! manifest (YAML frontmatter plus a Markdown body) with optional scripts/,
//! references/, and assets/ subfolders. Skills form a chain: later skills
//! declare earlier ones as prerequisites. This crate parses manifests,
//! extracts prerequisite references, validates structure and content, and
//! computes a deterministic installation order over a directory of skills.

pub mod cli;
pub mod manifest;
pub mod prereq;
pub mod registry;
pub mod validate;
