//! SKILL.md manifest parsing.
//!
//! A manifest is a YAML frontmatter block delimited by `---` lines, followed
//! by a free-text Markdown body. The frontmatter carries the skill's `name`
//! and `description`; everything else the chain tooling needs (prerequisites,
//! sections, file references) lives in the body.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_yaml::Value;
use thiserror::Error;

/// The manifest file every skill folder must contain.
pub const MANIFEST_FILE: &str = "SKILL.md";

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("missing SKILL.md file")]
    MissingManifest,
    #[error("SKILL.md frontmatter is missing or unterminated (must open and close with '---')")]
    MalformedManifest,
    #[error("SKILL.md frontmatter is not valid YAML: {0}")]
    InvalidHeaderSyntax(String),
    #[error("failed to read SKILL.md: {0}")]
    Io(#[from] std::io::Error),
}

/// Parsed frontmatter header. Keys are kept as raw YAML values so that
/// wrong-typed fields (e.g. a list where a string belongs) stay observable
/// instead of failing the whole parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Frontmatter {
    fields: serde_yaml::Mapping,
}

impl Frontmatter {
    /// Parse the text between the two `---` delimiters.
    pub fn parse(header_text: &str) -> Result<Self, ManifestError> {
        if header_text.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_yaml::from_str(header_text)
            .map_err(|e| ManifestError::InvalidHeaderSyntax(e.to_string()))?;
        match value {
            Value::Mapping(fields) => Ok(Self { fields }),
            Value::Null => Ok(Self::default()),
            other => Err(ManifestError::InvalidHeaderSyntax(format!(
                "expected a key-value mapping, got {}",
                yaml_type_name(&other)
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Raw value for a key, if present at all.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// String value for a key. `None` if absent or not string-typed.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.get_str("description")
    }

    /// Re-serialize the header as YAML. Field values round-trip; key order
    /// follows the original document.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        serde_yaml::to_string(self).map_err(|e| ManifestError::InvalidHeaderSyntax(e.to_string()))
    }
}

fn yaml_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Split a manifest document into (header text, body text) without
/// interpreting the header. Fails if the document does not open with a `---`
/// line or the header block is never closed.
pub fn split_manifest(content: &str) -> Result<(&str, &str), ManifestError> {
    let mut rest = content;
    // Tolerate a UTF-8 BOM before the opening delimiter.
    rest = rest.strip_prefix('\u{feff}').unwrap_or(rest);

    let after_open = match rest.strip_prefix("---") {
        Some(r) if r.is_empty() => return Err(ManifestError::MalformedManifest),
        Some(r) => match r.strip_prefix('\n').or_else(|| r.strip_prefix("\r\n")) {
            Some(after) => after,
            // "---something" is a heading-like line, not a delimiter.
            None => return Err(ManifestError::MalformedManifest),
        },
        None => return Err(ManifestError::MalformedManifest),
    };

    // Find the closing delimiter line.
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let header = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Ok((header, body));
        }
        offset += line.len();
    }
    Err(ManifestError::MalformedManifest)
}

/// Parse a manifest document into (frontmatter, body).
pub fn parse_manifest(content: &str) -> Result<(Frontmatter, &str), ManifestError> {
    let (header_text, body) = split_manifest(content)?;
    let header = Frontmatter::parse(header_text)?;
    Ok((header, body))
}

/// Load and parse the manifest of a skill folder. A folder without a
/// SKILL.md is not a skill; that case gets its own error so callers can
/// exclude it without reporting it.
pub fn load_manifest(skill_dir: &Path) -> Result<(Frontmatter, String), ManifestError> {
    let path = skill_dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return Err(ManifestError::MissingManifest);
    }
    let content = fs::read_to_string(&path)?;
    let (header, body) = parse_manifest(&content)?;
    Ok((header, body.to_string()))
}
