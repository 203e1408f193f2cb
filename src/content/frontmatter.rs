//! Front-matter parsing

use serde_yaml::{Mapping, Value};
use thiserror::Error;

/// Errors from a front-matter block that is present but malformed
#[derive(Error, Debug)]
pub enum FrontmatterParseError {
    #[error("YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a mapping of fields")]
    NotMapping,

    #[error("unterminated JSON front-matter")]
    Unterminated,
}

/// Raw, unvalidated front-matter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub fields: Mapping,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontmatterParseError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    /// Look up a top-level string field
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// The fields as a single YAML value, ready for schema validation
    pub fn to_value(&self) -> Value {
        Value::Mapping(self.fields.clone())
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str), FrontmatterParseError> {
        let rest = &content[3..];
        let rest = rest.trim_start_matches(['\n', '\r']);

        // A block closed immediately ("---\n---")
        if let Some(remaining) = rest.strip_prefix("---") {
            return Ok((FrontMatter::default(), remaining.trim_start_matches(['\n', '\r'])));
        }

        let Some(end_pos) = rest.find("\n---") else {
            // No closing fence, treat as no front-matter
            return Ok((FrontMatter::default(), content));
        };

        let yaml_content = &rest[..end_pos];
        let remaining = &rest[end_pos + 4..];
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::default(), remaining));
        }

        // A leading "---" used as a markdown rule rather than a fence
        if !looks_like_yaml(yaml_content) {
            return Ok((FrontMatter::default(), content));
        }

        let value: Value = serde_yaml::from_str(yaml_content)?;
        Ok((Self::from_value(value)?, remaining))
    }

    fn parse_json(content: &str) -> Result<(Self, &str), FrontmatterParseError> {
        // JSON front-matter fenced by ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest
                .find(";;;")
                .ok_or(FrontmatterParseError::Unterminated)?;
            let json_content = &rest[..end_pos];
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);
            return Ok((Self::from_json(json_content)?, remaining));
        }

        // A bare JSON object at the start
        let end_pos = matching_brace(content).ok_or(FrontmatterParseError::Unterminated)?;
        let json_content = &content[..end_pos];
        let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);
        Ok((Self::from_json(json_content)?, remaining))
    }

    fn from_json(json: &str) -> Result<Self, FrontmatterParseError> {
        let json: serde_json::Value = serde_json::from_str(json)?;
        let value = serde_yaml::to_value(json)?;
        Self::from_value(value)
    }

    fn from_value(value: Value) -> Result<Self, FrontmatterParseError> {
        match value {
            Value::Mapping(fields) => Ok(Self { fields }),
            Value::Null => Ok(Self::default()),
            _ => Err(FrontmatterParseError::NotMapping),
        }
    }
}

/// At least one line must read as `key:` or `key: value`
fn looks_like_yaml(block: &str) -> bool {
    block.lines().any(|line| {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return false;
        }
        let Some(colon_pos) = trimmed.find(':') else {
            return false;
        };
        let key = trimmed[..colon_pos].trim_matches(['"', '\'']);
        let is_valid_key = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
            && !matches!(key, "http" | "https" | "ftp");
        let after_colon = &trimmed[colon_pos + 1..];
        is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
    })
}

/// Byte offset just past the brace closing the object that opens `content`
fn matching_brace(content: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in content.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
