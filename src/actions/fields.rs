//! User-supplied form fields and their validation rules.
//!
//! Every field has a default. A blank input falls back to it; a non-blank
//! input that breaks the rule aborts the action before any request is built.

use crate::error::{FormatrError, Result};
use std::collections::BTreeMap;

/// Raw `name → value` inputs collected from the user for one action.
pub type FieldInputs = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// One of a fixed set of lowercase tokens (input is matched case-insensitively).
    Choice(&'static [&'static str]),
    /// An integer within `min..=max`.
    Range { min: u32, max: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Multipart form field name.
    pub name: &'static str,
    pub label: &'static str,
    pub default: &'static str,
    pub rule: Rule,
}

impl FieldSpec {
    /// Validate one input against this field, applying the default when blank.
    pub fn validate(&self, input: Option<&str>) -> Result<String> {
        let raw = match input.map(str::trim) {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(self.default.to_string()),
        };

        match self.rule {
            Rule::Choice(options) => {
                let lowered = raw.to_lowercase();
                if options.contains(&lowered.as_str()) {
                    Ok(lowered)
                } else {
                    Err(FormatrError::invalid_field(
                        self.name,
                        format!("'{}' is not one of {}", raw, options.join(", ")),
                    ))
                }
            }
            Rule::Range { min, max } => {
                let value: u32 = raw.parse().map_err(|_| {
                    FormatrError::invalid_field(self.name, format!("'{}' is not a whole number", raw))
                })?;
                if value < min || value > max {
                    return Err(FormatrError::invalid_field(
                        self.name,
                        format!("{} is outside {}..={}", value, min, max),
                    ));
                }
                Ok(value.to_string())
            }
        }
    }

    /// Short hint such as `png|jpg|webp|pdf` or `1-100`, used in menus.
    pub fn hint(&self) -> String {
        match self.rule {
            Rule::Choice(options) => options.join("|"),
            Rule::Range { min, max } => format!("{}-{}", min, max),
        }
    }
}

/// Parse a `key=value` assignment as given on the command line.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| FormatrError::usage(format!("expected key=value, got '{}'", raw)))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(FormatrError::usage(format!("missing field name in '{}'", raw)));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
