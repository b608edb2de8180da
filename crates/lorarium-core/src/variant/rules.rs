//! Marker rule tables for variant detection.
//!
//! A rule table is a priority-ordered list of `(pattern, label)` pairs
//! evaluated in sequence over the tokenized file name; the first rule
//! to match wins. The built-in table covers the high-noise/low-noise
//! vocabulary observed in the wild, and hosts may supply their own
//! table (e.g. deserialized from a mapping config) to extend it.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Noise-level half of a split trained asset.
///
/// Display casing is canonical (`High`/`Low`) regardless of how the
/// marker was cased in the file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantLabel {
    High,
    Low,
}

impl VariantLabel {
    /// Canonical string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantLabel::High => "High",
            VariantLabel::Low => "Low",
        }
    }
}

impl fmt::Display for VariantLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of a single marker match.
///
/// Patterns operate on the case-folded token sequence of a file-name
/// stem, so `Pair` covers markers split across separators ("high_noise")
/// as well as case boundaries ("HighNoise").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerPattern {
    /// Two tokens that must appear adjacent, in order.
    Pair { first: String, second: String },
    /// A single whole token.
    Token { token: String },
}

/// One entry of a marker rule table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerRule {
    pub pattern: MarkerPattern,
    pub label: VariantLabel,
}

impl MarkerRule {
    /// Shorthand for a whole-token rule.
    pub fn token(token: &str, label: VariantLabel) -> Self {
        Self {
            pattern: MarkerPattern::Token {
                token: token.to_string(),
            },
            label,
        }
    }

    /// Shorthand for an adjacent-pair rule.
    pub fn pair(first: &str, second: &str, label: VariantLabel) -> Self {
        Self {
            pattern: MarkerPattern::Pair {
                first: first.to_string(),
                second: second.to_string(),
            },
            label,
        }
    }
}

/// The built-in marker table, in priority order.
///
/// Compound high/low+noise forms are tried before bare `high`/`low`
/// tokens so the `noise` token is consumed together with its qualifier
/// and cannot leak into the key. The two-letter abbreviations come
/// last; they only match as whole tokens, which keeps them from firing
/// inside ordinary words.
pub fn builtin_rules() -> Vec<MarkerRule> {
    vec![
        MarkerRule::pair("high", "noise", VariantLabel::High),
        MarkerRule::pair("low", "noise", VariantLabel::Low),
        MarkerRule::token("highnoise", VariantLabel::High),
        MarkerRule::token("lownoise", VariantLabel::Low),
        MarkerRule::token("high", VariantLabel::High),
        MarkerRule::token("low", VariantLabel::Low),
        MarkerRule::token("hn", VariantLabel::High),
        MarkerRule::token("ln", VariantLabel::Low),
    ]
}

/// Validate a host-supplied rule table.
///
/// Rule tokens must be non-empty, lowercase ASCII alphanumeric — the
/// same alphabet the tokenizer produces, so a rule that could never
/// match is rejected up front.
pub fn validate_rules(rules: &[MarkerRule]) -> Result<()> {
    for rule in rules {
        match &rule.pattern {
            MarkerPattern::Token { token } => validate_rule_token(token)?,
            MarkerPattern::Pair { first, second } => {
                validate_rule_token(first)?;
                validate_rule_token(second)?;
            }
        }
    }
    Ok(())
}

fn validate_rule_token(token: &str) -> Result<()> {
    if token.is_empty() {
        return Err(CatalogError::InvalidRule {
            message: "rule token is empty".to_string(),
        });
    }
    if !token
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(CatalogError::InvalidRule {
            message: format!(
                "rule token '{}' must be lowercase ASCII alphanumeric",
                token
            ),
        });
    }
    Ok(())
}
