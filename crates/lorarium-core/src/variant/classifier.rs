//! Variant classification over raw file names.
//!
//! Detects that files differing only by an embedded noise-level marker
//! (the high/low halves of one split trained asset) represent the same
//! logical item: each name normalizes to a canonical grouping key plus
//! an optional [`VariantLabel`].
//!
//! Classification is pure string work — no I/O, no shared state — and
//! never fails; a name with no recognizable marker degrades to the
//! cleaned whole name as its key, with no label.

use crate::variant::rules::{builtin_rules, validate_rules, MarkerPattern, MarkerRule, VariantLabel};
use crate::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

/// Regex for a trailing extension segment. Only a final dot-segment
/// beginning with a letter counts, so embedded version dots
/// ("wan2.2_...") survive when no real extension is present.
static EXTENSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.[A-Za-z][A-Za-z0-9]*$").unwrap());

/// Regex for parenthetical duplicate counters appended by downloaders,
/// e.g. "model (1)".
static PAREN_COUNTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(\s*\d+\s*\)").unwrap());

/// Regex for cosmetic iteration markers: a glued "e"/"epoc"/"epoch"
/// prefix followed by digits.
static ITERATION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:e|epoc|epoch)\d+$").unwrap());

/// Classification of one raw file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    /// Canonical grouping key: lowercase, separator-stripped,
    /// noise-token-removed. Names sharing a key are variants of one
    /// logical item.
    pub key: String,
    /// Detected noise-level marker, absent when the name carries none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantLabel>,
}

/// A raw name together with its classification, as produced by
/// [`group_variants`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedName {
    pub raw_name: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<VariantLabel>,
}

/// Variant classifier backed by a priority-ordered marker rule table.
#[derive(Debug, Clone)]
pub struct VariantClassifier {
    rules: Vec<MarkerRule>,
}

static DEFAULT_CLASSIFIER: LazyLock<VariantClassifier> = LazyLock::new(VariantClassifier::new);

impl Default for VariantClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl VariantClassifier {
    /// Classifier with the built-in marker table.
    pub fn new() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    /// Classifier with a host-supplied rule table.
    ///
    /// The table fully replaces the built-ins; append
    /// [`builtin_rules`] to extend rather than replace. Rules are
    /// validated up front (see [`crate::variant::validate_rules`]).
    pub fn with_rules(rules: Vec<MarkerRule>) -> Result<Self> {
        validate_rules(&rules)?;
        Ok(Self { rules })
    }

    /// The active rule table, in priority order.
    pub fn rules(&self) -> &[MarkerRule] {
        &self.rules
    }

    /// Classify one raw file name.
    ///
    /// # Examples
    ///
    /// ```
    /// use lorarium_catalog::{VariantClassifier, VariantLabel};
    ///
    /// let classifier = VariantClassifier::new();
    /// let result = classifier.classify("wriggling_t2v_high_e100.safetensors");
    /// assert_eq!(result.key, "wrigglingt2v");
    /// assert_eq!(result.variant, Some(VariantLabel::High));
    /// ```
    pub fn classify(&self, raw_name: &str) -> ClassificationResult {
        let stem = strip_extension(raw_name);
        let stem = PAREN_COUNTER.replace_all(stem, "");
        let mut tokens = split_tokens(&stem);

        let variant = self.scan_marker(&mut tokens);
        remove_iteration_markers(&mut tokens);

        let mut key: String = tokens.concat();
        if key.is_empty() {
            // Removal emptied the name (e.g. "high.safetensors").
            // Fall back to the whole cleaned stem, marker included, so
            // bare-marker files never merge with each other.
            key = collapse_stem(&stem);
        }

        ClassificationResult { key, variant }
    }

    /// Find the first rule that matches, remove the matched token(s),
    /// and report its label. Only the first occurrence is consumed; a
    /// repeated marker token is treated as identity.
    fn scan_marker(&self, tokens: &mut Vec<String>) -> Option<VariantLabel> {
        for rule in &self.rules {
            match &rule.pattern {
                MarkerPattern::Token { token } => {
                    if let Some(pos) = tokens.iter().position(|t| t == token) {
                        tokens.remove(pos);
                        return Some(rule.label);
                    }
                }
                MarkerPattern::Pair { first, second } => {
                    if let Some(pos) = tokens
                        .windows(2)
                        .position(|w| w[0] == *first && w[1] == *second)
                    {
                        tokens.drain(pos..pos + 2);
                        return Some(rule.label);
                    }
                }
            }
        }
        None
    }
}

/// Classify with the built-in rule table.
///
/// Pure function: the same input yields the same result on every call.
pub fn classify(raw_name: &str) -> ClassificationResult {
    DEFAULT_CLASSIFIER.classify(raw_name)
}

/// Group raw names by their canonical key.
///
/// Convenience for the organizer layer: names whose keys agree are
/// variants of one logical item. Sibling ordering (e.g. High before
/// Low) is the caller's policy.
pub fn group_variants<S: AsRef<str>>(names: &[S]) -> HashMap<String, Vec<ClassifiedName>> {
    let mut groups: HashMap<String, Vec<ClassifiedName>> = HashMap::new();

    for name in names {
        let raw_name = name.as_ref();
        let result = classify(raw_name);
        groups
            .entry(result.key.clone())
            .or_default()
            .push(ClassifiedName {
                raw_name: raw_name.to_string(),
                key: result.key,
                variant: result.variant,
            });
    }

    groups
}

/// Strip a trailing extension segment, if one is present.
fn strip_extension(name: &str) -> &str {
    match EXTENSION.find(name) {
        Some(m) if m.start() > 0 => &name[..m.start()],
        _ => name,
    }
}

/// Split a stem into lowercase tokens at non-alphanumeric boundaries
/// and camel-case transitions.
///
/// Letter/digit transitions do NOT split, so embedded identifiers like
/// "t2v" or "wan2" stay whole. An uppercase run followed by a
/// capitalized word splits before the run's last letter ("HNLora" →
/// "hn", "lora").
fn split_tokens(stem: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;

    for c in stem.chars() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut tokens);
            prev = None;
            continue;
        }
        if let Some(p) = prev {
            if c.is_uppercase() && (p.is_lowercase() || p.is_numeric()) {
                flush(&mut current, &mut tokens);
            } else if c.is_lowercase() && p.is_uppercase() && current.chars().count() >= 2 {
                let last_start = current
                    .char_indices()
                    .next_back()
                    .map(|(i, _)| i)
                    .unwrap_or(0);
                let run_tail = current.split_off(last_start);
                flush(&mut current, &mut tokens);
                current = run_tail;
            }
        }
        current.push(c);
        prev = Some(c);
    }
    flush(&mut current, &mut tokens);

    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current).to_lowercase());
    }
}

/// Remove cosmetic iteration markers: glued forms ("e100", "epoc100",
/// "epoch100") and an "epoch"/"epoc" token immediately followed by a
/// bare digit token. Bare digit tokens anywhere else are identity and
/// stay in the key.
fn remove_iteration_markers(tokens: &mut Vec<String>) {
    let mut i = 0;
    while i < tokens.len() {
        if ITERATION_MARKER.is_match(&tokens[i]) {
            tokens.remove(i);
            continue;
        }
        if (tokens[i] == "epoch" || tokens[i] == "epoc")
            && tokens
                .get(i + 1)
                .is_some_and(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_digit()))
        {
            tokens.drain(i..i + 2);
            continue;
        }
        i += 1;
    }
}

/// Lowercase alphanumeric collapse of the whole stem, used as the
/// fallback key when token removal leaves nothing.
fn collapse_stem(stem: &str) -> String {
    stem.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
