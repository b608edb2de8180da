//! Corpus tokenization.

/// Extract case-folded tokens from a corpus entry.
///
/// A token is a maximal alphanumeric run; entries split at every
/// non-alphanumeric boundary. This is deliberately dumber than the
/// variant classifier's splitter — search tokens keep camel-case runs
/// whole, matching what a user sees and types.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect()
}
