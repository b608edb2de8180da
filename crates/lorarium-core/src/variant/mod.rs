//! Variant identity resolution.
//!
//! Related files often differ only by an embedded noise-level marker —
//! the high-noise/low-noise halves of one split trained asset. This
//! module normalizes raw file names to canonical grouping keys and
//! distinct variant labels so the organizer layer can merge them into
//! one visual grouping:
//!
//! ```text
//! wriggling_t2v_high_e100.safetensors ─┐
//!                                      ├── key "wrigglingt2v"
//! wriggling_t2v_low_e100.safetensors  ─┘    labels High / Low
//! ```

mod classifier;
mod rules;

pub use classifier::{
    classify, group_variants, ClassificationResult, ClassifiedName, VariantClassifier,
};
pub use rules::{builtin_rules, validate_rules, MarkerPattern, MarkerRule, VariantLabel};
