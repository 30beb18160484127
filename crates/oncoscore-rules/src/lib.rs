//! oncoscore-rules — Rule-based clinical guidance attached to scored
//! predictions.
//!
//! A recommendation is produced by one pass over a declarative, ordered
//! rule table: specific condition rules first, tier-general fallbacks last.
//! Every matching rule contributes its action text; duplicates are removed
//! keeping first occurrence. Disclaimers are appended by the web boundary,
//! never here.

pub mod cervical;
pub mod endometrial;
pub mod thresholds;

use serde::{Deserialize, Serialize};

pub use thresholds::ClinicalThresholds;

/// Ordered, deduplicated action list plus a tier-keyed summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub summary: String,
    pub actions: Vec<String>,
}

/// Drop duplicate action strings, keeping the first occurrence order.
pub(crate) fn dedup_keep_first(actions: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    actions
        .into_iter()
        .filter(|a| seen.insert(a.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_preserves_first_occurrence() {
        let actions = vec![
            "refer".to_string(),
            "screen".to_string(),
            "refer".to_string(),
            "counsel".to_string(),
        ];
        assert_eq!(dedup_keep_first(actions), vec!["refer", "screen", "counsel"]);
    }
}
