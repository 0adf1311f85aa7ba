//! Presentation severity for decision labels.
//!
//! Classification is display-only. Counting in the aggregator matches labels
//! directly and never consults this module.

use crate::types::Decision;
use serde::{Deserialize, Serialize};

/// Severity bucket a decision is rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// approve
    Cleared,
    /// review
    Elevated,
    /// block
    Critical,
    /// pending or any unrecognized label
    Unknown,
}

impl Severity {
    /// Short tag for logs and terminal output.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Cleared => "CLEARED",
            Self::Elevated => "ELEVATED",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[must_use]
pub const fn classify(decision: &Decision) -> Severity {
    match decision {
        Decision::Approve => Severity::Cleared,
        Decision::Review => Severity::Elevated,
        Decision::Block => Severity::Critical,
        Decision::Pending | Decision::Unrecognized(_) => Severity::Unknown,
    }
}

/// Classifies a raw label without building a `Decision` first.
#[must_use]
pub fn classify_label(label: &str) -> Severity {
    classify(&Decision::from_label(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_map_to_distinct_severities() {
        let approve = classify(&Decision::Approve);
        let review = classify(&Decision::Review);
        let block = classify(&Decision::Block);

        assert_eq!(approve, Severity::Cleared);
        assert_eq!(review, Severity::Elevated);
        assert_eq!(block, Severity::Critical);
        assert_ne!(block, approve);
        assert_ne!(block, review);
        assert_ne!(approve, review);
    }

    #[test]
    fn test_pending_and_unknown_share_default() {
        assert_eq!(classify(&Decision::Pending), Severity::Unknown);
        assert_eq!(classify_label("escalate"), Severity::Unknown);
        assert_eq!(classify_label(""), Severity::Unknown);
        assert_eq!(classify_label("APPROVE"), Severity::Unknown);
    }

    #[test]
    fn test_classification_is_deterministic() {
        for label in ["approve", "review", "block", "pending", "other"] {
            assert_eq!(classify_label(label), classify_label(label));
        }
    }

    #[test]
    fn test_tags() {
        assert_eq!(Severity::Critical.tag(), "CRITICAL");
        assert_eq!(Severity::Unknown.tag(), "UNKNOWN");
    }
}
