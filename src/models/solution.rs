//! Solution recommendation models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cloud product proposed for a set of requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedProduct {
    pub name: String,
    pub description: String,
    /// Relevance (0.0-1.0)
    pub relevance_score: f64,
}

/// One revision of a recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionVersion {
    pub version: u32,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

/// Proposed solution for a customer's requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub requirements: String,
    /// Opaque formatted text (markdown)
    pub recommendation: String,
    #[serde(default)]
    pub products: Vec<RecommendedProduct>,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub versions: Vec<SolutionVersion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Solution {
    pub fn latest_version(&self) -> Option<&SolutionVersion> {
        self.versions.iter().max_by_key(|v| v.version)
    }

    /// Version number the next refinement will get
    pub fn next_version(&self) -> u32 {
        self.latest_version().map_or(1, |v| v.version + 1)
    }
}

/// Body of `POST /solution/recommend`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub requirements: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

/// Body of `POST /solution/:id/refine`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineRequest {
    pub feedback: String,
}

#[cfg(test)]
mod tests {
    use crate::fixtures;

    #[test]
    fn test_next_version_follows_latest() {
        let solution = fixtures::solution();
        assert_eq!(solution.latest_version().map(|v| v.version), Some(1));
        assert_eq!(solution.next_version(), 2);
    }

    #[test]
    fn test_next_version_without_history() {
        let mut solution = fixtures::solution();
        solution.versions.clear();
        assert_eq!(solution.next_version(), 1);
    }
}
