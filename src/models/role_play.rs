//! Role-play session models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Session difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

/// Sales conversation scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    #[default]
    Discovery,
    Technical,
    Objection,
    Executive,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::Discovery,
        Scenario::Technical,
        Scenario::Objection,
        Scenario::Executive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Technical => "technical",
            Self::Objection => "objection",
            Self::Executive => "executive",
        }
    }

    /// Parse a scenario tag; unknown tags fall back to discovery
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "technical" => Self::Technical,
            "objection" => Self::Objection,
            "executive" => Self::Executive,
            _ => Self::Discovery,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chat participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Single message of a role-play conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Feedback on one salesperson message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionScore {
    /// Index of the scored message in the session
    pub message_index: usize,
    /// Score (0-100)
    pub score: u8,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

/// A simulated sales conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePlaySession {
    pub id: String,
    pub scenario: Scenario,
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub scores: Vec<SessionScore>,
    #[serde(default)]
    pub final_score: u8,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,
}

impl RolePlaySession {
    pub fn is_ended(&self) -> bool {
        self.ended_at.is_some()
    }

    /// Mean of the per-message scores, rounded; 0 before the first score
    pub fn average_score(&self) -> u8 {
        if self.scores.is_empty() {
            return 0;
        }
        let sum: u32 = self.scores.iter().map(|s| u32::from(s.score)).sum();
        (f64::from(sum) / self.scores.len() as f64).round() as u8
    }
}

/// Body of `POST /role-play/start`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartSessionRequest {
    pub scenario: Scenario,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Body of `POST /role-play/:id/respond`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespondRequest {
    pub message: String,
}

/// Result of `POST /role-play/:id/respond`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePlayTurn {
    #[serde(rename = "customerResponse")]
    pub customer_response: ChatMessage,
    pub evaluation: SessionScore,
}
