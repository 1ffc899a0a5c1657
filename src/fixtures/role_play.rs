//! Canonical role-play session fixture

use super::at;
use crate::models::{ChatMessage, Difficulty, Role, RolePlaySession, Scenario, SessionScore};

fn message(role: Role, content: &str, minute: u32) -> ChatMessage {
    ChatMessage {
        role,
        content: content.to_string(),
        timestamp: at(2026, 2, 14, 14, minute),
    }
}

fn phrases(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A technical-evaluation conversation with one scored turn
pub fn role_play_session() -> RolePlaySession {
    RolePlaySession {
        id: "session-001".to_string(),
        scenario: Scenario::Technical,
        difficulty: Difficulty::Medium,
        context: Some(
            "Meeting with a senior engineer who is evaluating cloud AI services for their \
             content moderation system."
                .to_string(),
        ),
        messages: vec![
            message(
                Role::Assistant,
                "Hi, I'm the lead engineer at TechCorp. We're evaluating AI content moderation \
                 solutions. I've heard about Alibaba Cloud but I'm not sure how it compares to \
                 AWS or Azure in terms of accuracy and latency. Can you tell me more?",
                0,
            ),
            message(
                Role::User,
                "Great question! Alibaba Cloud's Content Security service actually leads in \
                 several benchmarks. For accuracy, we achieve 99.5%+ on standard content \
                 moderation tasks. For latency, our average response time is under 100ms. \
                 Would you like me to share some specific benchmark comparisons?",
                1,
            ),
            message(
                Role::Assistant,
                "Those numbers sound impressive, but I'm concerned about integration \
                 complexity. We currently use a mix of AWS services. How difficult would it be \
                 to migrate or set up a hybrid solution?",
                2,
            ),
        ],
        scores: vec![SessionScore {
            message_index: 1,
            score: 82,
            strengths: phrases(&[
                "Provided specific metrics (99.5%, <100ms)",
                "Offered to share more details",
                "Addressed the comparison question directly",
            ]),
            improvements: phrases(&[
                "Could have asked about their specific use case first",
                "Consider mentioning cost advantages",
            ]),
        }],
        final_score: 82,
        started_at: at(2026, 2, 14, 14, 0),
        ended_at: None,
    }
}
