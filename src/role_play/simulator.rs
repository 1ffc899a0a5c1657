//! Canned customer replies and stand-in scoring
//!
//! Nothing here looks at what the salesperson wrote. Lines and phrases are
//! drawn at random from fixed lists, and every draw goes through a caller
//! supplied `Rng`, so a seeded generator gives repeatable sessions.

use crate::models::{Scenario, SessionScore};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

const DISCOVERY_LINES: [&str; 3] = [
    "That's interesting. Can you tell me more about how this would benefit our specific use case?",
    "We've been looking at several options. What makes your solution different from competitors?",
    "Cost is a major concern for us. How does your pricing compare to what we're currently using?",
];

const TECHNICAL_LINES: [&str; 3] = [
    "How does your system handle high concurrency? We're looking at 10k requests per second during peak times.",
    "What about data privacy? We have strict requirements around where our data is stored and processed.",
    "Can you walk me through the integration process? We use a microservices architecture.",
];

const OBJECTION_LINES: [&str; 3] = [
    "I've heard your service has had some reliability issues. Can you address that?",
    "Your pricing seems higher than what we're paying now. Why should we switch?",
    "We already have a solution in place. Migrating would be a lot of work.",
];

const EXECUTIVE_LINES: [&str; 3] = [
    "I have 10 minutes. Give me the key points on ROI.",
    "How quickly can we see results? We need to show progress this quarter.",
    "What's your competitive advantage in one sentence?",
];

const STRENGTHS: [&str; 3] = [
    "Clear and professional communication",
    "Addressed the question directly",
    "Good use of specific examples",
];

const IMPROVEMENTS: [&str; 3] = [
    "Consider asking follow-up questions",
    "Could mention specific metrics or case studies",
    "Try to understand their specific pain points",
];

/// Turn scores are drawn from `[60, 90)`
pub const TURN_SCORE_RANGE: std::ops::Range<u8> = 60..90;

/// Final session scores are drawn from `[75, 95)`
pub const FINAL_SCORE_RANGE: std::ops::Range<u8> = 75..95;

fn lines_for(scenario: Scenario) -> &'static [&'static str] {
    match scenario {
        Scenario::Discovery => &DISCOVERY_LINES,
        Scenario::Technical => &TECHNICAL_LINES,
        Scenario::Objection => &OBJECTION_LINES,
        Scenario::Executive => &EXECUTIVE_LINES,
    }
}

/// Pick what the customer says next
pub fn customer_line<R: Rng + ?Sized>(scenario: Scenario, rng: &mut R) -> &'static str {
    let lines = lines_for(scenario);
    lines[rng.gen_range(0..lines.len())]
}

/// Score a salesperson message. The content is ignored.
pub fn evaluate<R: Rng + ?Sized>(message_index: usize, rng: &mut R) -> SessionScore {
    let score = rng.gen_range(TURN_SCORE_RANGE);
    let strengths = leading_phrases(&STRENGTHS, rng);
    let improvements = leading_phrases(&IMPROVEMENTS, rng);

    SessionScore {
        message_index,
        score,
        strengths,
        improvements,
    }
}

pub fn final_score<R: Rng + ?Sized>(rng: &mut R) -> u8 {
    rng.gen_range(FINAL_SCORE_RANGE)
}

/// First one or two phrases of the list
fn leading_phrases<R: Rng + ?Sized>(phrases: &[&str], rng: &mut R) -> Vec<String> {
    let count = rng.gen_range(1..=2);
    phrases.iter().take(count).map(|p| p.to_string()).collect()
}

/// Shareable simulator owning its generator
pub struct Simulator {
    rng: Mutex<StdRng>,
}

impl Simulator {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut *rng)
    }

    pub fn customer_line(&self, scenario: Scenario) -> &'static str {
        self.with_rng(|rng| customer_line(scenario, rng))
    }

    pub fn evaluate(&self, message_index: usize) -> SessionScore {
        self.with_rng(|rng| evaluate(message_index, rng))
    }

    pub fn final_score(&self) -> u8 {
        self.with_rng(|rng| final_score(rng))
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
