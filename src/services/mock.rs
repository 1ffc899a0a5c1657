//! Fixture-backed services
//!
//! Each call waits its configured latency, then returns a fresh copy of the
//! canonical fixture with new identifiers and timestamps where the operation
//! creates something.

use super::{observed, RolePlayService, ServiceResult, SolutionService, TokenMapService};
use crate::config::MockConfig;
use crate::error::ServiceError;
use crate::fixtures::{self, generate_id, FIXTURE_CUSTOMER_NAME};
use crate::models::{
    ChatMessage, ExportFormat, ExportedFile, GenerateTokenMapRequest, RecommendRequest,
    RolePlaySession, RolePlayTurn, Scenario, Solution, SolutionVersion, StartSessionRequest,
    TokenMapData, TokenMapPatch,
};
use crate::role_play::Simulator;
use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

async fn simulate_latency(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

/// Token maps served from the canonical fixture
pub struct MockTokenMapService {
    latency: Arc<MockConfig>,
}

impl MockTokenMapService {
    pub fn new(latency: Arc<MockConfig>) -> Self {
        Self { latency }
    }

    fn fixture_with_id(id: &str) -> TokenMapData {
        TokenMapData {
            id: id.to_string(),
            ..fixtures::token_map(FIXTURE_CUSTOMER_NAME)
        }
    }
}

#[async_trait]
impl TokenMapService for MockTokenMapService {
    async fn generate(&self, request: GenerateTokenMapRequest) -> ServiceResult<TokenMapData> {
        observed("token_map", "generate", async {
            simulate_latency(self.latency.token_map_generate_ms).await;

            let now = Utc::now();
            Ok(TokenMapData {
                id: generate_id("map"),
                created_at: now,
                updated_at: now,
                ..fixtures::token_map(&request.company_name)
            })
        })
        .await
    }

    async fn get(&self, id: &str) -> ServiceResult<TokenMapData> {
        observed("token_map", "get", async {
            simulate_latency(self.latency.token_map_get_ms).await;
            Ok(Self::fixture_with_id(id))
        })
        .await
    }

    async fn update(&self, id: &str, patch: TokenMapPatch) -> ServiceResult<TokenMapData> {
        observed("token_map", "update", async {
            simulate_latency(self.latency.token_map_update_ms).await;

            let mut data = Self::fixture_with_id(id);
            data.apply_patch(patch);
            data.updated_at = Utc::now();
            Ok(data)
        })
        .await
    }

    async fn list_by_customer(&self, customer_id: &str) -> ServiceResult<Vec<TokenMapData>> {
        observed("token_map", "list_by_customer", async {
            simulate_latency(self.latency.token_map_list_ms).await;

            Ok(vec![TokenMapData {
                customer_id: customer_id.to_string(),
                ..fixtures::token_map(FIXTURE_CUSTOMER_NAME)
            }])
        })
        .await
    }

    /// Every format is answered with the JSON document
    async fn export(&self, id: &str, format: ExportFormat) -> ServiceResult<ExportedFile> {
        observed("token_map", "export", async {
            simulate_latency(self.latency.token_map_export_ms).await;

            serde_json::to_vec_pretty(&Self::fixture_with_id(id))
                .map(|body| ExportedFile {
                    format,
                    content_type: ExportFormat::Json.content_type().to_string(),
                    bytes: Bytes::from(body),
                })
                .map_err(|e| ServiceError::InvalidResponse(e.to_string()))
        })
        .await
    }
}

/// Solutions served from the canonical fixture
pub struct MockSolutionService {
    latency: Arc<MockConfig>,
}

impl MockSolutionService {
    pub fn new(latency: Arc<MockConfig>) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl SolutionService for MockSolutionService {
    async fn recommend(&self, request: RecommendRequest) -> ServiceResult<Solution> {
        observed("solution", "recommend", async {
            simulate_latency(self.latency.solution_recommend_ms).await;

            let now = Utc::now();
            Ok(Solution {
                id: generate_id("sol"),
                customer_id: request.customer_id,
                requirements: request.requirements,
                created_at: now,
                updated_at: now,
                ..fixtures::solution()
            })
        })
        .await
    }

    async fn get(&self, id: &str) -> ServiceResult<Solution> {
        observed("solution", "get", async {
            simulate_latency(self.latency.solution_get_ms).await;

            Ok(Solution {
                id: id.to_string(),
                ..fixtures::solution()
            })
        })
        .await
    }

    async fn refine(&self, id: &str, feedback: &str) -> ServiceResult<Solution> {
        observed("solution", "refine", async {
            simulate_latency(self.latency.solution_refine_ms).await;

            let now = Utc::now();
            let mut solution = fixtures::solution();
            let version = SolutionVersion {
                version: solution.next_version(),
                content: format!("Refined based on feedback: {}", feedback),
                created_at: now,
                feedback: Some(feedback.to_string()),
            };
            solution.versions.push(version);
            solution.id = id.to_string();
            solution.updated_at = now;
            Ok(solution)
        })
        .await
    }

    async fn history(&self, _id: &str) -> ServiceResult<Vec<SolutionVersion>> {
        observed("solution", "history", async {
            simulate_latency(self.latency.solution_history_ms).await;
            Ok(fixtures::solution().versions)
        })
        .await
    }
}

/// What the mock remembers about a session it handed out
#[derive(Debug, Clone, Copy)]
struct SessionTrack {
    scenario: Scenario,
    /// Number of messages exchanged so far
    messages: usize,
}

/// Role-play sessions answered by the canned-line simulator
///
/// Sessions the mock started keep their scenario for later replies until they
/// end; any other id is answered as an untracked discovery conversation.
pub struct MockRolePlayService {
    latency: Arc<MockConfig>,
    simulator: Simulator,
    sessions: DashMap<String, SessionTrack>,
}

impl MockRolePlayService {
    pub fn new(latency: Arc<MockConfig>) -> Self {
        Self::with_simulator(latency, Simulator::new())
    }

    pub fn with_simulator(latency: Arc<MockConfig>, simulator: Simulator) -> Self {
        let fixture = fixtures::role_play_session();
        let sessions = DashMap::new();
        sessions.insert(
            fixture.id.clone(),
            SessionTrack {
                scenario: fixture.scenario,
                messages: fixture.messages.len(),
            },
        );

        Self {
            latency,
            simulator,
            sessions,
        }
    }

    fn scenario_of(&self, session_id: &str) -> Option<Scenario> {
        self.sessions.get(session_id).map(|track| track.scenario)
    }

    fn fixture_with_id(&self, session_id: &str) -> RolePlaySession {
        RolePlaySession {
            id: session_id.to_string(),
            scenario: self.scenario_of(session_id).unwrap_or_default(),
            ..fixtures::role_play_session()
        }
    }
}

#[async_trait]
impl RolePlayService for MockRolePlayService {
    async fn start(&self, request: StartSessionRequest) -> ServiceResult<RolePlaySession> {
        observed("role_play", "start", async {
            simulate_latency(self.latency.role_play_start_ms).await;

            let opening = self.simulator.customer_line(request.scenario);
            let session = RolePlaySession {
                id: generate_id("session"),
                scenario: request.scenario,
                difficulty: request.difficulty,
                context: request.context,
                messages: vec![ChatMessage::assistant(opening)],
                scores: Vec::new(),
                final_score: 0,
                started_at: Utc::now(),
                ended_at: None,
            };

            self.sessions.insert(
                session.id.clone(),
                SessionTrack {
                    scenario: session.scenario,
                    messages: session.messages.len(),
                },
            );
            Ok(session)
        })
        .await
    }

    async fn respond(&self, session_id: &str, _message: &str) -> ServiceResult<RolePlayTurn> {
        observed("role_play", "respond", async {
            simulate_latency(self.latency.role_play_respond_ms).await;

            // the salesperson message lands at `messages`, the reply right after it
            let track = match self.sessions.get_mut(session_id) {
                Some(mut entry) => {
                    let before = *entry;
                    entry.messages += 2;
                    before
                }
                None => SessionTrack {
                    scenario: Scenario::Discovery,
                    messages: 1,
                },
            };

            let reply = self.simulator.customer_line(track.scenario);
            Ok(RolePlayTurn {
                customer_response: ChatMessage::assistant(reply),
                evaluation: self.simulator.evaluate(track.messages),
            })
        })
        .await
    }

    async fn end(&self, session_id: &str) -> ServiceResult<RolePlaySession> {
        observed("role_play", "end", async {
            simulate_latency(self.latency.role_play_end_ms).await;

            let scenario = self
                .sessions
                .remove(session_id)
                .map(|(_, track)| track.scenario)
                .unwrap_or_default();

            Ok(RolePlaySession {
                id: session_id.to_string(),
                scenario,
                final_score: self.simulator.final_score(),
                ended_at: Some(Utc::now()),
                ..fixtures::role_play_session()
            })
        })
        .await
    }

    async fn get(&self, session_id: &str) -> ServiceResult<RolePlaySession> {
        observed("role_play", "get", async {
            simulate_latency(self.latency.role_play_get_ms).await;
            Ok(self.fixture_with_id(session_id))
        })
        .await
    }

    async fn list(&self) -> ServiceResult<Vec<RolePlaySession>> {
        observed("role_play", "list", async {
            simulate_latency(self.latency.role_play_list_ms).await;
            Ok(vec![fixtures::role_play_session()])
        })
        .await
    }
}
