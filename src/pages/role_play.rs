//! Role-play page controller
//!
//! The page keeps the transcript. Replies are appended only while the
//! session they belong to is still the active, unfinished one.

use crate::error::{Error, Result};
use crate::metrics::METRICS;
use crate::models::{
    ChatMessage, Difficulty, Role, RolePlaySession, RolePlayTurn, Scenario,
    StartSessionRequest,
};
use crate::services::RolePlayService;
use crate::state::{LocalStore, Outcome, RequestSequencer, RolePlaySlice};
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

const PAGE: &str = "role_play";

pub struct RolePlayPage {
    service: Arc<dyn RolePlayService>,
    slice: Arc<RwLock<RolePlaySlice>>,
    store: Arc<LocalStore>,
    sequencer: RequestSequencer,
}

impl RolePlayPage {
    pub fn new(
        service: Arc<dyn RolePlayService>,
        slice: Arc<RwLock<RolePlaySlice>>,
        store: Arc<LocalStore>,
    ) -> Self {
        Self {
            service,
            slice,
            store,
            sequencer: RequestSequencer::new(),
        }
    }

    pub async fn start(
        &self,
        scenario: Scenario,
        difficulty: Difficulty,
        context: Option<String>,
    ) -> Result<Outcome<RolePlaySession>> {
        info!(%scenario, ?difficulty, "Starting role-play session");

        let ticket = self.sequencer.issue();
        self.slice.write().await.is_loading = true;

        let result = self
            .service
            .start(StartSessionRequest {
                scenario,
                difficulty,
                context,
            })
            .await;

        let mut slice = self.slice.write().await;
        if !self.sequencer.is_current(ticket) {
            return Ok(self.superseded());
        }

        slice.is_loading = false;
        let session = result?;
        slice.session_id = Some(session.id.clone());
        slice.scenario = Some(session.scenario);
        slice.difficulty = session.difficulty;
        slice.score = 0;
        slice.session = Some(session.clone());
        self.store.save(&*slice);

        Ok(Outcome::Applied(session))
    }

    /// Resume an existing session
    pub async fn load(&self, session_id: &str) -> Result<Outcome<RolePlaySession>> {
        let ticket = self.sequencer.issue();
        let result = self.service.get(session_id).await;

        let mut slice = self.slice.write().await;
        if !self.sequencer.is_current(ticket) {
            return Ok(self.superseded());
        }

        let session = result?;
        slice.session_id = Some(session.id.clone());
        slice.scenario = Some(session.scenario);
        slice.difficulty = session.difficulty;
        slice.score = if session.is_ended() {
            session.final_score
        } else {
            session.average_score()
        };
        slice.session = Some(session.clone());
        self.store.save(&*slice);

        Ok(Outcome::Applied(session))
    }

    /// Send a salesperson message.
    ///
    /// The message is added to the transcript right away; the customer reply
    /// and the evaluation follow when the service answers. A failed call
    /// takes the unanswered message back out.
    pub async fn send(&self, message: &str) -> Result<Outcome<RolePlayTurn>> {
        let message = message.trim();
        if message.is_empty() {
            return Err(Error::Invalid("message is required".to_string()));
        }

        let (session_id, message_index) = {
            let mut slice = self.slice.write().await;
            let session = active_session(&mut slice)?;
            session.messages.push(ChatMessage::user(message));
            (session.id.clone(), session.messages.len() - 1)
        };

        let result = self.service.respond(&session_id, message).await;

        let mut slice = self.slice.write().await;
        let session = match slice.session.as_mut() {
            Some(session) if session.id == session_id && !session.is_ended() => session,
            _ => return Ok(self.superseded()),
        };

        let mut turn = match result {
            Ok(turn) => turn,
            Err(e) => {
                discard_unanswered(session, message_index, message);
                return Err(e.into());
            }
        };
        turn.evaluation.message_index = message_index;
        session.messages.push(turn.customer_response.clone());
        session.scores.push(turn.evaluation.clone());
        let score = session.average_score();

        slice.score = score;
        self.store.save(&*slice);

        Ok(Outcome::Applied(turn))
    }

    /// Finish the active session; the transcript stays as recorded locally
    pub async fn end(&self) -> Result<Outcome<RolePlaySession>> {
        let session_id = {
            let mut slice = self.slice.write().await;
            active_session(&mut slice)?.id.clone()
        };

        let ticket = self.sequencer.issue();
        let result = self.service.end(&session_id).await;

        let mut slice = self.slice.write().await;
        if !self.sequencer.is_current(ticket) {
            return Ok(self.superseded());
        }
        let session = match slice.session.as_mut() {
            Some(session) if session.id == session_id => session,
            _ => return Ok(self.superseded()),
        };

        let summary = result?;
        session.final_score = summary.final_score;
        session.ended_at = summary.ended_at.or_else(|| Some(Utc::now()));
        let session = session.clone();

        slice.score = session.final_score;
        self.store.save(&*slice);

        Ok(Outcome::Applied(session))
    }

    /// Past sessions known to the service
    pub async fn sessions(&self) -> Result<Vec<RolePlaySession>> {
        Ok(self.service.list().await?)
    }

    pub async fn view(&self) -> RolePlaySlice {
        self.slice.read().await.clone()
    }

    pub fn invalidate(&self) {
        self.sequencer.invalidate();
    }

    fn superseded<T>(&self) -> Outcome<T> {
        METRICS.record_superseded(PAGE);
        warn!(page = PAGE, "Discarding superseded response");
        Outcome::Superseded
    }
}

fn active_session(slice: &mut RolePlaySlice) -> Result<&mut RolePlaySession> {
    match slice.session.as_mut() {
        Some(session) if !session.is_ended() => Ok(session),
        Some(_) => Err(Error::Invalid("session has already ended".to_string())),
        None => Err(Error::Invalid("no active role-play session".to_string())),
    }
}

fn discard_unanswered(session: &mut RolePlaySession, index: usize, content: &str) {
    let unanswered = session
        .messages
        .get(index)
        .is_some_and(|m| m.role == Role::User && m.content == content);
    if unanswered {
        session.messages.remove(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockConfig;
    use crate::error::ServiceError;
    use crate::fixtures;
    use crate::role_play::Simulator;
    use crate::services::{MockRolePlayService, ServiceResult};
    use async_trait::async_trait;

    fn page_with(latency: MockConfig) -> RolePlayPage {
        RolePlayPage::new(
            Arc::new(MockRolePlayService::with_simulator(
                Arc::new(latency),
                Simulator::seeded(1),
            )),
            Arc::new(RwLock::new(RolePlaySlice::default())),
            Arc::new(LocalStore::in_memory()),
        )
    }

    fn page() -> RolePlayPage {
        page_with(MockConfig::instant())
    }

    #[tokio::test]
    async fn test_conversation_flow() {
        let page = page();
        let session = page
            .start(Scenario::Objection, Difficulty::Hard, None)
            .await
            .unwrap()
            .applied()
            .unwrap();

        let first = page.send("We offer an SLA of 99.95%").await.unwrap().applied().unwrap();
        let second = page.send("Migration is handled by our team").await.unwrap().applied().unwrap();
        assert_eq!(first.evaluation.message_index, 1);
        assert_eq!(second.evaluation.message_index, 3);

        let view = page.view().await;
        let current = view.session.unwrap();
        assert_eq!(current.id, session.id);
        assert_eq!(current.messages.len(), 5);
        assert_eq!(current.messages[1].role, Role::User);
        assert_eq!(current.messages[2].role, Role::Assistant);
        assert_eq!(view.score, current.average_score());
        assert_eq!(view.difficulty, Difficulty::Hard);

        let ended = page.end().await.unwrap().applied().unwrap();
        assert!(ended.is_ended());
        assert_eq!(ended.messages.len(), 5);
        assert_eq!(page.view().await.score, ended.final_score);
    }

    #[tokio::test]
    async fn test_send_requires_active_session() {
        let page = page();
        assert!(matches!(page.send("hi").await, Err(Error::Invalid(_))));

        page.start(Scenario::Discovery, Difficulty::Easy, None).await.unwrap();
        page.end().await.unwrap();
        assert!(matches!(page.send("hi").await, Err(Error::Invalid(_))));
        assert!(matches!(page.end().await, Err(Error::Invalid(_))));
    }

    #[tokio::test]
    async fn test_reply_for_replaced_session_is_dropped() {
        let page = Arc::new(page_with(MockConfig {
            role_play_respond_ms: 30,
            ..MockConfig::instant()
        }));
        page.start(Scenario::Technical, Difficulty::Medium, None).await.unwrap();

        let pending = {
            let page = Arc::clone(&page);
            tokio::spawn(async move { page.send("Our p99 is 40ms").await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let fresh = page
            .start(Scenario::Executive, Difficulty::Medium, None)
            .await
            .unwrap()
            .applied()
            .unwrap();

        assert!(pending.await.unwrap().unwrap().is_superseded());
        let view = page.view().await;
        assert_eq!(view.session_id, Some(fresh.id));
        assert_eq!(view.session.unwrap().messages.len(), 1);
    }

    struct Offline;

    #[async_trait]
    impl RolePlayService for Offline {
        async fn start(&self, _request: StartSessionRequest) -> ServiceResult<RolePlaySession> {
            Err(ServiceError::RequestFailed("offline".to_string()))
        }

        async fn respond(&self, _session_id: &str, _message: &str) -> ServiceResult<RolePlayTurn> {
            Err(ServiceError::RequestFailed("offline".to_string()))
        }

        async fn end(&self, _session_id: &str) -> ServiceResult<RolePlaySession> {
            Err(ServiceError::RequestFailed("offline".to_string()))
        }

        async fn get(&self, _session_id: &str) -> ServiceResult<RolePlaySession> {
            Err(ServiceError::RequestFailed("offline".to_string()))
        }

        async fn list(&self) -> ServiceResult<Vec<RolePlaySession>> {
            Err(ServiceError::RequestFailed("offline".to_string()))
        }
    }

    #[tokio::test]
    async fn test_failed_send_leaves_transcript_unchanged() {
        let slice = Arc::new(RwLock::new(RolePlaySlice {
            session: Some(fixtures::role_play_session()),
            ..Default::default()
        }));
        let page = RolePlayPage::new(
            Arc::new(Offline),
            Arc::clone(&slice),
            Arc::new(LocalStore::in_memory()),
        );
        let before = slice.read().await.session.clone().unwrap().messages;

        let result = page.send("Our SLA is 99.95%").await;

        assert!(matches!(result, Err(Error::Service(ServiceError::RequestFailed(_)))));
        let after = slice.read().await.session.clone().unwrap().messages;
        assert_eq!(after, before);
    }

    #[tokio::test]
    async fn test_load_existing_session() {
        let page = page();
        let session = page.load("session-001").await.unwrap().applied().unwrap();
        assert_eq!(session.scenario, Scenario::Technical);
        assert_eq!(page.view().await.score, 82);
        assert_eq!(page.sessions().await.unwrap().len(), 1);
    }
}
