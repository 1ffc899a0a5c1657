//! Solution page controller

use crate::error::{Error, Result};
use crate::metrics::METRICS;
use crate::models::{RecommendRequest, Solution, SolutionVersion};
use crate::services::{ServiceResult, SolutionService};
use crate::state::{LocalStore, Outcome, RequestSequencer, SolutionSlice};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

const PAGE: &str = "solution";

pub struct SolutionPage {
    service: Arc<dyn SolutionService>,
    slice: Arc<RwLock<SolutionSlice>>,
    store: Arc<LocalStore>,
    sequencer: RequestSequencer,
}

impl SolutionPage {
    pub fn new(
        service: Arc<dyn SolutionService>,
        slice: Arc<RwLock<SolutionSlice>>,
        store: Arc<LocalStore>,
    ) -> Self {
        Self {
            service,
            slice,
            store,
            sequencer: RequestSequencer::new(),
        }
    }

    pub async fn recommend(
        &self,
        requirements: &str,
        customer_id: Option<String>,
    ) -> Result<Outcome<Solution>> {
        let requirements = requirements.trim();
        if requirements.is_empty() {
            return Err(Error::Invalid("requirements are required".to_string()));
        }

        info!(len = requirements.len(), "Requesting solution recommendation");
        let request = RecommendRequest {
            requirements: requirements.to_string(),
            customer_id,
        };
        self.run(self.service.recommend(request)).await
    }

    pub async fn load(&self, id: &str) -> Result<Outcome<Solution>> {
        self.run(self.service.get(id)).await
    }

    /// Refine the current solution with free-text feedback
    pub async fn refine(&self, feedback: &str) -> Result<Outcome<Solution>> {
        let feedback = feedback.trim();
        if feedback.is_empty() {
            return Err(Error::Invalid("feedback is required".to_string()));
        }

        let id = self.current_id().await?;
        self.run(self.service.refine(&id, feedback)).await
    }

    /// Version history of the current solution
    pub async fn history(&self) -> Result<Vec<SolutionVersion>> {
        let id = self.current_id().await?;
        Ok(self.service.history(&id).await?)
    }

    pub async fn view(&self) -> SolutionSlice {
        self.slice.read().await.clone()
    }

    pub fn invalidate(&self) {
        self.sequencer.invalidate();
    }

    async fn current_id(&self) -> Result<String> {
        self.slice
            .read()
            .await
            .current_solution_id
            .clone()
            .ok_or_else(|| Error::Invalid("no solution selected".to_string()))
    }

    async fn run<F>(&self, call: F) -> Result<Outcome<Solution>>
    where
        F: std::future::Future<Output = ServiceResult<Solution>>,
    {
        let ticket = self.sequencer.issue();
        self.slice.write().await.is_loading = true;

        let result = call.await;

        let mut slice = self.slice.write().await;
        if !self.sequencer.is_current(ticket) {
            METRICS.record_superseded(PAGE);
            warn!(page = PAGE, "Discarding superseded response");
            return Ok(Outcome::Superseded);
        }

        slice.is_loading = false;
        let solution = result?;

        slice.current_solution_id = Some(solution.id.clone());
        slice.version_history = version_labels(&solution);
        slice.current = Some(solution.clone());
        self.store.save(&*slice);

        Ok(Outcome::Applied(solution))
    }
}

/// `<solution id>@v<version>` for every version, oldest first
fn version_labels(solution: &Solution) -> Vec<String> {
    let mut versions: Vec<u32> = solution.versions.iter().map(|v| v.version).collect();
    versions.sort_unstable();
    versions
        .into_iter()
        .map(|v| format!("{}@v{}", solution.id, v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockConfig;
    use crate::services::MockSolutionService;

    fn page() -> SolutionPage {
        SolutionPage::new(
            Arc::new(MockSolutionService::new(Arc::new(MockConfig::instant()))),
            Arc::new(RwLock::new(SolutionSlice::default())),
            Arc::new(LocalStore::in_memory()),
        )
    }

    #[tokio::test]
    async fn test_recommend_then_refine() {
        let page = page();
        let solution = page
            .recommend("Moderate 1M posts a day", Some("cust-9".to_string()))
            .await
            .unwrap()
            .applied()
            .unwrap();
        assert_eq!(solution.customer_id.as_deref(), Some("cust-9"));

        let refined = page.refine("Cheaper please").await.unwrap().applied().unwrap();
        assert_eq!(refined.id, solution.id);
        assert_eq!(refined.next_version(), 3);

        let view = page.view().await;
        assert_eq!(
            view.version_history,
            vec![format!("{}@v1", solution.id), format!("{}@v2", solution.id)]
        );
        assert!(!view.is_loading);
    }

    #[tokio::test]
    async fn test_refine_requires_a_solution() {
        assert!(matches!(page().refine("x").await, Err(Error::Invalid(_))));
        assert!(matches!(page().history().await, Err(Error::Invalid(_))));
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected() {
        let page = page();
        assert!(matches!(page.recommend(" ", None).await, Err(Error::Invalid(_))));

        page.load("sol-1").await.unwrap();
        assert!(matches!(page.refine("").await, Err(Error::Invalid(_))));
    }

    #[tokio::test]
    async fn test_history_of_loaded_solution() {
        let page = page();
        page.load("sol-1").await.unwrap();
        let history = page.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].version, 1);
    }

    #[tokio::test]
    async fn test_stale_recommendation_is_dropped() {
        let latency = MockConfig {
            solution_recommend_ms: 30,
            ..MockConfig::instant()
        };
        let page = Arc::new(SolutionPage::new(
            Arc::new(MockSolutionService::new(Arc::new(latency))),
            Arc::new(RwLock::new(SolutionSlice::default())),
            Arc::new(LocalStore::in_memory()),
        ));

        let slow = {
            let page = Arc::clone(&page);
            tokio::spawn(async move { page.recommend("first", None).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let latest = page.recommend("second", None).await.unwrap().applied().unwrap();

        assert!(slow.await.unwrap().unwrap().is_superseded());
        let view = page.view().await;
        assert_eq!(view.current.map(|s| s.requirements), Some("second".to_string()));
        assert_eq!(view.current_solution_id, Some(latest.id));
    }
}
