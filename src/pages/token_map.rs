//! Token map page controller

use crate::error::{Error, Result};
use crate::metrics::METRICS;
use crate::models::{
    ExportFormat, ExportedFile, GenerateTokenMapRequest, ProviderDistribution, TokenMapData,
    TokenMapPatch,
};
use crate::services::{ServiceResult, TokenMapService};
use crate::state::{LocalStore, Outcome, RequestSequencer, Ticket, TokenMapSlice};
use crate::token_map::Board;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

const PAGE: &str = "token_map";

/// Read-only snapshot for rendering
#[derive(Debug, Clone)]
pub struct TokenMapView {
    pub map_id: Option<String>,
    pub customer_name: Option<String>,
    pub board: Board,
    pub total_tokens: u64,
    pub providers: Vec<ProviderDistribution>,
    pub is_loading: bool,
    pub dirty: bool,
}

pub struct TokenMapPage {
    service: Arc<dyn TokenMapService>,
    slice: Arc<RwLock<TokenMapSlice>>,
    store: Arc<LocalStore>,
    sequencer: RequestSequencer,
}

impl TokenMapPage {
    pub fn new(
        service: Arc<dyn TokenMapService>,
        slice: Arc<RwLock<TokenMapSlice>>,
        store: Arc<LocalStore>,
    ) -> Self {
        Self {
            service,
            slice,
            store,
            sequencer: RequestSequencer::new(),
        }
    }

    /// Generate a map for a company and make it the current one
    pub async fn generate(
        &self,
        company_name: &str,
        context: Option<String>,
    ) -> Result<Outcome<TokenMapData>> {
        let company_name = company_name.trim();
        if company_name.is_empty() {
            return Err(Error::Invalid("company name is required".to_string()));
        }

        info!(company_name, "Generating token map");
        let request = GenerateTokenMapRequest {
            company_name: company_name.to_string(),
            context,
        };

        let ticket = self.begin().await;
        let result = self.service.generate(request).await;
        self.finish(ticket, result, replace_map).await
    }

    pub async fn load(&self, id: &str) -> Result<Outcome<TokenMapData>> {
        let ticket = self.begin().await;
        let result = self.service.get(id).await;
        self.finish(ticket, result, replace_map).await
    }

    /// Reload the map remembered from a previous run, if nothing is loaded yet
    pub async fn restore(&self) -> Result<Option<Outcome<TokenMapData>>> {
        let remembered = {
            let slice = self.slice.read().await;
            match (&slice.current_map_id, &slice.data) {
                (Some(id), None) => Some(id.clone()),
                _ => None,
            }
        };

        match remembered {
            Some(id) => self.load(&id).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn toggle_layer(&self, layer_id: &str) -> Board {
        let mut slice = self.slice.write().await;
        slice.board = slice.board.toggle_layer(layer_id);
        METRICS.record_board_edit("toggle_layer");
        slice.board.clone()
    }

    pub async fn toggle_category(&self, layer_id: &str, category_id: &str) -> Board {
        let mut slice = self.slice.write().await;
        slice.board = slice.board.toggle_category(layer_id, category_id);
        METRICS.record_board_edit("toggle_category");
        slice.board.clone()
    }

    /// Apply free-text token input to an editable use case.
    ///
    /// Returns whether the board changed; invalid input and read-only use
    /// cases are ignored.
    pub async fn update_use_case_tokens(
        &self,
        layer_id: &str,
        use_case_id: &str,
        input: &str,
    ) -> bool {
        let mut slice = self.slice.write().await;
        let next = slice.board.update_use_case_tokens(layer_id, use_case_id, input);
        if next.ptr_eq(&slice.board) {
            return false;
        }

        slice.board = next;
        slice.dirty = true;
        METRICS.record_board_edit("update_tokens");
        true
    }

    /// Send the edited layers back; the service re-derives the aggregates
    pub async fn save(&self) -> Result<Outcome<TokenMapData>> {
        let (id, patch) = {
            let slice = self.slice.read().await;
            let data = slice
                .data
                .as_ref()
                .ok_or_else(|| Error::Invalid("no token map loaded".to_string()))?;
            let patch = TokenMapPatch {
                customer_name: Some(data.customer_name.clone()),
                layers: Some(slice.board.to_layers()),
                ..Default::default()
            };
            (data.id.clone(), patch)
        };

        let ticket = self.begin().await;
        let result = self.service.update(&id, patch).await;
        self.finish(ticket, result, |slice, saved| {
            slice.dirty = slice.board.to_layers() != saved.layers;
            slice.current_map_id = Some(saved.id.clone());
            slice.data = Some(saved.clone());
        })
        .await
    }

    pub async fn export(&self, format: ExportFormat) -> Result<ExportedFile> {
        let id = self
            .slice
            .read()
            .await
            .current_map_id
            .clone()
            .ok_or_else(|| Error::Invalid("no token map loaded".to_string()))?;

        Ok(self.service.export(&id, format).await?)
    }

    pub async fn view(&self) -> TokenMapView {
        let slice = self.slice.read().await;
        TokenMapView {
            map_id: slice.current_map_id.clone(),
            customer_name: slice.data.as_ref().map(|d| d.customer_name.clone()),
            board: slice.board.clone(),
            total_tokens: slice.board.total_tokens(),
            providers: slice.board.provider_distribution(),
            is_loading: slice.is_loading,
            dirty: slice.dirty,
        }
    }

    /// Drop every response still in flight
    pub fn invalidate(&self) {
        self.sequencer.invalidate();
    }

    async fn begin(&self) -> Ticket {
        let ticket = self.sequencer.issue();
        self.slice.write().await.is_loading = true;
        ticket
    }

    async fn finish<F>(
        &self,
        ticket: Ticket,
        result: ServiceResult<TokenMapData>,
        apply: F,
    ) -> Result<Outcome<TokenMapData>>
    where
        F: FnOnce(&mut TokenMapSlice, &TokenMapData),
    {
        let mut slice = self.slice.write().await;
        if !self.sequencer.is_current(ticket) {
            METRICS.record_superseded(PAGE);
            warn!(page = PAGE, "Discarding superseded response");
            return Ok(Outcome::Superseded);
        }

        slice.is_loading = false;
        let data = result?;
        apply(&mut *slice, &data);
        self.store.save(&*slice);
        Ok(Outcome::Applied(data))
    }
}

fn replace_map(slice: &mut TokenMapSlice, data: &TokenMapData) {
    slice.current_map_id = Some(data.id.clone());
    slice.board = Board::from_token_map(data);
    slice.data = Some(data.clone());
    slice.dirty = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MockConfig;
    use crate::services::MockTokenMapService;

    fn page() -> TokenMapPage {
        TokenMapPage::new(
            Arc::new(MockTokenMapService::new(Arc::new(MockConfig::instant()))),
            Arc::new(RwLock::new(TokenMapSlice::default())),
            Arc::new(LocalStore::in_memory()),
        )
    }

    #[tokio::test]
    async fn test_generate_builds_board() {
        let page = page();
        let data = page.generate("Acme", None).await.unwrap().applied().unwrap();

        let view = page.view().await;
        assert_eq!(view.map_id.as_deref(), Some(data.id.as_str()));
        assert_eq!(view.customer_name.as_deref(), Some("Acme"));
        assert_eq!(view.total_tokens, 24_310_000_000);
        assert_eq!(view.board.layers().len(), 3);
        assert!(!view.is_loading);
        assert!(!view.dirty);
    }

    #[tokio::test]
    async fn test_blank_company_is_rejected() {
        let page = page();
        assert!(matches!(page.generate("  ", None).await, Err(Error::Invalid(_))));
    }

    #[tokio::test]
    async fn test_edit_then_save_clears_dirty_flag() {
        let page = page();
        page.generate("Acme", None).await.unwrap();

        assert!(!page.update_use_case_tokens("external", "sc1", "1k").await);
        assert!(page.update_use_case_tokens("external", "sc4", "1.6b").await);

        let view = page.view().await;
        assert!(view.dirty);
        assert_eq!(view.total_tokens, 24_310_000_000 + 1_000_000_000);

        let saved = page.save().await.unwrap().applied().unwrap();
        assert_eq!(saved.total_tokens, 25_310_000_000);
        assert!(!page.view().await.dirty);
    }

    #[tokio::test]
    async fn test_save_keeps_generated_customer_name() {
        let page = page();
        page.generate("Acme", None).await.unwrap();
        assert!(page.update_use_case_tokens("resource", "gr2", "1m").await);

        let saved = page.save().await.unwrap().applied().unwrap();
        assert_eq!(saved.customer_name, "Acme");
        assert_eq!(page.view().await.customer_name.as_deref(), Some("Acme"));
    }

    #[tokio::test]
    async fn test_save_without_map_fails() {
        assert!(matches!(page().save().await, Err(Error::Invalid(_))));
    }

    #[tokio::test]
    async fn test_toggles_survive_save() {
        let page = page();
        page.generate("Acme", None).await.unwrap();
        page.toggle_layer("resource").await;
        page.save().await.unwrap();

        let view = page.view().await;
        assert!(view.board.layer("resource").unwrap().expanded);
    }

    #[tokio::test]
    async fn test_current_map_is_persisted() {
        let store = Arc::new(LocalStore::in_memory());
        let page = TokenMapPage::new(
            Arc::new(MockTokenMapService::new(Arc::new(MockConfig::instant()))),
            Arc::new(RwLock::new(TokenMapSlice::default())),
            Arc::clone(&store),
        );
        let data = page.load("map-77").await.unwrap().applied().unwrap();

        let persisted: TokenMapSlice = store.load();
        assert_eq!(persisted.current_map_id, Some(data.id));
        assert!(persisted.data.is_none());
    }

    #[tokio::test]
    async fn test_restore_reloads_remembered_map() {
        let page = TokenMapPage::new(
            Arc::new(MockTokenMapService::new(Arc::new(MockConfig::instant()))),
            Arc::new(RwLock::new(TokenMapSlice {
                current_map_id: Some("map-5".to_string()),
                ..Default::default()
            })),
            Arc::new(LocalStore::in_memory()),
        );

        let restored = page.restore().await.unwrap();
        assert!(matches!(restored, Some(Outcome::Applied(ref d)) if d.id == "map-5"));
        assert!(page.restore().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_overlapping_generates_keep_latest() {
        let latency = MockConfig {
            token_map_generate_ms: 30,
            ..MockConfig::instant()
        };
        let page = Arc::new(TokenMapPage::new(
            Arc::new(MockTokenMapService::new(Arc::new(latency))),
            Arc::new(RwLock::new(TokenMapSlice::default())),
            Arc::new(LocalStore::in_memory()),
        ));

        let first = {
            let page = Arc::clone(&page);
            tokio::spawn(async move { page.generate("First", None).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = page.generate("Second", None).await.unwrap();

        let first = first.await.unwrap().unwrap();
        assert!(first.is_superseded());
        let second = second.applied().unwrap();

        let view = page.view().await;
        assert_eq!(view.customer_name.as_deref(), Some("Second"));
        assert_eq!(view.map_id, Some(second.id));
    }
}
