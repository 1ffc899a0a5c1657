//! Page controllers and the composition root
//!
//! Each page owns only the slices it needs. `App` wires them to one
//! service set and one local store.

pub mod role_play;
pub mod settings;
pub mod solution;
pub mod token_map;

pub use role_play::RolePlayPage;
pub use settings::{DataExport, ExportedSettings, SettingsPage};
pub use solution::SolutionPage;
pub use token_map::{TokenMapPage, TokenMapView};

use crate::config::Config;
use crate::error::Result;
use crate::services::Services;
use crate::state::{AppState, LocalStore};
use std::sync::Arc;
use tracing::info;

pub struct App {
    pub services: Services,
    pub state: AppState,
    pub token_map: TokenMapPage,
    pub solution: SolutionPage,
    pub role_play: RolePlayPage,
    pub settings: SettingsPage,
}

impl App {
    pub fn new(services: Services, store: Arc<LocalStore>) -> Self {
        let state = AppState::load(store);

        Self {
            token_map: TokenMapPage::new(
                Arc::clone(&services.token_map),
                Arc::clone(&state.token_map),
                Arc::clone(&state.store),
            ),
            solution: SolutionPage::new(
                Arc::clone(&services.solution),
                Arc::clone(&state.solution),
                Arc::clone(&state.store),
            ),
            role_play: RolePlayPage::new(
                Arc::clone(&services.role_play),
                Arc::clone(&state.role_play),
                Arc::clone(&state.store),
            ),
            settings: SettingsPage::new(state.clone()),
            services,
            state,
        }
    }

    /// Resolve the service mode and open the local store from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let services = Services::from_config(config)?;
        let store = Arc::new(LocalStore::open(&config.storage.path));
        info!(mode = ?services.mode(), store = %config.storage.path.display(), "Application ready");
        Ok(Self::new(services, store))
    }

    /// Drop in-flight responses, persisted data and all slice state
    pub async fn clear_data(&self) {
        self.token_map.invalidate();
        self.solution.invalidate();
        self.role_play.invalidate();
        self.settings.clear_data().await;
    }
}
