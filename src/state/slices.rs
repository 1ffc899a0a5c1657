//! Typed application-state slices
//!
//! Each slice persists only its small preference/identity fields; loaded
//! data and in-flight flags live in memory.

use super::storage::LocalStore;
use crate::models::{Difficulty, RolePlaySession, Scenario, Solution, TokenMapData};
use crate::token_map::Board;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A slice stored in the local store under a fixed key
pub trait Persisted: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Zh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiSlice {
    pub sidebar_collapsed: bool,
    pub language: Language,
    pub theme: Theme,
}

impl Persisted for UiSlice {
    const KEY: &'static str = "ui-storage";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenMapSlice {
    pub current_map_id: Option<String>,
    #[serde(skip)]
    pub is_loading: bool,
    /// Last map received from the service
    #[serde(skip)]
    pub data: Option<TokenMapData>,
    #[serde(skip)]
    pub board: Board,
    /// Board edited since the last load or save
    #[serde(skip)]
    pub dirty: bool,
}

impl Persisted for TokenMapSlice {
    const KEY: &'static str = "token-map-storage";
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SolutionSlice {
    pub current_solution_id: Option<String>,
    /// Version labels seen for the current solution, oldest first
    pub version_history: Vec<String>,
    #[serde(skip)]
    pub is_loading: bool,
    #[serde(skip)]
    pub current: Option<Solution>,
}

impl Persisted for SolutionSlice {
    const KEY: &'static str = "solution-storage";
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RolePlaySlice {
    pub session_id: Option<String>,
    pub scenario: Option<Scenario>,
    pub difficulty: Difficulty,
    pub score: u8,
    #[serde(skip)]
    pub is_loading: bool,
    #[serde(skip)]
    pub session: Option<RolePlaySession>,
}

impl Default for RolePlaySlice {
    fn default() -> Self {
        Self {
            session_id: None,
            scenario: None,
            difficulty: Difficulty::Medium,
            score: 0,
            is_loading: false,
            session: None,
        }
    }
}

impl Persisted for RolePlaySlice {
    const KEY: &'static str = "role-play-storage";
}

/// Every slice plus the store they persist into
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LocalStore>,
    pub ui: Arc<RwLock<UiSlice>>,
    pub token_map: Arc<RwLock<TokenMapSlice>>,
    pub solution: Arc<RwLock<SolutionSlice>>,
    pub role_play: Arc<RwLock<RolePlaySlice>>,
}

impl AppState {
    /// Rehydrate every slice from the store
    pub fn load(store: Arc<LocalStore>) -> Self {
        Self {
            ui: Arc::new(RwLock::new(store.load())),
            token_map: Arc::new(RwLock::new(store.load())),
            solution: Arc::new(RwLock::new(store.load())),
            role_play: Arc::new(RwLock::new(store.load())),
            store,
        }
    }

    /// Drop everything persisted and reset the slices to their defaults
    pub async fn reset(&self) {
        self.store.clear();
        *self.ui.write().await = UiSlice::default();
        *self.token_map.write().await = TokenMapSlice::default();
        *self.solution.write().await = SolutionSlice::default();
        *self.role_play.write().await = RolePlaySlice::default();
    }
}
