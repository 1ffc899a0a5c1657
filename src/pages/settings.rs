//! Settings page controller

use crate::error::Result;
use crate::state::{AppState, Language, Theme, UiSlice};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// Preferences included in the data export
#[derive(Debug, Clone, Serialize)]
pub struct ExportedSettings {
    pub language: Language,
    pub theme: Theme,
}

/// Downloadable snapshot of preferences and everything in the local store
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataExport {
    pub settings: ExportedSettings,
    pub local_storage: IndexMap<String, String>,
    pub exported_at: DateTime<Utc>,
}

impl DataExport {
    /// `tokenholic-data-YYYY-MM-DD.json`
    pub fn file_name(&self) -> String {
        format!("tokenholic-data-{}.json", self.exported_at.format("%Y-%m-%d"))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub struct SettingsPage {
    state: AppState,
}

impl SettingsPage {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    pub async fn preferences(&self) -> UiSlice {
        self.state.ui.read().await.clone()
    }

    pub async fn set_language(&self, language: Language) {
        self.update(|ui| ui.language = language).await;
    }

    pub async fn set_theme(&self, theme: Theme) {
        self.update(|ui| ui.theme = theme).await;
    }

    /// Returns the new collapsed state
    pub async fn toggle_sidebar(&self) -> bool {
        self.update(|ui| ui.sidebar_collapsed = !ui.sidebar_collapsed)
            .await
            .sidebar_collapsed
    }

    pub async fn export(&self) -> DataExport {
        self.export_at(Utc::now()).await
    }

    pub async fn export_at(&self, now: DateTime<Utc>) -> DataExport {
        let ui = self.state.ui.read().await.clone();
        DataExport {
            settings: ExportedSettings {
                language: ui.language,
                theme: ui.theme,
            },
            local_storage: self.state.store.snapshot(),
            exported_at: now,
        }
    }

    /// Write the export into `dir`, returning the file path
    pub async fn export_to(&self, dir: &Path) -> Result<PathBuf> {
        let export = self.export().await;
        let path = dir.join(export.file_name());
        tokio::fs::write(&path, export.to_json()?).await?;
        info!(path = %path.display(), "Exported local data");
        Ok(path)
    }

    /// Forget every persisted value and reset all slices
    pub async fn clear_data(&self) {
        self.state.reset().await;
        info!("Cleared local data");
    }

    async fn update(&self, f: impl FnOnce(&mut UiSlice)) -> UiSlice {
        let mut ui = self.state.ui.write().await;
        f(&mut *ui);
        self.state.store.save(&*ui);
        ui.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::LocalStore;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn page() -> SettingsPage {
        SettingsPage::new(AppState::load(Arc::new(LocalStore::in_memory())))
    }

    #[tokio::test]
    async fn test_preferences_are_persisted() {
        let page = page();
        page.set_language(Language::Zh).await;
        page.set_theme(Theme::System).await;
        assert!(page.toggle_sidebar().await);
        assert!(!page.toggle_sidebar().await);

        let reloaded: UiSlice = page.state.store.load();
        assert_eq!(reloaded.language, Language::Zh);
        assert_eq!(reloaded.theme, Theme::System);
        assert!(!reloaded.sidebar_collapsed);
    }

    #[tokio::test]
    async fn test_export_shape_and_name() {
        let page = page();
        page.set_theme(Theme::Dark).await;

        let now = Utc.with_ymd_and_hms(2026, 3, 7, 23, 59, 0).unwrap();
        let export = page.export_at(now).await;
        assert_eq!(export.file_name(), "tokenholic-data-2026-03-07.json");

        let value: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(value["settings"]["theme"], "dark");
        assert_eq!(value["settings"]["language"], "en");
        assert!(value["localStorage"]["ui-storage"].is_string());
        assert_eq!(value["exportedAt"], "2026-03-07T23:59:00Z");
        assert!(value.get("version").is_none());
    }

    #[tokio::test]
    async fn test_export_to_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = page().export_to(dir.path()).await.unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("tokenholic-data-"));
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("\"exportedAt\""));
    }

    #[tokio::test]
    async fn test_clear_data_resets_preferences() {
        let page = page();
        page.set_language(Language::Zh).await;
        page.clear_data().await;

        assert_eq!(page.preferences().await, UiSlice::default());
        assert!(page.state.store.is_empty());
    }
}
