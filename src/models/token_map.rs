//! Token map data models

use crate::token_map::aggregate;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One AI-powered workflow and its estimated token volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UseCase {
    pub id: String,
    pub name: String,
    /// Provider key, e.g. `alibaba`
    pub provider: String,
    pub model: String,
    #[serde(alias = "token_estimate")]
    pub tokens: u64,
    /// Estimate confidence (0.0-1.0)
    pub confidence: f64,
    #[serde(default, alias = "is_editable")]
    pub editable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Category of use cases within a layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMapCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub use_cases: Vec<UseCase>,
}

impl TokenMapCategory {
    pub fn total_tokens(&self) -> u64 {
        aggregate::sum_tokens(&self.use_cases)
    }
}

/// Business layer as returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMapLayer {
    pub id: String,
    /// Localised name
    pub name: String,
    /// English name
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub categories: Vec<TokenMapCategory>,
}

impl TokenMapLayer {
    pub fn use_cases(&self) -> impl Iterator<Item = &UseCase> {
        self.categories.iter().flat_map(|c| c.use_cases.iter())
    }

    pub fn total_tokens(&self) -> u64 {
        aggregate::sum_tokens(self.use_cases())
    }
}

/// Aggregate token share attributed to one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDistribution {
    /// Provider key
    #[serde(default)]
    pub provider: String,
    /// Display name
    pub name: String,
    pub token_count: u64,
    /// Share of the map total, one decimal place
    pub percentage: f64,
}

/// A customer's token map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenMapData {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub layers: Vec<TokenMapLayer>,
    #[serde(default)]
    pub providers: Vec<ProviderDistribution>,
    #[serde(default)]
    pub total_tokens: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TokenMapData {
    pub fn use_cases(&self) -> impl Iterator<Item = &UseCase> {
        self.layers.iter().flat_map(|l| l.use_cases())
    }

    /// Re-derive `total_tokens` and `providers` from the layers.
    ///
    /// Stored figures are never trusted; call this after any edit.
    pub fn refresh_aggregates(&mut self) {
        self.total_tokens = aggregate::sum_tokens(self.use_cases());
        self.providers = aggregate::provider_distribution(self.use_cases());
    }

    /// Apply a partial update and re-derive the aggregates
    pub fn apply_patch(&mut self, patch: TokenMapPatch) {
        if let Some(customer_id) = patch.customer_id {
            self.customer_id = customer_id;
        }
        if let Some(customer_name) = patch.customer_name {
            self.customer_name = customer_name;
        }
        if let Some(layers) = patch.layers {
            self.layers = layers;
        }
        self.refresh_aggregates();
    }
}

/// Partial token map for `PUT /token-map/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMapPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<TokenMapLayer>>,
}

/// Body of `POST /token-map/generate`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateTokenMapRequest {
    pub company_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// Export format for `GET /token-map/:id/export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Png,
    Pdf,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Png => "image/png",
            Self::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "png" => Ok(Self::Png),
            "pdf" => Ok(Self::Pdf),
            other => Err(format!("unknown export format: {}", other)),
        }
    }
}

/// Exported token map file
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub format: ExportFormat,
    pub content_type: String,
    pub bytes: Bytes,
}
