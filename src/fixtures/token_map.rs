//! Canonical token map fixture

use super::at;
use crate::models::{TokenMapCategory, TokenMapData, TokenMapLayer, UseCase};

pub const FIXTURE_CUSTOMER_ID: &str = "cust-001";
pub const FIXTURE_CUSTOMER_NAME: &str = "ByteDance";

struct Uc(&'static str, &'static str, &'static str, &'static str, u64, f64);

impl Uc {
    fn build(self) -> UseCase {
        let Uc(id, name, provider, model, tokens, confidence) = self;
        UseCase {
            id: id.to_string(),
            name: name.to_string(),
            provider: provider.to_string(),
            model: model.to_string(),
            tokens,
            confidence,
            editable: false,
            description: None,
        }
    }

    fn editable(self) -> UseCase {
        UseCase {
            editable: true,
            ..self.build()
        }
    }

    fn described(self, description: &str) -> UseCase {
        UseCase {
            description: Some(description.to_string()),
            ..self.build()
        }
    }
}

fn category(id: &str, name: &str, use_cases: Vec<UseCase>) -> TokenMapCategory {
    TokenMapCategory {
        id: id.to_string(),
        name: name.to_string(),
        use_cases,
    }
}

fn layer(
    id: &str,
    name: &str,
    name_en: &str,
    icon: &str,
    color: &str,
    categories: Vec<TokenMapCategory>,
) -> TokenMapLayer {
    TokenMapLayer {
        id: id.to_string(),
        name: name.to_string(),
        name_en: name_en.to_string(),
        icon: icon.to_string(),
        color: color.to_string(),
        categories,
    }
}

const B: u64 = 1_000_000_000;
const M: u64 = 1_000_000;

fn external_layer() -> TokenMapLayer {
    layer(
        "external",
        "对外业务层",
        "External Business Layer",
        "🌐",
        "#3B82F6",
        vec![
            category("script", "Script Creation", vec![
                Uc("sc1", "Assistant Creation", "alibaba", "Qwen Plus", 1200 * M, 0.85)
                    .described("AI-assisted script writing"),
                Uc("sc2", "Assistant Creation", "volcengine", "Qwen-image", 800 * M, 0.7)
                    .described("Image-based generation"),
                Uc("sc3", "Script Rewrite", "overseas", "Gemini", 500 * M, 0.9)
                    .described("Script optimization"),
                Uc("sc4", "Storyboard Script", "alibaba", "Doubao 1.6", 600 * M, 0.75).editable(),
            ]),
            category("storyboard", "Storyboard Generation", vec![
                Uc("sb1", "Character Design", "alibaba", "Seedream 4.0", 900 * M, 0.88).build(),
                Uc("sb2", "Style Design", "volcengine", "Qwen-image", 700 * M, 0.72).build(),
                Uc("sb3", "Style Design", "alibaba", "Nano Banana", 400 * M, 0.65).editable(),
                Uc("sb4", "Scene Segmentation", "alibaba", "Seedream 4.0", 550 * M, 0.8).build(),
                Uc("sb5", "Scene Segmentation", "volcengine", "Qwen-image", 350 * M, 0.6).editable(),
            ]),
            category("video", "Video Production", vec![
                Uc("vp1", "Single Shot Video", "alibaba", "Wan2.5", 1500 * M, 0.92)
                    .described("High-quality single shot generation"),
                Uc("vp2", "Multi-shot Video", "volcengine", "Veo3.1", 1100 * M, 0.78).build(),
                Uc("vp3", "Camera Movement", "alibaba", "Seedance", 800 * M, 0.85).build(),
                Uc("vp4", "Video Composition", "alibaba", "Seedance", 600 * M, 0.82).build(),
            ]),
            category("audio", "Audio & Voice", vec![
                Uc("av1", "Character Dubbing", "alibaba", "ASR", 400 * M, 0.88).build(),
                Uc("av2", "Scene SFX", "alibaba", "ASR", 300 * M, 0.75).build(),
                Uc("av3", "Background Music", "alibaba", "Seed Realtime Voice", 250 * M, 0.7).editable(),
                Uc("av4", "Scene Segmentation", "alibaba", "Cosyvoice", 200 * M, 0.68).build(),
                Uc("av5", "Scene Segmentation", "alibaba", "Seed Realtime Voice", 180 * M, 0.65).editable(),
            ]),
            category("editing", "Editing & Packaging", vec![
                Uc("ep1", "Package Transfer", "alibaba", "Seedance", 450 * M, 0.8).build(),
                Uc("ep2", "Package Transfer", "alibaba", "Wan2.5", 380 * M, 0.75).build(),
            ]),
        ],
    )
}

fn internal_layer() -> TokenMapLayer {
    layer(
        "internal",
        "对内平台层",
        "Internal Platform Layer",
        "🏢",
        "#10B981",
        vec![
            category("datacleaning", "Data Cleaning", vec![
                Uc("dc1", "Data Ingestion Cleaning", "alibaba", "Qwen-Plus", 600 * M, 0.9).build(),
                Uc("dc2", "Data Ingestion Cleaning", "alibaba", "Doubao 1.6", 450 * M, 0.82).build(),
            ]),
            category("efficiency", "Internal Efficiency", vec![
                Uc("ie1", "Knowledge Base - Lindorm", "alibaba", "Embedding", 800 * M, 0.95)
                    .described("Internal knowledge retrieval"),
                Uc("ie2", "Coding Assistant", "alibaba", "Coder", 500 * M, 0.88).build(),
            ]),
            category("other", "Other Products", vec![UseCase {
                editable: true,
                ..Uc("op1", "Cloud Products", "alibaba", "xx Products", 300 * M, 0.6)
                    .described("Various cloud integrations")
            }]),
        ],
    )
}

fn resource_layer() -> TokenMapLayer {
    layer(
        "resource",
        "资源大盘",
        "Resource Dashboard",
        "📊",
        "#F59E0B",
        vec![
            category("aliresource", "Alibaba Cloud Resources", vec![
                Uc("ar1", "Text Model", "alibaba", "Qwen-plus", 2 * B, 0.95).build(),
                Uc("ar2", "Vision Model", "alibaba", "Qwen-VL", 1500 * M, 0.92).build(),
                Uc("ar3", "Video Generation", "alibaba", "Wan", 1200 * M, 0.88).build(),
                Uc("ar4", "Speech Model", "alibaba", "ASR", 800 * M, 0.9).build(),
            ]),
            category("volcresource", "Volcengine Resources", vec![
                Uc("vr1", "Text Model", "volcengine", "Seed 1.6", B, 0.85).build(),
                Uc("vr2", "Vision Model", "volcengine", "Seed 1.5", 800 * M, 0.8).build(),
                Uc("vr3", "Video Generation", "volcengine", "Seedream", 600 * M, 0.75).build(),
                Uc("vr4", "Speech Model", "volcengine", "Realtime Voice", 400 * M, 0.78).build(),
            ]),
            category("geminiresource", "Gemini Resources", vec![
                Uc("gr1", "Text Model", "overseas", "Gemini", 500 * M, 0.7).editable(),
                Uc("gr2", "Vision Model", "overseas", "Gemini Vision", 300 * M, 0.65).editable(),
            ]),
            category("selfhosted", "Self-hosted IDC", vec![UseCase {
                editable: true,
                ..Uc("sh1", "Custom Models", "selfhosted", "Various", 400 * M, 0.5)
                    .described("Self-deployed models")
            }]),
        ],
    )
}

/// The canonical token map, tagged with the given customer name
pub fn token_map(customer_name: &str) -> TokenMapData {
    let mut data = TokenMapData {
        id: "map-001".to_string(),
        customer_id: FIXTURE_CUSTOMER_ID.to_string(),
        customer_name: customer_name.to_string(),
        layers: vec![external_layer(), internal_layer(), resource_layer()],
        providers: Vec::new(),
        total_tokens: 0,
        created_at: at(2026, 2, 10, 8, 0),
        updated_at: at(2026, 2, 14, 15, 30),
    };
    data.refresh_aggregates();
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fixture_shape() {
        let data = token_map("ByteDance");
        assert_eq!(data.layers.len(), 3);
        let categories: usize = data.layers.iter().map(|l| l.categories.len()).sum();
        assert_eq!(categories, 12);
        assert_eq!(data.use_cases().count(), 36);
    }

    #[test]
    fn test_fixture_use_case_ids_are_unique() {
        let data = token_map("ByteDance");
        let ids: HashSet<&str> = data.use_cases().map(|uc| uc.id.as_str()).collect();
        assert_eq!(ids.len(), 36);
    }

    #[test]
    fn test_fixture_layer_totals() {
        let data = token_map("ByteDance");
        let totals: Vec<u64> = data.layers.iter().map(|l| l.total_tokens()).collect();
        assert_eq!(totals, vec![12_160_000_000, 2_650_000_000, 9_500_000_000]);
        assert_eq!(data.total_tokens, 24_310_000_000);
    }

    #[test]
    fn test_fixture_invariants() {
        let data = token_map("ByteDance");
        for uc in data.use_cases() {
            assert!((0.0..=1.0).contains(&uc.confidence), "{} confidence", uc.id);
        }
        let editable = data.use_cases().filter(|uc| uc.editable).count();
        assert_eq!(editable, 9);
    }
}
