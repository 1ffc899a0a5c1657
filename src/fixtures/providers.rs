//! Provider palette

/// Display metadata for a provider key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderInfo {
    pub key: &'static str,
    pub name: &'static str,
    pub color: &'static str,
}

pub const PROVIDERS: [ProviderInfo; 6] = [
    ProviderInfo { key: "alibaba", name: "Alibaba Cloud", color: "#FF6A00" },
    ProviderInfo { key: "volcengine", name: "Volcengine", color: "#00D4AA" },
    ProviderInfo { key: "baidu", name: "Baidu Cloud", color: "#2932E1" },
    ProviderInfo { key: "overseas", name: "Overseas", color: "#A855F7" },
    ProviderInfo { key: "selfhosted", name: "Self-hosted", color: "#EC4899" },
    ProviderInfo { key: "other", name: "Other", color: "#6B7280" },
];

/// Look up a provider key, falling back to `other`
pub fn provider_info(key: &str) -> ProviderInfo {
    PROVIDERS
        .iter()
        .find(|p| p.key == key)
        .copied()
        .unwrap_or(PROVIDERS[PROVIDERS.len() - 1])
}
