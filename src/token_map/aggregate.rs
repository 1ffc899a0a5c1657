//! Token aggregation
//!
//! Totals are never stored; they are recomputed from the use cases on every
//! read.

use super::board::{Board, Category, Layer};
use crate::fixtures::provider_info;
use crate::models::{ProviderDistribution, UseCase};
use indexmap::IndexMap;

/// Sum of token counts
pub fn sum_tokens<'a, I>(use_cases: I) -> u64
where
    I: IntoIterator<Item = &'a UseCase>,
{
    use_cases
        .into_iter()
        .fold(0u64, |acc, uc| acc.saturating_add(uc.tokens))
}

pub fn category_total(category: &Category) -> u64 {
    sum_tokens(&category.use_cases)
}

pub fn layer_total(layer: &Layer) -> u64 {
    layer
        .categories
        .iter()
        .fold(0u64, |acc, c| acc.saturating_add(category_total(c)))
}

pub fn board_total(board: &Board) -> u64 {
    board
        .layers()
        .iter()
        .fold(0u64, |acc, l| acc.saturating_add(layer_total(l)))
}

/// Tokens per provider key, in order of first appearance
pub fn provider_breakdown<'a, I>(use_cases: I) -> IndexMap<String, u64>
where
    I: IntoIterator<Item = &'a UseCase>,
{
    let mut totals: IndexMap<String, u64> = IndexMap::new();
    for uc in use_cases {
        let entry = totals.entry(uc.provider.clone()).or_insert(0);
        *entry = entry.saturating_add(uc.tokens);
    }
    totals
}

/// Provider shares, largest first, percentages rounded to one decimal
pub fn provider_distribution<'a, I>(use_cases: I) -> Vec<ProviderDistribution>
where
    I: IntoIterator<Item = &'a UseCase>,
{
    let breakdown = provider_breakdown(use_cases);
    let total: u64 = breakdown.values().fold(0u64, |acc, v| acc.saturating_add(*v));

    let mut distribution: Vec<ProviderDistribution> = breakdown
        .into_iter()
        .map(|(provider, token_count)| ProviderDistribution {
            name: provider_info(&provider).name.to_string(),
            percentage: share_percent(token_count, total),
            provider,
            token_count,
        })
        .collect();

    // stable: ties keep first-appearance order
    distribution.sort_by(|a, b| b.token_count.cmp(&a.token_count));
    distribution
}

/// `part / total * 100`, rounded to one decimal place; 0.0 when `total` is 0
pub fn share_percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn uc(id: &str, provider: &str, tokens: u64) -> UseCase {
        UseCase {
            id: id.to_string(),
            name: id.to_string(),
            provider: provider.to_string(),
            model: "m".to_string(),
            tokens,
            confidence: 0.5,
            editable: false,
            description: None,
        }
    }

    #[test]
    fn test_sum_tokens_empty() {
        assert_eq!(sum_tokens(&Vec::<UseCase>::new()), 0);
    }

    #[test]
    fn test_breakdown_keeps_first_appearance_order() {
        let use_cases = vec![
            uc("a", "volcengine", 10),
            uc("b", "alibaba", 30),
            uc("c", "volcengine", 5),
        ];
        let breakdown = provider_breakdown(&use_cases);
        let keys: Vec<&str> = breakdown.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["volcengine", "alibaba"]);
        assert_eq!(breakdown["volcengine"], 15);
        assert_eq!(breakdown["alibaba"], 30);
    }

    #[test]
    fn test_share_percent_rounds_to_one_decimal() {
        assert_eq!(share_percent(1, 3), 33.3);
        assert_eq!(share_percent(2, 3), 66.7);
        assert_eq!(share_percent(5, 5), 100.0);
    }

    #[test]
    fn test_share_percent_zero_total() {
        assert_eq!(share_percent(0, 0), 0.0);
    }

    #[test]
    fn test_fixture_distribution_matches_rounded_shares() {
        let data = fixtures::token_map("Acme");
        let total = data.total_tokens;
        let distribution = provider_distribution(data.use_cases());

        for entry in &distribution {
            let expected = (entry.token_count as f64 / total as f64 * 100.0 * 10.0).round() / 10.0;
            assert_eq!(entry.percentage, expected, "{}", entry.provider);
        }

        let sum: f64 = distribution.iter().map(|d| d.percentage).sum();
        assert!((sum - 100.0).abs() <= 0.5, "sum was {}", sum);
    }

    #[test]
    fn test_fixture_distribution_values() {
        let data = fixtures::token_map("Acme");
        let distribution = provider_distribution(data.use_cases());

        let summary: Vec<(&str, u64, f64)> = distribution
            .iter()
            .map(|d| (d.provider.as_str(), d.token_count, d.percentage))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("alibaba", 16_860_000_000, 69.4),
                ("volcengine", 5_750_000_000, 23.7),
                ("overseas", 1_300_000_000, 5.3),
                ("selfhosted", 400_000_000, 1.6),
            ]
        );
        assert_eq!(distribution[0].name, "Alibaba Cloud");
    }
}
