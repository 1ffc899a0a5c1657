//! Behavioural guarantees of the token map model and the mock façade

use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokenholic::config::MockConfig;
use tokenholic::fixtures;
use tokenholic::models::{GenerateTokenMapRequest, RecommendRequest, Scenario, StartSessionRequest};
use tokenholic::token_map::{format_tokens, provider_distribution, share_percent, Board};
use tokenholic::Services;

fn board() -> Board {
    Board::from_token_map(&fixtures::token_map("ByteDance"))
}

#[test]
fn test_format_tokens_examples() {
    assert_eq!(format_tokens(999), "999");
    assert_eq!(format_tokens(1_500), "1.5K");
    assert_eq!(format_tokens(2_300_000), "2.3M");
    assert_eq!(format_tokens(4_100_000_000), "4.1B");
}

#[test]
fn test_layer_totals_track_every_edit() {
    let editable: Vec<(String, String)> = board()
        .layers()
        .iter()
        .flat_map(|layer| {
            layer
                .use_cases()
                .filter(|uc| uc.editable)
                .map(|uc| (layer.id.clone(), uc.id.clone()))
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(editable.len(), 9);

    let inputs = ["1", "12k", "3.3m", "0.75b", "42", "7M"];
    let mut board = board();
    for (i, (layer_id, use_case_id)) in editable.iter().enumerate() {
        board = board.update_use_case_tokens(layer_id, use_case_id, inputs[i % inputs.len()]);

        for layer in board.layers() {
            let expected: u64 = layer
                .categories
                .iter()
                .map(|c| c.use_cases.iter().map(|uc| uc.tokens).sum::<u64>())
                .sum();
            assert_eq!(layer.total_tokens(), expected, "layer {}", layer.id);
        }
    }
}

#[test]
fn test_toggles_are_involutions() {
    let original = board();
    for layer in original.layers() {
        assert_eq!(original.toggle_layer(&layer.id).toggle_layer(&layer.id), original);
        for category in &layer.categories {
            let twice = original
                .toggle_category(&layer.id, &category.id)
                .toggle_category(&layer.id, &category.id);
            assert_eq!(twice, original);
        }
    }
}

#[test]
fn test_only_editable_use_cases_accept_input() {
    let original = board();
    for layer in original.layers() {
        for uc in layer.use_cases() {
            let next = original.update_use_case_tokens(&layer.id, &uc.id, "2.5m");
            let tokens = next.find_use_case(&layer.id, &uc.id).unwrap().tokens;
            if uc.editable {
                assert_eq!(tokens, 2_500_000, "{}", uc.id);
            } else {
                assert_eq!(tokens, uc.tokens, "{}", uc.id);
            }
        }
    }
}

#[test]
fn test_provider_percentages_are_rounded_shares() {
    let data = fixtures::token_map("ByteDance");
    let total = data.total_tokens;
    let distribution = provider_distribution(data.use_cases());

    let mut sum = 0.0;
    for entry in &distribution {
        let raw = entry.token_count as f64 / total as f64 * 100.0;
        let expected = (raw * 10.0).round() / 10.0;
        assert!((entry.percentage - expected).abs() < 1e-9);
        assert_eq!(entry.percentage, share_percent(entry.token_count, total));
        sum += entry.percentage;
    }
    assert!((sum - 100.0).abs() <= 0.5);
    assert_eq!(data.providers, distribution);
}

#[tokio::test]
async fn test_mock_calls_honour_latency_and_fresh_ids() {
    let latency = MockConfig::uniform(25);
    let services = Services::mock(latency);
    let mut ids = HashSet::new();

    let start = Instant::now();
    let map = services
        .token_map
        .generate(GenerateTokenMapRequest {
            company_name: "Acme".to_string(),
            context: None,
        })
        .await
        .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(25));
    assert!(ids.insert(map.id));

    let start = Instant::now();
    let solution = services
        .solution
        .recommend(RecommendRequest {
            requirements: "Moderation".to_string(),
            customer_id: None,
        })
        .await
        .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(25));
    assert!(ids.insert(solution.id));

    let start = Instant::now();
    let session = services
        .role_play
        .start(StartSessionRequest {
            scenario: Scenario::Discovery,
            difficulty: Default::default(),
            context: None,
        })
        .await
        .unwrap();
    assert!(start.elapsed() >= Duration::from_millis(25));
    assert!(ids.insert(session.id));

    assert!(!ids.contains("map-001"));
    assert!(!ids.contains("sol-001"));
    assert!(!ids.contains("session-001"));
}
