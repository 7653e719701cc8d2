use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rank_wheel::config::Config;
use rank_wheel::draw::Drawer;
use rank_wheel::error::SpinError;
use rank_wheel::ranks::{Rank, RankConfig};
use rank_wheel::server::{self, AppState};
use rank_wheel::weights;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app(ranks: RankConfig) -> (Arc<AppState>, axum::Router) {
    let config = Config {
        ranks,
        ..Config::default()
    };
    let state = Arc::new(AppState::from_config(&config).unwrap());
    (state.clone(), server::router(state))
}

async fn send(router: &axum::Router, method: &str, uri: &str) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[test]
fn test_builtin_distribution_over_10k_spins() {
    let drawer = Drawer::new(RankConfig::builtin()).unwrap();
    let mut rng = StdRng::seed_from_u64(690);
    let n = 10_000;
    let mut hits = vec![0usize; drawer.ranks().len()];
    for _ in 0..n {
        hits[drawer.spin(&mut rng).unwrap().index] += 1;
    }

    let total = drawer.ranks().total_limit() as f64;
    for (rank, h) in drawer.ranks().iter().zip(hits) {
        let expected = rank.limit as f64 / total;
        let observed = h as f64 / n as f64;
        assert!(
            (observed - expected).abs() < 0.02,
            "{}: observed {:.4} expected {:.4}",
            rank.key,
            observed,
            expected
        );
    }
}

#[test]
fn test_normalized_table_sums_to_hundred() {
    let table = weights::normalize(&RankConfig::builtin());
    assert_eq!(table.len(), 7);
    assert!((table.total() - 100.0).abs() < 1e-9);
    assert_eq!(table.get("NATIONAL"), Some(43.48));
}

#[test]
fn test_empty_config_never_yields_a_rank() {
    let drawer = Drawer::new(RankConfig::empty()).unwrap();
    let mut rng = StdRng::seed_from_u64(0);
    assert_eq!(drawer.spin(&mut rng), Err(SpinError::EmptyConfig));
    assert!(drawer.weights().is_empty());
}

#[tokio::test]
async fn test_spin_endpoint_returns_rank_and_percent() {
    let (state, router) = app(RankConfig::builtin());
    let (status, body) = send(&router, "POST", "/spin").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    let obj = json.as_object().unwrap();
    assert_eq!(obj.len(), 2);

    let name = obj["rank"].as_str().unwrap();
    let percent = obj["percent"].as_f64().unwrap();
    let idx = state
        .drawer()
        .ranks()
        .iter()
        .position(|r| r.name == name)
        .unwrap();
    assert_eq!(state.drawer().weights().at(idx), Some(percent));
}

#[tokio::test]
async fn test_spin_endpoint_empty_config_is_500() {
    let (_, router) = app(RankConfig::empty());
    for _ in 0..3 {
        let (status, body) = send(&router, "POST", "/spin").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "Конфигурация рангов отсутствует");
        assert!(json.get("rank").is_none());
    }
}

#[tokio::test]
async fn test_spin_requires_post() {
    let (_, router) = app(RankConfig::builtin());
    let (status, _) = send(&router, "GET", "/spin").await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_index_percentages_match_spin_results() {
    let (state, router) = app(RankConfig::builtin());
    let (status, page) = send(&router, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);

    for _ in 0..100 {
        let (_, body) = send(&router, "POST", "/spin").await;
        let json: Value = serde_json::from_str(&body).unwrap();
        let name = json["rank"].as_str().unwrap();
        let percent = json["percent"].as_f64().unwrap();

        let rank = state.drawer().ranks().iter().find(|r| r.name == name).unwrap();
        let row = format!(
            "<td>{}</td><td class=\"num\">{}</td><td class=\"num percent\">{:.2}%</td></tr>",
            rank.name, rank.limit, percent
        );
        assert!(page.contains(&row), "missing row {}", row);
    }
}

#[tokio::test]
async fn test_all_zero_limits_spin_uniformly() {
    let ranks = RankConfig::new(vec![
        Rank::new("X", "x", 0),
        Rank::new("Y", "y", 0),
        Rank::new("Z", "z", 0),
    ])
    .unwrap();
    let (state, router) = app(ranks);

    let (_, page) = send(&router, "GET", "/").await;
    assert!(page.contains("33.33%"));
    assert!(page.contains("33.34%"));

    for _ in 0..300 {
        let (status, _) = send(&router, "POST", "/spin").await;
        assert_eq!(status, StatusCode::OK);
    }
    let summary = state.summary();
    assert_eq!(summary.count, 300);
    // Each of 3 ranks expects 100 hits; allow a wide band
    for r in &summary.ranks {
        assert!(r.hits > 50 && r.hits < 150, "{} hits {}", r.key, r.hits);
    }
}

#[tokio::test]
async fn test_stats_endpoint_tracks_spins() {
    let (_, router) = app(RankConfig::builtin());
    for _ in 0..10 {
        send(&router, "POST", "/spin").await;
    }
    let (status, body) = send(&router, "GET", "/stats").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["count"], 10);
    assert_eq!(json["failed"], 0);
    let ranks = json["ranks"].as_array().unwrap();
    assert_eq!(ranks.len(), 7);
    let hits: u64 = ranks.iter().map(|r| r["hits"].as_u64().unwrap()).sum();
    assert_eq!(hits, 10);
    assert_eq!(ranks[6]["configured_pct"], 43.48);
}
