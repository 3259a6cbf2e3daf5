// HTTP API tests for Stable Match

use actix_web::{test, web, App};
use serde_json::{json, Value};
use stable_match::core::{Matcher, MatcherConfig};
use stable_match::routes::{self, matching::AppState};
use std::path::PathBuf;

fn state(dataset_dir: Option<PathBuf>) -> AppState {
    AppState {
        matcher: Matcher::new(MatcherConfig {
            max_participants: Some(50),
            ..MatcherConfig::default()
        }),
        dataset_dir,
    }
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health() {
    let app = app!(state(None));
    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_run_matching() {
    let app = app!(state(None));
    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(json!({
            "scores": [
                [0.0, 0.0, 0.8, 0.4],
                [0.0, 0.0, 0.7, 0.6],
                [0.8, 0.7, 0.0, 0.0],
                [0.4, 0.6, 0.0, 0.0]
            ],
            "genders": ["Male", "Male", "Female", "Female"],
            "preferences": ["Women", "Women", "Men", "Men"]
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["stable"], true);
    assert_eq!(
        body["pairs"],
        json!([{"proposer": 0, "receiver": 2}, {"proposer": 1, "receiver": 3}])
    );
    assert_eq!(body["unmatched"], json!([]));
    assert!(body["runId"].as_str().is_some());
}

#[actix_web::test]
async fn test_run_matching_rejects_asymmetric_scores() {
    let app = app!(state(None));
    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(json!({
            "scores": [[0.0, 0.5], [0.1, 0.0]],
            "genders": ["Male", "Female"],
            "preferences": ["Women", "Men"]
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_run_matching_rejects_unknown_gender() {
    let app = app!(state(None));
    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(json!({
            "scores": [[0.0, 0.5], [0.5, 0.0]],
            "genders": ["Male", "Dragon"],
            "preferences": ["Women", "Men"]
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_run_matching_rejects_empty_scores() {
    let app = app!(state(None));
    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(json!({ "scores": [], "genders": [], "preferences": [] }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_explicit_matching() {
    let app = app!(state(None));
    let req = test::TestRequest::post()
        .uri("/api/v1/matching/explicit")
        .set_json(json!({
            "proposers": { "0": [2, 3], "1": [2, 3] },
            "receivers": { "2": [1, 0], "3": [0, 1] }
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["stable"], true);
    assert_eq!(
        body["pairs"],
        json!([{"proposer": 0, "receiver": 3}, {"proposer": 1, "receiver": 2}])
    );
    assert_eq!(body["proposals"], 3);
}

#[actix_web::test]
async fn test_survey_matching() {
    let app = app!(state(None));
    let req = test::TestRequest::post()
        .uri("/api/v1/matching/survey")
        .set_json(json!({
            "profiles": [
                { "gender": "Male", "preference": "Women", "gradYear": 2026, "responses": ["a", "b"] },
                { "gender": "Female", "preference": "Men", "gradYear": 2026, "responses": ["a", "b"] }
            ],
            "seed": 11
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["stable"], true);
    assert_eq!(body["pairs"].as_array().map(Vec::len), Some(1));
}

#[actix_web::test]
async fn test_survey_matching_validates_grad_year() {
    let app = app!(state(None));
    let req = test::TestRequest::post()
        .uri("/api/v1/matching/survey")
        .set_json(json!({
            "profiles": [
                { "gender": "Male", "preference": "Women", "gradYear": 12 }
            ]
        }))
        .to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
}

#[actix_web::test]
async fn test_participant_cap() {
    let app = app!(state(None));
    let n = 51;
    let req = test::TestRequest::post()
        .uri("/api/v1/matching/run")
        .set_json(json!({
            "scores": vec![vec![0.0; n]; n],
            "genders": vec!["Male"; n],
            "preferences": vec!["Women"; n]
        }))
        .to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status_code"], 400);
}

#[actix_web::test]
async fn test_dataset_not_configured() {
    let app = app!(state(None));
    let req = test::TestRequest::post().uri("/api/v1/matching/dataset").to_request();

    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 404);
}

#[actix_web::test]
async fn test_dataset_matching() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("raw_scores.txt"), "0 0.9\n0.9 0\n").unwrap();
    std::fs::write(dir.path().join("genders.txt"), "Male\nFemale\n").unwrap();
    std::fs::write(dir.path().join("gender_preferences.txt"), "Women\nMen\n").unwrap();

    let app = app!(state(Some(dir.path().to_path_buf())));
    let req = test::TestRequest::post().uri("/api/v1/matching/dataset").to_request();

    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["pairs"], json!([{"proposer": 0, "receiver": 1}]));
    assert_eq!(body["stable"], true);
}
