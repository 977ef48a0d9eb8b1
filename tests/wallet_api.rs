// =====================================================
// Wallet HTTP API 통합 테스트
// =====================================================
// 라우터 전체(추출기 + 핸들러 + 서비스 + 메모리 저장소)를
// oneshot 요청으로 검증합니다.
//
// 응답 형식:
// - 성공: Wallet JSON (balance 는 문자열)
// - 실패: {"error": "..."} + 상태 코드
// =====================================================

mod common;

use axum::http::StatusCode;
use common::*;
use serde_json::json;
use std::sync::Arc;

use wallet_server::routes::build_app;
use wallet_server::shared::config::AppConfig;
use wallet_server::shared::database::InMemoryWalletRepository;
use wallet_server::shared::services::AppState;

#[tokio::test]
async fn test_create_then_get_wallet() {
    let (_repo, app) = setup_app();

    let (status, created) = send(&app, "POST", "/users/2/wallets", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user_id"], 2);
    assert_eq!(balance_of(&created), dec("0"));
    assert!(created["created_at"].is_string());

    let wallet_id = created["id"].as_u64().unwrap();
    let (status, fetched) = send(&app, "GET", &format!("/users/2/wallets/{wallet_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], created["id"]);
    assert_eq!(balance_of(&fetched), dec("0"));
}

#[tokio::test]
async fn test_second_wallet_for_user_conflicts() {
    let (_repo, app) = setup_app();

    let (status, _) = send(&app, "POST", "/users/5/wallets", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, "POST", "/users/5/wallets", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "user already has a wallet");
}

#[tokio::test]
async fn test_invalid_path_ids_are_rejected() {
    let (_repo, app) = setup_app();

    let (status, body) = send(&app, "POST", "/users/invalid_user/wallets", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid user id");

    let (status, body) = send(&app, "POST", "/users/0/wallets", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid user id");

    let (status, body) = send(&app, "GET", "/users/2/wallets/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid wallet id");

    // 둘 다 잘못된 경우 user id 가 먼저
    let (status, body) = send(&app, "GET", "/users/-1/wallets/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid user id");
}

#[tokio::test]
async fn test_unknown_wallet_is_not_found() {
    let (_repo, app) = setup_app();

    let (status, body) = send(&app, "GET", "/users/2/wallets/42", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "wallet not found");
}

#[tokio::test]
async fn test_deposit_and_withdraw_flow() {
    let (_repo, app) = setup_app();

    let (_, created) = send(&app, "POST", "/users/2/wallets", None).await;
    let uri = format!("/users/2/wallets/{}", created["id"]);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"action": "deposit", "amount": "100.00"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance_of(&body), dec("100"));

    // 숫자 금액 + fund 별칭
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"action": "withdraw", "fund": 45})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance_of(&body), dec("55"));

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"action": "withdraw", "amount": "1000"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "wallet balance not enough");

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(balance_of(&body), dec("55"));
}

#[tokio::test]
async fn test_transaction_validation_errors() {
    let (_repo, app) = setup_app();

    let (_, created) = send(&app, "POST", "/users/3/wallets", None).await;
    let uri = format!("/users/3/wallets/{}", created["id"]);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"action": "deposit", "amount": "-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "cannot deposit a negative amount");

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"action": "withdraw", "amount": "-1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "cannot withdraw a negative amount");

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"action": "steal", "amount": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "unavailable action: steal");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (_repo, app) = setup_app();

    let (_, created) = send(&app, "POST", "/users/4/wallets", None).await;
    let uri = format!("/users/4/wallets/{}", created["id"]);

    // amount 누락
    let (status, body) = send(&app, "PUT", &uri, Some(json!({"action": "deposit"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("invalid request body"));

    // 숫자가 아닌 금액
    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"action": "deposit", "amount": "ten"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    // 바디 없음
    let (status, body) = send(&app, "PUT", &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_wallet_of_other_user_via_api() {
    let (_repo, app) = setup_app();

    let (_, created) = send(&app, "POST", "/users/8/wallets", None).await;
    let wallet_id = created["id"].as_u64().unwrap();

    let (status, _) = send(&app, "GET", &format!("/users/9/wallets/{wallet_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/users/9/wallets/{wallet_id}"),
        Some(json!({"action": "deposit", "amount": "1"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deadline_exceeded_returns_gateway_timeout_with_default_config() {
    // 기본 설정 그대로 (request timeout 3s, wallet deadline 2s)
    let config = AppConfig::from_lookup(|key| {
        (key == "DATABASE_URL").then(|| "postgres://localhost/wallets".to_string())
    })
    .unwrap();

    let repo = Arc::new(InMemoryWalletRepository::new());
    let state = AppState::with_repository(repo.clone(), config.wallet.operation_timeout);
    let app = build_app(state, &config.server).unwrap();

    let (status, created) = send(&app, "POST", "/users/12/wallets", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/users/12/wallets/{}", created["id"]);

    // 다른 트랜잭션이 row lock 을 잡고 있는 상황
    let guard = repo.hold_row_lock(created["id"].as_u64().unwrap()).await.unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({"action": "deposit", "amount": "5"})),
    )
    .await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "wallet operation timed out");

    drop(guard);

    let (status, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balance_of(&body), dec("0"));
}
