// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 모든 통합 테스트에서 공통으로 사용하는 셋업 함수 제공
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let (repo, service) = setup_service();
//     // 테스트 코드...
// }
// ```
// =====================================================
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tower::ServiceExt;

use wallet_server::domains::wallet::models::Wallet;
use wallet_server::domains::wallet::services::WalletService;
use wallet_server::routes::create_router;
use wallet_server::shared::database::{Deadline, InMemoryWalletRepository, WalletRepository};
use wallet_server::shared::errors::RepositoryError;
use wallet_server::shared::services::AppState;

// 테스트용 상수
pub const TEST_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

pub fn dec(value: &str) -> Decimal {
    value.parse().expect("valid decimal literal")
}

/// 메모리 저장소 + 서비스
pub fn setup_service() -> (Arc<InMemoryWalletRepository>, WalletService) {
    let repo = Arc::new(InMemoryWalletRepository::new());
    let service = WalletService::new(repo.clone()).with_deadline(TEST_OPERATION_TIMEOUT);
    (repo, service)
}

/// 메모리 저장소를 사용하는 전체 라우터
pub fn setup_app() -> (Arc<InMemoryWalletRepository>, Router) {
    let repo = Arc::new(InMemoryWalletRepository::new());
    let state = AppState::with_repository(repo.clone(), TEST_OPERATION_TIMEOUT);
    (repo, create_router().with_state(state))
}

/// 라우터에 요청 1건 전송 후 (상태 코드, JSON 바디) 반환
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

/// 응답 JSON 의 balance 문자열을 Decimal 로
pub fn balance_of(json: &serde_json::Value) -> Decimal {
    json["balance"]
        .as_str()
        .expect("balance serialized as string")
        .parse()
        .expect("balance is a decimal")
}

/// 저장소 호출 횟수를 세는 래퍼
/// (검증 에러가 저장소에 닿지 않는지 확인용)
pub struct CountingRepository {
    pub inner: InMemoryWalletRepository,
    calls: AtomicUsize,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryWalletRepository::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl WalletRepository for CountingRepository {
    async fn create(&self, user_id: u64, deadline: Deadline) -> Result<Wallet, RepositoryError> {
        self.hit();
        self.inner.create(user_id, deadline).await
    }

    async fn get(
        &self,
        user_id: u64,
        wallet_id: u64,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError> {
        self.hit();
        self.inner.get(user_id, wallet_id, deadline).await
    }

    async fn deposit(
        &self,
        user_id: u64,
        wallet_id: u64,
        amount: Decimal,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError> {
        self.hit();
        self.inner.deposit(user_id, wallet_id, amount, deadline).await
    }

    async fn withdraw(
        &self,
        user_id: u64,
        wallet_id: u64,
        amount: Decimal,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError> {
        self.hit();
        self.inner.withdraw(user_id, wallet_id, amount, deadline).await
    }
}
