use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

// =====================================================
// Wallet 모델
// =====================================================
// 역할: 사용자 1명당 1개의 잔고 레코드
//
// 불변 조건:
// - user_id 당 지갑은 최대 1개 (UNIQUE 제약)
// - balance >= 0 (커밋된 상태에서 항상 성립)
// =====================================================

/// 지갑 정보 (데이터베이스에서 조회한 지갑)
/// Wallet information (row from the wallets table)
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone, PartialEq)]
#[schema(as = Wallet)]
pub struct Wallet {
    /// Wallet ID (BIGSERIAL, auto-generated)
    /// 지갑 ID (DB에서 자동 생성)
    #[schema(example = 1)]
    pub id: u64,

    /// Owner user ID
    /// 지갑 소유자 ID
    #[schema(example = 2)]
    pub user_id: u64,

    /// Current balance, serialized as a decimal string
    /// 현재 잔고 (문자열로 직렬화)
    #[schema(value_type = String, example = "55.00")]
    pub balance: Decimal,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}
