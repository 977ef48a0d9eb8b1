use serde::Deserialize;
use utoipa::ToSchema;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use crate::shared::errors::WalletError;

// =====================================================
// 잔고 변경 요청 (Transaction request)
// =====================================================
// DB에 저장되지 않는 일회성 요청입니다.
// action 은 문자열 그대로 받은 뒤 서비스에서 파싱합니다.
// (알 수 없는 action 은 JSON 파싱 에러가 아니라 InvalidAction 으로 처리)
// =====================================================

/// 잔고 변경 요청 바디
/// Body of PUT /users/{user_id}/wallets/{wallet_id}
#[derive(Debug, Deserialize, ToSchema)]
#[schema(as = TransactionRequest)]
pub struct TransactionRequest {
    /// "deposit" 또는 "withdraw"
    #[schema(example = "deposit")]
    pub action: String,

    /// Non-negative amount (JSON number or decimal string)
    /// 금액 (음수 불가). 예전 클라이언트의 `fund` 필드도 허용
    #[serde(alias = "fund")]
    #[schema(value_type = String, example = "100.00")]
    pub amount: Decimal,
}

/// 잔고 변경 종류
/// Kind of balance mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionAction {
    Deposit,
    Withdraw,
}

impl TransactionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionAction::Deposit => "deposit",
            TransactionAction::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for TransactionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionAction {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(TransactionAction::Deposit),
            "withdraw" => Ok(TransactionAction::Withdraw),
            other => Err(WalletError::InvalidAction {
                action: other.to_string(),
            }),
        }
    }
}
