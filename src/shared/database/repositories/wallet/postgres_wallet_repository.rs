use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction};
use sqlx::postgres::PgRow;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::time::Duration;
use crate::domains::wallet::models::Wallet;
use crate::shared::errors::{RepositoryError, UNIQUE_VIOLATION, database_code};
use super::wallet_repository::{
    Deadline, WalletRepository, apply_deposit, apply_withdraw, ensure_non_negative,
};

// PostgreSQL 지갑 레포지토리
// PgWalletRepository: transactional wallet protocol on top of PostgreSQL
//
// 잠금 방식:
// - deposit / withdraw: SELECT ... FOR UPDATE (배타 잠금, commit 까지 유지)
// - get: SELECT ... FOR SHARE (다른 읽기는 막지 않고, 진행 중인 writer 뒤에서 대기)
//
// 데드라인:
// - commit 전: 클라이언트(tokio timeout) + 서버(lock_timeout, statement_timeout) 양쪽에서 제한
//   초과 시 commit 없이 트랜잭션을 버림 → 롤백
// - commit: 데드라인과 경쟁시키지 않음. statement_timeout 을 남은 시간으로 다시 맞춘 뒤
//   COMMIT 을 끝까지 기다리고 그 결과를 그대로 반환
//   (서버가 시간 초과로 COMMIT 을 취소하면 57014 → Timeout, 반영 안 됨)

const SELECT_FOR_UPDATE: &str = r#"
    SELECT id, user_id, balance, created_at, updated_at
    FROM wallets
    WHERE id = $1 AND user_id = $2
    FOR UPDATE
"#;

const SELECT_FOR_SHARE: &str = r#"
    SELECT id, user_id, balance, created_at, updated_at
    FROM wallets
    WHERE id = $1 AND user_id = $2
    FOR SHARE
"#;

#[derive(Debug, Clone, Copy)]
enum LockMode {
    Share,
    Update,
}

type PgTransaction = Transaction<'static, Postgres>;

#[derive(Clone)]
pub struct PgWalletRepository {
    pool: PgPool,
}

impl PgWalletRepository {
    // 레포지토리 생성
    // Create repository instance
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 트랜잭션 시작 + 서버 쪽 타임아웃 설정
    async fn begin(&self, deadline: Deadline) -> Result<PgTransaction, RepositoryError> {
        if deadline.is_expired() {
            return Err(RepositoryError::Timeout);
        }

        let mut tx = deadline
            .run(async {
                self.pool
                    .begin()
                    .await
                    .map_err(|e| RepositoryError::from_sqlx(e, "Failed to begin transaction"))
            })
            .await?;

        if let Some(remaining) = deadline.remaining() {
            deadline
                .run(Self::bound_statements(&mut *tx, remaining))
                .await?;
        }

        Ok(tx)
    }

    // lock_timeout / statement_timeout 을 트랜잭션 범위(is_local = true)로 설정
    // 0 은 "제한 없음" 이므로 최소 1ms
    async fn bound_statements(
        conn: &mut PgConnection,
        remaining: Duration,
    ) -> Result<(), RepositoryError> {
        let millis = format!("{}ms", remaining.as_millis().max(1));

        sqlx::query(
            "SELECT set_config('lock_timeout', $1, true), set_config('statement_timeout', $1, true)",
        )
        .bind(millis)
        .execute(conn)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "Failed to set transaction timeouts"))?;

        Ok(())
    }

    // commit (데드라인과 경쟁시키지 않음)
    async fn commit(mut tx: PgTransaction, deadline: Deadline) -> Result<(), RepositoryError> {
        if let Some(remaining) = deadline.remaining() {
            if remaining.is_zero() {
                Self::rollback(tx).await?;
                return Err(RepositoryError::Timeout);
            }
            Self::bound_statements(&mut *tx, remaining).await?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "Failed to commit transaction"))
    }

    async fn rollback(tx: PgTransaction) -> Result<(), RepositoryError> {
        tx.rollback()
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "Failed to roll back transaction"))
    }

    // user_id + wallet_id 로 row 잠금 후 조회
    async fn lock_wallet(
        conn: &mut PgConnection,
        user_id: u64,
        wallet_id: u64,
        mode: LockMode,
    ) -> Result<Wallet, RepositoryError> {
        // BIGINT 범위 밖의 id 는 존재할 수 없음
        let (Some(db_wallet_id), Some(db_user_id)) = (db_id(wallet_id), db_id(user_id)) else {
            return Err(RepositoryError::NotFound { user_id, wallet_id });
        };

        let sql = match mode {
            LockMode::Share => SELECT_FOR_SHARE,
            LockMode::Update => SELECT_FOR_UPDATE,
        };

        let row = sqlx::query(sql)
            .bind(db_wallet_id)
            .bind(db_user_id)
            .fetch_optional(conn)
            .await
            .map_err(|e| RepositoryError::from_sqlx(e, "Failed to lock wallet row"))?;

        match row {
            Some(row) => wallet_from_row(&row),
            None => Err(RepositoryError::NotFound { user_id, wallet_id }),
        }
    }

    // 잔고 저장
    async fn write_balance(
        conn: &mut PgConnection,
        wallet_id: u64,
        balance: Decimal,
    ) -> Result<Wallet, RepositoryError> {
        let db_wallet_id = db_id(wallet_id).ok_or_else(|| {
            RepositoryError::Storage(anyhow::anyhow!("wallet id {} out of range", wallet_id))
        })?;

        let row = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $1, updated_at = $2
            WHERE id = $3
            RETURNING id, user_id, balance, created_at, updated_at
            "#,
        )
        .bind(balance)
        .bind(Utc::now())
        .bind(db_wallet_id)
        .fetch_one(conn)
        .await
        .map_err(|e| RepositoryError::from_sqlx(e, "Failed to update wallet balance"))?;

        wallet_from_row(&row)
    }

    async fn insert_wallet(conn: &mut PgConnection, user_id: u64) -> Result<Wallet, RepositoryError> {
        let db_user_id = db_id(user_id).ok_or_else(|| {
            RepositoryError::Storage(anyhow::anyhow!("user id {} out of range", user_id))
        })?;

        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO wallets (user_id, balance, created_at, updated_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, user_id, balance, created_at, updated_at
            "#,
        )
        .bind(db_user_id)
        .bind(Decimal::ZERO)
        .bind(now)
        .fetch_one(conn)
        .await
        .map_err(|e| {
            // 동시 생성 경쟁에서 진 쪽도 여기로 옴 (UNIQUE 제약 위반)
            if database_code(&e).as_deref() == Some(UNIQUE_VIOLATION) {
                RepositoryError::DuplicateWallet { user_id }
            } else {
                RepositoryError::from_sqlx(e, "Failed to create wallet")
            }
        })?;

        wallet_from_row(&row)
    }
}

#[async_trait]
impl WalletRepository for PgWalletRepository {
    async fn create(&self, user_id: u64, deadline: Deadline) -> Result<Wallet, RepositoryError> {
        let mut tx = self.begin(deadline).await?;
        let wallet = deadline
            .run(Self::insert_wallet(&mut *tx, user_id))
            .await?;
        Self::commit(tx, deadline).await?;

        Ok(wallet)
    }

    async fn get(
        &self,
        user_id: u64,
        wallet_id: u64,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError> {
        let mut tx = self.begin(deadline).await?;
        let wallet = deadline
            .run(Self::lock_wallet(&mut *tx, user_id, wallet_id, LockMode::Share))
            .await?;
        Self::commit(tx, deadline).await?;

        Ok(wallet)
    }

    async fn deposit(
        &self,
        user_id: u64,
        wallet_id: u64,
        amount: Decimal,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError> {
        ensure_non_negative(amount)?;

        // 에러로 빠져나가면 tx 가 drop 되면서 롤백됨
        let mut tx = self.begin(deadline).await?;
        let updated = deadline
            .run(async {
                let wallet =
                    Self::lock_wallet(&mut *tx, user_id, wallet_id, LockMode::Update).await?;
                let balance = apply_deposit(wallet.balance, amount)?;
                Self::write_balance(&mut *tx, wallet.id, balance).await
            })
            .await?;
        Self::commit(tx, deadline).await?;

        Ok(updated)
    }

    async fn withdraw(
        &self,
        user_id: u64,
        wallet_id: u64,
        amount: Decimal,
        deadline: Deadline,
    ) -> Result<Wallet, RepositoryError> {
        ensure_non_negative(amount)?;

        let mut tx = self.begin(deadline).await?;
        let result = deadline
            .run(async {
                let wallet =
                    Self::lock_wallet(&mut *tx, user_id, wallet_id, LockMode::Update).await?;
                let balance = apply_withdraw(wallet.balance, amount)?;
                Self::write_balance(&mut *tx, wallet.id, balance).await
            })
            .await;

        let updated = match result {
            Ok(wallet) => wallet,
            Err(err @ RepositoryError::InsufficientFunds { .. }) => {
                Self::rollback(tx).await?;
                return Err(err);
            }
            Err(err) => return Err(err),
        };
        Self::commit(tx, deadline).await?;

        Ok(updated)
    }
}

// u64 id → BIGINT
fn db_id(id: u64) -> Option<i64> {
    i64::try_from(id).ok()
}

fn wallet_from_row(row: &PgRow) -> Result<Wallet, RepositoryError> {
    let decode = |e: sqlx::Error| RepositoryError::from_sqlx(e, "Failed to decode wallet row");

    Ok(Wallet {
        id: row.try_get::<i64, _>("id").map_err(decode)? as u64,
        user_id: row.try_get::<i64, _>("user_id").map_err(decode)? as u64,
        balance: row.try_get("balance").map_err(decode)?,
        created_at: row.try_get("created_at").map_err(decode)?,
        updated_at: row.try_get("updated_at").map_err(decode)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_id_rejects_ids_outside_bigint() {
        assert_eq!(db_id(1), Some(1));
        assert_eq!(db_id(i64::MAX as u64), Some(i64::MAX));
        assert_eq!(db_id(i64::MAX as u64 + 1), None);
        assert_eq!(db_id(u64::MAX), None);
    }
}
