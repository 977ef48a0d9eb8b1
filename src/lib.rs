// Wallet balance service
// 사용자당 지갑 1개, 동시 요청에서도 잔고가 음수가 되거나 갱신이 유실되지 않도록
// row lock 기반 트랜잭션으로 입금/출금을 처리합니다.
pub mod domains;
pub mod routes;
pub mod shared;
