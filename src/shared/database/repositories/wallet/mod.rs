// Wallet repositories
pub mod wallet_repository;
pub mod postgres_wallet_repository;
pub mod memory_wallet_repository;

pub use wallet_repository::{Deadline, WalletRepository};
pub use postgres_wallet_repository::*;
pub use memory_wallet_repository::*;
