// Shared errors
pub mod repository_error;
pub mod wallet_error;

pub use repository_error::*;
pub use wallet_error::*;
