// Request extractors
pub mod path_ids;

pub use path_ids::*;
