pub mod lifecycle;
pub mod queries;
pub mod types;

pub use types::*;
