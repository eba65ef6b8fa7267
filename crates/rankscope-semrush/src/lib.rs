mod cache;
pub mod client;
pub mod error;

pub use client::SemrushClient;
pub use error::SemrushError;
