pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use client::{SerperClient, SEARCH_TERMS};
pub use error::SerperError;
pub use types::{OrganicResult, SearchPayload, SearchResponse};
