//! Biodata sources
//!
//! Every source answers a lookup with a [`FetchOutcome`]; transient
//! conditions are resolved inside the source and never leak out as such,
//! except when the overall deadline cuts a lookup short.

pub mod siak_api;
pub mod static_source;

pub use siak_api::SiakApiClient;
pub use static_source::{StaticSource, StaticSourceError};

use crate::models::MhsBiodata;
use async_trait::async_trait;

/// Result of looking up one student
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Found(MhsBiodata),
    /// The source answered and has no such student
    NotFound,
    /// Could not determine the answer in time; may succeed later
    TransientFailure(String),
    /// Could not determine the answer
    PermanentFailure(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BiodataSource: Send + Sync {
    async fn fetch(&self, nim: &str) -> FetchOutcome;
}
