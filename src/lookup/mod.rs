mod catalog;
mod fetch;

pub use catalog::StaticCatalog;
pub use fetch::{FetchOutcome, PendingFetch, spawn_fetch};

use crate::domain::SelectOption;

/// Resolves the option sequence for a field from its lookup key.
///
/// Implementations run on a worker thread, so they may block. A key that is
/// unknown to the source should resolve to the empty sequence rather than an
/// error; callers render both outcomes identically.
pub trait OptionLookup: Send + Sync {
    fn fetch(&self, key: &str) -> Result<Vec<SelectOption>, LookupError>;
}

#[derive(Debug, Clone)]
pub struct LookupError {
    pub message: String,
}

impl LookupError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for LookupError {}
