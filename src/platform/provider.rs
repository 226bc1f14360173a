//! Provider abstraction and the outcome type the resolver matches over

use crate::error::QuickdlError;
use async_trait::async_trait;

/// Result of asking one strategy to resolve a URL
#[derive(Debug)]
pub enum ProviderOutcome<T> {
    /// The provider produced a usable value
    Found(T),
    /// The provider failed recoverably; the next strategy should run
    TryNext(String),
    /// Nothing beneath this provider can recover the request
    Fatal(QuickdlError),
}

impl<T> ProviderOutcome<T> {
    /// Check if the provider produced a value
    pub fn is_found(&self) -> bool {
        matches!(self, ProviderOutcome::Found(_))
    }

    /// Convert into a `Result`, turning `TryNext` into the given error
    pub fn into_result(self, on_try_next: impl FnOnce(String) -> QuickdlError) -> Result<T, QuickdlError> {
        match self {
            ProviderOutcome::Found(value) => Ok(value),
            ProviderOutcome::TryNext(reason) => Err(on_try_next(reason)),
            ProviderOutcome::Fatal(err) => Err(err),
        }
    }
}

/// An upstream service able to turn a page URL into media information
#[async_trait]
pub trait MediaProvider: Send + Sync {
    /// What a successful lookup yields
    type Output: Send;

    /// Short provider name used in logs
    fn name(&self) -> &str;

    /// Look up a page URL
    async fn fetch(&self, url: &str) -> ProviderOutcome<Self::Output>;
}
