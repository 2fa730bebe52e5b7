//! Trait definition for enrichment providers.
//!
//! Each provider wraps a single external API and fetches that provider's view
//! of one location, identified by the provider-specific lookup key stored in
//! the location's [`ProviderSlot`](crate::location::ProviderSlot).

use async_trait::async_trait;
use poi_common::ProviderKind;

use super::error::ProviderError;

/// Outcome of one provider call. Exists only until the fan-out step consumes it.
pub type ProviderCallResult<T> = Result<T, ProviderError>;

/// Async trait that all enrichment providers implement.
///
/// Implementations issue exactly one request per call and never touch the
/// location record themselves; storing the payload is the caller's job.
///
/// Providers are shared across calls behind an `Arc`.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    /// Parsed provider view of a venue or business.
    type Payload: Send;

    /// Which provider this client talks to.
    fn kind(&self) -> ProviderKind;

    /// Returns `true` when the client has the credentials it needs.
    fn is_available(&self) -> bool;

    /// Fetch the provider's data for the item identified by `key`.
    async fn fetch(&self, key: &str) -> ProviderCallResult<Self::Payload>;
}
