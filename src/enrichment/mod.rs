//! Multi-provider enrichment of locations.
//!
//! # Module layout
//!
//! - [`provider`] -- The [`ProviderClient`] trait every data source implements.
//! - [`providers`] -- Foursquare and Yelp clients.
//! - [`signer`] -- OAuth 1.0a request signing used by the Yelp client.
//! - [`fanout`] -- Per-provider fan-out of calls joined on a settlement counter.
//! - [`coordinator`] -- Runs both providers for a pass and notifies the listener.
//! - [`listener`] -- Callbacks into the presentation layer.
//! - [`error`] -- Call-level and pass-level error types.

pub mod coordinator;
pub mod error;
pub mod fanout;
pub mod listener;
pub mod provider;
pub mod providers;
pub mod signer;

pub use coordinator::{EnrichmentCoordinator, PassReport};
pub use error::{EnrichError, ProviderError, SigningError};
pub use fanout::{BatchReport, BatchState, CallTarget, FanOutJoin};
pub use listener::{EnrichmentListener, LoggingListener};
pub use provider::{ProviderCallResult, ProviderClient};
