//! Concrete provider implementations.
//!
//! Each submodule wraps a single external API and implements the
//! [`ProviderClient`](super::ProviderClient) trait.

pub mod foursquare;
pub mod yelp;

pub use foursquare::{FoursquareClient, FoursquareVenue};
pub use yelp::{YelpBusiness, YelpClient};

use std::time::Duration;

use reqwest::Client;

use super::signer::percent_encode;

/// Build the shared HTTP client. No timeout unless one is configured.
fn http_client(timeout: Option<Duration>) -> Client {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().unwrap_or_else(|e| {
        tracing::warn!("Failed to build HTTP client with timeout: {}", e);
        Client::new()
    })
}

/// Append a lookup key to a provider base URL as a single encoded path
/// segment.
fn item_url(base_url: &str, key: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        percent_encode(key)
    )
}
