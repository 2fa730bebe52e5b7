//! Foursquare venue provider.
//!
//! Implements [`ProviderClient`] against the Foursquare v2 venues endpoint.
//! Requests authenticate with the app's client id and secret in the query
//! string, plus the `v` version date (today's UTC date as `YYYYMMDD`).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use poi_common::ProviderKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::FoursquareConfig;
use crate::enrichment::error::ProviderError;
use crate::enrichment::provider::{ProviderCallResult, ProviderClient};

use super::{http_client, item_url};

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct VenueEnvelope {
    response: VenueResponse,
}

#[derive(Debug, Deserialize)]
struct VenueResponse {
    venue: FoursquareVenue,
}

/// Foursquare's view of a venue.
///
/// The fields used for display are typed; everything else the API returns is
/// kept verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoursquareVenue {
    pub id: String,
    pub name: String,
    pub url: Option<String>,
    pub short_url: Option<String>,
    /// Average rating on a 0-10 scale.
    pub rating: Option<f64>,
    /// Number of ratings the average is based on.
    pub rating_signals: Option<u32>,
    pub location: Option<VenueLocation>,
    pub contact: Option<VenueContact>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueLocation {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VenueContact {
    pub formatted_phone: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Foursquare venue lookup client.
pub struct FoursquareClient {
    client: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
}

impl FoursquareClient {
    pub fn new(config: &FoursquareConfig, timeout: Option<Duration>) -> Self {
        Self {
            client: http_client(timeout),
            base_url: config.base_url.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        }
    }
}

/// API version parameter: the given UTC date as `YYYYMMDD`.
fn version_date(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d").to_string()
}

#[async_trait]
impl ProviderClient for FoursquareClient {
    type Payload = FoursquareVenue;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Foursquare
    }

    fn is_available(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }

    async fn fetch(&self, venue_id: &str) -> ProviderCallResult<FoursquareVenue> {
        let url = item_url(&self.base_url, venue_id);
        let version = version_date(Utc::now());
        debug!(url = %url, venue_id, "Foursquare venue lookup");

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("v", version.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let body = resp.bytes().await?;
        let envelope: VenueEnvelope = serde_json::from_slice(&body)
            .map_err(|e| ProviderError::malformed(format!("Foursquare venue body: {e}")))?;

        Ok(envelope.response.venue)
    }
}
