//! Yelp business provider.
//!
//! Implements [`ProviderClient`] against the Yelp v2 business endpoint. Every
//! request is OAuth 1.0a signed with a fresh nonce and timestamp. The API
//! answers in JSONP when a callback is requested; both JSONP and bare JSON
//! bodies are accepted.

use std::time::Duration;

use async_trait::async_trait;
use poi_common::ProviderKind;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::YelpConfig;
use crate::enrichment::error::ProviderError;
use crate::enrichment::provider::{ProviderCallResult, ProviderClient};
use crate::enrichment::signer::{self, Params, OAUTH_VERSION, SIGNATURE_METHOD};

use super::{http_client, item_url};

/// JSONP callback name sent with (and signed into) every request.
pub const JSONP_CALLBACK: &str = "cb";

/// Yelp's view of a business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YelpBusiness {
    pub id: String,
    pub name: String,
    /// Star rating on a 0-5 scale.
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Yelp business lookup client.
pub struct YelpClient {
    client: reqwest::Client,
    base_url: String,
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl YelpClient {
    pub fn new(config: &YelpConfig, timeout: Option<Duration>) -> Self {
        Self {
            client: http_client(timeout),
            base_url: config.base_url.clone(),
            consumer_key: config.consumer_key.clone(),
            consumer_secret: config.consumer_secret.clone(),
            token: config.token.clone(),
            token_secret: config.token_secret.clone(),
        }
    }

    /// Unsigned OAuth parameters; nonce and timestamp are added by the signer.
    fn base_params(&self) -> Params {
        [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_token", self.token.as_str()),
            ("oauth_signature_method", SIGNATURE_METHOD),
            ("oauth_version", OAUTH_VERSION),
            ("callback", JSONP_CALLBACK),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }
}

/// Unwrap a `callback(...)` JSONP body. Bodies that are not wrapped in the
/// expected callback are returned trimmed but otherwise unchanged.
fn strip_jsonp<'a>(body: &'a str, callback: &str) -> &'a str {
    let trimmed = body.trim();
    trimmed
        .strip_prefix(callback)
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.trim_end().trim_end_matches(';').trim_end().strip_suffix(')'))
        .unwrap_or(trimmed)
}

#[async_trait]
impl ProviderClient for YelpClient {
    type Payload = YelpBusiness;

    fn kind(&self) -> ProviderKind {
        ProviderKind::Yelp
    }

    fn is_available(&self) -> bool {
        !self.consumer_key.is_empty()
            && !self.consumer_secret.is_empty()
            && !self.token.is_empty()
            && !self.token_secret.is_empty()
    }

    async fn fetch(&self, business_id: &str) -> ProviderCallResult<YelpBusiness> {
        let url = item_url(&self.base_url, business_id);
        let params = signer::sign(
            "GET",
            &url,
            &self.base_params(),
            &self.consumer_secret,
            &self.token_secret,
        )?;
        debug!(url = %url, business_id, nonce = %params["oauth_nonce"], "Yelp business lookup");

        let resp = self.client.get(&url).query(&params).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }

        let body = resp.text().await?;
        serde_json::from_str(strip_jsonp(&body, JSONP_CALLBACK))
            .map_err(|e| ProviderError::malformed(format!("Yelp business body: {e}")))
    }
}
