use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub foursquare: FoursquareConfig,

    #[serde(default)]
    pub yelp: YelpConfig,

    #[serde(default)]
    pub locations: Vec<LocationConfig>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HttpConfig {
    /// Per-request timeout in seconds. Unset means requests may wait forever.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl HttpConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FoursquareConfig {
    #[serde(default = "default_foursquare_url")]
    pub base_url: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,
}

fn default_foursquare_url() -> String {
    "https://api.foursquare.com/v2/venues/".to_string()
}

impl Default for FoursquareConfig {
    fn default() -> Self {
        Self {
            base_url: default_foursquare_url(),
            client_id: String::new(),
            client_secret: String::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct YelpConfig {
    #[serde(default = "default_yelp_url")]
    pub base_url: String,

    #[serde(default)]
    pub consumer_key: String,

    /// Secret half of the consumer credentials (signing key, part one)
    #[serde(default)]
    pub consumer_secret: String,

    #[serde(default)]
    pub token: String,

    /// Secret half of the access token (signing key, part two)
    #[serde(default)]
    pub token_secret: String,
}

fn default_yelp_url() -> String {
    "https://api.yelp.com/v2/business/".to_string()
}

impl Default for YelpConfig {
    fn default() -> Self {
        Self {
            base_url: default_yelp_url(),
            consumer_key: String::new(),
            consumer_secret: String::new(),
            token: String::new(),
            token_secret: String::new(),
        }
    }
}

/// A point of interest to enrich.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LocationConfig {
    pub name: String,

    pub lat: f64,

    pub lng: f64,

    /// Foursquare venue id
    pub foursquare_id: String,

    /// Yelp business id
    pub yelp_id: String,
}
