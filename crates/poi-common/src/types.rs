//! Core type definitions shared by the enrichment engine and its callers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// A WGS84 geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Build a position, rejecting out-of-range or non-finite coordinates.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(Error::invalid_input(format!(
                "latitude {lat} is outside -90..=90"
            )));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(Error::invalid_input(format!(
                "longitude {lng} is outside -180..=180"
            )));
        }
        Ok(Self { lat, lng })
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// External data provider a location is enriched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Foursquare venue directory (query-string client credentials).
    Foursquare,
    /// Yelp reviews directory (OAuth 1.0a signed requests).
    Yelp,
}

impl ProviderKind {
    /// Human-facing provider name, as shown in error messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Foursquare => "Foursquare",
            Self::Yelp => "Yelp",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Foursquare => write!(f, "foursquare"),
            Self::Yelp => write!(f, "yelp"),
        }
    }
}
