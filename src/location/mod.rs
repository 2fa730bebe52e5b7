//! Points of interest and their per-provider data slots.
//!
//! A [`Location`] is owned by the caller. During an enrichment pass each
//! provider writes only its own [`ProviderSlot`], which lets the coordinator
//! hand out disjoint mutable borrows instead of locking whole records.

use poi_common::{Error, LatLng, LocationId, Result};
use serde::{Deserialize, Serialize};

use crate::config::LocationConfig;
use crate::enrichment::providers::{FoursquareVenue, YelpBusiness};

/// Provider data for one location, keyed by the provider's lookup id.
///
/// `key` is the placeholder the slot starts with (a venue id or a business
/// id). `value` is filled once a call to the provider succeeds and is left
/// untouched when it fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSlot<T> {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<T>,
}

impl<T> ProviderSlot<T> {
    /// Create an unfilled slot holding only the lookup key.
    pub fn pending(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// Store a successfully fetched payload, replacing any earlier one.
    pub fn store(&mut self, value: T) {
        self.value = Some(value);
    }

    pub fn is_filled(&self) -> bool {
        self.value.is_some()
    }
}

/// Per-provider data attached to a [`Location`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationData {
    pub foursquare: ProviderSlot<FoursquareVenue>,
    pub yelp: ProviderSlot<YelpBusiness>,
}

/// A point of interest enriched by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
    pub position: LatLng,
    pub data: LocationData,
    /// Owned by the presentation layer; enrichment never reads or writes it.
    pub visible: bool,
}

impl Location {
    /// Create a location with unfilled provider slots.
    pub fn new(
        name: impl Into<String>,
        position: LatLng,
        venue_id: impl Into<String>,
        business_id: impl Into<String>,
    ) -> Self {
        Self {
            id: LocationId::new(),
            name: name.into(),
            position,
            data: LocationData {
                foursquare: ProviderSlot::pending(venue_id),
                yelp: ProviderSlot::pending(business_id),
            },
            visible: true,
        }
    }

    /// Build a location from its configuration entry.
    pub fn from_config(config: &LocationConfig) -> Result<Self> {
        if config.name.trim().is_empty() {
            return Err(Error::config("location name cannot be empty"));
        }
        if config.foursquare_id.trim().is_empty() {
            return Err(Error::config(format!(
                "location '{}' has no foursquare_id",
                config.name
            )));
        }
        if config.yelp_id.trim().is_empty() {
            return Err(Error::config(format!(
                "location '{}' has no yelp_id",
                config.name
            )));
        }

        let position = LatLng::new(config.lat, config.lng)?;
        Ok(Self::new(
            config.name.as_str(),
            position,
            config.foursquare_id.as_str(),
            config.yelp_id.as_str(),
        ))
    }

    /// Split the record into its name and the two provider slots.
    ///
    /// The slots are disjoint fields, so both can be borrowed mutably at the
    /// same time by different provider batches.
    pub fn provider_slots_mut(
        &mut self,
    ) -> (
        &str,
        &mut ProviderSlot<FoursquareVenue>,
        &mut ProviderSlot<YelpBusiness>,
    ) {
        (&self.name, &mut self.data.foursquare, &mut self.data.yelp)
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }

    /// True when both providers have supplied data.
    pub fn is_fully_enriched(&self) -> bool {
        self.data.foursquare.is_filled() && self.data.yelp.is_filled()
    }
}
