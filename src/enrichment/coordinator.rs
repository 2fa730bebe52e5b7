//! Top-level orchestration of an enrichment pass.
//!
//! The [`EnrichmentCoordinator`] runs the Foursquare and Yelp batches for a
//! list of locations side by side, waits for both to resolve, and only then
//! notifies the listener: once per location, followed by a single
//! batch-complete callback.
//!
//! # Example
//!
//! ```rust,ignore
//! let coordinator = EnrichmentCoordinator::from_config(&config, Arc::new(LoggingListener));
//! let report = coordinator.enrich(&mut locations).await?;
//! println!("{} of {} calls failed", report.failed(), report.calls());
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::location::Location;

use super::error::EnrichError;
use super::fanout::{BatchReport, CallTarget, FanOutJoin};
use super::listener::EnrichmentListener;
use super::provider::ProviderClient;
use super::providers::{FoursquareClient, FoursquareVenue, YelpBusiness, YelpClient};

/// Outcome of one enrichment pass, one report per provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PassReport {
    pub foursquare: BatchReport,
    pub yelp: BatchReport,
}

impl PassReport {
    /// Total number of provider calls issued.
    pub fn calls(&self) -> usize {
        self.foursquare.total + self.yelp.total
    }

    pub fn failed(&self) -> usize {
        self.foursquare.failed + self.yelp.failed
    }
}

/// Enriches locations from both providers and notifies a listener.
pub struct EnrichmentCoordinator {
    foursquare: Arc<dyn ProviderClient<Payload = FoursquareVenue>>,
    yelp: Arc<dyn ProviderClient<Payload = YelpBusiness>>,
    listener: Arc<dyn EnrichmentListener>,
}

impl EnrichmentCoordinator {
    pub fn new(
        foursquare: Arc<dyn ProviderClient<Payload = FoursquareVenue>>,
        yelp: Arc<dyn ProviderClient<Payload = YelpBusiness>>,
        listener: Arc<dyn EnrichmentListener>,
    ) -> Self {
        Self {
            foursquare,
            yelp,
            listener,
        }
    }

    /// Wire the HTTP clients described by `config`.
    pub fn from_config(config: &Config, listener: Arc<dyn EnrichmentListener>) -> Self {
        let timeout = config.http.timeout();
        Self::new(
            Arc::new(FoursquareClient::new(&config.foursquare, timeout)),
            Arc::new(YelpClient::new(&config.yelp, timeout)),
            listener,
        )
    }

    /// Run one enrichment pass over `locations`.
    ///
    /// Both provider batches start before either is awaited. Individual call
    /// failures leave the affected slot as it was and never fail the pass.
    /// Listener callbacks fire only after every call of both batches has
    /// settled.
    pub async fn enrich(&self, locations: &mut [Location]) -> Result<PassReport, EnrichError> {
        info!(locations = locations.len(), "Starting enrichment pass");
        let listener = self.listener.as_ref();

        let report = {
            let (foursquare_targets, yelp_targets): (Vec<_>, Vec<_>) = locations
                .iter_mut()
                .map(|location| {
                    let (label, foursquare, yelp) = location.provider_slots_mut();
                    (
                        CallTarget {
                            label,
                            slot: foursquare,
                        },
                        CallTarget { label, slot: yelp },
                    )
                })
                .unzip();

            let foursquare_batch = FanOutJoin::new(self.foursquare.as_ref(), listener);
            let yelp_batch = FanOutJoin::new(self.yelp.as_ref(), listener);

            let (foursquare, yelp) = tokio::try_join!(
                foursquare_batch.run(foursquare_targets),
                yelp_batch.run(yelp_targets),
            )?;
            PassReport { foursquare, yelp }
        };

        for location in locations.iter() {
            listener.on_location_enriched(location);
        }
        listener.on_batch_complete(locations, &report);

        info!(
            calls = report.calls(),
            failed = report.failed(),
            "Enrichment pass complete"
        );
        Ok(report)
    }
}
