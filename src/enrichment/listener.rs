//! Callbacks into the presentation layer.
//!
//! The enrichment engine renders nothing itself. Whoever owns the locations
//! implements [`EnrichmentListener`] to be told when a pass has finished and
//! to surface per-call error messages.

use tracing::{info, warn};

use crate::location::Location;

use super::coordinator::PassReport;

/// Receiver of enrichment notifications.
///
/// All methods have no-op defaults so implementors only override what they
/// render.
pub trait EnrichmentListener: Send + Sync {
    /// Error sink: one human-readable message per failed provider call.
    fn report_error(&self, _message: &str) {}

    /// Called once per location after the whole pass has settled.
    fn on_location_enriched(&self, _location: &Location) {}

    /// Called exactly once per pass, after every `on_location_enriched`.
    fn on_batch_complete(&self, _locations: &[Location], _report: &PassReport) {}
}

/// Listener that only writes to the tracing log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingListener;

impl EnrichmentListener for LoggingListener {
    fn report_error(&self, message: &str) {
        warn!("{}", message);
    }

    fn on_location_enriched(&self, location: &Location) {
        info!(
            location = %location.name,
            foursquare = location.data.foursquare.is_filled(),
            yelp = location.data.yelp.is_filled(),
            "Location ready"
        );
    }

    fn on_batch_complete(&self, locations: &[Location], report: &PassReport) {
        info!(
            locations = locations.len(),
            failed = report.failed(),
            "Enrichment batch complete"
        );
    }
}
