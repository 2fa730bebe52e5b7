//! Plain-text rendering of enriched locations for the command line.

use std::fmt::Write as _;

use crate::enrichment::{EnrichmentListener, LoggingListener, PassReport};
use crate::location::Location;

const MISSING: &str = "n/a";

fn or_missing<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| MISSING.to_string())
}

/// Render the info card for one location: links, address, phone, ratings and
/// review counts from both providers.
pub fn info_card(location: &Location) -> String {
    let fsq = location.data.foursquare.value.as_ref();
    let yelp = location.data.yelp.value.as_ref();

    let title = fsq.map_or(location.name.as_str(), |v| v.name.as_str());
    let mut out = String::new();

    let _ = writeln!(out, "{title}");
    let _ = writeln!(
        out,
        "  Foursquare Profile: {} | Yelp Profile: {} | Website: {}",
        or_missing(fsq.and_then(|v| v.short_url.as_deref())),
        or_missing(yelp.and_then(|b| b.url.as_deref())),
        or_missing(fsq.and_then(|v| v.url.as_deref())),
    );

    let place = fsq.and_then(|v| v.location.as_ref());
    let address = place.and_then(|p| p.address.as_deref()).unwrap_or(MISSING);
    let city = place.and_then(|p| p.city.as_deref()).unwrap_or(MISSING);
    let state = place.and_then(|p| p.state.as_deref()).unwrap_or(MISSING);
    let _ = writeln!(out, "  {address}, {city} {state}");
    let _ = writeln!(
        out,
        "  {}",
        or_missing(
            fsq.and_then(|v| v.contact.as_ref())
                .and_then(|c| c.formatted_phone.as_deref())
        )
    );
    let _ = writeln!(
        out,
        "  Ratings: Foursquare {} / 10, Yelp {} / 5",
        or_missing(fsq.and_then(|v| v.rating)),
        or_missing(yelp.and_then(|b| b.rating)),
    );
    let _ = writeln!(
        out,
        "  Review counts: Foursquare {}, Yelp {}",
        or_missing(fsq.and_then(|v| v.rating_signals)),
        or_missing(yelp.and_then(|b| b.review_count)),
    );
    out
}

/// Listener for the CLI: error messages go to stderr, cards to stdout.
///
/// Every callback is also forwarded to a [`LoggingListener`]. In JSON mode
/// the cards are suppressed; the caller prints the enriched locations itself
/// once the pass returns.
pub struct ConsoleListener {
    json: bool,
    log: LoggingListener,
}

impl ConsoleListener {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            log: LoggingListener,
        }
    }
}

impl EnrichmentListener for ConsoleListener {
    fn report_error(&self, message: &str) {
        self.log.report_error(message);
        eprintln!("{message}");
    }

    fn on_location_enriched(&self, location: &Location) {
        self.log.on_location_enriched(location);
        if !self.json {
            println!("{}", info_card(location));
        }
    }

    fn on_batch_complete(&self, locations: &[Location], report: &PassReport) {
        self.log.on_batch_complete(locations, report);
        eprintln!(
            "Enrichment complete: {} locations, {} of {} provider calls failed",
            locations.len(),
            report.failed(),
            report.calls()
        );
    }
}
