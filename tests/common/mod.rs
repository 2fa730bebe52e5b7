//! Shared fixtures for integration tests.
//!
//! Provides canned provider bodies, wiremock mounting helpers for both
//! provider endpoints, and config builders pointed at a [`MockServer`].
#![allow(dead_code)]

use std::io::Write;

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn venue_json(id: &str, name: &str) -> Value {
    json!({
        "meta": { "code": 200 },
        "response": {
            "venue": {
                "id": id,
                "name": name,
                "url": "http://example.com",
                "shortUrl": format!("http://4sq.com/{id}"),
                "rating": 8.7,
                "ratingSignals": 120,
                "location": { "address": "1 Main St", "city": "Austin", "state": "TX" },
                "contact": { "formattedPhone": "(512) 555-0100" }
            }
        }
    })
}

pub fn business_jsonp(id: &str, name: &str) -> String {
    let body = json!({
        "id": id,
        "name": name,
        "rating": 4.0,
        "review_count": 310,
        "url": format!("http://www.yelp.com/biz/{id}")
    });
    format!("cb({body});")
}

/// Mount a Foursquare venue endpoint answering with `status`; 200 responses
/// carry a venue body.
pub async fn mount_venue(server: &MockServer, id: &str, name: &str, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(venue_json(id, name))
    } else {
        ResponseTemplate::new(status)
    };
    Mock::given(method("GET"))
        .and(path(format!("/v2/venues/{id}")))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

/// Mount a Yelp business endpoint answering with `status`; 200 responses
/// carry a JSONP body.
pub async fn mount_business(server: &MockServer, id: &str, name: &str, status: u16) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_string(business_jsonp(id, name))
    } else {
        ResponseTemplate::new(status)
    };
    Mock::given(method("GET"))
        .and(path(format!("/v2/business/{id}")))
        .respond_with(template)
        .expect(1)
        .mount(server)
        .await;
}

/// TOML config pointing both providers at `server_uri`.
///
/// Each location is `(name, foursquare_id, yelp_id)`.
pub fn config_toml(server_uri: &str, locations: &[(&str, &str, &str)]) -> String {
    let mut out = format!(
        r#"
[http]
timeout_secs = 5

[foursquare]
base_url = "{server_uri}/v2/venues/"
client_id = "fsq-id"
client_secret = "fsq-secret"

[yelp]
base_url = "{server_uri}/v2/business/"
consumer_key = "ck"
consumer_secret = "cs"
token = "tok"
token_secret = "ts"
"#
    );
    for (name, fsq, yelp) in locations {
        out.push_str(&format!(
            r#"
[[locations]]
name = "{name}"
lat = 30.2672
lng = -97.7431
foursquare_id = "{fsq}"
yelp_id = "{yelp}"
"#
        ));
    }
    out
}

pub fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}
