//! OAuth 1.0a (HMAC-SHA1) request signing.
//!
//! [`sign`] stamps a parameter set with a fresh nonce and timestamp and appends
//! `oauth_signature`. [`signature`] is the deterministic part: the same method,
//! URL, parameters and secrets always produce the same signature.

use std::collections::BTreeMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use rand::Rng;
use reqwest::Url;
use sha1::Sha1;

use super::error::SigningError;

type HmacSha1 = Hmac<Sha1>;

/// Value of `oauth_signature_method` for requests signed here.
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";

/// Value of `oauth_version`.
pub const OAUTH_VERSION: &str = "1.0";

/// Nonces are drawn uniformly from `0..NONCE_RANGE`.
const NONCE_RANGE: u64 = 1_000_000_000_000;

/// Request parameters, keyed by name.
pub type Params = BTreeMap<String, String>;

/// Random decimal nonce, fresh on every call.
pub fn generate_nonce() -> String {
    rand::thread_rng().gen_range(0..NONCE_RANGE).to_string()
}

/// Current Unix time in seconds.
pub fn generate_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

/// Sign `base_params` for a request to `url`.
///
/// Returns a copy of the parameters with a freshly generated `oauth_nonce`
/// and `oauth_timestamp` plus the computed `oauth_signature`. Any nonce,
/// timestamp or signature already present in `base_params` is replaced.
pub fn sign(
    method: &str,
    url: &str,
    base_params: &Params,
    consumer_secret: &str,
    token_secret: &str,
) -> Result<Params, SigningError> {
    let mut params = base_params.clone();
    params.remove("oauth_signature");
    params.insert("oauth_nonce".to_string(), generate_nonce());
    params.insert("oauth_timestamp".to_string(), generate_timestamp());

    let signature = signature(method, url, &params, consumer_secret, token_secret)?;
    params.insert("oauth_signature".to_string(), signature);
    Ok(params)
}

/// Compute the base64 HMAC-SHA1 signature of a request.
pub fn signature(
    method: &str,
    url: &str,
    params: &Params,
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String, SigningError> {
    if consumer_secret.is_empty() {
        return Err(SigningError::MissingConsumerSecret);
    }

    let base = base_string(method, url, params)?;
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| SigningError::InvalidKey)?;
    mac.update(base.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Build the signature base string: `METHOD&url&params`, each part encoded.
///
/// Query pairs embedded in `url` join the parameter set; an existing
/// `oauth_signature` never does.
fn base_string(method: &str, url: &str, params: &Params) -> Result<String, SigningError> {
    let invalid = |reason: String| SigningError::InvalidUrl {
        url: url.to_string(),
        reason,
    };

    let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| invalid("missing host".to_string()))?;

    // Url::port() is None for the scheme's default port.
    let mut normalized = format!("{}://{}", parsed.scheme(), host);
    if let Some(port) = parsed.port() {
        normalized.push_str(&format!(":{port}"));
    }
    normalized.push_str(parsed.path());

    let mut pairs: Vec<(String, String)> = params
        .iter()
        .filter(|(k, _)| k.as_str() != "oauth_signature")
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    pairs.extend(
        parsed
            .query_pairs()
            .map(|(k, v)| (percent_encode(&k), percent_encode(&v))),
    );
    pairs.sort();

    let param_string = pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(&normalized),
        percent_encode(&param_string)
    ))
}

/// RFC 3986 percent-encoding; only unreserved characters pass through.
pub(crate) fn percent_encode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char);
            }
            _ => {
                out.push('%');
                out.push(char::from(HEX[(b >> 4) as usize]));
                out.push(char::from(HEX[(b & 0x0f) as usize]));
            }
        }
    }
    out
}

const HEX: [u8; 16] = *b"0123456789ABCDEF";
