//! Error types for provider calls and enrichment passes.
//!
//! Call-level errors ([`ProviderError`], [`SigningError`]) are never fatal to a
//! pass: they are logged, reported to the listener and counted as settled.
//! [`EnrichError`] is reserved for defects in the coordination itself.

use poi_common::ProviderKind;
use reqwest::StatusCode;

/// Failure to compute an OAuth request signature.
#[derive(Debug, thiserror::Error)]
pub enum SigningError {
    /// The consumer secret is required to derive the signing key.
    #[error("consumer secret is empty")]
    MissingConsumerSecret,

    /// The request URL could not be normalized for the base string.
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The HMAC implementation rejected the signing key.
    #[error("invalid signing key")]
    InvalidKey,
}

/// Failure of a single provider call.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The request never produced a response (connect, TLS, timeout, ...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider returned HTTP {0}")]
    Status(StatusCode),

    /// A 2xx response whose body does not have the expected shape.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The request could not be signed.
    #[error("signing failed: {0}")]
    Signing(#[from] SigningError),
}

impl ProviderError {
    pub fn malformed<S: Into<String>>(msg: S) -> Self {
        Self::MalformedResponse(msg.into())
    }

    /// Message surfaced to the presentation layer for a failed call.
    pub fn user_message(provider: ProviderKind) -> String {
        format!("Whoops! The {} API isn't loading.", provider.display_name())
    }
}

/// Fatal error of an enrichment pass.
#[derive(Debug, thiserror::Error)]
pub enum EnrichError {
    /// Every call finished but the settlement counter never became terminal.
    #[error("{provider} batch finished with {settled} of {total} calls settled")]
    BatchIncomplete {
        provider: ProviderKind,
        settled: usize,
        total: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_names_the_failing_provider() {
        assert_eq!(
            ProviderError::user_message(ProviderKind::Yelp),
            "Whoops! The Yelp API isn't loading."
        );
        assert_eq!(
            ProviderError::user_message(ProviderKind::Foursquare),
            "Whoops! The Foursquare API isn't loading."
        );
    }

    #[test]
    fn signing_error_converts_into_provider_error() {
        let err: ProviderError = SigningError::MissingConsumerSecret.into();
        assert!(matches!(err, ProviderError::Signing(_)));
        assert_eq!(err.to_string(), "signing failed: consumer secret is empty");
    }

    #[test]
    fn batch_incomplete_display() {
        let err = EnrichError::BatchIncomplete {
            provider: ProviderKind::Foursquare,
            settled: 2,
            total: 3,
        };
        assert_eq!(
            err.to_string(),
            "foursquare batch finished with 2 of 3 calls settled"
        );
    }
}
