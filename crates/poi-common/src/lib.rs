//! Poi-Common: Shared types and error handling for poi-enrich.
//!
//! - **Typed IDs**: UUID wrapper for location identity
//! - **Core Types**: Geographic positions and provider kinds
//! - **Error Handling**: Common error type and result alias
//!
//! # Examples
//!
//! ```
//! use poi_common::{LatLng, LocationId, ProviderKind, Result};
//!
//! let id = LocationId::new();
//! let position: Result<LatLng> = LatLng::new(40.7484, -73.9857);
//! assert!(position.is_ok());
//! assert_eq!(ProviderKind::Yelp.to_string(), "yelp");
//! # let _ = id;
//! ```

pub mod error;
pub mod ids;
pub mod types;

pub use error::{Error, Result};
pub use ids::*;
pub use types::*;
