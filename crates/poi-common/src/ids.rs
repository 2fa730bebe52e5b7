//! Typed ID wrappers.
//!
//! Locations carry a stable [`LocationId`] so they can be tracked across
//! enrichment passes independently of their display name.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a location (point of interest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(Uuid);

impl LocationId {
    /// Generate a new random location ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LocationId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for LocationId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<LocationId> for Uuid {
    fn from(id: LocationId) -> Self {
        id.0
    }
}

impl std::fmt::Display for LocationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
