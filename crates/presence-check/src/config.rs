//! Presence heuristic configuration

use serde::{Deserialize, Serialize};

/// Presence heuristic configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    /// Minimum number of visual checks carrying a photo
    pub min_photos: usize,

    /// Minimum plausible inspection duration (minutes)
    pub min_duration_min: f64,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            min_photos: 3,
            min_duration_min: 5.0,
        }
    }
}

impl PresenceConfig {
    /// Create strict config (more evidence required)
    pub fn strict() -> Self {
        Self {
            min_photos: 5,
            min_duration_min: 10.0,
        }
    }

    /// Create lenient config (less evidence required)
    pub fn lenient() -> Self {
        Self {
            min_photos: 1,
            min_duration_min: 2.0,
        }
    }
}
