use crate::{MacaroonError, Result};
use serde::{Deserialize, Serialize};

/// Default limit on nested discharge macaroons
pub const DEFAULT_MAX_DISCHARGE_DEPTH: usize = 10;

/// Tunables for a [`Verifier`](crate::Verifier)
///
/// # Example
/// ```
/// use macaroons::VerifierConfig;
///
/// let config = VerifierConfig::from_json(r#"{ "max_discharge_depth": 3 }"#).unwrap();
/// assert_eq!(config.max_discharge_depth, 3);
///
/// let defaults = VerifierConfig::from_json("{}").unwrap();
/// assert_eq!(defaults, VerifierConfig::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierConfig {
    /// How many discharge macaroons may be nested below the root.
    /// Zero forbids third-party caveats altogether.
    pub max_discharge_depth: usize,
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            max_discharge_depth: DEFAULT_MAX_DISCHARGE_DEPTH,
        }
    }
}

impl VerifierConfig {
    /// Loads a configuration from JSON, filling omitted fields with defaults
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| MacaroonError::InvalidConfig(e.to_string()))
    }
}
