use crate::error::{CoherenceError, CoherenceResult};
use serde::{Deserialize, Serialize};
use traceview_core::dsp::welch::MIN_SERIES_LENGTH;
use traceview_core::OctaveSmoother;

/// Tunables for a coherence run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoherenceConfig {
    /// Longest series analysed per channel, in points after downsampling.
    /// Longer input is cut and zero-padded up to the next power of two.
    pub max_data_length: usize,
    /// Fewest points a channel must have in the selected interval.
    pub min_samples: usize,
    pub smoothing: OctaveSmoother,
}

impl Default for CoherenceConfig {
    fn default() -> Self {
        Self {
            max_data_length: 1 << 20,
            min_samples: 32,
            smoothing: OctaveSmoother::default(),
        }
    }
}

impl CoherenceConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> CoherenceResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CoherenceResult<()> {
        if self.max_data_length < MIN_SERIES_LENGTH {
            return Err(CoherenceError::InvalidConfig(format!(
                "max_data_length {} is below the shortest analysable series ({})",
                self.max_data_length, MIN_SERIES_LENGTH
            )));
        }
        if !(self.smoothing.fraction > 0.0 && self.smoothing.fraction.is_finite()) {
            return Err(CoherenceError::InvalidConfig(format!(
                "smoothing fraction must be positive, got {}",
                self.smoothing.fraction
            )));
        }
        Ok(())
    }
}
