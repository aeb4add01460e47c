//! Base-size diagnostics
//!
//! Two tiers against `base_n`:
//! - below `min_base_size`: statistically unreliable
//! - below `warn_base_size`: interpret with caution
//!
//! Results are annotated, never suppressed.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_BASE_SIZE: usize = 30;
pub const DEFAULT_WARN_BASE_SIZE: usize = 100;

/// Base-size thresholds passed to the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseSizeThresholds {
    pub min_base_size: usize,
    pub warn_base_size: usize,
}

impl Default for BaseSizeThresholds {
    fn default() -> Self {
        Self {
            min_base_size: DEFAULT_MIN_BASE_SIZE,
            warn_base_size: DEFAULT_WARN_BASE_SIZE,
        }
    }
}

impl BaseSizeThresholds {
    pub fn new(min_base_size: usize, warn_base_size: usize) -> Self {
        Self {
            min_base_size,
            warn_base_size,
        }
    }

    /// Warnings for a base of `base_n` respondents
    pub fn warnings(&self, base_n: usize) -> Vec<String> {
        if base_n < self.min_base_size {
            vec![format!(
                "Base size {} is below minimum {}; results are statistically unreliable",
                base_n, self.min_base_size
            )]
        } else if base_n < self.warn_base_size {
            vec![format!(
                "Base size {} is below {}; interpret with caution",
                base_n, self.warn_base_size
            )]
        } else {
            Vec::new()
        }
    }
}
