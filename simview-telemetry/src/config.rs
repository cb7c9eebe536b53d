//! Analysis configuration
//!
//! The pipeline has a single tuning knob: epsilon, which is both the resampling
//! grid step and the tolerance for treating two lap starts as aligned.

use crate::types::{Result, TelemetryError};

/// Default alignment accuracy, in track position units
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Configuration for a lap comparison
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisConfig {
    /// Resampling step and alignment tolerance (must be finite and > 0)
    pub epsilon: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set epsilon
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Check that epsilon can be used as a grid step
    pub fn validate(&self) -> Result<()> {
        validate_epsilon(self.epsilon)
    }
}

pub(crate) fn validate_epsilon(epsilon: f64) -> Result<()> {
    if epsilon.is_finite() && epsilon > 0.0 {
        Ok(())
    } else {
        Err(TelemetryError::InvalidConfig(format!(
            "epsilon must be a positive number, got {}",
            epsilon
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_epsilon() {
        let config = AnalysisConfig::new();
        assert_eq!(config.epsilon, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = AnalysisConfig::new().with_epsilon(0.5);
        assert_eq!(config.epsilon, 0.5);
    }

    #[test]
    fn test_rejects_bad_epsilon() {
        for epsilon in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let config = AnalysisConfig::new().with_epsilon(epsilon);
            assert!(
                matches!(config.validate(), Err(TelemetryError::InvalidConfig(_))),
                "epsilon {} should be rejected",
                epsilon
            );
        }
    }
}
