//! Tuning parameters for one tracking step
//!
//! Every [`MultiBernoulliMixture`](super::MultiBernoulliMixture) operation
//! still takes its scalars per call; this bundle only keeps them together.

use nalgebra::RealField;
use num_traits::Float;

/// Per-step tuning scalars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MbmConfig<T: RealField> {
    /// Probability that a target survives one step
    pub survival_probability: T,
    /// Probability that an existing target is detected
    pub detection_probability: T,
    /// Squared Mahalanobis distance bounding the gate
    pub gate_size: T,
    /// Global hypotheses with log-weight at or below this are pruned
    pub prune_log_threshold: T,
    /// Maximum number of global hypotheses kept after capping
    pub max_global_hypotheses: usize,
    /// Minimum existence probability for a target to be reported
    pub existence_threshold: T,
}

impl<T: RealField + Float + Copy> MbmConfig<T> {
    /// Creates the default configuration.
    ///
    /// Default values:
    /// - `survival_probability`: 0.99
    /// - `detection_probability`: 0.9
    /// - `gate_size`: 9.21 (99% gate for two measured coordinates)
    /// - `prune_log_threshold`: ln(0.05)
    /// - `max_global_hypotheses`: 50
    /// - `existence_threshold`: 0.5
    pub fn default_config() -> Self {
        Self {
            survival_probability: nalgebra::convert(0.99),
            detection_probability: nalgebra::convert(0.9),
            gate_size: nalgebra::convert(9.21),
            prune_log_threshold: Float::ln(nalgebra::convert::<f64, T>(0.05)),
            max_global_hypotheses: 50,
            existence_threshold: nalgebra::convert(0.5),
        }
    }

    /// Creates a custom configuration.
    ///
    /// # Panics
    /// Panics if a probability lies outside `[0, 1]` or `gate_size <= 0`.
    pub fn new(
        survival_probability: T,
        detection_probability: T,
        gate_size: T,
        prune_log_threshold: T,
        max_global_hypotheses: usize,
        existence_threshold: T,
    ) -> Self {
        let unit = |p: T| p >= T::zero() && p <= T::one();
        assert!(unit(survival_probability), "Survival probability must be in [0, 1]");
        assert!(unit(detection_probability), "Detection probability must be in [0, 1]");
        assert!(unit(existence_threshold), "Existence threshold must be in [0, 1]");
        assert!(gate_size > T::zero(), "Gate size must be positive");

        Self {
            survival_probability,
            detection_probability,
            gate_size,
            prune_log_threshold,
            max_global_hypotheses,
            existence_threshold,
        }
    }

    /// Creates a lightweight configuration for testing or low-latency applications.
    pub fn lightweight() -> Self {
        Self {
            prune_log_threshold: Float::ln(nalgebra::convert::<f64, T>(0.1)),
            max_global_hypotheses: 10,
            ..Self::default_config()
        }
    }
}

impl<T: RealField + Float + Copy> Default for MbmConfig<T> {
    fn default() -> Self {
        Self::default_config()
    }
}
