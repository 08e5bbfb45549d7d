//! Bernoulli single-target belief
//!
//! A Bernoulli is the belief held by one node of a hypothesis tree: the
//! probability that the target exists and, if it does, a Gaussian density
//! over its state.

use nalgebra::RealField;
use num_traits::Float;

use crate::filters::density::DensityHandler;
use crate::models::{ObservationModel, TransitionModel};
use crate::types::gaussian::GaussianState;
use crate::types::spaces::Measurement;
use crate::{PmbmError, Result};

/// Fails with [`PmbmError::InvalidProbability`] unless `p` lies in `[0, 1]`.
#[inline]
pub(crate) fn check_probability<T: RealField + Copy>(p: T) -> Result<()> {
    if p >= T::zero() && p <= T::one() {
        Ok(())
    } else {
        Err(PmbmError::InvalidProbability)
    }
}

/// Existence probability plus Gaussian state density.
#[derive(Debug, Clone, PartialEq)]
pub struct Bernoulli<T: RealField, const N: usize> {
    /// Probability that the target exists
    pub existence_probability: T,
    /// State density conditioned on existence
    pub state: GaussianState<T, N>,
}

impl<T: RealField + Float + Copy, const N: usize> Bernoulli<T, N> {
    /// Creates a Bernoulli.
    ///
    /// The component weight of `state` is reset to one.
    pub fn new(existence_probability: T, state: GaussianState<T, N>) -> Result<Self> {
        check_probability(existence_probability)?;
        Ok(Self {
            existence_probability,
            state: GaussianState::with_unit_weight(state.mean, state.covariance),
        })
    }

    /// Turns one weighted birth component into a Bernoulli.
    ///
    /// The component weight becomes the existence probability, clamped into
    /// `[0, 1]`.
    pub fn from_birth_component(component: &GaussianState<T, N>) -> Self {
        let r = if component.weight > T::one() {
            T::one()
        } else if component.weight < T::zero() {
            T::zero()
        } else {
            component.weight
        };
        Self {
            existence_probability: r,
            state: GaussianState::with_unit_weight(component.mean, component.covariance),
        }
    }

    /// Predicts the belief in place: `r <- P_S * r`, state through the motion model.
    pub fn predict<Motion, Density>(
        &mut self,
        motion: &Motion,
        survival_probability: T,
        density: &Density,
        dt: T,
    ) where
        Motion: TransitionModel<T, N>,
        Density: DensityHandler<T, N>,
    {
        self.existence_probability = survival_probability * self.existence_probability;
        self.state = density.predict(&self.state, motion, dt);
    }

    /// Belief after the target went undetected.
    ///
    /// r' = r (1 - P_D) / (1 - r P_D); the state density is unchanged.
    pub fn undetected_update_state(&self, detection_probability: T) -> Self {
        let r = self.existence_probability;
        let denominator = T::one() - r * detection_probability;
        let existence_probability = if denominator > T::zero() {
            r * (T::one() - detection_probability) / denominator
        } else {
            // r = P_D = 1: a certain target that must have been seen
            T::zero()
        };
        Self {
            existence_probability,
            state: self.state.clone(),
        }
    }

    /// Log-likelihood of no detection: ln(1 - r P_D).
    pub fn undetected_update_loglikelihood(&self, detection_probability: T) -> T {
        Float::ln(T::one() - self.existence_probability * detection_probability)
    }

    /// Belief after the target produced `measurement`: r' = 1, state updated.
    pub fn detected_update_state<Sensor, Density, const M: usize>(
        &self,
        measurement: &Measurement<T, M>,
        sensor: &Sensor,
        density: &Density,
    ) -> Result<Self>
    where
        Sensor: ObservationModel<T, N, M>,
        Density: DensityHandler<T, N>,
    {
        Ok(Self {
            existence_probability: T::one(),
            state: density.update(&self.state, measurement, sensor)?,
        })
    }

    /// Log-likelihood of the detection: ln r + ln P_D + ln N(z; Hx, S).
    pub fn detected_update_loglikelihood<Sensor, Density, const M: usize>(
        &self,
        measurement: &Measurement<T, M>,
        sensor: &Sensor,
        detection_probability: T,
        density: &Density,
    ) -> Result<T>
    where
        Sensor: ObservationModel<T, N, M>,
        Density: DensityHandler<T, N>,
    {
        let measurement_ll = density.predicted_log_likelihood(&self.state, measurement, sensor)?;
        Ok(Float::ln(self.existence_probability) + Float::ln(detection_probability) + measurement_ll)
    }
}
