//! Single-target density handling
//!
//! The [`DensityHandler`] trait is the boundary between the hypothesis core
//! and the single-target recursive Bayes filter: prediction, measurement
//! update, predicted measurement likelihood and ellipsoidal gating of one
//! state density. [`GaussianDensity`] implements it with the linear Kalman
//! equations.
//!
//! # Example
//!
//! ```
//! use pmbm::filters::density::{DensityHandler, GaussianDensity};
//! use pmbm::models::{PositionSensor1D, RandomWalk1D};
//! use pmbm::types::gaussian::GaussianState;
//! use pmbm::types::spaces::{Measurement, StateCovariance, StateVector};
//!
//! let density = GaussianDensity;
//! let motion = RandomWalk1D::new(0.1);
//! let sensor = PositionSensor1D::new(1.0);
//!
//! let state = GaussianState::with_unit_weight(
//!     StateVector::from_array([0.0]),
//!     StateCovariance::identity(),
//! );
//! let predicted = density.predict(&state, &motion, 1.0);
//!
//! let z = [Measurement::from_array([0.5]), Measurement::from_array([40.0])];
//! let gate = density.ellipsoidal_gating(&predicted, &z, &sensor, 9.0).unwrap();
//! assert_eq!(gate, vec![true, false]);
//! ```

use nalgebra::RealField;
use num_traits::Float;

use alloc::vec::Vec;

use crate::models::{ObservationModel, TransitionModel};
use crate::types::gaussian::{innovation_log_likelihood, mahalanobis_squared, GaussianState};
use crate::types::spaces::{ComputeInnovation, Innovation, Measurement, MeasurementCovariance, StateVector};
use crate::types::transforms::{compute_innovation_covariance, compute_kalman_gain, joseph_update};
use crate::{PmbmError, Result};

/// Operations the hypothesis core needs from a single-target density.
pub trait DensityHandler<T: RealField, const N: usize> {
    /// Propagates a density through the motion model over `dt`.
    fn predict<Motion>(&self, state: &GaussianState<T, N>, motion: &Motion, dt: T) -> GaussianState<T, N>
    where
        Motion: TransitionModel<T, N>;

    /// Conditions a density on a single measurement.
    fn update<Sensor, const M: usize>(
        &self,
        state: &GaussianState<T, N>,
        measurement: &Measurement<T, M>,
        sensor: &Sensor,
    ) -> Result<GaussianState<T, N>>
    where
        Sensor: ObservationModel<T, N, M>;

    /// Log-density of `measurement` under the predicted measurement distribution.
    fn predicted_log_likelihood<Sensor, const M: usize>(
        &self,
        state: &GaussianState<T, N>,
        measurement: &Measurement<T, M>,
        sensor: &Sensor,
    ) -> Result<T>
    where
        Sensor: ObservationModel<T, N, M>;

    /// Marks each measurement that falls inside the ellipsoidal gate.
    ///
    /// `gate_size` bounds the squared Mahalanobis distance.
    fn ellipsoidal_gating<Sensor, const M: usize>(
        &self,
        state: &GaussianState<T, N>,
        measurements: &[Measurement<T, M>],
        sensor: &Sensor,
        gate_size: T,
    ) -> Result<Vec<bool>>
    where
        Sensor: ObservationModel<T, N, M>;
}

/// Linear-Gaussian density handler (Kalman filter).
#[derive(Debug, Clone, Copy, Default)]
pub struct GaussianDensity;

impl GaussianDensity {
    fn innovation<T, Sensor, const N: usize, const M: usize>(
        state: &GaussianState<T, N>,
        measurement: &Measurement<T, M>,
        sensor: &Sensor,
    ) -> (Innovation<T, M>, MeasurementCovariance<T, M>)
    where
        T: RealField + Copy,
        Sensor: ObservationModel<T, N, M>,
    {
        let h = sensor.observation_matrix();
        let r = sensor.measurement_noise();
        let innovation = measurement.innovation(h.observe(&state.mean));
        let innovation_cov = compute_innovation_covariance(&state.covariance, &h, &r);
        (innovation, innovation_cov)
    }
}

impl<T: RealField + Float + Copy, const N: usize> DensityHandler<T, N> for GaussianDensity {
    fn predict<Motion>(&self, state: &GaussianState<T, N>, motion: &Motion, dt: T) -> GaussianState<T, N>
    where
        Motion: TransitionModel<T, N>,
    {
        let f = motion.transition_matrix(dt);
        let q = motion.process_noise(dt);
        state.predict(&f, &q)
    }

    fn update<Sensor, const M: usize>(
        &self,
        state: &GaussianState<T, N>,
        measurement: &Measurement<T, M>,
        sensor: &Sensor,
    ) -> Result<GaussianState<T, N>>
    where
        Sensor: ObservationModel<T, N, M>,
    {
        let h = sensor.observation_matrix();
        let r = sensor.measurement_noise();
        let (innovation, innovation_cov) = Self::innovation(state, measurement, sensor);

        let kalman_gain = compute_kalman_gain(&state.covariance, &h, &innovation_cov)
            .ok_or(PmbmError::SingularMatrix)?;

        let correction = kalman_gain.correct(&innovation);
        let mean = StateVector::from_svector(state.mean.as_svector() + correction.as_svector());
        let covariance = joseph_update(&state.covariance, &kalman_gain, &h, &r);

        Ok(GaussianState::new(state.weight, mean, covariance))
    }

    fn predicted_log_likelihood<Sensor, const M: usize>(
        &self,
        state: &GaussianState<T, N>,
        measurement: &Measurement<T, M>,
        sensor: &Sensor,
    ) -> Result<T>
    where
        Sensor: ObservationModel<T, N, M>,
    {
        let (innovation, innovation_cov) = Self::innovation(state, measurement, sensor);
        innovation_log_likelihood(&innovation, &innovation_cov).ok_or(PmbmError::SingularMatrix)
    }

    fn ellipsoidal_gating<Sensor, const M: usize>(
        &self,
        state: &GaussianState<T, N>,
        measurements: &[Measurement<T, M>],
        sensor: &Sensor,
        gate_size: T,
    ) -> Result<Vec<bool>>
    where
        Sensor: ObservationModel<T, N, M>,
    {
        measurements
            .iter()
            .map(|z| {
                let (innovation, innovation_cov) = Self::innovation(state, z, sensor);
                mahalanobis_squared(&innovation, &innovation_cov)
                    .map(|d2| d2 < gate_size)
                    .ok_or(PmbmError::SingularMatrix)
            })
            .collect()
    }
}
