//! Observation (sensor) models
//!
//! Describes how sensor measurements relate to target states. Detection
//! probability is supplied per call to the mixture, not by the sensor.

use nalgebra::RealField;
use num_traits::Float;

use crate::types::spaces::MeasurementCovariance;
use crate::types::transforms::ObservationMatrix;

/// Trait for linear observation models.
///
/// Describes the measurement process:
/// z = H * x + v
///
/// where:
/// - H is the observation matrix
/// - v is zero-mean Gaussian measurement noise with covariance R
pub trait ObservationModel<T: RealField, const N: usize, const M: usize> {
    /// Returns the observation matrix.
    fn observation_matrix(&self) -> ObservationMatrix<T, M, N>;

    /// Returns the measurement noise covariance.
    fn measurement_noise(&self) -> MeasurementCovariance<T, M>;
}

/// Position-only sensor in 2D.
///
/// Observes [x, y] from state [x, y, vx, vy]
#[derive(Debug, Clone)]
pub struct PositionSensor2D<T: RealField> {
    /// Position measurement noise standard deviation
    pub sigma_pos: T,
}

impl<T: RealField + Float + Copy> PositionSensor2D<T> {
    /// Creates a new position sensor.
    ///
    /// # Panics
    /// Panics if `sigma_pos <= 0`.
    pub fn new(sigma_pos: T) -> Self {
        assert!(sigma_pos > T::zero(), "Measurement noise sigma_pos must be positive");
        Self { sigma_pos }
    }
}

impl<T: RealField + Float + Copy> ObservationModel<T, 4, 2> for PositionSensor2D<T> {
    fn observation_matrix(&self) -> ObservationMatrix<T, 2, 4> {
        let one = T::one();
        let zero = T::zero();

        ObservationMatrix::from_matrix(nalgebra::matrix![
            one, zero, zero, zero;
            zero, one, zero, zero
        ])
    }

    fn measurement_noise(&self) -> MeasurementCovariance<T, 2> {
        let sigma_sq = self.sigma_pos * self.sigma_pos;
        let zero = T::zero();

        MeasurementCovariance::from_matrix(nalgebra::matrix![
            sigma_sq, zero;
            zero, sigma_sq
        ])
    }
}

/// Direct sensor on a single coordinate: z = x + v.
#[derive(Debug, Clone)]
pub struct PositionSensor1D<T: RealField> {
    /// Measurement noise standard deviation
    pub sigma: T,
}

impl<T: RealField + Float + Copy> PositionSensor1D<T> {
    /// Creates a new scalar sensor.
    ///
    /// # Panics
    /// Panics if `sigma <= 0`.
    pub fn new(sigma: T) -> Self {
        assert!(sigma > T::zero(), "Measurement noise sigma must be positive");
        Self { sigma }
    }
}

impl<T: RealField + Float + Copy> ObservationModel<T, 1, 1> for PositionSensor1D<T> {
    fn observation_matrix(&self) -> ObservationMatrix<T, 1, 1> {
        ObservationMatrix::from_matrix(nalgebra::matrix![T::one()])
    }

    fn measurement_noise(&self) -> MeasurementCovariance<T, 1> {
        MeasurementCovariance::from_matrix(nalgebra::matrix![self.sigma * self.sigma])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::spaces::StateVector;

    #[test]
    fn test_position_sensor_2d() {
        let sensor = PositionSensor2D::new(1.0_f64);
        let state = StateVector::from_array([10.0, 20.0, 1.0, 2.0]);

        let z = sensor.observation_matrix().observe(&state);

        assert!((z.index(0) - 10.0).abs() < 1e-10);
        assert!((z.index(1) - 20.0).abs() < 1e-10);
    }

    #[test]
    fn test_position_sensor_1d_noise() {
        let sensor = PositionSensor1D::new(0.5_f64);
        assert!((sensor.measurement_noise().as_matrix()[(0, 0)] - 0.25).abs() < 1e-10);
    }

    #[test]
    #[should_panic(expected = "must be positive")]
    fn test_zero_noise_panics() {
        let _ = PositionSensor2D::new(0.0_f64);
    }
}
