//! Transition (motion) models for target dynamics
//!
//! Survival probability is not part of the model: the mixture receives it
//! per call, next to the elapsed time.

use nalgebra::RealField;
use num_traits::Float;

use crate::types::spaces::StateCovariance;
use crate::types::transforms::TransitionMatrix;

/// Trait for linear transition (motion) models.
///
/// Describes target dynamics in the form:
/// x_{k+1} = F * x_k + w
///
/// where:
/// - F is the state transition matrix
/// - w is zero-mean Gaussian process noise with covariance Q
pub trait TransitionModel<T: RealField, const N: usize> {
    /// Returns the state transition matrix for time step dt.
    fn transition_matrix(&self, dt: T) -> TransitionMatrix<T, N>;

    /// Returns the process noise covariance for time step dt.
    fn process_noise(&self, dt: T) -> StateCovariance<T, N>;
}

// ============================================================================
// Common Transition Models
// ============================================================================

/// Constant velocity model in 2D.
///
/// State: [x, y, vx, vy]
#[derive(Debug, Clone)]
pub struct ConstantVelocity2D<T: RealField> {
    /// Acceleration noise standard deviation
    pub sigma_a: T,
}

impl<T: RealField + Float + Copy> ConstantVelocity2D<T> {
    /// Creates a new constant velocity model.
    ///
    /// # Panics
    /// Panics if `sigma_a < 0`.
    pub fn new(sigma_a: T) -> Self {
        assert!(
            sigma_a >= T::zero(),
            "Process noise sigma_a must be non-negative"
        );
        Self { sigma_a }
    }
}

impl<T: RealField + Float + Copy> TransitionModel<T, 4> for ConstantVelocity2D<T> {
    fn transition_matrix(&self, dt: T) -> TransitionMatrix<T, 4> {
        assert!(dt >= T::zero(), "Time step dt must be non-negative");
        let one = T::one();
        let zero = T::zero();

        TransitionMatrix::from_matrix(nalgebra::matrix![
            one, zero, dt, zero;
            zero, one, zero, dt;
            zero, zero, one, zero;
            zero, zero, zero, one
        ])
    }

    fn process_noise(&self, dt: T) -> StateCovariance<T, 4> {
        assert!(dt >= T::zero(), "Time step dt must be non-negative");
        let dt2 = dt * dt;
        let dt3 = dt2 * dt;
        let dt4 = dt3 * dt;

        let two: T = nalgebra::convert(2.0);
        let four: T = nalgebra::convert(4.0);

        let sigma_sq = self.sigma_a * self.sigma_a;

        // Discrete white noise acceleration model
        let q11 = dt4 / four * sigma_sq;
        let q13 = dt3 / two * sigma_sq;
        let q33 = dt2 * sigma_sq;

        let zero = T::zero();

        StateCovariance::from_matrix(nalgebra::matrix![
            q11, zero, q13, zero;
            zero, q11, zero, q13;
            q13, zero, q33, zero;
            zero, q13, zero, q33
        ])
    }
}

/// Random walk on a single coordinate.
///
/// State: [x], with F = 1 and Q = q * dt. With `q = 0` the target is
/// stationary.
#[derive(Debug, Clone)]
pub struct RandomWalk1D<T: RealField> {
    /// Process noise intensity per unit time
    pub q: T,
}

impl<T: RealField + Float + Copy> RandomWalk1D<T> {
    /// Creates a new random walk model.
    ///
    /// # Panics
    /// Panics if `q < 0`.
    pub fn new(q: T) -> Self {
        assert!(q >= T::zero(), "Process noise intensity must be non-negative");
        Self { q }
    }

    /// A model that leaves the state untouched.
    pub fn stationary() -> Self {
        Self { q: T::zero() }
    }
}

impl<T: RealField + Float + Copy> TransitionModel<T, 1> for RandomWalk1D<T> {
    fn transition_matrix(&self, _dt: T) -> TransitionMatrix<T, 1> {
        TransitionMatrix::identity()
    }

    fn process_noise(&self, dt: T) -> StateCovariance<T, 1> {
        assert!(dt >= T::zero(), "Time step dt must be non-negative");
        StateCovariance::from_matrix(nalgebra::matrix![self.q * dt])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::spaces::StateVector;

    #[test]
    fn test_constant_velocity_2d() {
        let model = ConstantVelocity2D::new(1.0_f64);
        let f = model.transition_matrix(1.0);

        let state = StateVector::from_array([0.0, 0.0, 1.0, 2.0]);
        let predicted = f.apply_state(&state);

        assert!((predicted.index(0) - 1.0).abs() < 1e-10);
        assert!((predicted.index(1) - 2.0).abs() < 1e-10);

        let q = model.process_noise(1.0);
        assert!((q.as_matrix()[(0, 0)] - 0.25).abs() < 1e-10);
        assert!((q.as_matrix()[(2, 2)] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_stationary_random_walk() {
        let model = RandomWalk1D::<f64>::stationary();
        let q = model.process_noise(3.0);
        assert!(q.as_matrix()[(0, 0)].abs() < 1e-15);

        let state = StateVector::from_array([4.0]);
        let predicted = model.transition_matrix(3.0).apply_state(&state);
        assert!((predicted.index(0) - 4.0).abs() < 1e-15);
    }

    #[test]
    #[should_panic(expected = "non-negative")]
    fn test_negative_time_step_panics() {
        let model = ConstantVelocity2D::new(1.0_f64);
        let _ = model.process_noise(-1.0);
    }
}
