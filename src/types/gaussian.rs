//! Gaussian components and mixtures
//!
//! Weighted Gaussian states for single-target beliefs and birth intensities,
//! plus the Cholesky-based likelihood and distance helpers the density
//! handler relies on.

use nalgebra::RealField;
use num_traits::Float;

use alloc::vec::Vec;

use super::spaces::{Innovation, MeasurementCovariance, StateCovariance, StateVector};
use super::transforms::TransitionMatrix;

// ============================================================================
// Gaussian State
// ============================================================================

/// A weighted Gaussian component.
///
/// Inside a Bernoulli the weight is always one; in a birth intensity it is
/// the expected number of objects appearing in that region of state space.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianState<T: RealField, const N: usize> {
    /// Component weight
    pub weight: T,
    /// Mean state vector
    pub mean: StateVector<T, N>,
    /// State covariance matrix
    pub covariance: StateCovariance<T, N>,
}

impl<T: RealField + Copy, const N: usize> GaussianState<T, N> {
    /// Creates a new Gaussian component.
    #[inline]
    pub fn new(weight: T, mean: StateVector<T, N>, covariance: StateCovariance<T, N>) -> Self {
        Self {
            weight,
            mean,
            covariance,
        }
    }

    /// Creates a Gaussian with unit weight.
    #[inline]
    pub fn with_unit_weight(mean: StateVector<T, N>, covariance: StateCovariance<T, N>) -> Self {
        Self::new(T::one(), mean, covariance)
    }

    /// Predicts this Gaussian through a linear transition model.
    #[inline]
    pub fn predict(
        &self,
        transition: &TransitionMatrix<T, N>,
        process_noise: &StateCovariance<T, N>,
    ) -> Self {
        Self {
            weight: self.weight,
            mean: transition.apply_state(&self.mean),
            covariance: transition
                .propagate_covariance(&self.covariance)
                .add(process_noise),
        }
    }
}

// ============================================================================
// Innovation statistics
// ============================================================================

/// Squared Mahalanobis distance `ν^T S^{-1} ν`.
///
/// Returns `None` if `S` is not positive definite.
pub fn mahalanobis_squared<T: RealField + Copy, const M: usize>(
    innovation: &Innovation<T, M>,
    innovation_cov: &MeasurementCovariance<T, M>,
) -> Option<T> {
    let chol = innovation_cov.cholesky()?;
    let y = chol.l().solve_lower_triangular(innovation.as_svector())?;
    Some(y.norm_squared())
}

/// Log-density of an innovation under `N(0, S)`.
///
/// ln p = -0.5 * (M ln 2π + ln|S| + ν^T S^{-1} ν)
///
/// Returns `None` if `S` is not positive definite.
pub fn innovation_log_likelihood<T: RealField + Float + Copy, const M: usize>(
    innovation: &Innovation<T, M>,
    innovation_cov: &MeasurementCovariance<T, M>,
) -> Option<T> {
    let chol = innovation_cov.cholesky()?;
    let l = chol.l();

    // ln|S| = 2 * sum(ln L_ii)
    let mut log_det = T::zero();
    for i in 0..M {
        log_det += Float::ln(l[(i, i)]);
    }
    log_det += log_det;

    let mahal_sq = l.solve_lower_triangular(innovation.as_svector())?.norm_squared();

    let m: T = nalgebra::convert(M as f64);
    let half: T = nalgebra::convert(0.5);
    Some(-half * (m * Float::ln(T::two_pi()) + log_det + mahal_sq))
}

// ============================================================================
// Gaussian Mixture
// ============================================================================

/// A weighted Gaussian mixture, e.g. a birth intensity.
#[derive(Debug, Clone)]
pub struct GaussianMixture<T: RealField, const N: usize> {
    /// The Gaussian components
    pub components: Vec<GaussianState<T, N>>,
}

impl<T: RealField + Copy, const N: usize> GaussianMixture<T, N> {
    /// Creates an empty mixture.
    #[inline]
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
        }
    }

    /// Returns the number of components.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the mixture is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Adds a component to the mixture.
    #[inline]
    pub fn push(&mut self, component: GaussianState<T, N>) {
        self.components.push(component);
    }

    /// Sum of component weights.
    pub fn total_weight(&self) -> T {
        self.components
            .iter()
            .fold(T::zero(), |acc, c| acc + c.weight)
    }

    /// Iterates over the components.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &GaussianState<T, N>> {
        self.components.iter()
    }
}

impl<T: RealField + Copy, const N: usize> Default for GaussianMixture<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_predict() {
        let mean: StateVector<f64, 4> = StateVector::from_array([0.0, 0.0, 1.0, 2.0]);
        let cov: StateCovariance<f64, 4> = StateCovariance::identity();
        let gs = GaussianState::with_unit_weight(mean, cov);

        let dt = 1.0;
        let f = TransitionMatrix::from_matrix(nalgebra::matrix![
            1.0, 0.0, dt, 0.0;
            0.0, 1.0, 0.0, dt;
            0.0, 0.0, 1.0, 0.0;
            0.0, 0.0, 0.0, 1.0
        ]);
        let q = StateCovariance::identity().scale(0.01);

        let predicted = gs.predict(&f, &q);

        assert!((predicted.mean.index(0) - 1.0).abs() < 1e-10);
        assert!((predicted.mean.index(1) - 2.0).abs() < 1e-10);
        assert!((predicted.weight - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_innovation_log_likelihood_standard_normal() {
        let nu: Innovation<f64, 1> = Innovation::from_array([0.0]);
        let s: MeasurementCovariance<f64, 1> = MeasurementCovariance::identity();

        let ll = innovation_log_likelihood(&nu, &s).unwrap();
        let expected = -0.5 * (2.0 * core::f64::consts::PI).ln();
        assert!((ll - expected).abs() < 1e-10);
    }

    #[test]
    fn test_mahalanobis_matches_scaled_norm() {
        let nu: Innovation<f64, 2> = Innovation::from_array([2.0, 0.0]);
        let s: MeasurementCovariance<f64, 2> = MeasurementCovariance::identity().scale(4.0);

        let d2 = mahalanobis_squared(&nu, &s).unwrap();
        assert!((d2 - 1.0).abs() < 1e-10);

        let singular: MeasurementCovariance<f64, 2> =
            MeasurementCovariance::from_matrix(nalgebra::matrix![1.0, 1.0; 1.0, 1.0]);
        assert!(mahalanobis_squared(&nu, &singular).is_none());
        assert!(innovation_log_likelihood(&nu, &singular).is_none());
    }

    #[test]
    fn test_gaussian_mixture() {
        let mut mixture = GaussianMixture::new();

        let cov: StateCovariance<f64, 2> = StateCovariance::identity();
        mixture.push(GaussianState::new(0.3, StateVector::from_array([0.0, 0.0]), cov));
        mixture.push(GaussianState::new(0.7, StateVector::from_array([5.0, 5.0]), cov));

        assert_eq!(mixture.len(), 2);
        assert!((mixture.total_weight() - 1.0).abs() < 1e-10);
    }
}
