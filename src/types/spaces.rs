//! Vector space markers and typed vectors
//!
//! State vectors, measurements and innovations live in different spaces and
//! cannot be mixed by accident. Raw measurement data entering the tracker is
//! checked here, once, for the expected per-observation dimension.

use ::core::marker::PhantomData;
use ::core::ops::{Add, Sub};
use nalgebra::{RealField, SMatrix, SVector, Scalar};

use alloc::vec::Vec;

use crate::{PmbmError, Result};

// ============================================================================
// Vector Space Markers
// ============================================================================

/// Marker type for state space vectors (e.g., position, velocity)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateSpace;

/// Marker type for measurement space vectors (sensor observations)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeasurementSpace;

/// Marker type for innovation vectors (measurement - predicted measurement)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InnovationSpace;

// ============================================================================
// Typed Vector
// ============================================================================

/// A vector parameterized by scalar type, dimension, and mathematical space.
///
/// # Type Parameters
///
/// - `T`: The scalar type (typically `f32` or `f64`)
/// - `N`: The dimension of the vector (const generic)
/// - `Space`: Marker for the space this vector belongs to
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Vector<T: Scalar, const N: usize, Space> {
    inner: SVector<T, N>,
    _marker: PhantomData<Space>,
}

impl<T: Scalar, const N: usize, Space> Vector<T, N, Space> {
    /// Creates a new vector from raw components.
    #[inline]
    pub fn from_array(data: [T; N]) -> Self {
        Self {
            inner: SVector::from(data),
            _marker: PhantomData,
        }
    }

    /// Creates a new vector from an nalgebra SVector.
    #[inline]
    pub fn from_svector(inner: SVector<T, N>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Returns a reference to the underlying nalgebra vector.
    #[inline]
    pub fn as_svector(&self) -> &SVector<T, N> {
        &self.inner
    }

    /// Returns the raw components.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }

    /// Access element at index (unchecked).
    ///
    /// # Panics
    /// Panics if index is out of bounds.
    #[inline]
    #[allow(clippy::should_implement_trait)]
    pub fn index(&self, index: usize) -> &T {
        &self.inner[index]
    }
}

impl<T: Scalar + Copy, const N: usize> Vector<T, N, MeasurementSpace> {
    /// Builds a measurement from one observation's raw values.
    ///
    /// Fails with [`PmbmError::MalformedMeasurement`] unless `data` holds
    /// exactly `N` values.
    pub fn try_from_slice(data: &[T]) -> Result<Self> {
        if data.len() != N {
            return Err(PmbmError::MalformedMeasurement {
                expected: N,
                actual: data.len(),
            });
        }
        Ok(Self::from_svector(SVector::from_column_slice(data)))
    }
}

impl<T: Scalar + Copy, const N: usize, Space: Clone> Copy for Vector<T, N, Space> {}

/// A state vector in state space.
pub type StateVector<T, const N: usize> = Vector<T, N, StateSpace>;

/// A single observation in measurement space.
pub type Measurement<T, const M: usize> = Vector<T, M, MeasurementSpace>;

/// An innovation vector (measurement residual).
pub type Innovation<T, const M: usize> = Vector<T, M, InnovationSpace>;

/// Splits row-major measurement data into observations of dimension `M`.
///
/// Every row must contain exactly `M` values; a ragged or flattened batch is
/// rejected instead of being reinterpreted.
pub fn measurements_from_rows<T, R, const M: usize>(rows: &[R]) -> Result<Vec<Measurement<T, M>>>
where
    T: Scalar + Copy,
    R: AsRef<[T]>,
{
    rows.iter()
        .map(|row| Measurement::try_from_slice(row.as_ref()))
        .collect()
}

impl<T: RealField + Copy, const N: usize, Space> Add for Vector<T, N, Space> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::from_svector(self.inner + rhs.inner)
    }
}

impl<T: RealField + Copy, const N: usize, Space> Sub for Vector<T, N, Space> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_svector(self.inner - rhs.inner)
    }
}

/// Measurement minus predicted measurement is an innovation, not a measurement.
pub trait ComputeInnovation<T: RealField, const M: usize> {
    /// Residual between this measurement and a predicted one.
    fn innovation(self, predicted: Measurement<T, M>) -> Innovation<T, M>;
}

impl<T: RealField + Copy, const M: usize> ComputeInnovation<T, M> for Measurement<T, M> {
    #[inline]
    fn innovation(self, predicted: Measurement<T, M>) -> Innovation<T, M> {
        Innovation::from_svector(self.inner - predicted.inner)
    }
}

// ============================================================================
// Covariance Matrix
// ============================================================================

/// A covariance matrix bound to a specific vector space.
#[repr(transparent)]
#[derive(Debug, Clone, PartialEq)]
pub struct Covariance<T: Scalar, const N: usize, Space> {
    inner: SMatrix<T, N, N>,
    _marker: PhantomData<Space>,
}

impl<T: Scalar, const N: usize, Space> Covariance<T, N, Space> {
    /// Creates a covariance matrix from a raw matrix.
    ///
    /// The caller should ensure the matrix is symmetric and positive semi-definite.
    #[inline]
    pub fn from_matrix(inner: SMatrix<T, N, N>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Returns a reference to the underlying matrix.
    #[inline]
    pub fn as_matrix(&self) -> &SMatrix<T, N, N> {
        &self.inner
    }
}

impl<T: Scalar + Copy, const N: usize, Space: Clone> Copy for Covariance<T, N, Space> where
    SMatrix<T, N, N>: Copy
{
}

impl<T: RealField + Copy, const N: usize, Space> Covariance<T, N, Space> {
    /// Creates an identity covariance matrix.
    #[inline]
    pub fn identity() -> Self {
        Self::from_matrix(SMatrix::identity())
    }

    /// Scales the covariance matrix.
    #[inline]
    pub fn scale(&self, s: T) -> Self {
        Self::from_matrix(self.inner.scale(s))
    }

    /// Adds two covariance matrices.
    #[inline]
    pub fn add(&self, other: &Self) -> Self {
        Self::from_matrix(self.inner + other.inner)
    }

    /// Cholesky factorisation, or `None` if the matrix is not positive definite.
    #[inline]
    pub fn cholesky(&self) -> Option<nalgebra::Cholesky<T, nalgebra::Const<N>>> {
        nalgebra::Cholesky::new(self.inner)
    }

    /// Returns true if the matrix is positive definite.
    #[inline]
    pub fn is_positive_definite(&self) -> bool {
        self.cholesky().is_some()
    }
}

/// Covariance matrix in state space.
pub type StateCovariance<T, const N: usize> = Covariance<T, N, StateSpace>;

/// Covariance matrix in measurement space (also used for S = H*P*H' + R).
pub type MeasurementCovariance<T, const M: usize> = Covariance<T, M, MeasurementSpace>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measurement_to_innovation() {
        let actual: Measurement<f64, 2> = Measurement::from_array([10.0, 20.0]);
        let predicted: Measurement<f64, 2> = Measurement::from_array([9.5, 19.0]);

        let innovation = actual.innovation(predicted);
        assert!((innovation.index(0) - 0.5).abs() < 1e-10);
        assert!((innovation.index(1) - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_measurement_from_slice_checks_dimension() {
        let ok = Measurement::<f64, 2>::try_from_slice(&[1.0, 2.0]).unwrap();
        assert!((ok.index(1) - 2.0).abs() < 1e-10);

        let err = Measurement::<f64, 2>::try_from_slice(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            PmbmError::MalformedMeasurement {
                expected: 2,
                actual: 3
            }
        );
    }

    #[test]
    fn test_measurements_from_rows_rejects_ragged_batch() {
        let rows: Vec<Vec<f64>> = vec![vec![1.0, 2.0], vec![3.0]];
        let result = measurements_from_rows::<f64, _, 2>(&rows);
        assert!(matches!(
            result,
            Err(PmbmError::MalformedMeasurement { expected: 2, actual: 1 })
        ));

        let rows = [[0.0, 1.0], [2.0, 3.0]];
        let measurements = measurements_from_rows::<f64, _, 2>(&rows).unwrap();
        assert_eq!(measurements.len(), 2);
        assert!((measurements[1].index(0) - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_covariance_positive_definite() {
        let cov: StateCovariance<f64, 2> = StateCovariance::identity();
        assert!(cov.is_positive_definite());

        let singular: StateCovariance<f64, 2> =
            StateCovariance::from_matrix(nalgebra::matrix![1.0, 1.0; 1.0, 1.0]);
        assert!(!singular.is_positive_definite());
    }
}
