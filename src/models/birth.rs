//! Birth models for newly appearing objects
//!
//! A birth model supplies the intensity of objects that may have appeared
//! since the last step. New tracks are seeded from its components.

use nalgebra::RealField;

use crate::types::gaussian::{GaussianMixture, GaussianState};
use crate::types::spaces::{StateCovariance, StateVector};
use crate::{PmbmError, Result};

/// Birth intensity strategies.
///
/// Only the static strategy is implemented. The other two are kept as
/// explicit variants so callers get [`PmbmError::Unsupported`] instead of an
/// empty intensity.
#[derive(Debug, Clone)]
pub enum BirthModel<T: RealField, const N: usize> {
    /// A fixed Gaussian-mixture intensity, the same every step.
    Static(GaussianMixture<T, N>),
    /// Intensity sampled at random over the surveillance region.
    RandomSampled,
    /// Intensity derived from measurements no existing track explains.
    MeasurementDriven,
}

impl<T: RealField + Copy, const N: usize> BirthModel<T, N> {
    /// Creates a static birth model from a mixture.
    pub fn fixed(intensity: GaussianMixture<T, N>) -> Self {
        BirthModel::Static(intensity)
    }

    /// Adds a birth location to a static model.
    ///
    /// # Panics
    /// Panics if `weight < 0`, if the covariance is not positive definite, or
    /// if called on a non-static model.
    pub fn add_birth_location(
        &mut self,
        weight: T,
        mean: StateVector<T, N>,
        covariance: StateCovariance<T, N>,
    ) {
        assert!(weight >= T::zero(), "Birth weight must be non-negative");
        assert!(
            covariance.is_positive_definite(),
            "Birth covariance must be positive definite"
        );
        match self {
            BirthModel::Static(intensity) => {
                intensity.push(GaussianState::new(weight, mean, covariance))
            }
            _ => panic!("Birth locations can only be added to a static birth model"),
        }
    }

    /// Returns the intensity of objects born this step.
    pub fn born_objects_intensity(&self) -> Result<&GaussianMixture<T, N>> {
        match self {
            BirthModel::Static(intensity) => Ok(intensity),
            BirthModel::RandomSampled => Err(PmbmError::Unsupported("random-sampled birth model")),
            BirthModel::MeasurementDriven => {
                Err(PmbmError::Unsupported("measurement-driven birth model"))
            }
        }
    }
}

impl<T: RealField + Copy, const N: usize> Default for BirthModel<T, N> {
    fn default() -> Self {
        BirthModel::Static(GaussianMixture::new())
    }
}
