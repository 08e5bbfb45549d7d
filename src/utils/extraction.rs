//! Track state read-out
//!
//! The estimate the mixture reports for one confidently existing target.

use nalgebra::RealField;

use crate::filters::pmbm::SingleTargetHypothesis;
use crate::types::ids::{SthId, TrackId};
use crate::types::spaces::{StateCovariance, StateVector};

/// A target state estimate with associated uncertainty.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEstimate<T: RealField, const N: usize> {
    /// Track the estimate belongs to
    pub track_id: TrackId,
    /// Hypothesis the estimate was read from
    pub sth_id: SthId,
    /// Existence probability of that hypothesis
    pub existence_probability: T,
    /// Estimated state vector
    pub state: StateVector<T, N>,
    /// State covariance (uncertainty)
    pub covariance: StateCovariance<T, N>,
}

impl<T: RealField + Copy, const N: usize> TrackEstimate<T, N> {
    /// Reads the estimate held by one hypothesis.
    pub fn from_hypothesis(track_id: TrackId, sth: &SingleTargetHypothesis<T, N>) -> Self {
        Self {
            track_id,
            sth_id: sth.sth_id,
            existence_probability: sth.bernoulli.existence_probability,
            state: sth.bernoulli.state.mean,
            covariance: sth.bernoulli.state.covariance,
        }
    }
}

impl<T: RealField, const N: usize> core::fmt::Display for TrackEstimate<T, N> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "r = {:.3}, track id = {}, sth id = {}, state = {:?}",
            self.existence_probability,
            self.track_id,
            self.sth_id,
            self.state.as_slice()
        )
    }
}
