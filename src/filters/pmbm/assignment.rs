//! Ranked-assignment seam
//!
//! The mixture does not solve the assignment problem itself. It hands the
//! solver, for every pooled global hypothesis, the children each referenced
//! frontier node generated together with their costs, and takes back a new
//! pool of global hypotheses over those children.

use alloc::vec::Vec;

use nalgebra::RealField;

use super::global::GlobalHypothesis;
use super::hypothesis::Association;
use crate::types::ids::{SthId, TrackId};
use crate::Result;

/// One child a track can move to.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<T: RealField> {
    /// Id of the child hypothesis
    pub sth_id: SthId,
    /// Event the child stands for
    pub association: Association,
    /// Log-likelihood of the child
    pub log_likelihood: T,
    /// Assignment cost; zero for the misdetection child
    pub cost: T,
}

/// Candidates for one track under one global hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackCosts<T: RealField> {
    /// Track the candidates belong to
    pub track_id: TrackId,
    /// Frontier node the candidates were generated from
    pub parent: SthId,
    /// Misdetection candidate first, then detections by measurement index
    pub candidates: Vec<Candidate<T>>,
}

impl<T: RealField + Copy> TrackCosts<T> {
    /// The misdetection candidate.
    pub fn missed(&self) -> Option<&Candidate<T>> {
        self.candidates
            .iter()
            .find(|c| c.association == Association::Missed)
    }

    /// The candidate for measurement `idx`.
    pub fn detected(&self, idx: usize) -> Option<&Candidate<T>> {
        self.candidates
            .iter()
            .find(|c| c.association == Association::Detected(idx))
    }
}

/// Assignment input derived from one pooled global hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub struct HypothesisCosts<T: RealField> {
    /// Log-weight of the global hypothesis
    pub log_weight: T,
    /// One entry per track the hypothesis references
    pub tracks: Vec<TrackCosts<T>>,
}

/// A ranked (k-best) assignment solver.
///
/// Returned hypotheses must reference child ids taken from the candidates;
/// the mixture validates every reference after advancing its frontiers.
pub trait RankedAssignment<T: RealField> {
    /// Produces the next pool of global hypotheses.
    fn assign(
        &mut self,
        costs: &[HypothesisCosts<T>],
        num_measurements: usize,
    ) -> Result<Vec<GlobalHypothesis<T>>>;
}

impl<T, F> RankedAssignment<T> for F
where
    T: RealField,
    F: FnMut(&[HypothesisCosts<T>], usize) -> Result<Vec<GlobalHypothesis<T>>>,
{
    fn assign(
        &mut self,
        costs: &[HypothesisCosts<T>],
        num_measurements: usize,
    ) -> Result<Vec<GlobalHypothesis<T>>> {
        self(costs, num_measurements)
    }
}
