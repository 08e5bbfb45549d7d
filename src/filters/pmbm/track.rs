//! Tracks: per-target hypothesis trees
//!
//! A track owns the frontier of one target's hypothesis tree. Updating grows
//! one generation of children under every frontier node; advancing replaces
//! the frontier with those children, so only the newest generation is kept.

use alloc::collections::{BTreeMap, BTreeSet};
use core::fmt;

use nalgebra::RealField;
use num_traits::Float;

use super::hypothesis::{Association, SingleTargetHypothesis};
use crate::filters::density::DensityHandler;
use crate::models::ObservationModel;
use crate::types::ids::{IdCounter, SthId, TrackId};
use crate::types::spaces::Measurement;
use crate::{PmbmError, Result};

/// Counts from growing one generation of children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthCounts {
    /// Children attached to frontier nodes
    pub created: usize,
    /// Detection children dropped because the innovation covariance was singular
    pub skipped: usize,
}

impl core::ops::AddAssign for GrowthCounts {
    fn add_assign(&mut self, rhs: Self) {
        self.created += rhs.created;
        self.skipped += rhs.skipped;
    }
}

/// One target's hypothesis tree.
#[derive(Debug, Clone)]
pub struct Track<T: RealField, const N: usize> {
    track_id: TrackId,
    sth_ids: IdCounter,
    frontier: BTreeMap<SthId, SingleTargetHypothesis<T, N>>,
}

impl<T: RealField + Float + Copy, const N: usize> Track<T, N> {
    /// Creates a track whose frontier is `{0: initial_sth}`.
    ///
    /// The initial hypothesis is re-keyed to id 0 and any children it carries
    /// are dropped; later ids continue from 1.
    pub fn new(track_id: TrackId, mut initial_sth: SingleTargetHypothesis<T, N>) -> Self {
        initial_sth.sth_id = SthId(0);
        initial_sth.children.clear();
        let mut frontier = BTreeMap::new();
        frontier.insert(SthId(0), initial_sth);
        Self {
            track_id,
            sth_ids: IdCounter::starting_at(1),
            frontier,
        }
    }

    /// Id of this track.
    #[inline]
    pub fn track_id(&self) -> TrackId {
        self.track_id
    }

    /// Current frontier of the tree.
    #[inline]
    pub fn frontier(&self) -> &BTreeMap<SthId, SingleTargetHypothesis<T, N>> {
        &self.frontier
    }

    /// Frontier hypothesis with id `sth_id`.
    #[inline]
    pub fn hypothesis(&self, sth_id: SthId) -> Option<&SingleTargetHypothesis<T, N>> {
        self.frontier.get(&sth_id)
    }

    /// Number of frontier hypotheses.
    #[inline]
    pub fn len(&self) -> usize {
        self.frontier.len()
    }

    /// True if the frontier is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frontier.is_empty()
    }

    pub(crate) fn frontier_mut(
        &mut self,
    ) -> impl Iterator<Item = &mut SingleTargetHypothesis<T, N>> {
        self.frontier.values_mut()
    }

    /// Replaces every frontier node's children with one misdetection child
    /// and one detection child per measurement.
    ///
    /// The misdetection child is built first so detection costs are measured
    /// against it. A measurement whose innovation covariance is singular
    /// produces no child and is counted as skipped.
    pub fn grow<Sensor, Density, const M: usize>(
        &mut self,
        detection_probability: T,
        measurements: &[Measurement<T, M>],
        sensor: &Sensor,
        density: &Density,
    ) -> Result<GrowthCounts>
    where
        Sensor: ObservationModel<T, N, M>,
        Density: DensityHandler<T, N>,
    {
        let mut counts = GrowthCounts::default();

        for sth in self.frontier.values_mut() {
            sth.children.clear();

            let missed_id = self.sth_ids.next_sth_id()?;
            let missed = sth.create_missdetection_hypothesis(detection_probability, missed_id);
            sth.add_child(missed);
            counts.created += 1;

            for (idx, z) in measurements.iter().enumerate() {
                let child_id = self.sth_ids.next_sth_id()?;
                match sth.create_detection_hypothesis(
                    idx,
                    z,
                    detection_probability,
                    sensor,
                    density,
                    child_id,
                ) {
                    Ok(child) => {
                        sth.add_child(child);
                        counts.created += 1;
                    }
                    Err(PmbmError::SingularMatrix) => {
                        log::warn!(
                            "Skipping detection of z{} for ({}, {}): singular innovation covariance",
                            idx,
                            self.track_id,
                            sth.sth_id
                        );
                        counts.skipped += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
        }

        Ok(counts)
    }

    /// Replaces the frontier with the children of every frontier node.
    ///
    /// Parents are discarded. A frontier node without children contributes
    /// nothing, so advancing a track that was never updated empties it.
    pub fn advance_frontier(&mut self) {
        let parents = core::mem::take(&mut self.frontier);
        for (sth_id, parent) in parents {
            if parent.is_leaf() {
                log::trace!("Dropping leaf ({}, {}) without children", self.track_id, sth_id);
                continue;
            }
            self.frontier.extend(parent.children);
        }
    }

    /// Child of frontier node `parent` generated from `association`.
    pub fn child_by_measurement(
        &self,
        parent: SthId,
        association: Association,
    ) -> Result<&SingleTargetHypothesis<T, N>> {
        let node = self
            .frontier
            .get(&parent)
            .ok_or(PmbmError::UnknownHypothesis(self.track_id, parent))?;
        node.child_by_association(association)
            .ok_or(PmbmError::ChildNotFound {
                parent,
                measurement: association.measurement_index(),
            })
    }

    /// Id of the child of `parent` generated from `association`.
    pub fn child_id_by_measurement(&self, parent: SthId, association: Association) -> Result<SthId> {
        self.child_by_measurement(parent, association)
            .map(|child| child.sth_id)
    }

    /// Keeps only the frontier hypotheses in `keep`.
    pub(crate) fn retain_hypotheses(&mut self, keep: &BTreeSet<SthId>) {
        self.frontier.retain(|sth_id, _| keep.contains(sth_id));
    }
}

impl<T: RealField, const N: usize> fmt::Display for Track<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Track id = {} number of sth = {}",
            self.track_id,
            self.frontier.len()
        )
    }
}
