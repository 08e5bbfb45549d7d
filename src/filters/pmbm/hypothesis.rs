//! Single-target hypotheses
//!
//! One node of a track's hypothesis tree: a Bernoulli belief together with
//! the log-likelihood of the association history that produced it.

use alloc::collections::BTreeMap;
use core::fmt;

use nalgebra::RealField;
use num_traits::Float;

use super::bernoulli::Bernoulli;
use crate::filters::density::DensityHandler;
use crate::models::ObservationModel;
use crate::types::ids::SthId;
use crate::types::spaces::Measurement;
use crate::Result;

/// Which event a hypothesis was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Association {
    /// The target produced no measurement
    Missed,
    /// The target produced the measurement at this index
    Detected(usize),
}

impl Association {
    /// Measurement index, `None` for a misdetection.
    #[inline]
    pub fn measurement_index(&self) -> Option<usize> {
        match self {
            Association::Missed => None,
            Association::Detected(idx) => Some(*idx),
        }
    }
}

impl fmt::Display for Association {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Association::Missed => write!(f, "missed"),
            Association::Detected(idx) => write!(f, "z{}", idx),
        }
    }
}

/// A node of a hypothesis tree.
///
/// Children are keyed by their own id. A node that has been updated holds
/// exactly one [`Association::Missed`] child and one
/// [`Association::Detected`] child per generated detection.
#[derive(Debug, Clone)]
pub struct SingleTargetHypothesis<T: RealField, const N: usize> {
    /// Belief about the target
    pub bernoulli: Bernoulli<T, N>,
    /// Log-likelihood of the association that created this node
    pub log_likelihood: T,
    /// Negative log-likelihood ratio against the sibling misdetection.
    /// Only detection hypotheses carry a cost.
    pub cost: Option<T>,
    /// Event this node was generated from
    pub association: Association,
    /// Id of this node within its track
    pub sth_id: SthId,
    /// Children generated by the last update
    pub children: BTreeMap<SthId, SingleTargetHypothesis<T, N>>,
}

impl<T: RealField + Float + Copy, const N: usize> SingleTargetHypothesis<T, N> {
    /// Creates a childless hypothesis.
    pub fn new(
        bernoulli: Bernoulli<T, N>,
        log_likelihood: T,
        cost: Option<T>,
        association: Association,
        sth_id: SthId,
    ) -> Self {
        Self {
            bernoulli,
            log_likelihood,
            cost,
            association,
            sth_id,
            children: BTreeMap::new(),
        }
    }

    /// Root hypothesis of a newly born track.
    pub fn root(bernoulli: Bernoulli<T, N>) -> Self {
        Self::new(bernoulli, T::zero(), None, Association::Missed, SthId(0))
    }

    /// Child for "the target was not detected".
    pub fn create_missdetection_hypothesis(&self, detection_probability: T, sth_id: SthId) -> Self {
        Self::new(
            self.bernoulli.undetected_update_state(detection_probability),
            self.bernoulli.undetected_update_loglikelihood(detection_probability),
            None,
            Association::Missed,
            sth_id,
        )
    }

    /// Child for "the target produced `measurement`".
    ///
    /// The cost is measured against this node's misdetection child when it
    /// already exists, otherwise against a freshly computed misdetection
    /// log-likelihood.
    pub fn create_detection_hypothesis<Sensor, Density, const M: usize>(
        &self,
        measurement_index: usize,
        measurement: &Measurement<T, M>,
        detection_probability: T,
        sensor: &Sensor,
        density: &Density,
        sth_id: SthId,
    ) -> Result<Self>
    where
        Sensor: ObservationModel<T, N, M>,
        Density: DensityHandler<T, N>,
    {
        let bernoulli = self
            .bernoulli
            .detected_update_state(measurement, sensor, density)?;
        let log_likelihood = self.bernoulli.detected_update_loglikelihood(
            measurement,
            sensor,
            detection_probability,
            density,
        )?;

        let missdetection_ll = match self.missdetection_child() {
            Some(child) => child.log_likelihood,
            None => self
                .bernoulli
                .undetected_update_loglikelihood(detection_probability),
        };

        Ok(Self::new(
            bernoulli,
            log_likelihood,
            Some(-(log_likelihood - missdetection_ll)),
            Association::Detected(measurement_index),
            sth_id,
        ))
    }

    /// The child generated from `association`, if any.
    pub fn child_by_association(&self, association: Association) -> Option<&Self> {
        self.children
            .values()
            .find(|child| child.association == association)
    }

    /// The misdetection child, if the node has been updated.
    #[inline]
    pub fn missdetection_child(&self) -> Option<&Self> {
        self.child_by_association(Association::Missed)
    }

    /// Attaches a child under its own id.
    #[inline]
    pub fn add_child(&mut self, child: Self) {
        self.children.insert(child.sth_id, child);
    }

    /// True if the node has no children.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

impl<T: RealField + Float + Copy, const N: usize> fmt::Display for SingleTargetHypothesis<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} log_likelihood={:.2} association={}",
            self.sth_id, self.log_likelihood, self.association
        )
    }
}
