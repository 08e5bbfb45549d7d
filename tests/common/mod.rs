//! Common test helpers for multi-Bernoulli mixture integration tests

#![allow(dead_code)]

use std::collections::BTreeSet;

use pmbm::filters::pmbm::{
    Bernoulli, GlobalHypothesis, HypothesisCosts, RankedAssignment, SingleTargetHypothesis,
};
use pmbm::models::{BirthModel, ConstantVelocity2D, PositionSensor2D};
use pmbm::types::gaussian::GaussianState;
use pmbm::types::ids::{SthId, TrackId};
use pmbm::types::spaces::{Measurement, StateCovariance, StateVector};
use pmbm::Result;

/// Creates a measurement at given position
pub fn make_measurement(x: f64, y: f64) -> Measurement<f64, 2> {
    Measurement::from_array([x, y])
}

/// Creates standard 2D test models
pub fn make_test_models() -> (ConstantVelocity2D<f64>, PositionSensor2D<f64>) {
    (ConstantVelocity2D::new(0.1), PositionSensor2D::new(1.0))
}

/// Creates a static birth model with one component per location
pub fn make_birth_model(locations: &[(f64, f64)], weight: f64) -> BirthModel<f64, 4> {
    let mut birth = BirthModel::default();
    for &(x, y) in locations {
        birth.add_birth_location(
            weight,
            StateVector::from_array([x, y, 0.0, 0.0]),
            StateCovariance::from_matrix(nalgebra::matrix![
                4.0, 0.0, 0.0, 0.0;
                0.0, 4.0, 0.0, 0.0;
                0.0, 0.0, 1.0, 0.0;
                0.0, 0.0, 0.0, 1.0
            ]),
        );
    }
    birth
}

/// Creates a 1D root hypothesis
pub fn make_root_1d(r: f64, x: f64) -> SingleTargetHypothesis<f64, 1> {
    let state = GaussianState::with_unit_weight(
        StateVector::from_array([x]),
        StateCovariance::identity(),
    );
    SingleTargetHypothesis::root(Bernoulli::new(r, state).unwrap())
}

/// Exhaustive ranked assignment for small problems.
///
/// Every track picks one candidate, no measurement is used twice, and each
/// measurement left unassigned is explained as clutter with density
/// `exp(log_clutter)`. The `k` best joint assignments over all parent
/// hypotheses are returned.
pub struct BruteForceSolver {
    pub k: usize,
    pub log_clutter: f64,
}

impl BruteForceSolver {
    pub fn new(k: usize, log_clutter: f64) -> Self {
        Self { k, log_clutter }
    }

    fn enumerate(
        &self,
        costs: &HypothesisCosts<f64>,
        track_idx: usize,
        used: &mut BTreeSet<usize>,
        chosen: &mut Vec<(TrackId, SthId)>,
        log_weight: f64,
        num_measurements: usize,
        out: &mut Vec<(f64, Vec<(TrackId, SthId)>)>,
    ) {
        if track_idx == costs.tracks.len() {
            let clutter = (num_measurements - used.len()) as f64 * self.log_clutter;
            out.push((log_weight + clutter, chosen.clone()));
            return;
        }

        let track = &costs.tracks[track_idx];
        for candidate in &track.candidates {
            let idx = candidate.association.measurement_index();
            if let Some(j) = idx {
                if used.contains(&j) {
                    continue;
                }
                used.insert(j);
            }
            chosen.push((track.track_id, candidate.sth_id));

            self.enumerate(
                costs,
                track_idx + 1,
                used,
                chosen,
                log_weight + candidate.log_likelihood,
                num_measurements,
                out,
            );

            chosen.pop();
            if let Some(j) = idx {
                used.remove(&j);
            }
        }
    }
}

impl RankedAssignment<f64> for BruteForceSolver {
    fn assign(
        &mut self,
        costs: &[HypothesisCosts<f64>],
        num_measurements: usize,
    ) -> Result<Vec<GlobalHypothesis<f64>>> {
        let mut joint = Vec::new();
        for hypothesis_costs in costs {
            self.enumerate(
                hypothesis_costs,
                0,
                &mut BTreeSet::new(),
                &mut Vec::new(),
                hypothesis_costs.log_weight,
                num_measurements,
                &mut joint,
            );
        }

        joint.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap());
        joint.truncate(self.k);

        joint
            .into_iter()
            .map(|(log_weight, pairs)| GlobalHypothesis::new(log_weight, pairs))
            .collect()
    }
}

/// Snapshot of every track id and its frontier ids
pub fn frontier_snapshot<const N: usize>(
    mbm: &pmbm::filters::pmbm::MultiBernoulliMixture<f64, N>,
) -> Vec<(TrackId, Vec<SthId>)> {
    mbm.tracks()
        .iter()
        .map(|(id, track)| (*id, track.frontier().keys().copied().collect()))
        .collect()
}
