//! Multi-Bernoulli mixture
//!
//! The aggregate that owns every track and the pool of global hypotheses.
//! It runs prediction, gating and update over all frontier hypotheses, hands
//! association costs to an external ranked-assignment solver, keeps the pool
//! normalised and bounded, and garbage-collects the branches and tracks no
//! surviving global hypothesis references.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;
use core::cmp::Ordering;
use core::fmt;

use nalgebra::RealField;
use num_traits::Float;

use super::assignment::{Candidate, HypothesisCosts, RankedAssignment, TrackCosts};
use super::bernoulli::{check_probability, Bernoulli};
use super::config::MbmConfig;
use super::global::GlobalHypothesis;
use super::hypothesis::{Association, SingleTargetHypothesis};
use super::track::{GrowthCounts, Track};
use crate::filters::density::DensityHandler;
use crate::models::{BirthModel, ObservationModel, TransitionModel};
use crate::types::ids::{IdCounter, SthId, TrackId};
use crate::types::spaces::Measurement;
use crate::utils::{normalize_log_weights, TrackEstimate};
use crate::{PmbmError, Result};

// ============================================================================
// Step results
// ============================================================================

/// Gate membership of every measurement for every frontier hypothesis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GatingResult {
    /// `gating_matrix[track][sth][j]` is true if measurement `j` is in that gate
    pub gating_matrix: BTreeMap<TrackId, BTreeMap<SthId, Vec<bool>>>,
    /// True for measurements inside at least one gate
    pub used_measurements: Vec<bool>,
}

impl GatingResult {
    /// True if measurement `idx` lies in the gate of `(track_id, sth_id)`.
    pub fn is_in_gate(&self, track_id: TrackId, sth_id: SthId, idx: usize) -> bool {
        self.gating_matrix
            .get(&track_id)
            .and_then(|per_sth| per_sth.get(&sth_id))
            .and_then(|row| row.get(idx))
            .copied()
            .unwrap_or(false)
    }

    /// Indices of measurements outside every gate.
    pub fn ungated_measurements(&self) -> impl Iterator<Item = usize> + '_ {
        self.used_measurements
            .iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(idx, _)| idx)
    }
}

/// Statistics from one update step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateStats {
    /// Tracks updated
    pub tracks: usize,
    /// Frontier hypotheses that received children
    pub parents: usize,
    /// Children created
    pub children_created: usize,
    /// Detection children skipped because of a singular innovation covariance
    pub detections_skipped: usize,
}

impl fmt::Display for UpdateStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tracks={}, parents={}, children={}, skipped={}",
            self.tracks, self.parents, self.children_created, self.detections_skipped
        )
    }
}

// ============================================================================
// Multi-Bernoulli Mixture
// ============================================================================

/// Tracks plus the pool of global hypotheses over them.
#[derive(Debug, Clone)]
pub struct MultiBernoulliMixture<T: RealField, const N: usize> {
    tracks: BTreeMap<TrackId, Track<T, N>>,
    global_hypotheses: Vec<GlobalHypothesis<T>>,
    track_ids: IdCounter,
}

impl<T: RealField + Float + Copy, const N: usize> MultiBernoulliMixture<T, N> {
    /// Creates an empty mixture.
    pub fn new() -> Self {
        Self {
            tracks: BTreeMap::new(),
            global_hypotheses: Vec::new(),
            track_ids: IdCounter::new(),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// All tracks, keyed by id.
    #[inline]
    pub fn tracks(&self) -> &BTreeMap<TrackId, Track<T, N>> {
        &self.tracks
    }

    /// Track with id `track_id`.
    #[inline]
    pub fn track(&self, track_id: TrackId) -> Option<&Track<T, N>> {
        self.tracks.get(&track_id)
    }

    /// The pool of global hypotheses.
    #[inline]
    pub fn global_hypotheses(&self) -> &[GlobalHypothesis<T>] {
        &self.global_hypotheses
    }

    /// Number of tracks.
    #[inline]
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Frontier hypothesis `(track_id, sth_id)`.
    pub fn hypothesis(&self, track_id: TrackId, sth_id: SthId) -> Option<&SingleTargetHypothesis<T, N>> {
        self.tracks.get(&track_id)?.hypothesis(sth_id)
    }

    /// Id of the child of `(track_id, parent)` generated from `association`.
    pub fn child_id_by_measurement(
        &self,
        track_id: TrackId,
        parent: SthId,
        association: Association,
    ) -> Result<SthId> {
        self.tracks
            .get(&track_id)
            .ok_or(PmbmError::UnknownTrack(track_id))?
            .child_id_by_measurement(parent, association)
    }

    // ------------------------------------------------------------------------
    // Track creation
    // ------------------------------------------------------------------------

    /// Inserts an existing track.
    ///
    /// Fails with [`PmbmError::DuplicateTrack`] if the id is taken. Ids the
    /// mixture allocates afterwards never collide with the inserted one.
    pub fn add_track(&mut self, track: Track<T, N>) -> Result<()> {
        let track_id = track.track_id();
        if self.tracks.contains_key(&track_id) {
            return Err(PmbmError::DuplicateTrack(track_id));
        }
        self.track_ids.reserve_through(track_id.0)?;
        self.tracks.insert(track_id, track);
        Ok(())
    }

    /// Creates a track rooted at `initial_sth` under a fresh id.
    pub fn create_track(&mut self, initial_sth: SingleTargetHypothesis<T, N>) -> Result<TrackId> {
        let track_id = self.track_ids.next_track_id()?;
        self.tracks.insert(track_id, Track::new(track_id, initial_sth));
        Ok(track_id)
    }

    /// Creates one track per birth component and adds it to every global
    /// hypothesis.
    ///
    /// With an empty pool a single hypothesis of log-weight zero holding the
    /// new tracks is created. On error the mixture is left unchanged.
    pub fn seed_from_birth(&mut self, birth: &BirthModel<T, N>) -> Result<Vec<TrackId>> {
        let intensity = birth.born_objects_intensity()?;

        let mut track_ids = self.track_ids.clone();
        let mut born = Vec::with_capacity(intensity.len());
        for component in intensity.iter() {
            let root = SingleTargetHypothesis::root(Bernoulli::from_birth_component(component));
            born.push(Track::new(track_ids.next_track_id()?, root));
        }

        let created: Vec<TrackId> = born.iter().map(Track::track_id).collect();
        if created.is_empty() {
            return Ok(created);
        }

        let roots = || created.iter().map(|&track_id| (track_id, SthId(0)));
        let pool = if self.global_hypotheses.is_empty() {
            alloc::vec![GlobalHypothesis::new(T::zero(), roots())?]
        } else {
            self.global_hypotheses
                .iter()
                .map(|gh| GlobalHypothesis::new(gh.log_weight(), gh.associations().chain(roots())))
                .collect::<Result<Vec<_>>>()?
        };

        self.track_ids = track_ids;
        self.tracks
            .extend(born.into_iter().map(|track| (track.track_id(), track)));
        self.global_hypotheses = pool;

        log::debug!("Seeded {} tracks from birth model", created.len());
        Ok(created)
    }

    // ------------------------------------------------------------------------
    // Step orchestration
    // ------------------------------------------------------------------------

    /// Predicts every frontier Bernoulli in place.
    pub fn predict<Motion, Density>(
        &mut self,
        motion: &Motion,
        survival_probability: T,
        density: &Density,
        dt: T,
    ) -> Result<()>
    where
        Motion: TransitionModel<T, N>,
        Density: DensityHandler<T, N>,
    {
        check_probability(survival_probability)?;

        for track in self.tracks.values_mut() {
            for sth in track.frontier_mut() {
                sth.bernoulli
                    .predict(motion, survival_probability, density, dt);
            }
        }
        Ok(())
    }

    /// Computes the ellipsoidal gate of every frontier hypothesis.
    pub fn gating<Sensor, Density, const M: usize>(
        &self,
        measurements: &[Measurement<T, M>],
        density: &Density,
        sensor: &Sensor,
        gate_size: T,
    ) -> Result<GatingResult>
    where
        Sensor: ObservationModel<T, N, M>,
        Density: DensityHandler<T, N>,
    {
        let mut result = GatingResult {
            gating_matrix: BTreeMap::new(),
            used_measurements: alloc::vec![false; measurements.len()],
        };

        for (&track_id, track) in &self.tracks {
            let per_sth = result.gating_matrix.entry(track_id).or_default();
            for (&sth_id, sth) in track.frontier() {
                let gate = density.ellipsoidal_gating(
                    &sth.bernoulli.state,
                    measurements,
                    sensor,
                    gate_size,
                )?;
                for (used, inside) in result.used_measurements.iter_mut().zip(&gate) {
                    *used |= *inside;
                }
                per_sth.insert(sth_id, gate);
            }
        }

        log::trace!(
            "Gating: {} of {} measurements inside at least one gate",
            result.used_measurements.iter().filter(|u| **u).count(),
            measurements.len()
        );
        Ok(result)
    }

    /// Grows one misdetection child and one detection child per measurement
    /// under every frontier hypothesis.
    ///
    /// The frontier itself is left in place; see
    /// [`advance_frontiers`](Self::advance_frontiers).
    pub fn update<Sensor, Density, const M: usize>(
        &mut self,
        detection_probability: T,
        measurements: &[Measurement<T, M>],
        sensor: &Sensor,
        density: &Density,
    ) -> Result<UpdateStats>
    where
        Sensor: ObservationModel<T, N, M>,
        Density: DensityHandler<T, N>,
    {
        check_probability(detection_probability)?;

        let mut stats = UpdateStats::default();
        let mut counts = GrowthCounts::default();

        for track in self.tracks.values_mut() {
            stats.tracks += 1;
            stats.parents += track.len();
            counts += track.grow(detection_probability, measurements, sensor, density)?;
        }

        stats.children_created = counts.created;
        stats.detections_skipped = counts.skipped;
        log::debug!("Created new hypotheses in MBM: {}", stats);
        Ok(stats)
    }

    /// Advances every track's frontier to the children of its current frontier.
    pub fn advance_frontiers(&mut self) {
        for track in self.tracks.values_mut() {
            track.advance_frontier();
        }
    }

    // ------------------------------------------------------------------------
    // Assignment
    // ------------------------------------------------------------------------

    /// Assignment input for every pooled global hypothesis.
    ///
    /// Candidates list the children of each referenced frontier hypothesis,
    /// misdetection first. Fails with [`PmbmError::DanglingReference`] if the
    /// pool references a missing hypothesis.
    pub fn association_costs(&self) -> Result<Vec<HypothesisCosts<T>>> {
        self.global_hypotheses
            .iter()
            .map(|gh| {
                let tracks = gh
                    .associations()
                    .map(|(track_id, sth_id)| {
                        let parent = self
                            .hypothesis(track_id, sth_id)
                            .ok_or(PmbmError::DanglingReference(track_id, sth_id))?;

                        let mut candidates: Vec<Candidate<T>> = parent
                            .children
                            .values()
                            .map(|child| Candidate {
                                sth_id: child.sth_id,
                                association: child.association,
                                log_likelihood: child.log_likelihood,
                                cost: child.cost.unwrap_or_else(T::zero),
                            })
                            .collect();
                        candidates.sort_by_key(|c| c.association);

                        Ok(TrackCosts {
                            track_id,
                            parent: sth_id,
                            candidates,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;

                Ok(HypothesisCosts {
                    log_weight: gh.log_weight(),
                    tracks,
                })
            })
            .collect()
    }

    /// Runs the external solver and installs the pool it returns.
    ///
    /// Every returned pair must name a child of the current frontier. On
    /// success the frontiers are advanced, the new pool replaces the old one
    /// and is normalised. On failure nothing changes.
    pub fn assign<Solver>(&mut self, solver: &mut Solver, num_measurements: usize) -> Result<()>
    where
        Solver: RankedAssignment<T>,
    {
        let costs = self.association_costs()?;
        let pool = solver.assign(&costs, num_measurements)?;

        for gh in &pool {
            for (track_id, sth_id) in gh.associations() {
                let is_child = self.tracks.get(&track_id).is_some_and(|track| {
                    track
                        .frontier()
                        .values()
                        .any(|parent| parent.children.contains_key(&sth_id))
                });
                if !is_child {
                    return Err(PmbmError::DanglingReference(track_id, sth_id));
                }
            }
        }

        self.advance_frontiers();
        self.global_hypotheses = pool;
        self.normalize_global_hypotheses_weights();

        log::debug!(
            "Assignment produced {} global hypotheses",
            self.global_hypotheses.len()
        );
        Ok(())
    }

    /// Replaces the pool after checking every reference.
    pub fn set_global_hypotheses(&mut self, pool: Vec<GlobalHypothesis<T>>) -> Result<()> {
        for gh in &pool {
            self.check_references(gh)?;
        }
        self.global_hypotheses = pool;
        Ok(())
    }

    /// Checks that every pooled pair names an existing frontier hypothesis.
    pub fn validate_global_hypotheses(&self) -> Result<()> {
        self.global_hypotheses
            .iter()
            .try_for_each(|gh| self.check_references(gh))
    }

    fn check_references(&self, gh: &GlobalHypothesis<T>) -> Result<()> {
        for (track_id, sth_id) in gh.associations() {
            if self.hypothesis(track_id, sth_id).is_none() {
                return Err(PmbmError::DanglingReference(track_id, sth_id));
            }
        }
        Ok(())
    }

    /// Hypothesis ids referenced by the pool, per track.
    pub fn used_associations(&self) -> BTreeMap<TrackId, BTreeSet<SthId>> {
        let mut used: BTreeMap<TrackId, BTreeSet<SthId>> = BTreeMap::new();
        for gh in &self.global_hypotheses {
            for (track_id, sth_id) in gh.associations() {
                used.entry(track_id).or_default().insert(sth_id);
            }
        }
        used
    }

    // ------------------------------------------------------------------------
    // Pool maintenance
    // ------------------------------------------------------------------------

    /// Keeps hypotheses whose log-weight exceeds `log_threshold`, then
    /// renormalises.
    pub fn prune_global_hypotheses(&mut self, log_threshold: T) {
        let before = self.global_hypotheses.len();
        self.global_hypotheses
            .retain(|gh| gh.log_weight() > log_threshold);
        self.normalize_global_hypotheses_weights();

        log::trace!(
            "Pruned global hypotheses: {} -> {}",
            before,
            self.global_hypotheses.len()
        );
    }

    /// Keeps the `max_count` highest-weight hypotheses, then renormalises.
    ///
    /// Equal weights keep their pool order.
    pub fn cap_global_hypothesis(&mut self, max_count: usize) {
        if self.global_hypotheses.len() <= max_count {
            return;
        }
        let before = self.global_hypotheses.len();

        self.global_hypotheses.sort_by(|a, b| {
            b.log_weight()
                .partial_cmp(&a.log_weight())
                .unwrap_or(Ordering::Equal)
        });
        self.global_hypotheses.truncate(max_count);
        self.normalize_global_hypotheses_weights();

        log::trace!("Capped global hypotheses: {} -> {}", before, max_count);
    }

    /// Normalises pool log-weights so their linear sum is one.
    pub fn normalize_global_hypotheses_weights(&mut self) {
        if self.global_hypotheses.is_empty() {
            return;
        }
        let mut log_weights: Vec<T> = self
            .global_hypotheses
            .iter()
            .map(|gh| gh.log_weight())
            .collect();
        normalize_log_weights(&mut log_weights);

        for (gh, w) in self.global_hypotheses.iter_mut().zip(log_weights) {
            gh.set_log_weight(w);
        }
    }

    /// Trims every frontier to the hypotheses the pool references.
    ///
    /// Fails with [`PmbmError::DanglingReference`], leaving the trees
    /// untouched, if the pool references a missing hypothesis. Unreferenced
    /// tracks are left with an empty frontier.
    pub fn prune_tree(&mut self) -> Result<()> {
        self.validate_global_hypotheses()?;
        self.remove_unused_bernoullies();
        Ok(())
    }

    /// Drops tracks the pool does not reference.
    pub fn remove_unused_tracks(&mut self) {
        let used = self.used_associations();
        let before = self.tracks.len();
        self.tracks.retain(|track_id, _| used.contains_key(track_id));

        if self.tracks.len() < before {
            log::trace!("Removed {} unused tracks", before - self.tracks.len());
        }
    }

    /// Drops frontier hypotheses the pool does not reference, track by track.
    pub fn remove_unused_bernoullies(&mut self) {
        let used = self.used_associations();
        let empty = BTreeSet::new();
        for (track_id, track) in self.tracks.iter_mut() {
            track.retain_hypotheses(used.get(track_id).unwrap_or(&empty));
        }
    }

    /// Pruning, capping and garbage collection in one call.
    pub fn maintain(&mut self, config: &MbmConfig<T>) -> Result<()> {
        self.prune_global_hypotheses(config.prune_log_threshold);
        self.cap_global_hypothesis(config.max_global_hypotheses);
        self.prune_tree()?;
        self.remove_unused_tracks();
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Read-out
    // ------------------------------------------------------------------------

    /// Targets of the most probable global hypothesis whose existence
    /// probability exceeds `existence_threshold`.
    ///
    /// Returns `Ok(None)` for an empty pool.
    pub fn estimator(&self, existence_threshold: T) -> Result<Option<Vec<TrackEstimate<T, N>>>> {
        let Some(best) = self.most_probable_hypothesis() else {
            log::info!("Pool of global hypotheses is empty");
            return Ok(None);
        };

        let mut estimates = Vec::new();
        for (track_id, sth_id) in best.associations() {
            let sth = self
                .hypothesis(track_id, sth_id)
                .ok_or(PmbmError::DanglingReference(track_id, sth_id))?;

            if sth.bernoulli.existence_probability > existence_threshold {
                let estimate = TrackEstimate::from_hypothesis(track_id, sth);
                log::debug!("{}", estimate);
                estimates.push(estimate);
            }
        }
        Ok(Some(estimates))
    }

    /// The pooled hypothesis with the highest log-weight; the first on ties.
    pub fn most_probable_hypothesis(&self) -> Option<&GlobalHypothesis<T>> {
        self.global_hypotheses.iter().fold(None, |best, gh| match best {
            Some(b) if b.log_weight() >= gh.log_weight() => Some(b),
            _ => Some(gh),
        })
    }
}

impl<T: RealField + Float + Copy, const N: usize> Default for MultiBernoulliMixture<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RealField, const N: usize> fmt::Display for MultiBernoulliMixture<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MultiBernoulliMixture num of tracks = {}, num global hypotheses = {}",
            self.tracks.len(),
            self.global_hypotheses.len()
        )
    }
}
