//! Multi-Bernoulli mixture of a PMBM tracker
//!
//! Track-oriented hypothesis management for the Poisson Multi-Bernoulli
//! Mixture filter.
//!
//! # Overview
//!
//! Every detected target is a [`Track`]: a tree of
//! [`SingleTargetHypothesis`] nodes, each holding a [`Bernoulli`] belief.
//! Only the newest generation (the frontier) is stored. A
//! [`GlobalHypothesis`] picks one frontier node per track and carries a
//! log-weight; the [`MultiBernoulliMixture`] owns all tracks and the pool of
//! global hypotheses.
//!
//! | Structure | Owns | Refers to |
//! |-----------|------|-----------|
//! | `MultiBernoulliMixture` | tracks, pool | - |
//! | `Track` | frontier nodes | - |
//! | `SingleTargetHypothesis` | children | - |
//! | `GlobalHypothesis` | - | `(TrackId, SthId)` keys |
//!
//! # Per-step flow
//!
//! ```text
//! predict -> gating -> update -> association_costs -> solver
//!         -> advance_frontiers + install pool (assign)
//!         -> prune / cap / normalize -> prune_tree / remove_unused_tracks
//!         -> estimator
//! ```
//!
//! # Example
//!
//! ```
//! use pmbm::prelude::*;
//!
//! let sensor = PositionSensor1D::new(1.0);
//! let motion = RandomWalk1D::new(0.1);
//! let density = GaussianDensity;
//!
//! let mut birth = BirthModel::default();
//! birth.add_birth_location(0.9, StateVector::from_array([0.0]), StateCovariance::identity());
//!
//! let mut mbm = MultiBernoulliMixture::<f64, 1>::new();
//! mbm.seed_from_birth(&birth).unwrap();
//!
//! mbm.predict(&motion, 0.99, &density, 1.0).unwrap();
//! let z = [Measurement::from_array([0.3])];
//! mbm.update(0.9, &z, &sensor, &density).unwrap();
//!
//! // Solver that keeps every candidate of the single track
//! let mut solver = |costs: &[HypothesisCosts<f64>], _: usize| -> Result<Vec<GlobalHypothesis<f64>>> {
//!     let tc = &costs[0].tracks[0];
//!     tc.candidates
//!         .iter()
//!         .map(|c| GlobalHypothesis::new(-c.cost, [(tc.track_id, c.sth_id)]))
//!         .collect()
//! };
//! mbm.assign(&mut solver, z.len()).unwrap();
//! mbm.maintain(&MbmConfig::default_config()).unwrap();
//!
//! let estimates = mbm.estimator(0.5).unwrap().unwrap();
//! assert_eq!(estimates.len(), 1);
//! ```

mod assignment;
mod bernoulli;
mod config;
mod global;
mod hypothesis;
mod mbm;
mod track;

pub use assignment::*;
pub use bernoulli::Bernoulli;
pub use config::*;
pub use global::*;
pub use hypothesis::*;
pub use mbm::*;
pub use track::*;
