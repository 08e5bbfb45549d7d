//! PMBM: hypothesis management for Poisson Multi-Bernoulli Mixture tracking
//!
//! Maintains the Multi-Bernoulli Mixture part of a PMBM multi-object tracker:
//! per-target trees of single-target hypotheses, the pool of global
//! hypotheses that selects one leaf per track, pool pruning and capping, and
//! garbage collection of branches and tracks no surviving hypothesis uses.
//!
//! # Features
//!
//! - **Type Safety**: State, measurement and innovation spaces are distinct types
//! - **Owned Trees**: Each track owns its hypothesis tree; global hypotheses
//!   refer to it only through `(TrackId, SthId)` keys
//! - **no_std Support**: Works with `alloc` only (disable the `std` feature)
//!
//! # Per-step flow
//!
//! ```text
//! predict -> gating -> update -> assign (external solver) -> advance frontiers
//!         -> prune / cap / normalize -> prune_tree / remove_unused_tracks -> estimator
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod filters;
pub mod models;
pub mod types;
pub mod utils;

pub mod prelude {
    pub use crate::filters::density::*;
    pub use crate::filters::pmbm::*;
    pub use crate::models::*;
    pub use crate::types::gaussian::*;
    pub use crate::types::ids::*;
    pub use crate::types::spaces::*;
    pub use crate::types::transforms::*;
    pub use crate::utils::*;
    pub use crate::{PmbmError, Result};
}

use types::ids::{SthId, TrackId};

/// Error types for the library
#[derive(Debug, Clone, PartialEq)]
pub enum PmbmError {
    /// Matrix is singular or not positive definite
    SingularMatrix,
    /// A probability argument lies outside [0, 1]
    InvalidProbability,
    /// Measurement data does not have the expected dimension
    MalformedMeasurement {
        /// Expected number of values per observation
        expected: usize,
        /// Number of values received
        actual: usize,
    },
    /// A track with this id is already present in the mixture
    DuplicateTrack(TrackId),
    /// A global hypothesis lists the same track twice
    DuplicateTrackInHypothesis(TrackId),
    /// No child was generated for this association
    ChildNotFound {
        /// Parent hypothesis
        parent: SthId,
        /// Measurement index (`None` for the misdetection child)
        measurement: Option<usize>,
    },
    /// The hypothesis id is not in the track frontier
    UnknownHypothesis(TrackId, SthId),
    /// The track id is not in the mixture
    UnknownTrack(TrackId),
    /// A global hypothesis references a (track, hypothesis) pair that does not exist
    DanglingReference(TrackId, SthId),
    /// The id counter reached its maximum value
    IdsExhausted,
    /// Requested functionality is not supported
    Unsupported(&'static str),
}

#[cfg(feature = "std")]
impl std::error::Error for PmbmError {}

impl ::core::fmt::Display for PmbmError {
    fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
        match self {
            PmbmError::SingularMatrix => write!(f, "Matrix is singular"),
            PmbmError::InvalidProbability => write!(f, "Probability must be in [0, 1]"),
            PmbmError::MalformedMeasurement { expected, actual } => write!(
                f,
                "Malformed measurement: expected {} values per observation, got {}",
                expected, actual
            ),
            PmbmError::DuplicateTrack(id) => write!(f, "Track {} already exists", id),
            PmbmError::DuplicateTrackInHypothesis(id) => {
                write!(f, "Track {} appears twice in one global hypothesis", id)
            }
            PmbmError::ChildNotFound {
                parent,
                measurement: Some(idx),
            } => write!(f, "Hypothesis {} has no child for measurement {}", parent, idx),
            PmbmError::ChildNotFound {
                parent,
                measurement: None,
            } => write!(f, "Hypothesis {} has no misdetection child", parent),
            PmbmError::UnknownHypothesis(track, sth) => {
                write!(f, "Track {} has no hypothesis {}", track, sth)
            }
            PmbmError::UnknownTrack(id) => write!(f, "Unknown track {}", id),
            PmbmError::DanglingReference(track, sth) => write!(
                f,
                "Global hypothesis references missing hypothesis ({}, {})",
                track, sth
            ),
            PmbmError::IdsExhausted => write!(f, "Id counter exhausted"),
            PmbmError::Unsupported(what) => write!(f, "Not yet supported: {}", what),
        }
    }
}

pub type Result<T> = ::core::result::Result<T, PmbmError>;
