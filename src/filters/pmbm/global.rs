//! Global hypotheses
//!
//! A global hypothesis picks at most one frontier hypothesis per track. It
//! refers to tracks only through `(TrackId, SthId)` keys and owns no part of
//! any tree.

use alloc::collections::BTreeMap;
use core::fmt;

use nalgebra::RealField;

use crate::types::ids::{SthId, TrackId};
use crate::{PmbmError, Result};

/// One joint association with its log-weight.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalHypothesis<T: RealField> {
    log_weight: T,
    associations: BTreeMap<TrackId, SthId>,
}

impl<T: RealField + Copy> GlobalHypothesis<T> {
    /// Creates a global hypothesis from `(track, hypothesis)` pairs.
    ///
    /// Fails with [`PmbmError::DuplicateTrackInHypothesis`] if a track is
    /// listed twice.
    pub fn new<I>(log_weight: T, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (TrackId, SthId)>,
    {
        let mut associations = BTreeMap::new();
        for (track_id, sth_id) in pairs {
            if associations.insert(track_id, sth_id).is_some() {
                return Err(PmbmError::DuplicateTrackInHypothesis(track_id));
            }
        }
        Ok(Self {
            log_weight,
            associations,
        })
    }

    /// Log-weight of this hypothesis.
    #[inline]
    pub fn log_weight(&self) -> T {
        self.log_weight
    }

    #[inline]
    pub(crate) fn set_log_weight(&mut self, log_weight: T) {
        self.log_weight = log_weight;
    }

    /// The `(track, hypothesis)` pairs, ordered by track id.
    #[inline]
    pub fn associations(&self) -> impl Iterator<Item = (TrackId, SthId)> + '_ {
        self.associations.iter().map(|(t, s)| (*t, *s))
    }

    /// Hypothesis chosen for `track_id`, if the track takes part.
    #[inline]
    pub fn sth_for(&self, track_id: TrackId) -> Option<SthId> {
        self.associations.get(&track_id).copied()
    }

    /// Number of tracks taking part.
    #[inline]
    pub fn len(&self) -> usize {
        self.associations.len()
    }

    /// True if no track takes part.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.associations.is_empty()
    }
}

impl<T: RealField> fmt::Display for GlobalHypothesis<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "log_w={:.3} {{", self.log_weight)?;
        for (i, (track_id, sth_id)) in self.associations.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "({}, {})", track_id, sth_id)?;
        }
        write!(f, "}}")
    }
}
