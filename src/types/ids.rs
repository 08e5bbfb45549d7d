//! Track and hypothesis identifiers
//!
//! Track ids are unique within one [`MultiBernoulliMixture`]; hypothesis ids
//! are unique within one [`Track`] and carry no meaning across tracks. Both
//! come from an [`IdCounter`] owned by the structure that scopes them, so two
//! mixtures never share id state.
//!
//! [`MultiBernoulliMixture`]: crate::filters::pmbm::MultiBernoulliMixture
//! [`Track`]: crate::filters::pmbm::Track

use crate::{PmbmError, Result};

/// Identifies a track within a mixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u64);

/// Identifies a single-target hypothesis within its track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SthId(pub u64);

impl core::fmt::Display for TrackId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "T{}", self.0)
    }
}

impl core::fmt::Display for SthId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "H{}", self.0)
    }
}

// ============================================================================
// Id Counter
// ============================================================================

/// Monotonically increasing id source.
///
/// Never wraps and never recycles ids.
#[derive(Debug, Clone, Default)]
pub struct IdCounter {
    next: u64,
}

impl IdCounter {
    /// Creates a counter starting at zero.
    #[inline]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Creates a counter whose first id is `first`.
    #[inline]
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Returns the id the next call to [`next_raw`](Self::next_raw) will hand out.
    #[inline]
    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Hands out the next raw id.
    #[inline]
    pub fn next_raw(&mut self) -> Result<u64> {
        let id = self.next;
        self.next = self.next.checked_add(1).ok_or(PmbmError::IdsExhausted)?;
        Ok(id)
    }

    /// Hands out the next track id.
    #[inline]
    pub fn next_track_id(&mut self) -> Result<TrackId> {
        self.next_raw().map(TrackId)
    }

    /// Hands out the next hypothesis id.
    #[inline]
    pub fn next_sth_id(&mut self) -> Result<SthId> {
        self.next_raw().map(SthId)
    }

    /// Moves the counter past `id` so it is never handed out again.
    #[inline]
    pub fn reserve_through(&mut self, id: u64) -> Result<()> {
        if id >= self.next {
            self.next = id.checked_add(1).ok_or(PmbmError::IdsExhausted)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_is_monotonic() {
        let mut ids = IdCounter::new();

        let a = ids.next_track_id().unwrap();
        let b = ids.next_track_id().unwrap();

        assert_eq!(a, TrackId(0));
        assert_eq!(b, TrackId(1));
        assert_eq!(ids.peek(), 2);
    }

    #[test]
    fn test_counter_reports_exhaustion() {
        let mut ids = IdCounter::starting_at(u64::MAX);
        assert_eq!(ids.next_raw(), Err(PmbmError::IdsExhausted));
    }

    #[test]
    fn test_reserve_through_skips_ids() {
        let mut ids = IdCounter::new();
        ids.reserve_through(5).unwrap();
        assert_eq!(ids.next_sth_id().unwrap(), SthId(6));

        // Reserving an id already behind the counter changes nothing
        ids.reserve_through(2).unwrap();
        assert_eq!(ids.next_sth_id().unwrap(), SthId(7));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(format!("{}", TrackId(3)), "T3");
        assert_eq!(format!("{}", SthId(12)), "H12");
    }
}
