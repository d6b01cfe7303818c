//! The change clock.
//!
//! A panel-wide revision counter with two phases: changes are stamped with
//! the *pending* revision, and become visible to clients when the clock
//! commits. Every change made between two commits shares one pending
//! revision, so a batch of changes becomes visible atomically.
//!
//! # Invariants
//!
//! - `pending == visible` or `pending == visible + 1` (mod 2^16)
//! - `commit()` never moves `visible` backwards on the ring
//! - Changes stamped with an uncommitted revision are never reported

use ajane_protocol::{Baseline, Revision};
use tracing::trace;

/// Revision counter with pending and visible phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeClock {
    visible: Revision,
    pending: Revision,
}

impl ChangeClock {
    /// Creates a clock with nothing pending.
    pub const fn new(initial: Revision) -> Self {
        Self {
            visible: initial,
            pending: initial,
        }
    }

    /// Returns the revision clients currently see.
    pub fn visible_revision(&self) -> Revision {
        self.visible
    }

    /// Returns the revision the current batch will commit as.
    pub fn pending_revision(&self) -> Revision {
        self.pending
    }

    /// Returns true if changes are waiting for a commit.
    pub fn has_pending(&self) -> bool {
        self.pending != self.visible
    }

    /// Opens (or joins) the pending batch and returns its revision.
    ///
    /// Repeated calls before a commit return the same revision.
    pub fn mark_dirty(&mut self) -> Revision {
        self.pending = self.visible.next();
        self.pending
    }

    /// Makes the pending batch visible. A no-op if nothing is pending.
    pub fn commit(&mut self) -> Revision {
        if self.has_pending() {
            trace!(from = %self.visible, to = %self.pending, "commit");
            self.visible = self.pending;
        }
        self.visible
    }

    /// Classifies a client-supplied baseline against the visible revision.
    pub fn baseline(&self, since: Option<Revision>) -> Baseline {
        Baseline::classify(since, self.visible)
    }

    /// Returns true if a change stamped `stamp` has been committed.
    pub fn is_committed(&self, stamp: Revision) -> bool {
        !(self.has_pending() && stamp == self.pending)
    }

    /// Returns true if a change stamped `stamp` must be sent to a client at
    /// `baseline`.
    pub fn has_changed_since(&self, stamp: Revision, baseline: Baseline) -> bool {
        self.is_committed(stamp) && baseline.includes(stamp, self.visible)
    }
}

impl Default for ChangeClock {
    fn default() -> Self {
        Self::new(Revision::INITIAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn mark_dirty_coalesces() {
        let mut clock = ChangeClock::default();
        assert!(!clock.has_pending());

        assert_eq!(clock.mark_dirty(), Revision::new(2));
        assert_eq!(clock.mark_dirty(), Revision::new(2));
        assert_eq!(clock.visible_revision(), Revision::new(1));
        assert!(clock.has_pending());

        assert_eq!(clock.commit(), Revision::new(2));
        assert!(!clock.has_pending());
    }

    #[test]
    fn commit_without_changes_is_noop() {
        let mut clock = ChangeClock::default();
        assert_eq!(clock.commit(), Revision::new(1));
        assert_eq!(clock.commit(), Revision::new(1));
    }

    #[test]
    fn uncommitted_stamps_are_hidden() {
        let mut clock = ChangeClock::default();
        let stamp = clock.mark_dirty();
        let baseline = clock.baseline(Some(Revision::new(0)));
        assert!(!clock.has_changed_since(stamp, baseline));
        assert!(!clock.has_changed_since(stamp, Baseline::Unknown));

        clock.commit();
        let baseline = clock.baseline(Some(Revision::new(1)));
        assert!(clock.has_changed_since(stamp, baseline));
    }

    #[test]
    fn wraps_around() {
        let mut clock = ChangeClock::new(Revision::new(u16::MAX));
        let stamp = clock.mark_dirty();
        assert_eq!(stamp, Revision::new(0));
        clock.commit();

        let baseline = clock.baseline(Some(Revision::new(u16::MAX)));
        assert_eq!(baseline, Baseline::Behind(1));
        assert!(clock.has_changed_since(stamp, baseline));
    }

    proptest! {
        #[test]
        fn visible_revision_never_moves_backwards(ops in prop::collection::vec(any::<bool>(), 0..200)) {
            let mut clock = ChangeClock::default();
            for dirty in ops {
                let before = clock.visible_revision();
                if dirty {
                    clock.mark_dirty();
                } else {
                    clock.commit();
                }
                let after = clock.visible_revision();
                prop_assert!(after.steps_since(before) <= 1);
                prop_assert!(clock.pending_revision().steps_since(clock.visible_revision()) <= 1);
            }
        }
    }
}
