//! Revision numbers and baseline classification.
//!
//! Revisions live on a 16-bit ring. Comparisons are only meaningful within
//! half of the ring ([`REVISION_WINDOW`]); anything further away is treated
//! as an unknown baseline, for which everything is re-sent.

use crate::error::{ProtocolError, ProtocolResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum distance (exclusive) at which two revisions can be ordered.
pub const REVISION_WINDOW: u16 = 0x8000;

/// A logical snapshot number of a panel's state.
///
/// Revisions wrap around; use [`Revision::steps_since`] instead of `<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Revision(pub u16);

impl Revision {
    /// The revision a freshly built panel starts at.
    pub const INITIAL: Self = Self(1);

    /// Creates a revision from its raw value.
    #[must_use]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw revision value.
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self.0
    }

    /// Returns the next revision, wrapping at `u16::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// Number of steps from `earlier` forward to `self` on the ring.
    #[must_use]
    pub const fn steps_since(self, earlier: Revision) -> u16 {
        self.0.wrapping_sub(earlier.0)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Revision {
    type Err = ProtocolError;

    fn from_str(s: &str) -> ProtocolResult<Self> {
        s.trim()
            .parse::<u16>()
            .map(Self)
            .map_err(|_| ProtocolError::InvalidRevision(s.to_string()))
    }
}

/// A client baseline, classified against the visible revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// The client is up to date.
    Current,
    /// The client is this many revisions behind.
    Behind(u16),
    /// The baseline cannot be ordered against the visible revision
    /// (missing, ahead of the server, or too far behind).
    Unknown,
}

impl Baseline {
    /// Classifies `since` against the currently visible revision.
    pub fn classify(since: Option<Revision>, visible: Revision) -> Self {
        let Some(since) = since else {
            return Baseline::Unknown;
        };
        match visible.steps_since(since) {
            0 => Baseline::Current,
            behind if behind < REVISION_WINDOW => Baseline::Behind(behind),
            _ => Baseline::Unknown,
        }
    }

    /// Returns true if a committed change stamped `stamp` is newer than this
    /// baseline.
    ///
    /// Stamps older than the window alias onto recent revisions; they are
    /// re-sent rather than lost.
    pub fn includes(self, stamp: Revision, visible: Revision) -> bool {
        match self {
            Baseline::Current => false,
            Baseline::Behind(behind) => visible.steps_since(stamp) < behind,
            Baseline::Unknown => true,
        }
    }

    /// Returns true if everything must be sent.
    pub fn is_unknown(self) -> bool {
        matches!(self, Baseline::Unknown)
    }
}
