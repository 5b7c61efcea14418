//! Area identifiers
//!
//!     Every area carries an [AreaId]. Ids are handed out by an [IdCounter] owned by the parse or
//!     editing session rather than by a process-wide global, so two independent sessions never
//!     interfere and re-deriving a document can be made counter-neutral explicitly:
//!
//!         let checkpoint = ids.checkpoint();
//!         // ... rebuild the tree from persisted ids ...
//!         ids.restore(checkpoint);
//!
//!     `restore` never lets the counter fall behind an id it has [observed](IdCounter::observe),
//!     which keeps ids allocated for genuinely new areas unique.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AreaId(pub u64);

impl AreaId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AreaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for AreaId {
    fn from(value: u64) -> Self {
        AreaId(value)
    }
}

/// Saved counter state, see [`IdCounter::checkpoint`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint(u64);

/// Monotonic allocator of [AreaId]s
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdCounter {
    next: u64,
    /// Smallest value the counter may be restored to
    floor: u64,
}

impl IdCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting at `first`
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: first,
            floor: 0,
        }
    }

    pub fn next_id(&mut self) -> AreaId {
        let id = AreaId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// The id the next call to [`next_id`](Self::next_id) will return
    pub fn peek(&self) -> AreaId {
        AreaId(self.next)
    }

    /// Record an id that came from outside this counter (a persisted editor id)
    pub fn observe(&mut self, id: AreaId) {
        self.floor = self.floor.max(id.0.saturating_add(1));
        self.next = self.next.max(self.floor);
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.next)
    }

    /// Rewind to `checkpoint`, but never below an observed id
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.next = checkpoint.0.max(self.floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let mut ids = IdCounter::new();
        assert_eq!(ids.next_id(), AreaId(0));
        assert_eq!(ids.next_id(), AreaId(1));
        assert_eq!(ids.peek(), AreaId(2));
    }

    #[test]
    fn test_restore_rewinds() {
        let mut ids = IdCounter::starting_at(10);
        let checkpoint = ids.checkpoint();
        ids.next_id();
        ids.next_id();
        ids.restore(checkpoint);
        assert_eq!(ids.peek(), AreaId(10));
    }

    #[test]
    fn test_restore_respects_observed_ids() {
        let mut ids = IdCounter::starting_at(3);
        let checkpoint = ids.checkpoint();
        ids.observe(AreaId(7));
        ids.restore(checkpoint);
        assert_eq!(ids.next_id(), AreaId(8));
    }

    #[test]
    fn test_observe_lower_id_is_noop() {
        let mut ids = IdCounter::starting_at(20);
        ids.observe(AreaId(4));
        assert_eq!(ids.peek(), AreaId(20));
    }

    #[test]
    fn test_observe_largest_id_saturates() {
        let mut ids = IdCounter::new();
        ids.observe(AreaId(u64::MAX));
        assert_eq!(ids.peek(), AreaId(u64::MAX));
    }
}
