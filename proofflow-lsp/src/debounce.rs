//! Debounce state machine for editor syncs
//!
//!     Every change event carries a timestamp, and the caller passes the time of the last
//!     successful sync along with it. The [Debouncer] turns the pair into a [Directive] for
//!     whoever owns the timer:
//!
//!         event after a quiet period       ─► SyncNow                    (state: Idle)
//!         typing, nothing armed            ─► Schedule(last sync + max)  (state: PendingTypingBuffer)
//!         typing, timer armed              ─► Keep                       (state: PendingMaxWait)
//!         typing, max latency already over ─► SyncNow                    (state: Idle)
//!
//!     An armed deadline is never moved, so continuous typing syncs at least once per
//!     `max_latency` after the previous sync. A "quiet period" is a gap longer than
//!     `typing_pause` since the previous change; the clock starts when the document is opened,
//!     which also counts as the first sync.
//!
//!     The owner of the timer cancels any running timer before acting on `SyncNow` or
//!     `Schedule`, calls [Debouncer::on_timer] when a timer fires and performs the sync when it
//!     returns true.

use proofflow_config::SyncConfig;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebounceState {
    Idle,
    /// One buffered change, timer armed
    PendingTypingBuffer {
        deadline: Instant,
    },
    /// More changes arrived while the timer was armed
    PendingMaxWait {
        deadline: Instant,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Cancel the timer and sync immediately
    SyncNow,
    /// Arm a timer
    Schedule(Instant),
    /// Leave the armed timer alone
    Keep,
}

#[derive(Debug, Clone)]
pub struct Debouncer {
    typing_pause: Duration,
    max_latency: Duration,
    state: DebounceState,
    last_change: Instant,
}

impl Debouncer {
    pub fn new(typing_pause: Duration, max_latency: Duration, opened_at: Instant) -> Self {
        Self {
            typing_pause,
            max_latency,
            state: DebounceState::Idle,
            last_change: opened_at,
        }
    }

    pub fn from_config(config: &SyncConfig, opened_at: Instant) -> Self {
        Self::new(config.typing_pause(), config.max_latency(), opened_at)
    }

    pub fn state(&self) -> DebounceState {
        self.state
    }

    pub fn is_pending(&self) -> bool {
        self.state != DebounceState::Idle
    }

    /// When the armed timer should fire
    pub fn deadline(&self) -> Option<Instant> {
        match self.state {
            DebounceState::Idle => None,
            DebounceState::PendingTypingBuffer { deadline }
            | DebounceState::PendingMaxWait { deadline } => Some(deadline),
        }
    }

    /// A change at `now`; `last_sync` is when the server last received new text
    pub fn on_change(&mut self, now: Instant, last_sync: Instant) -> Directive {
        let quiet = now.saturating_duration_since(self.last_change);
        self.last_change = now;
        if quiet > self.typing_pause {
            self.state = DebounceState::Idle;
            return Directive::SyncNow;
        }
        match self.state {
            DebounceState::Idle => {
                let deadline = last_sync + self.max_latency;
                if now >= deadline {
                    return Directive::SyncNow;
                }
                self.state = DebounceState::PendingTypingBuffer { deadline };
                Directive::Schedule(deadline)
            }
            DebounceState::PendingTypingBuffer { deadline } => {
                self.state = DebounceState::PendingMaxWait { deadline };
                Directive::Keep
            }
            DebounceState::PendingMaxWait { .. } => Directive::Keep,
        }
    }

    /// A timer fired at `now`; true when the pending sync is due
    pub fn on_timer(&mut self, now: Instant) -> bool {
        match self.deadline() {
            Some(deadline) if now >= deadline => {
                self.state = DebounceState::Idle;
                true
            }
            _ => false,
        }
    }

    /// Give up waiting; true when a sync was pending
    pub fn flush(&mut self) -> bool {
        let pending = self.is_pending();
        self.state = DebounceState::Idle;
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn debouncer(t0: Instant) -> Debouncer {
        Debouncer::new(ms(250), ms(1000), t0)
    }

    #[test]
    fn test_burst_coalesces_into_one_sync() {
        let t0 = Instant::now();
        let mut debouncer = debouncer(t0);

        assert_eq!(
            debouncer.on_change(t0, t0),
            Directive::Schedule(t0 + ms(1000))
        );
        assert_eq!(debouncer.on_change(t0 + ms(50), t0), Directive::Keep);
        assert_eq!(debouncer.on_change(t0 + ms(100), t0), Directive::Keep);

        assert!(!debouncer.on_timer(t0 + ms(350)));
        assert!(debouncer.on_timer(t0 + ms(1000)));
        assert_eq!(debouncer.state(), DebounceState::Idle);
        assert!(!debouncer.on_timer(t0 + ms(1100)));
    }

    #[test]
    fn test_change_after_quiet_period_syncs_now() {
        let t0 = Instant::now();
        let mut debouncer = debouncer(t0);
        assert_eq!(debouncer.on_change(t0 + ms(5000), t0), Directive::SyncNow);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_max_deadline_is_never_moved() {
        let t0 = Instant::now();
        let mut debouncer = debouncer(t0);
        let directives: Vec<Directive> = (0..10)
            .map(|step| debouncer.on_change(t0 + ms(step * 100), t0))
            .collect();

        assert_eq!(directives[0], Directive::Schedule(t0 + ms(1000)));
        assert!(directives[1..].iter().all(|d| *d == Directive::Keep));
        assert_eq!(
            debouncer.state(),
            DebounceState::PendingMaxWait {
                deadline: t0 + ms(1000)
            }
        );
        assert!(debouncer.on_timer(t0 + ms(1000)));
    }

    #[test]
    fn test_deadline_counts_from_last_sync() {
        let t0 = Instant::now();
        let mut debouncer = debouncer(t0);
        let synced = t0 + ms(400);
        assert_eq!(
            debouncer.on_change(t0 + ms(600), synced),
            Directive::SyncNow
        );
        assert_eq!(
            debouncer.on_change(t0 + ms(700), synced),
            Directive::Schedule(synced + ms(1000))
        );
    }

    #[test]
    fn test_overdue_typing_syncs_now() {
        let t0 = Instant::now();
        let mut debouncer = debouncer(t0);
        for step in 0..12 {
            debouncer.on_change(t0 + ms(step * 100), t0);
        }
        // the sync at 1000 changed nothing, so the last sync is still the open
        assert!(debouncer.on_timer(t0 + ms(1000)));
        assert_eq!(debouncer.on_change(t0 + ms(1200), t0), Directive::SyncNow);
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_late_change_while_pending_syncs_now() {
        let t0 = Instant::now();
        let mut debouncer = debouncer(t0);
        debouncer.on_change(t0, t0);
        assert_eq!(debouncer.on_change(t0 + ms(600), t0), Directive::SyncNow);
        assert_eq!(debouncer.deadline(), None);
    }

    #[test]
    fn test_flush() {
        let t0 = Instant::now();
        let mut debouncer = debouncer(t0);
        assert!(!debouncer.flush());
        debouncer.on_change(t0 + ms(10), t0);
        assert!(debouncer.flush());
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_typing_after_a_sync_starts_a_new_window() {
        let t0 = Instant::now();
        let mut debouncer = debouncer(t0);
        for step in 0..10 {
            debouncer.on_change(t0 + ms(step * 100), t0);
        }
        assert!(debouncer.on_timer(t0 + ms(1000)));

        let synced = t0 + ms(1000);
        assert_eq!(
            debouncer.on_change(t0 + ms(1050), synced),
            Directive::Schedule(t0 + ms(2000))
        );
        assert_eq!(
            debouncer.state(),
            DebounceState::PendingTypingBuffer {
                deadline: t0 + ms(2000)
            }
        );
    }
}
