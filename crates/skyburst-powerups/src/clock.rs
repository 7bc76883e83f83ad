//! One-shot expiration scheduling for timed effects.
//!
//! Every activation gets its own [`TimerHandle`]. Cancelling a kind drops its
//! scheduled expiration, and an expiration is only delivered while the kind is
//! still recorded as active under the same handle and expiry instant, so a
//! stale timer can never turn off a newer activation.

use std::collections::BTreeMap;
use std::time::Duration;

use skyburst_core::powerup::PowerUpKind;

/// Identity of one scheduled expiration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

/// Bookkeeping for a running timed effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTimer {
    pub handle: TimerHandle,
    pub expires_at: Duration,
}

/// An expiration that came due during [`EffectClock::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    pub kind: PowerUpKind,
    pub handle: TimerHandle,
    pub expires_at: Duration,
}

#[derive(Debug, Default)]
pub struct EffectClock {
    now: Duration,
    next_handle: u64,
    active: BTreeMap<PowerUpKind, ActiveTimer>,
    scheduled: Vec<Expiry>,
}

impl EffectClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session time, advanced only by [`advance`](Self::advance).
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.contains_key(&kind)
    }

    pub fn expiry(&self, kind: PowerUpKind) -> Option<Duration> {
        self.active.get(&kind).map(|t| t.expires_at)
    }

    pub fn remaining(&self, kind: PowerUpKind) -> Option<Duration> {
        self.expiry(kind).map(|at| at.saturating_sub(self.now))
    }

    /// Active kinds in canonical order.
    pub fn active_kinds(&self) -> Vec<PowerUpKind> {
        self.active.keys().copied().collect()
    }

    /// Number of expirations still waiting to fire.
    pub fn scheduled_len(&self) -> usize {
        self.scheduled.len()
    }

    /// Record `kind` as active until `now + duration` and schedule its
    /// expiration. Returns `None` without touching anything if the kind is
    /// already running.
    pub fn start(&mut self, kind: PowerUpKind, duration: Duration) -> Option<ActiveTimer> {
        if self.active.contains_key(&kind) {
            return None;
        }
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let timer = ActiveTimer {
            handle,
            expires_at: self.now.saturating_add(duration),
        };
        self.active.insert(kind, timer);
        self.scheduled.push(Expiry {
            kind,
            handle,
            expires_at: timer.expires_at,
        });
        tracing::debug!(?kind, ?handle, ?duration, "Effect timer scheduled");
        Some(timer)
    }

    /// Stop tracking `kind` and drop its scheduled expiration.
    pub fn cancel(&mut self, kind: PowerUpKind) -> Option<ActiveTimer> {
        let timer = self.active.remove(&kind)?;
        self.scheduled.retain(|e| e.handle != timer.handle);
        Some(timer)
    }

    /// Cancel every running timer, returning the kinds in canonical order.
    pub fn cancel_all(&mut self) -> Vec<PowerUpKind> {
        let kinds = self.active_kinds();
        self.active.clear();
        self.scheduled.clear();
        kinds
    }

    /// Whether `expiry` still describes the live activation of its kind.
    pub fn is_current(&self, expiry: &Expiry) -> bool {
        self.active
            .get(&expiry.kind)
            .is_some_and(|t| t.handle == expiry.handle && t.expires_at == expiry.expires_at)
    }

    /// Move time forward and return the expirations that came due, ordered by
    /// expiry instant then scheduling order. Stale entries are dropped here.
    /// The caller is responsible for deactivating each returned kind.
    pub fn advance(&mut self, dt: Duration) -> Vec<Expiry> {
        self.now = self.now.saturating_add(dt);
        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|e| e.expires_at <= now);
        self.scheduled = pending;
        due.sort_by_key(|e| (e.expires_at, e.handle));
        due.retain(|e| {
            let current = self.is_current(e);
            if !current {
                tracing::debug!(kind = ?e.kind, handle = ?e.handle, "Dropped stale effect expiry");
            }
            current
        });
        due
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: Duration = Duration::from_secs(1);

    #[test]
    fn start_twice_is_rejected() {
        let mut clock = EffectClock::new();
        assert!(clock.start(PowerUpKind::Ghost, 5 * SECOND).is_some());
        assert!(clock.start(PowerUpKind::Ghost, 5 * SECOND).is_none());
        assert_eq!(clock.scheduled_len(), 1);
        assert_eq!(clock.expiry(PowerUpKind::Ghost), Some(5 * SECOND));
    }

    #[test]
    fn expiry_is_relative_to_now() {
        let mut clock = EffectClock::new();
        clock.advance(3 * SECOND);
        clock.start(PowerUpKind::Shield, 8 * SECOND);
        assert_eq!(clock.expiry(PowerUpKind::Shield), Some(11 * SECOND));
        assert_eq!(clock.remaining(PowerUpKind::Shield), Some(8 * SECOND));
        clock.advance(2 * SECOND);
        assert_eq!(clock.remaining(PowerUpKind::Shield), Some(6 * SECOND));
    }

    #[test]
    fn expiry_fires_exactly_at_instant() {
        let mut clock = EffectClock::new();
        clock.start(PowerUpKind::Multiplier, 2 * SECOND);
        assert!(clock.advance(SECOND).is_empty());
        let due = clock.advance(SECOND);
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].kind, PowerUpKind::Multiplier);
        assert_eq!(due[0].expires_at, 2 * SECOND);
    }

    #[test]
    fn delivered_expiry_stays_active_until_cancelled() {
        let mut clock = EffectClock::new();
        clock.start(PowerUpKind::Ghost, SECOND);
        let due = clock.advance(SECOND);
        assert!(clock.is_current(&due[0]));
        clock.cancel(PowerUpKind::Ghost);
        assert!(!clock.is_current(&due[0]));
        assert!(clock.advance(SECOND).is_empty());
    }

    #[test]
    fn due_expiries_are_ordered() {
        let mut clock = EffectClock::new();
        clock.start(PowerUpKind::Multiplier, 3 * SECOND);
        clock.start(PowerUpKind::Ghost, SECOND);
        clock.start(PowerUpKind::SpeedBoost, 3 * SECOND);
        let kinds: Vec<_> = clock.advance(10 * SECOND).iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![PowerUpKind::Ghost, PowerUpKind::Multiplier, PowerUpKind::SpeedBoost]
        );
    }

    #[test]
    fn cancel_removes_scheduled_expiry() {
        let mut clock = EffectClock::new();
        clock.start(PowerUpKind::Shrink, 2 * SECOND);
        assert!(clock.cancel(PowerUpKind::Shrink).is_some());
        assert!(clock.cancel(PowerUpKind::Shrink).is_none());
        assert_eq!(clock.scheduled_len(), 0);
        assert!(clock.advance(5 * SECOND).is_empty());
    }

    #[test]
    fn stale_expiry_does_not_end_newer_activation() {
        let mut clock = EffectClock::new();
        let first = clock.start(PowerUpKind::Ghost, 2 * SECOND).unwrap();
        // Simulate an un-cancelled callback left behind by the first activation.
        clock.cancel(PowerUpKind::Ghost);
        clock.scheduled.push(Expiry {
            kind: PowerUpKind::Ghost,
            handle: first.handle,
            expires_at: first.expires_at,
        });
        clock.advance(SECOND);
        let second = clock.start(PowerUpKind::Ghost, 5 * SECOND).unwrap();
        assert_ne!(first.handle, second.handle);

        let due = clock.advance(SECOND);
        assert!(due.is_empty(), "stale expiry must be dropped");
        assert!(clock.is_active(PowerUpKind::Ghost));
        assert_eq!(clock.expiry(PowerUpKind::Ghost), Some(6 * SECOND));
    }

    #[test]
    fn stale_expiry_after_forced_clear_is_dropped() {
        let mut clock = EffectClock::new();
        clock.start(PowerUpKind::Shield, SECOND);
        // Record removed without cancelling the scheduled entry.
        clock.active.remove(&PowerUpKind::Shield);
        assert_eq!(clock.scheduled_len(), 1);
        assert!(clock.advance(2 * SECOND).is_empty());
        assert_eq!(clock.scheduled_len(), 0);
    }

    #[test]
    fn huge_durations_saturate() {
        let mut clock = EffectClock::new();
        clock.advance(SECOND);
        clock.start(PowerUpKind::Shield, Duration::MAX);
        assert_eq!(clock.expiry(PowerUpKind::Shield), Some(Duration::MAX));
        assert_eq!(clock.advance(Duration::MAX).len(), 1);
        assert_eq!(clock.now(), Duration::MAX);
    }

    #[test]
    fn cancel_all_clears_everything() {
        let mut clock = EffectClock::new();
        clock.start(PowerUpKind::Multiplier, SECOND);
        clock.start(PowerUpKind::SpeedBoost, SECOND);
        let kinds = clock.cancel_all();
        assert_eq!(kinds, vec![PowerUpKind::SpeedBoost, PowerUpKind::Multiplier]);
        assert!(clock.active_kinds().is_empty());
        assert!(clock.advance(5 * SECOND).is_empty());
    }
}
