//! Deferred actions ordered by deadline.
//!
//! Every delayed effect in the engine (staggered reveals, the press pulse
//! release, touch release) is a [`TimerAction`] in a [`TimerQueue`]. The
//! host decides how time advances: a browser re-arms one `setTimeout` at
//! [`TimerQueue::next_deadline`], tests step an explicit clock.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use web_time::{Duration, Instant};

use crate::dom::ElementId;

/// Handle to a scheduled action, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What to do when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Run the element's entrance.
    Reveal(ElementId),
    /// Drop the pressed state from a button.
    ReleasePress(ElementId),
    /// Drop the lifted/touching state from a card.
    ReleasePop(ElementId),
}

/// A fired timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTimer {
    /// The handle returned by [`TimerQueue::schedule`].
    pub id: TimerId,
    /// When it was due.
    pub deadline: Instant,
    /// The action to run.
    pub action: TimerAction,
}

/// Deadline-ordered queue of deferred actions. Timers sharing a deadline
/// fire in scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    next_seq: u64,
    by_deadline: BTreeMap<(Instant, u64), TimerAction>,
    deadlines: FxHashMap<u64, Instant>,
}

impl TimerQueue {
    /// An empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire at `deadline`.
    pub fn schedule(&mut self, deadline: Instant, action: TimerAction) -> TimerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let _ = self.by_deadline.insert((deadline, seq), action);
        let _ = self.deadlines.insert(seq, deadline);
        TimerId(seq)
    }

    /// Schedule `action` to fire `delay` after `now`. A delay past the
    /// clock's range fires at `now`.
    pub fn schedule_after(
        &mut self,
        now: Instant,
        delay: Duration,
        action: TimerAction,
    ) -> TimerId {
        let deadline = now.checked_add(delay).unwrap_or_else(|| {
            log::debug!("timer delay {delay:?} overflows the clock, firing now");
            now
        });
        self.schedule(deadline, action)
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was
    /// cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        match self.deadlines.remove(&id.0) {
            Some(deadline) => self.by_deadline.remove(&(deadline, id.0)).is_some(),
            None => false,
        }
    }

    /// Whether the timer is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.contains_key(&id.0)
    }

    /// Deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.by_deadline.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Remove and return the earliest timer due at or before `now`.
    pub fn pop_due(&mut self, now: Instant) -> Option<DueTimer> {
        let (&(deadline, seq), _) = self.by_deadline.iter().next()?;
        if deadline > now {
            return None;
        }
        let action = self.by_deadline.remove(&(deadline, seq))?;
        let _ = self.deadlines.remove(&seq);
        Some(DueTimer {
            id: TimerId(seq),
            deadline,
            action,
        })
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_deadline.len()
    }

    /// Whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_deadline.is_empty()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.by_deadline.clear();
        self.deadlines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn el(raw: u32) -> ElementId {
        ElementId::from_raw(raw)
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let _ = queue.schedule(
            t0 + Duration::from_millis(200),
            TimerAction::Reveal(el(2)),
        );
        let _ = queue.schedule(
            t0 + Duration::from_millis(80),
            TimerAction::Reveal(el(1)),
        );

        assert_eq!(queue.next_deadline(), Some(t0 + Duration::from_millis(80)));
        assert!(queue.pop_due(t0 + Duration::from_millis(79)).is_none());

        let first = queue.pop_due(t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(first.action, TimerAction::Reveal(el(1)));
        let second = queue.pop_due(t0 + Duration::from_millis(500)).unwrap();
        assert_eq!(second.action, TimerAction::Reveal(el(2)));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_equal_deadlines_are_fifo() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let _ = queue.schedule(t0, TimerAction::ReleasePress(el(1)));
        let _ = queue.schedule(t0, TimerAction::ReleasePop(el(1)));
        assert_eq!(
            queue.pop_due(t0).map(|due| due.action),
            Some(TimerAction::ReleasePress(el(1)))
        );
        assert_eq!(
            queue.pop_due(t0).map(|due| due.action),
            Some(TimerAction::ReleasePop(el(1)))
        );
    }

    #[test]
    fn test_cancel() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let id = queue.schedule(t0, TimerAction::ReleasePop(el(3)));
        assert!(queue.is_pending(id));
        assert!(queue.cancel(id));
        assert!(!queue.is_pending(id));
        assert!(!queue.cancel(id));
        assert!(queue.pop_due(t0).is_none());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn test_schedule_after_clamps_overflow() {
        let t0 = Instant::now();
        let mut queue = TimerQueue::new();
        let _ = queue.schedule_after(
            t0,
            Duration::from_millis(5),
            TimerAction::Reveal(el(1)),
        );
        let _ = queue.schedule_after(t0, Duration::MAX, TimerAction::Reveal(el(2)));

        assert_eq!(queue.next_deadline(), Some(t0));
        assert_eq!(
            queue.pop_due(t0).map(|due| due.action),
            Some(TimerAction::Reveal(el(2)))
        );
        assert_eq!(
            queue.next_deadline(),
            Some(t0 + Duration::from_millis(5))
        );
    }
}
