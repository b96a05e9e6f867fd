//! Press pulse: a short-lived pressed class on activation.

use web_time::{Duration, Instant};

use crate::animation::{TimerAction, TimerId, TimerQueue};
use crate::dom::{Document, ElementId};

/// Class and length of the pressed state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PressConfig {
    /// Class applied while pressed.
    pub class: String,
    /// How long the class stays after the last activation.
    pub duration: Duration,
}

impl Default for PressConfig {
    fn default() -> Self {
        Self {
            class: "click-press".to_owned(),
            duration: Duration::from_millis(120),
        }
    }
}

/// Pressed-state bookkeeping for one button.
///
/// Activations reset the window instead of stacking: only the release timer
/// of the most recent press may clear the class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PressPulse {
    release: Option<TimerId>,
}

impl PressPulse {
    /// Apply the pressed class and (re)start the release window.
    pub fn press<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        timers: &mut TimerQueue,
        button: ElementId,
        now: Instant,
        config: &PressConfig,
    ) {
        if let Some(previous) = self.release.take() {
            let _ = timers.cancel(previous);
        }
        document.add_class(button, &config.class);
        self.release = Some(timers.schedule_after(
            now,
            config.duration,
            TimerAction::ReleasePress(button),
        ));
    }

    /// Handle a fired release timer. Stale timers are ignored.
    pub fn release<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        button: ElementId,
        timer: TimerId,
        config: &PressConfig,
    ) -> bool {
        if self.release != Some(timer) {
            return false;
        }
        self.release = None;
        document.remove_class(button, &config.class);
        true
    }

    /// Whether a release is pending.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.release.is_some()
    }

    /// Drop the pressed state and its timer.
    pub fn reset<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        timers: &mut TimerQueue,
        button: ElementId,
        config: &PressConfig,
    ) {
        if let Some(pending) = self.release.take() {
            let _ = timers.cancel(pending);
        }
        document.remove_class(button, &config.class);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    fn fire_due(
        doc: &mut MemoryDocument,
        timers: &mut TimerQueue,
        pulse: &mut PressPulse,
        button: ElementId,
        now: Instant,
    ) {
        let config = PressConfig::default();
        while let Some(due) = timers.pop_due(now) {
            let _ = pulse.release(doc, button, due.id, &config);
        }
    }

    #[test]
    fn test_second_press_restarts_window() {
        let mut doc = MemoryDocument::new();
        let button = doc.append(doc.body(), "button");
        let mut timers = TimerQueue::new();
        let mut pulse = PressPulse::default();
        let config = PressConfig::default();
        let t0 = Instant::now();
        let ms = Duration::from_millis;

        pulse.press(&mut doc, &mut timers, button, t0, &config);
        pulse.press(&mut doc, &mut timers, button, t0 + ms(50), &config);
        assert_eq!(timers.len(), 1);

        // The first press's window would have ended here.
        fire_due(&mut doc, &mut timers, &mut pulse, button, t0 + ms(120));
        assert!(doc.has_class(button, "click-press"));

        fire_due(&mut doc, &mut timers, &mut pulse, button, t0 + ms(169));
        assert!(doc.has_class(button, "click-press"));

        fire_due(&mut doc, &mut timers, &mut pulse, button, t0 + ms(170));
        assert!(!doc.has_class(button, "click-press"));
        assert!(!pulse.is_pressed());
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut doc = MemoryDocument::new();
        let button = doc.append(doc.body(), "button");
        let mut timers = TimerQueue::new();
        let mut pulse = PressPulse::default();
        let config = PressConfig::default();
        let t0 = Instant::now();

        pulse.press(&mut doc, &mut timers, button, t0, &config);
        let stale = timers.pop_due(t0 + config.duration).unwrap().id;
        pulse.press(&mut doc, &mut timers, button, t0, &config);
        assert!(!pulse.release(&mut doc, button, stale, &config));
        assert!(doc.has_class(button, "click-press"));
    }

    #[test]
    fn test_reset_cancels_pending() {
        let mut doc = MemoryDocument::new();
        let button = doc.append(doc.body(), "button");
        let mut timers = TimerQueue::new();
        let mut pulse = PressPulse::default();
        let config = PressConfig::default();

        pulse.press(&mut doc, &mut timers, button, Instant::now(), &config);
        pulse.reset(&mut doc, &mut timers, button, &config);
        assert!(timers.is_empty());
        assert!(!doc.has_class(button, "click-press"));
    }
}
