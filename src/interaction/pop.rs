//! Card lift on hover, focus, and touch.
//!
//! Touch screens have no hover, so a touch lifts the card and arms a
//! release timer: a long hold releases after `touch_hold`, lifting the
//! finger releases after the shorter `touch_grace`. Each card has at most
//! one release timer pending.

use std::fmt::Write as _;

use web_time::{Duration, Instant};

use crate::animation::{EasingFunction, TimerAction, TimerId, TimerQueue};
use crate::dom::{Document, ElementId, Selector};

/// Classes, timings, and stylesheet values for the lift effect.
#[derive(Debug, Clone, PartialEq)]
pub struct PopConfig {
    /// Class for the lifted state.
    pub pop_class: String,
    /// Class added while a finger is down.
    pub touching_class: String,
    /// Auto-release after a touch with no touch-end.
    pub touch_hold: Duration,
    /// Release delay after touch-end.
    pub touch_grace: Duration,
    /// Lift distance in pixels for the lifted state.
    pub lift: f64,
    /// Lift distance in pixels while touching and on coarse pointers.
    pub touch_lift: f64,
    /// `box-shadow` for the lifted state.
    pub shadow: String,
    /// Transition length for lift and shadow.
    pub transition: Duration,
    /// Transition length while touching.
    pub touch_transition: Duration,
    /// Id of the injected stylesheet.
    pub style_marker: String,
}

impl Default for PopConfig {
    fn default() -> Self {
        Self {
            pop_class: "pop".to_owned(),
            touching_class: "touching".to_owned(),
            touch_hold: Duration::from_millis(700),
            touch_grace: Duration::from_millis(80),
            lift: 8.0,
            touch_lift: 6.0,
            shadow: "0 22px 46px rgba(0,0,0,0.22)".to_owned(),
            transition: Duration::from_millis(260),
            touch_transition: Duration::from_millis(160),
            style_marker: "card-pop-styles".to_owned(),
        }
    }
}

impl PopConfig {
    /// The stylesheet backing the lift classes for elements matching
    /// `cards`.
    #[must_use]
    pub fn stylesheet(&self, cards: &Selector, easing: EasingFunction) -> String {
        let ease = easing.to_css();
        let transition = self.transition.as_millis();
        let pop = cards.with_class(&self.pop_class);
        let touching = cards.with_class(&self.touching_class);

        let mut css = String::new();
        let _ = writeln!(
            css,
            "{cards} {{ transition: transform {transition}ms {ease}, \
             box-shadow {transition}ms {ease}; transform-origin: center; \
             will-change: transform, box-shadow; }}"
        );
        let _ = writeln!(
            css,
            "{pop} {{ transform: translateY(-{}px); box-shadow: {}; \
             z-index: 30; }}",
            self.lift, self.shadow
        );
        let _ = writeln!(
            css,
            "{touching} {{ transition-duration: {}ms; \
             transform: translateY(-{}px); }}",
            self.touch_transition.as_millis(),
            self.touch_lift
        );
        let _ = writeln!(
            css,
            "@media (hover: none) and (pointer: coarse) {{ {pop} {{ \
             transform: translateY(-{}px); }} }}",
            self.touch_lift
        );
        css
    }
}

/// Lift state for one card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopState {
    pop_active: bool,
    touch_active: bool,
    touch_timer: Option<TimerId>,
}

impl PopState {
    /// Whether the card is lifted.
    #[must_use]
    pub fn pop_active(&self) -> bool {
        self.pop_active
    }

    /// Whether a touch is in progress.
    #[must_use]
    pub fn touch_active(&self) -> bool {
        self.touch_active
    }

    /// The pending release timer, if any.
    #[must_use]
    pub fn touch_timer(&self) -> Option<TimerId> {
        self.touch_timer
    }

    fn cancel_timer(&mut self, timers: &mut TimerQueue) {
        if let Some(pending) = self.touch_timer.take() {
            let _ = timers.cancel(pending);
        }
    }

    /// Pointer entered or focus moved in.
    pub fn enter<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        timers: &mut TimerQueue,
        card: ElementId,
        config: &PopConfig,
    ) {
        self.cancel_timer(timers);
        self.pop_active = true;
        document.add_class(card, &config.pop_class);
    }

    /// Pointer left or focus moved out. Also the release action.
    pub fn leave<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        timers: &mut TimerQueue,
        card: ElementId,
        config: &PopConfig,
    ) {
        self.cancel_timer(timers);
        self.pop_active = false;
        self.touch_active = false;
        document.remove_class(card, &config.pop_class);
        document.remove_class(card, &config.touching_class);
    }

    /// A finger went down: lift and arm the hold release.
    pub fn touch_start<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        timers: &mut TimerQueue,
        card: ElementId,
        now: Instant,
        config: &PopConfig,
    ) {
        self.touch_active = true;
        document.add_class(card, &config.touching_class);
        self.enter(document, timers, card, config);
        self.touch_timer = Some(timers.schedule_after(
            now,
            config.touch_hold,
            TimerAction::ReleasePop(card),
        ));
    }

    /// The finger lifted: replace the hold release with the grace release.
    /// Nothing to do if the hold release already fired.
    pub fn touch_end(
        &mut self,
        timers: &mut TimerQueue,
        card: ElementId,
        now: Instant,
        config: &PopConfig,
    ) {
        if !self.touch_active {
            return;
        }
        self.cancel_timer(timers);
        self.touch_timer = Some(timers.schedule_after(
            now,
            config.touch_grace,
            TimerAction::ReleasePop(card),
        ));
    }

    /// Handle a fired release timer. Stale timers are ignored.
    pub fn release<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        timers: &mut TimerQueue,
        card: ElementId,
        timer: TimerId,
        config: &PopConfig,
    ) -> bool {
        if self.touch_timer != Some(timer) {
            return false;
        }
        self.touch_timer = None;
        self.leave(document, timers, card, config);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;

    struct Card {
        doc: MemoryDocument,
        timers: TimerQueue,
        state: PopState,
        card: ElementId,
        config: PopConfig,
    }

    impl Card {
        fn new() -> Self {
            let mut doc = MemoryDocument::new();
            let card = doc.append_with_id(doc.body(), "div", "Card_1");
            Self {
                doc,
                timers: TimerQueue::new(),
                state: PopState::default(),
                card,
                config: PopConfig::default(),
            }
        }

        fn run_until(&mut self, now: Instant) {
            while let Some(due) = self.timers.pop_due(now) {
                let _ = self.state.release(
                    &mut self.doc,
                    &mut self.timers,
                    self.card,
                    due.id,
                    &self.config,
                );
            }
        }

        fn lifted(&self) -> bool {
            self.doc.has_class(self.card, "pop")
        }
    }

    #[test]
    fn test_tap_releases_after_grace() {
        let mut c = Card::new();
        let t0 = Instant::now();
        let ms = Duration::from_millis;

        c.state
            .touch_start(&mut c.doc, &mut c.timers, c.card, t0, &c.config);
        assert!(c.lifted());
        assert!(c.doc.has_class(c.card, "touching"));

        c.state
            .touch_end(&mut c.timers, c.card, t0 + ms(10), &c.config);
        assert_eq!(c.timers.len(), 1);

        c.run_until(t0 + ms(89));
        assert!(c.lifted());
        c.run_until(t0 + ms(90));
        assert!(!c.lifted());
        assert!(!c.doc.has_class(c.card, "touching"));
        assert_eq!(c.state, PopState::default());
    }

    #[test]
    fn test_hold_releases_at_700ms() {
        let mut c = Card::new();
        let t0 = Instant::now();
        let ms = Duration::from_millis;

        c.state
            .touch_start(&mut c.doc, &mut c.timers, c.card, t0, &c.config);
        c.run_until(t0 + ms(699));
        assert!(c.lifted());
        c.run_until(t0 + ms(700));
        assert!(!c.lifted());

        // A late touch-end after the hold release schedules nothing.
        c.state
            .touch_end(&mut c.timers, c.card, t0 + ms(900), &c.config);
        assert!(c.timers.is_empty());
    }

    #[test]
    fn test_new_touch_cancels_pending_release() {
        let mut c = Card::new();
        let t0 = Instant::now();
        let ms = Duration::from_millis;

        c.state
            .touch_start(&mut c.doc, &mut c.timers, c.card, t0, &c.config);
        c.state
            .touch_start(&mut c.doc, &mut c.timers, c.card, t0 + ms(500), &c.config);
        assert_eq!(c.timers.len(), 1);

        c.run_until(t0 + ms(700));
        assert!(c.lifted());
        c.run_until(t0 + ms(1200));
        assert!(!c.lifted());
    }

    #[test]
    fn test_hover_and_focus() {
        let mut c = Card::new();
        c.state.enter(&mut c.doc, &mut c.timers, c.card, &c.config);
        assert!(c.state.pop_active());
        assert!(c.lifted());
        c.state.leave(&mut c.doc, &mut c.timers, c.card, &c.config);
        assert!(!c.state.pop_active());
        assert!(!c.lifted());
    }

    #[test]
    fn test_stylesheet_covers_every_selector() {
        let cards: Selector = "[id^=\"Card\"], #Column_1".parse().unwrap();
        let css = PopConfig::default().stylesheet(&cards, EasingFunction::STANDARD);
        assert!(css.contains("[id^=\"Card\"].pop, #Column_1.pop {"));
        assert!(css.contains("[id^=\"Card\"].touching, #Column_1.touching {"));
        assert!(css.contains("translateY(-8px)"));
        assert!(css.contains("260ms cubic-bezier(0.22, 0.9, 0.24, 1)"));
        assert!(css.contains("@media (hover: none) and (pointer: coarse)"));
    }
}
