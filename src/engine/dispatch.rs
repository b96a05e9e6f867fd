//! Routing host input, intersections, and timers to per-element state.

use web_time::Instant;

use super::GlintEngine;
use crate::animation::{DueTimer, TimerAction};
use crate::dom::{Document, ElementId, InputEvent, Point};
use crate::entrance::RevealGroup;
use crate::interaction::SlideDirection;

// ── Input ──

impl<D: Document> GlintEngine<D> {
    /// Deliver a DOM event that fired on `element`.
    ///
    /// Events for elements the engine does not track, or that arrive while
    /// inactive, are ignored.
    pub fn handle_event(
        &mut self,
        element: ElementId,
        event: InputEvent,
        now: Instant,
    ) {
        if !self.active {
            return;
        }
        log::trace!("glint: {element} <- {}", event.kind().dom_name());

        match event {
            InputEvent::Click { point } => {
                self.press(element, now);
                self.spawn_ripple(element, point);
            }
            InputEvent::KeyDown { key } => {
                if key.activates() {
                    self.press(element, now);
                }
            }
            InputEvent::PointerEnter | InputEvent::FocusIn => {
                self.card_enter(element);
            }
            InputEvent::PointerLeave | InputEvent::FocusOut => {
                self.card_leave(element);
            }
            InputEvent::TouchStart => self.card_touch_start(element, now),
            InputEvent::TouchEnd => self.card_touch_end(element, now),
            InputEvent::MouseEnter | InputEvent::Focus => {
                self.chevron_slide(element, now, SlideDirection::Out);
            }
            InputEvent::MouseLeave | InputEvent::Blur => {
                self.chevron_slide(element, now, SlideDirection::Back);
            }
            InputEvent::Load => {
                let on_load = self
                    .entrance
                    .get(element)
                    .is_some_and(|state| state.group() == RevealGroup::OnLoad);
                if on_load {
                    let _ = self.entrance.reveal(&mut self.document, element);
                }
            }
            InputEvent::AnimationEnd => {
                let _ = self.ripples.finish(&mut self.document, element);
            }
        }
    }

    fn press(&mut self, button: ElementId, now: Instant) {
        if let Some(pulse) = self.buttons.get_mut(&button) {
            pulse.press(
                &mut self.document,
                &mut self.timers,
                button,
                now,
                &self.config.interaction.press,
            );
        }
    }

    fn spawn_ripple(&mut self, button: ElementId, point: Point) {
        if !self.buttons.contains_key(&button) {
            return;
        }
        if let Err(e) = self.ripples.spawn(&mut self.document, button, point) {
            log::trace!("glint: ripple on {button} skipped: {e}");
        }
    }

    fn card_enter(&mut self, card: ElementId) {
        if let Some(state) = self.cards.get_mut(&card) {
            state.enter(
                &mut self.document,
                &mut self.timers,
                card,
                &self.config.interaction.pop,
            );
        }
    }

    fn card_leave(&mut self, card: ElementId) {
        if let Some(state) = self.cards.get_mut(&card) {
            state.leave(
                &mut self.document,
                &mut self.timers,
                card,
                &self.config.interaction.pop,
            );
        }
    }

    fn card_touch_start(&mut self, card: ElementId, now: Instant) {
        if let Some(state) = self.cards.get_mut(&card) {
            state.touch_start(
                &mut self.document,
                &mut self.timers,
                card,
                now,
                &self.config.interaction.pop,
            );
        }
    }

    fn card_touch_end(&mut self, card: ElementId, now: Instant) {
        if let Some(state) = self.cards.get_mut(&card) {
            state.touch_end(
                &mut self.timers,
                card,
                now,
                &self.config.interaction.pop,
            );
        }
    }

    fn chevron_slide(
        &mut self,
        button: ElementId,
        now: Instant,
        direction: SlideDirection,
    ) {
        let Some(card) = self.chevron_triggers.get(&button) else {
            return;
        };
        let Some(slide) = self.chevrons.get_mut(card) else {
            return;
        };
        let config = &self.config.interaction.chevron;
        match direction {
            SlideDirection::Out => {
                slide.enter(&mut self.document, now, self.strategy, config);
            }
            SlideDirection::Back => {
                slide.leave(&mut self.document, now, self.strategy, config);
            }
        }
    }
}

// ── Visibility ──

impl<D: Document> GlintEngine<D> {
    /// Deliver an intersection entry for an observed element: its visible
    /// fraction and whether it is intersecting the viewport. Returns
    /// whether this notification revealed it.
    pub fn handle_intersection(
        &mut self,
        element: ElementId,
        ratio: f32,
        intersecting: bool,
    ) -> bool {
        if !self.active {
            return false;
        }
        self.visibility
            .notify(&mut self.document, element, ratio, intersecting)
            .is_some_and(|target| self.entrance.reveal(&mut self.document, target))
    }
}

// ── Timers ──

impl<D: Document> GlintEngine<D> {
    /// Fire every timer due at or before `now`, in deadline order. Returns
    /// how many fired.
    pub fn advance(&mut self, now: Instant) -> usize {
        let mut fired = 0;
        while let Some(due) = self.timers.pop_due(now) {
            self.fire(due);
            fired += 1;
        }
        fired
    }

    fn fire(&mut self, due: DueTimer) {
        match due.action {
            TimerAction::Reveal(element) => {
                let _ = self.entrance.reveal(&mut self.document, element);
            }
            TimerAction::ReleasePress(button) => {
                if let Some(pulse) = self.buttons.get_mut(&button) {
                    let _ = pulse.release(
                        &mut self.document,
                        button,
                        due.id,
                        &self.config.interaction.press,
                    );
                }
            }
            TimerAction::ReleasePop(card) => {
                if let Some(state) = self.cards.get_mut(&card) {
                    let _ = state.release(
                        &mut self.document,
                        &mut self.timers,
                        card,
                        due.id,
                        &self.config.interaction.pop,
                    );
                }
            }
        }
    }
}
