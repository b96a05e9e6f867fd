//! `init` / `teardown` for [`GlintEngine`].

use web_time::Instant;

use super::GlintEngine;
use crate::animation::TimerAction;
use crate::dom::{Document, ElementId, EventKind, Selector};
use crate::entrance::{
    AnimatableElement, CardParts, Entrance, EntranceAnimator, RevealGroup,
    RevealStrategy,
};
use crate::interaction::{
    ChevronSlide, PopState, PressPulse, RippleLayer, BUTTON_EVENTS,
    CARD_EVENTS, CHEVRON_TRIGGER_EVENTS,
};
use crate::visibility::{Observation, VisibilityObserver};

// ── Init ──

impl<D: Document> GlintEngine<D> {
    /// Discover elements and attach every behavior. A no-op while the
    /// engine is already active.
    ///
    /// `now` is the reference point for the immediate group's stagger.
    pub fn init(&mut self, now: Instant) {
        if self.active {
            return;
        }
        self.active = true;

        let capabilities = self.document.capabilities();
        self.strategy = RevealStrategy::for_capabilities(capabilities);
        self.entrance = EntranceAnimator::new(self.strategy);
        self.visibility =
            VisibilityObserver::new(capabilities.intersection_observer);

        let Some(root) =
            self.document.query_first(None, &self.config.selectors.root)
        else {
            log::debug!(
                "glint: root '{}' not found, nothing to decorate",
                self.config.selectors.root
            );
            return;
        };
        self.root = Some(root);

        // Cards first: an element matching both a card and a section or
        // `.reveal` selector gets the card cascade.
        self.init_cards(root);
        self.init_sections(root, now);
        self.init_buttons(root);
        self.init_images(root);
        self.init_reveal_elements(root);

        log::debug!(
            "glint: init with {:?}, {} revealable, {} buttons, {} cards, \
             {} timers",
            self.strategy,
            self.entrance.len(),
            self.buttons.len(),
            self.cards.len(),
            self.timers.len()
        );
    }

    /// Top-level sections: mark revealable and schedule the stagger.
    /// Sections that are also cards keep their stagger slot but are left
    /// to the cascade.
    fn init_sections(&mut self, root: ElementId, now: Instant) {
        let sections = self
            .document
            .query_all(Some(root), &self.config.selectors.sections);
        for (index, section) in sections.into_iter().enumerate() {
            if self.cards.contains_key(&section) {
                continue;
            }
            self.document.add_class(section, &self.config.reveal_class);
            let state = AnimatableElement::immediate(
                index,
                Entrance::Class(self.config.visible_class.clone()),
            );
            if self.entrance.register(section, state) {
                let _ = self.timers.schedule_after(
                    now,
                    self.config.stagger.delay_for(index),
                    TimerAction::Reveal(section),
                );
            }
        }
    }

    /// Every `.reveal` element is observed; sections race their stagger
    /// timer, the rest are lazy. Cards are handled by
    /// [`init_cards`](Self::init_cards).
    fn init_reveal_elements(&mut self, root: ElementId) {
        let elements = self
            .document
            .query_all(Some(root), &self.config.selectors.reveal);
        for element in elements {
            if self.cards.contains_key(&element) {
                continue;
            }
            let _ = self.entrance.register(
                element,
                AnimatableElement::new(
                    RevealGroup::Lazy,
                    Entrance::Class(self.config.visible_class.clone()),
                ),
            );
            let threshold = self.config.section_threshold;
            self.observe_or_reveal(element, threshold);
        }
    }

    /// Buttons: press feedback and ripples.
    fn init_buttons(&mut self, root: ElementId) {
        let buttons = self
            .document
            .query_all(Some(root), &self.config.selectors.buttons);
        for button in buttons {
            RippleLayer::prepare_button(&mut self.document, button);
            let _ = self.buttons.insert(button, PressPulse::default());
            self.listen(button, BUTTON_EVENTS);
        }
    }

    /// Images: fade in once loaded.
    fn init_images(&mut self, root: ElementId) {
        let images = self
            .document
            .query_all(Some(root), &self.config.selectors.images);
        for image in images {
            self.document.add_class(image, &self.config.image_class);
            let _ = self.entrance.register(
                image,
                AnimatableElement::new(
                    RevealGroup::OnLoad,
                    Entrance::Class(self.config.visible_class.clone()),
                ),
            );
            if self.document.is_image_complete(image) {
                let _ = self.entrance.reveal(&mut self.document, image);
            } else {
                self.listen(image, &[EventKind::Load]);
            }
        }
    }

    /// Cards: entrance cascade, lift, and chevron.
    fn init_cards(&mut self, root: ElementId) {
        let cards = self
            .document
            .query_all(Some(root), &self.config.selectors.cards);
        if cards.is_empty() {
            return;
        }
        self.inject_card_styles();

        for card in cards {
            let parts = self.card_parts(card);
            let specs = self.config.cascade.build(&parts);
            let _ = self.entrance.register(
                card,
                AnimatableElement::new(RevealGroup::Lazy, Entrance::Cascade(specs)),
            );

            let _ = self.cards.insert(card, PopState::default());
            self.listen(card, CARD_EVENTS);

            let chevron = self
                .document
                .query_first(Some(card), &self.config.selectors.chevron);
            if let (Some(button), Some(chevron)) = (parts.button, chevron) {
                let _ = self.chevrons.insert(card, ChevronSlide::new(chevron));
                let _ = self.chevron_triggers.insert(button, card);
                self.listen(button, CHEVRON_TRIGGER_EVENTS);
            }

            let threshold = self.config.card_threshold;
            self.observe_or_reveal(card, threshold);
        }
    }

    fn card_parts(&self, card: ElementId) -> CardParts {
        let selectors = &self.config.selectors;
        let first = |selector: &Selector| {
            self.document.query_first(Some(card), selector)
        };
        CardParts {
            image: first(&selectors.card_image),
            tagline: first(&selectors.tagline),
            heading: first(&selectors.heading),
            text: first(&selectors.text),
            button: first(&selectors.card_button),
        }
    }

    /// Watch a lazy element, revealing it right away when no intersection
    /// primitive exists. Immediate elements keep their stagger timer.
    fn observe_or_reveal(&mut self, element: ElementId, threshold: f32) {
        let observation =
            self.visibility
                .observe(&mut self.document, element, threshold, element);
        let lazy = self
            .entrance
            .get(element)
            .is_some_and(|state| state.group() == RevealGroup::Lazy);
        if observation == Observation::Unavailable && lazy {
            let _ = self.entrance.reveal(&mut self.document, element);
        }
    }

    /// Inject the lift stylesheet once per document.
    fn inject_card_styles(&mut self) {
        let pop = &self.config.interaction.pop;
        if self.document.has_element_with_id(&pop.style_marker) {
            return;
        }
        let css = pop.stylesheet(
            &self.config.selectors.cards,
            self.config.interaction.easing,
        );
        if let Err(e) = self.document.inject_style(&pop.style_marker, &css) {
            log::trace!("card stylesheet not injected: {e}");
        }
    }
}

// ── Teardown ──

impl<D: Document> GlintEngine<D> {
    /// Detach listeners and observers, drop pending timers, cancel chevron
    /// animations, remove live ripples, and clear transient classes.
    /// Revealed content stays revealed. Sections and images still waiting
    /// for their entrance lose the hiding class the engine gave them, so
    /// nothing is left invisible.
    pub fn teardown(&mut self) {
        if !self.active {
            return;
        }
        self.visibility.disconnect(&mut self.document);
        self.timers.clear();
        self.unhide_pending();

        for (_, mut slide) in self.chevrons.drain() {
            slide.cancel(&mut self.document);
        }
        self.chevron_triggers.clear();
        self.ripples.clear(&mut self.document);

        let interaction = &self.config.interaction;
        for (button, _) in self.buttons.drain() {
            self.document.remove_class(button, &interaction.press.class);
        }
        for (card, _) in self.cards.drain() {
            self.document.remove_class(card, &interaction.pop.pop_class);
            self.document
                .remove_class(card, &interaction.pop.touching_class);
        }
        for element in self.listened.drain() {
            self.document.unlisten_all(element);
        }

        self.entrance.clear();
        self.root = None;
        self.active = false;
        log::debug!("glint: teardown complete");
    }

    /// Drop the engine-added hiding class from every section and image
    /// whose entrance never ran.
    fn unhide_pending(&mut self) {
        let groups = [
            (RevealGroup::Immediate, &self.config.reveal_class),
            (RevealGroup::OnLoad, &self.config.image_class),
        ];
        for (group, class) in groups {
            let pending = self
                .entrance
                .in_group(group)
                .filter(|&element| !self.entrance.is_revealed(element));
            for element in pending {
                self.document.remove_class(element, class);
            }
        }
    }
}
