//! Read-only state queries for [`GlintEngine`].

use web_time::Instant;

use super::{EngineConfig, GlintEngine};
use crate::dom::{Document, ElementId};
use crate::entrance::{AnimatableElement, RevealGroup, RevealStrategy};
use crate::interaction::{ChevronSlide, PopState, PressPulse};

// ── Document ──

impl<D: Document> GlintEngine<D> {
    /// The bound document.
    #[must_use]
    pub fn document(&self) -> &D {
        &self.document
    }

    /// Mutable access to the bound document, e.g. to append elements
    /// before [`init`](Self::init).
    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }

    /// Release the document.
    #[must_use]
    pub fn into_document(self) -> D {
        self.document
    }

    /// The validated configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

// ── Lifecycle ──

impl<D: Document> GlintEngine<D> {
    /// Whether [`init`](Self::init) ran and no teardown followed.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The element matched by the root selector at init.
    #[must_use]
    pub fn root(&self) -> Option<ElementId> {
        self.root
    }

    /// Sub-animation strategy chosen at init.
    #[must_use]
    pub fn strategy(&self) -> RevealStrategy {
        self.strategy
    }

    /// Earliest pending timer deadline. A host should call
    /// [`advance`](Self::advance) once it passes.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }
}

// ── Element state ──

impl<D: Document> GlintEngine<D> {
    /// Whether the element's entrance has run.
    #[must_use]
    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.entrance.is_revealed(element)
    }

    /// Reveal group of a registered element.
    #[must_use]
    pub fn reveal_group(&self, element: ElementId) -> Option<RevealGroup> {
        self.entrance.get(element).map(AnimatableElement::group)
    }

    /// Whether the element still waits for a visibility crossing.
    #[must_use]
    pub fn is_observed(&self, element: ElementId) -> bool {
        self.visibility.is_watching(element)
    }

    /// Whether a button's pressed state is pending release.
    #[must_use]
    pub fn is_pressed(&self, button: ElementId) -> bool {
        self.buttons.get(&button).is_some_and(PressPulse::is_pressed)
    }

    /// Lift state of a card.
    #[must_use]
    pub fn pop_state(&self, card: ElementId) -> Option<PopState> {
        self.cards.get(&card).copied()
    }

    /// Chevron slide state of a card.
    #[must_use]
    pub fn chevron(&self, card: ElementId) -> Option<&ChevronSlide> {
        self.chevrons.get(&card)
    }

    /// A card's chevron offset in pixels at `now`.
    #[must_use]
    pub fn chevron_offset(&self, card: ElementId, now: Instant) -> Option<f64> {
        self.chevrons.get(&card).map(|slide| slide.offset_at(now))
    }

    /// Number of ripples still animating.
    #[must_use]
    pub fn live_ripples(&self) -> usize {
        self.ripples.len()
    }
}
