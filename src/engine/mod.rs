//! [`GlintEngine`]: binds the entrance animator, visibility observer, and
//! interaction state machines to one document.

mod accessors;
pub mod config;
mod dispatch;
mod lifecycle;

pub use config::{EngineConfig, SelectorSet};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::animation::TimerQueue;
use crate::dom::{Document, ElementId, EventKind};
use crate::entrance::{EntranceAnimator, RevealStrategy};
use crate::error::GlintError;
use crate::interaction::{ChevronSlide, PopState, PressPulse, RippleLayer};
use crate::options::Options;
use crate::visibility::VisibilityObserver;

/// The entrance and micro-interaction engine for one document.
///
/// Owns every per-element state record and the timer queue. The host
/// drives it with three calls, each taking the current time explicitly:
///
/// - [`handle_event`](Self::handle_event) for DOM events on listened
///   elements
/// - [`handle_intersection`](Self::handle_intersection) for visibility
///   ratios of observed elements
/// - [`advance`](Self::advance) when [`next_deadline`](Self::next_deadline)
///   has passed
///
/// # Lifecycle
///
/// [`init`](Self::init) discovers elements under the root selector, picks
/// strategies from the host's [`Capabilities`](crate::dom::Capabilities),
/// and attaches listeners and observers. It runs once; later calls are
/// no-ops until [`teardown`](Self::teardown) releases everything.
pub struct GlintEngine<D: Document> {
    document: D,
    config: EngineConfig,
    active: bool,
    root: Option<ElementId>,
    strategy: RevealStrategy,
    timers: TimerQueue,
    visibility: VisibilityObserver<ElementId>,
    entrance: EntranceAnimator,
    /// Press state per button.
    buttons: FxHashMap<ElementId, PressPulse>,
    /// Lift state per card.
    cards: FxHashMap<ElementId, PopState>,
    /// Chevron slide per card.
    chevrons: FxHashMap<ElementId, ChevronSlide>,
    /// Card button → owning card, for buttons that drive a chevron.
    chevron_triggers: FxHashMap<ElementId, ElementId>,
    ripples: RippleLayer,
    listened: FxHashSet<ElementId>,
}

impl<D: Document> GlintEngine<D> {
    /// Bind an engine to `document`. Nothing is touched until
    /// [`init`](Self::init).
    ///
    /// # Errors
    ///
    /// Returns [`GlintError`] if the options do not validate.
    pub fn new(document: D, options: &Options) -> Result<Self, GlintError> {
        Ok(Self::with_config(document, EngineConfig::from_options(options)?))
    }

    /// Bind an engine to `document` with an already validated config.
    pub fn with_config(document: D, config: EngineConfig) -> Self {
        let ripples = RippleLayer::new(config.interaction.ripple_class.clone());
        Self {
            document,
            config,
            active: false,
            root: None,
            strategy: RevealStrategy::default(),
            timers: TimerQueue::new(),
            visibility: VisibilityObserver::new(false),
            entrance: EntranceAnimator::default(),
            buttons: FxHashMap::default(),
            cards: FxHashMap::default(),
            chevrons: FxHashMap::default(),
            chevron_triggers: FxHashMap::default(),
            ripples,
            listened: FxHashSet::default(),
        }
    }

    /// Ask the host for `events` on `element`, remembering it for teardown.
    fn listen(&mut self, element: ElementId, events: &[EventKind]) {
        self.document.listen(element, events);
        let _ = self.listened.insert(element);
    }
}

impl<D: Document + std::fmt::Debug> std::fmt::Debug for GlintEngine<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlintEngine")
            .field("document", &self.document)
            .field("active", &self.active)
            .field("root", &self.root)
            .field("strategy", &self.strategy)
            .field("pending_timers", &self.timers.len())
            .field("revealable", &self.entrance.len())
            .field("buttons", &self.buttons.len())
            .field("cards", &self.cards.len())
            .finish_non_exhaustive()
    }
}
