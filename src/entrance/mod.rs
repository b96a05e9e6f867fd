//! Entrance animations with a one-shot guarantee.
//!
//! Every revealable element is registered once as an [`AnimatableElement`].
//! Whatever triggers it (stagger timer, visibility crossing, image load, or
//! the no-observer fallback) ends in [`EntranceAnimator::reveal`], which
//! runs the entrance the first time and ignores every later call.

pub mod cascade;

use rustc_hash::FxHashMap;
use web_time::Duration;

pub use cascade::{
    apply_keyframe, CardParts, CascadeStep, CascadeTemplate, SpecOutcome,
    SubAnimationSpec,
};

use crate::dom::{Capabilities, Document, ElementId};

/// When an element's entrance is triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealGroup {
    /// Present at load; revealed on a stagger timer or visibility,
    /// whichever comes first.
    Immediate,
    /// Revealed once its resource has loaded.
    OnLoad,
    /// Revealed on first visibility only.
    Lazy,
}

/// How sub-animations are carried out, chosen once from [`Capabilities`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealStrategy {
    /// Hand keyframes to the host animation primitive.
    #[default]
    Animate,
    /// Write the end state to inline style.
    SetEndState,
}

impl RevealStrategy {
    /// Pick the strategy a host supports.
    #[must_use]
    pub const fn for_capabilities(capabilities: Capabilities) -> Self {
        if capabilities.element_animation {
            Self::Animate
        } else {
            Self::SetEndState
        }
    }
}

/// What a reveal does to the element.
#[derive(Debug, Clone, PartialEq)]
pub enum Entrance {
    /// Add a class; the stylesheet owns the transition.
    Class(String),
    /// Run sub-animations on descendants.
    Cascade(Vec<SubAnimationSpec>),
}

/// Entrance state for one element.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimatableElement {
    has_fired: bool,
    group: RevealGroup,
    stagger_index: usize,
    entrance: Entrance,
}

impl AnimatableElement {
    /// An element in the given group, not yet revealed.
    #[must_use]
    pub fn new(group: RevealGroup, entrance: Entrance) -> Self {
        Self {
            has_fired: false,
            group,
            stagger_index: 0,
            entrance,
        }
    }

    /// An [`RevealGroup::Immediate`] element at position `index`.
    #[must_use]
    pub fn immediate(index: usize, entrance: Entrance) -> Self {
        Self {
            stagger_index: index,
            ..Self::new(RevealGroup::Immediate, entrance)
        }
    }

    /// Whether the entrance has run.
    #[must_use]
    pub fn has_fired(&self) -> bool {
        self.has_fired
    }

    /// Trigger group.
    #[must_use]
    pub fn group(&self) -> RevealGroup {
        self.group
    }

    /// Position among the immediate group.
    #[must_use]
    pub fn stagger_index(&self) -> usize {
        self.stagger_index
    }

    /// The entrance to run.
    #[must_use]
    pub fn entrance(&self) -> &Entrance {
        &self.entrance
    }
}

/// Reveal delay for the immediate group: `base + step * index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stagger {
    /// Delay of the first element.
    pub base: Duration,
    /// Added per position.
    pub step: Duration,
}

impl Default for Stagger {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(80),
            step: Duration::from_millis(120),
        }
    }
}

impl Stagger {
    /// Delay for the element at `index`.
    #[must_use]
    pub fn delay_for(&self, index: usize) -> Duration {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.base.saturating_add(self.step.saturating_mul(index))
    }
}

/// Registry of revealable elements.
#[derive(Debug, Default)]
pub struct EntranceAnimator {
    elements: FxHashMap<ElementId, AnimatableElement>,
    strategy: RevealStrategy,
}

impl EntranceAnimator {
    /// An empty registry using `strategy`.
    #[must_use]
    pub fn new(strategy: RevealStrategy) -> Self {
        Self {
            elements: FxHashMap::default(),
            strategy,
        }
    }

    /// Current sub-animation strategy.
    #[must_use]
    pub fn strategy(&self) -> RevealStrategy {
        self.strategy
    }

    /// Replace the sub-animation strategy.
    pub fn set_strategy(&mut self, strategy: RevealStrategy) {
        self.strategy = strategy;
    }

    /// Register an element. Returns `false` (keeping the first
    /// registration) if it is already known.
    pub fn register(
        &mut self,
        element: ElementId,
        state: AnimatableElement,
    ) -> bool {
        if self.elements.contains_key(&element) {
            return false;
        }
        let _ = self.elements.insert(element, state);
        true
    }

    /// Run the element's entrance unless it already ran. Returns whether
    /// this call did the reveal.
    pub fn reveal<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        element: ElementId,
    ) -> bool {
        let strategy = self.strategy;
        let Some(state) = self.elements.get_mut(&element) else {
            return false;
        };
        if state.has_fired {
            return false;
        }
        state.has_fired = true;

        match &state.entrance {
            Entrance::Class(class) => document.add_class(element, class),
            Entrance::Cascade(specs) => {
                for spec in specs {
                    let _ = spec.run(document, strategy);
                }
            }
        }
        log::trace!("revealed {element} ({:?})", state.group);
        true
    }

    /// Whether the element's entrance has run.
    #[must_use]
    pub fn is_revealed(&self, element: ElementId) -> bool {
        self.elements.get(&element).is_some_and(|s| s.has_fired)
    }

    /// State of a registered element.
    #[must_use]
    pub fn get(&self, element: ElementId) -> Option<&AnimatableElement> {
        self.elements.get(&element)
    }

    /// Registered elements in `group`, in no particular order.
    pub fn in_group(
        &self,
        group: RevealGroup,
    ) -> impl Iterator<Item = ElementId> + '_ {
        self.elements
            .iter()
            .filter(move |(_, s)| s.group == group)
            .map(|(&id, _)| id)
    }

    /// Number of registered elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Forget every element.
    pub fn clear(&mut self) {
        self.elements.clear();
    }
}
