//! Transient interaction states layered over entrance state.
//!
//! Each behavior keeps its own per-element record, keyed by element in the
//! engine: [`PressPulse`] and ripples for buttons, [`PopState`] for cards,
//! [`ChevronSlide`] for a card's button+chevron pair. None of them touch
//! entrance classes, so hover and press never disturb a reveal.

pub mod chevron;
pub mod pop;
pub mod press;
pub mod ripple;

pub use chevron::{ChevronAnimation, ChevronConfig, ChevronSlide, SlideDirection};
pub use pop::{PopConfig, PopState};
pub use press::{PressConfig, PressPulse};
pub use ripple::{
    ColorParseError, Rgb, RippleColor, RippleGeometry, RippleLayer,
};

use crate::animation::EasingFunction;
use crate::dom::EventKind;

/// Events delivered to every button.
pub const BUTTON_EVENTS: &[EventKind] = &[EventKind::Click, EventKind::KeyDown];

/// Events delivered to every card.
pub const CARD_EVENTS: &[EventKind] = &[
    EventKind::PointerEnter,
    EventKind::PointerLeave,
    EventKind::FocusIn,
    EventKind::FocusOut,
    EventKind::TouchStart,
    EventKind::TouchEnd,
];

/// Events delivered to a card button that drives a chevron.
pub const CHEVRON_TRIGGER_EVENTS: &[EventKind] = &[
    EventKind::MouseEnter,
    EventKind::MouseLeave,
    EventKind::Focus,
    EventKind::Blur,
];

/// Settings for every interaction behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionConfig {
    /// Press pulse.
    pub press: PressConfig,
    /// Class for ripple elements.
    pub ripple_class: String,
    /// Card lift.
    pub pop: PopConfig,
    /// Curve of the card lift transition.
    pub easing: EasingFunction,
    /// Chevron slide.
    pub chevron: ChevronConfig,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            press: PressConfig::default(),
            ripple_class: "ripple-effect".to_owned(),
            pop: PopConfig::default(),
            easing: EasingFunction::STANDARD,
            chevron: ChevronConfig::default(),
        }
    }
}
