//! Host document abstraction.
//!
//! The engine never touches a concrete page. Everything it needs from the
//! host (element queries, class and style mutation, optional observation and
//! animation primitives) goes through the [`Document`] trait, so the same
//! orchestration code drives a browser page (`web` feature) or the
//! in-memory [`MemoryDocument`](memory::MemoryDocument) used by tests.

#[cfg(any(feature = "web", test))]
pub(crate) mod handles;
pub mod memory;
pub mod selector;

use std::fmt;

pub use memory::MemoryDocument;
pub use selector::{Selector, SelectorError};

use crate::animation::{AnimationId, AnimationTiming, Keyframe};

/// Opaque handle to an element owned by a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    /// Wrap a host-assigned raw handle.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw handle value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point in viewport (client) coordinates, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Construct a point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An element's bounding box in viewport coordinates, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Box width.
    pub width: f64,
    /// Box height.
    pub height: f64,
}

impl Rect {
    /// Construct a rect from its origin and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The larger of the two dimensions.
    #[must_use]
    pub fn max_extent(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Optional host primitives, detected once when the engine initializes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Viewport intersection detection (`IntersectionObserver`).
    pub intersection_observer: bool,
    /// Element-level keyframe animation (`Element.animate`).
    pub element_animation: bool,
    /// Computed style retrieval (`getComputedStyle`).
    pub computed_style: bool,
}

impl Capabilities {
    /// Every optional primitive available.
    pub const ALL: Self = Self {
        intersection_observer: true,
        element_animation: true,
        computed_style: true,
    };

    /// No optional primitive available.
    pub const NONE: Self = Self {
        intersection_observer: false,
        element_animation: false,
        computed_style: false,
    };
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::ALL
    }
}

/// The DOM events the engine can ask a host to deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// `click`
    Click,
    /// `keydown`
    KeyDown,
    /// `pointerenter`
    PointerEnter,
    /// `pointerleave`
    PointerLeave,
    /// `focusin` (capture phase)
    FocusIn,
    /// `focusout` (capture phase)
    FocusOut,
    /// `touchstart` (passive)
    TouchStart,
    /// `touchend`
    TouchEnd,
    /// `mouseenter`
    MouseEnter,
    /// `mouseleave`
    MouseLeave,
    /// `focus` (capture phase)
    Focus,
    /// `blur` (capture phase)
    Blur,
    /// `load`
    Load,
    /// `animationend`
    AnimationEnd,
}

impl EventKind {
    /// DOM event type name.
    #[must_use]
    pub const fn dom_name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::PointerEnter => "pointerenter",
            Self::PointerLeave => "pointerleave",
            Self::FocusIn => "focusin",
            Self::FocusOut => "focusout",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::MouseEnter => "mouseenter",
            Self::MouseLeave => "mouseleave",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Load => "load",
            Self::AnimationEnd => "animationend",
        }
    }

    /// Whether the listener should be registered for the capture phase.
    #[must_use]
    pub const fn capture(self) -> bool {
        matches!(self, Self::FocusIn | Self::FocusOut | Self::Focus | Self::Blur)
    }

    /// Whether the listener never calls `preventDefault`.
    #[must_use]
    pub const fn passive(self) -> bool {
        matches!(self, Self::TouchStart)
    }
}

/// Keys the press feedback cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// `Enter`
    Enter,
    /// The space bar (`" "`).
    Space,
    /// Anything else.
    Other,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Self {
        match key {
            "Enter" => Self::Enter,
            " " | "Spacebar" => Self::Space,
            _ => Self::Other,
        }
    }

    /// Whether this key activates a focused button.
    #[must_use]
    pub const fn activates(self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// An input event delivered by the host to a listened element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer activation at a client position.
    Click {
        /// Client coordinates of the pointer.
        point: Point,
    },
    /// Key pressed while the element has focus.
    KeyDown {
        /// The pressed key.
        key: Key,
    },
    /// Pointer entered the element.
    PointerEnter,
    /// Pointer left the element.
    PointerLeave,
    /// Focus moved into the element or a descendant.
    FocusIn,
    /// Focus moved out of the element or a descendant.
    FocusOut,
    /// A touch began on the element.
    TouchStart,
    /// A touch on the element ended.
    TouchEnd,
    /// Mouse entered the element.
    MouseEnter,
    /// Mouse left the element.
    MouseLeave,
    /// The element received focus.
    Focus,
    /// The element lost focus.
    Blur,
    /// The element's resource finished loading.
    Load,
    /// A CSS animation on the element completed.
    AnimationEnd,
}

impl InputEvent {
    /// The listener kind that delivers this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Click { .. } => EventKind::Click,
            Self::KeyDown { .. } => EventKind::KeyDown,
            Self::PointerEnter => EventKind::PointerEnter,
            Self::PointerLeave => EventKind::PointerLeave,
            Self::FocusIn => EventKind::FocusIn,
            Self::FocusOut => EventKind::FocusOut,
            Self::TouchStart => EventKind::TouchStart,
            Self::TouchEnd => EventKind::TouchEnd,
            Self::MouseEnter => EventKind::MouseEnter,
            Self::MouseLeave => EventKind::MouseLeave,
            Self::Focus => EventKind::Focus,
            Self::Blur => EventKind::Blur,
            Self::Load => EventKind::Load,
            Self::AnimationEnd => EventKind::AnimationEnd,
        }
    }
}

/// Failure reported by a host primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The primitive does not exist in this host.
    Unsupported(&'static str),
    /// The element is no longer attached to the document.
    Detached(ElementId),
    /// The host raised an error.
    Host(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsupported(what) => write!(f, "{what} is not supported"),
            Self::Detached(id) => write!(f, "element {id} is detached"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for DomError {}

/// Everything the engine consumes from a rendered page.
///
/// Mutations that cannot meaningfully fail (class and inline style edits)
/// are infallible; hosts swallow their own errors there. Optional
/// primitives return [`DomError`] so callers can fall back locally.
pub trait Document {
    /// Optional primitives this host provides.
    fn capabilities(&self) -> Capabilities;

    /// All elements under `scope` (the whole document when `None`)
    /// matching `selector`, in document order.
    fn query_all(
        &self,
        scope: Option<ElementId>,
        selector: &Selector,
    ) -> Vec<ElementId>;

    /// First element under `scope` matching `selector`.
    fn query_first(
        &self,
        scope: Option<ElementId>,
        selector: &Selector,
    ) -> Option<ElementId> {
        self.query_all(scope, selector).into_iter().next()
    }

    /// Add a class token. No-op if already present.
    fn add_class(&mut self, element: ElementId, class: &str);

    /// Remove a class token. No-op if absent.
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Whether the element carries a class token.
    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Set an inline style property.
    fn set_style(&mut self, element: ElementId, property: &str, value: &str);

    /// The element's bounding box in client coordinates.
    fn bounding_rect(&self, element: ElementId) -> Rect;

    /// Resolved computed style value, or `None` if unavailable.
    fn computed_style(&self, element: ElementId, property: &str)
        -> Option<String>;

    /// Whether an image element has finished loading. Non-images report
    /// `true`.
    fn is_image_complete(&self, element: ElementId) -> bool;

    /// Create and append a new child element.
    fn create_child(
        &mut self,
        parent: ElementId,
        tag: &str,
    ) -> Result<ElementId, DomError>;

    /// Detach an element from the document and forget its listeners,
    /// observation, and animation handles. The handle is dead afterwards.
    fn remove(&mut self, element: ElementId);

    /// Whether any element carries the given `id` attribute.
    fn has_element_with_id(&self, id: &str) -> bool;

    /// Append a `<style id=marker>` block holding `css` to the head.
    fn inject_style(&mut self, marker: &str, css: &str) -> Result<(), DomError>;

    /// Start delivering intersection ratios for `element`.
    fn observe(&mut self, element: ElementId, threshold: f32)
        -> Result<(), DomError>;

    /// Stop delivering intersection ratios for `element`.
    fn unobserve(&mut self, element: ElementId);

    /// Run a keyframe animation on `element`.
    fn animate(
        &mut self,
        element: ElementId,
        keyframes: &[Keyframe],
        timing: &AnimationTiming,
    ) -> Result<AnimationId, DomError>;

    /// Cancel a running animation, dropping its effect.
    fn cancel_animation(&mut self, animation: AnimationId);

    /// Forget an animation that will never be cancelled. It keeps running
    /// and its fill stays in effect; the handle becomes invalid.
    fn release_animation(&mut self, animation: AnimationId);

    /// Deliver the given events for `element` to the engine.
    fn listen(&mut self, element: ElementId, events: &[EventKind]);

    /// Stop delivering every event for `element`.
    fn unlisten_all(&mut self, element: ElementId);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("Enter"), Key::Enter);
        assert_eq!(Key::from_dom(" "), Key::Space);
        assert_eq!(Key::from_dom("a"), Key::Other);
        assert!(Key::Space.activates());
        assert!(!Key::Other.activates());
    }

    #[test]
    fn test_event_kind_phases() {
        assert!(EventKind::FocusIn.capture());
        assert!(EventKind::Blur.capture());
        assert!(!EventKind::Click.capture());
        assert!(EventKind::TouchStart.passive());
        assert!(!EventKind::TouchEnd.passive());
    }

    #[test]
    fn test_input_event_kind() {
        let click = InputEvent::Click {
            point: Point::new(1.0, 2.0),
        };
        assert_eq!(click.kind(), EventKind::Click);
        assert_eq!(InputEvent::Blur.kind(), EventKind::Blur);
    }

    #[test]
    fn test_rect_max_extent() {
        assert_eq!(Rect::new(0.0, 0.0, 100.0, 40.0).max_extent(), 100.0);
        assert_eq!(Rect::new(0.0, 0.0, 30.0, 90.0).max_extent(), 90.0);
    }
}
