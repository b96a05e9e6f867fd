//! [`Document`] over a live browser page.
//!
//! Elements are interned on first sight: each gets a `data-glint-id`
//! attribute holding its [`ElementId`], so intersection entries (which
//! only carry the target element) can be mapped back. Removing an element
//! through [`Document::remove`] forgets it, along with its listeners,
//! observation and animation handles.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Object, Reflect};
use rustc_hash::FxHashMap;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Element, Event, HtmlElement, HtmlImageElement,
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
    KeyboardEvent, MouseEvent,
};

use super::{Inbound, Inbox};
use crate::animation::{AnimationId, AnimationTiming, Keyframe};
use crate::dom::handles::HandleMap;
use crate::dom::{
    Capabilities, Document, DomError, ElementId, EventKind, InputEvent, Key,
    Point, Rect, Selector,
};

const ID_ATTRIBUTE: &str = "data-glint-id";

// `Element.animate` and the returned `Animation`, bound directly so the
// crate does not depend on web-sys's unstable animation API surface.
#[wasm_bindgen]
extern "C" {
    type WebAnimation;

    #[wasm_bindgen(method)]
    fn cancel(this: &WebAnimation);

    #[wasm_bindgen(method, catch, js_name = "animate")]
    fn animate_element(
        this: &Element,
        keyframes: &Array,
        options: &Object,
    ) -> Result<WebAnimation, JsValue>;
}

type EventClosure = Closure<dyn FnMut(Event)>;
type IntersectionClosure = Closure<dyn FnMut(Array)>;

struct Listener {
    kind: EventKind,
    closure: EventClosure,
}

/// An animation handle the engine may still cancel.
struct TrackedAnimation {
    element: ElementId,
    animation: WebAnimation,
}

/// One `IntersectionObserver` per distinct threshold.
struct ThresholdObserver {
    observer: IntersectionObserver,
    _callback: IntersectionClosure,
}

/// A browser page seen through the [`Document`] trait.
pub struct WebDocument {
    window: web_sys::Window,
    document: web_sys::Document,
    inbox: Rc<Inbox>,
    elements: RefCell<HandleMap<Element>>,
    listeners: FxHashMap<ElementId, Vec<Listener>>,
    observers: FxHashMap<u32, ThresholdObserver>,
    observed: FxHashMap<ElementId, u32>,
    animations: FxHashMap<AnimationId, TrackedAnimation>,
    next_animation: u64,
}

impl WebDocument {
    /// Wrap a page. Events and intersections are posted to `inbox`.
    pub(crate) fn new(
        window: web_sys::Window,
        document: web_sys::Document,
        inbox: Rc<Inbox>,
    ) -> Self {
        Self {
            window,
            document,
            inbox,
            elements: RefCell::new(HandleMap::new()),
            listeners: FxHashMap::default(),
            observers: FxHashMap::default(),
            observed: FxHashMap::default(),
            animations: FxHashMap::default(),
            next_animation: 0,
        }
    }

    /// The element behind a handle.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id).cloned()
    }

    /// Handle for a page element, interning it on first sight.
    pub fn intern(&self, element: &Element) -> ElementId {
        if let Some(id) = self.known(element) {
            return id;
        }
        let id = self.elements.borrow_mut().insert(element.clone());
        let _ = element.set_attribute(ID_ATTRIBUTE, &id.raw().to_string());
        id
    }

    /// Handle for an element interned before. Clones made with
    /// `cloneNode` carry the attribute but are not the same element.
    fn known(&self, element: &Element) -> Option<ElementId> {
        lookup(element).filter(|&id| {
            self.elements.borrow().get(id) == Some(element)
        })
    }

    fn html(&self, id: ElementId) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn observer_for(
        &mut self,
        threshold: f32,
    ) -> Result<&IntersectionObserver, DomError> {
        let key = threshold.to_bits();
        if !self.observers.contains_key(&key) {
            let inbox = Rc::clone(&self.inbox);
            let callback = IntersectionClosure::new(move |entries: Array| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>()
                    else {
                        continue;
                    };
                    let Some(element) = lookup(&entry.target()) else {
                        continue;
                    };
                    #[expect(
                        clippy::cast_possible_truncation,
                        reason = "intersection ratios lie in [0, 1]"
                    )]
                    let ratio = entry.intersection_ratio() as f32;
                    inbox.push(Inbound::Intersection {
                        element,
                        ratio,
                        intersecting: entry.is_intersecting(),
                    });
                }
            });

            let init = Object::new();
            let _ = Reflect::set(
                &init,
                &"threshold".into(),
                &JsValue::from_f64(f64::from(threshold)),
            );
            let observer = IntersectionObserver::new_with_options(
                callback.as_ref().unchecked_ref(),
                init.unchecked_ref::<IntersectionObserverInit>(),
            )
            .map_err(host_error)?;
            let _ = self.observers.insert(
                key,
                ThresholdObserver {
                    observer,
                    _callback: callback,
                },
            );
        }
        self.observers
            .get(&key)
            .map(|entry| &entry.observer)
            .ok_or(DomError::Unsupported("IntersectionObserver"))
    }

    fn add_listener(&mut self, element: ElementId, kind: EventKind) {
        let Some(target) = self.element(element) else {
            return;
        };
        let inbox = Rc::clone(&self.inbox);
        let closure = EventClosure::new(move |event: Event| {
            inbox.push(Inbound::Event {
                element,
                event: input_event(kind, &event),
            });
        });

        let options = Object::new();
        let _ =
            Reflect::set(&options, &"capture".into(), &kind.capture().into());
        let _ =
            Reflect::set(&options, &"passive".into(), &kind.passive().into());
        let added = target
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind.dom_name(),
                closure.as_ref().unchecked_ref(),
                options.unchecked_ref::<AddEventListenerOptions>(),
            );
        if let Err(e) = added {
            log::trace!(
                "glint: {} listener on {element} failed: {e:?}",
                kind.dom_name()
            );
            return;
        }
        self.listeners
            .entry(element)
            .or_default()
            .push(Listener { kind, closure });
    }
}

impl Document for WebDocument {
    fn capabilities(&self) -> Capabilities {
        let window: &JsValue = self.window.as_ref();
        let has = |target: &JsValue, name: &str| {
            Reflect::has(target, &name.into()).unwrap_or(false)
        };
        let element_animation = self
            .document
            .document_element()
            .is_some_and(|root| has(root.as_ref(), "animate"));
        Capabilities {
            intersection_observer: has(window, "IntersectionObserver"),
            element_animation,
            computed_style: has(window, "getComputedStyle"),
        }
    }

    fn query_all(
        &self,
        scope: Option<ElementId>,
        selector: &Selector,
    ) -> Vec<ElementId> {
        let css = selector.to_string();
        let found = match scope.and_then(|id| self.element(id)) {
            Some(scope) => scope.query_selector_all(&css),
            None => self.document.query_selector_all(&css),
        };
        let Ok(nodes) = found else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.intern(&element))
            .collect()
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(el) = self.element(element) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(el) = self.element(element) {
            let _ = el.class_list().remove_1(class);
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.element(element)
            .is_some_and(|el| el.class_list().contains(class))
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(el) = self.html(element) {
            let _ = el.style().set_property(property, value);
        }
    }

    fn bounding_rect(&self, element: ElementId) -> Rect {
        self.element(element).map_or_else(Rect::default, |el| {
            let rect = el.get_bounding_client_rect();
            Rect::new(rect.x(), rect.y(), rect.width(), rect.height())
        })
    }

    fn computed_style(
        &self,
        element: ElementId,
        property: &str,
    ) -> Option<String> {
        let el = self.element(element)?;
        let style = self.window.get_computed_style(&el).ok()??;
        style
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn is_image_complete(&self, element: ElementId) -> bool {
        self.element(element)
            .and_then(|el| el.dyn_into::<HtmlImageElement>().ok())
            .is_none_or(|image| image.complete())
    }

    fn create_child(
        &mut self,
        parent: ElementId,
        tag: &str,
    ) -> Result<ElementId, DomError> {
        let parent_el =
            self.element(parent).ok_or(DomError::Detached(parent))?;
        let child = self.document.create_element(tag).map_err(host_error)?;
        let _ = parent_el.append_child(&child).map_err(host_error)?;
        Ok(self.intern(&child))
    }

    fn remove(&mut self, element: ElementId) {
        self.unobserve(element);
        self.unlisten_all(element);
        self.animations
            .retain(|_, tracked| tracked.element != element);
        if let Some(el) = self.elements.get_mut().remove(element) {
            let _ = el.remove_attribute(ID_ATTRIBUTE);
            el.remove();
        }
    }

    fn has_element_with_id(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn inject_style(&mut self, marker: &str, css: &str) -> Result<(), DomError> {
        let head = self
            .document
            .head()
            .ok_or(DomError::Host("document has no head".to_owned()))?;
        let style = self.document.create_element("style").map_err(host_error)?;
        style.set_id(marker);
        style.set_text_content(Some(css));
        let _ = head.append_child(&style).map_err(host_error)?;
        Ok(())
    }

    fn observe(
        &mut self,
        element: ElementId,
        threshold: f32,
    ) -> Result<(), DomError> {
        let target =
            self.element(element).ok_or(DomError::Detached(element))?;
        self.observer_for(threshold)?.observe(&target);
        let _ = self.observed.insert(element, threshold.to_bits());
        Ok(())
    }

    fn unobserve(&mut self, element: ElementId) {
        let Some(key) = self.observed.remove(&element) else {
            return;
        };
        if let (Some(target), Some(entry)) =
            (self.element(element), self.observers.get(&key))
        {
            entry.observer.unobserve(&target);
        }
    }

    fn animate(
        &mut self,
        element: ElementId,
        keyframes: &[Keyframe],
        timing: &AnimationTiming,
    ) -> Result<AnimationId, DomError> {
        let target = self.element(element).ok_or(DomError::Detached(element))?;
        let frames: Array = keyframes.iter().map(keyframe_object).collect();
        let animation = target
            .animate_element(&frames, &timing_object(timing))
            .map_err(host_error)?;

        let id = AnimationId::from_raw(self.next_animation);
        self.next_animation += 1;
        let _ = self
            .animations
            .insert(id, TrackedAnimation { element, animation });
        Ok(id)
    }

    fn cancel_animation(&mut self, animation: AnimationId) {
        if let Some(tracked) = self.animations.remove(&animation) {
            tracked.animation.cancel();
        }
    }

    fn release_animation(&mut self, animation: AnimationId) {
        let _ = self.animations.remove(&animation);
    }

    fn listen(&mut self, element: ElementId, events: &[EventKind]) {
        for &kind in events {
            let present = self
                .listeners
                .get(&element)
                .is_some_and(|list| list.iter().any(|l| l.kind == kind));
            if !present {
                self.add_listener(element, kind);
            }
        }
    }

    fn unlisten_all(&mut self, element: ElementId) {
        let Some(listeners) = self.listeners.remove(&element) else {
            return;
        };
        let Some(target) = self.element(element) else {
            return;
        };
        for Listener { kind, closure } in listeners {
            let _ = target.remove_event_listener_with_callback_and_bool(
                kind.dom_name(),
                closure.as_ref().unchecked_ref(),
                kind.capture(),
            );
        }
    }
}

impl std::fmt::Debug for WebDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDocument")
            .field("elements", &self.elements.borrow().len())
            .field("listened", &self.listeners.len())
            .field("observed", &self.observed.len())
            .field("animations", &self.animations.len())
            .finish_non_exhaustive()
    }
}

// ── Conversions ──

fn lookup(element: &Element) -> Option<ElementId> {
    element
        .get_attribute(ID_ATTRIBUTE)?
        .parse()
        .ok()
        .map(ElementId::from_raw)
}

fn host_error(value: JsValue) -> DomError {
    DomError::Host(
        value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}")),
    )
}

fn input_event(kind: EventKind, event: &Event) -> InputEvent {
    match kind {
        EventKind::Click => {
            let point = event.dyn_ref::<MouseEvent>().map_or_else(
                Point::default,
                |mouse| {
                    Point::new(
                        f64::from(mouse.client_x()),
                        f64::from(mouse.client_y()),
                    )
                },
            );
            InputEvent::Click { point }
        }
        EventKind::KeyDown => InputEvent::KeyDown {
            key: event
                .dyn_ref::<KeyboardEvent>()
                .map_or(Key::Other, |keyboard| Key::from_dom(&keyboard.key())),
        },
        EventKind::PointerEnter => InputEvent::PointerEnter,
        EventKind::PointerLeave => InputEvent::PointerLeave,
        EventKind::FocusIn => InputEvent::FocusIn,
        EventKind::FocusOut => InputEvent::FocusOut,
        EventKind::TouchStart => InputEvent::TouchStart,
        EventKind::TouchEnd => InputEvent::TouchEnd,
        EventKind::MouseEnter => InputEvent::MouseEnter,
        EventKind::MouseLeave => InputEvent::MouseLeave,
        EventKind::Focus => InputEvent::Focus,
        EventKind::Blur => InputEvent::Blur,
        EventKind::Load => InputEvent::Load,
        EventKind::AnimationEnd => InputEvent::AnimationEnd,
    }
}

fn keyframe_object(keyframe: &Keyframe) -> JsValue {
    let frame = Object::new();
    if let Some(opacity) = keyframe.opacity {
        let _ = Reflect::set(&frame, &"opacity".into(), &opacity.into());
    }
    let _ = Reflect::set(
        &frame,
        &"transform".into(),
        &keyframe.transform.to_string().into(),
    );
    frame.into()
}

fn timing_object(timing: &AnimationTiming) -> Object {
    let options = Object::new();
    let millis = |d: web_time::Duration| d.as_secs_f64() * 1000.0;
    let fields: [(&str, JsValue); 4] = [
        ("duration", millis(timing.duration).into()),
        ("delay", millis(timing.delay).into()),
        ("easing", timing.easing.to_css().into()),
        ("fill", timing.fill.as_str().into()),
    ];
    for (key, value) in fields {
        let _ = Reflect::set(&options, &key.into(), &value);
    }
    options
}
