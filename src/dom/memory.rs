//! In-memory [`Document`] host.
//!
//! A small element tree with switchable [`Capabilities`]. It records every
//! observation, animation, and listener request so callers (tests, benches,
//! headless embedders) can inspect what the engine asked the page to do.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use selectors::attr::{
    AttrSelectorOperation, CaseSensitivity, NamespaceConstraint,
};
use selectors::matching::{ElementSelectorFlags, MatchingContext};
use selectors::{Element, OpaqueElement};

use super::selector::{CssIdent, CssString, HtmlSelectors, NoPseudo};
use super::{
    Capabilities, Document, DomError, ElementId, EventKind, Rect, Selector,
};
use crate::animation::{AnimationId, AnimationTiming, Keyframe};

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    style: BTreeMap<String, String>,
    computed: BTreeMap<String, String>,
    text: String,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    rect: Rect,
    image_complete: bool,
    attached: bool,
}

impl Node {
    fn new(tag: &str, parent: Option<ElementId>) -> Self {
        let mut computed = BTreeMap::new();
        let _ = computed.insert("position".to_owned(), "static".to_owned());
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            style: BTreeMap::new(),
            computed,
            text: String::new(),
            parent,
            children: Vec::new(),
            rect: Rect::default(),
            image_complete: true,
            attached: true,
        }
    }
}

/// Lifecycle of a recorded animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Started and neither cancelled nor finished.
    Running,
    /// Cancelled by the engine.
    Cancelled,
    /// Marked finished via [`MemoryDocument::finish_animation`].
    Finished,
}

/// An animation the engine started on a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRecord {
    /// Host handle returned to the engine.
    pub id: AnimationId,
    /// Animated element.
    pub element: ElementId,
    /// Keyframes as passed to [`Document::animate`].
    pub keyframes: Vec<Keyframe>,
    /// Timing as passed to [`Document::animate`].
    pub timing: AnimationTiming,
    /// Current lifecycle state.
    pub state: AnimationState,
    /// Whether the engine released its handle.
    pub released: bool,
}

/// In-memory element tree implementing [`Document`].
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    head: ElementId,
    body: ElementId,
    capabilities: Capabilities,
    observed: FxHashMap<ElementId, f32>,
    animations: Vec<AnimationRecord>,
    listeners: FxHashMap<ElementId, Vec<EventKind>>,
    fail_element_creation: bool,
}

impl MemoryDocument {
    /// An empty `<html><head/><body/></html>` document with every
    /// capability available.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capabilities(Capabilities::ALL)
    }

    /// An empty document with the given capabilities.
    #[must_use]
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        let html = ElementId::from_raw(0);
        let mut doc = Self {
            nodes: vec![Node::new("html", None)],
            head: ElementId::from_raw(1),
            body: ElementId::from_raw(2),
            capabilities,
            observed: FxHashMap::default(),
            animations: Vec::new(),
            listeners: FxHashMap::default(),
            fail_element_creation: false,
        };
        doc.head = doc.append(html, "head");
        doc.body = doc.append(html, "body");
        doc
    }

    /// The `<head>` element.
    #[must_use]
    pub fn head(&self) -> ElementId {
        self.head
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> ElementId {
        self.body
    }

    /// Replace the capability set.
    pub fn set_capabilities(&mut self, capabilities: Capabilities) {
        self.capabilities = capabilities;
    }

    /// Make [`Document::create_child`] fail, simulating a host error.
    pub fn set_element_creation_fails(&mut self, fails: bool) {
        self.fail_element_creation = fails;
    }

    // ── Building ─────────────────────────────────────────────────────────
    //
    // Builders and inspectors accept any `ElementId`. Handles this document
    // never issued read as empty, and writes to them are dropped.

    /// Append a new element under `parent`. An unknown `parent` yields a
    /// detached element.
    pub fn append(&mut self, parent: ElementId, tag: &str) -> ElementId {
        let id = ElementId::from_raw(
            u32::try_from(self.nodes.len()).unwrap_or(u32::MAX),
        );
        let mut node = Node::new(tag, Some(parent));
        match self.node_mut(parent) {
            Some(parent) => parent.children.push(id),
            None => {
                node.parent = None;
                node.attached = false;
            }
        }
        self.nodes.push(node);
        id
    }

    /// Append a new element carrying an `id` attribute.
    pub fn append_with_id(
        &mut self,
        parent: ElementId,
        tag: &str,
        id: &str,
    ) -> ElementId {
        let element = self.append(parent, tag);
        if let Some(node) = self.node_mut(element) {
            node.id = Some(id.to_owned());
        }
        element
    }

    /// Set the element's bounding box.
    pub fn set_rect(&mut self, element: ElementId, rect: Rect) {
        if let Some(node) = self.node_mut(element) {
            node.rect = rect;
        }
    }

    /// Set a computed style value reported by
    /// [`Document::computed_style`].
    pub fn set_computed(
        &mut self,
        element: ElementId,
        property: &str,
        value: &str,
    ) {
        if let Some(node) = self.node_mut(element) {
            let _ = node
                .computed
                .insert(property.to_owned(), value.to_owned());
        }
    }

    /// Set whether an image has finished loading.
    pub fn set_image_complete(&mut self, element: ElementId, complete: bool) {
        if let Some(node) = self.node_mut(element) {
            node.image_complete = complete;
        }
    }

    // ── Inspection ───────────────────────────────────────────────────────

    /// Whether this document issued `element`.
    #[must_use]
    pub fn contains(&self, element: ElementId) -> bool {
        self.node(element).is_some()
    }

    /// Class tokens in insertion order.
    #[must_use]
    pub fn classes(&self, element: ElementId) -> &[String] {
        self.node(element).map_or(&[], |node| node.classes.as_slice())
    }

    /// Inline style value.
    #[must_use]
    pub fn style(&self, element: ElementId, property: &str) -> Option<&str> {
        self.node(element)?.style.get(property).map(String::as_str)
    }

    /// Text content (style blocks hold their CSS here).
    #[must_use]
    pub fn text(&self, element: ElementId) -> &str {
        self.node(element).map_or("", |node| node.text.as_str())
    }

    /// Attached children in order.
    #[must_use]
    pub fn children(&self, element: ElementId) -> &[ElementId] {
        self.node(element).map_or(&[], |node| node.children.as_slice())
    }

    /// Whether the element is still attached.
    #[must_use]
    pub fn is_attached(&self, element: ElementId) -> bool {
        self.node(element).is_some_and(|node| node.attached)
    }

    /// Number of attached elements carrying the given `id` attribute.
    #[must_use]
    pub fn count_with_id(&self, id: &str) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.attached && node.id.as_deref() == Some(id))
            .count()
    }

    /// Threshold the element is observed at, if observed.
    #[must_use]
    pub fn observed_threshold(&self, element: ElementId) -> Option<f32> {
        self.observed.get(&element).copied()
    }

    /// Number of observed elements.
    #[must_use]
    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    /// Every animation started on `element`, oldest first.
    pub fn animations_on(
        &self,
        element: ElementId,
    ) -> impl Iterator<Item = &AnimationRecord> {
        self.animations
            .iter()
            .filter(move |record| record.element == element)
    }

    /// Animations on `element` still running.
    #[must_use]
    pub fn running_animations(&self, element: ElementId) -> usize {
        self.animations_on(element)
            .filter(|record| record.state == AnimationState::Running)
            .count()
    }

    /// Animations whose handle the engine still holds.
    #[must_use]
    pub fn held_animations(&self) -> usize {
        self.animations
            .iter()
            .filter(|record| {
                !record.released && record.state != AnimationState::Cancelled
            })
            .count()
    }

    /// Mark an animation finished.
    pub fn finish_animation(&mut self, id: AnimationId) {
        if let Some(record) = self.animation_mut(id) {
            record.state = AnimationState::Finished;
        }
    }

    /// Events currently listened for on `element`.
    #[must_use]
    pub fn listeners(&self, element: ElementId) -> &[EventKind] {
        self.listeners
            .get(&element)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of elements with at least one listener.
    #[must_use]
    pub fn listened_count(&self) -> usize {
        self.listeners.len()
    }

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes.get(element.index())
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(element.index())
    }

    fn animation_mut(&mut self, id: AnimationId) -> Option<&mut AnimationRecord> {
        self.animations.iter_mut().find(|record| record.id == id)
    }

    fn collect_matching(
        &self,
        element: ElementId,
        selector: &Selector,
        out: &mut Vec<ElementId>,
    ) {
        for &child in self.children(element) {
            if selector.matches(&MemoryElement::new(self, child)) {
                out.push(child);
            }
            self.collect_matching(child, selector, out);
        }
    }
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

// ── Selector matching ──

/// A [`MemoryDocument`] element as seen by the `selectors` matcher.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MemoryElement<'a> {
    document: &'a MemoryDocument,
    id: ElementId,
}

impl<'a> MemoryElement<'a> {
    pub(crate) fn new(document: &'a MemoryDocument, id: ElementId) -> Self {
        Self { document, id }
    }

    fn node(&self) -> Option<&'a Node> {
        self.document.node(self.id)
    }

    fn with_id(&self, id: ElementId) -> Self {
        Self::new(self.document, id)
    }

    /// Siblings including `self`, and `self`'s position among them.
    fn siblings(&self) -> Option<(&'a [ElementId], usize)> {
        let parent = self.node()?.parent?;
        let siblings = self.document.children(parent);
        let index = siblings.iter().position(|&id| id == self.id)?;
        Some((siblings, index))
    }

    fn tag(&self) -> &'a str {
        self.node().map_or("", |node| node.tag.as_str())
    }
}

impl Element for MemoryElement<'_> {
    type Impl = HtmlSelectors;

    fn opaque(&self) -> OpaqueElement {
        match self.node() {
            Some(node) => OpaqueElement::new(node),
            None => OpaqueElement::new(self.document),
        }
    }

    fn parent_element(&self) -> Option<Self> {
        self.node()?.parent.map(|parent| self.with_id(parent))
    }

    fn parent_node_is_shadow_root(&self) -> bool {
        false
    }

    fn containing_shadow_host(&self) -> Option<Self> {
        None
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        let (siblings, index) = self.siblings()?;
        let prev = siblings.get(index.checked_sub(1)?)?;
        Some(self.with_id(*prev))
    }

    fn next_sibling_element(&self) -> Option<Self> {
        let (siblings, index) = self.siblings()?;
        siblings.get(index + 1).map(|&next| self.with_id(next))
    }

    fn first_element_child(&self) -> Option<Self> {
        self.document
            .children(self.id)
            .first()
            .map(|&child| self.with_id(child))
    }

    fn is_pseudo_element(&self) -> bool {
        false
    }

    fn is_html_element_in_html_document(&self) -> bool {
        true
    }

    fn has_local_name(&self, name: &str) -> bool {
        self.tag().eq_ignore_ascii_case(name)
    }

    fn has_namespace(&self, _ns: &str) -> bool {
        true
    }

    fn is_same_type(&self, other: &Self) -> bool {
        self.tag() == other.tag()
    }

    fn attr_matches(
        &self,
        _ns: &NamespaceConstraint<&CssIdent>,
        local_name: &CssIdent,
        operation: &AttrSelectorOperation<&CssString>,
    ) -> bool {
        let Some(node) = self.node() else {
            return false;
        };
        match local_name.as_ref() {
            "id" => node.id.as_deref().is_some_and(|id| operation.eval_str(id)),
            "class" if !node.classes.is_empty() => {
                operation.eval_str(&node.classes.join(" "))
            }
            _ => false,
        }
    }

    fn match_non_ts_pseudo_class(
        &self,
        pc: &NoPseudo,
        _context: &mut MatchingContext<HtmlSelectors>,
    ) -> bool {
        match *pc {}
    }

    fn match_pseudo_element(
        &self,
        pe: &NoPseudo,
        _context: &mut MatchingContext<HtmlSelectors>,
    ) -> bool {
        match *pe {}
    }

    fn apply_selector_flags(&self, _flags: ElementSelectorFlags) {}

    fn is_link(&self) -> bool {
        false
    }

    fn is_html_slot_element(&self) -> bool {
        false
    }

    fn imported_part(&self, _name: &CssIdent) -> Option<CssIdent> {
        None
    }

    fn is_part(&self, _name: &CssIdent) -> bool {
        false
    }

    fn has_id(&self, id: &CssIdent, case: CaseSensitivity) -> bool {
        self.node()
            .and_then(|node| node.id.as_deref())
            .is_some_and(|own| case.eq(own.as_bytes(), id.as_ref().as_bytes()))
    }

    fn has_class(&self, name: &CssIdent, case: CaseSensitivity) -> bool {
        self.node().is_some_and(|node| {
            node.classes
                .iter()
                .any(|c| case.eq(c.as_bytes(), name.as_ref().as_bytes()))
        })
    }

    fn is_empty(&self) -> bool {
        self.node()
            .is_none_or(|node| node.children.is_empty() && node.text.is_empty())
    }

    fn is_root(&self) -> bool {
        self.id == ElementId::from_raw(0)
    }
}

impl Document for MemoryDocument {
    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn query_all(
        &self,
        scope: Option<ElementId>,
        selector: &Selector,
    ) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_matching(
            scope.unwrap_or(ElementId::from_raw(0)),
            selector,
            &mut out,
        );
        out
    }

    fn add_class(&mut self, element: ElementId, class: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_owned());
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(node) = self.node_mut(element) {
            node.classes.retain(|c| c != class);
        }
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.classes(element).iter().any(|c| c == class)
    }

    fn set_style(&mut self, element: ElementId, property: &str, value: &str) {
        if let Some(node) = self.node_mut(element) {
            let _ = node.style.insert(property.to_owned(), value.to_owned());
        }
    }

    fn bounding_rect(&self, element: ElementId) -> Rect {
        self.node(element).map_or_else(Rect::default, |node| node.rect)
    }

    fn computed_style(
        &self,
        element: ElementId,
        property: &str,
    ) -> Option<String> {
        if !self.capabilities.computed_style {
            return None;
        }
        self.node(element)?.computed.get(property).cloned()
    }

    fn is_image_complete(&self, element: ElementId) -> bool {
        self.node(element).is_none_or(|node| node.image_complete)
    }

    fn create_child(
        &mut self,
        parent: ElementId,
        tag: &str,
    ) -> Result<ElementId, DomError> {
        if self.fail_element_creation {
            return Err(DomError::Host("element creation failed".to_owned()));
        }
        if !self.is_attached(parent) {
            return Err(DomError::Detached(parent));
        }
        Ok(self.append(parent, tag))
    }

    fn remove(&mut self, element: ElementId) {
        let _ = self.listeners.remove(&element);
        let _ = self.observed.remove(&element);
        let Some(node) = self.node_mut(element) else {
            return;
        };
        node.attached = false;
        let parent = node.parent.take();
        if let Some(parent) = parent.and_then(|p| self.node_mut(p)) {
            parent.children.retain(|&child| child != element);
        }
    }

    fn has_element_with_id(&self, id: &str) -> bool {
        self.count_with_id(id) > 0
    }

    fn inject_style(&mut self, marker: &str, css: &str) -> Result<(), DomError> {
        let head = self.head;
        let style = self.append_with_id(head, "style", marker);
        if let Some(node) = self.node_mut(style) {
            css.clone_into(&mut node.text);
        }
        Ok(())
    }

    fn observe(
        &mut self,
        element: ElementId,
        threshold: f32,
    ) -> Result<(), DomError> {
        if !self.capabilities.intersection_observer {
            return Err(DomError::Unsupported("IntersectionObserver"));
        }
        let _ = self.observed.insert(element, threshold);
        Ok(())
    }

    fn unobserve(&mut self, element: ElementId) {
        let _ = self.observed.remove(&element);
    }

    fn animate(
        &mut self,
        element: ElementId,
        keyframes: &[Keyframe],
        timing: &AnimationTiming,
    ) -> Result<AnimationId, DomError> {
        if !self.capabilities.element_animation {
            return Err(DomError::Unsupported("Element.animate"));
        }
        let id = AnimationId::from_raw(self.animations.len() as u64);
        self.animations.push(AnimationRecord {
            id,
            element,
            keyframes: keyframes.to_vec(),
            timing: *timing,
            state: AnimationState::Running,
            released: false,
        });
        Ok(id)
    }

    fn cancel_animation(&mut self, animation: AnimationId) {
        if let Some(record) = self.animation_mut(animation) {
            if record.state == AnimationState::Running {
                record.state = AnimationState::Cancelled;
            }
        }
    }

    fn release_animation(&mut self, animation: AnimationId) {
        if let Some(record) = self.animation_mut(animation) {
            record.released = true;
        }
    }

    fn listen(&mut self, element: ElementId, events: &[EventKind]) {
        let registered = self.listeners.entry(element).or_default();
        for event in events {
            if !registered.contains(event) {
                registered.push(*event);
            }
        }
    }

    fn unlisten_all(&mut self, element: ElementId) {
        let _ = self.listeners.remove(&element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        s.parse().unwrap()
    }

    #[test]
    fn test_query_in_document_order() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let home = doc.append_with_id(body, "div", "Home_Desktop");
        let a = doc.append(home, "div");
        let nested = doc.append(a, "div");
        let b = doc.append(home, "div");

        let found = doc.query_all(None, &sel("#Home_Desktop > div"));
        assert_eq!(found, vec![a, b]);
        assert!(!found.contains(&nested));

        let scoped = doc.query_all(Some(a), &sel("div"));
        assert_eq!(scoped, vec![nested]);
    }

    #[test]
    fn test_removed_elements_are_not_queried() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let span = doc.append(body, "span");
        doc.listen(span, &[EventKind::AnimationEnd]);
        doc.observe(span, 0.5).unwrap();
        doc.remove(span);
        assert_eq!(doc.listened_count(), 0);
        assert_eq!(doc.observed_count(), 0);
        assert!(doc.query_all(None, &sel("span")).is_empty());
        assert!(!doc.is_attached(span));
        assert!(doc.create_child(span, "i").is_err());
    }

    #[test]
    fn test_class_mutation_is_idempotent() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        doc.add_class(body, "pop");
        doc.add_class(body, "pop");
        assert_eq!(doc.classes(body), ["pop".to_owned()]);
        doc.remove_class(body, "pop");
        assert!(!doc.has_class(body, "pop"));
    }

    #[test]
    fn test_capabilities_gate_primitives() {
        let mut doc = MemoryDocument::with_capabilities(Capabilities::NONE);
        let body = doc.body();
        assert_eq!(
            doc.observe(body, 0.1),
            Err(DomError::Unsupported("IntersectionObserver"))
        );
        assert!(doc
            .animate(body, &[], &AnimationTiming::default())
            .is_err());
        assert_eq!(doc.computed_style(body, "position"), None);
    }

    #[test]
    fn test_cancel_only_affects_running() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let id = doc
            .animate(body, &[], &AnimationTiming::default())
            .unwrap();
        doc.finish_animation(id);
        doc.cancel_animation(id);
        assert_eq!(
            doc.animations_on(body).next().map(|r| r.state),
            Some(AnimationState::Finished)
        );
    }

    #[test]
    fn test_foreign_handles_are_harmless() {
        let mut other = MemoryDocument::new();
        let mut deep = other.body();
        for _ in 0..20 {
            deep = other.append(deep, "div");
        }

        let mut doc = MemoryDocument::new();
        assert!(!doc.contains(deep));
        doc.set_rect(deep, Rect::new(0.0, 0.0, 10.0, 10.0));
        doc.set_computed(deep, "position", "absolute");
        doc.set_image_complete(deep, false);
        doc.add_class(deep, "pop");
        doc.remove(deep);

        assert!(doc.classes(deep).is_empty());
        assert!(doc.children(deep).is_empty());
        assert_eq!(doc.text(deep), "");
        assert_eq!(doc.style(deep, "opacity"), None);
        assert_eq!(doc.bounding_rect(deep), Rect::default());
        assert!(!doc.is_attached(deep));
        assert!(!doc.has_class(deep, "pop"));

        let orphan = doc.append_with_id(deep, "i", "orphan");
        assert!(doc.contains(orphan));
        assert!(!doc.is_attached(orphan));
        assert_eq!(doc.count_with_id("orphan"), 0);
        assert!(doc.create_child(deep, "i").is_err());
    }

    #[test]
    fn test_inject_style_creates_marked_block() {
        let mut doc = MemoryDocument::new();
        doc.inject_style("card-pop-styles", ".pop{}").unwrap();
        assert!(doc.has_element_with_id("card-pop-styles"));
        let style = doc.children(doc.head())[0];
        assert_eq!(doc.text(style), ".pop{}");
    }
}
