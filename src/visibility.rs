//! One-shot viewport visibility detection.
//!
//! [`VisibilityObserver`] wraps the host's intersection primitive. Each
//! registered element carries a trigger value that is handed back at most
//! once: the first intersecting notification at its threshold deregisters
//! it.

use rustc_hash::FxHashMap;

use crate::dom::{Document, ElementId};

/// Slack below the threshold still counted as reaching it. Hosts report the
/// crossing entry with a ratio that can fall fractionally short.
pub const THRESHOLD_TOLERANCE: f32 = 1e-3;

/// Outcome of [`VisibilityObserver::observe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    /// The element is being watched.
    Watching,
    /// No intersection primitive; the caller must reveal the element now.
    Unavailable,
}

/// Tracks which elements wait for their first visibility crossing.
#[derive(Debug)]
pub struct VisibilityObserver<T> {
    available: bool,
    watched: FxHashMap<ElementId, Watch<T>>,
}

#[derive(Debug)]
struct Watch<T> {
    threshold: f32,
    trigger: T,
}

impl<T: Copy> VisibilityObserver<T> {
    /// An observer backed by an intersection primitive when `available`.
    #[must_use]
    pub fn new(available: bool) -> Self {
        Self {
            available,
            watched: FxHashMap::default(),
        }
    }

    /// Whether the host provides intersection detection.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Register `element` for a one-shot `trigger` once its visible
    /// fraction reaches `threshold`. Re-registering a watched element keeps
    /// the original registration.
    ///
    /// Never fails: without the primitive (or if the host rejects the
    /// registration) this is a no-op returning
    /// [`Observation::Unavailable`].
    pub fn observe<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        element: ElementId,
        threshold: f32,
        trigger: T,
    ) -> Observation {
        if !self.available {
            return Observation::Unavailable;
        }
        if self.watched.contains_key(&element) {
            return Observation::Watching;
        }
        match document.observe(element, threshold) {
            Ok(()) => {
                let _ = self
                    .watched
                    .insert(element, Watch { threshold, trigger });
                Observation::Watching
            }
            Err(e) => {
                log::trace!("observe {element} rejected: {e}");
                Observation::Unavailable
            }
        }
    }

    /// Feed an intersection entry. Returns the trigger exactly once per
    /// registration: the first time the element is intersecting with
    /// `ratio` within [`THRESHOLD_TOLERANCE`] of the threshold or above.
    pub fn notify<D: Document + ?Sized>(
        &mut self,
        document: &mut D,
        element: ElementId,
        ratio: f32,
        intersecting: bool,
    ) -> Option<T> {
        let watch = self.watched.get(&element)?;
        if !intersecting || ratio + THRESHOLD_TOLERANCE < watch.threshold {
            return None;
        }
        let watch = self.watched.remove(&element)?;
        document.unobserve(element);
        Some(watch.trigger)
    }

    /// Whether `element` is still waiting.
    #[must_use]
    pub fn is_watching(&self, element: ElementId) -> bool {
        self.watched.contains_key(&element)
    }

    /// Number of elements still waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.watched.len()
    }

    /// Whether nothing is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watched.is_empty()
    }

    /// Threshold `element` was registered with.
    #[must_use]
    pub fn threshold(&self, element: ElementId) -> Option<f32> {
        self.watched.get(&element).map(|watch| watch.threshold)
    }

    /// Unobserve everything.
    pub fn disconnect<D: Document + ?Sized>(&mut self, document: &mut D) {
        for (element, _) in self.watched.drain() {
            document.unobserve(element);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Capabilities, MemoryDocument};

    #[test]
    fn test_fires_once_then_unobserves() {
        let mut doc = MemoryDocument::new();
        let card = doc.append(doc.body(), "div");
        let mut observer = VisibilityObserver::new(true);

        assert_eq!(
            observer.observe(&mut doc, card, 0.18, "card"),
            Observation::Watching
        );
        assert_eq!(doc.observed_threshold(card), Some(0.18));

        assert_eq!(observer.notify(&mut doc, card, 0.05, true), None);
        assert_eq!(observer.notify(&mut doc, card, 0.18, true), Some("card"));
        assert_eq!(observer.notify(&mut doc, card, 0.9, true), None);
        assert_eq!(doc.observed_threshold(card), None);
    }

    #[test]
    fn test_unknown_element_is_ignored() {
        let mut doc = MemoryDocument::new();
        let body = doc.body();
        let mut observer: VisibilityObserver<()> = VisibilityObserver::new(true);
        assert_eq!(observer.notify(&mut doc, body, 1.0, true), None);
    }

    #[test]
    fn test_unavailable_is_a_no_op() {
        let mut doc = MemoryDocument::with_capabilities(Capabilities::NONE);
        let card = doc.append(doc.body(), "div");
        let mut observer = VisibilityObserver::new(false);
        assert_eq!(
            observer.observe(&mut doc, card, 0.08, ()),
            Observation::Unavailable
        );
        assert!(observer.is_empty());
        assert_eq!(doc.observed_count(), 0);
    }

    #[test]
    fn test_host_rejection_degrades() {
        // Capability advertised at init but the host refuses later.
        let mut doc = MemoryDocument::with_capabilities(Capabilities::NONE);
        let card = doc.append(doc.body(), "div");
        let mut observer = VisibilityObserver::new(true);
        assert_eq!(
            observer.observe(&mut doc, card, 0.08, ()),
            Observation::Unavailable
        );
        assert!(!observer.is_watching(card));
    }

    #[test]
    fn test_disconnect() {
        let mut doc = MemoryDocument::new();
        let a = doc.append(doc.body(), "div");
        let b = doc.append(doc.body(), "div");
        let mut observer = VisibilityObserver::new(true);
        let _ = observer.observe(&mut doc, a, 0.08, a);
        let _ = observer.observe(&mut doc, b, 0.08, b);
        observer.disconnect(&mut doc);
        assert!(observer.is_empty());
        assert_eq!(doc.observed_count(), 0);
    }

    #[test]
    fn test_leaving_entry_never_fires() {
        let mut doc = MemoryDocument::new();
        let card = doc.append(doc.body(), "div");
        let mut observer = VisibilityObserver::new(true);
        let _ = observer.observe(&mut doc, card, 0.0, ());

        assert_eq!(observer.notify(&mut doc, card, 0.0, false), None);
        assert!(observer.is_watching(card));
        assert_eq!(observer.notify(&mut doc, card, 0.0, true), Some(()));
    }

    #[test]
    fn test_crossing_just_short_of_threshold_fires() {
        let mut doc = MemoryDocument::new();
        let card = doc.append(doc.body(), "div");
        let mut observer = VisibilityObserver::new(true);
        let _ = observer.observe(&mut doc, card, 0.18, ());

        assert_eq!(observer.notify(&mut doc, card, 0.17, true), None);
        assert_eq!(observer.notify(&mut doc, card, 0.1795, true), Some(()));
    }
}
