//! Handle allocation for hosts that wrap foreign element objects.

use rustc_hash::FxHashMap;

use super::ElementId;

/// Host objects keyed by the [`ElementId`] issued for them. Removing an
/// entry frees it; its handle is not issued again while the counter has
/// unused values, so a late message for a removed element finds nothing.
#[derive(Debug)]
pub(crate) struct HandleMap<T> {
    entries: FxHashMap<ElementId, T>,
    next: u32,
}

impl<T> Default for HandleMap<T> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            next: 0,
        }
    }
}

impl<T> HandleMap<T> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store `value` under a fresh handle.
    pub(crate) fn insert(&mut self, value: T) -> ElementId {
        while self.entries.contains_key(&ElementId::from_raw(self.next)) {
            self.next = self.next.wrapping_add(1);
        }
        let id = ElementId::from_raw(self.next);
        self.next = self.next.wrapping_add(1);
        let _ = self.entries.insert(id, value);
        id
    }

    pub(crate) fn get(&self, id: ElementId) -> Option<&T> {
        self.entries.get(&id)
    }

    pub(crate) fn remove(&mut self, id: ElementId) -> Option<T> {
        self.entries.remove(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_frees_the_entry() {
        let mut map = HandleMap::new();
        let button = map.insert("button");
        let ripple = map.insert("span");
        assert_eq!(map.len(), 2);

        assert_eq!(map.remove(ripple), Some("span"));
        assert_eq!(map.get(ripple), None);
        assert_eq!(map.remove(ripple), None);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(button), Some(&"button"));
    }

    #[test]
    fn test_handles_are_not_reused() {
        let mut map = HandleMap::new();
        let mut seen = Vec::new();
        for _ in 0..100 {
            let ripple = map.insert(());
            assert!(!seen.contains(&ripple));
            seen.push(ripple);
            let _ = map.remove(ripple);
        }
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn test_wrapped_counter_skips_live_handles() {
        let mut map = HandleMap::new();
        let first = map.insert("live");
        map.next = u32::MAX;
        let last = map.insert("last");
        assert_eq!(last, ElementId::from_raw(u32::MAX));
        let wrapped = map.insert("wrapped");
        assert_ne!(wrapped, first);
        assert_eq!(map.get(first), Some(&"live"));
    }
}
