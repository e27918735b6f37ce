use std::collections::HashSet;

/// Identities of the source objects currently reserved by one top-level call.
///
/// An untracked set never records anything, which turns cycle detection off.
#[derive(Debug)]
pub struct VisitedSet {
    ids: HashSet<usize>,
    tracking: bool,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self {
            ids: HashSet::new(),
            tracking: true,
        }
    }

    pub fn untracked() -> Self {
        Self {
            ids: HashSet::new(),
            tracking: false,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn contains(&self, id: usize) -> bool {
        self.tracking && self.ids.contains(&id)
    }

    /// Returns false if the identity was already present.
    pub fn insert(&mut self, id: usize) -> bool {
        if !self.tracking {
            return true;
        }
        self.ids.insert(id)
    }

    pub fn remove(&mut self, id: usize) {
        self.ids.remove(&id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl Default for VisitedSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_contains_remove() {
        let mut visited = VisitedSet::new();
        assert!(visited.insert(0x10));
        assert!(!visited.insert(0x10));
        assert!(visited.contains(0x10));
        assert_eq!(visited.len(), 1);

        visited.remove(0x10);
        assert!(!visited.contains(0x10));
        assert!(visited.is_empty());
    }

    #[test]
    fn test_untracked_set_records_nothing() {
        let mut visited = VisitedSet::untracked();
        assert!(!visited.is_tracking());
        assert!(visited.insert(0x10));
        assert!(visited.insert(0x10));
        assert!(!visited.contains(0x10));
        assert!(visited.is_empty());
    }
}
