//! The value held by a relation picker, and the rules for changing it.

use crate::entity::RelationRef;

/// What a relation picker currently has selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A to-one relation (a song's album).
    Single(Option<RelationRef>),
    /// A to-many relation (a song's artists), in the order they were picked.
    Multiple(Vec<RelationRef>),
}

impl Selection {
    #[must_use]
    pub const fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Single(value) => usize::from(value.is_some()),
            Self::Multiple(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The selected references, in order.
    #[must_use]
    pub fn items(&self) -> &[RelationRef] {
        match self {
            Self::Single(value) => value.as_slice(),
            Self::Multiple(values) => values,
        }
    }

    /// Pick a candidate.
    ///
    /// A single selection is replaced. A multiple selection gets the candidate appended, unless it
    /// already holds a reference to the same target, in which case nothing changes.
    ///
    /// Returns whether the selection changed.
    pub fn select(&mut self, candidate: RelationRef) -> bool {
        match self {
            Self::Single(value) => {
                let changed = value.as_ref() != Some(&candidate);
                *value = Some(candidate);
                changed
            }
            Self::Multiple(values) => {
                if values.iter().any(|v| v.same_target(&candidate)) {
                    false
                } else {
                    values.push(candidate);
                    true
                }
            }
        }
    }

    /// Commit free text as a reference to an entity that doesn't exist yet.
    ///
    /// The identifier is left unset, it gets synthesized when the form is saved.
    pub fn create(&mut self, text: &str) -> bool {
        let name = text.trim();
        if name.is_empty() {
            return false;
        }
        self.select(RelationRef::synthetic(name))
    }

    /// Remove every reference to the same target as `target`.
    ///
    /// Returns whether the selection changed.
    pub fn remove(&mut self, target: &RelationRef) -> bool {
        match self {
            Self::Single(value) if value.as_ref().is_some_and(|v| v.same_target(target)) => {
                *value = None;
                true
            }
            Self::Single(_) => false,
            Self::Multiple(values) => {
                let before = values.len();
                values.retain(|v| !v.same_target(target));
                values.len() != before
            }
        }
    }

    /// Remove the most recently added reference.
    pub fn remove_last(&mut self) -> Option<RelationRef> {
        match self {
            Self::Single(value) => value.take(),
            Self::Multiple(values) => values.pop(),
        }
    }

    pub fn clear(&mut self) {
        match self {
            Self::Single(value) => *value = None,
            Self::Multiple(values) => values.clear(),
        }
    }

    /// Consume a single selection, a multiple selection yields its first entry.
    #[must_use]
    pub fn into_single(self) -> Option<RelationRef> {
        match self {
            Self::Single(value) => value,
            Self::Multiple(values) => values.into_iter().next(),
        }
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<RelationRef> {
        match self {
            Self::Single(value) => value.into_iter().collect(),
            Self::Multiple(values) => values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_single_select_replaces() {
        let mut selection = Selection::Single(None);
        assert!(selection.select(RelationRef::new(1, "Meddle")));
        assert!(selection.select(RelationRef::new(2, "Animals")));
        assert_eq!(selection.items(), &[RelationRef::new(2, "Animals")]);
        assert!(!selection.select(RelationRef::new(2, "Animals")));
    }

    #[test]
    fn test_multiple_select_ignores_duplicate_ids() {
        let mut selection = Selection::Multiple(vec![]);
        assert!(selection.select(RelationRef::new(1, "Pink Floyd")));
        assert!(selection.select(RelationRef::new(2, "Roger Waters")));
        let before = selection.clone();

        // same id, even under a different display name
        assert!(!selection.select(RelationRef::new(1, "The Pink Floyd")));

        assert_eq!(selection, before);
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_create_synthesizes_reference() {
        let mut selection = Selection::Multiple(vec![RelationRef::new(1, "Pink Floyd")]);
        assert!(selection.create("  David Gilmour "));
        assert_eq!(
            selection.items().last(),
            Some(&RelationRef::synthetic("David Gilmour"))
        );
        assert_eq!(selection.items()[1].identifier, None);

        // typing the same new name twice doesn't add it twice
        assert!(!selection.create("david gilmour"));
        // blank text is ignored
        assert!(!selection.create("   "));
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_remove() {
        let mut selection = Selection::Multiple(vec![
            RelationRef::new(1, "A"),
            RelationRef::new(2, "B"),
            RelationRef::synthetic("New Guy"),
            RelationRef::new(3, "C"),
        ]);
        // by id, whatever the display name
        assert!(selection.remove(&RelationRef::new(2, "Renamed B")));
        assert!(!selection.remove(&RelationRef::new(7, "B")));
        // synthesized references by name
        assert!(selection.remove(&RelationRef::synthetic("new guy")));
        assert_eq!(selection.remove_last(), Some(RelationRef::new(3, "C")));
        assert_eq!(selection.into_vec(), vec![RelationRef::new(1, "A")]);

        let mut selection = Selection::Single(Some(RelationRef::new(1, "Meddle")));
        assert!(!selection.remove(&RelationRef::new(5, "Animals")));
        assert!(selection.remove(&RelationRef::new(1, "Meddle")));
        assert!(selection.is_empty());
        assert_eq!(selection.into_single(), None);
    }

    #[test]
    fn test_clear() {
        let mut selection = Selection::Multiple(vec![RelationRef::new(1, "A")]);
        selection.clear();
        assert!(selection.is_empty());
        assert!(selection.is_multiple());
    }
}
