use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::document::Position;

/// Stable identifier for an annotation.
///
/// Identity is deliberately synthetic rather than derived from the
/// annotation's range: ranges move on every edit, and two annotations may
/// momentarily share a range without colliding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct AnnotationId(pub Uuid);

impl AnnotationId {
    pub fn new() -> Self {
        AnnotationId(Uuid::new_v4())
    }
}

impl Default for AnnotationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AnnotationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A payload attached to a character range of the document.
///
/// The payload is opaque to the engine; it is carried through recomputation
/// untouched. `start` and `end` are block-anchored positions with
/// `start <= end` in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation<P> {
    pub id: AnnotationId,
    pub start: Position,
    pub end: Position,
    pub payload: P,
}

/// Insertion-ordered collection of annotations attached to one document.
///
/// Ranges may overlap freely; each annotation is shifted independently.
/// Iteration order is insertion order, which makes active-annotation
/// tie-breaking deterministic when ranges overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSet<P> {
    annotations: Vec<Annotation<P>>,
}

impl<P> AnnotationSet<P> {
    pub fn new() -> Self {
        AnnotationSet {
            annotations: Vec::new(),
        }
    }

    /// Attach a payload to the range `start..end`, returning the new
    /// annotation's id.
    pub fn annotate(&mut self, start: Position, end: Position, payload: P) -> AnnotationId {
        let id = AnnotationId::new();
        self.annotations.push(Annotation {
            id,
            start,
            end,
            payload,
        });
        id
    }

    pub fn insert(&mut self, annotation: Annotation<P>) {
        self.annotations.push(annotation);
    }

    /// Remove an annotation by id, returning it if present.
    pub fn remove(&mut self, id: AnnotationId) -> Option<Annotation<P>> {
        let index = self.annotations.iter().position(|a| a.id == id)?;
        Some(self.annotations.remove(index))
    }

    pub fn get(&self, id: AnnotationId) -> Option<&Annotation<P>> {
        self.annotations.iter().find(|a| a.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Annotation<P>> {
        self.annotations.iter()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

impl<P> Default for AnnotationSet<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> IntoIterator for AnnotationSet<P> {
    type Item = Annotation<P>;
    type IntoIter = std::vec::IntoIter<Annotation<P>>;

    fn into_iter(self) -> Self::IntoIter {
        self.annotations.into_iter()
    }
}

impl<P> FromIterator<Annotation<P>> for AnnotationSet<P> {
    fn from_iter<I: IntoIterator<Item = Annotation<P>>>(iter: I) -> Self {
        AnnotationSet {
            annotations: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::BlockId;

    fn pos(block: BlockId, offset: usize) -> Position {
        Position::new(block, offset)
    }

    #[test]
    fn test_annotate_assigns_unique_ids() {
        let block = BlockId::new();
        let mut set = AnnotationSet::new();
        let a = set.annotate(pos(block, 0), pos(block, 4), "comment");
        let b = set.annotate(pos(block, 0), pos(block, 4), "highlight");

        assert_ne!(a, b, "identical ranges must not collide on id");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_iteration_preserves_insertion_order() {
        let block = BlockId::new();
        let mut set = AnnotationSet::new();
        set.annotate(pos(block, 5), pos(block, 9), "second-by-position");
        set.annotate(pos(block, 0), pos(block, 4), "first-by-position");

        let payloads: Vec<_> = set.iter().map(|a| a.payload).collect();
        assert_eq!(payloads, vec!["second-by-position", "first-by-position"]);
    }

    #[test]
    fn test_remove_returns_annotation() {
        let block = BlockId::new();
        let mut set = AnnotationSet::new();
        let id = set.annotate(pos(block, 1), pos(block, 3), 42);

        let removed = set.remove(id).expect("annotation should be present");
        assert_eq!(removed.payload, 42);
        assert!(set.is_empty());
        assert!(set.remove(id).is_none());
    }

    #[test]
    fn test_overlapping_ranges_are_permitted() {
        let block = BlockId::new();
        let mut set = AnnotationSet::new();
        set.annotate(pos(block, 0), pos(block, 10), "outer");
        set.annotate(pos(block, 3), pos(block, 6), "inner");

        assert_eq!(set.len(), 2);
    }
}
