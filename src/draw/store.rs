//! Ordered store of committed annotations.

use super::annotation::Annotation;

/// Container for all annotations committed over the current base image.
///
/// Order is commit order and is the only replay order. Entries are only ever
/// appended or popped from the end.
#[derive(Debug, Clone, Default)]
pub struct AnnotationStore {
    /// Annotations in draw order (first = bottom, last = top)
    annotations: Vec<Annotation>,
}

impl AnnotationStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            annotations: Vec::new(),
        }
    }

    /// Removes every annotation.
    pub fn clear(&mut self) {
        self.annotations.clear();
    }

    /// Attempts to append an annotation, enforcing a maximum count when `max` > 0.
    ///
    /// Returns `true` if the annotation was added, `false` if the limit would be exceeded.
    pub fn try_push(&mut self, annotation: Annotation, max: usize) -> bool {
        if max == 0 || self.annotations.len() < max {
            self.annotations.push(annotation);
            true
        } else {
            false
        }
    }

    /// Removes and returns the most recently committed annotation, if any.
    pub fn pop(&mut self) -> Option<Annotation> {
        self.annotations.pop()
    }

    pub fn last(&self) -> Option<&Annotation> {
        self.annotations.last()
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    pub fn as_slice(&self) -> &[Annotation] {
        &self.annotations
    }
}
