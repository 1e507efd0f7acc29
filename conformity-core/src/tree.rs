//! Lazy shrink trees.

use std::fmt;
use std::rc::Rc;

/// A node in a shrink tree: one candidate value plus a lazily derived
/// ordered sequence of simpler candidates.
///
/// Children are re-derived from the stored thunk on every call to
/// [`Shrinkable::children`]. Observation has no side effects, so two
/// derivations from the same unmodified node always yield equal
/// sequences, which is what makes shrink walks replayable.
pub struct Shrinkable<T> {
    value: T,
    children: Rc<dyn Fn() -> Vec<Shrinkable<T>>>,
}

impl<T: 'static> Shrinkable<T> {
    /// Create a node with the given value and child thunk.
    pub fn new<F>(value: T, children: F) -> Self
    where
        F: Fn() -> Vec<Shrinkable<T>> + 'static,
    {
        Shrinkable {
            value,
            children: Rc::new(children),
        }
    }

    /// Create a leaf with no shrink candidates.
    pub fn singleton(value: T) -> Self {
        Shrinkable {
            value,
            children: Rc::new(Vec::new),
        }
    }

    /// Map a function over the node and, lazily, its children.
    pub fn map<U, F>(&self, f: F) -> Shrinkable<U>
    where
        T: Clone,
        U: 'static,
        F: Fn(&T) -> U + Clone + 'static,
    {
        let value = f(&self.value);
        let node = self.clone();
        Shrinkable::new(value, move || {
            node.children()
                .iter()
                .map(|child| child.map(f.clone()))
                .collect()
        })
    }

    /// Pair this node with another, shrinking the left side first and
    /// then the right.
    pub fn zip<B>(&self, other: &Shrinkable<B>) -> Shrinkable<(T, B)>
    where
        T: Clone,
        B: Clone + 'static,
    {
        let value = (self.value.clone(), other.value.clone());
        let left = self.clone();
        let right = other.clone();
        Shrinkable::new(value, move || {
            let mut children: Vec<Shrinkable<(T, B)>> = left
                .children()
                .iter()
                .map(|child| child.zip(&right))
                .collect();
            children.extend(right.children().iter().map(|child| left.zip(child)));
            children
        })
    }
}

impl<T> Shrinkable<T> {
    /// The candidate value held by this node.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Derive the ordered child sequence.
    pub fn children(&self) -> Vec<Shrinkable<T>> {
        (self.children)()
    }

    /// Whether this node has any shrink candidates.
    pub fn has_shrinks(&self) -> bool {
        !self.children().is_empty()
    }
}

impl<T: Clone> Clone for Shrinkable<T> {
    fn clone(&self) -> Self {
        Shrinkable {
            value: self.value.clone(),
            children: Rc::clone(&self.children),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Shrinkable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shrinkable")
            .field("value", &self.value)
            .finish_non_exhaustive()
    }
}

/// Select the `n`-th element of a child sequence, falling back to the
/// last element when `n` is at or past the end. An empty sequence
/// yields `None`.
///
/// The clamp-to-last fallback is a contract, not a convenience: it lets
/// a fixed-length cyclic path navigate trees of unknown or varying
/// branching factor without ever being out of range, while selecting the
/// same child on every replay. Modulo indexing or an error would select
/// different children and mask shrink-determinism bugs.
pub fn nth_or_last<T>(mut children: Vec<Shrinkable<T>>, n: usize) -> Option<Shrinkable<T>> {
    if children.is_empty() {
        return None;
    }
    let index = n.min(children.len() - 1);
    Some(children.swap_remove(index))
}
