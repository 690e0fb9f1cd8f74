//! Transition tables.

use crate::core::{Edge, State};
use crate::event::{Event, Trigger};
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// Ordered map from [`Edge`] to the event that takes it.
///
/// Keys are unique and the first binding of a key wins: inserting an edge
/// that is already present leaves the table unchanged. Several edges may
/// share one event, which is how one stimulus is made legal from several
/// start states.
///
/// # Example
///
/// ```rust
/// use tinysm::event::Event;
/// use tinysm::machine::TransitionTable;
///
/// let on: Event<bool> = Event::new("on");
/// let off: Event<bool> = Event::new("off");
///
/// let table = TransitionTable::new()
///     .with((false, true), &on)
///     .with((true, false), &off)
///     .with((false, true), &off);
///
/// assert_eq!(table.len(), 2);
/// assert!(table.get(&(false, true).into()).unwrap().ptr_eq(&on));
/// ```
pub struct TransitionTable<S> {
    entries: BTreeMap<Edge<S>, Event<S>>,
}

impl<S: State> TransitionTable<S> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add an entry, returning `self` for chaining. Duplicate keys are
    /// ignored.
    pub fn with<T>(mut self, edge: impl Into<Edge<S>>, trigger: &T) -> Self
    where
        T: Trigger<S> + ?Sized,
    {
        self.insert(edge, trigger);
        self
    }

    /// Add an entry. Returns `false`, leaving the existing binding in
    /// place, if the edge is already present.
    pub fn insert<T>(&mut self, edge: impl Into<Edge<S>>, trigger: &T) -> bool
    where
        T: Trigger<S> + ?Sized,
    {
        self.insert_event(edge.into(), trigger.as_event().clone())
    }

    pub(crate) fn insert_event(&mut self, edge: Edge<S>, event: Event<S>) -> bool {
        match self.entries.entry(edge) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert(event);
                true
            }
            btree_map::Entry::Occupied(_) => false,
        }
    }

    pub(crate) fn remove(&mut self, edge: &Edge<S>) -> Option<Event<S>> {
        self.entries.remove(edge)
    }

    pub fn get(&self, edge: &Edge<S>) -> Option<&Event<S>> {
        self.entries.get(edge)
    }

    pub fn contains(&self, edge: &Edge<S>) -> bool {
        self.entries.contains_key(edge)
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Edge<S>, &Event<S>)> {
        self.entries.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &Edge<S>> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: State> Default for TransitionTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> fmt::Debug for TransitionTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(edge, event)| (edge, event.name())))
            .finish()
    }
}
