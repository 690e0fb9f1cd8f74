//! Composite events.

use super::chain::{Event, Trigger, WeakEvent};
use super::error::EventError;
use std::fmt;

/// An event fired by any one of several member events.
///
/// On construction the group appends one handler to every member. That
/// handler fires the group and then claims the member's firing, so nothing
/// registered on a member after it joined a group will ever run. Build
/// groups before wiring anything else onto their members.
///
/// A group is a [`Trigger`] in its own right: it can be bound into a
/// transition table or nested inside another group. It holds its members
/// weakly; the host keeps them alive.
///
/// # Example
///
/// ```rust
/// use tinysm::event::{Event, EventGroup, Trigger};
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let button: Event<u8> = Event::new("button");
/// let remote: Event<u8> = Event::new("remote");
/// let open = EventGroup::new("open", [&button, &remote]).unwrap();
///
/// let opened = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&opened);
/// open.as_event().register_handler(move || {
///     counter.set(counter.get() + 1);
///     true
/// });
///
/// button.trigger();
/// remote.trigger();
/// assert_eq!(opened.get(), 2);
/// ```
pub struct EventGroup<S> {
    event: Event<S>,
    members: Vec<WeakEvent<S>>,
}

/// Alternate name for [`EventGroup`]; the two behave identically.
pub type EventCluster<S> = EventGroup<S>;

impl<S: 'static> EventGroup<S> {
    /// Create a group over `members` and wire each member to forward into
    /// it.
    ///
    /// Returns [`EventError::EmptyGroup`] when `members` is empty.
    pub fn new<'a, I, T>(name: impl Into<String>, members: I) -> Result<Self, EventError>
    where
        I: IntoIterator<Item = &'a T>,
        T: Trigger<S> + ?Sized + 'a,
    {
        let event = Event::new(name);
        let members: Vec<Event<S>> = members
            .into_iter()
            .map(|member| member.as_event().clone())
            .collect();

        if members.is_empty() {
            return Err(EventError::EmptyGroup {
                group: event.name().to_string(),
            });
        }

        for member in &members {
            let group = event.downgrade();
            member.register_handler(move || {
                if let Some(group) = group.upgrade() {
                    group.trigger();
                }
                true
            });
        }

        let member_names: Vec<&str> = members.iter().map(|m| m.name()).collect();
        tracing::debug!(group = %event.name(), members = ?member_names, "created event group");

        Ok(Self {
            members: members.iter().map(Event::downgrade).collect(),
            event,
        })
    }

    /// Fire the group's own chain, as if a member had been fired.
    pub fn trigger(&self) {
        self.event.trigger();
    }

    pub fn name(&self) -> &str {
        self.event.name()
    }

    /// Members that are still alive, in construction order.
    pub fn members(&self) -> Vec<Event<S>> {
        self.members.iter().filter_map(WeakEvent::upgrade).collect()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }
}

impl<S: 'static> Trigger<S> for EventGroup<S> {
    fn as_event(&self) -> &Event<S> {
        &self.event
    }
}

impl<S> fmt::Debug for EventGroup<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventGroup")
            .field("event", &self.event)
            .field("members", &self.members.len())
            .finish()
    }
}
