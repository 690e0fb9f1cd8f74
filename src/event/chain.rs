//! The trigger chain primitive.

use super::error::EventError;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Zero-argument predicate bound to an event.
///
/// Returns `true` when it claimed the firing, which stops the chain.
pub type TriggerHandler = Rc<dyn Fn() -> bool>;

/// Reads the current state of whatever the event is attached to.
///
/// Yields `None` once the source of the state is gone.
pub type StateAccessor<S> = Rc<dyn Fn() -> Option<S>>;

struct EventInner<S> {
    name: String,
    handlers: RefCell<Vec<TriggerHandler>>,
    accessor: RefCell<Option<StateAccessor<S>>>,
}

/// A named firing point holding an ordered chain of trigger handlers.
///
/// `Event` is a handle: clones share the same handler chain. The host keeps
/// its own handles while state machines and groups wire handlers into the
/// chain, so an event can never be freed out from under its wiring.
///
/// Firing evaluates handlers in registration order and stops at the first
/// one that reports `true`. The chain is snapshotted before evaluation, so a
/// handler may fire events (including this one) or rewire the chain; such
/// changes apply from the next firing on.
///
/// # Example
///
/// ```rust
/// use tinysm::event::Event;
/// use std::cell::Cell;
/// use std::rc::Rc;
///
/// let press: Event<bool> = Event::new("press");
/// let seen = Rc::new(Cell::new(0));
///
/// let counter = Rc::clone(&seen);
/// press.register_handler(move || {
///     counter.set(counter.get() + 1);
///     true
/// });
/// let counter = Rc::clone(&seen);
/// press.register_handler(move || {
///     counter.set(counter.get() + 100);
///     true
/// });
///
/// press.trigger();
/// assert_eq!(seen.get(), 1);
/// ```
pub struct Event<S> {
    inner: Rc<EventInner<S>>,
}

impl<S> Clone for Event<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: 'static> Event<S> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(EventInner {
                name: name.into(),
                handlers: RefCell::new(Vec::new()),
                accessor: RefCell::new(None),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Fire the event.
    ///
    /// Runs every registered handler in order until one claims the firing.
    /// Firing an event nothing claims is a no-op.
    pub fn trigger(&self) {
        let handlers: Vec<TriggerHandler> = self.inner.handlers.borrow().clone();
        tracing::trace!(event = %self.name(), handlers = handlers.len(), "firing event");

        for (index, handler) in handlers.iter().enumerate() {
            if handler() {
                tracing::trace!(event = %self.name(), handler = index, "event handled");
                return;
            }
            tracing::trace!(event = %self.name(), handler = index, "handler declined");
        }

        tracing::trace!(event = %self.name(), "event unhandled");
    }

    /// Current state of the machine this event is attached to.
    ///
    /// # Panics
    ///
    /// Panics if the event was never attached to a state machine, or if that
    /// machine has been dropped. Both are programming errors; use
    /// [`Event::try_state`] to probe without panicking.
    pub fn state(&self) -> S {
        match self.try_state() {
            Ok(state) => state,
            Err(err) => panic!("{err}"),
        }
    }

    /// Current state of the machine this event is attached to.
    pub fn try_state(&self) -> Result<S, EventError> {
        let accessor = self
            .inner
            .accessor
            .borrow()
            .clone()
            .ok_or_else(|| EventError::UnboundAccessor {
                event: self.name().to_string(),
            })?;

        accessor().ok_or_else(|| EventError::DetachedMachine {
            event: self.name().to_string(),
        })
    }

    /// Append a handler to the end of the chain.
    pub fn register_handler<F>(&self, handler: F)
    where
        F: Fn() -> bool + 'static,
    {
        self.inner.handlers.borrow_mut().push(Rc::new(handler));
    }

    /// Drop every handler in the chain.
    ///
    /// The event stays valid and can be wired again afterwards.
    pub fn clear_handlers(&self) {
        let cleared = {
            let mut handlers = self.inner.handlers.borrow_mut();
            let count = handlers.len();
            handlers.clear();
            count
        };
        tracing::trace!(event = %self.name(), cleared, "cleared event handlers");
    }

    /// Replace the state accessor with one that always succeeds.
    pub fn bind_state_accessor<F>(&self, accessor: F)
    where
        F: Fn() -> S + 'static,
    {
        self.bind_detachable_accessor(move || Some(accessor()));
    }

    /// Replace the state accessor with one that may report its source gone.
    pub fn bind_detachable_accessor<F>(&self, accessor: F)
    where
        F: Fn() -> Option<S> + 'static,
    {
        *self.inner.accessor.borrow_mut() = Some(Rc::new(accessor));
    }

    pub fn handler_count(&self) -> usize {
        self.inner.handlers.borrow().len()
    }

    pub fn has_state_accessor(&self) -> bool {
        self.inner.accessor.borrow().is_some()
    }

    /// Whether both handles refer to the same event.
    pub fn ptr_eq(&self, other: &Event<S>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn downgrade(&self) -> WeakEvent<S> {
        WeakEvent {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<S> fmt::Debug for Event<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("name", &self.inner.name)
            .field("handlers", &self.inner.handlers.borrow().len())
            .field("bound", &self.inner.accessor.borrow().is_some())
            .finish()
    }
}

/// Non-owning event handle.
pub(crate) struct WeakEvent<S> {
    inner: Weak<EventInner<S>>,
}

impl<S> Clone for WeakEvent<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<S> WeakEvent<S> {
    pub(crate) fn upgrade(&self) -> Option<Event<S>> {
        self.inner.upgrade().map(|inner| Event { inner })
    }
}

/// Capability shared by everything that can be fired and wired into a
/// transition table.
///
/// Implemented by plain [`Event`]s and by composite
/// [`EventGroup`](super::EventGroup)s. Machines and groups accept any
/// `Trigger`, and always wire into the underlying event chain.
pub trait Trigger<S: 'static> {
    /// The event chain handlers are registered on.
    fn as_event(&self) -> &Event<S>;

    fn fire(&self) {
        self.as_event().trigger();
    }

    fn name(&self) -> &str {
        self.as_event().name()
    }

    fn state(&self) -> S {
        self.as_event().state()
    }
}

impl<S: 'static> Trigger<S> for Event<S> {
    fn as_event(&self) -> &Event<S> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn recorder() -> Rc<RefCell<Vec<&'static str>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn trigger_without_handlers_is_noop() {
        let event: Event<u8> = Event::new("idle");
        event.trigger();
        assert_eq!(event.handler_count(), 0);
    }

    #[test]
    fn handlers_run_in_registration_order() {
        let event: Event<u8> = Event::new("ordered");
        let log = recorder();

        for label in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            event.register_handler(move || {
                log.borrow_mut().push(label);
                false
            });
        }

        event.trigger();
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn chain_stops_at_first_handled() {
        let event: Event<u8> = Event::new("short_circuit");
        let log = recorder();

        let l = Rc::clone(&log);
        event.register_handler(move || {
            l.borrow_mut().push("declines");
            false
        });
        let l = Rc::clone(&log);
        event.register_handler(move || {
            l.borrow_mut().push("claims");
            true
        });
        let l = Rc::clone(&log);
        event.register_handler(move || {
            l.borrow_mut().push("never");
            true
        });

        event.trigger();
        assert_eq!(*log.borrow(), vec!["declines", "claims"]);
    }

    #[test]
    fn clear_handlers_keeps_event_usable() {
        let event: Event<u8> = Event::new("reusable");
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        event.register_handler(move || {
            h.set(h.get() + 1);
            true
        });
        event.clear_handlers();
        event.trigger();
        assert_eq!(hits.get(), 0);

        let h = Rc::clone(&hits);
        event.register_handler(move || {
            h.set(h.get() + 1);
            true
        });
        event.trigger();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn clones_share_one_chain() {
        let event: Event<u8> = Event::new("shared");
        let alias = event.clone();
        let hits = Rc::new(Cell::new(0));

        let h = Rc::clone(&hits);
        alias.register_handler(move || {
            h.set(h.get() + 1);
            true
        });

        event.trigger();
        assert_eq!(hits.get(), 1);
        assert!(event.ptr_eq(&alias));
        assert!(!event.ptr_eq(&Event::new("shared")));
    }

    #[test]
    fn handler_added_while_firing_runs_next_time() {
        let event: Event<u8> = Event::new("self_wiring");
        let hits = Rc::new(Cell::new(0));

        let weak = event.downgrade();
        let h = Rc::clone(&hits);
        event.register_handler(move || {
            if let Some(event) = weak.upgrade() {
                let h = Rc::clone(&h);
                event.register_handler(move || {
                    h.set(h.get() + 1);
                    true
                });
            }
            false
        });

        event.trigger();
        assert_eq!(hits.get(), 0);
        assert_eq!(event.handler_count(), 2);

        event.trigger();
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn try_state_reports_unbound_accessor() {
        let event: Event<u8> = Event::new("loose");

        assert!(!event.has_state_accessor());
        assert_eq!(
            event.try_state(),
            Err(EventError::UnboundAccessor {
                event: "loose".to_string()
            })
        );
    }

    #[test]
    #[should_panic(expected = "event 'loose' has no state accessor")]
    fn state_panics_without_accessor() {
        let event: Event<u8> = Event::new("loose");
        event.state();
    }

    #[test]
    fn bound_accessor_is_replaced_not_stacked() {
        let event: Event<u8> = Event::new("probe");
        event.bind_state_accessor(|| 1);
        event.bind_state_accessor(|| 2);

        assert_eq!(event.state(), 2);
    }

    #[test]
    fn detached_accessor_reports_detached_machine() {
        let event: Event<u8> = Event::new("orphan");
        event.bind_detachable_accessor(|| None);

        assert_eq!(
            event.try_state(),
            Err(EventError::DetachedMachine {
                event: "orphan".to_string()
            })
        );
    }

    #[test]
    fn trigger_trait_fires_underlying_chain() {
        let event: Event<u8> = Event::new("via_trait");
        let hits = Rc::new(Cell::new(0));
        let h = Rc::clone(&hits);
        event.register_handler(move || {
            h.set(h.get() + 1);
            true
        });

        let trigger: &dyn Trigger<u8> = &event;
        trigger.fire();

        assert_eq!(hits.get(), 1);
        assert_eq!(trigger.name(), "via_trait");
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn every_handler_outcome_is_traced() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let event: Event<u8> = Event::new("traced");
        event.register_handler(|| false);
        event.register_handler(|| false);
        event.register_handler(|| true);
        tracing::subscriber::with_default(subscriber, || event.trigger());

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("handler declined").count(), 2);
        assert_eq!(output.matches("event handled").count(), 1);
        assert_eq!(output.matches("event unhandled").count(), 0);
    }

    #[test]
    fn weak_handle_does_not_keep_event_alive() {
        let event: Event<u8> = Event::new("short_lived");
        let weak = event.downgrade();
        assert!(weak.upgrade().is_some());

        drop(event);
        assert!(weak.upgrade().is_none());
    }
}
