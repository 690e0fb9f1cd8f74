//! The state machine and its transition handlers.

use super::callbacks::{CallbackMap, StateCallbacks};
use super::config::MachineConfig;
use super::table::TransitionTable;
use crate::core::{Edge, State, StateHistory, StateTransition};
use crate::event::{Event, Trigger};
use chrono::Utc;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

struct MachineCore<S: State> {
    state: RefCell<S>,
    transitions: RefCell<TransitionTable<S>>,
    callbacks: StateCallbacks<S>,
    history: RefCell<StateHistory<S>>,
    config: MachineConfig,
}

impl<S: State> MachineCore<S> {
    /// Take `edge` if the machine is in its start state.
    ///
    /// No borrow is held while callbacks run, so they may fire events that
    /// reach this machine again.
    fn take_edge(&self, edge: &Edge<S>, event: &str) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if *state != edge.from {
                return false;
            }
            *state = edge.to.clone();
        }

        tracing::debug!(from = ?edge.from, to = ?edge.to, event, "transition taken");
        self.history.borrow_mut().record(StateTransition {
            from: edge.from.clone(),
            to: edge.to.clone(),
            event: event.to_string(),
            timestamp: Utc::now(),
        });

        self.callbacks.dispatch(&edge.from, &edge.to);
        true
    }
}

/// A finite state machine driven by events.
///
/// The machine owns the current state and a [`TransitionTable`]. For every
/// table entry it registers one handler on the entry's event; when that
/// event fires while the machine is in the entry's start state, the handler
/// moves the machine to the end state, runs the exit callback of the start
/// state and then the enter callback of the end state, and claims the
/// firing. In any other state the handler declines so the next handler on
/// the same event can try its own edge.
///
/// Handlers own copies of their edge endpoints and hold the machine weakly:
/// once the machine is dropped they decline every firing.
///
/// # Example
///
/// ```rust
/// use tinysm::event::Event;
/// use tinysm::machine::{StateMachine, TransitionTable};
///
/// let on: Event<bool> = Event::new("on");
/// let off: Event<bool> = Event::new("off");
///
/// let led = StateMachine::new(
///     false,
///     TransitionTable::new()
///         .with((false, true), &on)
///         .with((true, false), &off),
/// );
///
/// on.trigger();
/// assert!(led.is_in_state(&true));
/// on.trigger();
/// assert!(led.is_in_state(&true));
/// off.trigger();
/// assert!(led.is_in_state(&false));
/// ```
pub struct StateMachine<S: State> {
    core: Rc<MachineCore<S>>,
}

impl<S: State> StateMachine<S> {
    /// Create a machine without enter/exit callbacks.
    pub fn new(initial: S, transitions: TransitionTable<S>) -> Self {
        Self::with_config(
            initial,
            transitions,
            CallbackMap::new(),
            CallbackMap::new(),
            MachineConfig::default(),
        )
    }

    /// Create a machine with enter/exit callbacks.
    ///
    /// Under the default [`CallbackPolicy`](super::CallbackPolicy) the
    /// callbacks only run when both maps are non-empty.
    pub fn with_callbacks(
        initial: S,
        transitions: TransitionTable<S>,
        enter: CallbackMap<S>,
        exit: CallbackMap<S>,
    ) -> Self {
        Self::with_config(initial, transitions, enter, exit, MachineConfig::default())
    }

    pub fn with_config(
        initial: S,
        transitions: TransitionTable<S>,
        enter: CallbackMap<S>,
        exit: CallbackMap<S>,
        config: MachineConfig,
    ) -> Self {
        let entries: Vec<(Edge<S>, Event<S>)> = transitions
            .iter()
            .map(|(edge, event)| (edge.clone(), event.clone()))
            .collect();

        let machine = Self {
            core: Rc::new(MachineCore {
                state: RefCell::new(initial),
                transitions: RefCell::new(transitions),
                callbacks: StateCallbacks::new(enter, exit, config.callback_policy),
                history: RefCell::new(StateHistory::with_capacity(config.history_capacity)),
                config,
            }),
        };

        for (edge, event) in &entries {
            machine.bind_edge(edge, event);
        }

        tracing::debug!(
            initial = ?machine.current_state(),
            transitions = entries.len(),
            callbacks = machine.callbacks_active(),
            "state machine ready"
        );
        machine
    }

    pub fn current_state(&self) -> S {
        self.core.state.borrow().clone()
    }

    pub fn is_in_state(&self, state: &S) -> bool {
        *self.core.state.borrow() == *state
    }

    /// Bind `trigger` to `edge`.
    ///
    /// A handler for the edge is always registered on the trigger's event.
    /// The table entry is only inserted if the edge is not already present;
    /// re-adding an existing edge leaves a redundant handler behind.
    pub fn add_transition<T>(&self, edge: impl Into<Edge<S>>, trigger: &T)
    where
        T: Trigger<S> + ?Sized,
    {
        let edge = edge.into();
        let event = trigger.as_event();
        self.bind_edge(&edge, event);

        let inserted = self
            .core
            .transitions
            .borrow_mut()
            .insert_event(edge.clone(), event.clone());

        if inserted {
            tracing::debug!(edge = ?edge, event = %event.name(), "transition added");
        } else {
            tracing::warn!(
                edge = ?edge,
                event = %event.name(),
                "edge already bound; keeping existing binding"
            );
        }
    }

    /// Remove `edge` from the table.
    ///
    /// Clears every handler on the edge's event, not only this edge's. Any
    /// other edge driven by the same event stops working until re-added.
    /// Removing an absent edge does nothing.
    pub fn remove_transition(&self, edge: impl Into<Edge<S>>) {
        let edge = edge.into();
        let removed = self.core.transitions.borrow_mut().remove(&edge);

        if let Some(event) = removed {
            event.clear_handlers();
            tracing::debug!(edge = ?edge, event = %event.name(), "transition removed");
        }
    }

    pub fn has_transition(&self, edge: impl Into<Edge<S>>) -> bool {
        self.core.transitions.borrow().contains(&edge.into())
    }

    /// Event bound to `edge`, if any.
    pub fn event_for(&self, edge: impl Into<Edge<S>>) -> Option<Event<S>> {
        self.core.transitions.borrow().get(&edge.into()).cloned()
    }

    /// All edges in key order.
    pub fn edges(&self) -> Vec<Edge<S>> {
        self.core.transitions.borrow().edges().cloned().collect()
    }

    pub fn transition_count(&self) -> usize {
        self.core.transitions.borrow().len()
    }

    /// Snapshot of the transitions taken so far.
    pub fn history(&self) -> StateHistory<S> {
        self.core.history.borrow().clone()
    }

    pub fn config(&self) -> &MachineConfig {
        &self.core.config
    }

    /// Whether enter/exit callbacks are dispatched at all.
    pub fn callbacks_active(&self) -> bool {
        self.core.callbacks.is_active()
    }

    fn bind_edge(&self, edge: &Edge<S>, event: &Event<S>) {
        let machine: Weak<MachineCore<S>> = Rc::downgrade(&self.core);
        let owned_edge = edge.clone();
        let event_name = event.name().to_string();
        event.register_handler(move || match machine.upgrade() {
            Some(core) => core.take_edge(&owned_edge, &event_name),
            None => false,
        });

        let machine = Rc::downgrade(&self.core);
        event.bind_detachable_accessor(move || {
            machine.upgrade().map(|core| core.state.borrow().clone())
        });
    }
}

impl<S: State> fmt::Debug for StateMachine<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("state", &*self.core.state.borrow())
            .field("transitions", &*self.core.transitions.borrow())
            .field("callbacks_active", &self.core.callbacks.is_active())
            .finish()
    }
}
