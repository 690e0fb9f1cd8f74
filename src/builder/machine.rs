//! Builder for constructing state machines.

use crate::builder::error::BuildError;
use crate::core::{Edge, State};
use crate::event::Trigger;
use crate::machine::{CallbackMap, CallbackPolicy, MachineConfig, StateMachine, TransitionTable};

/// Builder for constructing state machines with a fluent API.
///
/// # Example
///
/// ```rust
/// use tinysm::builder::StateMachineBuilder;
/// use tinysm::event::Event;
///
/// let tick: Event<u8> = Event::new("tick");
///
/// let counter = StateMachineBuilder::new()
///     .initial(0u8)
///     .transition((0, 1), &tick)
///     .transition((1, 2), &tick)
///     .transition((2, 0), &tick)
///     .build()
///     .unwrap();
///
/// tick.trigger();
/// tick.trigger();
/// assert_eq!(counter.current_state(), 2);
/// ```
pub struct StateMachineBuilder<S: State> {
    initial: Option<S>,
    transitions: TransitionTable<S>,
    enter: CallbackMap<S>,
    exit: CallbackMap<S>,
    config: MachineConfig,
}

impl<S: State> StateMachineBuilder<S> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            transitions: TransitionTable::new(),
            enter: CallbackMap::new(),
            exit: CallbackMap::new(),
            config: MachineConfig::default(),
        }
    }

    /// Set the initial state (required).
    pub fn initial(mut self, state: S) -> Self {
        self.initial = Some(state);
        self
    }

    /// Bind `trigger` to `edge`. The first binding of an edge wins.
    pub fn transition<T>(mut self, edge: impl Into<Edge<S>>, trigger: &T) -> Self
    where
        T: Trigger<S> + ?Sized,
    {
        let edge = edge.into();
        if !self.transitions.insert(edge.clone(), trigger) {
            tracing::warn!(edge = ?edge, event = %trigger.name(), "duplicate edge ignored");
        }
        self
    }

    /// Run `callback` whenever the machine enters `state`.
    pub fn on_enter<F>(mut self, state: S, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.enter.insert(state, callback);
        self
    }

    /// Run `callback` whenever the machine leaves `state`.
    pub fn on_exit<F>(mut self, state: S, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.exit.insert(state, callback);
        self
    }

    pub fn callback_policy(mut self, policy: CallbackPolicy) -> Self {
        self.config.callback_policy = policy;
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config.history_capacity = capacity;
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the state machine, wiring every transition into its event.
    /// Returns an error if required fields are missing.
    pub fn build(self) -> Result<StateMachine<S>, BuildError> {
        let initial = self.initial.ok_or(BuildError::MissingInitialState)?;

        Ok(StateMachine::with_config(
            initial,
            self.transitions,
            self.enter,
            self.exit,
            self.config,
        ))
    }
}

impl<S: State> Default for StateMachineBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
