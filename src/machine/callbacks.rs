//! Enter and exit callbacks keyed by state.

use super::config::CallbackPolicy;
use crate::core::State;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

/// Zero-argument side effect attached to a state.
pub type StateCallback = Rc<dyn Fn()>;

/// Map from state to the side effect run when entering or leaving it.
///
/// # Example
///
/// ```rust
/// use tinysm::machine::CallbackMap;
///
/// let on_enter = CallbackMap::new()
///     .on(true, || println!("light on"))
///     .on(false, || println!("light off"));
///
/// assert_eq!(on_enter.len(), 2);
/// ```
pub struct CallbackMap<S> {
    callbacks: BTreeMap<S, StateCallback>,
}

impl<S: State> CallbackMap<S> {
    pub fn new() -> Self {
        Self {
            callbacks: BTreeMap::new(),
        }
    }

    /// Attach `callback` to `state`, replacing any earlier one.
    pub fn on<F>(mut self, state: S, callback: F) -> Self
    where
        F: Fn() + 'static,
    {
        self.insert(state, callback);
        self
    }

    pub fn insert<F>(&mut self, state: S, callback: F)
    where
        F: Fn() + 'static,
    {
        self.callbacks.insert(state, Rc::new(callback));
    }

    pub fn get(&self, state: &S) -> Option<&StateCallback> {
        self.callbacks.get(state)
    }

    pub fn contains(&self, state: &S) -> bool {
        self.callbacks.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }
}

impl<S: State> Default for CallbackMap<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: fmt::Debug> fmt::Debug for CallbackMap<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.callbacks.keys()).finish()
    }
}

/// Enter and exit maps of one machine, plus whether they are consulted.
pub(crate) struct StateCallbacks<S> {
    enter: CallbackMap<S>,
    exit: CallbackMap<S>,
    active: bool,
}

impl<S: State> StateCallbacks<S> {
    pub(crate) fn new(enter: CallbackMap<S>, exit: CallbackMap<S>, policy: CallbackPolicy) -> Self {
        let active = match policy {
            CallbackPolicy::RequireBoth => !enter.is_empty() && !exit.is_empty(),
            CallbackPolicy::Independent => !enter.is_empty() || !exit.is_empty(),
        };

        if !active && (!enter.is_empty() || !exit.is_empty()) {
            tracing::debug!(
                enter = enter.len(),
                exit = exit.len(),
                "callbacks disabled: both enter and exit maps are required"
            );
        }

        Self {
            enter,
            exit,
            active,
        }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    /// Exit callback of `from`, then enter callback of `to`.
    ///
    /// Callbacks are cloned out before running so they may re-enter the
    /// machine.
    pub(crate) fn dispatch(&self, from: &S, to: &S) {
        if !self.active {
            return;
        }
        if let Some(on_exit) = self.exit.get(from).cloned() {
            tracing::trace!(state = ?from, "running exit callback");
            on_exit();
        }
        if let Some(on_enter) = self.enter.get(to).cloned() {
            tracing::trace!(state = ?to, "running enter callback");
            on_enter();
        }
    }
}
