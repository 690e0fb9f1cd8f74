//! Tinysm: a tiny state machine driven by composable events
//!
//! A transition table is declared once and wired to arbitrary stimuli.
//! Firing an event walks its handler chain; a state machine's handler for
//! an edge claims the firing only when the machine is in the edge's start
//! state, so several edges, and several machines, can share one event.
//!
//! # Core Concepts
//!
//! - **Event**: a named firing point with an ordered handler chain
//! - **Event group**: a composite event fired by any of its members
//! - **State machine**: the current state plus a `(from, to) -> event`
//!   transition table, with optional enter/exit callbacks
//!
//! Everything is single-threaded and synchronous: firing an event runs the
//! whole chain, including cascades triggered by callbacks, before it
//! returns.
//!
//! # Example
//!
//! ```rust
//! use tinysm::{Event, EventGroup, StateMachine, TransitionTable};
//!
//! #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
//! enum Door {
//!     Open,
//!     Closed,
//! }
//!
//! let button: Event<Door> = Event::new("button");
//! let sensor: Event<Door> = Event::new("sensor");
//! let open = EventGroup::new("open", [&button, &sensor]).unwrap();
//! let close: Event<Door> = Event::new("close");
//!
//! let door = StateMachine::new(
//!     Door::Closed,
//!     TransitionTable::new()
//!         .with((Door::Closed, Door::Open), &open)
//!         .with((Door::Open, Door::Closed), &close),
//! );
//!
//! sensor.trigger();
//! assert!(door.is_in_state(&Door::Open));
//! close.trigger();
//! assert!(door.is_in_state(&Door::Closed));
//! ```

pub mod builder;
pub mod core;
pub mod event;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, StateMachineBuilder};
pub use self::core::{Edge, State, StateHistory, StateTransition};
pub use event::{Event, EventCluster, EventError, EventGroup, Trigger};
pub use machine::{CallbackMap, CallbackPolicy, MachineConfig, StateMachine, TransitionTable};
