//! State machines and their transition tables.
//!
//! # Key Concepts
//!
//! - **Transition table**: ordered `(from, to) -> event` map, first binding wins
//! - **State machine**: owns the current state and wires one handler per
//!   table entry into the entry's event
//! - **Callbacks**: optional per-state enter/exit side effects, gated by a
//!   [`CallbackPolicy`]

mod callbacks;
mod config;
#[allow(clippy::module_inception)]
mod machine;
mod table;

pub use callbacks::{CallbackMap, StateCallback};
pub use config::{CallbackPolicy, MachineConfig};
pub use machine::StateMachine;
pub use table::TransitionTable;
