//! Core state machine types.
//!
//! This module contains the value types every other module builds on:
//! - The `State` bound satisfied by any state value
//! - `Edge`, the `(from, to)` key of a transition table
//! - Bounded history of taken transitions

mod history;
mod state;

pub use history::{StateHistory, StateTransition, DEFAULT_HISTORY_CAPACITY};
pub use state::{Edge, State};
