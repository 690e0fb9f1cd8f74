//! Events: the stimuli that drive state machines.
//!
//! - [`Event`] is a named trigger chain the host fires directly
//! - [`EventGroup`] forwards the firings of several events into one
//! - [`Trigger`] is the capability both share, and what transition tables
//!   accept

mod chain;
mod error;
mod group;

pub use chain::{Event, StateAccessor, Trigger, TriggerHandler};
pub use error::EventError;
pub use group::{EventCluster, EventGroup};
