//! Event error types.

use thiserror::Error;

/// Errors raised by events and event groups.
///
/// None of these occur on the firing path: an unmatched firing is a silent
/// no-op, not an error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EventError {
    /// The event was never attached to a state machine
    #[error("event '{event}' has no state accessor; attach it to a state machine first")]
    UnboundAccessor { event: String },

    /// The machine that last bound the accessor has been dropped
    #[error("event '{event}' is bound to a state machine that no longer exists")]
    DetachedMachine { event: String },

    /// An event group needs at least one member
    #[error("event group '{group}' must have at least one member")]
    EmptyGroup { group: String },
}
