//! Per-machine configuration.

use crate::core::DEFAULT_HISTORY_CAPACITY;
use serde::{Deserialize, Serialize};

/// When enter/exit callbacks are dispatched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackPolicy {
    /// Callbacks run only if both the enter and exit maps were non-empty
    /// at construction. With either map empty, no callback ever runs.
    #[default]
    RequireBoth,

    /// Each map is consulted on its own; states without an entry are
    /// skipped.
    Independent,
}

/// Configuration for a [`StateMachine`](super::StateMachine).
///
/// # Example
///
/// ```rust
/// use tinysm::machine::{CallbackPolicy, MachineConfig};
///
/// let config = MachineConfig::default()
///     .with_callback_policy(CallbackPolicy::Independent)
///     .with_history_capacity(16);
///
/// assert_eq!(config.history_capacity, 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub callback_policy: CallbackPolicy,

    /// Number of taken transitions kept in the machine's history. Zero
    /// disables history.
    pub history_capacity: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            callback_policy: CallbackPolicy::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MachineConfig {
    pub fn with_callback_policy(mut self, policy: CallbackPolicy) -> Self {
        self.callback_policy = policy;
        self
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_keeps_require_both_policy() {
        let config = MachineConfig::default();
        assert_eq!(config.callback_policy, CallbackPolicy::RequireBoth);
        assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: MachineConfig =
            serde_json::from_str(r#"{"callback_policy":"independent"}"#).unwrap();

        assert_eq!(config.callback_policy, CallbackPolicy::Independent);
        assert_eq!(config.history_capacity, DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn config_serializes_correctly() {
        let config = MachineConfig::default().with_history_capacity(3);
        let json = serde_json::to_string(&config).unwrap();

        assert!(json.contains(r#""callback_policy":"require_both""#));
        let deserialized: MachineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
