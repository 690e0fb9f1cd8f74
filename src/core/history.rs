//! State transition history tracking.
//!
//! A state machine records every transition it takes into a bounded
//! history. Once the capacity is reached the oldest record is dropped, so
//! a machine that runs indefinitely keeps a constant footprint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Default number of transitions a history retains.
pub const DEFAULT_HISTORY_CAPACITY: usize = 64;

/// Record of a single taken transition.
///
/// # Example
///
/// ```rust
/// use tinysm::core::StateTransition;
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: false,
///     to: true,
///     event: "turn_on".to_string(),
///     timestamp: Utc::now(),
/// };
/// assert!(transition.to);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateTransition<S> {
    /// The state being transitioned from
    pub from: S,
    /// The state being transitioned to
    pub to: S,
    /// Name of the event whose firing caused the transition
    pub event: String,
    /// When the transition occurred
    pub timestamp: DateTime<Utc>,
}

/// Ordered, capacity-bounded history of state transitions.
///
/// # Example
///
/// ```rust
/// use tinysm::core::{StateHistory, StateTransition};
/// use chrono::Utc;
///
/// let mut history = StateHistory::with_capacity(8);
///
/// history.record(StateTransition {
///     from: 0u8,
///     to: 1,
///     event: "tick".to_string(),
///     timestamp: Utc::now(),
/// });
/// history.record(StateTransition {
///     from: 1u8,
///     to: 2,
///     event: "tick".to_string(),
///     timestamp: Utc::now(),
/// });
///
/// let path = history.get_path();
/// assert_eq!(path, vec![&0, &1, &2]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(from = "HistoryDump<S>")]
#[serde(bound(deserialize = "S: Deserialize<'de>"))]
pub struct StateHistory<S> {
    transitions: VecDeque<StateTransition<S>>,
    capacity: usize,
}

/// Serialized form of [`StateHistory`], trimmed to its capacity on load.
#[derive(Deserialize)]
struct HistoryDump<S> {
    transitions: VecDeque<StateTransition<S>>,
    capacity: usize,
}

impl<S> From<HistoryDump<S>> for StateHistory<S> {
    fn from(dump: HistoryDump<S>) -> Self {
        let HistoryDump {
            mut transitions,
            capacity,
        } = dump;
        let excess = transitions.len().saturating_sub(capacity);
        transitions.drain(..excess);
        Self {
            transitions,
            capacity,
        }
    }
}

impl<S> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateHistory<S> {
    /// Create an empty history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create an empty history retaining at most `capacity` transitions.
    ///
    /// A capacity of zero disables recording entirely.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(capacity.min(DEFAULT_HISTORY_CAPACITY)),
            capacity,
        }
    }

    /// Append a transition, evicting the oldest one when full.
    pub fn record(&mut self, transition: StateTransition<S>) {
        if self.capacity == 0 {
            return;
        }
        while self.transitions.len() >= self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Get the path of states traversed.
    ///
    /// Returns the `from` state of the oldest retained transition followed
    /// by the `to` state of every retained transition, in order.
    pub fn get_path(&self) -> Vec<&S> {
        let mut path = Vec::with_capacity(self.transitions.len() + 1);
        if let Some(first) = self.transitions.front() {
            path.push(&first.from);
        }
        path.extend(self.transitions.iter().map(|t| &t.to));
        path
    }

    /// Time elapsed between the oldest and newest retained transition.
    ///
    /// Returns `None` if there are no transitions. A newest timestamp that
    /// precedes the oldest one (the wall clock stepped back) yields zero.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.transitions.front()?, self.transitions.back()?);
        Some(
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .unwrap_or(Duration::ZERO),
        )
    }

    /// All retained transitions, oldest first.
    pub fn transitions(&self) -> impl ExactSizeIterator<Item = &StateTransition<S>> {
        self.transitions.iter()
    }

    pub fn last(&self) -> Option<&StateTransition<S>> {
        self.transitions.back()
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
    enum TestState {
        Initial,
        Processing,
        Complete,
    }

    fn transition(from: TestState, to: TestState) -> StateTransition<TestState> {
        StateTransition {
            from,
            to,
            event: "advance".to_string(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn new_history_is_empty() {
        let history: StateHistory<TestState> = StateHistory::new();
        assert!(history.is_empty());
        assert!(history.get_path().is_empty());
        assert!(history.duration().is_none());
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn record_adds_transition() {
        let mut history = StateHistory::new();
        history.record(transition(TestState::Initial, TestState::Processing));

        assert_eq!(history.len(), 1);
        assert_eq!(history.last().unwrap().to, TestState::Processing);
    }

    #[test]
    fn get_path_returns_state_sequence() {
        let mut history = StateHistory::new();
        history.record(transition(TestState::Initial, TestState::Processing));
        history.record(transition(TestState::Processing, TestState::Complete));

        let path = history.get_path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], &TestState::Initial);
        assert_eq!(path[1], &TestState::Processing);
        assert_eq!(path[2], &TestState::Complete);
    }

    #[test]
    fn capacity_evicts_oldest_first() {
        let mut history = StateHistory::with_capacity(2);
        history.record(transition(TestState::Initial, TestState::Processing));
        history.record(transition(TestState::Processing, TestState::Complete));
        history.record(transition(TestState::Complete, TestState::Initial));

        assert_eq!(history.len(), 2);
        assert_eq!(
            history.get_path(),
            vec![
                &TestState::Processing,
                &TestState::Complete,
                &TestState::Initial
            ]
        );
    }

    #[test]
    fn zero_capacity_records_nothing() {
        let mut history = StateHistory::with_capacity(0);
        history.record(transition(TestState::Initial, TestState::Processing));

        assert!(history.is_empty());
    }

    #[test]
    fn clear_empties_history() {
        let mut history = StateHistory::new();
        history.record(transition(TestState::Initial, TestState::Processing));
        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.capacity(), DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn duration_calculates_elapsed_time() {
        let mut history = StateHistory::new();
        history.record(transition(TestState::Initial, TestState::Processing));

        std::thread::sleep(std::time::Duration::from_millis(10));

        history.record(transition(TestState::Processing, TestState::Complete));

        let duration = history.duration();
        assert!(duration.is_some());
        assert!(duration.unwrap() >= std::time::Duration::from_millis(10));
    }

    #[test]
    fn single_transition_has_duration_zero() {
        let mut history = StateHistory::new();
        history.record(transition(TestState::Initial, TestState::Processing));

        assert_eq!(history.duration(), Some(std::time::Duration::from_secs(0)));
    }

    #[test]
    fn history_serializes_correctly() {
        let mut history = StateHistory::with_capacity(4);
        history.record(transition(TestState::Initial, TestState::Processing));

        let json = serde_json::to_string(&history).unwrap();
        let deserialized: StateHistory<TestState> = serde_json::from_str(&json).unwrap();

        assert_eq!(history.len(), deserialized.len());
        assert_eq!(deserialized.capacity(), 4);
        assert_eq!(deserialized.last(), history.last());
    }

    #[test]
    fn deserializing_trims_to_capacity() {
        let mut full = StateHistory::with_capacity(3);
        full.record(transition(TestState::Initial, TestState::Processing));
        full.record(transition(TestState::Processing, TestState::Complete));
        full.record(transition(TestState::Complete, TestState::Initial));

        let mut json = serde_json::to_value(&full).unwrap();
        json["capacity"] = serde_json::json!(1);
        let trimmed: StateHistory<TestState> = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(trimmed.len(), 1);
        assert_eq!(trimmed.last().unwrap().to, TestState::Initial);

        json["capacity"] = serde_json::json!(0);
        let disabled: StateHistory<TestState> = serde_json::from_value(json).unwrap();
        assert!(disabled.is_empty());
        assert_eq!(disabled.capacity(), 0);
    }

    #[test]
    fn clock_stepping_back_gives_zero_duration() {
        let now = Utc::now();
        let mut history = StateHistory::new();
        history.record(StateTransition {
            timestamp: now,
            ..transition(TestState::Initial, TestState::Processing)
        });
        history.record(StateTransition {
            timestamp: now - chrono::Duration::seconds(5),
            ..transition(TestState::Processing, TestState::Complete)
        });

        assert_eq!(history.duration(), Some(Duration::ZERO));
    }
}
